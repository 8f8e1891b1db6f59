//! Catalog management: checklist templates and priced ingredients.

mod defaults;

use rust_decimal::Decimal;
use tracing::info;

use dogflow_db::DocumentStore;
use dogflow_db::models::{Ingredient, NewIngredient, NewTemplate, Template};
use dogflow_db::queries::{ingredients as ingredient_db, templates as template_db};

use crate::error::{EntityKind, OpsError, OpsResult};
use crate::Upserted;

pub use defaults::default_templates;

/// Unit recorded when an ingredient is registered without one.
pub const DEFAULT_UNIT: &str = "un";

// -----------------------------------------------------------------------
// Templates
// -----------------------------------------------------------------------

/// Create a template, or fully replace the items of an existing template
/// with the same name.
///
/// Names and items are trimmed and blank items dropped. Fails with
/// [`OpsError::Validation`] when the name or the remaining item list is
/// empty.
pub fn create_template<S, I>(store: &mut S, name: &str, items: I) -> OpsResult<(Template, Upserted)>
where
    S: DocumentStore + ?Sized,
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let name = name.trim();
    if name.is_empty() {
        return Err(OpsError::validation("template name must not be empty"));
    }

    let items: Vec<String> = items
        .into_iter()
        .map(|item| item.as_ref().trim().to_owned())
        .filter(|item| !item.is_empty())
        .collect();
    if items.is_empty() {
        return Err(OpsError::validation("template needs at least one item"));
    }

    let new_template = NewTemplate::new(name, items);
    match template_db::get_template_by_name(store, name)? {
        Some(existing) => {
            template_db::replace_template(store, existing.id, &new_template)?;
            info!(template = name, items = new_template.items.len(), "template replaced");
            Ok((
                Template {
                    id: existing.id,
                    name: new_template.name,
                    items: new_template.items,
                },
                Upserted::Updated,
            ))
        }
        None => {
            let template = template_db::insert_template(store, &new_template)?;
            info!(template = name, items = template.items.len(), "template created");
            Ok((template, Upserted::Created))
        }
    }
}

/// Delete a template by name.
///
/// Checklists already materialized from it are kept as history.
pub fn delete_template<S: DocumentStore + ?Sized>(store: &mut S, name: &str) -> OpsResult<()> {
    let name = name.trim();
    let removed = template_db::delete_template_by_name(store, name)?;
    if removed == 0 {
        return Err(OpsError::not_found(EntityKind::Template, name));
    }
    info!(template = name, "template deleted");
    Ok(())
}

/// Replace every template with the built-in set. Returns how many were
/// loaded.
///
/// Irreversible for custom templates; callers must confirm with the
/// operator first. Checklist history is untouched.
pub fn restore_default_templates<S: DocumentStore + ?Sized>(store: &mut S) -> OpsResult<usize> {
    template_db::clear_templates(store)?;
    let loaded = template_db::insert_templates(store, &default_templates())?;
    info!(loaded, "default templates restored");
    Ok(loaded)
}

/// Load the built-in templates when the template collection is empty.
/// Returns whether anything was loaded.
pub fn ensure_default_templates<S: DocumentStore + ?Sized>(store: &mut S) -> OpsResult<bool> {
    if template_db::count_templates(store)? > 0 {
        return Ok(false);
    }
    let loaded = template_db::insert_templates(store, &default_templates())?;
    info!(loaded, "seeded default templates");
    Ok(true)
}

/// All templates in the order they were stored.
pub fn list_templates<S: DocumentStore + ?Sized>(store: &S) -> OpsResult<Vec<Template>> {
    Ok(template_db::list_templates(store)?)
}

pub fn template_names<S: DocumentStore + ?Sized>(store: &S) -> OpsResult<Vec<String>> {
    Ok(list_templates(store)?.into_iter().map(|t| t.name).collect())
}

// -----------------------------------------------------------------------
// Ingredients
// -----------------------------------------------------------------------

/// Register an ingredient, or overwrite the unit and cost of the one
/// already registered under `name`.
///
/// A blank unit becomes [`DEFAULT_UNIT`].
pub fn upsert_ingredient<S: DocumentStore + ?Sized>(
    store: &mut S,
    name: &str,
    unit: &str,
    unit_cost: Decimal,
) -> OpsResult<(Ingredient, Upserted)> {
    let name = name.trim();
    if name.is_empty() {
        return Err(OpsError::validation("ingredient name must not be empty"));
    }
    if unit_cost < Decimal::ZERO {
        return Err(OpsError::validation(format!(
            "unit cost must not be negative (got {unit_cost})"
        )));
    }
    let unit = match unit.trim() {
        "" => DEFAULT_UNIT,
        u => u,
    };

    match ingredient_db::get_ingredient_by_name(store, name)? {
        Some(existing) => {
            ingredient_db::update_ingredient_cost(store, existing.id, unit, unit_cost)?;
            info!(ingredient = name, unit, %unit_cost, "ingredient updated");
            Ok((
                Ingredient {
                    id: existing.id,
                    name: existing.name,
                    unit: unit.to_owned(),
                    unit_cost,
                },
                Upserted::Updated,
            ))
        }
        None => {
            let ingredient = ingredient_db::insert_ingredient(
                store,
                &NewIngredient {
                    name: name.to_owned(),
                    unit: unit.to_owned(),
                    unit_cost,
                },
            )?;
            info!(ingredient = name, unit, %unit_cost, "ingredient registered");
            Ok((ingredient, Upserted::Created))
        }
    }
}

/// Look up an ingredient by its trimmed name. `None` when absent.
pub fn find_ingredient<S: DocumentStore + ?Sized>(
    store: &S,
    name: &str,
) -> OpsResult<Option<Ingredient>> {
    Ok(ingredient_db::get_ingredient_by_name(store, name.trim())?)
}

/// All ingredients, ordered by case-insensitive name.
pub fn list_ingredients<S: DocumentStore + ?Sized>(store: &S) -> OpsResult<Vec<Ingredient>> {
    let mut ingredients = ingredient_db::list_ingredients(store)?;
    ingredients.sort_by_cached_key(|i| i.name.to_lowercase());
    Ok(ingredients)
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
