//! Recipe costing: cost roll-up, margin and price derivation, and recipe
//! persistence.
//!
//! Ingredient lines copy the ingredient's unit and unit cost when they are
//! created. Later price changes to the ingredient do not reach recipes
//! that were already saved; the line records what the product cost when it
//! was costed.

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{info, warn};

use dogflow_db::DocumentStore;
use dogflow_db::models::{Ingredient, IngredientLine, NewRecipe, Recipe};
use dogflow_db::queries::recipes as recipe_db;

use crate::Upserted;
use crate::catalog;
use crate::error::{EntityKind, OpsError, OpsResult};

/// Round to cents, halves away from zero.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Total cost of a list of lines: `round(Σ quantity × unit_cost, 2)`.
///
/// Fails with [`OpsError::Validation`] when a line or the total does not fit
/// in a `Decimal`.
pub fn compute_cost(lines: &[IngredientLine]) -> OpsResult<Decimal> {
    let total = lines.iter().try_fold(Decimal::ZERO, |acc, line| {
        line.quantity
            .checked_mul(line.unit_cost)
            .and_then(|subtotal| acc.checked_add(subtotal))
            .ok_or_else(|| {
                OpsError::validation(format!(
                    "cost of {} is too large ({} x {})",
                    line.ingredient_name, line.quantity, line.unit_cost
                ))
            })
    })?;
    Ok(round_money(total))
}

/// Copy an ingredient's unit and current cost into a new recipe line.
pub fn snapshot_line(ingredient: &Ingredient, quantity: Decimal) -> IngredientLine {
    IngredientLine {
        ingredient_name: ingredient.name.clone(),
        unit: ingredient.unit.clone(),
        quantity,
        unit_cost: ingredient.unit_cost,
    }
}

/// Resolve `ingredient_name` and snapshot it into a line.
///
/// Fails with [`OpsError::NotFound`] for an unregistered ingredient and
/// [`OpsError::Validation`] for a negative quantity.
pub fn line_for<S: DocumentStore + ?Sized>(
    store: &S,
    ingredient_name: &str,
    quantity: Decimal,
) -> OpsResult<IngredientLine> {
    if quantity < Decimal::ZERO {
        return Err(OpsError::validation(format!(
            "quantity must not be negative (got {quantity})"
        )));
    }
    let ingredient = catalog::find_ingredient(store, ingredient_name)?
        .ok_or_else(|| OpsError::not_found(EntityKind::Ingredient, ingredient_name.trim()))?;
    Ok(snapshot_line(&ingredient, quantity))
}

/// Sale price that yields `margin_percent` of the price as margin:
/// `round(cost / (1 - margin/100), 2)`.
///
/// A margin of 100% or more has no finite positive price and fails with
/// [`OpsError::Domain`].
pub fn derive_price_from_margin(cost: Decimal, margin_percent: Decimal) -> OpsResult<Decimal> {
    if margin_percent >= Decimal::ONE_HUNDRED {
        warn!(%margin_percent, "rejected margin at or above 100%");
        return Err(OpsError::Domain(format!(
            "margin must be below 100% (got {margin_percent}%)"
        )));
    }
    Decimal::ONE
        .checked_sub(margin_percent / Decimal::ONE_HUNDRED)
        .and_then(|divisor| cost.checked_div(divisor))
        .map(round_money)
        .ok_or_else(|| {
            warn!(%cost, %margin_percent, "derived price out of range");
            OpsError::Domain(format!(
                "a {margin_percent}% margin on {cost} has no representable price"
            ))
        })
}

/// Margin as a percentage of the sale price. `0` when there is no price or
/// the price is zero.
///
/// Fails with [`OpsError::Domain`] when the ratio does not fit in a
/// `Decimal`.
pub fn margin_percent(cost: Decimal, price: Option<Decimal>) -> OpsResult<Decimal> {
    let Some(price) = price.filter(|p| !p.is_zero()) else {
        return Ok(Decimal::ZERO);
    };
    price
        .checked_sub(cost)
        .and_then(|gain| gain.checked_div(price))
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map(round_money)
        .ok_or_else(|| {
            OpsError::Domain(format!("margin of a {price} price on a {cost} cost is out of range"))
        })
}

fn validate_price(price: Option<Decimal>) -> OpsResult<()> {
    match price {
        Some(p) if p < Decimal::ZERO => Err(OpsError::validation(format!(
            "sale price must not be negative (got {p})"
        ))),
        _ => Ok(()),
    }
}

/// Save a recipe under `product_name`, replacing any recipe with that name.
///
/// `total_cost` is recomputed from `lines`. Fails with
/// [`OpsError::Validation`] when the name or the line list is empty, or a
/// quantity or the price is negative.
pub fn save_recipe<S: DocumentStore + ?Sized>(
    store: &mut S,
    product_name: &str,
    lines: Vec<IngredientLine>,
    sale_price: Option<Decimal>,
) -> OpsResult<(Recipe, Upserted)> {
    let product_name = product_name.trim();
    if product_name.is_empty() {
        return Err(OpsError::validation("product name must not be empty"));
    }
    if lines.is_empty() {
        return Err(OpsError::validation("recipe needs at least one ingredient"));
    }
    if let Some(line) = lines.iter().find(|l| l.quantity < Decimal::ZERO) {
        return Err(OpsError::validation(format!(
            "quantity of {} must not be negative",
            line.ingredient_name
        )));
    }
    validate_price(sale_price)?;

    let new_recipe = NewRecipe {
        product_name: product_name.to_owned(),
        total_cost: compute_cost(&lines)?,
        ingredient_lines: lines,
        sale_price,
    };

    let (recipe, outcome) = match recipe_db::get_recipe_by_name(store, product_name)? {
        Some(existing) => {
            recipe_db::replace_recipe(store, existing.id, &new_recipe)?;
            let recipe = Recipe {
                id: existing.id,
                product_name: new_recipe.product_name,
                ingredient_lines: new_recipe.ingredient_lines,
                total_cost: new_recipe.total_cost,
                sale_price: new_recipe.sale_price,
            };
            (recipe, Upserted::Updated)
        }
        None => (recipe_db::insert_recipe(store, &new_recipe)?, Upserted::Created),
    };

    info!(
        product = product_name,
        lines = recipe.ingredient_lines.len(),
        total_cost = %recipe.total_cost,
        "recipe saved"
    );
    Ok((recipe, outcome))
}

/// Look up a recipe by its trimmed product name.
pub fn find_recipe<S: DocumentStore + ?Sized>(
    store: &S,
    product_name: &str,
) -> OpsResult<Option<Recipe>> {
    Ok(recipe_db::get_recipe_by_name(store, product_name.trim())?)
}

/// All recipes, ordered by case-insensitive product name.
pub fn list_recipes<S: DocumentStore + ?Sized>(store: &S) -> OpsResult<Vec<Recipe>> {
    let mut recipes = recipe_db::list_recipes(store)?;
    recipes.sort_by_cached_key(|r| r.product_name.to_lowercase());
    Ok(recipes)
}

fn require_recipe<S: DocumentStore + ?Sized>(store: &S, product_name: &str) -> OpsResult<Recipe> {
    find_recipe(store, product_name)?
        .ok_or_else(|| OpsError::not_found(EntityKind::Recipe, product_name.trim()))
}

fn apply_price<S: DocumentStore + ?Sized>(
    store: &mut S,
    mut recipe: Recipe,
    price: Decimal,
) -> OpsResult<Recipe> {
    recipe.total_cost = compute_cost(&recipe.ingredient_lines)?;
    recipe.sale_price = Some(price);
    recipe_db::update_recipe_pricing(store, recipe.id, recipe.total_cost, recipe.sale_price)?;
    info!(product = %recipe.product_name, %price, "sale price updated");
    Ok(recipe)
}

/// Set a recipe's sale price directly. The cached cost is refreshed from
/// the recipe's own lines at the same time.
pub fn set_sale_price<S: DocumentStore + ?Sized>(
    store: &mut S,
    product_name: &str,
    price: Decimal,
) -> OpsResult<Recipe> {
    validate_price(Some(price))?;
    let recipe = require_recipe(store, product_name)?;
    apply_price(store, recipe, price)
}

/// Set a recipe's sale price from a target margin on its current cost.
pub fn set_price_by_margin<S: DocumentStore + ?Sized>(
    store: &mut S,
    product_name: &str,
    margin: Decimal,
) -> OpsResult<Recipe> {
    let recipe = require_recipe(store, product_name)?;
    let price = derive_price_from_margin(compute_cost(&recipe.ingredient_lines)?, margin)?;
    validate_price(Some(price))?;
    apply_price(store, recipe, price)
}
