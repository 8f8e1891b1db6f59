//! Operator-mode CLI handlers for `dogflow recipe` subcommands.
//!
//! Implements:
//! - `dogflow recipe save <product> --line NAME=QTY .. [--price P]`
//! - `dogflow recipe list`
//! - `dogflow recipe price <product> (--price P | --margin M)`

use std::io::Write;

use anyhow::Result;
use rust_decimal::Decimal;

use dogflow_core::costing;
use dogflow_core::{OpsResult, Upserted};
use dogflow_db::DocumentStore;
use dogflow_db::models::{IngredientLine, Recipe};

use crate::RecipeCommands;
use crate::format;

// -----------------------------------------------------------------------
// Public entry point
// -----------------------------------------------------------------------

/// Dispatch a `RecipeCommands` variant to the appropriate handler.
pub fn run_recipe_command<S, W>(
    command: RecipeCommands,
    store: &mut S,
    out: &mut W,
    currency: &str,
) -> Result<()>
where
    S: DocumentStore + ?Sized,
    W: Write,
{
    match command {
        RecipeCommands::Save {
            product,
            lines,
            price,
        } => {
            let parsed = lines
                .iter()
                .map(|arg| format::parse_line_arg(arg))
                .collect::<Result<Vec<_>>>()?;
            let price = price.as_deref().map(format::parse_decimal).transpose()?;
            let lines = parsed
                .into_iter()
                .map(|(name, qty)| costing::line_for(store, &name, qty))
                .collect::<OpsResult<Vec<IngredientLine>>>()?;
            cmd_save(store, out, currency, &product, lines, price)
        }
        RecipeCommands::List => print_recipes(store, out, currency),
        RecipeCommands::Price {
            product,
            price,
            margin,
        } => {
            let recipe = match (price, margin) {
                (Some(p), _) => costing::set_sale_price(store, &product, format::parse_decimal(&p)?)?,
                (None, Some(m)) => {
                    costing::set_price_by_margin(store, &product, format::parse_decimal(&m)?)?
                }
                (None, None) => anyhow::bail!("either --price or --margin is required"),
            };
            print_price_updated(out, currency, &recipe)
        }
    }
}

// -----------------------------------------------------------------------
// Handlers
// -----------------------------------------------------------------------

pub(crate) fn cmd_save<S, W>(
    store: &mut S,
    out: &mut W,
    currency: &str,
    product: &str,
    lines: Vec<IngredientLine>,
    price: Option<Decimal>,
) -> Result<()>
where
    S: DocumentStore + ?Sized,
    W: Write,
{
    let (recipe, outcome) = costing::save_recipe(store, product, lines, price)?;
    let verb = match outcome {
        Upserted::Created => "saved",
        Upserted::Updated => "updated",
    };
    writeln!(out, "Recipe {verb}.")?;
    writeln!(out, "  Product: {}", recipe.product_name)?;
    writeln!(out, "  Cost:    {}", format::money(currency, recipe.total_cost))?;
    writeln!(out, "  Price:   {}", format::price(currency, recipe.sale_price))?;
    Ok(())
}

pub(crate) fn print_recipes<S, W>(store: &S, out: &mut W, currency: &str) -> Result<()>
where
    S: DocumentStore + ?Sized,
    W: Write,
{
    let recipes = costing::list_recipes(store)?;
    if recipes.is_empty() {
        writeln!(out, "No recipes registered.")?;
        return Ok(());
    }

    for recipe in &recipes {
        writeln!(out, "Product: {}", recipe.product_name)?;
        writeln!(out, "  Total cost: {}", format::money(currency, recipe.total_cost))?;
        writeln!(out, "  Sale price: {}", format::price(currency, recipe.sale_price))?;
        writeln!(out, "  Ingredients:")?;
        for line in &recipe.ingredient_lines {
            writeln!(
                out,
                "    - {}  {} {}  (unit cost: {})",
                line.ingredient_name,
                line.quantity.normalize(),
                line.unit,
                format::money(currency, line.unit_cost)
            )?;
        }
        writeln!(out)?;
    }
    Ok(())
}

pub(crate) fn print_price_updated<W: Write>(out: &mut W, currency: &str, recipe: &Recipe) -> Result<()> {
    writeln!(
        out,
        "Price of {:?} updated: {} (cost {}, margin {}%).",
        recipe.product_name,
        format::price(currency, recipe.sale_price),
        format::money(currency, recipe.total_cost),
        format::percent(costing::margin_percent(recipe.total_cost, recipe.sale_price)?)
    )?;
    Ok(())
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use dogflow_core::catalog;
    use dogflow_db::MemoryStore;

    use super::*;

    fn store_with_ingredients() -> MemoryStore {
        let mut store = MemoryStore::new();
        catalog::upsert_ingredient(&mut store, "Pão", "un", Decimal::from_str("1.20").unwrap())
            .unwrap();
        catalog::upsert_ingredient(&mut store, "Molho", "g", Decimal::from_str("0.05").unwrap())
            .unwrap();
        store
    }

    fn run(store: &mut MemoryStore, command: RecipeCommands) -> Result<String> {
        let mut out = Vec::new();
        run_recipe_command(command, store, &mut out, "R$")?;
        Ok(String::from_utf8(out).unwrap())
    }

    fn save_hot_dog(store: &mut MemoryStore) -> Result<String> {
        run(
            store,
            RecipeCommands::Save {
                product: "Hot Dog".into(),
                lines: vec!["Pão=1".into(), "Molho=30".into()],
                price: None,
            },
        )
    }

    #[test]
    fn save_computes_cost() {
        let mut store = store_with_ingredients();
        let output = save_hot_dog(&mut store).unwrap();
        assert!(output.contains("Cost:    R$ 2,70"), "{output}");
        assert!(output.contains("Price:   —"), "{output}");
    }

    #[test]
    fn save_with_unknown_ingredient_writes_nothing() {
        let mut store = store_with_ingredients();
        let err = run(
            &mut store,
            RecipeCommands::Save {
                product: "X-Tudo".into(),
                lines: vec!["Pão=1".into(), "Queijo=2".into()],
                price: None,
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("Queijo"), "{err}");
        assert!(costing::list_recipes(&store).unwrap().is_empty());
    }

    #[test]
    fn price_by_margin() {
        let mut store = store_with_ingredients();
        save_hot_dog(&mut store).unwrap();

        let output = run(
            &mut store,
            RecipeCommands::Price {
                product: "Hot Dog".into(),
                price: None,
                margin: Some("30".into()),
            },
        )
        .unwrap();
        assert!(output.contains("updated: R$ 3,86"), "{output}");
        assert!(output.contains("margin 30.05%"), "{output}");

        let err = run(
            &mut store,
            RecipeCommands::Price {
                product: "Hot Dog".into(),
                price: None,
                margin: Some("100".into()),
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("below 100%"), "{err}");
    }

    #[test]
    fn oversized_cost_and_margin_are_errors() {
        let mut store = store_with_ingredients();
        catalog::upsert_ingredient(&mut store, "Ouro", "kg", Decimal::MAX).unwrap();
        let err = run(
            &mut store,
            RecipeCommands::Save {
                product: "Barra".into(),
                lines: vec!["Ouro=2".into()],
                price: None,
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("too large"), "{err}");
        assert!(costing::find_recipe(&store, "Barra").unwrap().is_none());

        run(
            &mut store,
            RecipeCommands::Save {
                product: "Fardo de pão".into(),
                lines: vec!["Pão=1000".into()],
                price: None,
            },
        )
        .unwrap();
        let err = run(
            &mut store,
            RecipeCommands::Price {
                product: "Fardo de pão".into(),
                price: None,
                margin: Some("99.99999999999999999999999999".into()),
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("no representable price"), "{err}");
    }

    #[test]
    fn list_shows_lines() {
        let mut store = store_with_ingredients();
        save_hot_dog(&mut store).unwrap();
        let output = run(&mut store, RecipeCommands::List).unwrap();
        assert!(output.contains("Product: Hot Dog"));
        assert!(output.contains("- Molho  30 g  (unit cost: R$ 0,05)"), "{output}");
    }
}
