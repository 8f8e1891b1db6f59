//! Operator-mode CLI handlers for `dogflow ingredient` subcommands.

use std::io::Write;

use anyhow::Result;
use rust_decimal::Decimal;

use dogflow_core::{Upserted, catalog};
use dogflow_db::DocumentStore;

use crate::IngredientCommands;
use crate::format;

/// Dispatch an `IngredientCommands` variant to the appropriate handler.
pub fn run_ingredient_command<S, W>(
    command: IngredientCommands,
    store: &mut S,
    out: &mut W,
    currency: &str,
) -> Result<()>
where
    S: DocumentStore + ?Sized,
    W: Write,
{
    match command {
        IngredientCommands::Add { name, unit, cost } => {
            let cost = format::parse_decimal(&cost)?;
            cmd_add(store, out, currency, &name, &unit, cost)
        }
        IngredientCommands::List => print_ingredients(store, out, currency),
    }
}

pub(crate) fn cmd_add<S, W>(
    store: &mut S,
    out: &mut W,
    currency: &str,
    name: &str,
    unit: &str,
    cost: Decimal,
) -> Result<()>
where
    S: DocumentStore + ?Sized,
    W: Write,
{
    let (ingredient, outcome) = catalog::upsert_ingredient(store, name, unit, cost)?;
    let verb = match outcome {
        Upserted::Created => "registered",
        Upserted::Updated => "updated",
    };
    writeln!(
        out,
        "Ingredient {:?} {verb}: {} per {}.",
        ingredient.name,
        format::money(currency, ingredient.unit_cost),
        ingredient.unit
    )?;
    Ok(())
}

pub(crate) fn print_ingredients<S, W>(store: &S, out: &mut W, currency: &str) -> Result<()>
where
    S: DocumentStore + ?Sized,
    W: Write,
{
    let ingredients = catalog::list_ingredients(store)?;
    if ingredients.is_empty() {
        writeln!(out, "No ingredients registered.")?;
        return Ok(());
    }

    writeln!(out, "{:<30} {:<6} {:>14}", "INGREDIENT", "UNIT", "UNIT COST")?;
    writeln!(out, "{}", "-".repeat(52))?;
    for ingredient in &ingredients {
        writeln!(
            out,
            "{:<30} {:<6} {:>14}",
            format::truncate(&ingredient.name, 30),
            ingredient.unit,
            format::money(currency, ingredient.unit_cost)
        )?;
    }
    Ok(())
}
