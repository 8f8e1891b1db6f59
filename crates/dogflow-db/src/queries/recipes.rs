//! Query functions for the `recipes` collection.

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::{decode, decode_all, encode};
use crate::error::StoreError;
use crate::models::{NewRecipe, Recipe};
use crate::store::{Collection, DocumentStore, Query};

const COLLECTION: Collection = Collection::Recipes;

#[derive(Serialize)]
struct PricingUpdate {
    total_cost: Decimal,
    sale_price: Option<Decimal>,
}

/// Insert a recipe and return it with its generated id.
pub fn insert_recipe<S: DocumentStore + ?Sized>(
    store: &mut S,
    recipe: &NewRecipe,
) -> Result<Recipe, StoreError> {
    let id = store.insert(COLLECTION, encode(COLLECTION, recipe)?)?;
    Ok(Recipe {
        id,
        product_name: recipe.product_name.clone(),
        ingredient_lines: recipe.ingredient_lines.clone(),
        total_cost: recipe.total_cost,
        sale_price: recipe.sale_price,
    })
}

/// Fetch a recipe by exact product name.
pub fn get_recipe_by_name<S: DocumentStore + ?Sized>(
    store: &S,
    product_name: &str,
) -> Result<Option<Recipe>, StoreError> {
    store
        .get(COLLECTION, &Query::eq("product_name", product_name))?
        .map(|doc| decode(COLLECTION, doc))
        .transpose()
}

/// List every recipe, in insertion order.
pub fn list_recipes<S: DocumentStore + ?Sized>(store: &S) -> Result<Vec<Recipe>, StoreError> {
    decode_all(COLLECTION, store.all(COLLECTION)?)
}

/// Overwrite every field of an existing recipe.
pub fn replace_recipe<S: DocumentStore + ?Sized>(
    store: &mut S,
    id: Uuid,
    recipe: &NewRecipe,
) -> Result<(), StoreError> {
    store.update(COLLECTION, id, encode(COLLECTION, recipe)?)
}

/// Overwrite the cached cost and the sale price of a recipe.
pub fn update_recipe_pricing<S: DocumentStore + ?Sized>(
    store: &mut S,
    id: Uuid,
    total_cost: Decimal,
    sale_price: Option<Decimal>,
) -> Result<(), StoreError> {
    store.update(
        COLLECTION,
        id,
        encode(
            COLLECTION,
            &PricingUpdate {
                total_cost,
                sale_price,
            },
        )?,
    )
}
