//! Query functions for the `ingredients` collection.

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::{decode, decode_all, encode};
use crate::error::StoreError;
use crate::models::{Ingredient, NewIngredient};
use crate::store::{Collection, DocumentStore, Query};

const COLLECTION: Collection = Collection::Ingredients;

#[derive(Serialize)]
struct CostUpdate<'a> {
    unit: &'a str,
    unit_cost: Decimal,
}

/// Insert an ingredient and return it with its generated id.
pub fn insert_ingredient<S: DocumentStore + ?Sized>(
    store: &mut S,
    ingredient: &NewIngredient,
) -> Result<Ingredient, StoreError> {
    let id = store.insert(COLLECTION, encode(COLLECTION, ingredient)?)?;
    Ok(Ingredient {
        id,
        name: ingredient.name.clone(),
        unit: ingredient.unit.clone(),
        unit_cost: ingredient.unit_cost,
    })
}

/// Fetch an ingredient by exact name.
pub fn get_ingredient_by_name<S: DocumentStore + ?Sized>(
    store: &S,
    name: &str,
) -> Result<Option<Ingredient>, StoreError> {
    store
        .get(COLLECTION, &Query::eq("name", name))?
        .map(|doc| decode(COLLECTION, doc))
        .transpose()
}

/// Every ingredient registered under `name` (more than one means the
/// collection was edited by hand).
pub fn search_ingredients_by_name<S: DocumentStore + ?Sized>(
    store: &S,
    name: &str,
) -> Result<Vec<Ingredient>, StoreError> {
    decode_all(COLLECTION, store.search(COLLECTION, &Query::eq("name", name))?)
}

/// List every ingredient, in insertion order.
pub fn list_ingredients<S: DocumentStore + ?Sized>(
    store: &S,
) -> Result<Vec<Ingredient>, StoreError> {
    decode_all(COLLECTION, store.all(COLLECTION)?)
}

/// Overwrite the unit and unit cost of an existing ingredient.
pub fn update_ingredient_cost<S: DocumentStore + ?Sized>(
    store: &mut S,
    id: Uuid,
    unit: &str,
    unit_cost: Decimal,
) -> Result<(), StoreError> {
    store.update(COLLECTION, id, encode(COLLECTION, &CostUpdate { unit, unit_cost })?)
}
