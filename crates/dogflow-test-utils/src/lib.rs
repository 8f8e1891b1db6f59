//! Shared fixtures for DogFlow integration tests.
//!
//! Provides fresh stores (in memory or backed by a temp JSON file) and a
//! few seeded records that mirror a real counter: the ten-step "Abertura"
//! opening checklist and the hot-dog ingredients.

use std::str::FromStr;

use rust_decimal::Decimal;
use tempfile::TempDir;

use dogflow_db::config::StoreConfig;
use dogflow_db::models::{Ingredient, NewIngredient, NewTemplate, Template};
use dogflow_db::queries::{ingredients, templates};
use dogflow_db::{JsonFileStore, MemoryStore};

/// Name of the seeded ten-item template.
pub const ABERTURA: &str = "Abertura";

/// Parse a decimal literal. Panics on malformed input.
pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap_or_else(|e| panic!("invalid decimal literal {s:?}: {e}"))
}

/// An empty in-memory store.
pub fn memory_store() -> MemoryStore {
    MemoryStore::new()
}

/// A JSON-file store inside a fresh temp directory.
///
/// Returns `(store, config, dir)`; keep `dir` alive for the duration of the
/// test, and use `config` to reopen the same file.
pub fn temp_json_store() -> (JsonFileStore, StoreConfig, TempDir) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let config = StoreConfig::new(dir.path().join("dogflow_db.json"));
    let store = JsonFileStore::open(&config).expect("failed to open temp store");
    (store, config, dir)
}

/// Insert the "Abertura" template with ten numbered steps.
pub fn seed_abertura(store: &mut MemoryStore) -> Template {
    let items = (1..=10).map(|i| format!("Passo {i:02}"));
    templates::insert_template(store, &NewTemplate::new(ABERTURA, items))
        .expect("failed to seed template")
}

/// Insert "Pão" (un, 1.20) and "Molho" (g, 0.05).
pub fn seed_hot_dog_ingredients(store: &mut MemoryStore) -> (Ingredient, Ingredient) {
    let pao = ingredients::insert_ingredient(
        store,
        &NewIngredient {
            name: "Pão".to_owned(),
            unit: "un".to_owned(),
            unit_cost: dec("1.20"),
        },
    )
    .expect("failed to seed Pão");
    let molho = ingredients::insert_ingredient(
        store,
        &NewIngredient {
            name: "Molho".to_owned(),
            unit: "g".to_owned(),
            unit_cost: dec("0.05"),
        },
    )
    .expect("failed to seed Molho");
    (pao, molho)
}
