//! Storage layer for DogFlow.
//!
//! A small schema-less document store (four named collections of JSON
//! objects) plus the typed records and per-collection query functions the
//! rest of the workspace uses.

pub mod config;
pub mod error;
pub mod models;
pub mod queries;
pub mod store;

pub use error::StoreError;
pub use store::{Collection, DocumentStore, JsonFileStore, MemoryStore, Query, StoredDoc};
