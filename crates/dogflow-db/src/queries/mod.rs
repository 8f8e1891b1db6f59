//! Typed query functions, one module per collection.
//!
//! Each function converts between store documents and the records in
//! [`crate::models`]. Documents that do not decode into their record type
//! are rejected with [`StoreError::Decode`].

pub mod checklists;
pub mod ingredients;
pub mod recipes;
pub mod templates;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::StoreError;
use crate::store::{Collection, StoredDoc};

/// Serialize `record` into the field map of a `collection` document.
pub(crate) fn encode<T: Serialize>(
    collection: Collection,
    record: &T,
) -> Result<Map<String, Value>, StoreError> {
    match serde_json::to_value(record) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(_) => Err(StoreError::NotAnObject { collection }),
        Err(source) => Err(StoreError::Encode { collection, source }),
    }
}

/// Deserialize a stored document (including its `_id`) into a record.
pub(crate) fn decode<T: DeserializeOwned>(
    collection: Collection,
    doc: StoredDoc,
) -> Result<T, StoreError> {
    serde_json::from_value(doc.into_value())
        .map_err(|source| StoreError::Decode { collection, source })
}

pub(crate) fn decode_all<T: DeserializeOwned>(
    collection: Collection,
    docs: Vec<StoredDoc>,
) -> Result<Vec<T>, StoreError> {
    docs.into_iter().map(|doc| decode(collection, doc)).collect()
}
