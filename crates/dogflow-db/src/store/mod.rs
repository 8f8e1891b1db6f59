//! Schema-less document store.
//!
//! Four named collections hold JSON objects, each tagged with a generated
//! `_id`. [`MemoryStore`] keeps everything in process; [`JsonFileStore`]
//! mirrors a memory store to a single JSON file after every mutation.

mod json_file;
mod memory;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::StoreError;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

/// Key under which a document's generated identifier is stored.
pub const ID_FIELD: &str = "_id";

// ---------------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------------

/// The named collections the store persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Templates,
    Checklists,
    Ingredients,
    Recipes,
}

impl Collection {
    /// Every collection, in file order.
    pub const ALL: [Collection; 4] = [
        Self::Templates,
        Self::Checklists,
        Self::Ingredients,
        Self::Recipes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Templates => "templates",
            Self::Checklists => "checklists",
            Self::Ingredients => "ingredients",
            Self::Recipes => "recipes",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Collection {
    type Err = CollectionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "templates" => Ok(Self::Templates),
            "checklists" => Ok(Self::Checklists),
            "ingredients" => Ok(Self::Ingredients),
            "recipes" => Ok(Self::Recipes),
            other => Err(CollectionParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`Collection`] name.
#[derive(Debug, Clone)]
pub struct CollectionParseError(pub String);

impl fmt::Display for CollectionParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid collection: {:?}", self.0)
    }
}

impl std::error::Error for CollectionParseError {}

// ---------------------------------------------------------------------------
// Documents and queries
// ---------------------------------------------------------------------------

/// A stored document: its generated id plus its fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDoc {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl StoredDoc {
    /// Wrap `fields` with a freshly generated id. Any `_id` key already in
    /// `fields` is discarded.
    pub fn new(mut fields: Map<String, Value>) -> Self {
        fields.remove(ID_FIELD);
        Self {
            id: Uuid::new_v4(),
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Merge `fields` into the document, replacing keys that already exist.
    /// The id is never overwritten.
    pub fn merge(&mut self, fields: Map<String, Value>) {
        for (key, value) in fields {
            if key != ID_FIELD {
                self.fields.insert(key, value);
            }
        }
    }

    /// The document as one JSON object, `_id` included.
    pub fn into_value(self) -> Value {
        let mut fields = self.fields;
        fields.insert(ID_FIELD.to_owned(), Value::String(self.id.to_string()));
        Value::Object(fields)
    }
}

/// A conjunction of field-equality conditions.
///
/// An empty query matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    conditions: Vec<(String, Value)>,
}

impl Query {
    /// Match every document.
    pub fn all() -> Self {
        Self::default()
    }

    /// Match documents whose `field` equals `value`.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::all().and(field, value)
    }

    /// Add another equality condition.
    pub fn and(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((field.into(), value.into()));
        self
    }

    pub fn matches(&self, doc: &StoredDoc) -> bool {
        self.conditions
            .iter()
            .all(|(field, value)| doc.fields.get(field) == Some(value))
    }
}

// ---------------------------------------------------------------------------
// Store contract
// ---------------------------------------------------------------------------

/// Operations every store backend provides.
///
/// Writes are visible to subsequent reads on the same handle immediately.
/// There are no transactions: each call either completes or returns an
/// error.
pub trait DocumentStore {
    /// Insert a document and return its generated id.
    fn insert(&mut self, collection: Collection, fields: Map<String, Value>)
    -> Result<Uuid, StoreError>;

    /// Insert several documents, preserving their order.
    fn insert_many(
        &mut self,
        collection: Collection,
        docs: Vec<Map<String, Value>>,
    ) -> Result<Vec<Uuid>, StoreError>;

    /// First document matching `query`, in insertion order.
    fn get(&self, collection: Collection, query: &Query) -> Result<Option<StoredDoc>, StoreError>;

    /// Every document matching `query`, in insertion order.
    fn search(&self, collection: Collection, query: &Query) -> Result<Vec<StoredDoc>, StoreError>;

    /// Every document in the collection, in insertion order.
    fn all(&self, collection: Collection) -> Result<Vec<StoredDoc>, StoreError>;

    /// Merge `fields` into the document with the given id.
    ///
    /// Fails with [`StoreError::DocumentNotFound`] when no such document exists.
    fn update(
        &mut self,
        collection: Collection,
        id: Uuid,
        fields: Map<String, Value>,
    ) -> Result<(), StoreError>;

    /// Delete every document matching `query`; returns how many were removed.
    fn remove(&mut self, collection: Collection, query: &Query) -> Result<usize, StoreError>;

    /// Delete every document in the collection.
    fn truncate(&mut self, collection: Collection) -> Result<(), StoreError>;

    fn get_by_id(&self, collection: Collection, id: Uuid) -> Result<Option<StoredDoc>, StoreError> {
        Ok(self.all(collection)?.into_iter().find(|doc| doc.id == id))
    }

    fn len(&self, collection: Collection) -> Result<usize, StoreError> {
        Ok(self.all(collection)?.len())
    }
}
