use std::io;
use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

use crate::store::Collection;

/// Errors raised by the document store and the typed query layer.
///
/// None of these are recoverable by re-entering input: callers treat them
/// as fatal.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read store file {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write store file {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("store file {} is not valid JSON: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to serialize store contents: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("document {id} not found in {collection}")]
    DocumentNotFound { collection: Collection, id: Uuid },

    #[error("malformed {collection} document: {source}")]
    Decode {
        collection: Collection,
        source: serde_json::Error,
    },

    #[error("failed to encode {collection} document: {source}")]
    Encode {
        collection: Collection,
        source: serde_json::Error,
    },

    #[error("{collection} document must be a JSON object")]
    NotAnObject { collection: Collection },
}
