use std::fmt;

use thiserror::Error;

use dogflow_db::StoreError;

/// Kinds of record an operation can fail to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Template,
    Checklist,
    Ingredient,
    Recipe,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Template => "template",
            Self::Checklist => "checklist",
            Self::Ingredient => "ingredient",
            Self::Recipe => "recipe",
        };
        f.write_str(s)
    }
}

/// Errors returned by catalog, costing, session and report operations.
///
/// Everything except [`OpsError::Store`] is reported to the operator and the
/// operation is abandoned without writing anything.
#[derive(Debug, Error)]
pub enum OpsError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("{kind} {name:?} not found")]
    NotFound { kind: EntityKind, name: String },

    #[error("{0}")]
    Domain(String),

    #[error("item {} is out of range (checklist has {len} items)", .index + 1)]
    Index { index: usize, len: usize },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl OpsError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub(crate) fn not_found(kind: EntityKind, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    /// Store failures cannot be fixed by re-entering input.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}

pub type OpsResult<T> = Result<T, OpsError>;
