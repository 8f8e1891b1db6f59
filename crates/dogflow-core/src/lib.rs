//! Business logic for DogFlow: template and ingredient catalog, recipe
//! costing, daily checklist sessions, and read-only reports.
//!
//! Every operation takes the store handle explicitly, so the same code runs
//! against the JSON file in production and an in-memory store in tests.

pub mod catalog;
pub mod costing;
pub mod error;
pub mod report;
pub mod session;

pub use error::{EntityKind, OpsError, OpsResult};

/// Whether an upsert created a new record or overwrote an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upserted {
    Created,
    Updated,
}
