//! Query functions for the `checklists` collection.

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use super::{decode, decode_all, encode};
use crate::error::StoreError;
use crate::models::{Checklist, ChecklistItem, NewChecklist};
use crate::store::{Collection, DocumentStore, Query};

const COLLECTION: Collection = Collection::Checklists;

#[derive(Serialize)]
struct ItemsUpdate<'a> {
    items: &'a [ChecklistItem],
}

fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Insert a checklist and return it with its generated id.
pub fn insert_checklist<S: DocumentStore + ?Sized>(
    store: &mut S,
    checklist: &NewChecklist,
) -> Result<Checklist, StoreError> {
    let id = store.insert(COLLECTION, encode(COLLECTION, checklist)?)?;
    Ok(Checklist {
        id,
        date: checklist.date,
        template_name: checklist.template_name.clone(),
        items: checklist.items.clone(),
    })
}

/// Fetch the checklist for a `(date, template_name)` key.
pub fn get_checklist<S: DocumentStore + ?Sized>(
    store: &S,
    date: NaiveDate,
    template_name: &str,
) -> Result<Option<Checklist>, StoreError> {
    let query = Query::eq("date", date_key(date)).and("template_name", template_name);
    store
        .get(COLLECTION, &query)?
        .map(|doc| decode(COLLECTION, doc))
        .transpose()
}

/// List the checklists for one date, in insertion order.
pub fn list_checklists_for_date<S: DocumentStore + ?Sized>(
    store: &S,
    date: NaiveDate,
) -> Result<Vec<Checklist>, StoreError> {
    decode_all(
        COLLECTION,
        store.search(COLLECTION, &Query::eq("date", date_key(date)))?,
    )
}

/// List every checklist, in insertion order.
pub fn list_checklists<S: DocumentStore + ?Sized>(store: &S) -> Result<Vec<Checklist>, StoreError> {
    decode_all(COLLECTION, store.all(COLLECTION)?)
}

/// Write back the full item list of a checklist.
pub fn update_checklist_items<S: DocumentStore + ?Sized>(
    store: &mut S,
    id: Uuid,
    items: &[ChecklistItem],
) -> Result<(), StoreError> {
    store.update(COLLECTION, id, encode(COLLECTION, &ItemsUpdate { items })?)
}
