//! Query functions for the `templates` collection.

use uuid::Uuid;

use super::{decode, decode_all, encode};
use crate::error::StoreError;
use crate::models::{NewTemplate, Template};
use crate::store::{Collection, DocumentStore, Query};

const COLLECTION: Collection = Collection::Templates;

/// Insert a template and return it with its generated id.
pub fn insert_template<S: DocumentStore + ?Sized>(
    store: &mut S,
    template: &NewTemplate,
) -> Result<Template, StoreError> {
    let id = store.insert(COLLECTION, encode(COLLECTION, template)?)?;
    Ok(Template {
        id,
        name: template.name.clone(),
        items: template.items.clone(),
    })
}

/// Bulk-insert templates in order. Returns how many were inserted.
pub fn insert_templates<S: DocumentStore + ?Sized>(
    store: &mut S,
    templates: &[NewTemplate],
) -> Result<usize, StoreError> {
    let docs = templates
        .iter()
        .map(|t| encode(COLLECTION, t))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(store.insert_many(COLLECTION, docs)?.len())
}

/// Fetch a template by exact name.
pub fn get_template_by_name<S: DocumentStore + ?Sized>(
    store: &S,
    name: &str,
) -> Result<Option<Template>, StoreError> {
    store
        .get(COLLECTION, &Query::eq("name", name))?
        .map(|doc| decode(COLLECTION, doc))
        .transpose()
}

/// List all templates in insertion order.
pub fn list_templates<S: DocumentStore + ?Sized>(store: &S) -> Result<Vec<Template>, StoreError> {
    decode_all(COLLECTION, store.all(COLLECTION)?)
}

/// Overwrite the name and items of an existing template.
pub fn replace_template<S: DocumentStore + ?Sized>(
    store: &mut S,
    id: Uuid,
    template: &NewTemplate,
) -> Result<(), StoreError> {
    store.update(COLLECTION, id, encode(COLLECTION, template)?)
}

/// Delete templates with the given name. Returns how many were removed.
pub fn delete_template_by_name<S: DocumentStore + ?Sized>(
    store: &mut S,
    name: &str,
) -> Result<usize, StoreError> {
    store.remove(COLLECTION, &Query::eq("name", name))
}

/// Remove every template.
pub fn clear_templates<S: DocumentStore + ?Sized>(store: &mut S) -> Result<(), StoreError> {
    store.truncate(COLLECTION)
}

pub fn count_templates<S: DocumentStore + ?Sized>(store: &S) -> Result<usize, StoreError> {
    store.len(COLLECTION)
}
