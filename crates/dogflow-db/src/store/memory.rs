use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::{Collection, DocumentStore, Query, StoredDoc};
use crate::error::StoreError;

/// In-process document store.
///
/// Also the on-disk layout of [`super::JsonFileStore`]: one array of
/// documents per collection, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryStore {
    #[serde(default)]
    templates: Vec<StoredDoc>,
    #[serde(default)]
    checklists: Vec<StoredDoc>,
    #[serde(default)]
    ingredients: Vec<StoredDoc>,
    #[serde(default)]
    recipes: Vec<StoredDoc>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn docs(&self, collection: Collection) -> &Vec<StoredDoc> {
        match collection {
            Collection::Templates => &self.templates,
            Collection::Checklists => &self.checklists,
            Collection::Ingredients => &self.ingredients,
            Collection::Recipes => &self.recipes,
        }
    }

    fn docs_mut(&mut self, collection: Collection) -> &mut Vec<StoredDoc> {
        match collection {
            Collection::Templates => &mut self.templates,
            Collection::Checklists => &mut self.checklists,
            Collection::Ingredients => &mut self.ingredients,
            Collection::Recipes => &mut self.recipes,
        }
    }
}

impl DocumentStore for MemoryStore {
    fn insert(
        &mut self,
        collection: Collection,
        fields: Map<String, Value>,
    ) -> Result<Uuid, StoreError> {
        let doc = StoredDoc::new(fields);
        let id = doc.id;
        self.docs_mut(collection).push(doc);
        Ok(id)
    }

    fn insert_many(
        &mut self,
        collection: Collection,
        docs: Vec<Map<String, Value>>,
    ) -> Result<Vec<Uuid>, StoreError> {
        let target = self.docs_mut(collection);
        let mut ids = Vec::with_capacity(docs.len());
        for fields in docs {
            let doc = StoredDoc::new(fields);
            ids.push(doc.id);
            target.push(doc);
        }
        Ok(ids)
    }

    fn get(&self, collection: Collection, query: &Query) -> Result<Option<StoredDoc>, StoreError> {
        Ok(self
            .docs(collection)
            .iter()
            .find(|doc| query.matches(doc))
            .cloned())
    }

    fn search(&self, collection: Collection, query: &Query) -> Result<Vec<StoredDoc>, StoreError> {
        Ok(self
            .docs(collection)
            .iter()
            .filter(|doc| query.matches(doc))
            .cloned()
            .collect())
    }

    fn all(&self, collection: Collection) -> Result<Vec<StoredDoc>, StoreError> {
        Ok(self.docs(collection).clone())
    }

    fn update(
        &mut self,
        collection: Collection,
        id: Uuid,
        fields: Map<String, Value>,
    ) -> Result<(), StoreError> {
        let doc = self
            .docs_mut(collection)
            .iter_mut()
            .find(|doc| doc.id == id)
            .ok_or(StoreError::DocumentNotFound { collection, id })?;
        doc.merge(fields);
        Ok(())
    }

    fn remove(&mut self, collection: Collection, query: &Query) -> Result<usize, StoreError> {
        let docs = self.docs_mut(collection);
        let before = docs.len();
        docs.retain(|doc| !query.matches(doc));
        Ok(before - docs.len())
    }

    fn truncate(&mut self, collection: Collection) -> Result<(), StoreError> {
        self.docs_mut(collection).clear();
        Ok(())
    }

    fn get_by_id(&self, collection: Collection, id: Uuid) -> Result<Option<StoredDoc>, StoreError> {
        Ok(self.docs(collection).iter().find(|doc| doc.id == id).cloned())
    }

    fn len(&self, collection: Collection) -> Result<usize, StoreError> {
        Ok(self.docs(collection).len())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected a JSON object"),
        }
    }

    #[test]
    fn insert_then_get_and_all() {
        let mut store = MemoryStore::new();
        let id = store
            .insert(Collection::Ingredients, object(json!({"name": "Pão"})))
            .unwrap();

        let found = store
            .get(Collection::Ingredients, &Query::eq("name", "Pão"))
            .unwrap()
            .expect("document should exist");
        assert_eq!(found.id, id);
        assert_eq!(store.all(Collection::Ingredients).unwrap().len(), 1);
        assert_eq!(store.len(Collection::Recipes).unwrap(), 0);
    }

    #[test]
    fn insert_many_preserves_order() {
        let mut store = MemoryStore::new();
        let ids = store
            .insert_many(
                Collection::Templates,
                vec![
                    object(json!({"name": "B"})),
                    object(json!({"name": "A"})),
                    object(json!({"name": "C"})),
                ],
            )
            .unwrap();

        let all = store.all(Collection::Templates).unwrap();
        let stored_ids: Vec<Uuid> = all.iter().map(|d| d.id).collect();
        assert_eq!(stored_ids, ids);
        assert_eq!(all[0].field("name"), Some(&json!("B")));
    }

    #[test]
    fn update_merges_fields() {
        let mut store = MemoryStore::new();
        let id = store
            .insert(
                Collection::Ingredients,
                object(json!({"name": "Molho", "unit": "g", "unit_cost": "0.04"})),
            )
            .unwrap();

        store
            .update(Collection::Ingredients, id, object(json!({"unit_cost": "0.05"})))
            .unwrap();

        let doc = store.get_by_id(Collection::Ingredients, id).unwrap().unwrap();
        assert_eq!(doc.field("unit"), Some(&json!("g")));
        assert_eq!(doc.field("unit_cost"), Some(&json!("0.05")));
    }

    #[test]
    fn update_missing_id_errors() {
        let mut store = MemoryStore::new();
        let err = store
            .update(Collection::Recipes, Uuid::new_v4(), Map::new())
            .unwrap_err();
        assert!(matches!(err, StoreError::DocumentNotFound { collection: Collection::Recipes, .. }));
    }

    #[test]
    fn remove_and_truncate_are_scoped_to_collection() {
        let mut store = MemoryStore::new();
        store
            .insert(Collection::Templates, object(json!({"name": "Abertura"})))
            .unwrap();
        store
            .insert(Collection::Templates, object(json!({"name": "Fechamento"})))
            .unwrap();
        store
            .insert(Collection::Checklists, object(json!({"template_name": "Abertura"})))
            .unwrap();

        let removed = store
            .remove(Collection::Templates, &Query::eq("name", "Abertura"))
            .unwrap();
        assert_eq!(removed, 1);
        assert_eq!(store.len(Collection::Templates).unwrap(), 1);

        store.truncate(Collection::Templates).unwrap();
        assert_eq!(store.len(Collection::Templates).unwrap(), 0);
        assert_eq!(store.len(Collection::Checklists).unwrap(), 1);
    }
}
