use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use super::{Collection, DocumentStore, MemoryStore, Query, StoredDoc};
use crate::config::StoreConfig;
use crate::error::StoreError;

/// Document store persisted to a single JSON file.
///
/// The whole file is loaded on [`JsonFileStore::open`]. Every mutation is
/// applied in memory and then flushed: the contents are written to a
/// sibling temp file which is renamed over the target.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    temp_path: PathBuf,
    data: MemoryStore,
}

impl JsonFileStore {
    /// Open the store at `config.path`. A missing or empty file is an empty
    /// store; the file is created on the first write.
    pub fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        let path = config.path.clone();
        let data = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => MemoryStore::default(),
            Ok(contents) => serde_json::from_str(&contents).map_err(|source| {
                StoreError::Corrupt {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => MemoryStore::default(),
            Err(source) => return Err(StoreError::Read { path, source }),
        };

        debug!(path = %path.display(), "store opened");

        Ok(Self {
            path,
            temp_path: config.temp_path(),
            data,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| StoreError::Write {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let contents = serde_json::to_string_pretty(&self.data).map_err(StoreError::Serialize)?;
        fs::write(&self.temp_path, contents).map_err(|source| StoreError::Write {
            path: self.temp_path.clone(),
            source,
        })?;
        fs::rename(&self.temp_path, &self.path).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;

        debug!(path = %self.path.display(), "store flushed");
        Ok(())
    }
}

impl DocumentStore for JsonFileStore {
    fn insert(
        &mut self,
        collection: Collection,
        fields: Map<String, Value>,
    ) -> Result<Uuid, StoreError> {
        let id = self.data.insert(collection, fields)?;
        self.flush()?;
        Ok(id)
    }

    fn insert_many(
        &mut self,
        collection: Collection,
        docs: Vec<Map<String, Value>>,
    ) -> Result<Vec<Uuid>, StoreError> {
        let ids = self.data.insert_many(collection, docs)?;
        self.flush()?;
        Ok(ids)
    }

    fn get(&self, collection: Collection, query: &Query) -> Result<Option<StoredDoc>, StoreError> {
        self.data.get(collection, query)
    }

    fn search(&self, collection: Collection, query: &Query) -> Result<Vec<StoredDoc>, StoreError> {
        self.data.search(collection, query)
    }

    fn all(&self, collection: Collection) -> Result<Vec<StoredDoc>, StoreError> {
        self.data.all(collection)
    }

    fn update(
        &mut self,
        collection: Collection,
        id: Uuid,
        fields: Map<String, Value>,
    ) -> Result<(), StoreError> {
        self.data.update(collection, id, fields)?;
        self.flush()
    }

    fn remove(&mut self, collection: Collection, query: &Query) -> Result<usize, StoreError> {
        let removed = self.data.remove(collection, query)?;
        if removed > 0 {
            self.flush()?;
        }
        Ok(removed)
    }

    fn truncate(&mut self, collection: Collection) -> Result<(), StoreError> {
        self.data.truncate(collection)?;
        self.flush()
    }

    fn get_by_id(&self, collection: Collection, id: Uuid) -> Result<Option<StoredDoc>, StoreError> {
        self.data.get_by_id(collection, id)
    }

    fn len(&self, collection: Collection) -> Result<usize, StoreError> {
        self.data.len(collection)
    }
}
