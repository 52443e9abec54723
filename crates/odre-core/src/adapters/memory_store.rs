use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::ports::{DocumentStore, StoreError};

/// Implementación de `DocumentStore` en memoria.
///
/// Útil para tests y para trabajar sin base de datos. Cada operación se hace
/// bajo un único bloqueo, así que un upsert es atómico frente a las lecturas.
/// Los clones comparten el mismo mapa.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentStore {
  documents: Arc<Mutex<HashMap<String, Value>>>,
}

impl InMemoryDocumentStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.documents.lock().map(|docs| docs.len()).unwrap_or(0)
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

fn poisoned<T>(_: T) -> StoreError {
  StoreError::Storage("in-memory store mutex poisoned".to_string())
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
  async fn get_by_key(&self, key: &str) -> Result<Option<Value>, StoreError> {
    let docs = self.documents.lock().map_err(poisoned)?;
    Ok(docs.get(key).cloned())
  }

  async fn upsert_by_key(&self, key: &str, document: Value) -> Result<(), StoreError> {
    let mut docs = self.documents.lock().map_err(poisoned)?;
    docs.insert(key.to_string(), document);
    Ok(())
  }

  async fn delete_by_key(&self, key: &str) -> Result<(), StoreError> {
    let mut docs = self.documents.lock().map_err(poisoned)?;
    docs.remove(key);
    Ok(())
  }
}
