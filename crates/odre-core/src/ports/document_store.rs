use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  /// No se pudo hablar con el almacén (red, conexión cerrada…).
  #[error("store unavailable: {0}")]
  Unavailable(String),

  #[error("storage error: {0}")]
  Storage(String),
}

/// Port de almacén de documentos con clave exacta.
///
/// La clave es siempre la fecha canónica `YYYY-MM-DD`. `upsert_by_key`
/// reemplaza el documento completo y debe ser atómico frente a lecturas
/// concurrentes de la misma clave: se ve el documento anterior o el nuevo,
/// nunca una escritura a medias.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
  async fn get_by_key(&self, key: &str) -> Result<Option<Value>, StoreError>;
  async fn upsert_by_key(&self, key: &str, document: Value) -> Result<(), StoreError>;
  async fn delete_by_key(&self, key: &str) -> Result<(), StoreError>;
}
