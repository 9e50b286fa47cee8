//! Document store port, the in-memory client, and the typed adapter that translates store
//! failures into routing faults.

use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::domain::{FieldViolation, LocalAuthority, RoutingDetail};
use super::faults::Fault;
use super::responses::OperationKind;

/// Address of one document: its collection and id within it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentPath {
    pub collection: String,
    pub id: String,
}

impl DocumentPath {
    pub fn new(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            id: id.into(),
        }
    }
}

impl std::fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("document {0} not found")]
    NotFound(DocumentPath),
    #[error("document {0} already exists")]
    Conflict(DocumentPath),
    #[error("request rate too large, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },
    #[error("document store unavailable: {0}")]
    Unavailable(String),
    #[error("document could not be serialized")]
    Serialization(#[source] serde_json::Error),
}

/// Raw JSON document database client.
#[async_trait]
pub trait DocumentClient: Send + Sync {
    async fn exists(&self, path: &DocumentPath) -> Result<bool, StoreError>;
    /// Inserts only when `path` is free; an occupied key fails with [`StoreError::Conflict`].
    async fn create(&self, path: &DocumentPath, document: Value) -> Result<Value, StoreError>;
    async fn read(&self, path: &DocumentPath) -> Result<Value, StoreError>;
    async fn delete(&self, path: &DocumentPath) -> Result<(), StoreError>;
    async fn list(&self, collection: &str) -> Result<Vec<Value>, StoreError>;
}

/// Process-local document client, ordered by path.
#[derive(Default)]
pub struct InMemoryDocumentClient {
    documents: RwLock<BTreeMap<DocumentPath, Value>>,
}

impl InMemoryDocumentClient {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Unavailable("in-memory store lock poisoned".to_string())
}

#[async_trait]
impl DocumentClient for InMemoryDocumentClient {
    async fn exists(&self, path: &DocumentPath) -> Result<bool, StoreError> {
        let documents = self.documents.read().map_err(poisoned)?;
        Ok(documents.contains_key(path))
    }

    async fn create(&self, path: &DocumentPath, document: Value) -> Result<Value, StoreError> {
        let mut documents = self.documents.write().map_err(poisoned)?;
        if documents.contains_key(path) {
            return Err(StoreError::Conflict(path.clone()));
        }
        documents.insert(path.clone(), document.clone());
        Ok(document)
    }

    async fn read(&self, path: &DocumentPath) -> Result<Value, StoreError> {
        let documents = self.documents.read().map_err(poisoned)?;
        documents
            .get(path)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(path.clone()))
    }

    async fn delete(&self, path: &DocumentPath) -> Result<(), StoreError> {
        let mut documents = self.documents.write().map_err(poisoned)?;
        documents
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(path.clone()))
    }

    async fn list(&self, collection: &str) -> Result<Vec<Value>, StoreError> {
        let documents = self.documents.read().map_err(poisoned)?;
        Ok(documents
            .iter()
            .filter(|(path, _)| path.collection == collection)
            .map(|(_, document)| document.clone())
            .collect())
    }
}

/// A record type persisted through [`DocumentStore`].
pub trait Document: Serialize + DeserializeOwned + Send + Sync + 'static {
    const COLLECTION: &'static str;
    /// Human readable name used in fault messages.
    const LABEL: &'static str;

    fn key(&self) -> &str;
    fn violations(&self) -> Vec<FieldViolation>;
}

impl Document for RoutingDetail {
    const COLLECTION: &'static str = "routing";
    const LABEL: &'static str = "routing detail";

    fn key(&self) -> &str {
        &self.touchpoint_id
    }

    fn violations(&self) -> Vec<FieldViolation> {
        RoutingDetail::violations(self)
    }
}

impl Document for LocalAuthority {
    const COLLECTION: &'static str = "authorities";
    const LABEL: &'static str = "local authority";

    fn key(&self) -> &str {
        &self.lad_code
    }

    fn violations(&self) -> Vec<FieldViolation> {
        LocalAuthority::violations(self)
    }
}

/// Store-level operations; each is served under one [`OperationKind`] fault table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    GetByLocation,
    GetById,
    GetAll,
    Post,
    Delete,
}

impl StoreOperation {
    pub fn kind(self) -> OperationKind {
        match self {
            StoreOperation::GetByLocation | StoreOperation::GetById | StoreOperation::GetAll => {
                OperationKind::Get
            }
            StoreOperation::Post => OperationKind::Post,
            StoreOperation::Delete => OperationKind::Delete,
        }
    }
}

/// Typed view over one collection of a [`DocumentClient`].
pub struct DocumentStore<T> {
    client: Arc<dyn DocumentClient>,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for DocumentStore<T> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            _record: PhantomData,
        }
    }
}

impl<T: Document> DocumentStore<T> {
    pub fn new(client: Arc<dyn DocumentClient>) -> Self {
        Self {
            client,
            _record: PhantomData,
        }
    }

    fn path(id: &str) -> DocumentPath {
        DocumentPath::new(T::COLLECTION, id)
    }

    pub async fn get(&self, id: &str) -> Result<T, Fault> {
        let document = self
            .client
            .read(&Self::path(id))
            .await
            .map_err(translate::<T>)?;
        decode(document)
    }

    pub async fn get_all(&self) -> Result<Vec<T>, Fault> {
        let documents = self
            .client
            .list(T::COLLECTION)
            .await
            .map_err(translate::<T>)?;
        documents.into_iter().map(decode).collect()
    }

    /// Creates `record`, refusing keys that already exist.
    ///
    /// The existence pre-check gives the common duplicate a cheap answer; the conditional create
    /// catches writers that race past it, and both surface as `ConflictingResource`.
    pub async fn add(&self, record: T) -> Result<T, Fault> {
        let path = Self::path(record.key());
        if self.client.exists(&path).await.map_err(translate::<T>)? {
            return Err(conflict::<T>(&path));
        }

        let document = serde_json::to_value(&record)
            .map_err(|err| Fault::Store(StoreError::Serialization(err)))?;
        let stored = self
            .client
            .create(&path, document)
            .await
            .map_err(translate::<T>)?;
        decode(stored)
    }

    pub async fn delete(&self, id: &str) -> Result<(), Fault> {
        let path = Self::path(id);
        if !self.client.exists(&path).await.map_err(translate::<T>)? {
            return Err(not_found::<T>(&path));
        }
        self.client.delete(&path).await.map_err(translate::<T>)
    }
}

fn decode<T: Document>(document: Value) -> Result<T, Fault> {
    serde_json::from_value(document).map_err(|err| Fault::Store(StoreError::Serialization(err)))
}

fn translate<T: Document>(err: StoreError) -> Fault {
    match err {
        StoreError::NotFound(path) => not_found::<T>(&path),
        StoreError::Conflict(path) => conflict::<T>(&path),
        other => Fault::Store(other),
    }
}

fn not_found<T: Document>(path: &DocumentPath) -> Fault {
    Fault::no_content(format!("{} '{}' does not exist", T::LABEL, path.id))
}

fn conflict<T: Document>(path: &DocumentPath) -> Fault {
    Fault::ConflictingResource(format!("{} '{}' already exists", T::LABEL, path.id))
}
