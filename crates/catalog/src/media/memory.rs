//! In-memory object store for tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use url::Url;

use super::{ObjectKey, ObjectStore, key_under};
use crate::error::MediaError;

const PUBLIC_BASE: &str = "https://media.twinkle.test/";

#[derive(Debug, Clone, Default)]
pub struct MemoryObjectStore {
    objects: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryObjectStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.read().await.get(key).cloned()
    }

    /// Stored keys, sorted.
    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }

    fn base() -> Result<Url, MediaError> {
        Ok(Url::parse(PUBLIC_BASE)?)
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(
        &self,
        key: &ObjectKey,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<Url, MediaError> {
        self.objects
            .write()
            .await
            .insert(key.as_str().to_owned(), bytes);
        Ok(Self::base()?.join(key.as_str())?)
    }

    async fn delete(&self, key: &ObjectKey) -> Result<(), MediaError> {
        self.objects.write().await.remove(key.as_str());
        Ok(())
    }

    fn key_for_url(&self, url: &str) -> Option<ObjectKey> {
        key_under(&Self::base().ok()?, url)
    }
}
