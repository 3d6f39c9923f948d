//! Filesystem object store. The directory is served over HTTP by the
//! storefront (and admin) under a public base URL.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use url::Url;

use super::{ObjectKey, ObjectStore, as_directory, key_under};
use crate::error::MediaError;

#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
    public_base: Url,
}

impl LocalObjectStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, public_base: Url) -> Self {
        Self {
            root: root.into(),
            public_base: as_directory(public_base),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &ObjectKey) -> PathBuf {
        self.root.join(key.as_str())
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put(
        &self,
        key: &ObjectKey,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<Url, MediaError> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;
        Ok(self.public_base.join(key.as_str())?)
    }

    async fn delete(&self, key: &ObjectKey) -> Result<(), MediaError> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn key_for_url(&self, url: &str) -> Option<ObjectKey> {
        key_under(&self.public_base, url)
    }
}
