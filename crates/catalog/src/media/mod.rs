//! Product image storage.
//!
//! Uploaded images are written under `products/{unix_millis}_{filename}` and
//! referenced from the product record by their public URL. Uniqueness relies
//! on the millisecond timestamp only.

mod http;
mod local;
mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use url::Url;

use crate::error::MediaError;

pub use http::HttpObjectStore;
pub use local::LocalObjectStore;
pub use memory::MemoryObjectStore;

/// A validated, relative storage key such as `products/1700000000000_rose.jpg`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey(String);

impl ObjectKey {
    /// # Errors
    ///
    /// Rejects empty keys, absolute keys, backslashes, and empty, `.` or
    /// `..` segments.
    pub fn parse(raw: &str) -> Result<Self, MediaError> {
        if raw.is_empty() {
            return Err(MediaError::InvalidKey("key is empty".into()));
        }
        if raw.starts_with('/') {
            return Err(MediaError::InvalidKey(format!("{raw}: must be relative")));
        }
        if raw.contains('\\') {
            return Err(MediaError::InvalidKey(format!("{raw}: backslash not allowed")));
        }
        if raw
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..")
        {
            return Err(MediaError::InvalidKey(format!("{raw}: invalid path segment")));
        }
        Ok(Self(raw.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Binary storage that hands back publicly fetchable URLs.
#[automock]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` under `key` and return the public URL.
    async fn put(&self, key: &ObjectKey, bytes: Vec<u8>, content_type: &str)
    -> Result<Url, MediaError>;

    /// Remove `key`. Removing a key that does not exist is not an error.
    async fn delete(&self, key: &ObjectKey) -> Result<(), MediaError>;

    /// The key behind a URL previously returned by [`ObjectStore::put`], or
    /// `None` for URLs this store does not serve.
    fn key_for_url(&self, url: &str) -> Option<ObjectKey>;
}

/// Reduce an uploaded filename to a safe final path segment.
#[must_use]
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.trim_matches('.').is_empty() {
        "upload".to_owned()
    } else {
        cleaned
    }
}

/// Key for a product image uploaded at `at`.
///
/// # Errors
///
/// Only fails if the assembled key is not a valid [`ObjectKey`].
pub fn image_key(filename: &str, at: DateTime<Utc>) -> Result<ObjectKey, MediaError> {
    ObjectKey::parse(&format!(
        "products/{}_{}",
        at.timestamp_millis(),
        sanitize_filename(filename)
    ))
}

/// Upload a product image and return its public URL.
///
/// # Errors
///
/// Returns [`MediaError::Empty`] for an empty body, or whatever the backend
/// reports.
pub async fn upload_image(
    store: &dyn ObjectStore,
    filename: &str,
    content_type: &str,
    bytes: Vec<u8>,
) -> Result<String, MediaError> {
    if bytes.is_empty() {
        return Err(MediaError::Empty);
    }
    let key = image_key(filename, Utc::now())?;
    let size = bytes.len();
    let url = store.put(&key, bytes, content_type).await?;
    tracing::info!(%key, size, "Uploaded product image");
    Ok(url.to_string())
}

/// Best-effort removal of images that belonged to a deleted product.
///
/// URLs the store does not recognise are skipped. Failures are logged and
/// otherwise ignored. Returns how many objects were removed.
pub async fn purge_images(store: &dyn ObjectStore, urls: &[String]) -> usize {
    let mut removed = 0;
    for url in urls {
        let Some(key) = store.key_for_url(url) else {
            tracing::debug!(%url, "Skipping image not held by this store");
            continue;
        };
        match store.delete(&key).await {
            Ok(()) => removed += 1,
            Err(e) => tracing::warn!(%key, error = %e, "Failed to remove orphaned image"),
        }
    }
    removed
}

/// Key of `url` relative to `base`, if `url` lives under it.
pub(crate) fn key_under(base: &Url, url: &str) -> Option<ObjectKey> {
    let rest = url.strip_prefix(base.as_str())?;
    ObjectKey::parse(rest).ok()
}

/// Make `url` usable as a `join` base by ensuring a trailing slash.
pub(crate) fn as_directory(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn keys_reject_traversal_and_absolute_paths() {
        assert!(ObjectKey::parse("").is_err());
        assert!(ObjectKey::parse("/etc/passwd").is_err());
        assert!(ObjectKey::parse("products/../secrets").is_err());
        assert!(ObjectKey::parse("products//a.jpg").is_err());
        assert!(ObjectKey::parse("products\\a.jpg").is_err());
        assert!(ObjectKey::parse("products/1_a.jpg").is_ok());
    }

    #[test]
    fn filenames_are_reduced_to_safe_segments() {
        assert_eq!(sanitize_filename("rose gold.jpg"), "rose_gold.jpg");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\photos\\oud.png"), "oud.png");
        assert_eq!(sanitize_filename(".."), "upload");
        assert_eq!(sanitize_filename(""), "upload");
    }

    #[test]
    fn image_keys_are_timestamped() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let key = image_key("bottle.webp", at).unwrap();
        assert_eq!(key.as_str(), "products/1700000000123_bottle.webp");
    }

    #[tokio::test]
    async fn upload_rejects_empty_files() {
        let store = MemoryObjectStore::new();
        let err = upload_image(&store, "a.jpg", "image/jpeg", Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::Empty));
    }

    #[tokio::test]
    async fn upload_returns_public_url() {
        let store = MemoryObjectStore::new();
        let url = upload_image(&store, "a b.jpg", "image/jpeg", vec![1, 2, 3])
            .await
            .unwrap();
        assert!(url.starts_with("https://media.twinkle.test/products/"));
        assert!(url.ends_with("_a_b.jpg"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn purge_removes_only_own_images() {
        let store = MemoryObjectStore::new();
        let url = upload_image(&store, "a.jpg", "image/jpeg", vec![1])
            .await
            .unwrap();
        let removed = purge_images(
            &store,
            &[url, "https://elsewhere.test/products/1_b.jpg".to_owned()],
        )
        .await;
        assert_eq!(removed, 1);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn purge_keeps_going_after_failures() {
        let mut store = MockObjectStore::new();
        store
            .expect_key_for_url()
            .returning(|url| ObjectKey::parse(url.trim_start_matches("https://m.test/")).ok());
        store
            .expect_delete()
            .times(2)
            .returning(|key| {
                if key.as_str().ends_with("bad.jpg") {
                    Err(MediaError::Rejected {
                        key: key.to_string(),
                        status: 500,
                    })
                } else {
                    Ok(())
                }
            });

        let removed = purge_images(
            &store,
            &[
                "https://m.test/products/1_bad.jpg".to_owned(),
                "https://m.test/products/2_good.jpg".to_owned(),
            ],
        )
        .await;
        assert_eq!(removed, 1);
    }
}
