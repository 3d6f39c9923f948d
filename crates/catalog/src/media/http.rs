//! Object store reached over HTTP (S3-compatible or bucket gateways that
//! accept authenticated `PUT`/`DELETE` and serve objects publicly).

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use super::{ObjectKey, ObjectStore, as_directory, key_under};
use crate::error::MediaError;

/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct HttpObjectStore {
    client: reqwest::Client,
    endpoint: Url,
    public_base: Url,
    token: SecretString,
}

impl std::fmt::Debug for HttpObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpObjectStore")
            .field("endpoint", &self.endpoint.as_str())
            .field("public_base", &self.public_base.as_str())
            .field("token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl HttpObjectStore {
    /// `endpoint` receives uploads; `public_base` is where readers fetch them.
    #[must_use]
    pub fn new(endpoint: Url, public_base: Url, token: SecretString) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: as_directory(endpoint),
            public_base: as_directory(public_base),
            token,
        }
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn put(
        &self,
        key: &ObjectKey,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<Url, MediaError> {
        let target = self.endpoint.join(key.as_str())?;

        let response = self
            .client
            .put(target)
            .bearer_auth(self.token.expose_secret())
            .header(CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(%key, %status, "Object store rejected upload");
            return Err(MediaError::Rejected {
                key: key.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(self.public_base.join(key.as_str())?)
    }

    async fn delete(&self, key: &ObjectKey) -> Result<(), MediaError> {
        let response = self
            .client
            .delete(self.endpoint.join(key.as_str())?)
            .bearer_auth(self.token.expose_secret())
            .send()
            .await?;

        let status = response.status();
        if status.is_success() || status == reqwest::StatusCode::NOT_FOUND {
            Ok(())
        } else {
            Err(MediaError::Rejected {
                key: key.to_string(),
                status: status.as_u16(),
            })
        }
    }

    fn key_for_url(&self, url: &str) -> Option<ObjectKey> {
        key_under(&self.public_base, url)
    }
}
