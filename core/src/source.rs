use crate::model::Catalog;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Why a catalog could not be fetched.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to reach form source: {0}")]
    Transport(String),

    #[error("form source responded with status {0}")]
    Status(u16),

    #[error("failed to decode form: {0}")]
    Decode(String),

    #[error("failed to read form file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<serde_json::Error> for SourceError {
    fn from(error: serde_json::Error) -> Self {
        SourceError::Decode(error.to_string())
    }
}

/// Where a form session gets its catalog (e.g. HTTP, a file, a fixture).
///
/// An empty catalog is a valid fetch result here; the session treats it as
/// "no usable form".
#[async_trait]
pub trait FormSource: Send + Sync + 'static {
    async fn fetch(&self) -> Result<Catalog, SourceError>;
}

#[async_trait]
impl<T: FormSource + ?Sized> FormSource for Arc<T> {
    async fn fetch(&self) -> Result<Catalog, SourceError> {
        (**self).fetch().await
    }
}

#[async_trait]
impl<T: FormSource + ?Sized> FormSource for Box<T> {
    async fn fetch(&self) -> Result<Catalog, SourceError> {
        (**self).fetch().await
    }
}
