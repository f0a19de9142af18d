use async_trait::async_trait;
use std::path::{Path, PathBuf};
use surveyor_core::model::Catalog;
use surveyor_core::source::{FormSource, SourceError};

/// Serves the same catalog on every fetch.
#[derive(Debug, Clone)]
pub struct StaticFormSource {
    catalog: Catalog,
}

impl StaticFormSource {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl FormSource for StaticFormSource {
    async fn fetch(&self) -> Result<Catalog, SourceError> {
        Ok(self.catalog.clone())
    }
}

/// Reads the `{ "record": [...] }` wire JSON from disk on every fetch.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl FormSource for JsonFileSource {
    async fn fetch(&self) -> Result<Catalog, SourceError> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| SourceError::Io {
                path: self.path.clone(),
                source,
            })?;
        tracing::debug!(path = %self.path.display(), bytes = text.len(), "Read form file");
        Ok(Catalog::from_json(&text)?)
    }
}
