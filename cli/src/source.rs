//! Picking the catalog source from flags and configuration.

use crate::config::SurveyorConfig;
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use surveyor_core::model::Catalog;
use surveyor_core::source::FormSource;
use surveyor_http::HttpFormSource;
use surveyor_runtime::JsonFileSource;

#[derive(Debug, Clone, Default, Args)]
pub struct SourceArgs {
    /// Fetch the form from this URL
    #[arg(long, value_name = "URL", conflicts_with = "file")]
    pub source: Option<String>,

    /// Read the form from a local JSON file
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}

/// Resolved source, before any I/O happens.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceChoice {
    File(PathBuf),
    Url(String),
}

impl SourceChoice {
    /// Flags beat configuration; a file beats a URL at the same level.
    pub fn resolve(args: &SourceArgs, config: &SurveyorConfig) -> Self {
        if let Some(file) = &args.file {
            return SourceChoice::File(file.clone());
        }
        if let Some(url) = &args.source {
            return SourceChoice::Url(url.clone());
        }
        match &config.source.file {
            Some(file) => SourceChoice::File(file.clone()),
            None => SourceChoice::Url(config.source.url.clone()),
        }
    }

    /// Short name used for schematic titles and log lines.
    pub fn describe(&self) -> String {
        match self {
            SourceChoice::File(path) => path.display().to_string(),
            SourceChoice::Url(url) => url.clone(),
        }
    }

    pub fn build(&self, config: &SurveyorConfig) -> Result<Box<dyn FormSource>> {
        let source: Box<dyn FormSource> = match self {
            SourceChoice::File(path) => Box::new(JsonFileSource::new(path)),
            SourceChoice::Url(url) => {
                let mut http = config.http_source();
                http.url = url.clone();
                Box::new(HttpFormSource::new(http).context("Failed to create HTTP client")?)
            }
        };
        Ok(source)
    }
}

/// One-shot fetch for the commands that only inspect a catalog.
pub async fn fetch_catalog(args: &SourceArgs, config: &SurveyorConfig) -> Result<(SourceChoice, Catalog)> {
    let choice = SourceChoice::resolve(args, config);
    let catalog = choice
        .build(config)?
        .fetch()
        .await
        .with_context(|| format!("Failed to load form from {}", choice.describe()))?;
    Ok((choice, catalog))
}
