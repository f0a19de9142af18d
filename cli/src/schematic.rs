//! Catalog graph export

use crate::config::SurveyorConfig;
use crate::source::{SourceArgs, fetch_catalog};
use anyhow::{Context, Result};
use std::path::Path;
use surveyor_core::schematic::Schematic;

pub async fn run_schematic_command(
    args: &SourceArgs,
    config: &SurveyorConfig,
    output: Option<&Path>,
) -> Result<()> {
    let (choice, catalog) = fetch_catalog(args, config).await?;
    let schematic = Schematic::from_catalog("survey", &catalog).with_description(choice.describe());
    let json = serde_json::to_string_pretty(&schematic)?;

    match output {
        Some(path) => {
            std::fs::write(path, json.as_bytes()).context("Failed to write output file")?;
            println!("Schematic saved to: {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
