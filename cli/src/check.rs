//! Catalog validation

use crate::config::SurveyorConfig;
use crate::source::{SourceArgs, fetch_catalog};
use anyhow::Result;
use surveyor_core::lint::{LintReport, lint};

/// Lint the configured catalog. Fails when any finding is an error.
pub async fn run_check_command(args: &SourceArgs, config: &SurveyorConfig) -> Result<()> {
    let (choice, catalog) = fetch_catalog(args, config).await?;

    println!("Checking form at: {}", choice.describe());
    println!("  {} question(s)", catalog.len());

    let report = lint(&catalog);
    print!("{}", summarize(&report));

    if report.has_errors() {
        anyhow::bail!("Form has errors");
    }
    Ok(())
}

fn summarize(report: &LintReport) -> String {
    let mut out = String::new();
    for finding in &report.findings {
        out.push_str(&format!("  {finding}\n"));
    }

    let errors = report.errors().count();
    let warnings = report.warnings().count();
    if report.is_clean() {
        out.push_str("Check complete: no issues found\n");
    } else {
        out.push_str(&format!(
            "Check complete: {errors} error(s), {warnings} warning(s)\n"
        ));
    }
    out
}
