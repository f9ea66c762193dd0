// ABOUTME: CLI sync command - clone or pull one repository or all of them

use anyhow::{Result, anyhow};
use serde::Serialize;

use super::OutputFormat;
use crate::config::Registry;
use crate::git::{BatchReport, RepoService, SyncOutcome};
use crate::models::RepositoryRef;

#[derive(Debug, Serialize)]
struct SyncLine<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    operation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

/// Execute the sync command. The report tells the caller whether anything failed.
pub async fn execute(
    service: &RepoService,
    registry: &Registry,
    name: Option<&str>,
    format: OutputFormat,
) -> Result<BatchReport> {
    let repos = select_repos(registry, name)?;
    let report = service.sync_all(&repos).await;

    match format {
        OutputFormat::Json => output_json(&report)?,
        OutputFormat::Text => output_text(&report),
    }

    Ok(report)
}

/// Repositories to sync: the one named, or all of them
pub fn select_repos(registry: &Registry, name: Option<&str>) -> Result<Vec<RepositoryRef>> {
    match name {
        Some(name) => registry
            .find(name)
            .cloned()
            .map(|repo| vec![repo])
            .ok_or_else(|| anyhow!("No tracked repository named '{name}'")),
        None => Ok(registry.repos.clone()),
    }
}

fn output_json(report: &BatchReport) -> Result<()> {
    let lines: Vec<SyncLine> = report
        .results
        .iter()
        .map(|r| match &r.result {
            Ok(SyncOutcome { operation, state }) => SyncLine {
                name: &r.name,
                operation: Some(operation.to_string()),
                state: Some(state.to_string()),
                error: None,
            },
            Err(message) => SyncLine {
                name: &r.name,
                operation: None,
                state: None,
                error: Some(message.as_str()),
            },
        })
        .collect();
    let json = serde_json::to_string_pretty(&serde_json::json!({
        "results": lines,
        "succeeded": report.succeeded,
        "failed": report.failed,
    }))?;
    println!("{json}");
    Ok(())
}

fn output_text(report: &BatchReport) {
    for r in &report.results {
        match &r.result {
            Ok(outcome) => println!("✓ {:<30} {} -> {}", r.name, outcome.operation, outcome.state),
            Err(message) => println!("✗ {:<30} {}", r.name, message),
        }
    }
    println!("{report}");
}
