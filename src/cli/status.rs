// ABOUTME: CLI status command - classify every tracked repository and print a table or JSON
//
// Per-repository failures are reported inline and never abort the listing.

use anyhow::Result;
use futures_util::stream::{self, StreamExt};
use serde::Serialize;

use super::OutputFormat;
use crate::config::Registry;
use crate::git::RepoService;
use crate::models::SyncState;

/// One repository's status as printed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusRow {
    pub name: String,
    pub url: String,
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commits: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatusRow {
    fn from_result(name: String, url: String, result: Result<SyncState, String>) -> Self {
        match result {
            Ok(state) => Self {
                name,
                url,
                state: state.label().to_string(),
                commits: state.commits_behind(),
                error: None,
            },
            Err(message) => Self {
                name,
                url,
                state: "error".to_string(),
                commits: None,
                error: Some(message),
            },
        }
    }
}

/// Execute the status command
pub async fn execute(service: &RepoService, registry: &Registry, format: OutputFormat) -> Result<()> {
    let rows = collect_status(service, registry).await;

    match format {
        OutputFormat::Json => output_json(&rows)?,
        OutputFormat::Text => output_text(&rows),
    }

    Ok(())
}

/// Classify every repository, in registry order
pub async fn collect_status(service: &RepoService, registry: &Registry) -> Vec<StatusRow> {
    stream::iter(registry.repos.iter())
        .map(|repo| async move {
            let result = service.check(repo).await.map_err(|e| e.to_string());
            StatusRow::from_result(repo.display_name(), repo.url.clone(), result)
        })
        .buffered(service.max_parallel())
        .collect()
        .await
}

fn output_json(rows: &[StatusRow]) -> Result<()> {
    let json = serde_json::to_string_pretty(rows)?;
    println!("{json}");
    Ok(())
}

fn output_text(rows: &[StatusRow]) {
    if rows.is_empty() {
        println!("No repositories tracked. Add one with 'lazycontext add <url>'.");
        return;
    }

    println!("{:<30} {:<14} URL", "NAME", "STATUS");
    println!("{}", "-".repeat(90));

    for row in rows {
        let status = match (row.commits, &row.error) {
            (_, Some(_)) => "error".to_string(),
            (Some(commits), None) => format!("{commits} behind"),
            (None, None) => row.state.clone(),
        };
        println!("{:<30} {:<14} {}", row.name, status, row.url);
        if let Some(error) = &row.error {
            println!("  {error}");
        }
    }
}
