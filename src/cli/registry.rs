// ABOUTME: CLI add and remove commands - edit the registry, optionally cloning new repositories

use anyhow::{Context, Result};
use tracing::info;

use super::{AddArgs, OutputFormat, RemoveArgs};
use crate::config::RegistryStore;
use crate::git::RepoService;
use crate::models::RepositoryRef;

/// Execute the add command
pub async fn add(
    store: &RegistryStore,
    service: &RepoService,
    args: &AddArgs,
    format: OutputFormat,
) -> Result<()> {
    let before = store.load()?.len();
    let registry = store
        .add_repo(&args.url)
        .with_context(|| format!("Failed to add {}", args.url.trim()))?;
    let added = registry.len() > before;

    let repo = RepositoryRef::from_url(&args.url)?;
    let name = repo.display_name();

    if !added {
        report(format, &name, "already tracked");
        return Ok(());
    }
    if args.no_clone {
        report(format, &name, "added");
        return Ok(());
    }

    info!("Cloning newly added {}", name);
    let outcome = service
        .sync_and_refresh(&repo, None)
        .await
        .with_context(|| format!("Added {name}, but the initial sync failed"))?;
    report(format, &name, &format!("added, {} -> {}", outcome.operation, outcome.state));
    Ok(())
}

/// Execute the remove command. The working copy is left on disk.
pub fn remove(store: &RegistryStore, args: &RemoveArgs, format: OutputFormat) -> Result<()> {
    store.remove_repo(&args.name)?;
    report(format, &args.name, "removed (working copy kept)");
    Ok(())
}

fn report(format: OutputFormat, name: &str, result: &str) {
    match format {
        OutputFormat::Json => println!("{}", serde_json::json!({ "name": name, "result": result })),
        OutputFormat::Text => println!("{name}: {result}"),
    }
}
