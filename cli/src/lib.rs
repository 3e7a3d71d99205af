// SPDX-FileCopyrightText: 2026 notisync contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Command-line front end for the notisync engine.

mod cli;
mod config;
mod feed;

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use notisync_core::{
    LocalStore, SyncEngine, SyncOptions, SyncReport, SyncScheduler, ensure_databases,
    import_events,
};
use notisync_notion::NotionClient;

pub use crate::cli::{Cli, Commands};
pub use crate::config::Config;
use crate::config::parse_config;
use crate::feed::FileFeed;

/// Runs the notisync command-line interface.
///
/// # Errors
///
/// Never returns an error; failures are logged and reported through the exit
/// code.
pub async fn run() -> Result<ExitCode, Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    match dispatch(cli).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("Error: {e}");
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn dispatch(cli: Cli) -> Result<(), Box<dyn Error>> {
    match cli.command {
        Commands::Setup { parent } => cmd_setup(cli.config, parent).await,
        Commands::Sync { dry_run } => cmd_sync(cli.config, dry_run).await,
        Commands::Import { file } => cmd_import(cli.config, file).await,
        Commands::Watch { interval } => cmd_watch(cli.config, interval).await,
        Commands::Databases => cmd_databases(cli.config).await,
    }
}

async fn cmd_setup(
    config_path: Option<PathBuf>,
    parent: Option<String>,
) -> Result<(), Box<dyn Error>> {
    let config = parse_config(config_path).await?;
    let parent = parent
        .or(config.parent_page_id)
        .ok_or("No parent page: pass --parent or set `parent_page_id` in the config")?;

    let client = NotionClient::new(config.notion)?;
    let outcome = ensure_databases(
        &client,
        &parent,
        config.events_db_id.as_deref(),
        config.tasks_db_id.as_deref(),
    )
    .await?;

    for (label, id, created) in [
        ("Events", &outcome.events_db_id, outcome.events_created),
        ("Tasks", &outcome.tasks_db_id, outcome.tasks_created),
    ] {
        let state = if created { "created" } else { "exists" };
        println!("{label} database {state}: {id}");
    }
    if outcome.events_created || outcome.tasks_created {
        println!("Record the ids above as `events_db_id` and `tasks_db_id` in the config.");
    }
    Ok(())
}

async fn cmd_sync(config_path: Option<PathBuf>, dry_run: bool) -> Result<(), Box<dyn Error>> {
    let config = parse_config(config_path).await?;
    let (engine, store) = build_engine(&config, dry_run)?;

    let report = engine.run(&store).await?;
    print_report(&report, dry_run);
    Ok(())
}

async fn cmd_import(
    config_path: Option<PathBuf>,
    file: PathBuf,
) -> Result<(), Box<dyn Error>> {
    let config = parse_config(config_path).await?;
    let store = LocalStore::new(config.data_path);
    let feed = FileFeed::new(file);

    let added = import_events(&feed, &store).await?;
    println!("Imported {added} new event(s).");
    Ok(())
}

async fn cmd_watch(
    config_path: Option<PathBuf>,
    interval: Option<u64>,
) -> Result<(), Box<dyn Error>> {
    let config = parse_config(config_path).await?;
    let interval = Duration::from_secs(interval.unwrap_or(config.watch_interval_secs));
    let (engine, store) = build_engine(&config, false)?;
    let engine = Arc::new(engine);

    // Sync once right away; the scheduler's first tick is a full interval out.
    let report = engine.run(&store).await?;
    print_report(&report, false);

    let mut scheduler = SyncScheduler::new(engine, store, interval);
    scheduler.start();
    println!(
        "Watching; syncing every {}s, press Ctrl-C to stop.",
        interval.as_secs()
    );

    tokio::signal::ctrl_c().await?;
    scheduler.stop().await;
    if let Some(report) = scheduler.last_report().await {
        print_report(&report, false);
    }
    Ok(())
}

async fn cmd_databases(config_path: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
    let config = parse_config(config_path).await?;
    let client = NotionClient::new(config.notion)?;

    let databases = client.list_databases().await?;
    if databases.is_empty() {
        println!("No databases are shared with this integration.");
        return Ok(());
    }
    for database in &databases {
        let id = database.get("id").and_then(Value::as_str).unwrap_or("?");
        let title = database
            .pointer("/title/0/plain_text")
            .and_then(Value::as_str)
            .unwrap_or("(untitled)");
        println!("{id}  {title}");
    }
    Ok(())
}

fn build_engine(config: &Config, dry_run: bool) -> Result<(SyncEngine, LocalStore), Box<dyn Error>> {
    let events_db_id = config
        .events_db_id
        .clone()
        .ok_or("No `events_db_id` in the config; run `notisync setup` first")?;
    let tasks_db_id = config
        .tasks_db_id
        .clone()
        .ok_or("No `tasks_db_id` in the config; run `notisync setup` first")?;

    let client = NotionClient::new(config.notion.clone())?;
    let options = SyncOptions {
        events_db_id,
        tasks_db_id,
        dry_run,
    };
    let engine = SyncEngine::new(client, options)?;
    let store = LocalStore::new(config.data_path.clone());
    Ok((engine, store))
}

fn print_report(report: &SyncReport, dry_run: bool) {
    if dry_run {
        println!("Dry run finished; see the log for the planned actions.");
        return;
    }
    println!(
        "Sync finished: {} created, {} updated, {} skipped, {} failed.",
        report.created, report.updated, report.skipped, report.failed
    );
}
