// SPDX-FileCopyrightText: 2026 notisync contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint, builder::styling};

const STYLES: styling::Styles = styling::Styles::styled()
    .header(styling::AnsiColor::Green.on_default().bold())
    .usage(styling::AnsiColor::Green.on_default().bold())
    .literal(styling::AnsiColor::Blue.on_default().bold())
    .placeholder(styling::AnsiColor::Cyan.on_default());

/// Command-line interface
#[derive(Debug, Parser)]
#[command(name = "notisync")]
#[command(about = "Keep Notion calendar and task databases in step with a local JSON store")]
#[command(version, styles = STYLES)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    #[arg(long_help = "Path to the configuration file. Defaults to the NOTISYNC_CONFIG \
environment variable, then notisync/config.toml under the user config directory.")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// The commands available in the CLI
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create the Notion databases if they do not exist yet
    Setup {
        /// Page id to create the databases under (overrides the config)
        #[arg(long)]
        parent: Option<String>,
    },

    /// Run one local-to-Notion sync pass
    Sync {
        /// Compute and log the plan without sending any create or update
        #[arg(long)]
        dry_run: bool,
    },

    /// Import events from a JSON feed file into the local store
    Import {
        /// File holding a JSON array of event records
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Sync repeatedly on an interval until interrupted
    Watch {
        /// Seconds between runs (overrides the config)
        #[arg(long)]
        interval: Option<u64>,
    },

    /// List the Notion databases the integration can access
    Databases,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sync_with_dry_run() {
        let cli = Cli::try_parse_from(["notisync", "sync", "--dry-run"]).unwrap();
        assert!(matches!(cli.command, Commands::Sync { dry_run: true }));
    }

    #[test]
    fn parses_global_config_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["notisync", "sync", "-c", "/tmp/config.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/config.toml")));
        assert!(matches!(cli.command, Commands::Sync { dry_run: false }));
    }

    #[test]
    fn parses_setup_with_parent() {
        let cli = Cli::try_parse_from(["notisync", "setup", "--parent", "page-1"]).unwrap();
        match cli.command {
            Commands::Setup { parent } => assert_eq!(parent.as_deref(), Some("page-1")),
            other => panic!("expected setup, got {other:?}"),
        }
    }

    #[test]
    fn parses_import_file() {
        let cli = Cli::try_parse_from(["notisync", "import", "feed.json"]).unwrap();
        match cli.command {
            Commands::Import { file } => assert_eq!(file, PathBuf::from("feed.json")),
            other => panic!("expected import, got {other:?}"),
        }
    }

    #[test]
    fn parses_watch_interval() {
        let cli = Cli::try_parse_from(["notisync", "watch", "--interval", "30"]).unwrap();
        match cli.command {
            Commands::Watch { interval } => assert_eq!(interval, Some(30)),
            other => panic!("expected watch, got {other:?}"),
        }
    }

    #[test]
    fn a_subcommand_is_required() {
        assert!(Cli::try_parse_from(["notisync"]).is_err());
    }
}
