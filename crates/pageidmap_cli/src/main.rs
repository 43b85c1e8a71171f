use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pageidmap_domain::OutputFormat;
use pageidmap_source::{AppConfig, TomlConfigStore};
use pageidmap_telemetry::{TelemetryConfig, Verbosity};
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;

#[derive(Parser)]
#[command(name = "pageidmap")]
#[command(version, about = "Convert Confluence page data to Cloud URL mappings and redirect rules", long_about = None)]
struct Cli {
    /// Configuration file path (TOML)
    #[arg(short, long, global = true, value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Silent mode (no diagnostics on stderr)
    #[arg(long, global = true)]
    silent: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit diagnostics as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate URL mappings or rewrite rules
    Map {
        /// Input file containing tab-separated page data
        #[arg(short, long, value_name = "FILENAME", conflicts_with_all = ["database", "sqlite"])]
        file: Option<PathBuf>,

        /// MySQL database holding the Confluence data
        #[arg(short, long, value_name = "HOST[:PORT]/DATABASE", conflicts_with = "sqlite")]
        database: Option<String>,

        /// SQLite snapshot of the Confluence database
        #[arg(long, value_name = "PATH")]
        sqlite: Option<PathBuf>,

        /// Space keys to query (comma-separated)
        #[arg(short, long)]
        spaces: Option<String>,

        /// Output format: tsv, csv, json, nginx or apache
        #[arg(long, value_name = "FORMAT")]
        output_format: Option<OutputFormat>,

        /// Cloud domain for nginx/apache rules (e.g. example.atlassian.net)
        #[arg(long, value_name = "DOMAIN")]
        target_domain: Option<String>,

        /// Write output to a file instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Generate a default configuration file
    GenerateConfig {
        /// Write to a file instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<AppConfig> {
    match path {
        Some(path) => TomlConfigStore::new(path)
            .load()
            .with_context(|| format!("Error loading config file '{}'", path.display())),
        None => Ok(AppConfig::default()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            if !cli.silent {
                eprintln!("Error: {e:#}");
            }
            return ExitCode::FAILURE;
        }
    };

    let silent = cli.silent || config.processing.silent;
    let telemetry = TelemetryConfig {
        verbosity: Verbosity::from_flags(silent, cli.verbose),
        json_output: cli.log_json,
    };
    if let Err(e) = pageidmap_telemetry::init_telemetry(&telemetry) {
        if !silent {
            eprintln!("Error: {e}");
        }
        return ExitCode::FAILURE;
    }

    if let Some(path) = cli.config.as_ref().filter(|p| !p.exists()) {
        tracing::warn!(path = %path.display(), "Config file not found, using defaults");
    }

    let result = match cli.command {
        Commands::Map {
            file,
            database,
            sqlite,
            spaces,
            output_format,
            target_domain,
            output,
        } => commands::map::run(
            commands::map::MapArgs {
                file,
                database,
                sqlite,
                spaces,
                output_format,
                target_domain,
                output,
            },
            &config,
            silent,
        ),
        Commands::GenerateConfig { output } => commands::generate_config::run(output),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if !silent {
                eprintln!("Error: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}
