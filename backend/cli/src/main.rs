mod args;
mod output;
mod search_cmd;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use haute_config::HauteConfig;
use haute_core::Region;
use haute_session::Session;
use haute_understanding::SimulatedVision;
use tracing::{error, info};

use args::{FacetArgs, parse_region};
use search_cmd::SearchReport;

#[derive(Parser)]
#[command(name = "haute")]
#[command(about = "Haute: find clothing from a photo or a description")]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.haute/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search from a written description
    Describe {
        #[command(flatten)]
        facets: FacetArgs,
    },
    /// Search from a photo and a selected region
    Image {
        /// Photo to search from
        path: PathBuf,
        /// Region of the photo holding the item, as X,Y,W,H
        #[arg(long, value_parser = parse_region)]
        region: Region,
        #[command(flatten)]
        facets: FacetArgs,
    },
    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| haute_config::config_file_path(&haute_config::config_dir()));
    let config = haute_config::load_and_prepare(&config_path)
        .await
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let log_dir = config.log_dir().map(PathBuf::from);
    haute_logging::init_logger(&config.log_level(), log_dir.as_deref(), config.log_json());
    info!(config = %config_path.display(), "Configuration loaded");

    if let Err(e) = run(cli, &config, &config_path).await {
        error!(error = %e, "Command failed");
        return Err(e);
    }
    Ok(())
}

async fn run(cli: Cli, config: &HauteConfig, config_path: &Path) -> Result<()> {
    let report = match cli.command {
        Commands::Config => {
            println!("# {}", config_path.display());
            print!("{}", serde_yaml::to_string(config).context("Failed to render config")?);
            return Ok(());
        }
        Commands::Describe { facets } => {
            let mut session = new_session(config);
            search_cmd::describe(&mut session, &facets.to_facets()).await?
        }
        Commands::Image { path, region, facets } => {
            let mut session = new_session(config);
            search_cmd::image(&mut session, &path, region, &facets.to_facets()).await?
        }
    };
    print_report(&report, cli.json)
}

fn new_session(config: &HauteConfig) -> Session {
    Session::from_config(config, Arc::new(SimulatedVision::new()))
}

fn print_report(report: &SearchReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{}", output::render_report(report, output::supports_color()));
    }
    Ok(())
}
