//! Advisor CLI - market dashboard for the advisory board
//!
//! Usage:
//!   advisor init                  Write a default .advisor/config.toml
//!   advisor dashboard             Open the terminal dashboard
//!   advisor fetch                 Fetch one snapshot and print it as JSON

use advisor_core::{AdvisorConfig, FetchParams};
use advisor_dashboard::{
    source_from_config, DashboardController, FetchStatus, ReportExporter, Stage,
};
use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "advisor")]
#[command(author, version, about = "Progressive market dashboard for the advisory board")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Config file (defaults to .advisor/config.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Launch the terminal dashboard
    Dashboard {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Never fetch automatically
        #[arg(long)]
        no_auto_fetch: bool,
    },

    /// Fetch one snapshot and print it as JSON
    Fetch {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Run the metric reveal to completion and print the final display
        #[arg(long)]
        reveal: bool,

        /// Also write a report into the configured export directory
        #[arg(long)]
        export: bool,
    },
}

/// Market selection overrides shared by the dashboard and fetch commands
#[derive(Args, Debug, Default)]
struct SelectionArgs {
    /// Industry to show
    #[arg(short, long)]
    industry: Option<String>,

    /// Region filter
    #[arg(short, long)]
    region: Option<String>,

    /// Company size filter (e.g. "50-200")
    #[arg(long)]
    company_size: Option<String>,

    /// Read snapshots from a JSON file instead of the statistics service
    #[arg(long, value_name = "FILE")]
    fixture: Option<PathBuf>,
}

impl SelectionArgs {
    /// Apply command-line overrides on top of file configuration
    fn apply(self, config: &mut AdvisorConfig) {
        if let Some(industry) = self.industry {
            config.dashboard.industry = industry;
        }
        if self.region.is_some() {
            config.dashboard.region = self.region;
        }
        if self.company_size.is_some() {
            config.dashboard.company_size = self.company_size;
        }
        if self.fixture.is_some() {
            config.source.fixture = self.fixture;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging. The dashboard owns the terminal, so stay quiet there.
    let level = match (&cli.command, cli.verbose) {
        (_, true) => Level::DEBUG,
        (Commands::Dashboard { .. }, false) => Level::WARN,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Init { path } => cmd_init(&path).await,
        Commands::Dashboard {
            selection,
            no_auto_fetch,
        } => {
            let mut config = load_config(cli.config.as_deref())?;
            selection.apply(&mut config);
            if no_auto_fetch {
                config.dashboard.auto_fetch = false;
            }
            cmd_dashboard(config).await
        }
        Commands::Fetch {
            selection,
            reveal,
            export,
        } => {
            let mut config = load_config(cli.config.as_deref())?;
            selection.apply(&mut config);
            cmd_fetch(config, reveal, export).await
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<AdvisorConfig> {
    match path {
        Some(path) => AdvisorConfig::load_from(path)
            .with_context(|| format!("Failed to load config from {:?}", path)),
        None => AdvisorConfig::load_or_default(Path::new(".")).context("Failed to load .advisor/config.toml"),
    }
}

async fn cmd_init(path: &Path) -> Result<()> {
    info!("Initializing advisor config in {:?}", path);

    let written = AdvisorConfig::write_default(path).context("Failed to write default config")?;

    println!("Initialized advisor in {:?}", path);
    println!("Created:");
    println!("  {}", written.display());
    println!("\nNext steps:");
    println!("  1. Set the API key: export {}=...", AdvisorConfig::default().source.api_key_env);
    println!("  2. Open the dashboard: advisor dashboard --industry Fintech");

    Ok(())
}

async fn cmd_dashboard(config: AdvisorConfig) -> Result<()> {
    let params = config.fetch_params();
    info!("Launching dashboard for {}", params);

    let source = source_from_config(&config.source)?;
    advisor_dashboard::run(source, config, params).await?;

    Ok(())
}

async fn cmd_fetch(mut config: AdvisorConfig, reveal: bool, export: bool) -> Result<()> {
    // An explicit fetch always fetches
    config.dashboard.auto_fetch = true;
    let params: FetchParams = config.fetch_params();
    let source = source_from_config(&config.source)?;

    let exporter = ReportExporter::new();
    let mut controller = DashboardController::new(source, &config);
    controller.subscribe(Box::new(exporter.clone()));

    controller.set_params(params.clone());
    match controller.wait_for_fetch().await {
        FetchStatus::Loaded => {}
        FetchStatus::QuotaExceeded => {
            let message = controller.view().quota_message.unwrap_or_default();
            bail!("{}", message);
        }
        status => bail!("Fetching dashboard data for {} failed ({})", params, status.label()),
    }

    if reveal {
        while controller.reveal_state().stage != Stage::Done {
            if controller.process_next().await.is_none() {
                break;
            }
        }
        let view = controller.view();
        println!("Market Size:   {}", view.display_market_size);
        println!("Growth Rate:   {}", view.display_growth_rate);
        println!("Avg Deal Size: {}", view.display_deal_size);
        println!("Maturity:      {}", view.display_maturity);
    } else if let Some(snapshot) = controller.snapshot() {
        println!("{}", serde_json::to_string_pretty(snapshot.as_ref())?);
    }

    if export {
        let path = exporter
            .write_to(&config.export.dir)
            .await
            .context("Failed to export report")?;
        println!("Report written to {}", path.display());
    }

    controller.shutdown();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_overrides_config() {
        let cli = Cli::try_parse_from([
            "advisor",
            "dashboard",
            "--industry",
            "Fintech",
            "--region",
            "EMEA",
            "--no-auto-fetch",
        ])
        .unwrap();

        let Commands::Dashboard {
            selection,
            no_auto_fetch,
        } = cli.command
        else {
            panic!("expected dashboard command");
        };
        assert!(no_auto_fetch);

        let mut config = AdvisorConfig::default();
        selection.apply(&mut config);
        assert_eq!(config.fetch_params(), FetchParams::new("Fintech").with_region("EMEA"));
    }

    #[test]
    fn test_missing_overrides_keep_file_values() {
        let mut config = AdvisorConfig::default();
        config.dashboard.region = Some("APAC".to_string());

        SelectionArgs::default().apply(&mut config);
        assert_eq!(config.dashboard.region.as_deref(), Some("APAC"));
        assert_eq!(config.dashboard.industry, "Artificial Intelligence");
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from(["advisor", "fetch", "--reveal", "--config", "alt.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("alt.toml")));
        assert!(matches!(cli.command, Commands::Fetch { reveal: true, export: false, .. }));
    }
}
