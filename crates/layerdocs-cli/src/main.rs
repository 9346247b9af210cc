//! Layerdocs CLI - records layer releases and keeps the README tables in sync

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use layerdocs_core::config::split_list;
use layerdocs_core::{LayerDocsConfig, Publisher};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "layerdocs")]
#[command(about = "Layer ARN registry and README table synchronizer")]
#[command(version)]
struct Cli {
    /// Configuration file (TOML); defaults are used when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Document to synchronize, overriding the configuration
    #[arg(long, global = true)]
    document: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a release and re-render the document
    Publish {
        #[command(flatten)]
        release: ReleaseArgs,
        #[command(flatten)]
        deployment: DeploymentArgs,
    },
    /// Record a release in the registries only
    Record {
        #[command(flatten)]
        release: ReleaseArgs,
        #[command(flatten)]
        deployment: DeploymentArgs,
    },
    /// Re-render the document from the registries on disk
    Sync {
        #[command(flatten)]
        deployment: DeploymentArgs,
    },
    /// Show the latest layer version and its component version
    Latest,
    /// Check the configuration and the document's anchors
    Check,
}

#[derive(Args)]
struct ReleaseArgs {
    /// Component version, e.g. 1.2.0
    #[arg(long)]
    component_version: String,

    /// Layer version assigned by the deployment
    #[arg(long)]
    generation: u64,

    /// Interpreter versions the layer was built for, e.g. 3.10,3.11
    #[arg(long, value_delimiter = ',', required = true)]
    interpreter_versions: Vec<String>,
}

#[derive(Args)]
struct DeploymentArgs {
    /// Account that owns the layers
    #[arg(long, env = "AWS_ACCOUNT_ID")]
    account_id: Option<String>,

    /// Comma-separated regions, in document order
    #[arg(long, env = "AWS_REGIONS")]
    regions: Option<String>,
}

impl DeploymentArgs {
    fn apply(&self, config: &mut LayerDocsConfig) {
        if let Some(account_id) = &self.account_id {
            config.deployment.account_id = Some(account_id.trim().to_string());
        }
        if let Some(regions) = &self.regions {
            config.deployment.regions = split_list(regions);
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<LayerDocsConfig> {
    let mut config = match &cli.config {
        Some(path) => LayerDocsConfig::from_file(path)?,
        None => LayerDocsConfig::default(),
    };
    if let Some(document) = &cli.document {
        config.paths.document = document.clone();
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = load_config(&cli)?;
    debug!("Loaded configuration: {:?}", config);

    match &cli.command {
        Commands::Publish {
            release,
            deployment,
        } => {
            deployment.apply(&mut config);
            let publisher = Publisher::new(config)?;
            let release = publisher.release(
                &release.component_version,
                release.generation,
                release.interpreter_versions.iter().map(|v| v.trim()),
            );
            let report = publisher
                .publish(&release)
                .with_context(|| format!("publishing {}", release.component_version))?;
            println!(
                "Recorded {} identifiers for {} (layer version {})",
                report.identifiers_recorded, release.component_version, release.generation
            );
            print_sync(&report.document);
        }
        Commands::Record {
            release,
            deployment,
        } => {
            deployment.apply(&mut config);
            let publisher = Publisher::new(config)?;
            let release = publisher.release(
                &release.component_version,
                release.generation,
                release.interpreter_versions.iter().map(|v| v.trim()),
            );
            let recorded = publisher
                .record(&release)
                .with_context(|| format!("recording {}", release.component_version))?;
            println!(
                "Recorded {} identifiers for {} (layer version {})",
                recorded, release.component_version, release.generation
            );
        }
        Commands::Sync { deployment } => {
            deployment.apply(&mut config);
            let publisher = Publisher::new(config)?;
            let report = publisher
                .sync_document()
                .context("synchronizing the document")?;
            print_sync(&report);
        }
        Commands::Latest => {
            let publisher = Publisher::new(config)?;
            let (version, record) = publisher.latest()?;
            println!(
                "Layer version {} -> {} (updated {})",
                record.generation,
                version,
                record.updated_at.to_rfc3339()
            );
        }
        Commands::Check => {
            let publisher = Publisher::new(config)?;
            publisher.check_document()?;
            println!(
                "Configuration OK; {} carries all {} anchor pairs",
                publisher.config().paths.document.display(),
                publisher.config().anchor_pairs().len()
            );
        }
    }

    Ok(())
}

fn print_sync(report: &layerdocs_core::SyncReport) {
    if report.written {
        let changed: Vec<&str> = report.changed_sections().collect();
        println!("Updated {}: {}", report.path.display(), changed.join(", "));
    } else {
        println!("{} already up to date", report.path.display());
    }
}
