use std::path::Path;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};

use dbassert::cli::{exit_code, run, Cli, Report};
use dbassert::{Catalog, DbmsAssert, MemoryCatalog, PgCatalog};
use dbassert_shared::{observability, DbAssertConfig, DEFAULT_CONFIG_FILE};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            if !path.exists() {
                bail!("config file {} does not exist", path.display());
            }
            DbAssertConfig::load_from_file(path)
        }
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => DbAssertConfig::load(),
        None => DbAssertConfig::load_from_env(),
    }
    .context("failed to load configuration")?;

    if let Some(url) = cli.database_url.clone() {
        config.database.url = Some(url);
    }

    observability::init(&config.observability)?;

    let catalog: Box<dyn Catalog> = match &config.database.url {
        Some(url) if cli.command.needs_catalog() => {
            let catalog = PgCatalog::connect(
                url,
                config.database.max_connections,
                config.database.connect_timeout(),
            )
            .await
            .context("failed to connect to the catalog database")?;
            info!("Connected to catalog database");
            Box::new(catalog)
        }
        _ => {
            if cli.command.needs_catalog() {
                warn!("No database URL configured, resolving against an empty catalog");
            }
            Box::new(MemoryCatalog::default())
        }
    };

    let package = DbmsAssert::new(catalog).lowercase_enquoted(config.names.lowercase_enquoted);
    let reports = run(&cli.command, &package).await;

    for report in &reports {
        print_report(report, cli.json)?;
    }

    Ok(exit_code(&reports))
}

fn print_report(report: &Report, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(report)?);
    } else if report.ok {
        println!("{}", report.to_text());
    } else {
        eprintln!("{}", report.to_text());
    }
    Ok(())
}
