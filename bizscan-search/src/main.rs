//! bizscan-search - Business dataset search
//!
//! Reads a CSV business list, queries each business against the entity
//! registry, federal spending records, public filings and the small-business
//! datasets, then writes an HTML report and a JSON dump.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use bizscan_common::config::{load_toml_config, ConfigFileResolver, CONFIG_ENV_VAR};
use bizscan_common::logging::init_logging;
use bizscan_search::config::{resolve_entity_registry_api_key, SearchConfig};
use bizscan_search::input::{load_business_list, write_sample_business_list};
use bizscan_search::report::{write_reports, ReportOptions, ReportSummary};
use bizscan_search::services::{AggregationPipeline, DispatchEngine, RateGovernor, ReqwestTransport};

/// Command-line arguments for bizscan-search
#[derive(Parser, Debug)]
#[command(name = "bizscan-search")]
#[command(about = "Search businesses across public government datasets")]
#[command(version)]
struct Args {
    /// CSV file with a business_name column (city, state, zip optional)
    #[arg(default_value = "business_list.csv")]
    input: PathBuf,

    /// TOML config file
    #[arg(short, long, env = CONFIG_ENV_VAR)]
    config: Option<PathBuf>,

    /// Directory for the generated reports (overrides [output] dir)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Create a sample business list at INPUT if it does not exist
    #[arg(long)]
    write_sample: bool,

    /// Skip the HTML report
    #[arg(long)]
    no_html: bool,

    /// Skip the JSON dump
    #[arg(long)]
    no_json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Step 1: Bootstrap config and logging
    let config_path = ConfigFileResolver::new("bizscan").resolve(args.config.as_deref());
    let (config, config_origin): (SearchConfig, _) = load_toml_config(config_path.as_deref())
        .context("Failed to load configuration")?;
    init_logging(&config.logging).context("Failed to initialize logging")?;

    info!("Starting bizscan-search v{}", env!("CARGO_PKG_VERSION"));
    config_origin.log();

    // Step 2: Input
    if args.write_sample && !args.input.exists() {
        write_sample_business_list(&args.input)
            .with_context(|| format!("Failed to write sample list to {}", args.input.display()))?;
        info!("Edit {} with your business list and re-run", args.input.display());
    }

    let businesses = load_business_list(&args.input)
        .with_context(|| format!("Failed to load business list from {}", args.input.display()))?;

    if businesses.is_empty() {
        warn!("Business list is empty; reports will contain no results");
    }

    // Step 3: Wire sources
    let api_key = resolve_entity_registry_api_key(config.entity_registry.api_key.as_deref());
    let transport = Arc::new(ReqwestTransport::new().context("Failed to build HTTP client")?);
    let governor = Arc::new(RateGovernor::from_config(&config.rate_limits));
    let engine = DispatchEngine::from_config(&config, api_key, transport, Arc::clone(&governor));
    let pipeline = AggregationPipeline::new(engine, governor);

    // Step 4: Search
    let records = pipeline.run(&businesses).await;

    // Step 5: Reports
    let options = ReportOptions {
        output_dir: args.output_dir.unwrap_or_else(|| config.output.dir.clone()),
        html: config.output.html && !args.no_html,
        json: config.output.json && !args.no_json,
    };
    let written = write_reports(&records, &options, bizscan_common::time::now())
        .context("Failed to write reports")?;

    let summary = ReportSummary::from_records(&records);
    info!(
        "Search complete: {} businesses, {} with findings",
        summary.total_businesses, summary.businesses_with_findings
    );
    if written.html.is_none() && written.json.is_none() {
        warn!("All report outputs disabled; nothing written");
    }

    Ok(())
}
