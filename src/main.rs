use anyhow::{Context, Result};
use clap::Parser;
use reqwest::Client;
use std::time::Duration;

use stroke_directory::{
    args::Args,
    collect::Collector,
    constants::{NOMINATIM_USAGE_POLICY_URL, NPPES_API_DOC_URL},
    geocode::Geocoder,
    registry::{RegistryClient, RegistryOptions},
    snapshot::save_snapshot,
};

#[tokio::main]
async fn main() -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();

    tracing::info!("NPI API reference: {NPPES_API_DOC_URL}");
    tracing::info!("Geocoder usage policy: {NOMINATIM_USAGE_POLICY_URL}");

    let client = Client::builder()
        .user_agent(args.user_agent.clone())
        .timeout(Duration::from_secs(args.request_timeout_secs))
        .build()
        .context("Failed creating HTTP client")?;

    let registry = RegistryClient::new(client.clone(), RegistryOptions::from_args(&args));
    let geocoder = Geocoder::from_args(&args, &client);
    let collector = Collector::new(registry, geocoder);

    let records = collector.collect().await;
    save_snapshot(records, &args.output_path)
        .with_context(|| format!("Failed saving snapshot to {}", args.output_path.display()))?;

    tracing::info!("Data collection complete!");
    Ok(())
}
