use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    constants::{SEARCH_TERMS, WA_DOH_CREDENTIAL_SEARCH_URL},
    geocode::Geocoder,
    normalize::{SeenProviders, normalize_provider},
    record::ProviderRecord,
    registry::RegistryClient,
};

pub struct Collector {
    registry: RegistryClient,
    geocoder: Geocoder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionSummary {
    pub total: usize,
    pub with_coordinates: usize,
}

impl CollectionSummary {
    pub fn from_records(records: &[ProviderRecord]) -> Self {
        Self {
            total: records.len(),
            with_coordinates: records.iter().filter(|r| r.position.is_known()).count(),
        }
    }
}

impl Collector {
    pub fn new(registry: RegistryClient, geocoder: Geocoder) -> Self {
        Self { registry, geocoder }
    }

    /// Runs every search term in order and returns the deduplicated records.
    /// Terms whose request fails contribute nothing.
    pub async fn collect(&self) -> Vec<ProviderRecord> {
        tracing::info!("Starting data collection...");
        let mut seen = SeenProviders::new();
        let mut records = self.fetch_registry_records(&mut seen).await;
        records.extend(fetch_state_board_records(self.registry.state()));

        let summary = CollectionSummary::from_records(&records);
        tracing::info!("Total neurologists collected: {}", summary.total);
        tracing::info!("With coordinates: {}", summary.with_coordinates);
        records
    }

    async fn fetch_registry_records(&self, seen: &mut SeenProviders) -> Vec<ProviderRecord> {
        tracing::info!("Fetching data from NPPES...");
        let state = self.registry.state();
        let mut records = Vec::new();

        for term in SEARCH_TERMS {
            tracing::info!("Searching NPPES for: {term}");
            let providers = self.registry.search(term).await;
            if providers.is_empty() {
                tracing::info!("No providers returned for {term}");
                continue;
            }
            tracing::info!("Found {} providers for {term}", providers.len());

            let progress = ProgressBar::new(providers.len() as u64);
            if let Ok(style) = ProgressStyle::with_template(
                "{spinner:.green} [NPPES {elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
            ) {
                progress.set_style(style.progress_chars("=> "));
            }
            progress.set_message(term);

            let before = records.len();
            for raw in &providers {
                if let Some(record) = normalize_provider(raw, seen, &self.geocoder, state).await {
                    records.push(record);
                }
                progress.inc(1);
            }
            progress.finish_and_clear();

            tracing::info!(
                "Kept {} new records for {term} ({} NPIs seen so far)",
                records.len() - before,
                seen.len()
            );
        }

        records
    }
}

/// State licensing-board source. The board publishes no API, so this only
/// points at the manual search page.
pub fn fetch_state_board_records(state: &str) -> Vec<ProviderRecord> {
    tracing::info!("Fetching data from {state} DOH...");
    tracing::warn!("{state} DOH scraping not yet implemented - requires manual setup");
    tracing::warn!("Visit: {WA_DOH_CREDENTIAL_SEARCH_URL}");
    Vec::new()
}
