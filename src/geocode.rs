use anyhow::{Context, Result, anyhow, ensure};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::{args::Args, common::truncate_for_log, record::Coordinates};

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

/// Nominatim search client. Every request waits `delay` first to stay inside
/// the public instance's one-request-per-second policy.
pub struct Nominatim {
    client: Client,
    base_url: String,
    delay: Duration,
    timeout: Duration,
}

impl Nominatim {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        delay: Duration,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            delay,
            timeout,
        }
    }

    async fn search(&self, query: &str) -> Result<Option<Coordinates>> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let url = format!("{}/search", self.base_url.trim_end_matches('/'));
        let resp = self
            .client
            .get(&url)
            .query(&[("q", query), ("format", "jsonv2"), ("limit", "1")])
            .timeout(self.timeout)
            .send()
            .await
            .context("Geocoding request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!(
                "Geocoder status {}. Body: {}",
                status,
                truncate_for_log(&body)
            ));
        }

        let places: Vec<NominatimPlace> = resp.json().await.context("Invalid geocoder JSON")?;
        let Some(place) = places.first() else {
            return Ok(None);
        };
        let latitude: f64 = place.lat.trim().parse().context("parse lat")?;
        let longitude: f64 = place.lon.trim().parse().context("parse lon")?;
        ensure!(
            latitude.is_finite() && longitude.is_finite(),
            "Non-finite coordinates lat={} lon={}",
            place.lat,
            place.lon
        );
        Ok(Some(Coordinates {
            latitude,
            longitude,
        }))
    }
}

/// Optional geocoding capability, chosen once at startup.
pub enum Geocoder {
    Enabled(Nominatim),
    Disabled,
}

impl Geocoder {
    pub fn from_args(args: &Args, client: &Client) -> Self {
        if args.no_geocode {
            tracing::warn!("Geocoding disabled; coordinates will be null.");
            return Geocoder::Disabled;
        }
        Geocoder::Enabled(Nominatim::new(
            client.clone(),
            args.geocoder_base_url.clone(),
            Duration::from_millis(args.geocode_delay_ms),
            Duration::from_secs(args.geocode_timeout_secs),
        ))
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Geocoder::Enabled(_))
    }

    /// Coordinates for a practice address, falling back to city/state/zip
    /// when the street-level query has no match. Service errors end the
    /// lookup with `None`.
    pub async fn locate(
        &self,
        street: &str,
        city: &str,
        state: &str,
        zip: &str,
    ) -> Option<Coordinates> {
        let Geocoder::Enabled(nominatim) = self else {
            return None;
        };

        let full = full_query(street, city, state, zip);
        let coarse = coarse_query(city, state, zip);
        for query in [&full, &coarse] {
            match nominatim.search(query).await {
                Ok(Some(coords)) => return Some(coords),
                Ok(None) => continue,
                Err(err) => {
                    tracing::warn!("Geocoding error for {full}: {err:#}");
                    return None;
                }
            }
        }
        tracing::debug!("No geocoding match for {full}");
        None
    }
}

pub fn full_query(street: &str, city: &str, state: &str, zip: &str) -> String {
    format!("{street}, {city}, {state} {zip}").trim().to_string()
}

pub fn coarse_query(city: &str, state: &str, zip: &str) -> String {
    format!("{city}, {state} {zip}").trim().to_string()
}
