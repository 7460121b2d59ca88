use anyhow::{Context, Result, anyhow};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::{args::Args, common::truncate_for_log, record::Npi};

#[derive(Debug, Deserialize)]
struct NpiApiResponse {
    #[serde(default)]
    results: Vec<RawProvider>,
    #[serde(default, rename = "Errors")]
    errors: Vec<NpiApiError>,
}

#[derive(Debug, Deserialize)]
struct NpiApiError {
    description: Option<String>,
}

/// One entry of the registry `results` array, kept close to the wire shape.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawProvider {
    pub number: Option<NpiValue>,
    #[serde(default)]
    pub basic: RawBasic,
    #[serde(default)]
    pub addresses: Vec<RawAddress>,
    #[serde(default)]
    pub taxonomies: Vec<RawTaxonomy>,
}

/// The registry has served `number` both as an integer and as a string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NpiValue {
    Number(u64),
    Text(String),
}

impl NpiValue {
    pub fn to_npi(&self) -> Option<Npi> {
        match self {
            NpiValue::Number(n) => Some(Npi(*n)),
            NpiValue::Text(s) => Npi::parse(s),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawBasic {
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub credential: Option<String>,
    pub organization_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAddress {
    pub address_purpose: Option<String>,
    pub address_1: Option<String>,
    pub address_2: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub telephone_number: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTaxonomy {
    pub desc: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RegistryOptions {
    pub base_url: String,
    pub version: String,
    pub state: String,
    pub limit: u32,
    pub delay: Duration,
}

impl RegistryOptions {
    pub fn from_args(args: &Args) -> Self {
        Self {
            base_url: args.api_base_url.clone(),
            version: args.api_version.clone(),
            state: args.state.clone(),
            limit: args.limit,
            delay: Duration::from_millis(args.registry_delay_ms),
        }
    }
}

pub struct RegistryClient {
    client: Client,
    options: RegistryOptions,
}

impl RegistryClient {
    pub fn new(client: Client, options: RegistryOptions) -> Self {
        Self { client, options }
    }

    pub fn state(&self) -> &str {
        &self.options.state
    }

    /// Providers in the target state whose taxonomy matches `taxonomy`.
    ///
    /// Failures are logged and yield an empty list so one bad search term
    /// never stops a collection run.
    pub async fn search(&self, taxonomy: &str) -> Vec<RawProvider> {
        let providers = match self.fetch(taxonomy).await {
            Ok(providers) => providers,
            Err(err) => {
                tracing::warn!("Error fetching from NPPES for {taxonomy:?}: {err:#}");
                Vec::new()
            }
        };

        if !self.options.delay.is_zero() {
            tokio::time::sleep(self.options.delay).await;
        }
        providers
    }

    async fn fetch(&self, taxonomy: &str) -> Result<Vec<RawProvider>> {
        let limit = self.options.limit.to_string();
        let resp = self
            .client
            .get(&self.options.base_url)
            .query(&[
                ("version", self.options.version.as_str()),
                ("state", self.options.state.as_str()),
                ("taxonomy_description", taxonomy),
                ("limit", limit.as_str()),
            ])
            .send()
            .await
            .with_context(|| format!("NPI API request failed for {taxonomy:?}"))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!(
                "NPI API status {} for {:?}. Body: {}",
                status,
                taxonomy,
                truncate_for_log(&body)
            ));
        }

        let body: NpiApiResponse = resp
            .json()
            .await
            .with_context(|| format!("Invalid NPI API JSON for {taxonomy:?}"))?;

        if !body.errors.is_empty() {
            let messages: Vec<&str> = body
                .errors
                .iter()
                .filter_map(|e| e.description.as_deref())
                .collect();
            tracing::warn!(
                "NPI API reported errors for {taxonomy:?}: {}",
                messages.join("; ")
            );
        }

        Ok(body.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn options(base_url: String) -> RegistryOptions {
        RegistryOptions {
            base_url,
            version: "2.1".to_string(),
            state: "WA".to_string(),
            limit: 200,
            delay: Duration::ZERO,
        }
    }

    #[test]
    fn npi_value_accepts_number_and_string() {
        let parsed: Vec<NpiValue> = serde_json::from_str(r#"[1234567890, "1987654321"]"#).unwrap();
        assert_eq!(parsed[0].to_npi(), Some(Npi(1234567890)));
        assert_eq!(parsed[1].to_npi(), Some(Npi(1987654321)));
        assert_eq!(NpiValue::Text("n/a".into()).to_npi(), None);
    }

    #[test]
    fn provider_tolerates_missing_sections() {
        let provider: RawProvider = serde_json::from_str(r#"{"number": 1}"#).unwrap();
        assert!(provider.addresses.is_empty());
        assert!(provider.taxonomies.is_empty());
        assert!(provider.basic.first_name.is_none());
    }

    #[tokio::test]
    async fn search_sends_filter_parameters() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("version".into(), "2.1".into()),
                Matcher::UrlEncoded("state".into(), "WA".into()),
                Matcher::UrlEncoded("taxonomy_description".into(), "Vascular Neurology".into()),
                Matcher::UrlEncoded("limit".into(), "200".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"result_count": 1, "results": [{"number": 1111111111}]}"#)
            .create_async()
            .await;

        let client = RegistryClient::new(Client::new(), options(format!("{}/api/", server.url())));
        let providers = client.search("Vascular Neurology").await;

        mock.assert_async().await;
        assert_eq!(providers.len(), 1);
        assert_eq!(providers[0].number, Some(NpiValue::Number(1111111111)));
    }

    #[tokio::test]
    async fn search_returns_empty_on_server_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/")
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body("unavailable")
            .create_async()
            .await;

        let client = RegistryClient::new(Client::new(), options(format!("{}/api/", server.url())));
        assert!(client.search("Neurology").await.is_empty());
    }

    #[tokio::test]
    async fn search_returns_empty_on_api_errors_payload() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"Errors": [{"description": "No valid search criteria", "field": "generic"}]}"#)
            .create_async()
            .await;

        let client = RegistryClient::new(Client::new(), options(format!("{}/api/", server.url())));
        assert!(client.search("Neurology").await.is_empty());
    }

    #[tokio::test]
    async fn search_returns_empty_on_malformed_json() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let client = RegistryClient::new(Client::new(), options(format!("{}/api/", server.url())));
        assert!(client.search("Neurology").await.is_empty());
    }

    #[tokio::test]
    async fn search_returns_empty_when_unreachable() {
        let http = Client::builder().timeout(Duration::from_secs(5)).build().unwrap();
        let client = RegistryClient::new(http, options("http://127.0.0.1:9/api/".into()));
        assert!(client.search("Neurology").await.is_empty());
    }
}
