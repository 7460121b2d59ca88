use clap::Parser;

use crate::constants::{
    DEFAULT_GEOCODER_BASE_URL, DEFAULT_NPI_API_BASE_URL, DEFAULT_NPI_API_VERSION,
    DEFAULT_OUTPUT_PATH, DEFAULT_TARGET_STATE, DEFAULT_USER_AGENT,
};

#[derive(Debug, Parser)]
#[command(name = "stroke_directory")]
#[command(about = "Collect stroke/vascular neurologists from the NPI registry into a geocoded JSON snapshot")]
pub struct Args {
    /// Snapshot output path. Parent directories are created when missing.
    #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
    pub output_path: std::path::PathBuf,

    /// Two-letter state code used for the registry filter and written on every record.
    #[arg(long, default_value = DEFAULT_TARGET_STATE)]
    pub state: String,

    /// NPI API base URL.
    ///
    /// NPPES reference:
    /// https://npiregistry.cms.hhs.gov/api-page
    #[arg(long, default_value = DEFAULT_NPI_API_BASE_URL)]
    pub api_base_url: String,

    /// NPI API version query parameter.
    #[arg(long, default_value = DEFAULT_NPI_API_VERSION)]
    pub api_version: String,

    /// Result cap per search term. The registry is not paginated past this.
    #[arg(long, default_value_t = 200)]
    pub limit: u32,

    /// Pause after each registry request, in milliseconds.
    #[arg(long, default_value_t = 500)]
    pub registry_delay_ms: u64,

    /// Nominatim base URL used for geocoding practice addresses.
    #[arg(long, default_value = DEFAULT_GEOCODER_BASE_URL)]
    pub geocoder_base_url: String,

    /// Pause before each geocoding request, in milliseconds.
    ///
    /// Nominatim usage policy allows at most one request per second:
    /// https://operations.osmfoundation.org/policies/nominatim/
    #[arg(long, default_value_t = 1000)]
    pub geocode_delay_ms: u64,

    /// Per-request timeout for geocoding calls.
    #[arg(long, default_value_t = 10)]
    pub geocode_timeout_secs: u64,

    /// Disable geocoding. Records are still written, with null coordinates.
    #[arg(long, default_value_t = false)]
    pub no_geocode: bool,

    /// User-Agent sent to both APIs.
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Overall HTTP client timeout.
    #[arg(long, default_value_t = 30)]
    pub request_timeout_secs: u64,
}
