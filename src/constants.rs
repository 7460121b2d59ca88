pub const DEFAULT_NPI_API_BASE_URL: &str = "https://npiregistry.cms.hhs.gov/api/";
pub const DEFAULT_NPI_API_VERSION: &str = "2.1";
pub const DEFAULT_GEOCODER_BASE_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_OUTPUT_PATH: &str = "data/neurologists.json";
pub const DEFAULT_TARGET_STATE: &str = "WA";
pub const DEFAULT_USER_AGENT: &str = "wa-stroke-neurologist-map";

pub const NPPES_API_DOC_URL: &str = "https://npiregistry.cms.hhs.gov/api-page";
pub const NOMINATIM_USAGE_POLICY_URL: &str = "https://operations.osmfoundation.org/policies/nominatim/";
pub const WA_DOH_CREDENTIAL_SEARCH_URL: &str =
    "https://fortress.wa.gov/doh/providercredentialsearch/";

/// Registry taxonomy searches, most specific first so its records win dedup.
pub const SEARCH_TERMS: [&str; 2] = ["Vascular Neurology", "Neurology"];

/// Lowercase substrings that mark a taxonomy as stroke/vascular neurology.
pub const TARGET_SPECIALTY_KEYWORDS: [&str; 2] = ["vascular", "stroke"];
pub const DEFAULT_SPECIALTY: &str = "Neurology";

pub const LOCATION_ADDRESS_PURPOSE: &str = "LOCATION";
pub const NPPES_SOURCE_TAG: &str = "NPPES";
