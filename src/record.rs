use serde::{Deserialize, Serialize};
use std::fmt;

/// National Provider Identifier, the dedup key for a collection run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Npi(pub u64);

impl Npi {
    pub fn parse(value: &str) -> Option<Self> {
        value.trim().parse::<u64>().ok().map(Self)
    }
}

impl fmt::Display for Npi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Serialized latitude/longitude pair. Both are null or both are set; the only
/// way to build one is from an `Option<Coordinates>`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl Position {
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates {
                latitude,
                longitude,
            }),
            _ => None,
        }
    }

    pub fn is_known(&self) -> bool {
        self.coordinates().is_some()
    }
}

impl From<Option<Coordinates>> for Position {
    fn from(value: Option<Coordinates>) -> Self {
        match value {
            Some(c) => Self {
                latitude: Some(c.latitude),
                longitude: Some(c.longitude),
            },
            None => Self::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderRecord {
    pub npi: Npi,
    pub name: String,
    pub credentials: String,
    pub specialty: String,
    pub is_vascular_neurology: bool,
    pub organization: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub phone: String,
    #[serde(flatten)]
    pub position: Position,
    pub source: String,
}

/// Envelope written once per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub last_updated: String,
    pub total_count: usize,
    pub neurologists: Vec<ProviderRecord>,
}
