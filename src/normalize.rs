use std::collections::HashSet;

use crate::{
    common::non_empty,
    constants::{
        DEFAULT_SPECIALTY, LOCATION_ADDRESS_PURPOSE, NPPES_SOURCE_TAG, TARGET_SPECIALTY_KEYWORDS,
    },
    geocode::Geocoder,
    record::{Npi, Position, ProviderRecord},
    registry::{RawAddress, RawBasic, RawProvider, RawTaxonomy},
};

/// NPIs already handled in one collection run.
#[derive(Debug, Default)]
pub struct SeenProviders {
    npis: HashSet<Npi>,
}

impl SeenProviders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `npi`; returns false if it was already present.
    pub fn insert(&mut self, npi: Npi) -> bool {
        self.npis.insert(npi)
    }

    pub fn contains(&self, npi: Npi) -> bool {
        self.npis.contains(&npi)
    }

    pub fn len(&self) -> usize {
        self.npis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.npis.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Specialty {
    pub description: String,
    pub is_target: bool,
}

/// Shapes one registry result into a `ProviderRecord`.
///
/// The NPI is marked seen before the address check, so a provider dropped for
/// having no address is never reconsidered later in the run.
pub async fn normalize_provider(
    raw: &RawProvider,
    seen: &mut SeenProviders,
    geocoder: &Geocoder,
    state: &str,
) -> Option<ProviderRecord> {
    let Some(npi) = raw.number.as_ref().and_then(|n| n.to_npi()) else {
        tracing::warn!("Skipping registry result without a usable NPI: {:?}", raw.number);
        return None;
    };

    if !seen.insert(npi) {
        tracing::debug!("Skipping duplicate NPI {npi}");
        return None;
    }

    let Some(practice) = select_practice_address(&raw.addresses) else {
        tracing::debug!("Skipping NPI {npi}: no addresses");
        return None;
    };

    let specialty = classify_specialty(&raw.taxonomies);
    let address = street_line(practice);
    let city = practice.city.clone().unwrap_or_default();
    let zip = practice.postal_code.clone().unwrap_or_default();

    let coordinates = geocoder.locate(&address, &city, state, &zip).await;

    Some(ProviderRecord {
        npi,
        name: display_name(&raw.basic),
        credentials: raw.basic.credential.clone().unwrap_or_default(),
        specialty: specialty.description,
        is_vascular_neurology: specialty.is_target,
        organization: raw.basic.organization_name.clone().unwrap_or_default(),
        address,
        city,
        state: state.to_string(),
        zip,
        phone: practice.telephone_number.clone().unwrap_or_default(),
        position: Position::from(coordinates),
        source: NPPES_SOURCE_TAG.to_string(),
    })
}

pub fn select_practice_address(addresses: &[RawAddress]) -> Option<&RawAddress> {
    addresses
        .iter()
        .find(|a| a.address_purpose.as_deref() == Some(LOCATION_ADDRESS_PURPOSE))
        .or_else(|| addresses.first())
}

pub fn classify_specialty(taxonomies: &[RawTaxonomy]) -> Specialty {
    taxonomies
        .iter()
        .filter_map(|t| t.desc.as_deref())
        .find(|desc| {
            let lower = desc.to_lowercase();
            TARGET_SPECIALTY_KEYWORDS.iter().any(|k| lower.contains(*k))
        })
        .map(|desc| Specialty {
            description: desc.to_string(),
            is_target: true,
        })
        .unwrap_or_else(|| Specialty {
            description: DEFAULT_SPECIALTY.to_string(),
            is_target: false,
        })
}

pub fn display_name(basic: &RawBasic) -> String {
    let parts: Vec<&str> = [
        basic.first_name.as_deref(),
        basic.middle_name.as_deref(),
        basic.last_name.as_deref(),
    ]
    .into_iter()
    .filter_map(non_empty)
    .collect();

    let name = parts.join(" ");
    match non_empty(basic.credential.as_deref()) {
        Some(credential) => format!("{name}, {credential}"),
        None => name,
    }
}

fn street_line(address: &RawAddress) -> String {
    let line1 = address.address_1.clone().unwrap_or_default();
    match non_empty(address.address_2.as_deref()) {
        Some(line2) => format!("{line1} {line2}"),
        None => line1,
    }
}
