//! Country selector support
//!
//! Two very different sources feed the country selector. On the
//! sub-gigahertz path the driver will not even come up before a valid
//! region is committed, so it cannot be asked; the channel map's own region
//! keys are the only trustworthy list, and there is no driver default. On
//! the standard path the driver enumerates countries itself and a leading
//! driver-default entry (the empty code) is offered.
//!
//! The same applies to a standard device with the sub-gigahertz band
//! selected; the embedder picks the source based on the active band.

use serde::{Deserialize, Serialize};

use crate::channel_map::ChannelMap;
use crate::types::{PlanError, PlanResult};

/// One entry of the driver's country enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryInfo {
    pub iso3166: String,
    pub country: String,
}

/// A row in the country selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryOption {
    /// Persisted code; empty means driver default
    pub code: String,
    pub label: String,
}

/// Options for the sub-gigahertz path: the channel map's regions.
pub fn s1g_country_options(map: &ChannelMap) -> Vec<CountryOption> {
    map.countries()
        .into_iter()
        .map(|code| CountryOption {
            code: code.to_string(),
            label: code.to_string(),
        })
        .collect()
}

/// Options for the standard path, from the driver's enumeration.
///
/// An empty enumeration yields no options at all; the selector then falls
/// back to free-form entry.
pub fn driver_country_options(list: &[CountryInfo]) -> Vec<CountryOption> {
    if list.is_empty() {
        return Vec::new();
    }
    let mut options = vec![CountryOption {
        code: String::new(),
        label: "driver default".to_string(),
    }];
    for info in list {
        options.push(CountryOption {
            code: info.iso3166.clone(),
            label: format!("{} - {}", info.iso3166, info.country),
        });
    }
    options
}

/// Validate a country code for persistence.
///
/// The empty code (driver default) is valid; anything else must be two
/// characters from `A-Z0-9`.
pub fn validate_country_code(code: &str) -> PlanResult<()> {
    if code.is_empty() {
        return Ok(());
    }
    let alpha2 = code.len() == 2
        && code
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit());
    if alpha2 {
        Ok(())
    } else {
        Err(PlanError::InvalidCountry(code.to_string()))
    }
}
