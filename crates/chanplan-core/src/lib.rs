//! # Wireless Band/Channel/Width Resolution Engine
//!
//! This crate computes what a wireless configuration UI may offer: given a
//! radio's raw capability enumeration and a country-keyed regulatory channel
//! table for sub-gigahertz operation, it derives the cascading, mutually
//! constrained option sets for PHY mode, band, channel width and channel,
//! and keeps a user's selection valid as any upstream field changes.
//!
//! ## Overview
//!
//! - **Channel map**: country-keyed 802.11ah regulatory table, fetched once
//!   through a transport seam and cached single-flight
//! - **Frequency classification**: kHz normalisation and band bucketing of
//!   the radio's frequency list
//! - **Capability tables**: fixed mode/width/band skeletons gated by the
//!   radio's capability flags
//! - **Cascade resolution**: the dependent-field state machine with the
//!   no-dangling-selection rule
//! - **Config binding**: the two persisted band encodings (`band` option
//!   and legacy `hwmode`), kept stable across saves
//!
//! ## Data Flow
//!
//! ```text
//! capabilities ─► classify ─► capability tables ──┐
//!                                                 ├─► cascade resolver ─► persisted fields
//! table source ─► channel map (single-flight) ────┘        ▲    │
//!                                                          │    ▼
//!                                                     field edits / option sets
//! ```
//!
//! ## Example
//!
//! ```
//! use chanplan_core::prelude::*;
//!
//! let caps = RadioCapabilities::from_json(r#"{
//!     "freqlist": [
//!         { "channel": 1,  "mhz": 2412 },
//!         { "channel": 6,  "mhz": 2437 },
//!         { "channel": 11, "mhz": 2462 },
//!         { "channel": 36, "mhz": 5180 },
//!         { "channel": 40, "mhz": 5200 },
//!         { "channel": 44, "mhz": 5220 },
//!         { "channel": 48, "mhz": 5240 }
//!     ],
//!     "hwmodelist": { "n": true, "ac": true },
//!     "htmodelist": { "HT20": true, "HT40": true, "VHT80": true }
//! }"#).unwrap();
//!
//! // The loader owns the transport and caches the parsed map
//! let loader = ChannelMapLoader::new(Box::new(StaticTableSource::new(
//!     "country_code,s1g_chan,bw,centre_freq_mhz,usable\nUS,43,8,909.0,1\n",
//! )));
//!
//! let fields = PersistedFields::default();
//! let mut resolver = CascadeResolver::seed(
//!     &fields, DeviceClass::Standard, &caps, loader.load(), true);
//!
//! assert_eq!(resolver.selection().band, Some(Band::Band2g));
//!
//! resolver.apply(FieldChange::Mode(Mode::N));
//! assert_eq!(resolver.selection().mode, Mode::N);
//! assert_eq!(resolver.to_persisted().htmode.as_deref(), Some("HT20"));
//! ```

pub mod capability;
pub mod cascade;
pub mod channel_map;
pub mod config_binding;
pub mod country;
pub mod freq_classifier;
pub mod loader;
pub mod tx_power;
pub mod types;

// Re-export main types
pub use capability::{CapabilityTables, DeviceClass, ModeOption, RadioCapabilities, WidthOption};
pub use cascade::{CascadeResolver, ChangeSummary, Field, FieldChange, OptionSets, SelectionState, WidthRow};
pub use channel_map::{ChannelMap, ChannelMapEntry, DEFAULT_S1G_COUNTRY, DRIVER_COUNTRIES};
pub use config_binding::{BandEncoding, ConfigStore, MemoryConfigStore, PersistedFields};
pub use freq_classifier::{BandChannels, ChannelOption, RawFrequencyEntry};
pub use loader::{ChannelMapLoader, FetchError, FileTableSource, StaticTableSource, TableSource};
pub use types::{Band, Channel, HtWidth, Mode, PlanError, PlanResult, Width};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::capability::{CapabilityTables, DeviceClass, RadioCapabilities};
    pub use crate::cascade::{CascadeResolver, ChangeSummary, Field, FieldChange, SelectionState};
    pub use crate::channel_map::{ChannelMap, ChannelMapEntry};
    pub use crate::config_binding::{BandEncoding, ConfigStore, MemoryConfigStore, PersistedFields};
    pub use crate::country::{CountryInfo, CountryOption};
    pub use crate::freq_classifier::{BandChannels, ChannelOption, RawFrequencyEntry};
    pub use crate::loader::{ChannelMapLoader, FileTableSource, StaticTableSource, TableSource};
    pub use crate::tx_power::{TxPowerLevel, TxPowerOption};
    pub use crate::types::{Band, Channel, HtWidth, Mode, PlanError, PlanResult, Width};
}
