//! Capability tables: what the radio may be asked to do
//!
//! The radio's capability payload (frequency list plus two capability flag
//! sets) is decoded here and combined with the classified channel buckets
//! into fixed-shape option tables. The skeletons never change; capability
//! flags only decide which entries are selectable, and channel counts decide
//! which bands are offered at all:
//!
//! ```text
//!   mode      widths                     bands offered
//!   Legacy    -                          2.4* / 5* / 60 GHz / sub-1 GHz
//!   n         HT20  HT40                 2.4* / 5*
//!   ac        VHT20 VHT40 VHT80 VHT160   5
//!   ax        HE20  HE40  HE80  HE160    2.4* / 5*
//!
//!   *  needs more than three classified channel options
//!      60 GHz and sub-1 GHz need at least one
//! ```
//!
//! 6 GHz frequencies are classified but no mode offers the band.
//!
//! Sub-gigahertz-only radios report nothing useful before a regulatory
//! region is committed, so they bypass these tables entirely; see
//! [`DeviceClass`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::freq_classifier::{BandChannels, RawFrequencyEntry};
use crate::types::{htmode_token, Band, HtWidth, Mode, PlanError, PlanResult};

/// Device type identifier the sub-gigahertz driver registers under.
pub const SUBGHZ_DEVICE_TYPE: &str = "morse";

/// Raw capability payload as produced by the radio enumeration RPC.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RadioCapabilities {
    /// Tunable frequencies in the radio's own reporting order
    #[serde(default, rename = "freqlist")]
    pub frequencies: Vec<RawFrequencyEntry>,
    /// PHY mode support flags (`n`, `ac`, `ax`)
    #[serde(default, rename = "hwmodelist")]
    pub hw_modes: HashMap<String, bool>,
    /// Width token support flags (`HT40`, `VHT80`, `HE160`, ...)
    #[serde(default, rename = "htmodelist")]
    pub ht_modes: HashMap<String, bool>,
}

impl RadioCapabilities {
    /// Decode a capability payload.
    pub fn from_json(text: &str) -> PlanResult<RadioCapabilities> {
        serde_json::from_str(text).map_err(|err| PlanError::Capability(err.to_string()))
    }

    /// Whether the radio supports a PHY mode. `Legacy` always does.
    pub fn supports_mode(&self, mode: Mode) -> bool {
        match mode {
            Mode::Legacy => true,
            other => self.hw_modes.get(other.ident()).copied().unwrap_or(false),
        }
    }

    /// Whether the radio supports a width token.
    pub fn supports_htmode(&self, token: &str) -> bool {
        self.ht_modes.get(token).copied().unwrap_or(false)
    }
}

/// Device classification driving which resolution path applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    /// Capability-table driven (2.4/5/6/60 GHz radios)
    Standard,
    /// Channel-map driven sub-gigahertz radio
    SubGhz,
}

impl DeviceClass {
    /// Classify from the persisted device `type` option.
    pub fn from_device_type(device_type: Option<&str>) -> DeviceClass {
        if device_type == Some(SUBGHZ_DEVICE_TYPE) {
            DeviceClass::SubGhz
        } else {
            DeviceClass::Standard
        }
    }
}

/// A PHY mode row. Every mode is always listed; `available` gates selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeOption {
    pub mode: Mode,
    pub available: bool,
}

/// A width row for a standard band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidthOption {
    pub width: HtWidth,
    /// Persisted token for this `(mode, width)` pair
    pub token: &'static str,
    pub available: bool,
}

const MODE_ORDER: [Mode; 4] = [Mode::Legacy, Mode::N, Mode::Ac, Mode::Ax];

fn width_ladder(mode: Mode) -> &'static [HtWidth] {
    match mode {
        Mode::Legacy => &[],
        Mode::N => &[HtWidth::W20, HtWidth::W40],
        Mode::Ac | Mode::Ax => &[
            HtWidth::W20,
            HtWidth::W40,
            HtWidth::W80,
            HtWidth::W160,
        ],
    }
}

/// Mode, width and band option tables for one radio.
#[derive(Debug, Clone, PartialEq)]
pub struct CapabilityTables {
    modes: Vec<ModeOption>,
    widths: HashMap<Mode, Vec<WidthOption>>,
    bands: HashMap<Mode, Vec<Band>>,
}

impl CapabilityTables {
    /// Build the tables from a capability payload and classified channels.
    pub fn build(caps: &RadioCapabilities, channels: &BandChannels) -> CapabilityTables {
        let modes = MODE_ORDER
            .iter()
            .map(|&mode| ModeOption {
                mode,
                available: caps.supports_mode(mode),
            })
            .collect();

        let mut widths = HashMap::new();
        for &mode in &MODE_ORDER {
            let rows = width_ladder(mode)
                .iter()
                .filter_map(|&width| {
                    htmode_token(mode, width).map(|token| WidthOption {
                        width,
                        token,
                        available: caps.supports_htmode(token),
                    })
                })
                .collect();
            widths.insert(mode, rows);
        }

        let populated = |band: Band| channels.count(band) > 0;
        let multi = |band: Band| channels.count(band) > 3;
        let mut bands = HashMap::new();
        for &mode in &MODE_ORDER {
            let mut offered = Vec::new();
            match mode {
                Mode::Legacy => {
                    if multi(Band::Band2g) {
                        offered.push(Band::Band2g);
                    }
                    if multi(Band::Band5g) {
                        offered.push(Band::Band5g);
                    }
                    if populated(Band::Band60g) {
                        offered.push(Band::Band60g);
                    }
                    if populated(Band::S1g) {
                        offered.push(Band::S1g);
                    }
                }
                Mode::N | Mode::Ax => {
                    if multi(Band::Band2g) {
                        offered.push(Band::Band2g);
                    }
                    if multi(Band::Band5g) {
                        offered.push(Band::Band5g);
                    }
                }
                // The ac band list does not depend on channel counts
                Mode::Ac => offered.push(Band::Band5g),
            }
            bands.insert(mode, offered);
        }

        CapabilityTables {
            modes,
            widths,
            bands,
        }
    }

    /// Mode rows in fixed order.
    pub fn modes(&self) -> &[ModeOption] {
        &self.modes
    }

    /// Width rows for a mode.
    pub fn widths(&self, mode: Mode) -> &[WidthOption] {
        self.widths.get(&mode).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Bands offered for a mode.
    pub fn bands(&self, mode: Mode) -> &[Band] {
        self.bands.get(&mode).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether a mode is selectable on this radio.
    pub fn mode_available(&self, mode: Mode) -> bool {
        self.modes
            .iter()
            .any(|m| m.mode == mode && m.available)
    }
}
