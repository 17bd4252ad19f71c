//! Frequency classification into selectable channel buckets
//!
//! The radio reports its tunable frequencies as a flat ordered list. This
//! module normalises each entry and buckets it by band so the capability
//! tables and the cascade can reason about "the 5 GHz channels" directly.
//!
//! Some sub-gigahertz drivers report kilohertz where megahertz is expected;
//! values landing in the 800 000 to 1 000 000 window are scaled down by a
//! thousand before classification.
//!
//! ```text
//!    2412 -  2484 MHz   2.4 GHz
//!    5160 -  5885 MHz   5 GHz
//!    5925 -  7125 MHz   6 GHz
//!   58320 - 69120 MHz   60 GHz
//!     800 -  1000 MHz   sub-1 GHz
//! ```
//!
//! Anything outside these windows is dropped. Within a bucket the radio's
//! reporting order is preserved.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{format_channel, Band, Channel};

/// One frequency as enumerated by the radio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawFrequencyEntry {
    pub channel: u16,
    pub mhz: f64,
    /// Regulatory restriction flag; restricted channels are listed but not
    /// selectable.
    #[serde(default)]
    pub restricted: bool,
}

/// A selectable (or visibly unselectable) channel row.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelOption {
    pub channel: Channel,
    pub label: String,
    pub selectable: bool,
}

impl ChannelOption {
    /// The automatic-channel-selection placeholder.
    pub fn auto() -> ChannelOption {
        ChannelOption {
            channel: Channel::Auto,
            label: "auto".to_string(),
            selectable: true,
        }
    }

    /// A concrete channel row.
    pub fn num(channel: u16, mhz: f64, selectable: bool) -> ChannelOption {
        ChannelOption {
            channel: Channel::Num(channel),
            label: format_channel(channel, mhz),
            selectable,
        }
    }
}

const BAND_RANGES: [(f64, f64, Band); 5] = [
    (2412.0, 2484.0, Band::Band2g),
    (5160.0, 5885.0, Band::Band5g),
    (5925.0, 7125.0, Band::Band6g),
    (58_320.0, 69_120.0, Band::Band60g),
    (800.0, 1000.0, Band::S1g),
];

/// Scale kilohertz-encoded sub-gigahertz values down to MHz.
pub fn normalize_mhz(mhz: f64) -> f64 {
    if (800_000.0..=1_000_000.0).contains(&mhz) {
        mhz / 1000.0
    } else {
        mhz
    }
}

/// Band for a normalised frequency, if it falls in a known window.
pub fn band_for_mhz(mhz: f64) -> Option<Band> {
    BAND_RANGES
        .iter()
        .find(|(lo, hi, _)| (*lo..=*hi).contains(&mhz))
        .map(|(_, _, band)| *band)
}

/// Channel options bucketed by band.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BandChannels {
    buckets: HashMap<Band, Vec<ChannelOption>>,
}

impl BandChannels {
    /// Classify the radio's frequency list.
    ///
    /// With `acs` set, the 2.4 GHz and 5 GHz buckets are seeded with a
    /// leading `auto` option before any frequencies land in them; the other
    /// bands never get one.
    pub fn classify(entries: &[RawFrequencyEntry], acs: bool) -> BandChannels {
        let mut buckets: HashMap<Band, Vec<ChannelOption>> = HashMap::new();
        if acs {
            buckets.insert(Band::Band2g, vec![ChannelOption::auto()]);
            buckets.insert(Band::Band5g, vec![ChannelOption::auto()]);
        }
        for entry in entries {
            let mhz = normalize_mhz(entry.mhz);
            let band = match band_for_mhz(mhz) {
                Some(band) => band,
                None => continue,
            };
            buckets
                .entry(band)
                .or_default()
                .push(ChannelOption::num(entry.channel, mhz, !entry.restricted));
        }
        BandChannels { buckets }
    }

    /// Channel options for a band; empty when nothing classified there.
    pub fn options(&self, band: Band) -> &[ChannelOption] {
        self.buckets.get(&band).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of options in a band's bucket.
    pub fn count(&self, band: Band) -> usize {
        self.options(band).len()
    }
}
