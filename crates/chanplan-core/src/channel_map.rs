//! Regulatory channel map for sub-gigahertz operation
//!
//! Country-keyed table of 802.11ah channel allocations. The driver cannot
//! enumerate usable sub-gigahertz channels itself before a regulatory region
//! is committed, so the table is shipped out of band as comma-separated text
//! with a header row and parsed here into a read-only map:
//!
//! ```text
//!   country_code -> s1g_chan -> { bw, centre_freq_mhz, usable }
//! ```
//!
//! Parsing is best effort. Rows for countries the driver does not support,
//! rows failing the usability gate and rows that do not parse are dropped
//! without failing the whole table.
//!
//! ## Example
//!
//! ```
//! use chanplan_core::channel_map::ChannelMap;
//!
//! let map = ChannelMap::parse(
//!     "country_code,s1g_chan,bw,centre_freq_mhz,usable\n\
//!      US,1,1,902.5,1\n\
//!      US,3,2,903.0,1\n\
//!      XX,5,4,910.0,1\n",
//! );
//! assert_eq!(map.widths("US"), vec![2, 1]);
//! assert_eq!(map.channels("XX").count(), 0);
//! ```

use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Regions the sub-gigahertz driver ships regulatory data for.
///
/// The driver treats `EU` as a single region rather than splitting it into
/// member states.
pub const DRIVER_COUNTRIES: [&str; 8] = ["US", "AU", "NZ", "EU", "IN", "JP", "KR", "SG"];

/// Region assumed when a sub-gigahertz device has no persisted country.
pub const DEFAULT_S1G_COUNTRY: &str = "US";

/// One row of the regulatory table.
///
/// Identity is `(country_code, s1g_chan)`; the same channel number may carry
/// different bandwidths in different regions.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelMapEntry {
    pub country_code: String,
    pub s1g_chan: u16,
    /// Channel bandwidth in MHz (1, 2, 4, 8 or 16)
    pub bw_mhz: u8,
    pub centre_freq_mhz: f64,
    /// Usability gate; rows arriving with anything but the truthy sentinel
    /// never make it into the map.
    pub usable: bool,
}

/// Parsed regulatory table, keyed country -> channel.
///
/// Channels iterate in ascending channel-number order. Lookups for unknown
/// countries or channels yield no data rather than an error; an entirely
/// empty map is the degraded-load fallback and every accessor behaves
/// sensibly on it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelMap {
    countries: HashMap<String, BTreeMap<u16, ChannelMapEntry>>,
}

/// Header-derived column positions.
struct Columns {
    country: usize,
    chan: usize,
    bw: usize,
    freq: usize,
    usable: usize,
    column_count: usize,
}

impl Columns {
    fn locate(header: &[&str]) -> Option<Columns> {
        let col = |name: &str| header.iter().position(|h| *h == name);
        Some(Columns {
            country: col("country_code")?,
            chan: col("s1g_chan")?,
            bw: col("bw")?,
            freq: col("centre_freq_mhz")?,
            usable: col("usable")?,
            column_count: header.len(),
        })
    }

    /// Build an entry from one data row, or reject the row.
    fn entry(&self, fields: &[&str]) -> Option<ChannelMapEntry> {
        if fields.len() != self.column_count {
            return None;
        }
        let country = fields[self.country];
        if !DRIVER_COUNTRIES.contains(&country) {
            return None;
        }
        let usable = fields[self.usable] == "1";
        if !usable {
            return None;
        }
        Some(ChannelMapEntry {
            country_code: country.to_string(),
            s1g_chan: fields[self.chan].parse().ok()?,
            bw_mhz: fields[self.bw].parse().ok()?,
            centre_freq_mhz: fields[self.freq].parse().ok()?,
            usable,
        })
    }
}

impl ChannelMap {
    /// Parse the comma-separated regulatory table.
    ///
    /// The first non-empty line names the columns; column order is free.
    /// A table without the required columns parses as empty.
    pub fn parse(text: &str) -> ChannelMap {
        let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
        let header: Vec<&str> = match lines.next() {
            Some(line) => line.split(',').map(str::trim).collect(),
            None => return ChannelMap::default(),
        };
        let columns = match Columns::locate(&header) {
            Some(c) => c,
            None => {
                debug!("channel map header missing required columns, ignoring table");
                return ChannelMap::default();
            }
        };

        let mut countries: HashMap<String, BTreeMap<u16, ChannelMapEntry>> = HashMap::new();
        let mut rows = 0usize;
        let mut kept = 0usize;
        for line in lines {
            rows += 1;
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            if let Some(entry) = columns.entry(&fields) {
                kept += 1;
                countries
                    .entry(entry.country_code.clone())
                    .or_default()
                    .insert(entry.s1g_chan, entry);
            }
        }
        debug!(rows, kept, regions = countries.len(), "parsed channel map");
        ChannelMap { countries }
    }

    /// True when no usable row survived parsing (or nothing was loaded).
    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    /// Country codes present in the map, sorted.
    pub fn countries(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.countries.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }

    /// Entries for one country in ascending channel order.
    pub fn channels(&self, country: &str) -> impl Iterator<Item = &ChannelMapEntry> {
        self.countries
            .get(country)
            .into_iter()
            .flat_map(|chans| chans.values())
    }

    /// Look up a single channel.
    pub fn entry(&self, country: &str, s1g_chan: u16) -> Option<&ChannelMapEntry> {
        self.countries.get(country)?.get(&s1g_chan)
    }

    /// Distinct bandwidths available in a country, widest first.
    pub fn widths(&self, country: &str) -> Vec<u8> {
        let mut widths: Vec<u8> = self.channels(country).map(|e| e.bw_mhz).collect();
        widths.sort_unstable_by(|a, b| b.cmp(a));
        widths.dedup();
        widths
    }

    /// Entries for one country restricted to an exact bandwidth.
    pub fn channels_for_width(&self, country: &str, bw_mhz: u8) -> Vec<&ChannelMapEntry> {
        self.channels(country)
            .filter(|e| e.bw_mhz == bw_mhz)
            .collect()
    }

    /// Bandwidth of a persisted channel, if the map knows it.
    pub fn width_for_channel(&self, country: &str, s1g_chan: u16) -> Option<u8> {
        self.entry(country, s1g_chan).map(|e| e.bw_mhz)
    }
}
