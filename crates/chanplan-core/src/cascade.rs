//! Cascading selection resolution
//!
//! The four user-facing fields depend on each other in one direction only,
//! and the dependency chain differs between the two device paths:
//!
//! ```text
//!   standard:    mode ──► offered bands ──► band ──► width ladder
//!                                             │
//!                                             └────► channel options
//!
//!   sub-1 GHz:   country ──► widths (channel map) ──► width ──► channels
//! ```
//!
//! [`CascadeResolver`] owns the selection and its option sets and enforces
//! one rule throughout: a selected value is always a member of its current
//! option set and selectable there. Whenever an upstream edit invalidates a
//! downstream value, the value moves to the first selectable option, or to
//! nothing when the set is empty. An entirely empty cascade is a valid
//! state, not an error.
//!
//! Seeding from persisted configuration is the one distinguished silent
//! transition: it reconstructs the full cascade without reporting changes.
//! Interactive edits go through [`CascadeResolver::apply`], which recomputes
//! everything downstream in the same call and reports which fields moved.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use chanplan_core::capability::{DeviceClass, RadioCapabilities};
//! use chanplan_core::cascade::{CascadeResolver, FieldChange};
//! use chanplan_core::channel_map::ChannelMap;
//! use chanplan_core::config_binding::PersistedFields;
//! use chanplan_core::types::{Band, Mode};
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
//! let map = Arc::new(ChannelMap::default());
//! let mut resolver = CascadeResolver::seed(
//!     &PersistedFields::default(), DeviceClass::Standard, &caps, map, true);
//!
//! // An empty config seeds legacy mode on the first offered band
//! assert_eq!(resolver.selection().band, Some(Band::Band2g));
//!
//! // Switching to ac moves the cascade to 5 GHz and re-derives the channels
//! resolver.apply(FieldChange::Mode(Mode::Ac));
//! assert_eq!(resolver.selection().band, Some(Band::Band5g));
//! assert_eq!(resolver.options().channels.len(), 5);
//! ```

use std::sync::Arc;

use tracing::debug;

use crate::capability::{CapabilityTables, DeviceClass, ModeOption, RadioCapabilities};
use crate::channel_map::{ChannelMap, DEFAULT_S1G_COUNTRY};
use crate::config_binding::{self, BandEncoding, PersistedFields};
use crate::freq_classifier::{BandChannels, ChannelOption};
use crate::types::{mode_from_htmode, parse_htmode, Band, Channel, Mode, Width};

/// The user-facing selection.
///
/// `band`, `width` and `channel` may be empty when their option sets are;
/// they are never set to something their current option set does not offer.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionState {
    pub mode: Mode,
    pub band: Option<Band>,
    pub width: Option<Width>,
    pub channel: Option<Channel>,
    pub country: Option<String>,
}

/// A width selector row.
///
/// Standard bands list the mode's HT/VHT/HE ladder with availability flags;
/// the sub-gigahertz band lists the map-derived bandwidths, widest first.
#[derive(Debug, Clone, PartialEq)]
pub struct WidthRow {
    pub width: Width,
    pub label: String,
    pub selectable: bool,
}

/// The current option sets, as the presentation layer should render them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionSets {
    pub modes: Vec<ModeOption>,
    pub bands: Vec<Band>,
    pub widths: Vec<WidthRow>,
    pub channels: Vec<ChannelOption>,
}

/// An interactive edit to one field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldChange {
    Mode(Mode),
    Band(Band),
    Country(String),
    Width(Width),
    Channel(Channel),
}

/// The fields the resolver manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Mode,
    Band,
    Country,
    Width,
    Channel,
}

/// Which fields an [`CascadeResolver::apply`] call adjusted, by value or by
/// option set. This is what the presentation layer redraws.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSummary {
    touched: Vec<Field>,
}

impl ChangeSummary {
    pub fn touched(&self) -> &[Field] {
        &self.touched
    }

    pub fn contains(&self, field: Field) -> bool {
        self.touched.contains(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.touched.is_empty()
    }
}

/// Dependent-field state machine over one radio's selection.
pub struct CascadeResolver {
    device: DeviceClass,
    encoding: BandEncoding,
    tables: CapabilityTables,
    classified: BandChannels,
    map: Arc<ChannelMap>,
    state: SelectionState,
    options: OptionSets,
}

impl CascadeResolver {
    /// Reconstruct the full cascade from persisted configuration.
    ///
    /// This is the silent transition: every option set and value is derived
    /// here and nothing is reported as changed. Persisted values are kept
    /// where their option set still offers them and re-selected otherwise,
    /// with one exception: a persisted channel facing an empty option set
    /// stays visible, since an empty set gives no basis to reject it.
    pub fn seed(
        fields: &PersistedFields,
        device: DeviceClass,
        caps: &RadioCapabilities,
        map: Arc<ChannelMap>,
        acs: bool,
    ) -> CascadeResolver {
        let classified = BandChannels::classify(&caps.frequencies, acs);
        let tables = CapabilityTables::build(caps, &classified);
        let encoding = BandEncoding::detect(device, fields);
        let mut resolver = CascadeResolver {
            device,
            encoding,
            tables,
            classified,
            map,
            state: SelectionState {
                mode: Mode::Legacy,
                band: None,
                width: None,
                channel: None,
                country: fields.country.clone(),
            },
            options: OptionSets::default(),
        };
        resolver.options.modes = resolver.tables.modes().to_vec();
        match device {
            DeviceClass::SubGhz => resolver.seed_subghz(fields),
            DeviceClass::Standard => resolver.seed_standard(fields),
        }
        resolver
    }

    /// Apply one interactive edit and recompute everything downstream.
    ///
    /// Edits to values the current option sets do not offer are ignored, as
    /// are mode and band edits on sub-gigahertz devices, whose band is
    /// pinned. The summary lists the fields whose value or option set
    /// actually moved; an edit that changes nothing reports nothing.
    pub fn apply(&mut self, change: FieldChange) -> ChangeSummary {
        let before_state = self.state.clone();
        let before_options = self.options.clone();

        match change {
            FieldChange::Mode(_) | FieldChange::Band(_)
                if self.device == DeviceClass::SubGhz =>
            {
                debug!("sub-gigahertz device, mode and band are pinned");
                return ChangeSummary::default();
            }
            FieldChange::Mode(mode) => {
                if !self.tables.mode_available(mode) {
                    debug!(mode = %mode, "ignoring change to unavailable mode");
                    return ChangeSummary::default();
                }
                self.state.mode = mode;
                self.options.bands = self.tables.bands(mode).to_vec();
                self.reselect_band();
                self.rebuild_widths();
                self.reselect_width();
                self.rebuild_channels();
                self.reselect_channel();
            }
            FieldChange::Band(band) => {
                if !self.options.bands.contains(&band) {
                    debug!(band = %band, "ignoring change to unoffered band");
                    return ChangeSummary::default();
                }
                self.state.band = Some(band);
                self.rebuild_widths();
                self.reselect_width();
                self.rebuild_channels();
                self.reselect_channel();
            }
            FieldChange::Country(country) => {
                self.state.country = Some(country);
                if self.s1g_active() {
                    self.rebuild_widths();
                    // A region change starts over from the widest width
                    self.state.width = self.widest();
                    self.rebuild_channels();
                    self.reselect_channel();
                }
            }
            FieldChange::Width(width) => {
                if !self.width_selectable(width) {
                    debug!("ignoring change to unavailable width");
                    return ChangeSummary::default();
                }
                self.state.width = Some(width);
                // HT widths do not constrain the channel list; map-derived
                // widths do
                if matches!(width, Width::S1g(_)) {
                    self.rebuild_channels();
                    self.reselect_channel();
                }
            }
            FieldChange::Channel(channel) => {
                let listed = self
                    .options
                    .channels
                    .iter()
                    .any(|o| o.selectable && o.channel == channel);
                if !listed {
                    debug!(channel = %channel, "ignoring change to unlisted channel");
                    return ChangeSummary::default();
                }
                self.state.channel = Some(channel);
            }
        }

        self.diff(&before_state, &before_options)
    }

    /// The current selection.
    pub fn selection(&self) -> &SelectionState {
        &self.state
    }

    /// The current option sets.
    pub fn options(&self) -> &OptionSets {
        &self.options
    }

    pub fn device(&self) -> DeviceClass {
        self.device
    }

    /// The band encoding this resolver keeps writing.
    pub fn encoding(&self) -> BandEncoding {
        self.encoding
    }

    /// Encode the current selection for the configuration store.
    pub fn to_persisted(&self) -> PersistedFields {
        config_binding::encode(&self.state, self.device, self.encoding)
    }

    // -- seeding ----------------------------------------------------------

    fn seed_subghz(&mut self, fields: &PersistedFields) {
        self.state.country = Some(
            fields
                .country
                .clone()
                .unwrap_or_else(|| DEFAULT_S1G_COUNTRY.to_string()),
        );
        self.state.band = Some(Band::S1g);
        self.options.bands = vec![Band::S1g];
        self.rebuild_widths();
        let persisted = fields.channel.as_deref().and_then(Channel::from_ident);
        self.state.width = self.width_from_channel(persisted).or_else(|| self.widest());
        self.rebuild_channels();
        self.state.channel = self.seed_channel(persisted);
    }

    fn seed_standard(&mut self, fields: &PersistedFields) {
        self.state.mode = mode_from_htmode(fields.htmode.as_deref());
        self.options.bands = self.tables.bands(self.state.mode).to_vec();
        self.state.band = config_binding::decode_band(fields, self.encoding)
            .filter(|band| self.options.bands.contains(band))
            .or_else(|| self.options.bands.first().copied());
        self.rebuild_widths();
        let persisted = fields.channel.as_deref().and_then(Channel::from_ident);
        self.state.width = if self.state.band == Some(Band::S1g) {
            self.width_from_channel(persisted).or_else(|| self.widest())
        } else {
            fields
                .htmode
                .as_deref()
                .and_then(parse_htmode)
                .map(|(_, width)| Width::Ht(width))
                .filter(|width| self.width_selectable(*width))
                .or_else(|| self.first_selectable_width())
        };
        self.rebuild_channels();
        self.state.channel = self.seed_channel(persisted);
    }

    fn seed_channel(&self, persisted: Option<Channel>) -> Option<Channel> {
        if self.options.channels.is_empty() {
            return persisted;
        }
        self.reselect_channel_value(persisted)
    }

    // -- recomputation ----------------------------------------------------

    /// The sub-gigahertz path is active for dedicated sub-gigahertz devices
    /// and whenever a standard device has the sub-gigahertz band selected.
    fn s1g_active(&self) -> bool {
        self.device == DeviceClass::SubGhz || self.state.band == Some(Band::S1g)
    }

    fn country_or_default(&self) -> &str {
        self.state.country.as_deref().unwrap_or(DEFAULT_S1G_COUNTRY)
    }

    fn rebuild_widths(&mut self) {
        self.options.widths = if self.s1g_active() {
            self.map
                .widths(self.country_or_default())
                .into_iter()
                .map(|bw| WidthRow {
                    width: Width::S1g(bw),
                    label: format!("{} MHz", bw),
                    selectable: true,
                })
                .collect()
        } else {
            self.tables
                .widths(self.state.mode)
                .iter()
                .map(|w| WidthRow {
                    width: Width::Ht(w.width),
                    label: w.width.label().to_string(),
                    selectable: w.available,
                })
                .collect()
        };
    }

    fn rebuild_channels(&mut self) {
        self.options.channels = match self.state.band {
            None => Vec::new(),
            // With a populated width selector the map drives the channel
            // list; without one the classified bucket is all there is
            Some(Band::S1g) if !self.options.widths.is_empty() => match self.state.width {
                Some(Width::S1g(bw)) => self
                    .map
                    .channels_for_width(self.country_or_default(), bw)
                    .into_iter()
                    .map(|e| ChannelOption::num(e.s1g_chan, e.centre_freq_mhz, true))
                    .collect(),
                _ => Vec::new(),
            },
            Some(band) => self.classified.options(band).to_vec(),
        };
    }

    fn width_from_channel(&self, persisted: Option<Channel>) -> Option<Width> {
        match persisted {
            Some(Channel::Num(chan)) => self
                .map
                .width_for_channel(self.country_or_default(), chan)
                .map(Width::S1g),
            _ => None,
        }
    }

    fn widest(&self) -> Option<Width> {
        self.options.widths.first().map(|row| row.width)
    }

    fn width_selectable(&self, width: Width) -> bool {
        self.options
            .widths
            .iter()
            .any(|row| row.selectable && row.width == width)
    }

    fn first_selectable_width(&self) -> Option<Width> {
        self.options
            .widths
            .iter()
            .find(|row| row.selectable)
            .map(|row| row.width)
    }

    fn reselect_band(&mut self) {
        let keep = self
            .state
            .band
            .map_or(false, |band| self.options.bands.contains(&band));
        if !keep {
            self.state.band = self.options.bands.first().copied();
        }
    }

    fn reselect_width(&mut self) {
        let keep = self
            .state
            .width
            .map_or(false, |width| self.width_selectable(width));
        if !keep {
            self.state.width = self.first_selectable_width();
        }
    }

    fn reselect_channel(&mut self) {
        self.state.channel = self.reselect_channel_value(self.state.channel);
    }

    fn reselect_channel_value(&self, current: Option<Channel>) -> Option<Channel> {
        let keep = current.map_or(false, |chan| {
            self.options
                .channels
                .iter()
                .any(|o| o.selectable && o.channel == chan)
        });
        if keep {
            current
        } else {
            self.options
                .channels
                .iter()
                .find(|o| o.selectable)
                .map(|o| o.channel)
        }
    }

    fn diff(&self, state: &SelectionState, options: &OptionSets) -> ChangeSummary {
        let mut touched = Vec::new();
        if state.mode != self.state.mode {
            touched.push(Field::Mode);
        }
        if state.band != self.state.band || options.bands != self.options.bands {
            touched.push(Field::Band);
        }
        if state.country != self.state.country {
            touched.push(Field::Country);
        }
        if state.width != self.state.width || options.widths != self.options.widths {
            touched.push(Field::Width);
        }
        if state.channel != self.state.channel || options.channels != self.options.channels {
            touched.push(Field::Channel);
        }
        if !touched.is_empty() {
            debug!(?touched, "cascade recomputed");
        }
        ChangeSummary { touched }
    }
}
