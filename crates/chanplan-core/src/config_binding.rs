//! Persisted configuration binding
//!
//! The engine's durable state lives in a UCI-shaped store as plain string
//! options on a wireless section. Two generations of band encoding exist in
//! the wild and both must keep working:
//!
//! - the modern `band` option carrying a band identifier (`2g`, `5g`, ...),
//! - the legacy `hwmode` option carrying an 802.11 mode string (`11g`,
//!   `11a`, `11ah`).
//!
//! Which encoding a section uses is decided once, when it is loaded: a
//! present `hwmode` means the legacy encoding, and sub-gigahertz devices
//! always use it. The engine then keeps writing the same encoding so a save
//! never migrates a config behind the user's back.

use std::collections::HashMap;

use crate::capability::DeviceClass;
use crate::cascade::SelectionState;
use crate::types::{htmode_token, Band, Width};

/// Read/write seam over the configuration store.
///
/// `set` with `None` removes the option from the section.
pub trait ConfigStore {
    fn get(&self, section: &str, option: &str) -> Option<String>;
    fn set(&mut self, section: &str, option: &str, value: Option<&str>);
}

/// In-memory [`ConfigStore`] for tests and embedders without a real store.
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigStore {
    values: HashMap<(String, String), String>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn get(&self, section: &str, option: &str) -> Option<String> {
        self.values
            .get(&(section.to_string(), option.to_string()))
            .cloned()
    }

    fn set(&mut self, section: &str, option: &str, value: Option<&str>) {
        let key = (section.to_string(), option.to_string());
        match value {
            Some(v) => {
                self.values.insert(key, v.to_string());
            }
            None => {
                self.values.remove(&key);
            }
        }
    }
}

/// The raw persisted options of one wireless section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedFields {
    pub htmode: Option<String>,
    pub hwmode: Option<String>,
    pub band: Option<String>,
    pub channel: Option<String>,
    pub country: Option<String>,
    /// Device `type` discriminator; read to classify the device, never
    /// written back.
    pub device_type: Option<String>,
}

impl PersistedFields {
    /// Read the section's options from a store.
    pub fn load(store: &dyn ConfigStore, section: &str) -> PersistedFields {
        PersistedFields {
            htmode: store.get(section, "htmode"),
            hwmode: store.get(section, "hwmode"),
            band: store.get(section, "band"),
            channel: store.get(section, "channel"),
            country: store.get(section, "country"),
            device_type: store.get(section, "type"),
        }
    }

    /// Write the section's options back, deleting cleared ones.
    pub fn store(&self, store: &mut dyn ConfigStore, section: &str) {
        store.set(section, "htmode", self.htmode.as_deref());
        store.set(section, "hwmode", self.hwmode.as_deref());
        store.set(section, "band", self.band.as_deref());
        store.set(section, "channel", self.channel.as_deref());
        store.set(section, "country", self.country.as_deref());
    }
}

/// Which on-disk band encoding a section uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandEncoding {
    /// Modern `band` option with a band identifier
    BandOption,
    /// Legacy `hwmode` option with an 802.11 mode string
    HwMode,
}

impl BandEncoding {
    /// Decide the encoding for a freshly loaded section.
    pub fn detect(device: DeviceClass, fields: &PersistedFields) -> BandEncoding {
        if device == DeviceClass::SubGhz || fields.hwmode.is_some() {
            BandEncoding::HwMode
        } else {
            BandEncoding::BandOption
        }
    }
}

/// Decode a legacy `hwmode` string into a band.
pub fn band_from_hwmode(hwmode: &str) -> Band {
    if hwmode.contains("ah") {
        Band::S1g
    } else if hwmode.contains('a') {
        Band::Band5g
    } else {
        Band::Band2g
    }
}

/// Decode the persisted band under a known encoding.
pub fn decode_band(fields: &PersistedFields, encoding: BandEncoding) -> Option<Band> {
    match encoding {
        BandEncoding::HwMode => fields.hwmode.as_deref().map(band_from_hwmode),
        BandEncoding::BandOption => fields.band.as_deref().and_then(Band::from_ident),
    }
}

/// Encode a selection into persisted fields.
///
/// The width token is derived from the `(mode, width)` pair and cleared for
/// legacy mode and for the sub-gigahertz path, which carries its width in
/// the channel itself.
pub fn encode(
    state: &SelectionState,
    device: DeviceClass,
    encoding: BandEncoding,
) -> PersistedFields {
    let s1g = device == DeviceClass::SubGhz || state.band == Some(Band::S1g);

    let htmode = if s1g {
        None
    } else {
        match state.width {
            Some(Width::Ht(width)) => htmode_token(state.mode, width).map(str::to_string),
            _ => None,
        }
    };

    let (band, hwmode) = match encoding {
        BandEncoding::BandOption => (state.band.map(|b| b.ident().to_string()), None),
        BandEncoding::HwMode => {
            let hw = match state.band {
                Some(Band::S1g) => "11ah",
                Some(Band::Band2g) => "11g",
                _ => "11a",
            };
            (None, Some(hw.to_string()))
        }
    };

    PersistedFields {
        htmode,
        hwmode,
        band,
        channel: state.channel.map(|c| c.to_string()),
        country: state.country.clone(),
        device_type: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Channel, HtWidth, Mode};

    fn state(mode: Mode, band: Option<Band>, width: Option<Width>) -> SelectionState {
        SelectionState {
            mode,
            band,
            width,
            channel: Some(Channel::Num(36)),
            country: Some("US".to_string()),
        }
    }

    #[test]
    fn test_memory_store_set_get_delete() {
        let mut store = MemoryConfigStore::new();
        store.set("radio0", "channel", Some("11"));
        assert_eq!(store.get("radio0", "channel"), Some("11".to_string()));
        assert_eq!(store.get("radio1", "channel"), None);
        store.set("radio0", "channel", None);
        assert_eq!(store.get("radio0", "channel"), None);
    }

    #[test]
    fn test_load_reads_all_options() {
        let mut store = MemoryConfigStore::new();
        store.set("radio0", "htmode", Some("VHT80"));
        store.set("radio0", "hwmode", Some("11a"));
        store.set("radio0", "channel", Some("36"));
        store.set("radio0", "country", Some("US"));
        store.set("radio0", "type", Some("morse"));
        let fields = PersistedFields::load(&store, "radio0");
        assert_eq!(fields.htmode.as_deref(), Some("VHT80"));
        assert_eq!(fields.hwmode.as_deref(), Some("11a"));
        assert_eq!(fields.band, None);
        assert_eq!(fields.channel.as_deref(), Some("36"));
        assert_eq!(fields.country.as_deref(), Some("US"));
        assert_eq!(fields.device_type.as_deref(), Some("morse"));
    }

    #[test]
    fn test_store_deletes_cleared_options_but_not_type() {
        let mut store = MemoryConfigStore::new();
        store.set("radio0", "htmode", Some("HT40"));
        store.set("radio0", "type", Some("morse"));
        let fields = PersistedFields {
            channel: Some("auto".to_string()),
            ..Default::default()
        };
        fields.store(&mut store, "radio0");
        assert_eq!(store.get("radio0", "htmode"), None);
        assert_eq!(store.get("radio0", "channel"), Some("auto".to_string()));
        assert_eq!(store.get("radio0", "type"), Some("morse".to_string()));
    }

    #[test]
    fn test_encoding_detection() {
        let legacy = PersistedFields {
            hwmode: Some("11g".to_string()),
            ..Default::default()
        };
        let modern = PersistedFields {
            band: Some("2g".to_string()),
            ..Default::default()
        };
        assert_eq!(
            BandEncoding::detect(DeviceClass::Standard, &legacy),
            BandEncoding::HwMode
        );
        assert_eq!(
            BandEncoding::detect(DeviceClass::Standard, &modern),
            BandEncoding::BandOption
        );
        assert_eq!(
            BandEncoding::detect(DeviceClass::Standard, &PersistedFields::default()),
            BandEncoding::BandOption
        );
        // Sub-gigahertz devices always use the legacy encoding
        assert_eq!(
            BandEncoding::detect(DeviceClass::SubGhz, &modern),
            BandEncoding::HwMode
        );
    }

    #[test]
    fn test_band_from_hwmode() {
        assert_eq!(band_from_hwmode("11ah"), Band::S1g);
        assert_eq!(band_from_hwmode("11a"), Band::Band5g);
        assert_eq!(band_from_hwmode("11g"), Band::Band2g);
        assert_eq!(band_from_hwmode("11b"), Band::Band2g);
        assert_eq!(band_from_hwmode("11n"), Band::Band2g);
    }

    #[test]
    fn test_encode_band_option() {
        let fields = encode(
            &state(Mode::Ac, Some(Band::Band5g), Some(Width::Ht(HtWidth::W80))),
            DeviceClass::Standard,
            BandEncoding::BandOption,
        );
        assert_eq!(fields.band.as_deref(), Some("5g"));
        assert_eq!(fields.hwmode, None);
        assert_eq!(fields.htmode.as_deref(), Some("VHT80"));
        assert_eq!(fields.channel.as_deref(), Some("36"));
        assert_eq!(fields.country.as_deref(), Some("US"));
    }

    #[test]
    fn test_encode_hwmode_table() {
        let hw = |band: Option<Band>| {
            encode(
                &state(Mode::Legacy, band, None),
                DeviceClass::Standard,
                BandEncoding::HwMode,
            )
            .hwmode
        };
        assert_eq!(hw(Some(Band::S1g)).as_deref(), Some("11ah"));
        assert_eq!(hw(Some(Band::Band2g)).as_deref(), Some("11g"));
        assert_eq!(hw(Some(Band::Band5g)).as_deref(), Some("11a"));
        assert_eq!(hw(Some(Band::Band60g)).as_deref(), Some("11a"));
        assert_eq!(hw(None).as_deref(), Some("11a"));
    }

    #[test]
    fn test_htmode_cleared_for_legacy_and_subghz() {
        let legacy = encode(
            &state(Mode::Legacy, Some(Band::Band2g), None),
            DeviceClass::Standard,
            BandEncoding::BandOption,
        );
        assert_eq!(legacy.htmode, None);

        // A sub-gigahertz selection never persists a width token
        let s1g = encode(
            &SelectionState {
                mode: Mode::Legacy,
                band: Some(Band::S1g),
                width: Some(Width::S1g(8)),
                channel: Some(Channel::Num(43)),
                country: Some("US".to_string()),
            },
            DeviceClass::SubGhz,
            BandEncoding::HwMode,
        );
        assert_eq!(s1g.htmode, None);
        assert_eq!(s1g.hwmode.as_deref(), Some("11ah"));
        assert_eq!(s1g.channel.as_deref(), Some("43"));
    }

    #[test]
    fn test_decode_band() {
        let legacy = PersistedFields {
            hwmode: Some("11ah".to_string()),
            band: Some("2g".to_string()),
            ..Default::default()
        };
        assert_eq!(
            decode_band(&legacy, BandEncoding::HwMode),
            Some(Band::S1g)
        );
        assert_eq!(
            decode_band(&legacy, BandEncoding::BandOption),
            Some(Band::Band2g)
        );
        assert_eq!(decode_band(&PersistedFields::default(), BandEncoding::BandOption), None);
    }

    #[test]
    fn test_channel_encoding() {
        let mut s = state(Mode::N, Some(Band::Band2g), Some(Width::Ht(HtWidth::W40)));
        s.channel = Some(Channel::Auto);
        let fields = encode(&s, DeviceClass::Standard, BandEncoding::BandOption);
        assert_eq!(fields.channel.as_deref(), Some("auto"));

        s.channel = None;
        let fields = encode(&s, DeviceClass::Standard, BandEncoding::BandOption);
        assert_eq!(fields.channel, None);
    }
}
