//! Core types for band/channel/width resolution
//!
//! This module defines the small vocabulary shared by every stage of the
//! resolution pipeline: radio bands, PHY modes, channel widths and channel
//! selections, plus the persisted-token derivations that tie them together.
//!
//! ## Width tokens
//!
//! The persisted width token (`HT40`, `VHT80`, `HE160`, ...) is not stored as
//! a free-form string anywhere in the engine. It is derived from a
//! `(Mode, HtWidth)` pair, and pairs without a token (`Legacy` with any
//! width, `n` beyond 40 MHz) simply do not exist:
//!
//! ```text
//!            20      40      80     160
//!   Legacy    -       -       -       -
//!   n       HT20    HT40      -       -
//!   ac      VHT20   VHT40   VHT80  VHT160
//!   ax      HE20    HE40    HE80   HE160
//! ```
//!
//! ## Example
//!
//! ```
//! use chanplan_core::types::{htmode_token, parse_htmode, HtWidth, Mode};
//!
//! assert_eq!(htmode_token(Mode::Ac, HtWidth::W80), Some("VHT80"));
//! assert_eq!(htmode_token(Mode::N, HtWidth::W80), None);
//! assert_eq!(parse_htmode("HE160"), Some((Mode::Ax, HtWidth::W160)));
//! ```

use std::fmt;

/// Result type for resolution operations
pub type PlanResult<T> = Result<T, PlanError>;

/// Errors surfaced by the resolution engine
///
/// Transport and parse problems in the channel map deliberately do not show
/// up here: the loader degrades to an empty map instead of failing.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PlanError {
    #[error("Invalid country code '{0}'. Use ISO/IEC 3166 alpha2 country codes")]
    InvalidCountry(String),

    #[error("Malformed capability payload: {0}")]
    Capability(String),
}

/// Radio band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Band {
    /// 2.4 GHz ISM band
    Band2g,
    /// 5 GHz U-NII bands
    Band5g,
    /// 6 GHz (classified but not offered for selection)
    Band6g,
    /// 60 GHz millimetre wave
    Band60g,
    /// Sub-gigahertz 802.11ah
    S1g,
}

impl Band {
    /// Identifier used in persisted configuration (`band` option).
    pub fn ident(&self) -> &'static str {
        match self {
            Band::Band2g => "2g",
            Band::Band5g => "5g",
            Band::Band6g => "6g",
            Band::Band60g => "60g",
            Band::S1g => "s1g",
        }
    }

    /// Human-readable band label.
    pub fn label(&self) -> &'static str {
        match self {
            Band::Band2g => "2.4 GHz",
            Band::Band5g => "5 GHz",
            Band::Band6g => "6 GHz",
            Band::Band60g => "60 GHz",
            Band::S1g => "< 1GHz",
        }
    }

    /// Parse a persisted band identifier.
    pub fn from_ident(ident: &str) -> Option<Band> {
        match ident {
            "2g" => Some(Band::Band2g),
            "5g" => Some(Band::Band5g),
            "6g" => Some(Band::Band6g),
            "60g" => Some(Band::Band60g),
            "s1g" => Some(Band::S1g),
            _ => None,
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// PHY operating mode.
///
/// `Legacy` is the pre-802.11n mode and carries the empty identifier in
/// persisted configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Legacy,
    N,
    Ac,
    Ax,
}

impl Mode {
    /// Identifier used in capability flag sets (`hwmodelist`).
    pub fn ident(&self) -> &'static str {
        match self {
            Mode::Legacy => "",
            Mode::N => "n",
            Mode::Ac => "ac",
            Mode::Ax => "ax",
        }
    }

    /// Human-readable mode label.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Legacy => "Legacy",
            Mode::N => "N",
            Mode::Ac => "AC",
            Mode::Ax => "AX",
        }
    }

    /// Parse a mode identifier (the empty string is `Legacy`).
    pub fn from_ident(ident: &str) -> Option<Mode> {
        match ident {
            "" => Some(Mode::Legacy),
            "n" => Some(Mode::N),
            "ac" => Some(Mode::Ac),
            "ax" => Some(Mode::Ax),
            _ => None,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// HT/VHT/HE channel width in MHz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HtWidth {
    W20,
    W40,
    W80,
    W160,
}

impl HtWidth {
    /// Width in MHz.
    pub fn mhz(&self) -> u16 {
        match self {
            HtWidth::W20 => 20,
            HtWidth::W40 => 40,
            HtWidth::W80 => 80,
            HtWidth::W160 => 160,
        }
    }

    /// Selector label.
    pub fn label(&self) -> &'static str {
        match self {
            HtWidth::W20 => "20 MHz",
            HtWidth::W40 => "40 MHz",
            HtWidth::W80 => "80 MHz",
            HtWidth::W160 => "160 MHz",
        }
    }
}

/// A channel-width selection.
///
/// Standard bands use the HT/VHT/HE widths; the sub-gigahertz band uses the
/// numeric bandwidth (in MHz) carried by the regulatory channel map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Width {
    Ht(HtWidth),
    S1g(u8),
}

impl Width {
    /// Selector label (`"40 MHz"`, `"8 MHz"`, ...).
    pub fn label(&self) -> String {
        match self {
            Width::Ht(w) => w.label().to_string(),
            Width::S1g(bw) => format!("{} MHz", bw),
        }
    }
}

/// A channel selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Automatic channel selection (hostapd ACS)
    Auto,
    /// A concrete channel number
    Num(u16),
}

impl Channel {
    /// Parse a persisted channel value (`"auto"`, `""` or a number).
    pub fn from_ident(ident: &str) -> Option<Channel> {
        match ident {
            "" | "auto" => Some(Channel::Auto),
            other => other.parse().ok().map(Channel::Num),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Auto => f.write_str("auto"),
            Channel::Num(n) => write!(f, "{}", n),
        }
    }
}

/// Render the option label for a concrete channel.
pub fn format_channel(channel: u16, mhz: f64) -> String {
    format!("{} ({} MHz)", channel, mhz)
}

/// Derive the persisted width token for a `(mode, width)` pair.
///
/// Pairs outside the mode's width ladder have no token.
pub fn htmode_token(mode: Mode, width: HtWidth) -> Option<&'static str> {
    match (mode, width) {
        (Mode::N, HtWidth::W20) => Some("HT20"),
        (Mode::N, HtWidth::W40) => Some("HT40"),
        (Mode::Ac, HtWidth::W20) => Some("VHT20"),
        (Mode::Ac, HtWidth::W40) => Some("VHT40"),
        (Mode::Ac, HtWidth::W80) => Some("VHT80"),
        (Mode::Ac, HtWidth::W160) => Some("VHT160"),
        (Mode::Ax, HtWidth::W20) => Some("HE20"),
        (Mode::Ax, HtWidth::W40) => Some("HE40"),
        (Mode::Ax, HtWidth::W80) => Some("HE80"),
        (Mode::Ax, HtWidth::W160) => Some("HE160"),
        _ => None,
    }
}

/// Parse a persisted width token back into its `(mode, width)` pair.
///
/// Only the exact tokens produced by [`htmode_token`] parse; anything else
/// (including vendor extensions like `HE80+80`) yields `None` and the width
/// falls back to re-selection.
pub fn parse_htmode(token: &str) -> Option<(Mode, HtWidth)> {
    match token {
        "HT20" => Some((Mode::N, HtWidth::W20)),
        "HT40" => Some((Mode::N, HtWidth::W40)),
        "VHT20" => Some((Mode::Ac, HtWidth::W20)),
        "VHT40" => Some((Mode::Ac, HtWidth::W40)),
        "VHT80" => Some((Mode::Ac, HtWidth::W80)),
        "VHT160" => Some((Mode::Ac, HtWidth::W160)),
        "HE20" => Some((Mode::Ax, HtWidth::W20)),
        "HE40" => Some((Mode::Ax, HtWidth::W40)),
        "HE80" => Some((Mode::Ax, HtWidth::W80)),
        "HE160" => Some((Mode::Ax, HtWidth::W160)),
        _ => None,
    }
}

/// Decode the PHY mode from a persisted width token.
///
/// Matching is prefix-based so unknown width suffixes still land in the
/// right mode. A missing or unrecognised token means `Legacy`.
pub fn mode_from_htmode(token: Option<&str>) -> Mode {
    match token {
        Some(t) if t.starts_with("HE") => Mode::Ax,
        Some(t) if t.starts_with("VHT") => Mode::Ac,
        Some(t) if t.starts_with("HT") => Mode::N,
        _ => Mode::Legacy,
    }
}
