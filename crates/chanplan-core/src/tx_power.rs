//! Transmit power selector support
//!
//! The driver enumerates its supported power levels as dBm/mW pairs. The
//! selector lists them behind a driver-default entry, and the summary line
//! reports the currently applied power together with the regulatory offset
//! where one is in effect.

use serde::{Deserialize, Serialize};

/// One power level as enumerated by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxPowerLevel {
    pub dbm: i32,
    pub mw: u32,
}

/// A row in the transmit power selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxPowerOption {
    /// Persisted dBm value; `None` means driver default
    pub dbm: Option<i32>,
    pub label: String,
}

/// Build the selector rows from the driver's enumeration.
pub fn tx_power_options(levels: &[TxPowerLevel]) -> Vec<TxPowerOption> {
    let mut options = vec![TxPowerOption {
        dbm: None,
        label: "driver default".to_string(),
    }];
    for level in levels {
        options.push(TxPowerOption {
            dbm: Some(level.dbm),
            label: format!("{} dBm ({} mW)", level.dbm, level.mw),
        });
    }
    options
}

/// Summary line for the currently applied power.
///
/// An unknown current power still reports the offset, with an unknown sum.
pub fn current_power_summary(current_dbm: Option<i32>, offset_db: i32) -> String {
    let mut summary = match current_dbm {
        Some(dbm) => format!("Current power: {} dBm", dbm),
        None => "Current power: unknown".to_string(),
    };
    if offset_db != 0 {
        let total = match current_dbm {
            Some(dbm) => (dbm + offset_db).to_string(),
            None => "?".to_string(),
        };
        summary.push_str(&format!(" + {} dB offset = {} dBm", offset_db, total));
    }
    summary
}
