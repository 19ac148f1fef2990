//! Remaining-capacity estimate from a pack voltage sample.
//!
//! The pack voltage is normalized to a per-cell voltage, bracketed between two adjacent breakpoints of the active
//! discharge curve and linearly interpolated. Anything that cannot be bracketed degrades to a fixed value instead of
//! an error: 100% at or above [`FULL_CELL_VOLTAGE`], 0% otherwise.

use crate::discharge::ActiveTable;
use crate::utils::{lerp_capacity_fraction, round_percent};

/// Per-cell voltage at or above which the pack is reported as full.
pub const FULL_CELL_VOLTAGE: f32 = 4.20;

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Estimate {
    Full,
    /// Unrounded percentage interpolated inside the discharge curve.
    Interpolated(f32),
    /// At or below the lowest breakpoint, or not a number.
    BelowTable,
    /// Above the highest breakpoint but under the full voltage.
    AboveTable,
}

impl Estimate {
    pub fn percent(self) -> u8 {
        match self {
            Estimate::Full => 100,
            Estimate::Interpolated(percent) => round_percent(percent),
            Estimate::BelowTable | Estimate::AboveTable => 0,
        }
    }

    pub fn is_in_table(self) -> bool {
        matches!(self, Estimate::Full | Estimate::Interpolated(_))
    }
}

/// A pack without cells reads as 0 V per cell.
pub fn cell_voltage(pack_voltage: f32, cell_count: u8) -> f32 {
    if cell_count > 0 {
        pack_voltage / cell_count as f32
    } else {
        0.0
    }
}

pub fn estimate(table: &ActiveTable, pack_voltage: f32, cell_count: u8) -> Estimate {
    let voltage = cell_voltage(pack_voltage, cell_count);
    if voltage >= FULL_CELL_VOLTAGE {
        return Estimate::Full;
    }

    // Intervals are open below and closed above, so a breakpoint voltage belongs to the interval it ends
    let bracket = table
        .breakpoints()
        .windows(2)
        .find(|pair| pair[0].cell_voltage < voltage && voltage <= pair[1].cell_voltage);

    match bracket {
        Some(pair) => Estimate::Interpolated(100.0 * lerp_capacity_fraction(pair[0], pair[1], voltage)),
        None if voltage > table.table().highest().cell_voltage => Estimate::AboveTable,
        None => Estimate::BelowTable,
    }
}

/// Remaining capacity in whole percent, rounded to nearest.
pub fn estimate_percent(table: &ActiveTable, pack_voltage: f32, cell_count: u8) -> u8 {
    estimate(table, pack_voltage, cell_count).percent()
}
