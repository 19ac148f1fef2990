use postcard::experimental::max_size::MaxSize;
use serde::{Deserialize, Serialize};

use crate::discharge::Chemistry;
use crate::xerror::{XError, XResult};

pub const DEFAULT_CELL_COUNT: u8 = 12;
pub const DEFAULT_CAPACITY_WH: f32 = 427.0;
pub const DEFAULT_FULL_THRESHOLD: f32 = 4.10;

const LOW_PERCENT: u8 = 20;
const CRITICAL_PERCENT: u8 = 10;

/// Battery settings for the board, fixed at start.
#[derive(Serialize, Deserialize, MaxSize, Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BatteryConfig {
    pub chemistry: Chemistry,
    /// Cells in series.
    pub cell_count: u8,
    /// Usable energy of a full pack.
    pub capacity_wh: f32,
    /// Per-cell voltage strictly above which the pack counts as charged.
    pub full_threshold: f32,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            chemistry: Chemistry::LiPo,
            cell_count: DEFAULT_CELL_COUNT,
            capacity_wh: DEFAULT_CAPACITY_WH,
            full_threshold: DEFAULT_FULL_THRESHOLD,
        }
    }
}

impl BatteryConfig {
    pub fn validate(&self) -> XResult<()> {
        if self.cell_count == 0 {
            return Err(XError::NoCells);
        }
        if !self.full_threshold.is_finite() || self.full_threshold <= 0.0 {
            return Err(XError::InvalidThreshold);
        }
        if !self.capacity_wh.is_finite() || self.capacity_wh < 0.0 {
            return Err(XError::InvalidCapacity);
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, MaxSize, Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BatteryStatus {
    pub pack_voltage: f32,
    pub cell_voltage: f32,
    /// Remaining capacity (0-100%)
    pub percent: u8,
    /// False when the sample fell outside the discharge curve and `percent` is a fallback value
    pub in_table: bool,
    pub charged: bool,
    pub remaining_wh: f32,
}

impl BatteryStatus {
    pub fn is_low(&self) -> bool {
        self.percent < LOW_PERCENT
    }

    pub fn is_critical(&self) -> bool {
        self.percent < CRITICAL_PERCENT
    }
}
