use crate::capacity::{cell_voltage, estimate};
use crate::datatypes::{BatteryConfig, BatteryStatus};
use crate::discharge::{ActiveTable, Chemistry};
use crate::xerror::XResult;

/// Share of the rated pack energy that is usable between full charge and cutoff.
const USABLE_ENERGY_FRACTION: f32 = 0.8;

/// Usable energy of a pack, from its series cell count and rated amp-hours.
pub fn usable_capacity_wh(chemistry: Chemistry, cell_count: u8, amp_hours: f32) -> f32 {
    cell_count as f32 * amp_hours * chemistry.nominal_cell_voltage() * USABLE_ENERGY_FRACTION
}

pub fn remaining_wh(percent: u8, capacity_wh: f32) -> f32 {
    capacity_wh * percent.min(100) as f32 / 100.0
}

/// Turns pack voltage samples into battery status reports for a single configured pack.
#[derive(Copy, Clone, Debug)]
pub struct BatteryMonitor {
    config: BatteryConfig,
    table: ActiveTable,
}

impl BatteryMonitor {
    pub fn new(config: BatteryConfig) -> XResult<Self> {
        config.validate()?;

        let table = ActiveTable::initialize(config.chemistry);
        debug!(
            "Battery monitor: {} {}S, {} Wh",
            config.chemistry, config.cell_count, config.capacity_wh
        );

        Ok(Self { config, table })
    }

    /// Builds a monitor from raw board settings, where chemistry 0 is LiPo and 1 is Li-ion.
    pub fn from_raw(raw_chemistry: u8, cell_count: u8, capacity_wh: f32) -> XResult<Self> {
        let chemistry = Chemistry::try_from(raw_chemistry).map_err(|e| {
            warn!("Unsupported battery chemistry flag {}", raw_chemistry);
            e
        })?;

        Self::new(BatteryConfig {
            chemistry,
            cell_count,
            capacity_wh,
            ..Default::default()
        })
    }

    pub fn config(&self) -> &BatteryConfig {
        &self.config
    }

    pub fn table(&self) -> &ActiveTable {
        &self.table
    }

    pub fn percent(&self, pack_voltage: f32) -> u8 {
        estimate(&self.table, pack_voltage, self.config.cell_count).percent()
    }

    pub fn status(&self, pack_voltage: f32) -> BatteryStatus {
        let cell_voltage = cell_voltage(pack_voltage, self.config.cell_count);
        let estimate = estimate(&self.table, pack_voltage, self.config.cell_count);
        if !estimate.is_in_table() {
            trace!("Cell voltage {} outside discharge curve", cell_voltage);
        }

        let percent = estimate.percent();
        BatteryStatus {
            pack_voltage,
            cell_voltage,
            percent,
            in_table: estimate.is_in_table(),
            charged: cell_voltage > self.config.full_threshold,
            remaining_wh: remaining_wh(percent, self.config.capacity_wh),
        }
    }
}
