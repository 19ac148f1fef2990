//! Empirical discharge curves, one per supported chemistry.
//!
//! Each curve maps a resting per-cell voltage to the fraction of capacity still available, sampled in 10% steps
//! from empty to full. The curve for the configured chemistry is copied once at start into an [`ActiveTable`], which
//! the estimator then reads for the rest of the program.

use core::cmp::Ordering;
use core::fmt;

use postcard::experimental::max_size::MaxSize;
use serde::{Deserialize, Serialize};

use crate::xerror::{XError, XResult};

pub const BREAKPOINT_COUNT: usize = 11;

#[derive(Serialize, Deserialize, MaxSize, Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Chemistry {
    #[default]
    LiPo,
    LiIon,
}

impl Chemistry {
    /// Nominal cell voltage used when rating pack energy.
    pub const fn nominal_cell_voltage(self) -> f32 {
        match self {
            Chemistry::LiPo => 3.7,
            Chemistry::LiIon => 3.6,
        }
    }

    pub fn discharge_table(self) -> &'static DischargeTable {
        match self {
            Chemistry::LiPo => &LIPO_DISCHARGE_CURVE,
            Chemistry::LiIon => &LIION_DISCHARGE_CURVE,
        }
    }
}

/// Raw configuration flag: 0 = LiPo, 1 = Li-ion.
impl TryFrom<u8> for Chemistry {
    type Error = XError;

    fn try_from(value: u8) -> XResult<Self> {
        match value {
            0 => Ok(Chemistry::LiPo),
            1 => Ok(Chemistry::LiIon),
            other => Err(XError::InvalidChemistry(other)),
        }
    }
}

impl From<Chemistry> for u8 {
    fn from(value: Chemistry) -> Self {
        match value {
            Chemistry::LiPo => 0,
            Chemistry::LiIon => 1,
        }
    }
}

impl fmt::Display for Chemistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Chemistry::LiPo => write!(f, "LiPo"),
            Chemistry::LiIon => write!(f, "Li-ion"),
        }
    }
}

#[derive(Serialize, Deserialize, MaxSize, Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Breakpoint {
    pub cell_voltage: f32,
    pub capacity_fraction: f32,
}

impl Breakpoint {
    pub const fn new(cell_voltage: f32, capacity_fraction: f32) -> Self {
        Self {
            cell_voltage,
            capacity_fraction,
        }
    }
}

/// Ordered breakpoints, strictly increasing in voltage, from empty to full.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DischargeTable {
    breakpoints: [Breakpoint; BREAKPOINT_COUNT],
}

impl DischargeTable {
    /// Builds a custom curve, e.g. one measured for a specific pack.
    pub fn new(breakpoints: [Breakpoint; BREAKPOINT_COUNT]) -> XResult<Self> {
        for (index, breakpoint) in breakpoints.iter().enumerate() {
            if !(0.0..=1.0).contains(&breakpoint.capacity_fraction) {
                return Err(XError::InvalidFraction(index));
            }
        }

        for (index, pair) in breakpoints.windows(2).enumerate() {
            // NaN voltages compare as None and are rejected here too
            if pair[0].cell_voltage.partial_cmp(&pair[1].cell_voltage) != Some(Ordering::Less) {
                return Err(XError::UnorderedBreakpoints(index + 1));
            }
            if pair[1].capacity_fraction < pair[0].capacity_fraction {
                return Err(XError::InvalidFraction(index + 1));
            }
        }

        Ok(Self { breakpoints })
    }

    pub fn for_chemistry(chemistry: Chemistry) -> &'static Self {
        chemistry.discharge_table()
    }

    pub fn breakpoints(&self) -> &[Breakpoint; BREAKPOINT_COUNT] {
        &self.breakpoints
    }

    pub fn lowest(&self) -> Breakpoint {
        self.breakpoints[0]
    }

    pub fn highest(&self) -> Breakpoint {
        self.breakpoints[BREAKPOINT_COUNT - 1]
    }
}

pub const LIPO_DISCHARGE_CURVE: DischargeTable = DischargeTable {
    breakpoints: [
        Breakpoint::new(3.27, 0.0),
        Breakpoint::new(3.69, 0.1),
        Breakpoint::new(3.73, 0.2),
        Breakpoint::new(3.77, 0.3),
        Breakpoint::new(3.80, 0.4),
        Breakpoint::new(3.84, 0.5),
        Breakpoint::new(3.87, 0.6),
        Breakpoint::new(3.95, 0.7),
        Breakpoint::new(4.02, 0.8),
        Breakpoint::new(4.11, 0.9),
        Breakpoint::new(4.20, 1.0),
    ],
};

pub const LIION_DISCHARGE_CURVE: DischargeTable = DischargeTable {
    breakpoints: [
        Breakpoint::new(3.00, 0.0),
        Breakpoint::new(3.30, 0.1),
        Breakpoint::new(3.45, 0.2),
        Breakpoint::new(3.55, 0.3),
        Breakpoint::new(3.62, 0.4),
        Breakpoint::new(3.68, 0.5),
        Breakpoint::new(3.74, 0.6),
        Breakpoint::new(3.82, 0.7),
        Breakpoint::new(3.90, 0.8),
        Breakpoint::new(4.00, 0.9),
        Breakpoint::new(4.20, 1.0),
    ],
};

/// The discharge curve selected at start. Built once, then only read.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ActiveTable {
    chemistry: Chemistry,
    table: DischargeTable,
}

impl ActiveTable {
    pub fn initialize(chemistry: Chemistry) -> Self {
        Self {
            chemistry,
            table: *DischargeTable::for_chemistry(chemistry),
        }
    }

    /// Uses a custom curve in place of the built-in one for `chemistry`.
    pub fn with_curve(chemistry: Chemistry, table: DischargeTable) -> Self {
        Self { chemistry, table }
    }

    pub fn chemistry(&self) -> Chemistry {
        self.chemistry
    }

    pub fn table(&self) -> &DischargeTable {
        &self.table
    }

    pub fn breakpoints(&self) -> &[Breakpoint; BREAKPOINT_COUNT] {
        self.table.breakpoints()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_curves_are_valid() {
        for chemistry in [Chemistry::LiPo, Chemistry::LiIon] {
            let table = chemistry.discharge_table();
            assert_eq!(DischargeTable::new(*table.breakpoints()), Ok(*table));
            assert_eq!(table.lowest().capacity_fraction, 0.0);
            assert_eq!(table.highest().capacity_fraction, 1.0);
        }
    }

    #[test]
    fn active_table_copies_selected_curve() {
        let active = ActiveTable::initialize(Chemistry::LiIon);
        assert_eq!(active.chemistry(), Chemistry::LiIon);
        assert_eq!(active.breakpoints(), LIION_DISCHARGE_CURVE.breakpoints());

        let active = ActiveTable::initialize(Chemistry::LiPo);
        assert_eq!(active.breakpoints().len(), BREAKPOINT_COUNT);
        assert_eq!(active.table(), &LIPO_DISCHARGE_CURVE);
    }

    #[test]
    fn chemistry_from_raw_flag() {
        assert_eq!(Chemistry::try_from(0), Ok(Chemistry::LiPo));
        assert_eq!(Chemistry::try_from(1), Ok(Chemistry::LiIon));
        assert_eq!(Chemistry::try_from(2), Err(XError::InvalidChemistry(2)));
        assert_eq!(u8::from(Chemistry::LiIon), 1);
    }

    #[test]
    fn custom_curve_rejects_unordered_voltages() {
        let mut breakpoints = *LIPO_DISCHARGE_CURVE.breakpoints();
        breakpoints[4].cell_voltage = breakpoints[3].cell_voltage;
        assert_eq!(
            DischargeTable::new(breakpoints),
            Err(XError::UnorderedBreakpoints(4))
        );

        breakpoints[4].cell_voltage = f32::NAN;
        assert_eq!(
            DischargeTable::new(breakpoints),
            Err(XError::UnorderedBreakpoints(4))
        );
    }

    #[test]
    fn custom_curve_rejects_bad_fractions() {
        let mut breakpoints = *LIION_DISCHARGE_CURVE.breakpoints();
        breakpoints[10].capacity_fraction = 1.5;
        assert_eq!(DischargeTable::new(breakpoints), Err(XError::InvalidFraction(10)));

        let mut breakpoints = *LIION_DISCHARGE_CURVE.breakpoints();
        breakpoints[6].capacity_fraction = 0.1;
        assert_eq!(DischargeTable::new(breakpoints), Err(XError::InvalidFraction(6)));
    }
}
