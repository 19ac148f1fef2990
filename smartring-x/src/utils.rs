use crate::discharge::Breakpoint;

// NOTE: Only use micromath f32::round function on target. Unit tests use the inherent method found in std.
#[cfg(not(feature = "std"))]
use micromath::F32Ext;

/// Capacity fraction at `voltage` on the straight line between two breakpoints.
pub fn lerp_capacity_fraction(left: Breakpoint, right: Breakpoint, voltage: f32) -> f32 {
    let distance = (voltage - left.cell_voltage) / (right.cell_voltage - left.cell_voltage);
    left.capacity_fraction + (right.capacity_fraction - left.capacity_fraction) * distance
}

/// Rounds to the nearest whole percent. NaN maps to 0.
pub fn round_percent(percent: f32) -> u8 {
    percent.clamp(0.0, 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_float_eq::*;

    #[test]
    fn lerp_capacity_fraction_lerps_correctly() {
        let left = Breakpoint::new(3.7, 0.5);
        let right = Breakpoint::new(3.8, 0.6);

        assert_float_absolute_eq!(lerp_capacity_fraction(left, right, 3.75), 0.55, 1e-5); // halfway between
        assert_float_absolute_eq!(lerp_capacity_fraction(left, right, 3.775), 0.575, 1e-5); // 3/4-way between
        assert_float_absolute_eq!(lerp_capacity_fraction(left, right, 3.8), 0.6, 1e-5);
    }

    #[test]
    fn round_percent_rounds_to_nearest() {
        assert_eq!(round_percent(54.99), 55);
        assert_eq!(round_percent(54.5), 55);
        assert_eq!(round_percent(54.49), 54);
        assert_eq!(round_percent(0.3), 0);
    }

    #[test]
    fn round_percent_handles_out_of_range() {
        assert_eq!(round_percent(-3.0), 0);
        assert_eq!(round_percent(142.0), 100);
        assert_eq!(round_percent(f32::NAN), 0);
    }
}
