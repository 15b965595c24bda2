//! Calibration lookup tables.
//!
//! Channel records carry their vertical scale as an index into a fixed table
//! of volts per division, and their probe attenuation as a power of ten.

use crate::utils::errors::CaptureError;

/// Volts per division, indexed by a record's voltage level field.
pub const VOLTAGE_LEVELS: [f64; 21] = [
    0.002, 0.005, 0.01, 0.02, 0.05, 0.1, 0.2, 0.5, 1.0, 2.0, 5.0, 10.0, 20.0, 50.0, 100.0, 200.0,
    500.0, 1000.0, 2000.0, 5000.0, 10000.0,
];

/// Resolves a voltage level index through [`VOLTAGE_LEVELS`].
pub fn voltage_level(index: i32) -> Result<f64, CaptureError> {
    usize::try_from(index)
        .ok()
        .and_then(|i| VOLTAGE_LEVELS.get(i))
        .copied()
        .ok_or(CaptureError::VoltageLevelIndex(index))
}

/// Attenuation multiplier for a power-of-ten exponent.
pub fn power_index(exponent: i32) -> f64 {
    10f64.powi(exponent)
}

#[test]
fn voltage_table_bounds() {
    assert_eq!(voltage_level(0).unwrap(), 0.002);
    assert_eq!(voltage_level(8).unwrap(), 1.0);
    assert_eq!(voltage_level(20).unwrap(), 10000.0);

    assert!(matches!(
        voltage_level(21),
        Err(CaptureError::VoltageLevelIndex(21))
    ));
    assert!(matches!(
        voltage_level(-1),
        Err(CaptureError::VoltageLevelIndex(-1))
    ));
}

#[test]
fn table_is_ascending() {
    assert!(VOLTAGE_LEVELS.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn power_of_ten() {
    assert_eq!(power_index(0), 1.0);
    assert_eq!(power_index(2), 100.0);
    assert!((power_index(-1) - 0.1).abs() < 1e-12);
}
