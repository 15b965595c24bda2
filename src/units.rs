/// Formats a voltage with an SI prefix, e.g. `12.500 mV`.
pub fn volts_str(volts: f64) -> String {
    si_str(volts, "V")
}

/// Formats a duration given in microseconds, e.g. `2.000 ms`.
pub fn micros_str(us: f64) -> String {
    si_str(us * 1e-6, "s")
}

fn si_str(value: f64, unit: &str) -> String {
    const PREFIXES: [(f64, &str); 6] = [
        (1e3, "k"),
        (1.0, ""),
        (1e-3, "m"),
        (1e-6, "µ"),
        (1e-9, "n"),
        (1e-12, "p"),
    ];

    if value == 0.0 || !value.is_finite() {
        return format!("{value:.3} {unit}");
    }

    let magnitude = value.abs();
    let (scale, prefix) = PREFIXES
        .iter()
        .find(|(scale, _)| magnitude >= *scale)
        .copied()
        .unwrap_or(PREFIXES[PREFIXES.len() - 1]);

    format!("{:.3} {prefix}{unit}", value / scale)
}

#[test]
fn print_units() {
    assert_eq!(volts_str(0.0125), "12.500 mV");
    assert_eq!(volts_str(-2.0), "-2.000 V");
    assert_eq!(volts_str(10000.0), "10.000 kV");
    assert_eq!(volts_str(0.0), "0.000 V");
    assert_eq!(micros_str(0.5), "500.000 ns");
    assert_eq!(micros_str(2000.0), "2.000 ms");
    assert_eq!(micros_str(1.0), "1.000 µs");
}
