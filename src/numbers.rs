//! Number formatting shared by the report, the projector and the transcript layout.

/// Fixed-point formatting that rounds the exact binary value, with exact ties away from zero.
///
/// `format!("{:.2}")` already rounds the exact value, but sends exact ties to even
/// (4.125 would print as 4.12). 0.015 is stored as 0.01499.. and stays "0.01".
pub fn to_fixed(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let value = if is_exact_tie(value, digits) {
        // One ulp further from zero; no rounding boundary sits that close to a tie.
        f64::from_bits(value.to_bits() + 1)
    } else {
        value
    };
    format!("{value:.digits$}")
}

/// True when the exact decimal expansion of `value` ends in a single 5 right after `digits` places.
fn is_exact_tie(value: f64, digits: usize) -> bool {
    // Every finite f64 terminates within 1074 fractional digits.
    let exact = format!("{:.1074}", value.abs());
    let Some((_, fraction)) = exact.split_once('.') else {
        return false;
    };
    match fraction.as_bytes().get(digits..) {
        Some([b'5', rest @ ..]) => rest.iter().all(|&b| b == b'0'),
        _ => false,
    }
}

/// Whole numbers without a fractional part, everything else as-is ("3", "1.5").
pub fn plain(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}
