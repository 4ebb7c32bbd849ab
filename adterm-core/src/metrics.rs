//! Division helpers shared by every ratio the crate reports.
//!
//! Reports routinely contain zero denominators (terms with no clicks, no
//! conversions, sessions with no views). Every ratio goes through these so
//! nothing downstream ever sees NaN or infinity.

/// `numerator / denominator`, or `0.0` when the denominator is zero or the
/// quotient is not finite.
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    let q = numerator / denominator;
    if q.is_finite() {
        q
    } else {
        0.0
    }
}

/// `numerator / denominator * 100`, guarded like [`safe_ratio`].
pub fn percent(numerator: f64, denominator: f64) -> f64 {
    safe_ratio(numerator, denominator) * 100.0
}

/// Descending comparison for floats with NaN sorted last.
pub fn cmp_desc(a: f64, b: f64) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}
