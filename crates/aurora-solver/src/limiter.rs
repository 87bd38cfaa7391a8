//! Slope and flux limiters.

/// Minmod of two slopes: the smaller magnitude when signs agree, zero
/// otherwise.
#[inline]
pub fn minmod(a: f64, b: f64) -> f64 {
    if a * b <= 0.0 {
        0.0
    } else if a.abs() < b.abs() {
        a
    } else {
        b
    }
}

/// Monotonized-central slope for a cell with values `left`, `center`,
/// `right` (unit spacing).
///
/// The central difference, clipped to twice the one-sided differences;
/// zero at extrema. Reconstructions built with this slope introduce no
/// new extrema.
#[inline]
pub fn mc_slope(left: f64, center: f64, right: f64) -> f64 {
    let fwd = right - center;
    let bwd = center - left;
    if fwd * bwd <= 0.0 {
        return 0.0;
    }
    let central = 0.5 * (right - left);
    let bound = 2.0 * minmod(fwd, bwd);
    minmod(central, bound)
}

/// Van Leer flux limiter `φ(r) = (r + |r|) / (1 + |r|)`.
///
/// Zero for `r <= 0` (extremum: fall back to donor cell), approaching 2
/// for strongly smooth data. NaN ratios (0/0 upstream slopes) limit to
/// zero.
#[inline]
pub fn van_leer(r: f64) -> f64 {
    if !(r > 0.0) {
        0.0
    } else if r.is_infinite() {
        2.0
    } else {
        2.0 * r / (1.0 + r)
    }
}
