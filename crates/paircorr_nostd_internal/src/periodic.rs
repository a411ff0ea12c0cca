//! Minimum-image arithmetic for orthorhombic periodic boxes.
//!
//! The wrapping uses round-half-to-even (like `numpy.rint`). This only
//! matters for components that lie exactly at half a period: `+L/2` is left
//! alone while `3L/2` is mapped onto `-L/2`.

use ndarray::ArrayView2;

// every f64 with a magnitude of at least 2^52 is already an integer
const INTEGRAL_THRESHOLD: f64 = 4503599627370496.0;

/// Rounds to the nearest integer, resolving ties towards the even neighbor.
///
/// # Note
/// `f64::round_ties_even` lives in std, so we roll our own here.
#[inline]
pub fn round_half_even(x: f64) -> f64 {
    let magnitude = if x < 0.0 { -x } else { x };
    // NaN also takes this branch
    if !(magnitude < INTEGRAL_THRESHOLD) {
        return x;
    }
    let truncated = (x as i64) as f64;
    let floor = if truncated > x {
        truncated - 1.0
    } else {
        truncated
    };
    let frac = x - floor;
    if frac > 0.5 {
        floor + 1.0
    } else if frac < 0.5 {
        floor
    } else if (floor as i64) % 2 == 0 {
        floor
    } else {
        floor + 1.0
    }
}

/// Apply the minimum-image convention to a single displacement component
#[inline]
pub fn minimum_image(displacement: f64, period: f64) -> f64 {
    displacement - round_half_even(displacement / period) * period
}

/// Checks that every period is finite and strictly positive and that there is
/// one period per spatial dimension.
pub fn validate_periods(periods: &[f64], n_spatial_dims: usize) -> Result<(), &'static str> {
    if periods.len() != n_spatial_dims {
        Err("there must be exactly one box period per spatial dimension")
    } else if periods.iter().any(|&l| !(l.is_finite() && l > 0.0)) {
        Err("box periods must be finite and strictly positive")
    } else {
        Ok(())
    }
}

/// calculate the squared minimum-image distance between point `i1` of `v1`
/// and point `i2` of `v2`.
///
/// Both arrays encode a list of vectors with the spatial dimension on the
/// "slow axis" (axis 0). `periods` must hold at least as many entries as
/// there are spatial dimensions; this isn't checked here (see
/// [`validate_periods`]).
#[inline]
pub fn squared_periodic_diff_norm(
    v1: ArrayView2<f64>,
    v2: ArrayView2<f64>,
    i1: usize,
    i2: usize,
    periods: &[f64],
) -> f64 {
    let mut sum = 0.0;
    for (k, &period) in periods.iter().enumerate() {
        let diff = minimum_image(v1[[k, i1]] - v2[[k, i2]], period);
        sum += diff * diff; // NOTE: .powi can't be used in no_std crates
    }
    sum
}
