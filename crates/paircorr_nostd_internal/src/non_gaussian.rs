use ndarray::ArrayView2;

/// Returns whether `x` and `y` view the very same sample, i.e. the same
/// memory with the same shape and strides.
///
/// The offset-correlation driver passes the same frame as both the origin and
/// the target at zero lag.
pub fn is_same_sample(x: &ArrayView2<f64>, y: &ArrayView2<f64>) -> bool {
    core::ptr::eq(x.as_ptr(), y.as_ptr()) && x.shape() == y.shape() && x.strides() == y.strides()
}

/// Computes the non-Gaussian parameter of the displacements between `x` and
/// `y`:
///
/// ```text
/// α₂ = 3⟨Δr⁴⟩ / (5⟨Δr²⟩²) − 1
/// ```
///
/// Both arrays hold the positions of the same `N` particles with shape
/// `(D, N)` (the spatial dimension varies along axis 0). When `x` and `y` are
/// the same sample (see [`is_same_sample`]) the displacements vanish and we
/// return exactly `0.0`, which is the analytic value at zero lag.
pub fn non_gaussian_parameter(x: ArrayView2<f64>, y: ArrayView2<f64>) -> Result<f64, &'static str> {
    if x.shape() != y.shape() {
        return Err("displacement samples must have the same shape");
    } else if is_same_sample(&x, &y) {
        return Ok(0.0);
    }
    let n_spatial_dims = x.shape()[0];
    let n_points = x.shape()[1];
    if n_points == 0 {
        return Err("displacement samples must hold at least 1 point");
    }

    let mut sum_dr2 = 0.0;
    let mut sum_dr4 = 0.0;
    for i in 0..n_points {
        let mut dr2 = 0.0;
        for k in 0..n_spatial_dims {
            let diff = x[[k, i]] - y[[k, i]];
            dr2 += diff * diff;
        }
        sum_dr2 += dr2;
        sum_dr4 += dr2 * dr2;
    }
    let n = n_points as f64;
    let mean_dr2 = sum_dr2 / n;
    let mean_dr4 = sum_dr4 / n;
    Ok(3.0 * mean_dr4 / (5.0 * mean_dr2 * mean_dr2) - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_lag_is_exactly_zero() {
        let coords = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let view = ArrayView2::from_shape((3, 2), &coords).unwrap();
        assert_eq!(non_gaussian_parameter(view, view), Ok(0.0));
    }

    #[test]
    fn equal_content_is_not_the_same_sample() {
        let coords = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let copy = coords;
        let x = ArrayView2::from_shape((3, 2), &coords).unwrap();
        let y = ArrayView2::from_shape((3, 2), &copy).unwrap();
        assert!(!is_same_sample(&x, &y));
        // 0/0
        assert!(non_gaussian_parameter(x, y).unwrap().is_nan());
    }

    #[test]
    fn uniform_displacement() {
        // every particle moves by the same vector: <dr^4> = <dr^2>^2
        let x = [0.0, 1.0, 2.0, 0.0, 0.0, 0.0];
        let y = [1.0, 2.0, 3.0, 2.0, 2.0, 2.0];
        let x = ArrayView2::from_shape((2, 3), &x).unwrap();
        let y = ArrayView2::from_shape((2, 3), &y).unwrap();
        let alpha2 = non_gaussian_parameter(x, y).unwrap();
        assert!(alpha2 > -0.4 - 1e-12 && alpha2 < -0.4 + 1e-12);
    }

    #[test]
    fn two_speeds() {
        // squared displacements of 1 and 9 (1D): <dr^2> = 5, <dr^4> = 41
        let x = [0.0, 0.0];
        let y = [1.0, 3.0];
        let x = ArrayView2::from_shape((1, 2), &x).unwrap();
        let y = ArrayView2::from_shape((1, 2), &y).unwrap();
        let expected = 3.0 * 41.0 / (5.0 * 25.0) - 1.0;
        let alpha2 = non_gaussian_parameter(x, y).unwrap();
        assert!(alpha2 > expected - 1e-12 && alpha2 < expected + 1e-12);
    }

    #[test]
    fn shape_mismatch() {
        let x = [0.0; 6];
        let y = [0.0; 4];
        let x = ArrayView2::from_shape((3, 2), &x).unwrap();
        let y = ArrayView2::from_shape((2, 2), &y).unwrap();
        assert!(non_gaussian_parameter(x, y).is_err());
    }
}
