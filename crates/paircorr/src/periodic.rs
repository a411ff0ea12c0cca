//! Minimum-image distances between one reference point and a set of points.

use crate::Error;
use ndarray::{ArrayView1, ArrayView2};
use paircorr_nostd_internal::{minimum_image, validate_periods};

/// Selects what [`periodic_distances`] reports for each point
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DistanceMode {
    /// the Euclidean norm of the minimum-image displacement
    Distance,
    /// the squared norm (skips the square root)
    SquaredDistance,
}

/// Computes the minimum-image distance between `x` and every point of `ys`
/// inside a periodic orthorhombic box with sides `side`.
///
/// `x` has shape `(D,)` and `ys` has shape `(D, n_points)`. Each component of
/// `x − y` is wrapped as `d − rint(d / L) L`, where `rint` rounds half to
/// even, so a component lying exactly at `L/2` keeps its sign.
pub fn periodic_distances(
    x: ArrayView1<f64>,
    ys: ArrayView2<f64>,
    side: &[f64],
    mode: DistanceMode,
) -> Result<Vec<f64>, Error> {
    let n_spatial_dims = x.len();
    if ys.shape()[0] != n_spatial_dims {
        return Err(Error::shape(format!(
            "the reference point has {} components while the points have {}",
            n_spatial_dims,
            ys.shape()[0]
        )));
    }
    validate_periods(side, n_spatial_dims).map_err(Error::internal_legacy_adhoc)?;

    let out = ys
        .columns()
        .into_iter()
        .map(|y| {
            let squared: f64 = (0..n_spatial_dims)
                .map(|k| minimum_image(x[k] - y[k], side[k]).powi(2))
                .sum();
            match mode {
                DistanceMode::Distance => squared.sqrt(),
                DistanceMode::SquaredDistance => squared,
            }
        })
        .collect();
    Ok(out)
}
