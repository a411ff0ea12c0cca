//! Numerical kernels behind `paircorr` that don't need the standard library.
//!
//! Positions are always passed as 2D arrays with the shape `(D, n_points)`:
//! the spatial component varies along axis 0 and the particle along axis 1.
//!
//! Because `sqrt` isn't available without `std`, the pair histogram engine
//! works entirely with squared distances; distance bin edges are mapped onto
//! that axis with [`signed_square`].
#![no_std]
mod bins;
mod non_gaussian;
mod pair_hist;
mod periodic;

pub use bins::{IrregularBinEdges, histogram_into, signed_square, validate_bin_edges};
pub use non_gaussian::{is_same_sample, non_gaussian_parameter};
pub use pair_hist::{
    BatchPlan, DEFAULT_BATCH_TARGET, PairSets, Positions, accumulate_pair_histogram,
};
pub use periodic::{minimum_image, round_half_even, squared_periodic_diff_norm, validate_periods};
