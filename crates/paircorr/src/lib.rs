/*!
Computes structural and dynamical correlation functions from particle
trajectories in periodic boxes: the radial distribution function g(r) and the
non-Gaussian parameter α₂(t) of particle displacements.

# Overview

Both estimators share a life cycle described by the [`Correlation`] trait.
They are configured with a builder ([`RdfBuilder`], [`NonGaussianBuilder`])
that validates its inputs against a [`Trajectory`], filled by
[`Correlation::compute`] and optionally post-processed by
[`Correlation::analyze`].

```
use ndarray::arr2;
use paircorr::{Correlation, Frame, InMemoryTrajectory, RdfBuilder};

let frame = Frame::new(
    vec![4.0, 4.0, 4.0],
    arr2(&[[0.5, 1.5, 3.5], [0.5, 0.5, 0.5], [0.5, 0.5, 0.5]]),
);
let trajectory = InMemoryTrajectory::from_frames(vec![frame], 1.0).unwrap();
let mut gr = RdfBuilder::new().dr(0.5).build(&trajectory).unwrap();
gr.compute().unwrap();
assert_eq!(gr.output().grid.len(), gr.output().value.len());
```

# Pair counting

The g(r) estimator is built on [`pair_histogram`], which bins minimum-image
distances between every pair of two point sets (or every unordered pair of a
single set). Pairs are processed in batches whose size is set by a
[`BatchPlan`], so the peak memory doesn't grow with the number of pairs.
The counts never depend on the batch size.

# Developer Guide

The numerical kernels live in [`paircorr_nostd_internal`], which doesn't
depend on the standard library. This crate wraps them with error handling,
trajectory access, logging (through `tracing`) and parallelism (through
`rayon`).

*/

#![deny(rustdoc::broken_intra_doc_links)]

// inform build-system of the crates in this package
mod alpha2;
mod correlation;
mod error;
mod gr;
mod pair_hist;
mod periodic;
mod sampling;
mod trajectory;

// pull in symbols that visible outside of the package
pub use alpha2::{NonGaussianBuilder, NonGaussianParameter};
pub use correlation::{Correlation, CorrelationDescr, CorrelationOutput};
pub use error::Error;
pub use gr::{RadialDistributionFunction, RdfBuilder, edges_from_centers};
pub use pair_hist::pair_histogram;
pub use paircorr_nostd_internal::{
    BatchPlan, DEFAULT_BATCH_TARGET, PairSets, Positions, non_gaussian_parameter, round_half_even,
};
pub use periodic::{DistanceMode, periodic_distances};
pub use sampling::{
    Extremum, FrameOffset, GridStep, adjust_skip, gcf_offset, ifabsmm, linear_grid, setup_t_grid,
};
pub use trajectory::{Frame, InMemoryTrajectory, Selection, Trajectory, unfolded_positions};
