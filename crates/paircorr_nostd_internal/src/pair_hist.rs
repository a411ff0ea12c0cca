use crate::bins::{IrregularBinEdges, histogram_into};
use crate::periodic::{squared_periodic_diff_norm, validate_periods};
use core::num::NonZeroUsize;
use ndarray::ArrayView2;

/// The number of pairwise values we aim to hold in scratch memory per batch
pub const DEFAULT_BATCH_TARGET: usize = 100_000;

/// A configuration of point positions.
///
/// We place the following constraints on the wrapped array:
/// - axis 0 is the slow axis and it corresponds to the different components
///   of a position vector.
/// - axis 1 is the fast axis. The length along this axis coincides with
///   the number of points.
/// - In other words the shape of the array is `(D, n_points)`, where `D` is
///   the number of spatial dimensions and `n_points` is the number of points.
#[derive(Clone)]
pub struct Positions<'a> {
    coords: ArrayView2<'a, f64>,
    n_points: usize,
    n_spatial_dims: usize,
}

impl<'a> Positions<'a> {
    /// create a new instance
    pub fn new(coords: ArrayView2<'a, f64>) -> Result<Positions<'a>, &'static str> {
        let n_spatial_dims = coords.shape()[0];
        let n_points = coords.shape()[1];
        if n_spatial_dims == 0 {
            Err("positions must have at least 1 spatial dimension")
        } else {
            Ok(Self {
                coords,
                n_points,
                n_spatial_dims,
            })
        }
    }

    pub fn n_points(&self) -> usize {
        self.n_points
    }

    pub fn n_spatial_dims(&self) -> usize {
        self.n_spatial_dims
    }

    pub fn coords(&self) -> ArrayView2<'a, f64> {
        self.coords
    }
}

/// Specifies which pairs of points contribute to a histogram.
///
/// Whether we are computing a self pair-function is a property of the
/// calculation (are both roles the same population?), so callers decide it
/// up front instead of us inspecting the arrays.
pub enum PairSets<'p, 'a> {
    /// every unordered pair of distinct points within a single set is
    /// considered exactly once (Newton's third law)
    Newton(&'p Positions<'a>),
    /// every point of the second set is paired with every point of the first
    /// set. No pairs are excluded, even if the sets share content.
    Cross(&'p Positions<'a>, &'p Positions<'a>),
}

impl PairSets<'_, '_> {
    /// The number of rows of the outer loop
    pub fn n_rows(&self) -> usize {
        match self {
            PairSets::Newton(points) => points.n_points.saturating_sub(1),
            PairSets::Cross(_, points_b) => points_b.n_points,
        }
    }

    /// The number of partners considered for the row with the most partners
    pub fn max_partners_per_row(&self) -> usize {
        match self {
            PairSets::Newton(points) => points.n_points.saturating_sub(1),
            PairSets::Cross(points_a, _) => points_a.n_points,
        }
    }

    /// The total number of pairs that get considered
    pub fn n_pairs(&self) -> usize {
        match self {
            PairSets::Newton(points) => {
                points.n_points * points.n_points.saturating_sub(1) / 2
            }
            PairSets::Cross(points_a, points_b) => points_a.n_points * points_b.n_points,
        }
    }

    fn n_spatial_dims(&self) -> Result<usize, &'static str> {
        match self {
            PairSets::Newton(points) => Ok(points.n_spatial_dims),
            PairSets::Cross(points_a, points_b) => {
                if points_a.n_spatial_dims != points_b.n_spatial_dims {
                    Err("both sets of positions must have the same number of spatial dimensions")
                } else {
                    Ok(points_a.n_spatial_dims)
                }
            }
        }
    }
}

/// Describes how the rows of the outer loop are grouped into batches.
///
/// The values for every row in a batch are staged in scratch memory before
/// they get histogrammed. Consequently, peak memory scales with the size of a
/// batch rather than with the total number of pairs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchPlan {
    rows_per_batch: NonZeroUsize,
}

impl BatchPlan {
    pub fn new(rows_per_batch: NonZeroUsize) -> Self {
        Self { rows_per_batch }
    }

    /// Picks the number of rows per batch so that a batch holds roughly
    /// `target_values` values when each row has `n_partners` partners.
    pub fn from_target(target_values: usize, n_partners: usize) -> Self {
        let rows = target_values / n_partners.max(1);
        Self {
            rows_per_batch: NonZeroUsize::new(rows).unwrap_or(NonZeroUsize::MIN),
        }
    }

    /// Picks the number of rows per batch for `pair_sets`, so that the scratch
    /// buffer holds about `target_values` values (or a single row when one row
    /// already exceeds the target).
    ///
    /// Every row of a cross pair is matched against all of the first set. For
    /// a self pair, the divisor is the full population size.
    pub fn for_pair_sets(target_values: usize, pair_sets: &PairSets) -> Self {
        let n_partners = match pair_sets {
            PairSets::Newton(points) => points.n_points,
            PairSets::Cross(points_a, _) => points_a.n_points,
        };
        Self::from_target(target_values, n_partners)
    }

    pub fn rows_per_batch(&self) -> usize {
        self.rows_per_batch.get()
    }

    /// The minimum length of the scratch buffer needed to process `pair_sets`
    pub fn scratch_len(&self, pair_sets: &PairSets) -> usize {
        self.rows_per_batch.get().min(pair_sets.n_rows()) * pair_sets.max_partners_per_row()
    }
}

/// Computes the squared minimum-image distance of every pair described by
/// `pair_sets` and adds it to the histogram held by `counts`.
///
/// `squared_bin_edges` must be expressed on the axis of squared distances
/// (see [`crate::signed_square`]). Values are staged in `scratch`, one batch
/// of rows at a time, so `scratch` must hold at least
/// [`BatchPlan::scratch_len`] entries. The resulting counts don't depend on
/// the batch plan.
pub fn accumulate_pair_histogram(
    counts: &mut [u64],
    pair_sets: &PairSets,
    periods: &[f64],
    squared_bin_edges: &IrregularBinEdges,
    plan: &BatchPlan,
    scratch: &mut [f64],
) -> Result<(), &'static str> {
    let n_spatial_dims = pair_sets.n_spatial_dims()?;
    validate_periods(periods, n_spatial_dims)?;
    if counts.len() != squared_bin_edges.n_bins() {
        return Err("counts must hold exactly one entry per bin");
    } else if scratch.len() < plan.scratch_len(pair_sets) {
        return Err("the scratch buffer is too small for the batch plan");
    }

    match pair_sets {
        PairSets::Newton(points) => accumulate_helper::<true>(
            counts,
            points,
            points,
            periods,
            squared_bin_edges,
            plan,
            scratch,
        ),
        PairSets::Cross(points_a, points_b) => accumulate_helper::<false>(
            counts,
            points_a,
            points_b,
            periods,
            squared_bin_edges,
            plan,
            scratch,
        ),
    }
}

// rows are taken from points_b, partners from points_a
fn accumulate_helper<const NEWTON: bool>(
    counts: &mut [u64],
    points_a: &Positions,
    points_b: &Positions,
    periods: &[f64],
    squared_bin_edges: &IrregularBinEdges,
    plan: &BatchPlan,
    scratch: &mut [f64],
) -> Result<(), &'static str> {
    let n_rows = if NEWTON {
        points_b.n_points.saturating_sub(1)
    } else {
        points_b.n_points
    };

    let mut batch_start = 0;
    while batch_start < n_rows {
        let batch_stop = n_rows.min(batch_start + plan.rows_per_batch());
        let mut n_values = 0;
        for i_b in batch_start..batch_stop {
            let i_a_start = if NEWTON { i_b + 1 } else { 0 };
            for i_a in i_a_start..points_a.n_points {
                scratch[n_values] = squared_periodic_diff_norm(
                    points_a.coords,
                    points_b.coords,
                    i_a,
                    i_b,
                    periods,
                );
                n_values += 1;
            }
        }
        histogram_into(counts, &scratch[..n_values], squared_bin_edges)?;
        batch_start = batch_stop;
    }
    Ok(())
}
