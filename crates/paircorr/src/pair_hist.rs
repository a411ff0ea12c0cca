use crate::Error;
use paircorr_nostd_internal::{
    BatchPlan, IrregularBinEdges, PairSets, accumulate_pair_histogram, signed_square,
};
use tracing::trace;

/// Histograms the minimum-image distances of every pair described by
/// `pair_sets`, using the distance bin edges `bin_edges`.
///
/// Scratch memory for a single batch is allocated here, so peak memory is set
/// by `plan` rather than by the number of pairs. The counts themselves don't
/// depend on `plan`.
pub fn pair_histogram(
    pair_sets: &PairSets,
    side: &[f64],
    bin_edges: &[f64],
    plan: &BatchPlan,
) -> Result<Vec<u64>, Error> {
    let squared_edges: Vec<f64> = bin_edges.iter().map(|&e| signed_square(e)).collect();
    let squared_edges = IrregularBinEdges::new(&squared_edges)
        .map_err(|what| Error::bin_edge("distance bin edges", what))?;

    let mut counts = vec![0_u64; squared_edges.n_bins()];
    let mut scratch = vec![0.0; plan.scratch_len(pair_sets)];
    trace!(
        n_pairs = pair_sets.n_pairs(),
        rows_per_batch = plan.rows_per_batch(),
        scratch_len = scratch.len(),
        "pair histogram"
    );
    accumulate_pair_histogram(
        &mut counts,
        pair_sets,
        side,
        &squared_edges,
        plan,
        &mut scratch,
    )
    .map_err(Error::internal_legacy_adhoc)?;
    Ok(counts)
}
