//! Implements the type used to represent "bin edges" for the distance
//! histograms, [`IrregularBinEdges`].
//!
//! Binning follows the convention of `numpy.histogram`: every bin is
//! half-open (`[e_k, e_{k+1})`) except for the last one, which also includes
//! its right edge.

#[derive(Clone, Debug)]
pub struct IrregularBinEdges<'a> {
    bin_edges: &'a [f64],
}

/// Checks that `bin_edges` could be used to build [`IrregularBinEdges`]
pub fn validate_bin_edges(bin_edges: &[f64]) -> Result<(), &'static str> {
    if bin_edges.len() < 2 {
        return Err("A minimum of two bin edges are required");
    }

    if bin_edges.iter().any(|&x| !x.is_finite()) {
        return Err("Bin edges must be finite");
    }

    for i in 1..bin_edges.len() {
        if bin_edges[i] <= bin_edges[i - 1] {
            return Err("Bin edges must be in strictly increasing order");
        }
    }
    Ok(())
}

impl<'a> IrregularBinEdges<'a> {
    pub fn new(bin_edges: &'a [f64]) -> Result<IrregularBinEdges<'a>, &'static str> {
        validate_bin_edges(bin_edges)?;
        Ok(IrregularBinEdges { bin_edges })
    }

    /// Calculate the bin index for a given value.
    ///
    /// Values equal to an interior edge belong to the higher bin. A value
    /// equal to the rightmost edge belongs to the last bin. `NaN` and values
    /// outside of the edges map to `None`.
    #[inline]
    pub fn bin_index(&self, value: f64) -> Option<usize> {
        let n_edges = self.bin_edges.len();
        if !(value >= self.bin_edges[0] && value <= self.bin_edges[n_edges - 1]) {
            return None;
        }

        // number of edges that are <= value. This is at least 1 because of the
        // check above
        let n_le = self.bin_edges.partition_point(|&edge| edge <= value);
        Some((n_le - 1).min(n_edges - 2))
    }

    pub fn n_bins(&self) -> usize {
        self.bin_edges.len() - 1
    }

    pub fn as_slice(&self) -> &'a [f64] {
        self.bin_edges
    }
}

/// Maps a distance bin edge onto the axis of squared distances.
///
/// `e * |e|` is monotonic, so a (non-negative) distance `d` satisfies
/// `d >= e` exactly when `d * d >= signed_square(e)`. This lets edges that
/// were reconstructed from a center grid (and may dip below zero) be used to
/// bin squared distances.
#[inline]
pub fn signed_square(edge: f64) -> f64 {
    if edge < 0.0 { -(edge * edge) } else { edge * edge }
}

/// Counts the entries of `values` into `counts`, following the binning
/// convention of [`IrregularBinEdges::bin_index`].
pub fn histogram_into(
    counts: &mut [u64],
    values: &[f64],
    bin_edges: &IrregularBinEdges,
) -> Result<(), &'static str> {
    if counts.len() != bin_edges.n_bins() {
        return Err("counts must hold exactly one entry per bin");
    }
    for &value in values {
        if let Some(bin_index) = bin_edges.bin_index(value) {
            counts[bin_index] += 1;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn irregular_bins_invalid_creation() {
        // not enough edges
        assert!(IrregularBinEdges::new(&[0.0]).is_err());

        // unsorted bin edges
        assert!(IrregularBinEdges::new(&[2.0, 1.0]).is_err());
        assert!(IrregularBinEdges::new(&[0.0, 3.0, 2.0]).is_err());
        assert!(IrregularBinEdges::new(&[0.0, 1.0, 1.0]).is_err());

        // Non-finite values
        assert!(IrregularBinEdges::new(&[f64::NAN, 10.0]).is_err());
        assert!(IrregularBinEdges::new(&[0.0, f64::INFINITY]).is_err());
    }

    #[test]
    fn irregular_bins_bin_indexing() {
        let bins = IrregularBinEdges::new(&[-5.0, 0.0, 2.0, 3.0]).unwrap();

        assert_eq!(bins.n_bins(), 3);

        assert_eq!(bins.bin_index(-5.0), Some(0));
        assert_eq!(bins.bin_index(-2.5), Some(0));
        assert_eq!(bins.bin_index(-0.1), Some(0));
        assert_eq!(bins.bin_index(0.0), Some(1));
        assert_eq!(bins.bin_index(1.9), Some(1));
        assert_eq!(bins.bin_index(2.0), Some(2));
        assert_eq!(bins.bin_index(2.9), Some(2));

        // the rightmost edge is inclusive (like numpy.histogram)
        assert_eq!(bins.bin_index(3.0), Some(2));

        assert_eq!(bins.bin_index(-5.1), None);
        assert_eq!(bins.bin_index(3.1), None);
        assert_eq!(bins.bin_index(f64::NAN), None);
    }

    #[test]
    fn signed_square_is_monotonic() {
        let edges = [-0.5, -0.1, 0.0, 0.2, 1.0, 3.0];
        for pair in edges.windows(2) {
            assert!(signed_square(pair[0]) < signed_square(pair[1]));
        }
        assert_eq!(signed_square(-2.0), -4.0);
        assert_eq!(signed_square(3.0), 9.0);
    }

    #[test]
    fn histogram_counts() {
        let bins = IrregularBinEdges::new(&[0.0, 1.0, 2.0]).unwrap();
        let mut counts = [0_u64; 2];
        histogram_into(&mut counts, &[0.5, -50.0, 1000.0, 1.1, 2.0, 0.0], &bins).unwrap();
        assert_eq!(counts, [2, 2]);

        let mut bad_counts = [0_u64; 3];
        assert!(histogram_into(&mut bad_counts, &[0.5], &bins).is_err());
    }
}
