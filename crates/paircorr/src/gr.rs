//! The radial distribution function g(r).

use crate::Error;
use crate::correlation::{Correlation, CorrelationDescr, CorrelationOutput};
use crate::pair_hist::pair_histogram;
use crate::sampling::{GridStep, adjust_skip, linear_grid};
use crate::trajectory::{Selection, Trajectory};
use paircorr_nostd_internal::{
    BatchPlan, DEFAULT_BATCH_TARGET, PairSets, Positions, validate_bin_edges,
};
use rayon::prelude::*;
use std::f64::consts::PI;
use tracing::{debug, info_span, trace, warn};

const DESCR: CorrelationDescr = CorrelationDescr {
    symbol: "g(r)",
    short_name: "gr",
    description: "radial distribution function",
};

/// Configures a [`RadialDistributionFunction`].
///
/// By default, g(r) is computed between all particles on a linear grid from 0
/// to half the box side along x (as found in the first frame) with a spacing
/// of 0.04, using every frame of the trajectory.
#[derive(Clone, Debug)]
pub struct RdfBuilder {
    selections: [Selection; 2],
    rgrid: Option<Vec<f64>>,
    dr: f64,
    norigins: i64,
    batch_target: usize,
}

impl Default for RdfBuilder {
    fn default() -> Self {
        RdfBuilder {
            selections: [Selection::All, Selection::All],
            rgrid: None,
            dr: 0.04,
            norigins: -1,
            batch_target: DEFAULT_BATCH_TARGET,
        }
    }
}

impl RdfBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// compute g(r) among the particles picked by `selection`
    pub fn selection(mut self, selection: Selection) -> Self {
        self.selections = [selection, selection];
        self
    }

    /// compute the partial g(r) between two populations. When both selections
    /// are equal this is the same as [`RdfBuilder::selection`].
    pub fn selections(mut self, first: Selection, second: Selection) -> Self {
        self.selections = [first, second];
        self
    }

    /// The centers of the distance bins. Edges are reconstructed assuming
    /// that every bin is as wide as the spacing of the first two centers.
    pub fn rgrid(mut self, centers: &[f64]) -> Self {
        self.rgrid = Some(centers.to_vec());
        self
    }

    /// The bin width of the default linear grid (ignored when a grid is given)
    pub fn dr(mut self, dr: f64) -> Self {
        self.dr = dr;
        self
    }

    /// The number of frames to average over. A non-positive value uses every
    /// frame.
    pub fn norigins(mut self, norigins: i64) -> Self {
        self.norigins = norigins;
        self
    }

    /// The approximate number of pair distances staged in memory at once
    pub fn batch_target(mut self, batch_target: usize) -> Self {
        self.batch_target = batch_target;
        self
    }

    pub fn build<T: Trajectory + Sync>(
        self,
        trajectory: &T,
    ) -> Result<RadialDistributionFunction<'_, T>, Error> {
        if trajectory.n_frames() == 0 {
            return Err(Error::integer_range("the number of frames", 0, 1, i64::MAX));
        }
        let bin_edges = match self.rgrid {
            Some(ref centers) => edges_from_centers(centers)?,
            None => {
                let frame = trajectory.read(0)?;
                frame.validate(0)?;
                let side_x = frame.side.first().copied().ok_or_else(|| {
                    Error::box_side(0, &frame.side, "the box needs at least 1 dimension")
                })?;
                linear_grid(0.0, side_x / 2.0, GridStep::Step(self.dr))?
            }
        };
        validate_bin_edges(&bin_edges).map_err(|what| Error::bin_edge("distance grid", what))?;

        let [first, second] = self.selections;
        Ok(RadialDistributionFunction {
            trajectory,
            selections: self.selections,
            newton: first == second,
            skip: adjust_skip(trajectory.n_frames(), self.norigins),
            bin_edges,
            batch_target: self.batch_target,
            output: CorrelationOutput::default(),
        })
    }
}

/// Reconstructs bin edges from bin centers, assuming a uniform half-spacing
/// taken from the first two centers
pub fn edges_from_centers(centers: &[f64]) -> Result<Vec<f64>, Error> {
    if centers.len() < 2 {
        return Err(Error::bin_edge("rgrid", "at least two bin centers are required"));
    }
    let half_width = (centers[1] - centers[0]) / 2.0;
    let mut edges: Vec<f64> = centers.iter().map(|c| c - half_width).collect();
    edges.push(centers[centers.len() - 1] + half_width);
    Ok(edges)
}

/// The contribution of one frame to g(r)
struct FrameHistogram {
    counts: Vec<u64>,
    n_first: usize,
    n_second: usize,
    volume: f64,
}

/// Radial distribution function, averaged over a subset of frames.
///
/// When both selections are the same population, each unordered pair is
/// counted once (Newton's third law) and the normalization accounts for it.
pub struct RadialDistributionFunction<'t, T> {
    trajectory: &'t T,
    selections: [Selection; 2],
    newton: bool,
    skip: usize,
    bin_edges: Vec<f64>,
    batch_target: usize,
    output: CorrelationOutput,
}

impl<T: Trajectory + Sync> RadialDistributionFunction<'_, T> {
    /// the distance bin edges
    pub fn bin_edges(&self) -> &[f64] {
        &self.bin_edges
    }

    /// the stride between the frames that get averaged
    pub fn skip(&self) -> usize {
        self.skip
    }

    /// whether both selections denote the same population
    pub fn is_self_pair(&self) -> bool {
        self.newton
    }

    fn histogram_frame(&self, index: usize) -> Result<Option<FrameHistogram>, Error> {
        let frame = self.trajectory.read(index)?;
        frame.validate(index)?;
        let pos_first = self.selections[0].positions(&frame);
        let pos_second = if self.newton {
            None
        } else {
            Some(self.selections[1].positions(&frame))
        };
        let n_first = pos_first.shape()[1];
        let n_second = pos_second.as_ref().map_or(n_first, |p| p.shape()[1]);
        if n_first == 0 || n_second == 0 {
            debug!(frame = index, n_first, n_second, "skipping frame with an empty selection");
            return Ok(None);
        }

        let points_first =
            Positions::new(pos_first.view()).map_err(Error::internal_legacy_adhoc)?;
        let points_second = match pos_second {
            None => None,
            Some(ref pos_second) => {
                Some(Positions::new(pos_second.view()).map_err(Error::internal_legacy_adhoc)?)
            }
        };
        let pair_sets = match points_second {
            None => PairSets::Newton(&points_first),
            Some(ref points_second) => PairSets::Cross(&points_first, points_second),
        };
        let plan = BatchPlan::for_pair_sets(self.batch_target, &pair_sets);
        let counts = pair_histogram(&pair_sets, &frame.side, &self.bin_edges, &plan)?;
        trace!(frame = index, n_first, n_second, "histogrammed frame");
        Ok(Some(FrameHistogram {
            counts,
            n_first,
            n_second,
            volume: frame.volume(),
        }))
    }
}

fn mean(values: impl Iterator<Item = f64>, n: usize) -> f64 {
    values.sum::<f64>() / n as f64
}

impl<T: Trajectory + Sync> Correlation for RadialDistributionFunction<'_, T> {
    fn descr(&self) -> CorrelationDescr {
        DESCR
    }

    fn compute(&mut self) -> Result<(), Error> {
        let n_frames = self.trajectory.n_frames();
        let _span = info_span!(
            "RadialDistributionFunction::compute",
            n_frames,
            skip = self.skip,
            self_pair = self.newton
        )
        .entered();

        let frame_ids: Vec<usize> = (0..n_frames).step_by(self.skip).collect();
        let per_frame = frame_ids
            .par_iter()
            .map(|&i| self.histogram_frame(i))
            .collect::<Result<Vec<_>, Error>>()?;
        // collect preserves the frame order, so the reductions below don't
        // depend on how rayon scheduled the frames
        let histograms: Vec<FrameHistogram> = per_frame.into_iter().flatten().collect();
        let n_processed = histograms.len();
        if n_processed == 0 {
            warn!("no frame contributed to g(r); the result is not finite");
        }

        let n_bins = self.bin_edges.len() - 1;
        let mut avg_hist = vec![0.0; n_bins];
        for hist in histograms.iter() {
            for (avg, &count) in avg_hist.iter_mut().zip(hist.counts.iter()) {
                *avg += count as f64;
            }
        }
        for avg in avg_hist.iter_mut() {
            *avg /= n_processed as f64;
        }

        let n_first = mean(histograms.iter().map(|h| h.n_first as f64), n_processed);
        let n_second = mean(histograms.iter().map(|h| h.n_second as f64), n_processed);
        let volume = mean(histograms.iter().map(|h| h.volume), n_processed);
        let rho = n_second / volume;
        let newton_factor = if self.newton { 0.5 } else { 1.0 };

        let r = &self.bin_edges;
        let value = (0..n_bins)
            .map(|k| {
                let shell = 4.0 * PI / 3.0 * (r[k + 1].powi(3) - r[k].powi(3));
                avg_hist[k] / (rho * shell * n_first * newton_factor)
            })
            .collect();
        let grid = r.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect();
        debug!(n_processed, rho, n_first, "normalized g(r)");
        self.output.set_curve(grid, value);
        Ok(())
    }

    fn output(&self) -> &CorrelationOutput {
        &self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_from_center_grid() {
        let edges = edges_from_centers(&[0.5, 1.5, 2.5]).unwrap();
        assert_eq!(edges, vec![0.0, 1.0, 2.0, 3.0]);

        // the half-spacing comes from the first two centers only
        let edges = edges_from_centers(&[1.0, 2.0, 4.0]).unwrap();
        assert_eq!(edges, vec![0.5, 1.5, 3.5, 4.5]);

        assert!(edges_from_centers(&[1.0]).is_err());
    }
}
