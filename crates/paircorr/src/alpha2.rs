//! The non-Gaussian parameter α₂(t) of particle displacements.

use crate::Error;
use crate::correlation::{Correlation, CorrelationDescr, CorrelationOutput};
use crate::sampling::{
    FrameOffset, GridStep, adjust_skip, gcf_offset, ifabsmm, linear_grid, setup_t_grid,
};
use crate::trajectory::{Selection, Trajectory, unfolded_positions};
use ndarray::Array2;
use paircorr_nostd_internal::non_gaussian_parameter;
use tracing::{debug, info_span};

const DESCR: CorrelationDescr = CorrelationDescr {
    symbol: "alpha_2(t)",
    short_name: "alpha2",
    description: "non-Gaussian parameter",
};

/// Configures a [`NonGaussianParameter`].
#[derive(Clone, Debug)]
pub struct NonGaussianBuilder {
    selection: Selection,
    tgrid: Option<Vec<f64>>,
    norigins: i64,
    nsamples: usize,
}

impl Default for NonGaussianBuilder {
    fn default() -> Self {
        NonGaussianBuilder {
            selection: Selection::All,
            tgrid: None,
            norigins: 50,
            nsamples: 30,
        }
    }
}

impl NonGaussianBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    /// The requested time lags (in physical time units). They get snapped to
    /// the lags that the trajectory actually realizes.
    pub fn tgrid(mut self, times: &[f64]) -> Self {
        self.tgrid = Some(times.to_vec());
        self
    }

    /// The desired number of time origins. A non-positive value uses every
    /// frame as an origin.
    pub fn norigins(mut self, norigins: i64) -> Self {
        self.norigins = norigins;
        self
    }

    /// The number of points in the default time grid, which spans the first
    /// three quarters of the trajectory (ignored when a grid is given)
    pub fn nsamples(mut self, nsamples: usize) -> Self {
        self.nsamples = nsamples;
        self
    }

    pub fn build<T: Trajectory>(
        self,
        trajectory: &T,
    ) -> Result<NonGaussianParameter<'_, T>, Error> {
        let n_frames = trajectory.n_frames();
        if n_frames == 0 {
            return Err(Error::integer_range("the number of frames", 0, 1, i64::MAX));
        }
        let times = match self.tgrid {
            Some(times) => {
                if times.iter().any(|t| !t.is_finite()) {
                    return Err(Error::invalid_argument("tgrid", "every time must be finite"));
                }
                times
            }
            None => linear_grid(
                0.0,
                0.75 * trajectory.total_time(),
                GridStep::Count(self.nsamples),
            )?,
        };
        let offsets = setup_t_grid(trajectory.steps(), trajectory.timestep(), &times);
        debug!(
            n_requested = times.len(),
            n_offsets = offsets.len(),
            "aligned the time grid"
        );
        Ok(NonGaussianParameter {
            trajectory,
            selection: self.selection,
            skip: adjust_skip(n_frames, self.norigins),
            offsets,
            output: CorrelationOutput::default(),
        })
    }
}

/// The non-Gaussian parameter α₂(t), averaged over time origins.
///
/// α₂ vanishes when displacements are Gaussian. Its peak (t*, α₂*) is
/// recorded by [`Correlation::analyze`] under the `"t_star"` and `"a2_star"`
/// keys.
pub struct NonGaussianParameter<'t, T> {
    trajectory: &'t T,
    selection: Selection,
    skip: usize,
    offsets: Vec<FrameOffset>,
    output: CorrelationOutput,
}

impl<T: Trajectory> NonGaussianParameter<'_, T> {
    /// the time lags (in frames) that get sampled
    pub fn offsets(&self) -> &[FrameOffset] {
        &self.offsets
    }

    /// the stride between consecutive time origins
    pub fn skip(&self) -> usize {
        self.skip
    }
}

fn kernel(x: &Array2<f64>, y: &Array2<f64>) -> Result<f64, Error> {
    non_gaussian_parameter(x.view(), y.view()).map_err(Error::internal_legacy_adhoc)
}

impl<T: Trajectory> Correlation for NonGaussianParameter<'_, T> {
    fn descr(&self) -> CorrelationDescr {
        DESCR
    }

    fn compute(&mut self) -> Result<(), Error> {
        let _span = info_span!(
            "NonGaussianParameter::compute",
            n_frames = self.trajectory.n_frames(),
            skip = self.skip,
            n_offsets = self.offsets.len()
        )
        .entered();

        let positions = unfolded_positions(self.trajectory, self.selection)?;
        let (steps, value) = gcf_offset(
            kernel,
            &self.offsets,
            self.skip,
            self.trajectory.steps(),
            &positions,
        )?;
        let timestep = self.trajectory.timestep();
        let grid = steps.iter().map(|&dt| dt as f64 * timestep).collect();
        self.output.set_curve(grid, value);
        Ok(())
    }

    fn analyze(&mut self) {
        match ifabsmm(&self.output.grid, &self.output.value) {
            Some((_, max)) => {
                self.output.results.insert("t_star", max.x);
                self.output.results.insert("a2_star", max.value);
            }
            None => debug!("could not locate the peak of alpha_2(t)"),
        }
    }

    fn output(&self) -> &CorrelationOutput {
        &self.output
    }
}
