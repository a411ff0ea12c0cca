//! Generic machinery for sampling a trajectory in space and time: grid
//! construction, origin striding, alignment of requested times onto the steps
//! that were actually recorded and the offset-correlation driver.

use crate::Error;
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::trace;

/// How [`linear_grid`] spaces its points
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GridStep {
    /// consecutive points are separated by this amount; the last point doesn't
    /// exceed `stop`
    Step(f64),
    /// this many evenly spaced points, including both `start` and `stop`
    Count(usize),
}

/// Builds a linear grid starting at `start`.
///
/// With [`GridStep::Step`], the grid holds `start + i·step` for
/// `i = 0..=floor((stop − start)/step)`. With [`GridStep::Count`], it holds
/// `n` points spanning `[start, stop]` (a single point is just `start`).
pub fn linear_grid(start: f64, stop: f64, step: GridStep) -> Result<Vec<f64>, Error> {
    if !(start.is_finite() && stop.is_finite()) || stop < start {
        return Err(Error::bin_edge(
            "linear grid",
            "start and stop must be finite with start <= stop",
        ));
    }
    match step {
        GridStep::Step(delta) => {
            if !(delta.is_finite() && delta > 0.0) {
                return Err(Error::bin_edge("linear grid", "the step must be positive"));
            }
            let n = ((stop - start) / delta) as usize + 1;
            Ok((0..n).map(|i| start + i as f64 * delta).collect())
        }
        GridStep::Count(n) => {
            if n == 0 {
                return Err(Error::integer_range("the number of grid points", 0, 1, i64::MAX));
            }
            let delta = if n > 1 {
                (stop - start) / (n - 1) as f64
            } else {
                0.0
            };
            Ok((0..n).map(|i| start + i as f64 * delta).collect())
        }
    }
}

/// Translates a desired number of time origins into a stride between the
/// frames used as origins. A non-positive `n_origins` requests every frame.
pub fn adjust_skip(n_frames: usize, n_origins: i64) -> usize {
    if n_origins > 0 {
        (n_frames / n_origins as usize).max(1)
    } else {
        1
    }
}

/// A time lag, measured in frames, along with the first frame where that lag
/// realizes a particular step difference
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameOffset {
    pub offset: usize,
    pub first: usize,
}

/// Aligns the requested times onto step differences that actually occur in
/// the trajectory.
///
/// Every requested time is converted to a number of steps (rounded to the
/// nearest integer) and snapped to the closest step difference realized by a
/// pair of recorded frames (ties resolve to the smaller difference). The
/// result is sorted by step difference and free of duplicates.
pub fn setup_t_grid(steps: &[u64], timestep: f64, times: &[f64]) -> Vec<FrameOffset> {
    if steps.is_empty() {
        return Vec::new();
    }

    // first (offset, first-frame) pair realizing every step difference
    let mut realized: BTreeMap<u64, FrameOffset> = BTreeMap::new();
    for offset in 0..steps.len() {
        for first in 0..(steps.len() - offset) {
            let dt = steps[first + offset] - steps[first];
            realized.entry(dt).or_insert(FrameOffset { offset, first });
        }
    }
    let available: Vec<u64> = realized.keys().copied().collect();

    let mut matched: Vec<u64> = times
        .iter()
        .filter_map(|t| {
            let requested = (t / timestep).round();
            available.iter().copied().min_by(|a, b| {
                let da = (*a as f64 - requested).abs();
                let db = (*b as f64 - requested).abs();
                da.total_cmp(&db)
            })
        })
        .collect();
    matched.sort_unstable();
    matched.dedup();
    matched.into_iter().map(|dt| realized[&dt]).collect()
}

/// Averages `kernel(samples[i0 + offset], samples[i0])` over time origins.
///
/// For every entry of `grid`, origins run from `first` in strides of `skip`
/// while `i0 + offset` stays inside the trajectory. Contributions are keyed by
/// the actual step difference `steps[i0 + offset] − steps[i0]`, so irregularly
/// sampled trajectories are handled. Returns the sorted step differences and
/// the mean of the kernel for each of them.
///
/// Origins are evaluated in parallel, but contributions are summed in origin
/// order so the result doesn't depend on scheduling.
pub fn gcf_offset<S, F>(
    kernel: F,
    grid: &[FrameOffset],
    skip: usize,
    steps: &[u64],
    samples: &[S],
) -> Result<(Vec<u64>, Vec<f64>), Error>
where
    S: Sync,
    F: Fn(&S, &S) -> Result<f64, Error> + Sync,
{
    if skip == 0 {
        return Err(Error::integer_range("skip", 0, 1, i64::MAX));
    } else if steps.len() != samples.len() {
        return Err(Error::shape(format!(
            "{} steps were provided with {} samples",
            steps.len(),
            samples.len()
        )));
    }

    let mut sums: BTreeMap<u64, (f64, usize)> = BTreeMap::new();
    for &FrameOffset { offset, first } in grid {
        let origins: Vec<usize> = (first..samples.len().saturating_sub(offset))
            .step_by(skip)
            .collect();
        let contribs: Vec<(u64, f64)> = origins
            .par_iter()
            .map(|&i0| {
                let value = kernel(&samples[i0 + offset], &samples[i0])?;
                Ok((steps[i0 + offset] - steps[i0], value))
            })
            .collect::<Result<Vec<_>, Error>>()?;
        trace!(offset, first, n_origins = contribs.len(), "offset correlation");
        for (dt, value) in contribs {
            let entry = sums.entry(dt).or_insert((0.0, 0));
            entry.0 += value;
            entry.1 += 1;
        }
    }

    let (grid_out, values) = sums
        .into_iter()
        .map(|(dt, (total, count))| (dt, total / count as f64))
        .unzip();
    Ok((grid_out, values))
}

/// The location and value of an extremum
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extremum {
    pub x: f64,
    pub value: f64,
}

/// Locates the absolute minimum and maximum of `value` sampled on `grid`.
///
/// When an extremum lies at an interior point, it is refined by the vertex of
/// the parabola through that point and its two neighbors. Returns `None` when
/// the inputs are empty, have different lengths or hold non-finite entries.
pub fn ifabsmm(grid: &[f64], value: &[f64]) -> Option<(Extremum, Extremum)> {
    if grid.is_empty() || grid.len() != value.len() {
        return None;
    }
    if grid.iter().chain(value.iter()).any(|v| !v.is_finite()) {
        return None;
    }
    let i_min = (0..value.len()).min_by(|&a, &b| value[a].total_cmp(&value[b]))?;
    let i_max = (0..value.len()).max_by(|&a, &b| value[a].total_cmp(&value[b]))?;
    Some((refine(grid, value, i_min), refine(grid, value, i_max)))
}

fn refine(grid: &[f64], value: &[f64], i: usize) -> Extremum {
    let fallback = Extremum {
        x: grid[i],
        value: value[i],
    };
    if i == 0 || i + 1 == grid.len() {
        return fallback;
    }
    let (x0, x1, x2) = (grid[i - 1], grid[i], grid[i + 1]);
    let (y0, y1, y2) = (value[i - 1], value[i], value[i + 1]);

    // coefficients of y = a x^2 + b x + c through the 3 points
    let denom = (x0 - x1) * (x0 - x2) * (x1 - x2);
    if denom == 0.0 {
        return fallback;
    }
    let a = (x2 * (y1 - y0) + x1 * (y0 - y2) + x0 * (y2 - y1)) / denom;
    let b = (x2 * x2 * (y0 - y1) + x1 * x1 * (y2 - y0) + x0 * x0 * (y1 - y2)) / denom;
    let c = (x1 * x2 * (x1 - x2) * y0 + x2 * x0 * (x2 - x0) * y1 + x0 * x1 * (x0 - x1) * y2)
        / denom;
    if a == 0.0 {
        return fallback;
    }
    let x = -b / (2.0 * a);
    if !(x >= x0 && x <= x2) {
        return fallback;
    }
    Extremum {
        x,
        value: c - b * b / (4.0 * a),
    }
}
