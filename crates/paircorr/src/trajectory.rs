//! The minimal view of a trajectory that the estimators need.
//!
//! Parsing trajectory files is outside the scope of this crate. Readers only
//! need to implement [`Trajectory`]; [`InMemoryTrajectory`] covers the case
//! where the frames already live in memory.

use crate::Error;
use ndarray::{Array2, ArrayView2};
use paircorr_nostd_internal::{minimum_image, validate_periods};

/// A single configuration of the system
#[derive(Clone, Debug)]
pub struct Frame {
    /// The periodic box side along each axis
    pub side: Vec<f64>,
    /// Particle positions with shape `(D, n_particles)`
    pub positions: Array2<f64>,
    /// The species of every particle
    pub species: Vec<u32>,
}

impl Frame {
    /// Builds a frame where every particle has species 0
    pub fn new(side: Vec<f64>, positions: Array2<f64>) -> Self {
        let species = vec![0; positions.shape()[1]];
        Frame {
            side,
            positions,
            species,
        }
    }

    pub fn with_species(side: Vec<f64>, positions: Array2<f64>, species: Vec<u32>) -> Self {
        Frame {
            side,
            positions,
            species,
        }
    }

    pub fn n_particles(&self) -> usize {
        self.positions.shape()[1]
    }

    pub fn n_spatial_dims(&self) -> usize {
        self.positions.shape()[0]
    }

    /// The volume of the periodic box
    pub fn volume(&self) -> f64 {
        self.side.iter().product()
    }

    /// Checks the internal consistency of a frame. `index` is only used to
    /// report errors.
    pub fn validate(&self, index: usize) -> Result<(), Error> {
        validate_periods(&self.side, self.n_spatial_dims())
            .map_err(|what| Error::box_side(index, &self.side, what))?;
        if self.species.len() != self.n_particles() {
            return Err(Error::shape(format!(
                "frame {index} holds {} positions but {} species",
                self.n_particles(),
                self.species.len()
            )));
        }
        Ok(())
    }
}

/// Picks the particles that take part in a correlation function
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    All,
    Species(u32),
}

impl Selection {
    /// Copies the positions of the selected particles, in their original
    /// order, into an array of shape `(D, n_selected)`
    pub fn positions(&self, frame: &Frame) -> Array2<f64> {
        match self {
            Selection::All => frame.positions.clone(),
            Selection::Species(species) => {
                let indices: Vec<usize> = frame
                    .species
                    .iter()
                    .enumerate()
                    .filter_map(|(i, s)| (s == species).then_some(i))
                    .collect();
                Array2::from_shape_fn((frame.n_spatial_dims(), indices.len()), |(k, j)| {
                    frame.positions[[k, indices[j]]]
                })
            }
        }
    }
}

/// An ordered sequence of frames sampled at the simulation steps returned by
/// [`Trajectory::steps`]
pub trait Trajectory {
    fn n_frames(&self) -> usize;

    /// the simulation step of every frame (strictly increasing)
    fn steps(&self) -> &[u64];

    /// the physical time elapsed per simulation step
    fn timestep(&self) -> f64;

    /// read the frame with the given index
    fn read(&self, index: usize) -> Result<Frame, Error>;

    /// the physical time spanned by the trajectory
    fn total_time(&self) -> f64 {
        match (self.steps().first(), self.steps().last()) {
            (Some(first), Some(last)) => (last - first) as f64 * self.timestep(),
            _ => 0.0,
        }
    }
}

/// A trajectory whose frames are all held in memory
#[derive(Clone, Debug)]
pub struct InMemoryTrajectory {
    frames: Vec<Frame>,
    steps: Vec<u64>,
    timestep: f64,
}

impl InMemoryTrajectory {
    /// Builds the trajectory, validating every frame.
    ///
    /// `steps` must be strictly increasing and hold one entry per frame.
    pub fn new(frames: Vec<Frame>, steps: Vec<u64>, timestep: f64) -> Result<Self, Error> {
        if frames.len() != steps.len() {
            return Err(Error::shape(format!(
                "{} frames were provided with {} steps",
                frames.len(),
                steps.len()
            )));
        } else if steps.windows(2).any(|pair| pair[1] <= pair[0]) {
            return Err(Error::invalid_argument("steps", "must be strictly increasing"));
        } else if !(timestep.is_finite() && timestep > 0.0) {
            return Err(Error::invalid_argument("timestep", "must be finite and positive"));
        }
        for (i, frame) in frames.iter().enumerate() {
            frame.validate(i)?;
        }
        Ok(InMemoryTrajectory {
            frames,
            steps,
            timestep,
        })
    }

    /// Builds a trajectory with frames sampled at steps `0, 1, 2, ...`
    pub fn from_frames(frames: Vec<Frame>, timestep: f64) -> Result<Self, Error> {
        let steps = (0..frames.len() as u64).collect();
        Self::new(frames, steps, timestep)
    }
}

impl Trajectory for InMemoryTrajectory {
    fn n_frames(&self) -> usize {
        self.frames.len()
    }

    fn steps(&self) -> &[u64] {
        &self.steps
    }

    fn timestep(&self) -> f64 {
        self.timestep
    }

    fn read(&self, index: usize) -> Result<Frame, Error> {
        self.frames
            .get(index)
            .cloned()
            .ok_or_else(|| Error::frame_index(index, self.frames.len()))
    }
}

/// Returns the positions of the selected particles with the periodic
/// wrapping undone, one array per frame.
///
/// The unfolded position in frame `k` is the unfolded position in frame
/// `k − 1` plus the minimum-image displacement between the two (folded)
/// frames. This is only meaningful when particles move less than half a box
/// side between consecutive frames. The number of selected particles must not
/// change along the trajectory.
pub fn unfolded_positions(
    trajectory: &impl Trajectory,
    selection: Selection,
) -> Result<Vec<Array2<f64>>, Error> {
    let mut out: Vec<Array2<f64>> = Vec::with_capacity(trajectory.n_frames());
    let mut previous: Option<Array2<f64>> = None;
    for index in 0..trajectory.n_frames() {
        let frame = trajectory.read(index)?;
        frame.validate(index)?;
        let folded = selection.positions(&frame);
        let unfolded = match (&previous, out.last()) {
            (Some(prev_folded), Some(prev_unfolded)) => {
                if prev_folded.shape() != folded.shape() {
                    return Err(Error::shape(format!(
                        "frame {index} selects positions of shape {:?} while the previous \
                         frame selects {:?}",
                        folded.shape(),
                        prev_folded.shape()
                    )));
                }
                unfold_step(prev_unfolded.view(), prev_folded.view(), folded.view(), &frame.side)
            }
            _ => folded.clone(),
        };
        out.push(unfolded);
        previous = Some(folded);
    }
    Ok(out)
}

fn unfold_step(
    prev_unfolded: ArrayView2<f64>,
    prev_folded: ArrayView2<f64>,
    folded: ArrayView2<f64>,
    side: &[f64],
) -> Array2<f64> {
    let mut unfolded = prev_unfolded.to_owned();
    for ((k, i), value) in unfolded.indexed_iter_mut() {
        *value += minimum_image(folded[[k, i]] - prev_folded[[k, i]], side[k]);
    }
    unfolded
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    #[test]
    fn selection_by_species() {
        let frame = Frame::with_species(
            vec![10.0, 10.0],
            arr2(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]),
            vec![1, 0, 1],
        );
        assert_eq!(
            Selection::Species(1).positions(&frame),
            arr2(&[[1.0, 3.0], [4.0, 6.0]])
        );
        assert_eq!(Selection::Species(2).positions(&frame).shape(), &[2, 0]);
        assert_eq!(Selection::All.positions(&frame), frame.positions);
    }

    #[test]
    fn invalid_trajectories() {
        let good = Frame::new(vec![5.0], arr2(&[[1.0, 2.0]]));
        let bad_side = Frame::new(vec![-5.0], arr2(&[[1.0, 2.0]]));
        let bad_dims = Frame::new(vec![5.0, 5.0], arr2(&[[1.0, 2.0]]));

        assert!(InMemoryTrajectory::from_frames(vec![good.clone()], 0.1).is_ok());
        assert!(InMemoryTrajectory::from_frames(vec![good.clone(), bad_side], 0.1).is_err());
        assert!(InMemoryTrajectory::from_frames(vec![bad_dims], 0.1).is_err());
        assert!(InMemoryTrajectory::from_frames(vec![good.clone()], 0.0).is_err());
        let pair = vec![good.clone(), good.clone()];
        assert!(InMemoryTrajectory::new(pair, vec![3, 3], 0.1).is_err());
        assert!(InMemoryTrajectory::new(vec![good], vec![0, 1], 0.1).is_err());
    }

    #[test]
    fn step_and_timestep_errors_name_the_argument() {
        let frame = Frame::new(vec![5.0], arr2(&[[1.0, 2.0]]));
        let pair = vec![frame.clone(), frame.clone()];
        let err = InMemoryTrajectory::new(pair, vec![4, 2], 0.1).unwrap_err();
        assert_eq!(err.to_string(), "invalid steps: must be strictly increasing");

        let err = InMemoryTrajectory::from_frames(vec![frame], f64::NAN).unwrap_err();
        assert_eq!(err.to_string(), "invalid timestep: must be finite and positive");
    }

    #[test]
    fn read_out_of_bounds() {
        let frame = Frame::new(vec![5.0], arr2(&[[1.0, 2.0]]));
        let trajectory = InMemoryTrajectory::new(vec![frame], vec![10], 0.5).unwrap();
        assert!(trajectory.read(0).is_ok());
        assert!(trajectory.read(1).is_err());
        assert_eq!(trajectory.total_time(), 0.0);
    }

    #[test]
    fn unfold_across_boundary() {
        // a single particle drifting by +0.75 per frame in a box of side 2
        let side = vec![2.0];
        let folded = [0.5, 1.25, 0.0, 0.75, 1.5, 0.25];
        let frames = folded
            .iter()
            .map(|&x| Frame::new(side.clone(), arr2(&[[x]])))
            .collect();
        let trajectory = InMemoryTrajectory::from_frames(frames, 1.0).unwrap();
        let unfolded = unfolded_positions(&trajectory, Selection::All).unwrap();
        let xs: Vec<f64> = unfolded.iter().map(|a| a[[0, 0]]).collect();
        assert_eq!(xs, vec![0.5, 1.25, 2.0, 2.75, 3.5, 4.25]);
    }

    #[test]
    fn unfold_requires_constant_population() {
        let frames = vec![
            Frame::new(vec![2.0], arr2(&[[0.5, 1.0]])),
            Frame::new(vec![2.0], arr2(&[[0.5]])),
        ];
        let trajectory = InMemoryTrajectory::from_frames(frames, 1.0).unwrap();
        assert!(unfolded_positions(&trajectory, Selection::All).is_err());
    }
}
