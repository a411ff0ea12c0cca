// the reason this is named mod.rs has to do with some complexities of how
// testing is handled
//
// we are following the advice of the rust book
// https://doc.rust-lang.org/book/ch11-03-test-organization.html#submodules-in-integration-tests

#![allow(dead_code)]

use ndarray::Array2;
use paircorr::Frame;
use rand::distr::{Distribution, Uniform};
use rand_xoshiro::Xoshiro256PlusPlus;
use rand_xoshiro::rand_core::SeedableRng;

// based on numpy!
// https://numpy.org/doc/stable/reference/generated/numpy.isclose.html
pub fn isclose(actual: f64, ref_val: f64, rtol: f64, atol: f64) -> bool {
    let actual_nan = actual.is_nan();
    let ref_nan = ref_val.is_nan();
    if actual_nan || ref_nan {
        actual_nan && ref_nan
    } else {
        (actual - ref_val).abs() <= (atol + rtol * ref_val.abs())
    }
}

/// positions of shape `(side.len(), n_points)` drawn uniformly inside the box
pub fn random_positions(seed: u64, n_points: usize, side: &[f64]) -> Array2<f64> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let mut positions = Array2::zeros([side.len(), n_points]);
    for (k, &l) in side.iter().enumerate() {
        let distribution = Uniform::new(0.0, l).unwrap();
        for i in 0..n_points {
            positions[[k, i]] = distribution.sample(&mut rng);
        }
    }
    positions
}

/// a frame of uniformly distributed particles, whose species alternate
/// between 0 and 1
pub fn random_frame(seed: u64, n_points: usize, side: &[f64]) -> Frame {
    let species = (0..n_points).map(|i| (i % 2) as u32).collect();
    Frame::with_species(side.to_vec(), random_positions(seed, n_points, side), species)
}

/// every unordered pair's minimum-image distance, computed the slow way
pub fn brute_force_distances(positions: &Array2<f64>, side: &[f64]) -> Vec<f64> {
    let n_points = positions.shape()[1];
    let mut out = Vec::new();
    for i in 0..n_points {
        for j in (i + 1)..n_points {
            let mut squared = 0.0;
            for (k, &l) in side.iter().enumerate() {
                let d = positions[[k, i]] - positions[[k, j]];
                let d = d - (d / l).round() * l;
                squared += d * d;
            }
            out.push(squared.sqrt());
        }
    }
    out
}

/// ballistic motion: every particle keeps a random velocity. Positions are
/// wrapped back into the box.
pub fn ballistic_frames(seed: u64, n_points: usize, side: &[f64], n_frames: usize) -> Vec<Frame> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let start = random_positions(seed + 1, n_points, side);
    let velocity_dist = Uniform::new_inclusive(-0.1, 0.1).unwrap();
    let velocities =
        Array2::from_shape_fn([side.len(), n_points], |_| velocity_dist.sample(&mut rng));
    (0..n_frames)
        .map(|t| {
            let positions = Array2::from_shape_fn([side.len(), n_points], |(k, i)| {
                (start[[k, i]] + velocities[[k, i]] * t as f64).rem_euclid(side[k])
            });
            Frame::new(side.to_vec(), positions)
        })
        .collect()
}
