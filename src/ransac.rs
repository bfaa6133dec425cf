//! Line RANSAC on the x-y (bird's eye) projection of lidar points.
//!
//! Used to strip returns that do not belong to the dominant surface of an
//! object, e.g. ground hits or reflections behind the rear of a vehicle.
//! The random source is passed in so runs are reproducible under a fixed seed.

use log::debug;
use rand::Rng;

use crate::error::{FusionError, Result};
use crate::types::LidarPoint;

/// Implicit line `a*x + b*y + c = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line2D {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Line2D {
    /// Line through `(x1, y1)` and `(x2, y2)`.
    pub fn through(x1: f64, y1: f64, x2: f64, y2: f64) -> Line2D {
        Line2D {
            a: y1 - y2,
            b: x2 - x1,
            c: x1 * y2 - x2 * y1,
        }
    }

    /// Two coincident samples do not define a line.
    pub fn is_degenerate(&self) -> bool {
        self.a == 0.0 && self.b == 0.0
    }

    pub fn distance(&self, x: f64, y: f64) -> f64 {
        (self.a * x + self.b * y + self.c).abs() / (self.a * self.a + self.b * self.b).sqrt()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineFit {
    /// `None` when no iteration ran.
    pub line: Option<Line2D>,
    /// ascending indices into the input
    pub inliers: Vec<usize>,
}

fn sample_two<R: Rng + ?Sized>(rng: &mut R, n: usize) -> (usize, usize) {
    let i = rng.random_range(0..n);
    loop {
        let j = rng.random_range(0..n);
        if j != i {
            return (i, j);
        }
    }
}

/// Runs exactly `max_iterations` line hypotheses and keeps the one with the most inliers.
///
/// A later hypothesis replaces the best one only with strictly more inliers.
/// Fewer than two points is a caller error.
pub fn ransac_line_2d<R: Rng + ?Sized>(
    lidar_points: &[LidarPoint],
    max_iterations: usize,
    distance_threshold: f64,
    rng: &mut R,
) -> Result<LineFit> {
    let n = lidar_points.len();
    if n < 2 {
        return Err(FusionError::NotEnoughPoints {
            required: 2,
            got: n,
        });
    }

    let mut best = LineFit {
        line: None,
        inliers: Vec::new(),
    };
    let mut mask = vec![false; n];
    let mut best_mask = vec![false; n];
    let mut best_count = 0usize;

    for _ in 0..max_iterations {
        let (i, j) = sample_two(rng, n);
        let (p1, p2) = (&lidar_points[i], &lidar_points[j]);
        let line = Line2D::through(p1.x, p1.y, p2.x, p2.y);

        mask.fill(false);
        mask[i] = true;
        mask[j] = true;
        let mut count = 2;
        if !line.is_degenerate() {
            for (idx, lp) in lidar_points.iter().enumerate() {
                if mask[idx] {
                    continue;
                }
                if line.distance(lp.x, lp.y) <= distance_threshold {
                    mask[idx] = true;
                    count += 1;
                }
            }
        }

        if count > best_count {
            best_count = count;
            best_mask.copy_from_slice(&mask);
            best.line = Some(line);
        }
    }

    best.inliers = best_mask
        .iter()
        .enumerate()
        .filter(|(_, keep)| **keep)
        .map(|(idx, _)| idx)
        .collect();
    debug!(
        "ransac done, found {} inliers out of {} points",
        best.inliers.len(),
        n
    );
    Ok(best)
}

/// Keeps the points on the dominant line, in input order.
pub fn remove_outliers<R: Rng + ?Sized>(
    lidar_points: &[LidarPoint],
    max_iterations: usize,
    distance_threshold: f64,
    rng: &mut R,
) -> Result<Vec<LidarPoint>> {
    let fit = ransac_line_2d(lidar_points, max_iterations, distance_threshold, rng)?;
    Ok(fit.inliers.iter().map(|&idx| lidar_points[idx]).collect())
}
