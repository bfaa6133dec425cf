//! Seeded synthetic sequences of a lead vehicle closing in at constant speed.
//!
//! The vehicle's rear is a vertical rectangle at `x = distance` in lidar
//! coordinates. Lidar returns are sampled on it, with a fraction of
//! reflections placed behind it. Keypoints are fixed points on the rear face
//! plus static background points near the top of the image, matched
//! one-to-one between consecutive frames.

use nalgebra as na;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::Calibration;
use crate::error::{FusionError, Result};
use crate::projection::ProjectionChain;
use crate::types::{BoundingBox, DataFrame, Keypoint, KeypointMatch, LidarPoint, Rect};

const IMAGE_WIDTH: f32 = 1242.0;
/// background keypoints stay above this row, clear of the vehicle
const BACKGROUND_MAX_ROW: f32 = 150.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticConfig {
    pub initial_distance: f64,
    /// positive when approaching
    pub closing_speed: f64,
    pub frame_rate: f64,
    pub vehicle_width: f64,
    pub vehicle_height: f64,
    /// lidar height above the road
    pub mount_height: f64,
    pub lidar_points: usize,
    pub outlier_fraction: f64,
    pub keypoints: usize,
    pub background_keypoints: usize,
    /// uniform noise added to the range of returns on the rear face
    pub range_noise: f64,
    pub seed: u64,
    pub calibration: Calibration,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            initial_distance: 8.0,
            closing_speed: 5.0,
            frame_rate: 10.0,
            vehicle_width: 1.8,
            vehicle_height: 1.3,
            mount_height: 1.73,
            lidar_points: 300,
            outlier_fraction: 0.15,
            keypoints: 60,
            background_keypoints: 20,
            range_noise: 0.0,
            seed: 0,
            calibration: Calibration::default(),
        }
    }
}

impl SyntheticConfig {
    pub fn distance_at(&self, frame_index: usize) -> f64 {
        self.initial_distance - self.closing_speed * frame_index as f64 / self.frame_rate
    }

    /// Time until the rear face reaches the lidar, as seen at `frame_index`.
    pub fn ground_truth_ttc(&self, frame_index: usize) -> f64 {
        self.distance_at(frame_index) / self.closing_speed
    }

    pub fn validate(&self) -> Result<()> {
        crate::error::check_frame_rate(self.frame_rate)?;
        if !(self.vehicle_width > 0.0 && self.vehicle_height > 0.0) {
            return Err(FusionError::InvalidConfig(
                "vehicle size must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.outlier_fraction) {
            return Err(FusionError::InvalidConfig(format!(
                "outlier_fraction must be in [0, 1], got {}",
                self.outlier_fraction
            )));
        }
        if !(self.range_noise >= 0.0) {
            return Err(FusionError::InvalidConfig(format!(
                "range_noise must not be negative, got {}",
                self.range_noise
            )));
        }
        Ok(())
    }

    fn z_range(&self) -> (f64, f64) {
        let bottom = -self.mount_height + 0.2;
        (bottom, bottom + self.vehicle_height)
    }
}

fn project_or_err(chain: &ProjectionChain, p: &na::Vector3<f64>) -> Result<na::Vector2<f64>> {
    chain.project_one(p).ok_or_else(|| {
        FusionError::InvalidConfig(format!("synthetic point {:?} is behind the camera", p))
    })
}

/// Pixel hull of the rear face corners.
fn face_roi(config: &SyntheticConfig, chain: &ProjectionChain, distance: f64) -> Result<Rect> {
    let half_w = config.vehicle_width / 2.0;
    let (z_lo, z_hi) = config.z_range();
    let mut u_min = f64::INFINITY;
    let mut u_max = f64::NEG_INFINITY;
    let mut v_min = f64::INFINITY;
    let mut v_max = f64::NEG_INFINITY;
    for (y, z) in [(-half_w, z_lo), (-half_w, z_hi), (half_w, z_lo), (half_w, z_hi)] {
        let p = project_or_err(chain, &na::Vector3::new(distance, y, z))?;
        u_min = u_min.min(p.x);
        u_max = u_max.max(p.x);
        v_min = v_min.min(p.y);
        v_max = v_max.max(p.y);
    }
    let x = u_min.floor() as i32;
    let y = v_min.floor() as i32;
    Ok(Rect::new(
        x,
        y,
        u_max.ceil() as i32 - x + 1,
        v_max.ceil() as i32 - y + 1,
    ))
}

/// Generates `num_frames` frames. Frame 0 has no keypoint matches.
pub fn generate_sequence(config: &SyntheticConfig, num_frames: usize) -> Result<Vec<DataFrame>> {
    config.validate()?;
    if num_frames > 0 && config.distance_at(num_frames - 1) < 1.0 {
        return Err(FusionError::InvalidConfig(format!(
            "vehicle is closer than 1.0 at frame {}",
            num_frames - 1
        )));
    }
    let chain = ProjectionChain::from_calibration(&config.calibration);
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let half_w = config.vehicle_width / 2.0;
    let (z_lo, z_hi) = config.z_range();

    // (y, z) on the rear face, fixed for the whole sequence
    let face_points: Vec<(f64, f64)> = (0..config.keypoints)
        .map(|_| {
            (
                rng.random_range(-half_w..half_w),
                rng.random_range(z_lo..z_hi),
            )
        })
        .collect();
    let background: Vec<Keypoint> = (0..config.background_keypoints)
        .map(|_| {
            Keypoint::new(
                rng.random_range(0.0..IMAGE_WIDTH),
                rng.random_range(0.0..BACKGROUND_MAX_ROW),
            )
        })
        .collect();

    let mut frames = Vec::with_capacity(num_frames);
    for frame_index in 0..num_frames {
        let distance = config.distance_at(frame_index);

        let lidar_points = (0..config.lidar_points)
            .map(|_| {
                let x = if rng.random_bool(config.outlier_fraction) {
                    distance + rng.random_range(0.5..2.0)
                } else if config.range_noise > 0.0 {
                    distance + rng.random_range(-config.range_noise..config.range_noise)
                } else {
                    distance
                };
                LidarPoint::new(
                    x,
                    rng.random_range(-half_w..half_w),
                    rng.random_range(z_lo..z_hi),
                    rng.random_range(0.1..0.9),
                )
            })
            .collect();

        let mut keypoints = Vec::with_capacity(face_points.len() + background.len());
        for &(y, z) in &face_points {
            let p = project_or_err(&chain, &na::Vector3::new(distance, y, z))?;
            keypoints.push(Keypoint::new(p.x as f32, p.y as f32));
        }
        keypoints.extend_from_slice(&background);

        let kpt_matches = if frame_index == 0 {
            Vec::new()
        } else {
            (0..keypoints.len())
                .map(|i| KeypointMatch::new(i, i, rng.random_range(10.0..90.0)))
                .collect()
        };

        frames.push(DataFrame {
            keypoints,
            lidar_points,
            bounding_boxes: vec![BoundingBox::new(0, face_roi(config, &chain, distance)?)],
            kpt_matches,
            ..Default::default()
        });
    }
    Ok(frames)
}
