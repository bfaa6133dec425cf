//! Time-to-collision from lidar ranges and from keypoint scale change.
//!
//! Both estimators assume a constant relative velocity between two frames
//! `1 / frame_rate` seconds apart. A non-finite return value means the TTC
//! could not be estimated for this frame pair.

use log::{debug, warn};

use crate::clustering::keypoints::keypoint_at;
use crate::error::{FusionError, Result, check_frame_rate};
use crate::stats::{median_paired, median_x};
use crate::types::{Keypoint, KeypointMatch, LidarPoint};

/// Points further than this from the median x are ignored.
pub const MEDIAN_X_TOLERANCE: f64 = 0.18;
/// Assumed width of the ego lane.
pub const LANE_WIDTH: f64 = 4.0;
/// Keypoint pairs closer than this in the current frame are too noisy to use.
pub const MIN_KEYPOINT_DISTANCE: f64 = 100.0;

/// Closest x among the points inside the ego lane and near the median.
fn closest_in_lane_x(lidar_points: &[LidarPoint], median: f64) -> Option<f64> {
    lidar_points
        .iter()
        .filter(|lp| lp.y.abs() <= LANE_WIDTH / 2.0 && (median - lp.x).abs() < MEDIAN_X_TOLERANCE)
        .map(|lp| lp.x)
        .min_by(f64::total_cmp)
}

/// Lidar TTC from the closest in-lane distance of two frames.
///
/// Both point lists must be non-empty. Equal closest distances give an
/// infinite TTC and a frame without any retained point gives NaN.
pub fn compute_ttc_lidar(
    lidar_points_prev: &[LidarPoint],
    lidar_points_curr: &[LidarPoint],
    frame_rate: f64,
) -> Result<f64> {
    check_frame_rate(frame_rate)?;
    if lidar_points_prev.is_empty() {
        return Err(FusionError::EmptyInput("previous lidar points"));
    }
    if lidar_points_curr.is_empty() {
        return Err(FusionError::EmptyInput("current lidar points"));
    }
    let median_prev = median_x(lidar_points_prev)?;
    let median_curr = median_x(lidar_points_curr)?;
    debug!("median x prev: {:.4}, curr: {:.4}", median_prev, median_curr);

    let dt = 1.0 / frame_rate;
    let (Some(min_x_prev), Some(min_x_curr)) = (
        closest_in_lane_x(lidar_points_prev, median_prev),
        closest_in_lane_x(lidar_points_curr, median_curr),
    ) else {
        warn!("no lidar point inside the ego lane, lidar TTC not available");
        return Ok(f64::NAN);
    };

    let ttc = min_x_curr * dt / (min_x_prev - min_x_curr);
    debug!(
        "lidar TTC: min x prev {:.4}, min x curr {:.4}, ttc {:.4}",
        min_x_prev, min_x_curr, ttc
    );
    Ok(ttc)
}

/// Camera TTC from the median change of pairwise keypoint distances.
///
/// `kpt_matches` index `kpts_prev` by `query_idx` and `kpts_curr` by
/// `train_idx`. With no usable keypoint pair the result is NaN.
pub fn compute_ttc_camera(
    kpts_prev: &[Keypoint],
    kpts_curr: &[Keypoint],
    kpt_matches: &[KeypointMatch],
    frame_rate: f64,
) -> Result<f64> {
    check_frame_rate(frame_rate)?;
    let pairs = kpt_matches
        .iter()
        .map(|m| {
            Ok((
                keypoint_at(kpts_prev, m.query_idx)?.pt.as_dvec2(),
                keypoint_at(kpts_curr, m.train_idx)?.pt.as_dvec2(),
            ))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut dist_ratios = Vec::new();
    for (i, (outer_prev, outer_curr)) in pairs.iter().enumerate() {
        for (inner_prev, inner_curr) in &pairs[i + 1..] {
            let dist_curr = outer_curr.distance(*inner_curr);
            let dist_prev = outer_prev.distance(*inner_prev);
            if dist_prev > f64::EPSILON && dist_curr >= MIN_KEYPOINT_DISTANCE {
                dist_ratios.push(dist_curr / dist_prev);
            }
        }
    }

    let Some(med_dist_ratio) = median_paired(&mut dist_ratios) else {
        debug!("camera TTC: no usable keypoint pair");
        return Ok(f64::NAN);
    };
    let dt = 1.0 / frame_rate;
    let ttc = -dt / (1.0 - med_dist_ratio);
    debug!(
        "camera TTC: median distance ratio {:.5} over {} pairs, ttc {:.4}",
        med_dist_ratio,
        dist_ratios.len(),
        ttc
    );
    Ok(ttc)
}
