use log::{debug, trace};

use crate::error::{Result, check_shrink_factor};
use crate::projection::ProjectionChain;
use crate::types::{BoundingBox, LidarPoint, Rect};

/// Indices of every box whose shrunk roi contains the pixel.
fn enclosing_boxes(shrunk: &[Rect], u: i32, v: i32) -> Vec<usize> {
    shrunk
        .iter()
        .enumerate()
        .filter(|(_, r)| r.contains_pixel(u, v))
        .map(|(i, _)| i)
        .collect()
}

/// Groups lidar points by the bounding box their projection falls into.
///
/// Each box roi is shrunk by `shrink_factor` first to keep edge returns out.
/// The test runs on whole pixels.
/// A point enclosed by more than one box, or by none, is dropped.
pub fn cluster_lidar_with_roi(
    bounding_boxes: &mut [BoundingBox],
    lidar_points: &[LidarPoint],
    shrink_factor: f64,
    chain: &ProjectionChain,
) -> Result<()> {
    check_shrink_factor(shrink_factor)?;
    let shrunk: Vec<Rect> = bounding_boxes
        .iter()
        .map(|bb| bb.roi.shrink(shrink_factor))
        .collect();

    let mut dropped = 0usize;
    for lp in lidar_points {
        let Some(pt) = chain.project(lp) else {
            dropped += 1;
            continue;
        };
        // pixel coordinates truncate toward zero, like the shrunk bounds
        let enclosing = enclosing_boxes(&shrunk, pt.x as i32, pt.y as i32);
        if let [only] = enclosing.as_slice() {
            bounding_boxes[*only].lidar_points.push(*lp);
        } else {
            if enclosing.len() > 1 {
                trace!(
                    "point ({:.3}, {:.3}) is inside {} boxes, dropped",
                    lp.x,
                    lp.y,
                    enclosing.len()
                );
            }
            dropped += 1;
        }
    }
    debug!(
        "clustered {} of {} lidar points into {} boxes",
        lidar_points.len() - dropped,
        lidar_points.len(),
        bounding_boxes.len()
    );
    Ok(())
}
