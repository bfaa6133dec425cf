use crate::error::{FusionError, Result};
use crate::types::LidarPoint;

/// Median of the x coordinates, taken as the element at rank `n / 2`.
///
/// For an even count this is the upper of the two middle values, not their
/// average; the lidar TTC depends on this convention.
pub fn median_x(lidar_points: &[LidarPoint]) -> Result<f64> {
    if lidar_points.is_empty() {
        return Err(FusionError::EmptyInput("median_x"));
    }
    let mut xs: Vec<f64> = lidar_points.iter().map(|lp| lp.x).collect();
    let mid = xs.len() / 2;
    let (_, m, _) = xs.select_nth_unstable_by(mid, f64::total_cmp);
    Ok(*m)
}

pub fn mean_x(lidar_points: &[LidarPoint]) -> Result<f64> {
    if lidar_points.is_empty() {
        return Err(FusionError::EmptyInput("mean_x"));
    }
    Ok(lidar_points.iter().map(|lp| lp.x).sum::<f64>() / lidar_points.len() as f64)
}

/// Median that averages the two middle values for an even count.
///
/// Sorts `values` in place. `None` for an empty slice.
pub fn median_paired(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}
