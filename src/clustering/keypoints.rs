use log::debug;

use crate::error::{FusionError, Result};
use crate::types::{BoundingBox, Keypoint, KeypointMatch};

/// Matches whose descriptor distance differs from the box mean by more than
/// this are dropped.
pub const MATCH_DISTANCE_THRESHOLD: f64 = 130.0;

pub(crate) fn keypoint_at(keypoints: &[Keypoint], index: usize) -> Result<&Keypoint> {
    keypoints
        .get(index)
        .ok_or(FusionError::KeypointIndexOutOfRange {
            index,
            len: keypoints.len(),
        })
}

fn mean_distance(matches: &[KeypointMatch]) -> f64 {
    matches.iter().map(|m| m.distance).sum::<f64>() / matches.len() as f64
}

/// Associates a bounding box with the keypoint matches whose current keypoint it contains.
///
/// Matches far from the mean descriptor distance are pruned, and the current
/// keypoints of the survivors are appended to `bounding_box.keypoints`.
/// A box without matches ends up with empty lists; that is not an error.
/// On error the box is left untouched.
pub fn cluster_kpt_matches_with_roi(
    bounding_box: &mut BoundingBox,
    kpts_curr: &[Keypoint],
    kpt_matches: &[KeypointMatch],
) -> Result<()> {
    let mut box_matches = bounding_box.kpt_matches.clone();
    for m in kpt_matches {
        if bounding_box
            .roi
            .contains_keypoint(keypoint_at(kpts_curr, m.train_idx)?)
        {
            box_matches.push(*m);
        }
    }
    debug!(
        "box {}: selected {} keypoint matches",
        bounding_box.box_id,
        box_matches.len()
    );

    // NaN for an empty list, which keeps nothing
    let mean = mean_distance(&box_matches);
    box_matches.retain(|m| (mean - m.distance).abs() <= MATCH_DISTANCE_THRESHOLD);
    debug!(
        "box {}: {} keypoint matches after filtering (mean distance {:.3})",
        bounding_box.box_id,
        box_matches.len(),
        mean
    );

    let box_keypoints = box_matches
        .iter()
        .map(|m| keypoint_at(kpts_curr, m.train_idx).copied())
        .collect::<Result<Vec<_>>>()?;
    bounding_box.kpt_matches = box_matches;
    bounding_box.keypoints.extend(box_keypoints);
    Ok(())
}
