use std::collections::{BTreeMap, HashMap};

use log::{debug, trace};

use crate::clustering::keypoints::keypoint_at;
use crate::error::Result;
use crate::types::{BoundingBox, DataFrame, Keypoint, KeypointMatch};

/// Per-box vote tally over candidate box ids, kept in first-seen order.
///
/// Cleared and reused between boxes.
#[derive(Debug, Default)]
pub struct VoteCounter {
    counts: Vec<(i32, usize)>,
}

impl VoteCounter {
    pub fn new() -> VoteCounter {
        VoteCounter::default()
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }

    pub fn vote(&mut self, candidate: i32) {
        match self.counts.iter_mut().find(|(id, _)| *id == candidate) {
            Some((_, n)) => *n += 1,
            None => self.counts.push((candidate, 1)),
        }
    }

    pub fn count(&self, candidate: i32) -> usize {
        self.counts
            .iter()
            .find(|(id, _)| *id == candidate)
            .map_or(0, |(_, n)| *n)
    }

    /// Candidate with the most votes; the earliest one wins a tie.
    pub fn best(&self) -> Option<(i32, usize)> {
        let mut best: Option<(i32, usize)> = None;
        for &(id, n) in &self.counts {
            if best.is_none_or(|(_, max)| n > max) {
                best = Some((id, n));
            }
        }
        best
    }
}

fn enclosing_box_ids(boxes: &[BoundingBox], kp: &Keypoint) -> Vec<i32> {
    boxes
        .iter()
        .filter(|bb| bb.roi.contains_keypoint(kp))
        .map(|bb| bb.box_id)
        .collect()
}

/// Finds, for each previous box, the current box most keypoint matches agree on.
///
/// Every match votes for all (previous box, current box) pairs that contain
/// its two keypoints. Previous boxes that collect no vote are absent from
/// the result.
pub fn match_bounding_boxes(
    matches: &[KeypointMatch],
    prev_frame: &DataFrame,
    curr_frame: &DataFrame,
) -> Result<BTreeMap<i32, i32>> {
    let mut votes: HashMap<i32, Vec<i32>> = HashMap::new();
    for m in matches {
        let query_ids = enclosing_box_ids(
            &prev_frame.bounding_boxes,
            keypoint_at(&prev_frame.keypoints, m.query_idx)?,
        );
        let train_ids = enclosing_box_ids(
            &curr_frame.bounding_boxes,
            keypoint_at(&curr_frame.keypoints, m.train_idx)?,
        );
        if query_ids.is_empty() || train_ids.is_empty() {
            continue;
        }
        for &qid in &query_ids {
            votes.entry(qid).or_default().extend_from_slice(&train_ids);
        }
    }

    let mut bb_best_matches = BTreeMap::new();
    let mut counter = VoteCounter::new();
    for bb in &prev_frame.bounding_boxes {
        counter.clear();
        if let Some(candidates) = votes.get(&bb.box_id) {
            for &tid in candidates {
                counter.vote(tid);
            }
        }
        if let Some((best_id, n)) = counter.best() {
            trace!("best match for box {} is box {} ({} votes)", bb.box_id, best_id, n);
            bb_best_matches.insert(bb.box_id, best_id);
        }
    }
    debug!("bounding box matches: {:?}", bb_best_matches);
    Ok(bb_best_matches)
}
