use log::{debug, info};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;

use crate::clustering::{cluster_kpt_matches_with_roi, cluster_lidar_with_roi};
use crate::config::FusionConfig;
use crate::error::Result;
use crate::io::{ObjectSummary, summarize_objects};
use crate::matching::match_bounding_boxes;
use crate::projection::ProjectionChain;
use crate::ransac::remove_outliers;
use crate::ttc::{compute_ttc_camera, compute_ttc_lidar};
use crate::types::DataFrame;

/// TTC estimates for one object tracked over a frame pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectTtc {
    pub prev_box_id: i32,
    pub curr_box_id: i32,
    pub ttc_lidar: f64,
    pub ttc_camera: f64,
    pub lidar_points: usize,
    pub kpt_matches: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct FramePairReport {
    pub frame_index: usize,
    pub objects: Vec<ObjectTtc>,
    pub summaries: Vec<ObjectSummary>,
}

pub struct FusionPipeline {
    config: FusionConfig,
    chain: ProjectionChain,
    seed: u64,
}

impl FusionPipeline {
    pub fn new(config: FusionConfig) -> Result<FusionPipeline> {
        config.validate()?;
        let chain = ProjectionChain::from_calibration(&config.calibration);
        let seed = config.resolve_seed();
        Ok(FusionPipeline {
            config,
            chain,
            seed,
        })
    }

    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Assigns the frame's lidar points to its boxes and removes outliers per box.
    ///
    /// Boxes holding fewer than two points are not filtered.
    pub fn prepare_frame(&self, frame: &mut DataFrame) -> Result<()> {
        cluster_lidar_with_roi(
            &mut frame.bounding_boxes,
            &frame.lidar_points,
            self.config.shrink_factor,
            &self.chain,
        )?;

        let max_iterations = self.config.ransac_max_iterations;
        let distance_threshold = self.config.ransac_distance_threshold;
        frame
            .bounding_boxes
            .par_iter_mut()
            .filter(|bb| bb.lidar_points.len() >= 2)
            .try_for_each(|bb| {
                let mut rng = ChaCha8Rng::seed_from_u64(self.seed ^ bb.box_id as u64);
                bb.lidar_points =
                    remove_outliers(&bb.lidar_points, max_iterations, distance_threshold, &mut rng)?;
                Ok(())
            })
    }

    /// Associates keypoint matches with the current boxes, pairs boxes across
    /// the two frames and estimates both TTCs for every pair.
    ///
    /// The keypoint matches and keypoints of the current boxes are rebuilt on
    /// every call, so processing the same pair again gives the same result.
    pub fn process_pair(&self, prev: &DataFrame, curr: &mut DataFrame) -> Result<Vec<ObjectTtc>> {
        let kpts_curr = &curr.keypoints;
        let kpt_matches = &curr.kpt_matches;
        curr.bounding_boxes
            .par_iter_mut()
            .try_for_each(|bb| {
                bb.kpt_matches.clear();
                bb.keypoints.clear();
                cluster_kpt_matches_with_roi(bb, kpts_curr, kpt_matches)
            })?;

        curr.bb_matches = match_bounding_boxes(&curr.kpt_matches, prev, curr)?;

        let mut results = Vec::with_capacity(curr.bb_matches.len());
        for (&prev_id, &curr_id) in &curr.bb_matches {
            let (Some(prev_bb), Some(curr_bb)) = (prev.find_box(prev_id), curr.find_box(curr_id))
            else {
                continue;
            };

            let ttc_lidar = if prev_bb.lidar_points.is_empty() || curr_bb.lidar_points.is_empty()
            {
                debug!("box pair {} -> {} has no lidar points", prev_id, curr_id);
                f64::NAN
            } else {
                compute_ttc_lidar(
                    &prev_bb.lidar_points,
                    &curr_bb.lidar_points,
                    self.config.frame_rate,
                )?
            };
            let ttc_camera = compute_ttc_camera(
                &prev.keypoints,
                &curr.keypoints,
                &curr_bb.kpt_matches,
                self.config.frame_rate,
            )?;

            results.push(ObjectTtc {
                prev_box_id: prev_id,
                curr_box_id: curr_id,
                ttc_lidar,
                ttc_camera,
                lidar_points: curr_bb.lidar_points.len(),
                kpt_matches: curr_bb.kpt_matches.len(),
            });
        }
        Ok(results)
    }

    /// Prepares every frame and processes each consecutive pair.
    pub fn run_sequence(&self, frames: &mut [DataFrame]) -> Result<Vec<FramePairReport>> {
        for frame in frames.iter_mut() {
            self.prepare_frame(frame)?;
        }
        let mut reports = Vec::with_capacity(frames.len().saturating_sub(1));
        for frame_index in 1..frames.len() {
            let (before, after) = frames.split_at_mut(frame_index);
            let prev = &before[frame_index - 1];
            let curr = &mut after[0];
            let objects = self.process_pair(prev, curr)?;
            for o in &objects {
                info!(
                    "frame {}: box {} -> {}: TTC lidar {:.3} s, TTC camera {:.3} s",
                    frame_index, o.prev_box_id, o.curr_box_id, o.ttc_lidar, o.ttc_camera
                );
            }
            reports.push(FramePairReport {
                frame_index,
                objects,
                summaries: summarize_objects(&curr.bounding_boxes),
            });
        }
        Ok(reports)
    }
}
