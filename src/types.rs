use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single lidar return in sensor coordinates (x forward, y left, z up).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LidarPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// reflectivity
    #[serde(default)]
    pub r: f32,
}

impl LidarPoint {
    pub fn new(x: f64, y: f64, z: f64, r: f32) -> LidarPoint {
        LidarPoint { x, y, z, r }
    }
}

/// A detected image keypoint. Its identity is its index in the owning frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub pt: Vec2,
    #[serde(default)]
    pub size: f32,
    #[serde(default)]
    pub response: f32,
    #[serde(default)]
    pub octave: i32,
}

impl Keypoint {
    pub fn new(x: f32, y: f32) -> Keypoint {
        Keypoint {
            pt: Vec2::new(x, y),
            size: 1.0,
            response: 0.0,
            octave: 0,
        }
    }
}

/// Descriptor match between keypoint `query_idx` of the previous frame and
/// keypoint `train_idx` of the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeypointMatch {
    pub query_idx: usize,
    pub train_idx: usize,
    /// descriptor dissimilarity, not a spatial distance
    pub distance: f64,
}

impl KeypointMatch {
    pub fn new(query_idx: usize, train_idx: usize, distance: f64) -> KeypointMatch {
        KeypointMatch {
            query_idx,
            train_idx,
            distance,
        }
    }
}

/// Axis aligned pixel rectangle, top left corner plus size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Rect {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    /// Half-open containment: left/top edges are inside, right/bottom are not.
    pub fn contains(&self, px: f64, py: f64) -> bool {
        let x = self.x as f64;
        let y = self.y as f64;
        x <= px && px < x + self.width as f64 && y <= py && py < y + self.height as f64
    }

    pub fn contains_keypoint(&self, kp: &Keypoint) -> bool {
        self.contains(kp.pt.x as f64, kp.pt.y as f64)
    }

    /// Whole pixel containment, half-open like [`Rect::contains`].
    pub fn contains_pixel(&self, u: i32, v: i32) -> bool {
        self.x <= u && u < self.x + self.width && self.y <= v && v < self.y + self.height
    }

    /// Shrinks the rectangle by `shrink_factor` of its size, keeping it centered.
    ///
    /// Every bound is truncated toward zero to whole pixels.
    pub fn shrink(&self, shrink_factor: f64) -> Rect {
        let w = self.width as f64;
        let h = self.height as f64;
        Rect {
            x: (self.x as f64 + shrink_factor * w / 2.0) as i32,
            y: (self.y as f64 + shrink_factor * h / 2.0) as i32,
            width: (w * (1.0 - shrink_factor)) as i32,
            height: (h * (1.0 - shrink_factor)) as i32,
        }
    }
}

/// An object region produced by the detector, plus everything associated to it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub box_id: i32,
    pub roi: Rect,
    #[serde(default)]
    pub class_id: i32,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub lidar_points: Vec<LidarPoint>,
    #[serde(default)]
    pub keypoints: Vec<Keypoint>,
    #[serde(default)]
    pub kpt_matches: Vec<KeypointMatch>,
}

impl BoundingBox {
    pub fn new(box_id: i32, roi: Rect) -> BoundingBox {
        BoundingBox {
            box_id,
            roi,
            ..Default::default()
        }
    }
}

/// Everything known about a single time step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataFrame {
    #[serde(default)]
    pub keypoints: Vec<Keypoint>,
    #[serde(default)]
    pub lidar_points: Vec<LidarPoint>,
    #[serde(default)]
    pub bounding_boxes: Vec<BoundingBox>,
    /// matches from the previous frame's keypoints to this frame's keypoints
    #[serde(default)]
    pub kpt_matches: Vec<KeypointMatch>,
    /// previous box id -> current box id, filled by the pipeline
    #[serde(default)]
    pub bb_matches: BTreeMap<i32, i32>,
}

impl DataFrame {
    pub fn find_box(&self, box_id: i32) -> Option<&BoundingBox> {
        self.bounding_boxes.iter().find(|bb| bb.box_id == box_id)
    }

    pub fn find_box_mut(&mut self, box_id: i32) -> Option<&mut BoundingBox> {
        self.bounding_boxes.iter_mut().find(|bb| bb.box_id == box_id)
    }
}
