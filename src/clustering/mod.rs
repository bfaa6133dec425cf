pub mod keypoints;
pub mod lidar;

pub use keypoints::*;
pub use lidar::*;
