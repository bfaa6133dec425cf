use nalgebra as na;
use serde::{Deserialize, Serialize};

use crate::error::{FusionError, Result, check_frame_rate, check_shrink_factor};

/// Lidar to rectified camera calibration, all matrices row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    /// 3x4 projection of the rectified camera
    pub p_rect: [f64; 12],
    /// 4x4 rectifying rotation
    pub r_rect: [f64; 16],
    /// 4x4 lidar to camera extrinsic
    pub rt: [f64; 16],
}

impl Default for Calibration {
    /// KITTI drive 0005 (2011_09_26), camera 00.
    fn default() -> Self {
        Self {
            p_rect: [
                7.215377e+02, 0.0, 6.095593e+02, 0.0, //
                0.0, 7.215377e+02, 1.728540e+02, 0.0, //
                0.0, 0.0, 1.0, 0.0,
            ],
            r_rect: [
                9.999239e-01, 9.837760e-03, -7.445048e-03, 0.0, //
                -9.869795e-03, 9.999421e-01, -4.278459e-03, 0.0, //
                7.402527e-03, 4.351614e-03, 9.999631e-01, 0.0, //
                0.0, 0.0, 0.0, 1.0,
            ],
            rt: [
                7.533745e-03, -9.999714e-01, -6.166020e-04, -4.069766e-03, //
                1.480249e-02, 7.280733e-04, -9.998902e-01, -7.631618e-02, //
                9.998621e-01, 7.523790e-03, 1.480755e-02, -2.717806e-01, //
                0.0, 0.0, 0.0, 1.0,
            ],
        }
    }
}

impl Calibration {
    pub fn p_rect(&self) -> na::Matrix3x4<f64> {
        na::Matrix3x4::from_row_slice(&self.p_rect)
    }
    pub fn r_rect(&self) -> na::Matrix4<f64> {
        na::Matrix4::from_row_slice(&self.r_rect)
    }
    pub fn rt(&self) -> na::Matrix4<f64> {
        na::Matrix4::from_row_slice(&self.rt)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    pub shrink_factor: f64,
    pub frame_rate: f64,
    pub ransac_max_iterations: usize,
    pub ransac_distance_threshold: f64,
    /// `None` seeds the outlier filter from the clock.
    pub seed: Option<u64>,
    pub calibration: Calibration,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            shrink_factor: 0.10,
            frame_rate: 10.0,
            ransac_max_iterations: 100,
            ransac_distance_threshold: 0.1,
            seed: None,
            calibration: Calibration::default(),
        }
    }
}

impl FusionConfig {
    pub fn validate(&self) -> Result<()> {
        check_frame_rate(self.frame_rate)?;
        check_shrink_factor(self.shrink_factor)?;
        if self.ransac_max_iterations == 0 {
            return Err(FusionError::InvalidConfig(
                "ransac_max_iterations must be at least 1".to_string(),
            ));
        }
        if !(self.ransac_distance_threshold.is_finite() && self.ransac_distance_threshold > 0.0) {
            return Err(FusionError::InvalidConfig(format!(
                "ransac_distance_threshold must be positive, got {}",
                self.ransac_distance_threshold
            )));
        }
        if self.calibration.p_rect.iter().any(|v| !v.is_finite())
            || self.calibration.r_rect.iter().any(|v| !v.is_finite())
            || self.calibration.rt.iter().any(|v| !v.is_finite())
        {
            return Err(FusionError::InvalidConfig(
                "calibration contains non-finite values".to_string(),
            ));
        }
        Ok(())
    }

    /// Seed actually used for this run.
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            let nanos = time::OffsetDateTime::now_utc().unix_timestamp_nanos();
            log::debug!("no seed configured, using clock {}", nanos);
            nanos as u64
        })
    }
}
