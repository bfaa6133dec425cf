use nalgebra as na;

use crate::config::Calibration;
use crate::types::LidarPoint;

/// Lidar to pixel transform `P_rect * R_rect * RT`, composed once.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionChain {
    pub projection: na::Matrix3x4<f64>,
}

impl ProjectionChain {
    pub fn new(
        p_rect: &na::Matrix3x4<f64>,
        r_rect: &na::Matrix4<f64>,
        rt: &na::Matrix4<f64>,
    ) -> ProjectionChain {
        ProjectionChain {
            projection: p_rect * r_rect * rt,
        }
    }

    pub fn from_calibration(calibration: &Calibration) -> ProjectionChain {
        Self::new(
            &calibration.p_rect(),
            &calibration.r_rect(),
            &calibration.rt(),
        )
    }

    pub fn project_one(&self, pt: &na::Vector3<f64>) -> Option<na::Vector2<f64>> {
        let y = self.projection * pt.push(1.0);
        if y[2] <= 0.0 {
            return None;
        }
        Some(na::Vector2::new(y[0] / y[2], y[1] / y[2]))
    }

    /// Pixel position of a lidar point, `None` if it is not in front of the camera.
    pub fn project(&self, lp: &LidarPoint) -> Option<na::Vector2<f64>> {
        self.project_one(&na::Vector3::new(lp.x, lp.y, lp.z))
    }
}
