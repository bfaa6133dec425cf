use std::io::Write;
use std::path::Path;

use serde::{Serialize, de::DeserializeOwned};

use crate::error::Result;
use crate::pipeline::FramePairReport;
use crate::types::BoundingBox;

/// Serializes an object to a JSON file.
pub fn object_to_json<T: Serialize, P: AsRef<Path>>(output_path: P, object: &T) -> Result<()> {
    let j = serde_json::to_string_pretty(object)?;
    let mut file = std::fs::File::create(output_path)?;
    file.write_all(j.as_bytes())?;
    Ok(())
}

/// Deserializes an object from a JSON file.
pub fn object_from_json<T: DeserializeOwned, P: AsRef<Path>>(file_path: P) -> Result<T> {
    let contents = std::fs::read_to_string(file_path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Bird's eye summary of the lidar points held by one box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectSummary {
    pub box_id: i32,
    pub num_points: usize,
    /// closest distance, `None` without points
    pub x_min: Option<f64>,
    /// lateral extent `y_max - y_min`
    pub y_width: Option<f64>,
}

pub fn summarize_objects(bounding_boxes: &[BoundingBox]) -> Vec<ObjectSummary> {
    bounding_boxes
        .iter()
        .map(|bb| {
            let x_min = bb.lidar_points.iter().map(|lp| lp.x).min_by(f64::total_cmp);
            let y_min = bb.lidar_points.iter().map(|lp| lp.y).min_by(f64::total_cmp);
            let y_max = bb.lidar_points.iter().map(|lp| lp.y).max_by(f64::total_cmp);
            ObjectSummary {
                box_id: bb.box_id,
                num_points: bb.lidar_points.len(),
                x_min,
                y_width: y_min.zip(y_max).map(|(lo, hi)| hi - lo),
            }
        })
        .collect()
}

#[derive(Serialize)]
struct TtcReport<'a> {
    timestamp: String,
    seed: u64,
    frame_pairs: &'a [FramePairReport],
    objects_with_lidar_ttc: usize,
    objects_with_camera_ttc: usize,
}

fn report_timestamp() -> String {
    let now = time::OffsetDateTime::now_local().unwrap_or_else(|_| time::OffsetDateTime::now_utc());
    now.format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| now.unix_timestamp().to_string())
}

/// Writes the per frame pair TTC results as JSON.
///
/// Non-finite TTC values are written as `null`.
pub fn write_report<P: AsRef<Path>>(
    output_path: P,
    seed: u64,
    reports: &[FramePairReport],
) -> Result<()> {
    let count = |f: fn(&crate::pipeline::ObjectTtc) -> f64| {
        reports
            .iter()
            .flat_map(|r| r.objects.iter())
            .filter(|o| f(o).is_finite())
            .count()
    };
    let report = TtcReport {
        timestamp: report_timestamp(),
        seed,
        frame_pairs: reports,
        objects_with_lidar_ttc: count(|o| o.ttc_lidar),
        objects_with_camera_ttc: count(|o| o.ttc_camera),
    };
    object_to_json(output_path, &report)
}

pub fn write_summary<P: AsRef<Path>>(output_path: P, reports: &[FramePairReport]) -> Result<()> {
    let mut s = String::new();
    for r in reports {
        s += format!("frame {}:\n", r.frame_index).as_str();
        for o in &r.objects {
            s += format!(
                "    box {} -> {}: lidar {:.3} s, camera {:.3} s ({} points, {} matches)\n",
                o.prev_box_id, o.curr_box_id, o.ttc_lidar, o.ttc_camera, o.lidar_points, o.kpt_matches
            )
            .as_str();
        }
    }
    std::fs::write(output_path, s)?;
    Ok(())
}
