use lidar_camera_ttc::clustering::cluster_lidar_with_roi;
use lidar_camera_ttc::projection::ProjectionChain;
use lidar_camera_ttc::{BoundingBox, Calibration, FusionError, LidarPoint, Rect};
use nalgebra as na;

/// Maps lidar (x, y, z) straight to pixel (x, y).
fn pixel_chain() -> ProjectionChain {
    ProjectionChain {
        projection: na::Matrix3x4::new(
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ),
    }
}

#[test]
fn test_project_kitti_point_ahead() {
    let chain = ProjectionChain::from_calibration(&Calibration::default());
    // straight ahead on the lidar axis lands close to the principal point
    let p = chain.project(&LidarPoint::new(10.0, 0.0, 0.0, 0.5)).unwrap();
    assert!((p.x - 609.5593).abs() < 20.0, "u = {}", p.x);
    assert!((p.y - 172.854).abs() < 30.0, "v = {}", p.y);

    // a point to the left (positive y) projects left of center
    let left = chain.project(&LidarPoint::new(10.0, 2.0, 0.0, 0.5)).unwrap();
    assert!(left.x < p.x);
}

#[test]
fn test_project_composes_chain() {
    let p_rect = na::Matrix3x4::new(
        2.0, 0.0, 0.0, 0.0, //
        0.0, 2.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0,
    );
    let r_rect = na::Matrix4::identity();
    let mut rt = na::Matrix4::identity();
    rt[(2, 3)] = 1.0;
    let chain = ProjectionChain::new(&p_rect, &r_rect, &rt);
    let p = chain.project(&LidarPoint::new(3.0, 4.0, 1.0, 0.0)).unwrap();
    // (2*3, 2*4) / (1 + 1)
    assert!((p.x - 3.0).abs() < 1e-12);
    assert!((p.y - 4.0).abs() < 1e-12);
}

#[test]
fn test_project_behind_camera() {
    let chain = ProjectionChain::from_calibration(&Calibration::default());
    assert!(chain.project(&LidarPoint::new(-5.0, 0.0, 0.0, 0.0)).is_none());
}

#[test]
fn test_cluster_single_box() {
    let mut boxes = vec![
        BoundingBox::new(0, Rect::new(0, 0, 100, 100)),
        BoundingBox::new(1, Rect::new(200, 0, 100, 100)),
    ];
    let points = vec![
        LidarPoint::new(50.0, 50.0, 0.0, 0.1),
        LidarPoint::new(250.0, 40.0, 0.0, 0.2),
        LidarPoint::new(260.0, 60.0, 0.0, 0.3),
        // in no box
        LidarPoint::new(150.0, 50.0, 0.0, 0.4),
    ];
    cluster_lidar_with_roi(&mut boxes, &points, 0.0, &pixel_chain()).unwrap();
    assert_eq!(boxes[0].lidar_points, vec![points[0]]);
    assert_eq!(boxes[1].lidar_points, vec![points[1], points[2]]);
}

#[test]
fn test_cluster_drops_ambiguous_points() {
    let mut boxes = vec![
        BoundingBox::new(0, Rect::new(0, 0, 100, 100)),
        BoundingBox::new(1, Rect::new(50, 0, 100, 100)),
    ];
    let points = vec![
        // only box 0
        LidarPoint::new(20.0, 50.0, 0.0, 0.0),
        // overlap of both boxes
        LidarPoint::new(75.0, 50.0, 0.0, 0.0),
        // only box 1
        LidarPoint::new(130.0, 50.0, 0.0, 0.0),
    ];
    cluster_lidar_with_roi(&mut boxes, &points, 0.0, &pixel_chain()).unwrap();
    assert_eq!(boxes[0].lidar_points, vec![points[0]]);
    assert_eq!(boxes[1].lidar_points, vec![points[2]]);
}

#[test]
fn test_cluster_shrink_resolves_overlap() {
    // boxes overlap on [90, 100), shrinking by 20% removes the overlap
    let mut boxes = vec![
        BoundingBox::new(0, Rect::new(0, 0, 100, 100)),
        BoundingBox::new(1, Rect::new(90, 0, 100, 100)),
    ];
    let edge = LidarPoint::new(95.0, 50.0, 0.0, 0.0);
    let center = LidarPoint::new(50.0, 50.0, 0.0, 0.0);
    cluster_lidar_with_roi(&mut boxes, &[edge, center], 0.2, &pixel_chain()).unwrap();
    assert_eq!(boxes[0].lidar_points, vec![center]);
    assert!(boxes[1].lidar_points.is_empty());
}

#[test]
fn test_shrunk_rect_bounds() {
    // y = 22.5 truncates to a whole pixel
    let r = Rect::new(10, 20, 100, 50).shrink(0.1);
    assert_eq!(r, Rect::new(15, 22, 90, 45));
    let r = Rect::new(0, 0, 100, 100).shrink(0.15);
    assert_eq!(r, Rect::new(7, 7, 85, 85));
    assert!(r.contains_pixel(7, 7));
    assert!(!r.contains_pixel(92, 50));
}

#[test]
fn test_cluster_truncates_to_whole_pixels() {
    // the shrunk box starts at 7.5 -> 7 and the point's 7.2 -> 7
    let mut boxes = vec![BoundingBox::new(0, Rect::new(0, 0, 100, 100))];
    let inside = LidarPoint::new(7.2, 50.0, 0.0, 0.0);
    // 92.4 -> 92 is the first column past 7 + 85
    let outside = LidarPoint::new(92.4, 50.0, 0.0, 0.0);
    let last_column = LidarPoint::new(91.9, 50.0, 0.0, 0.0);
    cluster_lidar_with_roi(
        &mut boxes,
        &[inside, outside, last_column],
        0.15,
        &pixel_chain(),
    )
    .unwrap();
    assert_eq!(boxes[0].lidar_points, vec![inside, last_column]);
}

#[test]
fn test_cluster_invalid_shrink_factor() {
    let mut boxes = vec![BoundingBox::new(0, Rect::new(0, 0, 10, 10))];
    let result = cluster_lidar_with_roi(&mut boxes, &[], 1.0, &pixel_chain());
    assert!(matches!(result, Err(FusionError::InvalidShrinkFactor(_))));
    let result = cluster_lidar_with_roi(&mut boxes, &[], -0.1, &pixel_chain());
    assert!(matches!(result, Err(FusionError::InvalidShrinkFactor(_))));
}
