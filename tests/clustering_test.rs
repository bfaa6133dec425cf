use lidar_camera_ttc::clustering::{MATCH_DISTANCE_THRESHOLD, cluster_kpt_matches_with_roi};
use lidar_camera_ttc::{BoundingBox, FusionError, Keypoint, KeypointMatch, Rect};

fn roi_box() -> BoundingBox {
    BoundingBox::new(3, Rect::new(100, 100, 50, 50))
}

#[test]
fn test_matches_selected_by_current_keypoint() {
    let kpts_curr = vec![
        Keypoint::new(110.0, 110.0),
        // outside
        Keypoint::new(10.0, 10.0),
        Keypoint::new(149.0, 120.0),
        // right edge is exclusive
        Keypoint::new(150.0, 120.0),
    ];
    let matches = vec![
        KeypointMatch::new(0, 0, 20.0),
        KeypointMatch::new(1, 1, 20.0),
        KeypointMatch::new(2, 2, 30.0),
        KeypointMatch::new(3, 3, 30.0),
    ];
    let mut bb = roi_box();
    cluster_kpt_matches_with_roi(&mut bb, &kpts_curr, &matches).unwrap();
    assert_eq!(bb.kpt_matches, vec![matches[0], matches[2]]);
    assert_eq!(bb.keypoints, vec![kpts_curr[0], kpts_curr[2]]);
}

#[test]
fn test_prune_boundary_is_inclusive() {
    // mean distance is exactly 100, the first match is exactly 130 above it
    let kpts_curr = vec![Keypoint::new(120.0, 120.0); 3];
    let matches = vec![
        KeypointMatch::new(0, 0, 230.0),
        KeypointMatch::new(1, 1, 35.0),
        KeypointMatch::new(2, 2, 35.0),
    ];
    let mut bb = roi_box();
    cluster_kpt_matches_with_roi(&mut bb, &kpts_curr, &matches).unwrap();
    assert_eq!(MATCH_DISTANCE_THRESHOLD, 130.0);
    assert_eq!(bb.kpt_matches.len(), 3);
    assert_eq!(bb.keypoints.len(), 3);
}

#[test]
fn test_prune_removes_far_matches() {
    let kpts_curr = vec![Keypoint::new(120.0, 120.0); 3];
    let matches = vec![
        KeypointMatch::new(0, 0, 35.0),
        KeypointMatch::new(1, 1, 231.0),
        KeypointMatch::new(2, 2, 35.0),
    ];
    let mut bb = roi_box();
    cluster_kpt_matches_with_roi(&mut bb, &kpts_curr, &matches).unwrap();
    // order of the survivors is preserved
    assert_eq!(bb.kpt_matches, vec![matches[0], matches[2]]);
    assert_eq!(bb.keypoints.len(), 2);
}

#[test]
fn test_no_matches_is_not_an_error() {
    let kpts_curr = vec![Keypoint::new(0.0, 0.0)];
    let matches = vec![KeypointMatch::new(0, 0, 10.0)];
    let mut bb = roi_box();
    cluster_kpt_matches_with_roi(&mut bb, &kpts_curr, &matches).unwrap();
    assert!(bb.kpt_matches.is_empty());
    assert!(bb.keypoints.is_empty());

    cluster_kpt_matches_with_roi(&mut bb, &kpts_curr, &[]).unwrap();
    assert!(bb.kpt_matches.is_empty());
}

#[test]
fn test_train_index_out_of_range() {
    let kpts_curr = vec![Keypoint::new(120.0, 120.0)];
    let matches = vec![KeypointMatch::new(0, 5, 10.0)];
    let mut bb = roi_box();
    let result = cluster_kpt_matches_with_roi(&mut bb, &kpts_curr, &matches);
    assert!(matches!(
        result,
        Err(FusionError::KeypointIndexOutOfRange { index: 5, len: 1 })
    ));
}

#[test]
fn test_bad_index_leaves_box_untouched() {
    let kpts_curr = vec![Keypoint::new(120.0, 120.0), Keypoint::new(130.0, 130.0)];
    // the first two are valid and inside the roi, the last one is not
    let matches = vec![
        KeypointMatch::new(0, 0, 10.0),
        KeypointMatch::new(1, 1, 12.0),
        KeypointMatch::new(2, 7, 11.0),
    ];
    let mut bb = roi_box();
    let result = cluster_kpt_matches_with_roi(&mut bb, &kpts_curr, &matches);
    assert!(matches!(
        result,
        Err(FusionError::KeypointIndexOutOfRange { index: 7, len: 2 })
    ));
    assert!(bb.kpt_matches.is_empty());
    assert!(bb.keypoints.is_empty());
}
