use lidar_camera_ttc::stats::{mean_x, median_paired, median_x};
use lidar_camera_ttc::{FusionError, LidarPoint};

fn points_at(xs: &[f64]) -> Vec<LidarPoint> {
    xs.iter().map(|&x| LidarPoint::new(x, 0.0, 0.0, 0.0)).collect()
}

#[test]
fn test_median_x_odd() {
    assert_eq!(median_x(&points_at(&[1.0, 2.0, 3.0])).unwrap(), 2.0);
    assert_eq!(median_x(&points_at(&[3.0, 1.0, 2.0])).unwrap(), 2.0);
}

#[test]
fn test_median_x_even_takes_upper_middle() {
    // rank n / 2, not the average 2.5
    assert_eq!(median_x(&points_at(&[1.0, 2.0, 3.0, 4.0])).unwrap(), 3.0);
    assert_eq!(median_x(&points_at(&[4.0, 1.0, 3.0, 2.0])).unwrap(), 3.0);
    assert_eq!(median_x(&points_at(&[7.5])).unwrap(), 7.5);
}

#[test]
fn test_mean_x() {
    let mean = mean_x(&points_at(&[1.0, 2.0, 3.0, 4.0])).unwrap();
    assert!((mean - 2.5).abs() < 1e-12);
}

#[test]
fn test_empty_input() {
    assert!(matches!(median_x(&[]), Err(FusionError::EmptyInput(_))));
    assert!(matches!(mean_x(&[]), Err(FusionError::EmptyInput(_))));
}

#[test]
fn test_median_paired() {
    assert_eq!(median_paired(&mut [3.0, 1.0, 2.0]), Some(2.0));
    assert_eq!(median_paired(&mut [4.0, 1.0, 3.0, 2.0]), Some(2.5));
    assert_eq!(median_paired(&mut []), None);
}
