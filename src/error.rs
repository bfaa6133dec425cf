use thiserror::Error;

#[derive(Debug, Error)]
pub enum FusionError {
    #[error("empty input: {0}")]
    EmptyInput(&'static str),
    #[error("need at least {required} points, got {got}")]
    NotEnoughPoints { required: usize, got: usize },
    #[error("keypoint index {index} out of range for {len} keypoints")]
    KeypointIndexOutOfRange { index: usize, len: usize },
    #[error("frame rate must be finite and positive, got {0}")]
    InvalidFrameRate(f64),
    #[error("shrink factor must be in [0, 1), got {0}")]
    InvalidShrinkFactor(f64),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Pattern(#[from] glob::PatternError),
}

pub type Result<T> = std::result::Result<T, FusionError>;

pub(crate) fn check_frame_rate(frame_rate: f64) -> Result<()> {
    if frame_rate.is_finite() && frame_rate > 0.0 {
        Ok(())
    } else {
        Err(FusionError::InvalidFrameRate(frame_rate))
    }
}

pub(crate) fn check_shrink_factor(shrink_factor: f64) -> Result<()> {
    if (0.0..1.0).contains(&shrink_factor) {
        Ok(())
    } else {
        Err(FusionError::InvalidShrinkFactor(shrink_factor))
    }
}
