pub mod clustering;
pub mod config;
pub mod data_loader;
pub mod error;
pub mod io;
pub mod matching;
pub mod pipeline;
pub mod projection;
pub mod ransac;
pub mod stats;
pub mod synthetic;
pub mod ttc;
pub mod types;

pub use config::{Calibration, FusionConfig};
pub use error::{FusionError, Result};
pub use pipeline::{FramePairReport, FusionPipeline, ObjectTtc};
pub use types::*;
