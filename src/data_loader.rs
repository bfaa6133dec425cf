use std::path::{Path, PathBuf};

use glob::glob;
use indicatif::ParallelProgressIterator;
use rayon::prelude::*;

use crate::error::{FusionError, Result};
use crate::io::object_from_json;
use crate::types::DataFrame;

fn json_filter(rp: glob::GlobResult) -> Option<PathBuf> {
    match rp {
        Ok(p) if p.extension().is_some_and(|ext| ext == "json") => Some(p),
        _ => None,
    }
}

/// Lists the frame files of a folder in name order, skipping `config.json`.
pub fn frame_paths<P: AsRef<Path>>(folder: P) -> Result<Vec<PathBuf>> {
    let folder = folder.as_ref();
    if !folder.is_dir() {
        return Err(FusionError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} is not a directory", folder.display()),
        )));
    }
    let pattern = format!("{}/*.json", folder.display());
    let mut paths: Vec<PathBuf> = glob(&pattern)?
        .filter_map(json_filter)
        .filter(|p| p.file_name().is_some_and(|n| n != "config.json"))
        .collect();
    paths.sort();
    Ok(paths)
}

/// Loads every frame of a folder, parsing files in parallel.
///
/// Frames are returned in file name order.
pub fn load_frames<P: AsRef<Path>>(folder: P) -> Result<Vec<DataFrame>> {
    let paths = frame_paths(folder)?;
    log::trace!("loading {} frames", paths.len());
    paths
        .par_iter()
        .progress_count(paths.len() as u64)
        .map(object_from_json::<DataFrame, _>)
        .collect()
}
