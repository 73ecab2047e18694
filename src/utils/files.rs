//! This file contains directory exploration, output directory creation
//! and renaming of subsystem exports.

use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{FigsetError, Result};
use crate::records::read_subsystem_file;
use crate::subsystem::lead_feature;
use crate::utils::parameters::SubsystemParams;

/// returns true if path is a file whose extension (with leading dot) is extension
pub fn has_extension(path: &Path, extension: &str) -> bool {
    let wanted = extension.trim_start_matches('.');
    path.is_file()
        && path
            .extension()
            .map(|e| e.to_string_lossy() == wanted)
            .unwrap_or(false)
}

/// files (not recursive) of dir with given extension, sorted by name
pub fn files_with_extension(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::<PathBuf>::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if has_extension(&path, extension) {
            paths.push(path);
        } else {
            log::trace!("skipping {:?}", path);
        }
    }
    paths.sort();
    log::debug!("files_with_extension {:?} {} : {}", dir, extension, paths.len());
    Ok(paths)
} // end of files_with_extension

/// creates the output directory if it does not exist.
/// fails if the path exists and is not a directory
pub fn create_output_dir(path: &Path) -> Result<()> {
    if path.exists() {
        if !path.is_dir() {
            log::error!("output {:?} exists but is not a directory", path);
            return Err(FigsetError::NotADirectory(path.display().to_string()));
        }
        return Ok(());
    }
    log::info!("creating output directory {:?}", path);
    fs::create_dir_all(path)?;
    Ok(())
} // end of create_output_dir

/// genome id of a fig feature id : fig|6666666.123.peg.7 gives 6666666.123
pub fn parse_fig(feature_id: &str) -> &str {
    let stripped = feature_id.trim().trim_start_matches("fig|");
    match stripped.find(".peg.") {
        Some(pos) => &stripped[..pos],
        None => stripped,
    }
}

/// Renames each subsystem export of dir after the genome of the first feature of its first row,
/// as genome_features.tsv. Nothing is renamed unless simulate is false.
/// Returns the (old, new) couples.
pub fn rename_subsystem_files(dir: &Path, params: &SubsystemParams, simulate: bool) -> Result<Vec<(PathBuf, PathBuf)>> {
    let mut renamed = Vec::<(PathBuf, PathBuf)>::new();
    for path in files_with_extension(dir, &params.extension)? {
        let rows = read_subsystem_file(&path, params)?;
        let first = match rows.first() {
            Some(row) => row,
            None => {
                log::info!("no data for {:?}, continuing with next file", path);
                continue;
            }
        };
        let feature = match lead_feature(&first.features) {
            Some(feature) => feature,
            None => {
                log::warn!("{:?} has no feature in its first row", path);
                continue;
            }
        };
        let new_name = format!(
            "{}_features.{}",
            parse_fig(feature),
            params.extension.trim_start_matches('.')
        );
        let new_path = path.with_file_name(new_name);
        log::info!("rename {:?} to {:?}", path, new_path);
        if !simulate {
            fs::rename(&path, &new_path)?;
        }
        renamed.push((path, new_path));
    }
    Ok(renamed)
} // end of rename_subsystem_files

// end of mod tests
