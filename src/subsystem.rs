//! Join of subsystem exports onto the family registry.
//!
//! A subsystem row is attached to a family through the **first** feature of its feature list only.
//! If that feature is unknown the row is skipped, even when a later feature would resolve.

use std::path::Path;

use serde::Serialize;

use crate::errors::Result;
use crate::featureindex::FeatureIndex;
use crate::records::{read_subsystem_file, SubsystemRow};
use crate::registry::{FamilyRegistry, SubsystemInfo};
use crate::utils::files::files_with_extension;
use crate::utils::parameters::SubsystemParams;

/// separator of the feature list in a subsystem row
const FEATURE_SEPARATOR: char = ',';

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct JoinStats {
    /// rows read
    pub processed: usize,
    /// rows whose lead feature is not in the index
    pub skipped: usize,
}

impl JoinStats {
    pub fn merge(&mut self, other: &JoinStats) {
        self.processed += other.processed;
        self.skipped += other.skipped;
    }

    pub fn percentage_skipped(&self) -> f64 {
        if self.processed == 0 {
            return 0.;
        }
        self.skipped as f64 * 100. / self.processed as f64
    }
} // end of impl JoinStats

/// first feature of a comma separated list
pub fn lead_feature(features: &str) -> Option<&str> {
    features
        .split(FEATURE_SEPARATOR)
        .next()
        .map(|f| f.trim())
        .filter(|f| !f.is_empty())
}

//====================================================================

/// merges subsystem data onto a registry, keeping statistics by source file
pub struct SubsystemJoiner<'a> {
    index: &'a FeatureIndex,
    per_source: Vec<(String, JoinStats)>,
    total: JoinStats,
}

impl<'a> SubsystemJoiner<'a> {
    pub fn new(index: &'a FeatureIndex) -> Self {
        SubsystemJoiner {
            index,
            per_source: Vec::new(),
            total: JoinStats::default(),
        }
    }

    /// join rows of one source. Later sources overwrite what earlier ones set on a family.
    pub fn join_rows(&mut self, source_name: &str, rows: &[SubsystemRow], registry: &mut FamilyRegistry) -> JoinStats {
        let index = self.index;
        let mut stats = JoinStats::default();
        for row in rows {
            stats.processed += 1;
            let fig = match lead_feature(&row.features).and_then(|f| index.get_fig(f)) {
                Some(fig) => fig,
                None => {
                    log::trace!("{} : no family for features {}", source_name, row.features);
                    stats.skipped += 1;
                    continue;
                }
            };
            let info = SubsystemInfo {
                category: row.category.clone(),
                subcategory: row.subcategory.clone(),
                subsystem: row.subsystem.clone(),
                role: row.role.clone(),
            };
            registry.entry(fig).set_subsystem(info);
        }
        log::info!(
            "{} : processed {}, skipped {} ({:.2} %)",
            source_name,
            stats.processed,
            stats.skipped,
            stats.percentage_skipped()
        );
        self.total.merge(&stats);
        self.per_source.push((source_name.to_string(), stats));
        stats
    } // end of join_rows

    pub fn join_file(&mut self, path: &Path, params: &SubsystemParams, registry: &mut FamilyRegistry) -> Result<JoinStats> {
        let rows = read_subsystem_file(path, params)?;
        let source_name = path
            .file_name()
            .map(|f| f.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        Ok(self.join_rows(&source_name, &rows, registry))
    }

    /// join all files of a directory with the subsystem extension, in name order
    pub fn join_dir(&mut self, dir: &Path, params: &SubsystemParams, registry: &mut FamilyRegistry) -> Result<JoinStats> {
        let paths = files_with_extension(dir, &params.extension)?;
        log::info!("join_dir {:?}, found {} subsystem files", dir, paths.len());
        for path in &paths {
            self.join_file(path, params, registry)?;
        }
        log::info!(
            "subsystem join, total processed {}, skipped {} ({:.2} %)",
            self.total.processed,
            self.total.skipped,
            self.total.percentage_skipped()
        );
        Ok(self.total)
    } // end of join_dir

    pub fn get_per_source(&self) -> &[(String, JoinStats)] {
        &self.per_source
    }

    pub fn get_total(&self) -> &JoinStats {
        &self.total
    }
} // end of impl SubsystemJoiner

// end of mod tests
