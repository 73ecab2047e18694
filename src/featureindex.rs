//! Index from feature id to the family owning it.
//!
//! Built in one pass over the master table. Subsystem exports are keyed by feature,
//! so the index must be complete before any join.

use fxhash::FxHashMap;

use crate::records::MasterRow;
use crate::registry::FamilyRegistry;
use crate::utils::parameters::LIST_SEPARATOR;

/// a feature claimed by more than one family. previous_fig is the first claimant,
/// new_fig the last one, which is the one kept.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ambiguity {
    pub feature_id: String,
    pub previous_fig: String,
    pub new_fig: String,
}

/// split a list field, trimming each element and dropping empty ones
pub fn split_list(field: &str, separator: char) -> Vec<String> {
    field
        .split(separator)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

#[derive(Clone, Debug, Default)]
pub struct FeatureIndex {
    feature_to_fig: FxHashMap<String, String>,
    ambiguities: Vec<Ambiguity>,
    /// position in ambiguities of each ambiguous feature
    ambiguous: FxHashMap<String, usize>,
}

impl FeatureIndex {
    /// builds the index from master rows and records functions, features and contigs
    /// of each family in registry
    pub fn build(rows: &[MasterRow], registry: &mut FamilyRegistry) -> Self {
        let mut index = FeatureIndex::default();
        for row in rows {
            let fig = row.figfam.trim();
            if fig.is_empty() {
                log::debug!("FeatureIndex::build, master row without family id");
                continue;
            }
            let family = registry.entry(fig);
            for function in split_list(&row.function, LIST_SEPARATOR) {
                family.add_function(&function);
            }
            for contig_id in split_list(&row.contig_ids, LIST_SEPARATOR) {
                family.add_contig_id(&contig_id);
            }
            for feature_id in split_list(&row.feature_ids, LIST_SEPARATOR) {
                family.add_feature_id(&feature_id);
                index.insert(feature_id, fig);
            }
        }
        //
        if !index.ambiguities.is_empty() {
            log::warn!(
                "FeatureIndex::build, {} features claimed by more than one family",
                index.ambiguities.len()
            );
        }
        log::info!(
            "FeatureIndex::build, nb families : {}, nb features : {}",
            registry.len(),
            index.len()
        );
        index
    } // end of build

    fn insert(&mut self, feature_id: String, fig: &str) {
        if let Some(previous) = self.feature_to_fig.get(&feature_id) {
            if previous != fig {
                match self.ambiguous.get(&feature_id) {
                    Some(&pos) => {
                        log::debug!("feature {} also found in family {}, keeping {}", feature_id, fig, fig);
                        self.ambiguities[pos].new_fig = fig.to_string();
                    }
                    None => {
                        log::warn!(
                            "feature {} found in family {} and in family {}, keeping {}",
                            feature_id,
                            previous,
                            fig,
                            fig
                        );
                        self.ambiguous.insert(feature_id.clone(), self.ambiguities.len());
                        self.ambiguities.push(Ambiguity {
                            feature_id: feature_id.clone(),
                            previous_fig: previous.clone(),
                            new_fig: fig.to_string(),
                        });
                    }
                }
            }
        }
        self.feature_to_fig.insert(feature_id, fig.to_string());
    } // end of insert

    /// family owning a feature
    pub fn get_fig(&self, feature_id: &str) -> Option<&str> {
        self.feature_to_fig.get(feature_id).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.feature_to_fig.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feature_to_fig.is_empty()
    }

    pub fn get_ambiguities(&self) -> &[Ambiguity] {
        &self.ambiguities
    }
} // end of impl FeatureIndex

#[cfg(test)]
mod tests {
    use super::*;

    fn master(fig: &str, function: &str, features: &str, contigs: &str) -> MasterRow {
        MasterRow {
            figfam: fig.to_string(),
            function: function.to_string(),
            feature_ids: features.to_string(),
            contig_ids: contigs.to_string(),
        }
    }

    #[test]
    fn split_trims_elements() {
        assert_eq!(split_list(" a ;b;; c ", ';'), ["a", "b", "c"]);
        assert!(split_list("", ';').is_empty());
    }

    #[test]
    fn build_maps_every_feature() {
        let mut registry = FamilyRegistry::new();
        let rows = vec![
            master("fig1", "kinase; ligase", "ft1; ft2", "100;200"),
            master("fig2", "polymerase", "ft3", "100"),
        ];
        let index = FeatureIndex::build(&rows, &mut registry);
        assert_eq!(index.len(), 3);
        assert_eq!(index.get_fig("ft1"), Some("fig1"));
        assert_eq!(index.get_fig("ft2"), Some("fig1"));
        assert_eq!(index.get_fig("ft3"), Some("fig2"));
        assert_eq!(index.get_fig("ft9"), None);
        assert!(index.get_ambiguities().is_empty());
        let fam = registry.get("fig1").unwrap();
        assert_eq!(fam.get_functions(), ["kinase", "ligase"]);
        assert_eq!(fam.get_feature_ids(), ["ft1", "ft2"]);
        assert_eq!(fam.get_contig_ids(), ["100", "200"]);
    }

    #[test]
    fn feature_in_two_families_is_flagged() {
        let mut registry = FamilyRegistry::new();
        let rows = vec![
            master("fig1", "kinase", "ft1;ft2", ""),
            master("fig2", "ligase", "ft2", ""),
            // same family again is not an ambiguity
            master("fig2", "ligase", "ft2", ""),
        ];
        let index = FeatureIndex::build(&rows, &mut registry);
        assert_eq!(index.get_fig("ft2"), Some("fig2"));
        assert_eq!(
            index.get_ambiguities(),
            [Ambiguity {
                feature_id: String::from("ft2"),
                previous_fig: String::from("fig1"),
                new_fig: String::from("fig2"),
            }]
        );
    }

    #[test]
    fn feature_in_three_families_is_flagged_once() {
        let mut registry = FamilyRegistry::new();
        let rows = vec![
            master("fig1", "kinase", "ft1", ""),
            master("fig2", "ligase", "ft1", ""),
            master("fig3", "gyrase", "ft1", ""),
        ];
        let index = FeatureIndex::build(&rows, &mut registry);
        assert_eq!(index.get_fig("ft1"), Some("fig3"));
        assert_eq!(
            index.get_ambiguities(),
            [Ambiguity {
                feature_id: String::from("ft1"),
                previous_fig: String::from("fig1"),
                new_fig: String::from("fig3"),
            }]
        );
    }
} // end of mod tests
