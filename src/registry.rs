//! The family registry: everything known about each protein family (figfam).
//!
//! A family is created on first sight and only ever extended afterwards.

use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};

/// subsystem classification of a family, filled by the subsystem join
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsystemInfo {
    pub category: String,
    pub subcategory: String,
    pub subsystem: String,
    pub role: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProteinFamily {
    /// family id
    fig: String,
    /// function texts, most recent last
    functions: Vec<String>,
    feature_ids: Vec<String>,
    /// genome ids in which the family was seen, with repetitions
    contig_ids: Vec<String>,
    subsystem: Option<SubsystemInfo>,
} // end of struct ProteinFamily

impl ProteinFamily {
    pub fn new(fig: &str) -> Self {
        ProteinFamily {
            fig: fig.to_string(),
            functions: Vec::new(),
            feature_ids: Vec::new(),
            contig_ids: Vec::new(),
            subsystem: None,
        }
    }

    pub fn get_fig(&self) -> &str {
        &self.fig
    }

    pub fn get_functions(&self) -> &[String] {
        &self.functions
    }

    /// the last recorded function, empty if none
    pub fn get_function(&self) -> &str {
        self.functions.last().map(|s| s.as_str()).unwrap_or("")
    }

    pub fn get_feature_ids(&self) -> &[String] {
        &self.feature_ids
    }

    pub fn get_contig_ids(&self) -> &[String] {
        &self.contig_ids
    }

    pub fn get_subsystem(&self) -> Option<&SubsystemInfo> {
        self.subsystem.as_ref()
    }

    /// records a function text. A text already present is moved to the end
    /// so the last write is what get_function returns.
    pub fn add_function(&mut self, function: &str) {
        if function.is_empty() {
            return;
        }
        if let Some(pos) = self.functions.iter().position(|f| f == function) {
            let f = self.functions.remove(pos);
            self.functions.push(f);
        } else {
            self.functions.push(function.to_string());
        }
    } // end of add_function

    pub fn add_feature_id(&mut self, feature_id: &str) {
        if !feature_id.is_empty() {
            self.feature_ids.push(feature_id.to_string());
        }
    }

    pub fn add_contig_id(&mut self, contig_id: &str) {
        if !contig_id.is_empty() {
            self.contig_ids.push(contig_id.to_string());
        }
    }

    /// overwrites any previous classification
    pub fn set_subsystem(&mut self, info: SubsystemInfo) {
        self.subsystem = Some(info);
    }
} // end of impl ProteinFamily

//====================================================================

/// all families of a session, keyed by family id
#[derive(Clone, Debug, Default)]
pub struct FamilyRegistry {
    families: FxHashMap<String, ProteinFamily>,
}

impl FamilyRegistry {
    pub fn new() -> Self {
        FamilyRegistry {
            families: FxHashMap::default(),
        }
    }

    /// returns the family, creating it if absent
    pub fn entry(&mut self, fig: &str) -> &mut ProteinFamily {
        if !self.families.contains_key(fig) {
            log::trace!("registry, new family {}", fig);
        }
        self.families
            .entry(fig.to_string())
            .or_insert_with(|| ProteinFamily::new(fig))
    }

    pub fn get(&self, fig: &str) -> Option<&ProteinFamily> {
        self.families.get(fig)
    }

    pub fn get_mut(&mut self, fig: &str) -> Option<&mut ProteinFamily> {
        self.families.get_mut(fig)
    }

    /// function of a family, empty for an unknown family
    pub fn get_function(&self, fig: &str) -> &str {
        self.get(fig).map(|f| f.get_function()).unwrap_or("")
    }

    pub fn contains(&self, fig: &str) -> bool {
        self.families.contains_key(fig)
    }

    pub fn len(&self) -> usize {
        self.families.len()
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProteinFamily> {
        self.families.values()
    }

    /// families ordered by id
    pub fn sorted(&self) -> Vec<&ProteinFamily> {
        let mut families: Vec<&ProteinFamily> = self.families.values().collect();
        families.sort_unstable_by(|a, b| a.fig.cmp(&b.fig));
        families
    }
} // end of impl FamilyRegistry

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_creates_then_extends() {
        let mut registry = FamilyRegistry::new();
        registry.entry("fig1").add_feature_id("ft1");
        registry.entry("fig1").add_feature_id("ft2");
        registry.entry("fig1").add_contig_id("100");
        registry.entry("fig1").add_contig_id("100");
        assert_eq!(registry.len(), 1);
        let fam = registry.get("fig1").unwrap();
        assert_eq!(fam.get_fig(), "fig1");
        assert_eq!(fam.get_feature_ids(), ["ft1", "ft2"]);
        // repetitions of contig ids are kept, they count occurrences
        assert_eq!(fam.get_contig_ids(), ["100", "100"]);
        assert!(fam.get_subsystem().is_none());
    }

    #[test]
    fn last_function_wins() {
        let mut fam = ProteinFamily::new("fig1");
        fam.add_function("kinase");
        fam.add_function("ligase");
        assert_eq!(fam.get_function(), "ligase");
        fam.add_function("kinase");
        assert_eq!(fam.get_function(), "kinase");
        assert_eq!(fam.get_functions(), ["ligase", "kinase"]);
        fam.add_function("");
        assert_eq!(fam.get_functions().len(), 2);
    }

    #[test]
    fn subsystem_overwrites() {
        let mut fam = ProteinFamily::new("fig1");
        fam.set_subsystem(SubsystemInfo {
            category: String::from("a"),
            ..Default::default()
        });
        fam.set_subsystem(SubsystemInfo {
            category: String::from("b"),
            ..Default::default()
        });
        assert_eq!(fam.get_subsystem().unwrap().category, "b");
    }

    #[test]
    fn unknown_family_has_empty_function() {
        let registry = FamilyRegistry::new();
        assert_eq!(registry.get_function("nope"), "");
        assert!(registry.is_empty());
    }
} // end of mod tests
