//! Shapes partition, registry and genomes into output records.
//!
//! Nothing is computed here beyond reshaping: sets and scores come in already derived.
//! Rows are sorted (genome id, then family id) so outputs are reproducible.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ingest::{Genome, IngestCounters};
use crate::partition::{FigSet, PartitionResult};
use crate::records::MasterRow;
use crate::registry::FamilyRegistry;
use crate::utils::parameters::LIST_SEPARATOR;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CommonRow {
    pub figfam: String,
    pub function: String,
}

impl CommonRow {
    pub const HEADER: &'static [&'static str] = &["figfam", "function"];
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UniqueRow {
    pub file_name: String,
    pub contig_id: String,
    pub figfam: String,
    pub function: String,
}

impl UniqueRow {
    pub const HEADER: &'static [&'static str] = &["file_name", "contig_id", "figfam", "function"];
}

/// a table with its header, all cells as strings
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WideTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Clone, Debug, Serialize)]
pub struct SummaryStats {
    pub nb_genomes: usize,
    pub total_rows: usize,
    pub accepted_rows: usize,
    pub skipped_no_fig: usize,
    pub skipped_hypothetical: usize,
    pub percentage_skipped: f64,
    pub nb_distinct_families: usize,
    pub nb_common_families: usize,
    /// genome id to number of unique families
    pub unique_by_genome: BTreeMap<String, usize>,
}

/// entry of the genome dump
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenomeEntry {
    pub source_name: String,
    /// sorted family ids
    pub proteins: Vec<String>,
}

pub type GenomeDump = BTreeMap<String, GenomeEntry>;

/// entry of the family lookup consumed by the visualisation
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CategoryEntry {
    pub fig: String,
    pub functions: Vec<String>,
    pub feature_ids: Vec<String>,
    pub contig_ids: Vec<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub subsystem: Option<String>,
    pub role: Option<String>,
}

pub type CategoryDump = BTreeMap<String, CategoryEntry>;

//====================================================================

fn sorted(figs: &FigSet) -> Vec<&String> {
    let mut v: Vec<&String> = figs.iter().collect();
    v.sort_unstable();
    v
}

/// families common to all genomes with their function
pub fn common_rows(partition: &PartitionResult, registry: &FamilyRegistry) -> Vec<CommonRow> {
    sorted(partition.get_common())
        .into_iter()
        .map(|fig| CommonRow {
            figfam: fig.clone(),
            function: registry.get_function(fig).to_string(),
        })
        .collect()
}

/// families unique to one genome, grouped by genome
pub fn unique_rows(partition: &PartitionResult, genomes: &[Genome], registry: &FamilyRegistry) -> Vec<UniqueRow> {
    let mut rows = Vec::<UniqueRow>::new();
    for (genome_id, figs) in partition.get_unique_per_genome() {
        let file_name = genomes
            .iter()
            .find(|g| g.get_genome_id() == genome_id)
            .map(|g| g.get_source_name().to_string())
            .unwrap_or_default();
        for fig in sorted(figs) {
            rows.push(UniqueRow {
                file_name: file_name.clone(),
                contig_id: genome_id.clone(),
                figfam: fig.clone(),
                function: registry.get_function(fig).to_string(),
            });
        }
    }
    rows
} // end of unique_rows

/// one column per genome holding its unique families, short columns padded with empty cells
pub fn unique_wide(partition: &PartitionResult) -> WideTable {
    let columns: Vec<Vec<&String>> = partition.get_unique_per_genome().values().map(sorted).collect();
    let header: Vec<String> = partition.get_unique_per_genome().keys().cloned().collect();
    let nb_rows = columns.iter().map(|c| c.len()).max().unwrap_or(0);
    let rows: Vec<Vec<String>> = (0..nb_rows)
        .map(|i| {
            columns
                .iter()
                .map(|c| c.get(i).map(|s| s.to_string()).unwrap_or_default())
                .collect()
        })
        .collect();
    WideTable { header, rows }
} // end of unique_wide

pub fn summary(counters: &IngestCounters, nb_genomes: usize, partition: &PartitionResult) -> SummaryStats {
    SummaryStats {
        nb_genomes,
        total_rows: counters.total,
        accepted_rows: counters.accepted,
        skipped_no_fig: counters.skipped_no_fig,
        skipped_hypothetical: counters.skipped_hypothetical,
        percentage_skipped: counters.percentage_skipped(),
        nb_distinct_families: partition.get_all_distinct().len(),
        nb_common_families: partition.get_common().len(),
        unique_by_genome: partition
            .get_unique_per_genome()
            .iter()
            .map(|(id, s)| (id.clone(), s.len()))
            .collect(),
    }
}

/// registry dump, in the master table format so it can be read back
pub fn family_rows(registry: &FamilyRegistry) -> Vec<MasterRow> {
    let sep = LIST_SEPARATOR.to_string();
    registry
        .sorted()
        .into_iter()
        .map(|fam| MasterRow {
            figfam: fam.get_fig().to_string(),
            function: fam.get_functions().join(&sep),
            feature_ids: fam.get_feature_ids().join(&sep),
            contig_ids: fam.get_contig_ids().join(&sep),
        })
        .collect()
}

pub fn genome_dump(genomes: &[Genome]) -> GenomeDump {
    genomes
        .iter()
        .map(|g| {
            let proteins = sorted(g.get_protein_families()).into_iter().cloned().collect();
            (
                g.get_genome_id().to_string(),
                GenomeEntry {
                    source_name: g.get_source_name().to_string(),
                    proteins,
                },
            )
        })
        .collect()
}

pub fn category_dump(registry: &FamilyRegistry) -> CategoryDump {
    registry
        .iter()
        .map(|fam| {
            let info = fam.get_subsystem();
            let entry = CategoryEntry {
                fig: fam.get_fig().to_string(),
                functions: fam.get_functions().to_vec(),
                feature_ids: fam.get_feature_ids().to_vec(),
                contig_ids: fam.get_contig_ids().to_vec(),
                category: info.map(|i| i.category.clone()),
                subcategory: info.map(|i| i.subcategory.clone()),
                subsystem: info.map(|i| i.subsystem.clone()),
                role: info.map(|i| i.role.clone()),
            };
            (fam.get_fig().to_string(), entry)
        })
        .collect()
}

// end of mod tests
