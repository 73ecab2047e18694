//! Ingestion of per-genome protein tables.
//!
//! An [AnalysisSession] owns the family registry, the genomes already read and the running counters.
//! Each table read adds one [Genome] and extends the registry.

use std::path::Path;

use fxhash::{FxHashMap, FxHashSet};
use serde::Serialize;

use crate::errors::{FigsetError, Result};
use crate::records::{read_genome_file, GenomeRow};
use crate::registry::FamilyRegistry;
use crate::utils::files::files_with_extension;
use crate::utils::parameters::IngestParams;

/// genome id to its set of family ids, ordered by genome id
pub type GenomeSets = std::collections::BTreeMap<String, FxHashSet<String>>;

/// row counts.
/// accepted rows have a family id, hypothetical ones among them are counted apart
/// and do not enter comparisons.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct IngestCounters {
    pub total: usize,
    pub accepted: usize,
    pub skipped_no_fig: usize,
    pub skipped_hypothetical: usize,
}

impl IngestCounters {
    pub fn merge(&mut self, other: &IngestCounters) {
        self.total += other.total;
        self.accepted += other.accepted;
        self.skipped_no_fig += other.skipped_no_fig;
        self.skipped_hypothetical += other.skipped_hypothetical;
    }

    /// rows that made it into a genome set
    pub fn retained(&self) -> usize {
        self.accepted - self.skipped_hypothetical
    }

    /// percentage of rows left out (no family id or hypothetical), 0 if no row
    pub fn percentage_skipped(&self) -> f64 {
        if self.total == 0 {
            return 0.;
        }
        (self.skipped_no_fig + self.skipped_hypothetical) as f64 * 100. / self.total as f64
    }
} // end of impl IngestCounters

//====================================================================

/// a genome as read from one table
#[derive(Clone, Debug)]
pub struct Genome {
    genome_id: String,
    /// file the genome was read from
    source_name: String,
    protein_families: FxHashSet<String>,
    counters: IngestCounters,
}

impl Genome {
    pub fn new(genome_id: &str, source_name: &str, protein_families: FxHashSet<String>) -> Self {
        Genome {
            genome_id: genome_id.to_string(),
            source_name: source_name.to_string(),
            protein_families,
            counters: IngestCounters::default(),
        }
    }

    pub fn get_genome_id(&self) -> &str {
        &self.genome_id
    }

    pub fn get_source_name(&self) -> &str {
        &self.source_name
    }

    pub fn get_protein_families(&self) -> &FxHashSet<String> {
        &self.protein_families
    }

    /// counts of the rows of this genome's table only
    pub fn get_counters(&self) -> &IngestCounters {
        &self.counters
    }
} // end of impl Genome

/// leading token of a contig id: 28582_5929 gives 28582
pub fn leading_id(contig_id: &str, separator: char) -> &str {
    contig_id.split(separator).next().unwrap_or("").trim()
}

//====================================================================

pub struct AnalysisSession {
    params: IngestParams,
    registry: FamilyRegistry,
    genomes: Vec<Genome>,
    /// genome id to rank in genomes
    genome_rank: FxHashMap<String, usize>,
    counters: IngestCounters,
} // end of struct AnalysisSession

impl AnalysisSession {
    pub fn new(params: IngestParams) -> Self {
        AnalysisSession {
            params,
            registry: FamilyRegistry::new(),
            genomes: Vec::new(),
            genome_rank: FxHashMap::default(),
            counters: IngestCounters::default(),
        }
    }

    pub fn get_params(&self) -> &IngestParams {
        &self.params
    }

    pub fn get_registry(&self) -> &FamilyRegistry {
        &self.registry
    }

    pub fn get_genomes(&self) -> &[Genome] {
        &self.genomes
    }

    pub fn get_genome(&self, genome_id: &str) -> Option<&Genome> {
        self.genome_rank.get(genome_id).map(|&rank| &self.genomes[rank])
    }

    /// counters accumulated over all tables read
    pub fn get_counters(&self) -> &IngestCounters {
        &self.counters
    }

    /// ingest the rows of one genome table.
    /// The genome id comes from the first row and holds for the whole table.
    pub fn ingest_genome(&mut self, source_name: &str, rows: &[GenomeRow]) -> Result<&Genome> {
        let first = rows.first().ok_or_else(|| FigsetError::MissingGenomeId {
            source_name: source_name.to_string(),
        })?;
        let genome_id = leading_id(&first.contig_id, self.params.genome_id_separator).to_string();
        if genome_id.is_empty() {
            return Err(FigsetError::MissingGenomeId {
                source_name: source_name.to_string(),
            });
        }
        // check before touching the registry
        if let Some(&rank) = self.genome_rank.get(&genome_id) {
            return Err(FigsetError::DuplicateGenome {
                genome_id,
                first_source: self.genomes[rank].source_name.clone(),
                second_source: source_name.to_string(),
            });
        }
        //
        let mut counters = IngestCounters::default();
        let mut proteins = FxHashSet::<String>::default();
        for (num, row) in rows.iter().enumerate() {
            counters.total += 1;
            let fig = match row.figfam.as_deref().map(str::trim) {
                Some(fig) if !fig.is_empty() => fig,
                _ => {
                    log::trace!("{} row {} has no family id", source_name, num);
                    counters.skipped_no_fig += 1;
                    continue;
                }
            };
            counters.accepted += 1;
            let marker = &self.params.hypothetical_marker;
            if !marker.is_empty() && row.function.contains(marker.as_str()) {
                log::trace!("{} row {} is hypothetical", source_name, num);
                counters.skipped_hypothetical += 1;
                continue;
            }
            proteins.insert(fig.to_string());
            let family = self.registry.entry(fig);
            family.add_function(&row.function);
            family.add_feature_id(&row.feature_id);
            family.add_contig_id(&genome_id);
        }
        //
        log::info!(
            "{} : genome {}, rows {}, no family id {}, hypothetical {}, distinct families {}",
            source_name,
            genome_id,
            counters.total,
            counters.skipped_no_fig,
            counters.skipped_hypothetical,
            proteins.len()
        );
        self.counters.merge(&counters);
        let mut genome = Genome::new(&genome_id, source_name, proteins);
        genome.counters = counters;
        self.genome_rank.insert(genome_id, self.genomes.len());
        self.genomes.push(genome);
        Ok(&self.genomes[self.genomes.len() - 1])
    } // end of ingest_genome

    /// read a table and ingest it, the file name is the source name
    pub fn ingest_genome_file(&mut self, path: &Path) -> Result<&Genome> {
        let rows = read_genome_file(path, &self.params)?;
        let source_name = path
            .file_name()
            .map(|f| f.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        self.ingest_genome(&source_name, &rows)
    }

    /// ingest all files of a directory having the configured extension.
    /// returns the number of genomes read
    pub fn ingest_dir(&mut self, dir: &Path) -> Result<usize> {
        let paths = files_with_extension(dir, &self.params.extension)?;
        log::info!("ingest_dir {:?}, found {} files", dir, paths.len());
        for path in &paths {
            self.ingest_genome_file(path)?;
        }
        if self.genomes.is_empty() {
            return Err(FigsetError::NoGenomes {
                context: format!("directory {}", dir.display()),
            });
        }
        Ok(paths.len())
    } // end of ingest_dir

    /// the sets the partition and similarity work on
    pub fn genome_sets(&self) -> GenomeSets {
        self.genomes
            .iter()
            .map(|g| (g.genome_id.clone(), g.protein_families.clone()))
            .collect()
    }
} // end of impl AnalysisSession

// end of mod tests
