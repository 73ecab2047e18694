//! Partition of family sets across genomes: families common to all genomes,
//! families unique to one genome, and all distinct families.

use std::collections::BTreeMap;

use fxhash::FxHashSet;

use crate::errors::{FigsetError, Result};
use crate::ingest::GenomeSets;

pub type FigSet = FxHashSet<String>;

#[derive(Clone, Debug)]
pub struct PartitionResult {
    /// families present in every genome
    common: FigSet,
    /// for each genome, families present in no other genome
    unique_per_genome: BTreeMap<String, FigSet>,
    /// union over all genomes
    all_distinct: FigSet,
}

impl PartitionResult {
    pub fn get_common(&self) -> &FigSet {
        &self.common
    }

    pub fn get_unique_per_genome(&self) -> &BTreeMap<String, FigSet> {
        &self.unique_per_genome
    }

    pub fn get_unique(&self, genome_id: &str) -> Option<&FigSet> {
        self.unique_per_genome.get(genome_id)
    }

    pub fn get_all_distinct(&self) -> &FigSet {
        &self.all_distinct
    }
} // end of impl PartitionResult

/// union of any number of sets, empty set for no set
pub fn union_all<'a, I>(sets: I) -> FigSet
where
    I: IntoIterator<Item = &'a FigSet>,
{
    sets.into_iter().fold(FigSet::default(), |mut acc, s| {
        acc.extend(s.iter().cloned());
        acc
    })
}

/// intersection of at least one set, None if there is no set
pub fn intersect_all<'a, I>(sets: I) -> Option<FigSet>
where
    I: IntoIterator<Item = &'a FigSet>,
{
    let mut iter = sets.into_iter();
    let first = iter.next()?.clone();
    Some(iter.fold(first, |mut acc, s| {
        acc.retain(|fig| s.contains(fig));
        acc
    }))
}

/// computes the partition. At least one genome is required.
pub fn partition(sets: &GenomeSets) -> Result<PartitionResult> {
    let common = intersect_all(sets.values()).ok_or_else(|| FigsetError::NoGenomes {
        context: String::from("set partition"),
    })?;
    let all_distinct = union_all(sets.values());
    //
    let mut unique_per_genome = BTreeMap::<String, FigSet>::new();
    for (genome_id, own) in sets {
        let others = union_all(sets.iter().filter(|(id, _)| *id != genome_id).map(|(_, s)| s));
        let unique: FigSet = own.difference(&others).cloned().collect();
        log::info!("genome {} has {} unique families", genome_id, unique.len());
        unique_per_genome.insert(genome_id.clone(), unique);
    }
    log::info!(
        "partition of {} genomes, distinct families : {}, common families : {}",
        sets.len(),
        all_distinct.len(),
        common.len()
    );
    //
    Ok(PartitionResult {
        common,
        unique_per_genome,
        all_distinct,
    })
} // end of partition

// end of mod tests
