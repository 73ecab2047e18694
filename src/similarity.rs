//! Pairwise similarity between genomes from their family sets.
//!
//! score(A, B) = |A ∩ B| / max(|A|, |B|). The score is symmetric, and equals 1. on the diagonal.

use crate::errors::{FigsetError, Result};
use crate::ingest::GenomeSets;
use crate::partition::FigSet;

/// square matrix of scores, rows and columns in genome id order
#[derive(Clone, Debug)]
pub struct SimilarityMatrix {
    genome_ids: Vec<String>,
    scores: Vec<Vec<f64>>,
}

impl SimilarityMatrix {
    pub fn get_genome_ids(&self) -> &[String] {
        &self.genome_ids
    }

    /// rows of scores, row i and column j refer to genome_ids\[i\] and genome_ids\[j\]
    pub fn get_scores(&self) -> &[Vec<f64>] {
        &self.scores
    }

    /// score between two genomes given by id
    pub fn score(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.genome_ids.iter().position(|id| id == a)?;
        let j = self.genome_ids.iter().position(|id| id == b)?;
        Some(self.scores[i][j])
    }

    pub fn len(&self) -> usize {
        self.genome_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genome_ids.is_empty()
    }
} // end of impl SimilarityMatrix

// both sets are known to be non empty
fn set_similarity(a: &FigSet, b: &FigSet) -> f64 {
    // iterate on the smaller one
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let nb_common = small.iter().filter(|fig| large.contains(*fig)).count();
    nb_common as f64 / large.len() as f64
}

/// computes the full matrix. Fails if there is no genome or if a genome has no family.
pub fn similarity_matrix(sets: &GenomeSets) -> Result<SimilarityMatrix> {
    if sets.is_empty() {
        return Err(FigsetError::NoGenomes {
            context: String::from("similarity matrix"),
        });
    }
    if let Some((genome_id, _)) = sets.iter().find(|(_, s)| s.is_empty()) {
        log::error!("similarity_matrix, genome {} has no protein family", genome_id);
        return Err(FigsetError::EmptyProteinSet {
            genome_id: genome_id.clone(),
        });
    }
    //
    let genome_ids: Vec<String> = sets.keys().cloned().collect();
    let figsets: Vec<&FigSet> = sets.values().collect();
    let nb = genome_ids.len();
    let mut scores = vec![vec![0f64; nb]; nb];
    for i in 0..nb {
        scores[i][i] = set_similarity(figsets[i], figsets[i]);
        for j in (i + 1)..nb {
            let s = set_similarity(figsets[i], figsets[j]);
            scores[i][j] = s;
            scores[j][i] = s;
        }
    }
    log::info!("similarity_matrix computed for {} genomes", nb);
    //
    Ok(SimilarityMatrix { genome_ids, scores })
} // end of similarity_matrix

#[cfg(test)]
mod tests {
    use super::*;

    fn set(figs: &[&str]) -> FigSet {
        figs.iter().map(|s| s.to_string()).collect()
    }

    fn three_genomes() -> GenomeSets {
        let mut sets = GenomeSets::new();
        sets.insert(String::from("A"), set(&["f1", "f2", "f3"]));
        sets.insert(String::from("B"), set(&["f2", "f3", "f4"]));
        sets.insert(String::from("C"), set(&["f3"]));
        sets
    }

    #[test]
    fn three_genome_scores() {
        let matrix = similarity_matrix(&three_genomes()).unwrap();
        assert_eq!(matrix.len(), 3);
        assert!((matrix.score("A", "B").unwrap() - 2. / 3.).abs() < 1.0e-12);
        assert!((matrix.score("A", "C").unwrap() - 1. / 3.).abs() < 1.0e-12);
        assert!((matrix.score("B", "C").unwrap() - 1. / 3.).abs() < 1.0e-12);
        assert!(matrix.score("A", "Z").is_none());
    }

    fn genomes(entries: &[(&str, &[&str])]) -> GenomeSets {
        entries.iter().map(|(id, figs)| (id.to_string(), set(figs))).collect()
    }

    fn collections() -> Vec<GenomeSets> {
        vec![
            three_genomes(),
            genomes(&[("A", &["f1", "f2"])]),
            genomes(&[("A", &["f1", "f2", "f3"]), ("B", &["f3", "f2", "f1"])]),
            genomes(&[("A", &["f1"]), ("B", &["f1", "f2"]), ("C", &["f1", "f2", "f3", "f4"])]),
            genomes(&[("A", &["f9"]), ("B", &["f1", "f2", "f3"]), ("C", &["f2", "f3"])]),
            genomes(&[
                ("A", &["f1", "f2", "f3", "f7"]),
                ("B", &["f2", "f3", "f4"]),
                ("C", &["f3", "f4", "f5", "f2"]),
                ("D", &["f3", "f6", "f2"]),
                ("E", &["f2", "f3", "f8", "f1"]),
                ("F", &["f3", "f2", "f9", "f10", "f11"]),
            ]),
        ]
    }

    #[test]
    fn symmetric_with_unit_diagonal() {
        for sets in collections() {
            let matrix = similarity_matrix(&sets).unwrap();
            assert_eq!(matrix.len(), sets.len());
            for (a, set_a) in &sets {
                assert_eq!(matrix.score(a, a), Some(1.));
                for (b, set_b) in &sets {
                    let s = matrix.score(a, b).unwrap();
                    assert_eq!(Some(s), matrix.score(b, a));
                    assert!((0. ..=1.).contains(&s));
                    let expected = set_a.intersection(set_b).count() as f64 / set_a.len().max(set_b.len()) as f64;
                    assert!((s - expected).abs() < 1.0e-12);
                }
            }
        }
    }

    #[test]
    fn identical_nested_and_disjoint_scores() {
        let matrix = similarity_matrix(&genomes(&[("A", &["f1", "f2"]), ("B", &["f2", "f1"])])).unwrap();
        assert_eq!(matrix.score("A", "B"), Some(1.));
        //
        let matrix = similarity_matrix(&genomes(&[("A", &["f1"]), ("B", &["f1", "f2", "f3", "f4"])])).unwrap();
        assert!((matrix.score("A", "B").unwrap() - 0.25).abs() < 1.0e-12);
        //
        let matrix = similarity_matrix(&genomes(&[("A", &["f1"]), ("B", &["f2"])])).unwrap();
        assert_eq!(matrix.score("A", "B"), Some(0.));
    }

    #[test]
    fn empty_set_names_the_genome() {
        let mut sets = three_genomes();
        sets.insert(String::from("E"), FigSet::default());
        match similarity_matrix(&sets) {
            Err(FigsetError::EmptyProteinSet { genome_id }) => assert_eq!(genome_id, "E"),
            _ => panic!("expected an empty protein set error"),
        }
        assert!(matches!(
            similarity_matrix(&GenomeSets::new()),
            Err(FigsetError::NoGenomes { .. })
        ));
    }
} // end of mod tests
