//! a small module dedicated to dump reload outputs : csv tables, json dumps and similarity matrix.

use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use csv::{Writer, WriterBuilder};
use serde::Serialize;

use crate::errors::Result;
use crate::ingest::GenomeSets;
use crate::report::{GenomeDump, WideTable};
use crate::similarity::SimilarityMatrix;

/// dumps serializable rows in a csv file. The header is written even with no row,
/// so it must match the field order of T. returns number of rows
pub fn dump_csv_rows<T: Serialize>(path: &Path, header: &[&str], rows: &[T]) -> Result<usize> {
    log::info!("dumping {} rows in csv file : {:?}", rows.len(), path);
    let mut csv_w = WriterBuilder::new().has_headers(false).from_path(path)?;
    csv_w.write_record(header)?;
    for row in rows {
        csv_w.serialize(row)?;
    }
    csv_w.flush()?;
    Ok(rows.len())
} // end of dump_csv_rows

/// dumps a table given with its header as strings
pub fn dump_wide_table(path: &Path, table: &WideTable) -> Result<usize> {
    log::info!("dumping table of {} columns in csv file : {:?}", table.header.len(), path);
    let mut csv_w = Writer::from_path(path)?;
    csv_w.write_record(&table.header)?;
    for row in &table.rows {
        csv_w.write_record(row)?;
    }
    csv_w.flush()?;
    Ok(table.rows.len())
}

/// square table, first column and header row hold genome ids
pub fn dump_similarity(path: &Path, matrix: &SimilarityMatrix) -> Result<()> {
    log::info!("dumping similarity matrix of {} genomes in : {:?}", matrix.len(), path);
    let mut csv_w = Writer::from_path(path)?;
    let mut header = vec![String::new()];
    header.extend(matrix.get_genome_ids().iter().cloned());
    csv_w.write_record(&header)?;
    for (id, scores) in matrix.get_genome_ids().iter().zip(matrix.get_scores()) {
        let mut record = vec![id.clone()];
        record.extend(scores.iter().map(|s| format!("{:.6}", s)));
        csv_w.write_record(&record)?;
    }
    csv_w.flush()?;
    Ok(())
} // end of dump_similarity

pub fn dump_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    log::info!("dumping json file : {:?}", path);
    let file = OpenOptions::new().write(true).create(true).truncate(true).open(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    Ok(())
}

/// reload a genome dump
pub fn reload_genome_dump(path: &Path) -> Result<GenomeDump> {
    let reader = BufReader::new(File::open(path)?);
    let dump: GenomeDump = serde_json::from_reader(reader)?;
    log::info!("reloaded genome dump {:?}, nb genomes : {}", path, dump.len());
    Ok(dump)
}

/// family sets of a genome dump
pub fn genome_sets_from_dump(dump: &GenomeDump) -> GenomeSets {
    dump.iter()
        .map(|(id, entry)| (id.clone(), entry.proteins.iter().cloned().collect()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::partition;
    use crate::registry::FamilyRegistry;
    use crate::records::MasterRow;
    use crate::report::{common_rows, CommonRow, GenomeEntry, UniqueRow};
    use crate::similarity::similarity_matrix;

    #[test]
    fn empty_common_table_keeps_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("common_proteins.csv");
        let mut sets = GenomeSets::new();
        sets.insert(String::from("A"), ["f1"].iter().map(|s| s.to_string()).collect());
        sets.insert(String::from("B"), ["f2"].iter().map(|s| s.to_string()).collect());
        let part = partition(&sets).unwrap();
        let rows = common_rows(&part, &FamilyRegistry::new());
        assert_eq!(dump_csv_rows(&path, CommonRow::HEADER, &rows).unwrap(), 0);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "figfam,function\n");
    }

    // serde would write the same header from the field names
    fn serde_header<T: Serialize>(row: &T) -> String {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("row.csv");
        let mut csv_w = Writer::from_path(&path).unwrap();
        csv_w.serialize(row).unwrap();
        csv_w.flush().unwrap();
        let data = std::fs::read_to_string(&path).unwrap();
        data.lines().next().unwrap().to_string()
    }

    #[test]
    fn headers_match_row_fields() {
        let common = CommonRow {
            figfam: String::from("f1"),
            function: String::new(),
        };
        assert_eq!(serde_header(&common), CommonRow::HEADER.join(","));
        let unique = UniqueRow {
            file_name: String::from("a.csv"),
            contig_id: String::from("A"),
            figfam: String::from("f1"),
            function: String::new(),
        };
        assert_eq!(serde_header(&unique), UniqueRow::HEADER.join(","));
        assert_eq!(serde_header(&MasterRow::default()), MasterRow::HEADER.join(","));
    }

    #[test]
    fn rows_follow_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("common_proteins.csv");
        let rows = vec![CommonRow {
            figfam: String::from("f3"),
            function: String::from("polymerase"),
        }];
        assert_eq!(dump_csv_rows(&path, CommonRow::HEADER, &rows).unwrap(), 1);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "figfam,function\nf3,polymerase\n");
    }

    #[test]
    fn genome_dump_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("genomes.json");
        let mut dump = GenomeDump::new();
        dump.insert(
            String::from("100"),
            GenomeEntry {
                source_name: String::from("a.csv"),
                proteins: vec![String::from("f1"), String::from("f2")],
            },
        );
        dump_json(&path, &dump).unwrap();
        let reloaded = reload_genome_dump(&path).unwrap();
        assert_eq!(reloaded, dump);
        let sets = genome_sets_from_dump(&reloaded);
        assert_eq!(sets["100"].len(), 2);
        assert!(sets["100"].contains("f2"));
    }

    #[test]
    fn similarity_csv_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("similarity.csv");
        let mut sets = GenomeSets::new();
        sets.insert(String::from("A"), ["f1", "f2"].iter().map(|s| s.to_string()).collect());
        sets.insert(String::from("B"), ["f2"].iter().map(|s| s.to_string()).collect());
        let matrix = similarity_matrix(&sets).unwrap();
        dump_similarity(&path, &matrix).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines, [",A,B", "A,1.000000,0.500000", "B,0.500000,1.000000"]);
    }

    #[test]
    fn wide_table_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.csv");
        let table = WideTable {
            header: vec![String::from("A"), String::from("B")],
            rows: vec![
                vec![String::from("f1"), String::from("f4")],
                vec![String::new(), String::from("f5")],
            ],
        };
        assert_eq!(dump_wide_table(&path, &table).unwrap(), 2);
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "A,B\nf1,f4\n,f5\n");
    }
} // end of mod tests
