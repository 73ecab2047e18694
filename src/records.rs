//! typed rows of the three input tables.
//!
//! The analysis never sees a raw csv record: columns are located by name once per file
//! and every row is turned into one of the structures below.

use std::fs::File;
use std::io;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};

use crate::errors::{FigsetError, Result};
use crate::utils::parameters::{IngestParams, SubsystemParams};

/// one row of a per-genome protein table (RAST spreadsheet export)
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GenomeRow {
    pub contig_id: String,
    pub feature_id: String,
    pub function: String,
    /// None when the column is absent from the file
    pub figfam: Option<String>,
}

impl GenomeRow {
    pub fn new(contig_id: &str, feature_id: &str, function: &str, figfam: Option<&str>) -> Self {
        GenomeRow {
            contig_id: contig_id.to_string(),
            feature_id: feature_id.to_string(),
            function: function.to_string(),
            figfam: figfam.map(|f| f.to_string()),
        }
    }
} // end of impl GenomeRow

/// one row of the master table, list fields still joined by ';'.
/// This is also the format of the family registry dump.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MasterRow {
    pub figfam: String,
    #[serde(default)]
    pub function: String,
    #[serde(default)]
    pub feature_ids: String,
    #[serde(default)]
    pub contig_ids: String,
}

impl MasterRow {
    pub const HEADER: &'static [&'static str] = &["figfam", "function", "feature_ids", "contig_ids"];
}

/// one row of a subsystem export
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SubsystemRow {
    /// comma separated, only the first one is used to find the family
    pub features: String,
    pub category: String,
    pub subcategory: String,
    pub subsystem: String,
    pub role: String,
}

//==========================================================================

/// position of a named column in a header, if present
fn column_index(headers: &StringRecord, name: &str) -> Option<usize> {
    let idx = headers.iter().position(|h| h.trim() == name);
    if idx.is_none() {
        log::debug!("column {} not found in headers {:?}", name, headers);
    }
    idx
}

/// delimiter as the byte the csv reader expects. A char from a reloaded parameters.json
/// may not fit in one byte.
pub fn delimiter_byte(delimiter: char) -> Result<u8> {
    match u8::try_from(delimiter) {
        Ok(byte) if byte.is_ascii() => Ok(byte),
        _ => {
            log::error!("delimiter {:?} is not an ascii character", delimiter);
            Err(FigsetError::InvalidDelimiter(delimiter))
        }
    }
}

fn field(record: &StringRecord, idx: Option<usize>) -> String {
    idx.and_then(|i| record.get(i)).unwrap_or("").to_string()
}

/// parse a per-genome table
pub fn read_genome_rows<R: io::Read>(reader: R, params: &IngestParams) -> Result<Vec<GenomeRow>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter_byte(params.delimiter)?)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let contig_idx = column_index(&headers, &params.contig_column);
    let feature_idx = column_index(&headers, &params.feature_column);
    let function_idx = column_index(&headers, &params.function_column);
    let figfam_idx = column_index(&headers, &params.figfam_column);
    //
    let mut rows = Vec::<GenomeRow>::new();
    for record in csv_reader.records() {
        let record = record?;
        rows.push(GenomeRow {
            contig_id: field(&record, contig_idx),
            feature_id: field(&record, feature_idx),
            function: field(&record, function_idx),
            figfam: figfam_idx.and_then(|i| record.get(i)).map(|s| s.to_string()),
        });
    }
    Ok(rows)
} // end of read_genome_rows

pub fn read_genome_file(path: &Path, params: &IngestParams) -> Result<Vec<GenomeRow>> {
    log::debug!("reading genome table {:?}", path);
    read_genome_rows(File::open(path)?, params)
}

/// parse a master (all proteins) table, comma separated with headers figfam,function,feature_ids,contig_ids
pub fn read_master_rows<R: io::Read>(reader: R) -> Result<Vec<MasterRow>> {
    let mut csv_reader = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let mut rows = Vec::<MasterRow>::new();
    for record in csv_reader.deserialize() {
        rows.push(record?);
    }
    Ok(rows)
}

pub fn read_master_file(path: &Path) -> Result<Vec<MasterRow>> {
    log::debug!("reading master table {:?}", path);
    read_master_rows(File::open(path)?)
}

/// parse a subsystem export
pub fn read_subsystem_rows<R: io::Read>(reader: R, params: &SubsystemParams) -> Result<Vec<SubsystemRow>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter_byte(params.delimiter)?)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let features_idx = column_index(&headers, &params.features_column);
    let category_idx = column_index(&headers, &params.category_column);
    let subcategory_idx = column_index(&headers, &params.subcategory_column);
    let subsystem_idx = column_index(&headers, &params.subsystem_column);
    let role_idx = column_index(&headers, &params.role_column);
    //
    let mut rows = Vec::<SubsystemRow>::new();
    for record in csv_reader.records() {
        let record = record?;
        rows.push(SubsystemRow {
            features: field(&record, features_idx),
            category: field(&record, category_idx),
            subcategory: field(&record, subcategory_idx),
            subsystem: field(&record, subsystem_idx),
            role: field(&record, role_idx),
        });
    }
    Ok(rows)
} // end of read_subsystem_rows

pub fn read_subsystem_file(path: &Path, params: &SubsystemParams) -> Result<Vec<SubsystemRow>> {
    log::debug!("reading subsystem table {:?}", path);
    read_subsystem_rows(File::open(path)?, params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genome_rows_by_column_name() {
        let data = "\
contig_id,feature_id,type,function,figfam
28582_5929,fig|6666666.1.peg.1,peg,DNA polymerase,FIG00000001
28582_5929,fig|6666666.1.peg.2,peg,hypothetical protein,
";
        let rows = read_genome_rows(data.as_bytes(), &IngestParams::default()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0],
            GenomeRow::new("28582_5929", "fig|6666666.1.peg.1", "DNA polymerase", Some("FIG00000001"))
        );
        assert_eq!(rows[1].figfam.as_deref(), Some(""));
        assert_eq!(rows[1].function, "hypothetical protein");
    }

    #[test]
    fn genome_rows_without_figfam_column() {
        let data = "contig_id\tfeature_id\tfunction\n100_1\tft1\tkinase\n";
        let mut params = IngestParams::default();
        params.delimiter = '\t';
        let rows = read_genome_rows(data.as_bytes(), &params).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].figfam, None);
        assert_eq!(rows[0].contig_id, "100_1");
    }

    #[test]
    fn non_ascii_delimiter_is_rejected() {
        let data = "contig_id,feature_id,function,figfam\n100_1,ft1,kinase,f1\n";
        let mut params = IngestParams::default();
        params.delimiter = '\u{131}';
        match read_genome_rows(data.as_bytes(), &params) {
            Err(FigsetError::InvalidDelimiter(c)) => assert_eq!(c, '\u{131}'),
            other => panic!("expected an invalid delimiter error, got {:?}", other),
        }
        let mut sub_params = SubsystemParams::default();
        sub_params.delimiter = '→';
        assert!(matches!(
            read_subsystem_rows("Features\nft1\n".as_bytes(), &sub_params),
            Err(FigsetError::InvalidDelimiter('→'))
        ));
        assert_eq!(delimiter_byte(';').unwrap(), b';');
        assert_eq!(delimiter_byte('\t').unwrap(), b'\t');
    }

    #[test]
    fn master_rows() {
        let data = "figfam,function,feature_ids,contig_ids\nfig1,kinase;ligase,ft1; ft2,100;200\n";
        let rows = read_master_rows(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].figfam, "fig1");
        assert_eq!(rows[0].feature_ids, "ft1; ft2");
    }

    #[test]
    fn subsystem_rows() {
        let data = "Category\tSubcategory\tSubsystem\tRole\tFeatures\n\
Metabolism\tAmino acids\tLysine\tLysA\tfig|1.1.peg.3, fig|1.1.peg.9\n";
        let rows = read_subsystem_rows(data.as_bytes(), &SubsystemParams::default()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].category, "Metabolism");
        assert_eq!(rows[0].role, "LysA");
        assert_eq!(rows[0].features, "fig|1.1.peg.3, fig|1.1.peg.9");
    }
} // end of mod tests
