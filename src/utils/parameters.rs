//! structures related to processing parameters
//!
//! Column names, delimiters and markers used to read the RAST exports.
//! The whole set is dumped in the output directory so a later run can reload it.

use std::fs::OpenOptions;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::to_writer_pretty;

use crate::errors::Result;

/// name of the parameters dump in the output directory
pub const PARAMS_DUMP_NAME: &str = "parameters.json";

/// parameters to read one per-genome protein table
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IngestParams {
    /// extension of per-genome files in a directory, with its leading dot
    pub extension: String,
    pub delimiter: char,
    /// column giving contig id, its leading token is the genome id
    pub contig_column: String,
    pub figfam_column: String,
    pub function_column: String,
    pub feature_column: String,
    /// rows whose function contains this (case sensitive) are left out of comparisons
    pub hypothetical_marker: String,
    /// a contig id 28582_5929 belongs to genome 28582
    pub genome_id_separator: char,
} // end of struct IngestParams

impl Default for IngestParams {
    fn default() -> Self {
        IngestParams {
            extension: String::from(".csv"),
            delimiter: ',',
            contig_column: String::from("contig_id"),
            figfam_column: String::from("figfam"),
            function_column: String::from("function"),
            feature_column: String::from("feature_id"),
            hypothetical_marker: String::from("hypothetical protein"),
            genome_id_separator: '_',
        }
    }
} // end of default for IngestParams

//===========================================================

/// parameters to read subsystem exports (one file per genome)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubsystemParams {
    pub extension: String,
    pub delimiter: char,
    /// comma separated list of features
    pub features_column: String,
    pub category_column: String,
    pub subcategory_column: String,
    pub subsystem_column: String,
    pub role_column: String,
} // end of struct SubsystemParams

impl Default for SubsystemParams {
    fn default() -> Self {
        SubsystemParams {
            extension: String::from(".tsv"),
            delimiter: '\t',
            features_column: String::from("Features"),
            category_column: String::from("Category"),
            subcategory_column: String::from("Subcategory"),
            subsystem_column: String::from("Subsystem"),
            role_column: String::from("Role"),
        }
    }
} // end of default for SubsystemParams

//===========================================================

/// separator of list fields in the master (all proteins) table.
/// It is not escaped: a function text containing ';' is split in several functions
/// when a registry dump is read back, and only its last piece is reported as the family function.
pub const LIST_SEPARATOR: char = ';';

/// Gathers all parameters of a run.
/// To be dumped in the output directory.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunParams {
    ingest: IngestParams,
    subsystem: SubsystemParams,
    /// directory receiving all outputs
    output_dir: PathBuf,
    /// do we also write the column per genome layout of unique proteins
    transpose: bool,
} // end of struct RunParams

impl Default for RunParams {
    fn default() -> Self {
        RunParams {
            ingest: IngestParams::default(),
            subsystem: SubsystemParams::default(),
            output_dir: PathBuf::from("output"),
            transpose: false,
        }
    }
}

impl RunParams {
    pub fn new(ingest: IngestParams, subsystem: SubsystemParams, output_dir: PathBuf, transpose: bool) -> Self {
        RunParams {
            ingest,
            subsystem,
            output_dir,
            transpose,
        }
    }

    pub fn get_ingest_params(&self) -> &IngestParams {
        &self.ingest
    }

    pub fn get_subsystem_params(&self) -> &SubsystemParams {
        &self.subsystem
    }

    pub fn get_output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn set_output_dir(&mut self, output_dir: PathBuf) {
        self.output_dir = output_dir;
    }

    pub fn get_transpose(&self) -> bool {
        self.transpose
    }

    pub fn set_transpose(&mut self, transpose: bool) {
        self.transpose = transpose;
    }

    /// dumps parameters as json in file parameters.json of directory dirpath
    pub fn dump_json(&self, dirpath: &Path) -> Result<PathBuf> {
        //
        let filepath = dirpath.join(PARAMS_DUMP_NAME);
        //
        log::info!("dumping RunParams in json file : {:?}", filepath);
        //
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&filepath)
            .map_err(|e| {
                log::error!("RunParams dump : dump could not open file {:?}", filepath.as_os_str());
                e
            })?;
        let mut writer = BufWriter::new(file);
        to_writer_pretty(&mut writer, &self)?;
        //
        Ok(filepath)
    } // end of dump_json

    /// reload from a json dump (a file, or a directory containing parameters.json)
    pub fn reload_json(path: &Path) -> Result<Self> {
        log::info!("in reload_json");
        //
        let filepath = if path.is_dir() {
            path.join(PARAMS_DUMP_NAME)
        } else {
            path.to_path_buf()
        };
        let file = OpenOptions::new().read(true).open(&filepath).map_err(|e| {
            log::error!("RunParams reload_json : reload could not open file {:?}", filepath.as_os_str());
            e
        })?;
        let reader = BufReader::new(file);
        let params: Self = serde_json::from_reader(reader)?;
        //
        log::info!("RunParams reload, output dir : {:?}", params.output_dir);
        //
        Ok(params)
    } // end of reload_json
} // end of impl RunParams

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dump_and_reload_params() {
        let dir = tempfile::tempdir().unwrap();
        let mut ingest = IngestParams::default();
        ingest.delimiter = '\t';
        ingest.hypothetical_marker = String::from("putative");
        let params = RunParams::new(ingest, SubsystemParams::default(), PathBuf::from("results"), true);
        let dumped = params.dump_json(dir.path()).unwrap();
        assert!(dumped.ends_with(PARAMS_DUMP_NAME));
        // reload from directory or from file path give the same
        for path in [dir.path().to_path_buf(), dumped] {
            let reloaded = RunParams::reload_json(&path).unwrap();
            assert_eq!(reloaded.get_ingest_params().delimiter, '\t');
            assert_eq!(reloaded.get_ingest_params().hypothetical_marker, "putative");
            assert_eq!(reloaded.get_subsystem_params().features_column, "Features");
            assert_eq!(reloaded.get_output_dir(), Path::new("results"));
            assert!(reloaded.get_transpose());
        }
    }

    #[test]
    fn reload_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(RunParams::reload_json(&dir.path().join("nothing.json")).is_err());
    }
} // end of mod tests
