use serde::{Deserialize, Serialize};

use std::path::PathBuf;

use crate::errors::*;
use crate::matcher::DEFAULT_MIN_ID;
use crate::query_set::QuerySet;
use crate::vsearch::DEFAULT_PROGRAM;

/// Settings for one trimming run.
///
/// Every field except `primers` has a default, so a YAML document can be as
/// short as a list of primers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrimOptions {
    pub primers: Vec<String>,
    /// Also search for the reverse complement of each primer.
    pub revcomp: bool,
    /// Substitutions allowed in the complete matching stage.
    pub mismatches: usize,
    /// Shortest primer overhang accepted in the partial matching stage.
    pub min_partial: usize,
    pub alignment: bool,
    /// Where the alignment stage keeps its files. A temporary directory is used if unset.
    pub alignment_dir: Option<PathBuf>,
    pub min_id: f64,
    pub threads: Option<usize>,
    /// Reads shorter than this after trimming are not written.
    pub min_length: usize,
    pub vsearch_program: String,
}

impl Default for TrimOptions {
    fn default() -> Self {
        Self {
            primers: Vec::new(),
            revcomp: true,
            mismatches: 1,
            min_partial: 8,
            alignment: false,
            alignment_dir: None,
            min_id: DEFAULT_MIN_ID,
            threads: None,
            min_length: 1,
            vsearch_program: DEFAULT_PROGRAM.to_owned(),
        }
    }
}

impl TrimOptions {
    pub fn new(primers: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            primers: primers.into_iter().map(|p| p.into()).collect(),
            ..Default::default()
        }
    }

    pub fn from_yaml(yaml: impl AsRef<[u8]>) -> Result<Self> {
        serde_yaml::from_slice(yaml.as_ref()).map_err(|e| Error::ParseConfig {
            source: Box::new(e),
        })
    }

    pub fn from_yaml_file(file: impl AsRef<std::path::Path>) -> Result<Self> {
        let file = file.as_ref();
        let bytes = std::fs::read(file).map_err(|e| file_io(file, e))?;
        Self::from_yaml(bytes)
    }

    /// Deambiguate the primers, in order.
    pub fn query_set(&self) -> Result<QuerySet> {
        QuerySet::from_primers(self.primers.iter().map(|p| p.to_ascii_uppercase()))
    }
}
