use rustc_hash::{FxHashMap, FxHashSet};

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::errors::*;
use crate::matcher::*;
use crate::query_set::QuerySet;
use crate::vsearch::*;

const PRIMERS_FASTA: &str = "primers.fasta";
const READS_FASTA: &str = "unmatched_reads.fasta";
const HITS_TXT: &str = "hits.txt";

pub const DEFAULT_MIN_ID: f64 = 0.85;

/// Finds approximate primer occurrences by aligning reads with vsearch.
///
/// All reads in a batch are aligned with a single vsearch run. Only the first
/// accepted hit for each read is used.
pub struct AlignmentMatcher {
    dir: WorkDir,
    aligner: VsearchAligner,
}

enum WorkDir {
    Temp(TempDir),
    Kept(PathBuf),
}

impl WorkDir {
    fn path(&self) -> &Path {
        match self {
            WorkDir::Temp(dir) => dir.path(),
            WorkDir::Kept(path) => path,
        }
    }
}

impl AlignmentMatcher {
    const NAME: &'static str = "alignment matching";

    /// Write the primer database into `dir`, or into a temporary directory if no directory is given.
    ///
    /// A given directory is created if needed and left in place afterwards.
    pub fn new(
        queries: &QuerySet,
        dir: Option<&Path>,
        min_id: f64,
        threads: Option<usize>,
    ) -> Result<Self> {
        let dir = match dir {
            Some(path) => {
                std::fs::create_dir_all(path).map_err(|e| file_io(path, e))?;
                WorkDir::Kept(path.to_owned())
            }
            None => WorkDir::Temp(
                tempfile::Builder::new()
                    .prefix("primertrim")
                    .tempdir()
                    .map_err(|e| Error::BytesIo(Box::new(e)))?,
            ),
        };

        let db = dir.path().join(PRIMERS_FASTA);
        {
            let mut writer = BufWriter::new(File::create(&db).map_err(|e| file_io(&db, e))?);
            let names: Vec<String> = (0..queries.len()).map(|i| format!("primer{i}")).collect();
            write_fasta(&mut writer, names.iter().map(|n| n.as_str()).zip(queries.iter()))
                .map_err(|e| file_io(&db, e))?;
            writer.flush().map_err(|e| file_io(&db, e))?;
        }

        Ok(Self {
            aligner: VsearchAligner::new(db, min_id, threads),
            dir,
        })
    }

    /// Run a different aligner executable that speaks the vsearch protocol.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.aligner = self.aligner.with_program(program);
        self
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}

/// Convert a hit in forward strand coordinates into a match in `seq`.
pub fn hit_to_match(hit: &Hit, seq: &[u8]) -> PrimerMatch {
    let start = (hit.qstart - 1).min(seq.len());
    let end = hit.qend.clamp(start, seq.len());
    PrimerMatch::new(
        Alignment,
        start,
        hit.mismatches + hit.gap_opens,
        &seq[start..end],
    )
}

impl Matcher for AlignmentMatcher {
    fn find_match(&self, seq: &[u8]) -> Result<Option<PrimerMatch>> {
        let mut res = self.find_in_seqs(&[("query", seq)])?;
        Ok(res.pop().map(|(_, m)| m))
    }

    fn find_in_seqs(&self, seqs: &[(&str, &[u8])]) -> Result<Vec<(String, PrimerMatch)>> {
        if seqs.is_empty() {
            return Ok(Vec::new());
        }

        let hits = self.aligner.search(
            seqs.iter().copied(),
            &self.dir.path().join(READS_FASTA),
            &self.dir.path().join(HITS_TXT),
        )?;
        log::debug!("{} hits for {} reads", hits.len(), seqs.len());

        let by_id: FxHashMap<&str, &[u8]> = seqs.iter().copied().collect();
        let mut seen = FxHashSet::default();
        let mut res = Vec::new();

        for hit in &hits {
            let Some(&seq) = by_id.get(hit.query.as_str()) else {
                log::warn!("Ignoring hit for unknown read {}", hit.query);
                continue;
            };
            if seen.insert(hit.query.as_str()) {
                res.push((hit.query.clone(), hit_to_match(hit, seq)));
            }
        }

        Ok(res)
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}
