//! File-based interface to the `vsearch` aligner.
//!
//! Reads are written to a FASTA file, searched against a FASTA database of
//! primers, and the tab-separated hit table is parsed back into [`Hit`]s.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::errors::*;
use crate::parse_utils::parse_field;

pub const DEFAULT_PROGRAM: &str = "vsearch";

/// Columns requested from vsearch, in order.
pub const USERFIELDS: [&str; 15] = [
    "query", "target", "id2", "alnlen", "mism", "gaps", "qilo", "qihi", "tilo", "tihi", "qs",
    "ts", "qrow", "trow", "qstrand",
];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Strand {
    Forward,
    Reverse,
}

/// One accepted hit from the hit table.
///
/// `qstart` and `qend` are 1-based and inclusive. Hits on the reverse strand
/// are converted to forward strand coordinates when parsed.
#[derive(Clone, Debug, PartialEq)]
pub struct Hit {
    pub query: String,
    pub target: String,
    pub identity: f64,
    pub aln_len: usize,
    pub mismatches: usize,
    pub gap_opens: usize,
    pub qstart: usize,
    pub qend: usize,
    pub tstart: usize,
    pub tend: usize,
    pub qlen: usize,
    pub tlen: usize,
    pub qrow: String,
    pub trow: String,
    pub strand: Strand,
}

impl Hit {
    /// Parse one tab-separated row of the hit table.
    pub fn from_row(row: &str, line: usize) -> Result<Self> {
        let fields: Vec<&str> = row.split('\t').collect();
        if fields.len() != USERFIELDS.len() {
            return Err(Error::ParseHit {
                line,
                reason: format!(
                    "expected {} columns, found {}",
                    USERFIELDS.len(),
                    fields.len()
                ),
            });
        }

        let err = |reason| Error::ParseHit { line, reason };
        let num = |i: usize| parse_field::<usize>(fields[i], USERFIELDS[i]).map_err(err);

        let strand = match fields[14].trim() {
            "+" => Strand::Forward,
            "-" => Strand::Reverse,
            s => return Err(err(format!("unknown strand \"{s}\""))),
        };

        let mut hit = Self {
            query: fields[0].to_owned(),
            target: fields[1].to_owned(),
            identity: parse_field::<f64>(fields[2], USERFIELDS[2]).map_err(err)?,
            aln_len: num(3)?,
            mismatches: num(4)?,
            gap_opens: num(5)?,
            qstart: num(6)?,
            qend: num(7)?,
            tstart: num(8)?,
            tend: num(9)?,
            qlen: num(10)?,
            tlen: num(11)?,
            qrow: fields[12].to_owned(),
            trow: fields[13].to_owned(),
            strand,
        };

        if hit.qstart == 0 || hit.qstart > hit.qend || hit.qend > hit.qlen {
            return Err(err(format!(
                "query coordinates {}..{} do not fit a query of length {}",
                hit.qstart, hit.qend, hit.qlen
            )));
        }

        // reverse strand coordinates are relative to the reverse complemented query
        if hit.strand == Strand::Reverse {
            let qstart = hit.qlen - hit.qend + 1;
            hit.qend = hit.qlen - hit.qstart + 1;
            hit.qstart = qstart;
        }

        Ok(hit)
    }
}

/// Parse a whole hit table, skipping blank and `#` comment lines.
pub fn parse_hits(reader: impl BufRead) -> Result<Vec<Hit>> {
    let mut res = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| Error::BytesIo(Box::new(e)))?;
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        res.push(Hit::from_row(line.trim_end_matches('\r'), i + 1)?);
    }

    Ok(res)
}

pub fn write_fasta<'a, 'b>(
    writer: &mut impl Write,
    seqs: impl IntoIterator<Item = (&'a str, &'b [u8])>,
) -> std::io::Result<()> {
    for (id, seq) in seqs {
        writer.write_all(b">")?;
        writer.write_all(id.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.write_all(seq)?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}

/// Runs `vsearch --usearch_global` against a fixed primer database.
pub struct VsearchAligner {
    program: String,
    db: PathBuf,
    min_id: f64,
    threads: Option<usize>,
}

impl VsearchAligner {
    pub fn new(db: impl Into<PathBuf>, min_id: f64, threads: Option<usize>) -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_owned(),
            db: db.into(),
            min_id,
            threads,
        }
    }

    /// Use a different executable than `vsearch` on the `PATH`.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self, query: &Path, output: &Path) -> Vec<String> {
        let mut args: Vec<String> = vec![
            "--usearch_global".into(),
            query.display().to_string(),
            "--minseqlength".into(),
            "10".into(),
            "--mincols".into(),
            "10".into(),
            "--id".into(),
            format!("{:.3}", self.min_id),
            "--wordlength".into(),
            "4".into(),
            "--strand".into(),
            "both".into(),
            "--maxaccepts".into(),
            "4".into(),
            "--minwordmatches".into(),
            "3".into(),
            "--top_hits_only".into(),
            "--userfields".into(),
            USERFIELDS.join("+"),
            "--db".into(),
            self.db.display().to_string(),
            "--userout".into(),
            output.display().to_string(),
        ];

        if let Some(threads) = self.threads {
            args.push("--threads".into());
            args.push(threads.to_string());
        }

        args
    }

    /// Write the sequences to `query`, align them, and parse the hits written to `output`.
    pub fn search<'a, 'b>(
        &self,
        seqs: impl IntoIterator<Item = (&'a str, &'b [u8])>,
        query: &Path,
        output: &Path,
    ) -> Result<Vec<Hit>> {
        {
            let mut writer = BufWriter::new(File::create(query).map_err(|e| file_io(query, e))?);
            write_fasta(&mut writer, seqs).map_err(|e| file_io(query, e))?;
            writer.flush().map_err(|e| file_io(query, e))?;
        }

        self.call(query, output)?;

        let reader = BufReader::new(File::open(output).map_err(|e| self.failure(e.to_string()))?);
        parse_hits(reader)
    }

    fn call(&self, query: &Path, output: &Path) -> Result<()> {
        let args = self.args(query, output);
        log::debug!("Running {} {}", self.program, args.join(" "));

        let status = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| self.failure(format!("could not be started: {e}")))?;

        if status.success() {
            Ok(())
        } else {
            Err(self.failure(format!("exited with {status}")))
        }
    }

    fn failure(&self, reason: String) -> Error {
        Error::ExternalTool {
            program: self.program.clone(),
            reason,
        }
    }
}
