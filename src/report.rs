use std::fmt;
use std::io::{self, Write};

use crate::matcher::*;
use crate::trimmable_reads::*;

/// Write the per-read log as tab-separated values with a header row.
///
/// Fields that do not apply to unmatched reads are left empty.
pub fn write_log<'a>(
    writer: &mut (dyn Write + Send),
    rows: impl IntoIterator<Item = LogRow<'a>>,
) -> io::Result<()> {
    writeln!(writer, "{}", LOG_COLUMNS.join("\t"))?;

    for row in rows {
        write!(writer, "{}\t{}\t{}\t", row.read_id, row.match_type, row.trimmed_length)?;
        if let Some(mismatches) = row.mismatches {
            write!(writer, "{mismatches}")?;
        }
        writer.write_all(b"\t")?;
        if let Some(primer) = row.observed_primer {
            writer.write_all(primer)?;
        }
        writer.write_all(b"\n")?;
    }

    Ok(())
}

/// Counts of reads per outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub complete: usize,
    pub partial: usize,
    pub alignment: usize,
    pub unmatched: usize,
    /// Reads written after the length filter.
    pub written: usize,
}

impl RunSummary {
    pub fn new(reads: &TrimmableReads, min_length: usize) -> Self {
        let mut res = Self {
            total: reads.len(),
            written: reads.trimmed_reads(min_length).count(),
            ..Default::default()
        };

        for (_, m) in reads.iter() {
            let count = match m.map(|m| m.method) {
                Some(Complete) => &mut res.complete,
                Some(Partial) => &mut res.partial,
                Some(Alignment) => &mut res.alignment,
                None => &mut res.unmatched,
            };
            *count += 1;
        }

        res
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} reads: {} complete, {} partial, {} alignment, {} unmatched; {} written",
            self.total, self.complete, self.partial, self.alignment, self.unmatched, self.written
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reads() -> TrimmableReads {
        let mut reads = TrimmableReads::from_fastq([
            ("r1", "ACGTACGTAA", "FFFFFFFFFF"),
            ("r2 lane 1", "GGGGGGGGGG", "FFFFFFFFFF"),
            ("r3", "TTTTTTTTTT", "FFFFFFFFFF"),
        ])
        .unwrap();
        reads
            .register_match("r1", PrimerMatch::new(Complete, 4, 1, b"ACGTAA"))
            .unwrap();
        reads
            .register_match("r3", PrimerMatch::new(Partial, 0, 0, b"TTTTTTTTTT"))
            .unwrap();
        reads
    }

    #[test]
    fn test_write_log() {
        let mut buf = Vec::new();
        write_log(&mut buf, reads().log_rows()).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "read_id\tmatch_type\ttrimmed_length\tmismatches\tobserved_primer\n\
             r1\tComplete\t4\t1\tACGTAA\n\
             r2\tNo match\t10\t\t\n\
             r3\tPartial\t0\t0\tTTTTTTTTTT\n"
        );
    }

    #[test]
    fn test_run_summary() {
        let summary = RunSummary::new(&reads(), 1);
        assert_eq!(
            summary,
            RunSummary {
                total: 3,
                complete: 1,
                partial: 1,
                alignment: 0,
                unmatched: 1,
                written: 2,
            }
        );
        assert_eq!(
            summary.to_string(),
            "3 reads: 1 complete, 1 partial, 0 alignment, 1 unmatched; 2 written"
        );
    }
}
