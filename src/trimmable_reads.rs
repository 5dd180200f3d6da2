use rustc_hash::FxHashMap;

use crate::errors::*;
use crate::matcher::PrimerMatch;
use crate::read::Read;

/// Column names of the rows produced by [`TrimmableReads::log_rows`].
pub const LOG_COLUMNS: [&str; 5] = [
    "read_id",
    "match_type",
    "trimmed_length",
    "mismatches",
    "observed_primer",
];

pub const NO_MATCH: &str = "No match";

/// All reads of a run together with the primer match found for each one.
///
/// A read starts out unmatched and is matched at most once. Reads are kept in
/// input order and are never removed.
#[derive(Debug, Default)]
pub struct TrimmableReads {
    reads: Vec<(Read, Option<PrimerMatch>)>,
    idxs: FxHashMap<String, usize>,
}

/// One row of the per-read log.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRow<'a> {
    pub read_id: &'a str,
    pub match_type: &'static str,
    pub trimmed_length: usize,
    pub mismatches: Option<usize>,
    pub observed_primer: Option<&'a [u8]>,
}

impl TrimmableReads {
    pub fn new(reads: impl IntoIterator<Item = Read>) -> Result<Self> {
        let mut res = Self::default();

        for read in reads {
            if res.idxs.contains_key(read.id()) {
                return Err(Error::DuplicateReadId(read.id().to_owned()));
            }
            res.idxs.insert(read.id().to_owned(), res.reads.len());
            res.reads.push((read, None));
        }

        Ok(res)
    }

    /// Build from `(description, sequence, quality)` fastq records.
    pub fn from_fastq<D, S, Q>(records: impl IntoIterator<Item = (D, S, Q)>) -> Result<Self>
    where
        D: AsRef<[u8]>,
        S: AsRef<[u8]>,
        Q: AsRef<[u8]>,
    {
        let reads = records
            .into_iter()
            .map(|(d, s, q)| Read::from_fastq(d.as_ref(), s.as_ref(), q.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Self::new(reads)
    }

    /// `(id, sequence)` of every read without a match, in input order.
    pub fn unmatched_sequences(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.reads
            .iter()
            .filter(|(_, m)| m.is_none())
            .map(|(read, _)| (read.id(), read.seq()))
    }

    pub fn register_match(&mut self, id: &str, primer_match: PrimerMatch) -> Result<()> {
        let &idx = self
            .idxs
            .get(id)
            .ok_or_else(|| Error::UnknownReadId(id.to_owned()))?;
        let (read, m) = &mut self.reads[idx];

        if m.is_some() {
            return Err(Error::AlreadyMatched(id.to_owned()));
        }
        if primer_match.start > read.len() {
            return Err(Error::MatchOutOfBounds {
                id: id.to_owned(),
                start: primer_match.start,
                len: read.len(),
            });
        }

        *m = Some(primer_match);
        Ok(())
    }

    /// Fastq records with primers cut off, skipping those shorter than `min_length` after trimming.
    pub fn trimmed_reads(&self, min_length: usize) -> impl Iterator<Item = (&[u8], &[u8], &[u8])> {
        self.reads
            .iter()
            .map(|(read, m)| match m {
                Some(m) => read.to_fastq_truncated(m.start),
                None => read.to_fastq(),
            })
            .filter(move |(_, seq, _)| seq.len() >= min_length)
    }

    pub fn log_rows(&self) -> impl Iterator<Item = LogRow<'_>> {
        self.reads.iter().map(|(read, m)| match m {
            Some(m) => LogRow {
                read_id: read.id(),
                match_type: m.method.as_str(),
                trimmed_length: m.start,
                mismatches: Some(m.mismatches),
                observed_primer: Some(m.primer_seq.as_slice()),
            },
            None => LogRow {
                read_id: read.id(),
                match_type: NO_MATCH,
                trimmed_length: read.len(),
                mismatches: None,
                observed_primer: None,
            },
        })
    }

    /// Every read with its match, in input order.
    pub fn iter(&self) -> impl Iterator<Item = (&Read, Option<&PrimerMatch>)> {
        self.reads.iter().map(|(read, m)| (read, m.as_ref()))
    }

    pub fn get(&self, id: &str) -> Option<(&Read, Option<&PrimerMatch>)> {
        self.idxs.get(id).map(|&i| {
            let (read, m) = &self.reads[i];
            (read, m.as_ref())
        })
    }

    pub fn len(&self) -> usize {
        self.reads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reads.is_empty()
    }

    pub fn num_matched(&self) -> usize {
        self.reads.iter().filter(|(_, m)| m.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::*;

    type Record = (&'static str, &'static str, &'static str);

    const READ1: Record = ("seq1", "ATGTCATGACTTGACTGCGG", "FFFFFFFFFFFFFFFFFFFF");
    const READ2: Record = ("seq2", "AGTCACGCTGACTGCATTGA", "FFFFFFFFFFFFFFFFFFFF");
    const READ3: Record = ("seq3", "TACGTCATGCATCGTAGTAA", "FFFFFFFFFFFFFFFFFFFF");
    const READ2_TRIM10: Record = ("seq2", "AGTCACGCTG", "FFFFFFFFFF");
    const READ2_TRIM0: Record = ("seq2", "", "");

    fn reads() -> TrimmableReads {
        TrimmableReads::from_fastq([READ1, READ2, READ3]).unwrap()
    }

    fn complete_at(start: usize) -> PrimerMatch {
        PrimerMatch::new(Complete, start, 0, b"ACTGCATTGA")
    }

    fn trimmed(t: &TrimmableReads, min_length: usize) -> Vec<(String, String, String)> {
        t.trimmed_reads(min_length)
            .map(|(d, s, q)| (utf8(d), utf8(s), utf8(q)))
            .collect()
    }

    fn owned(records: &[Record]) -> Vec<(String, String, String)> {
        records
            .iter()
            .map(|&(d, s, q)| (d.to_owned(), s.to_owned(), q.to_owned()))
            .collect()
    }

    #[test]
    fn test_register_match() {
        let mut t = reads();
        let ids = |t: &TrimmableReads| {
            t.unmatched_sequences()
                .map(|(id, _)| id.to_owned())
                .collect::<Vec<_>>()
        };

        assert_eq!(ids(&t), ["seq1", "seq2", "seq3"]);
        assert_eq!(
            t.unmatched_sequences().next(),
            Some(("seq1", &b"ATGTCATGACTTGACTGCGG"[..]))
        );

        t.register_match("seq2", complete_at(10)).unwrap();
        assert_eq!(ids(&t), ["seq1", "seq3"]);
        assert_eq!(t.num_matched(), 1);
    }

    #[test]
    fn test_register_match_errors() {
        let mut t = reads();
        t.register_match("seq2", complete_at(10)).unwrap();

        assert!(matches!(
            t.register_match("seq2", complete_at(5)),
            Err(Error::AlreadyMatched(id)) if id == "seq2"
        ));
        assert!(matches!(
            t.register_match("seq9", complete_at(5)),
            Err(Error::UnknownReadId(_))
        ));
        assert!(matches!(
            t.register_match("seq1", complete_at(21)),
            Err(Error::MatchOutOfBounds { start: 21, len: 20, .. })
        ));
        // the failed registrations changed nothing
        assert_eq!(t.get("seq2").unwrap().1, Some(&complete_at(10)));
        assert_eq!(t.get("seq1").unwrap().1, None);
    }

    #[test]
    fn test_duplicate_read_id() {
        let dup = ("seq1 second", "ACGT", "FFFF");
        assert!(matches!(
            TrimmableReads::from_fastq([READ1, READ2, dup]),
            Err(Error::DuplicateReadId(id)) if id == "seq1"
        ));
    }

    #[test]
    fn test_output() {
        let mut t = reads();
        assert_eq!(trimmed(&t, 0), owned(&[READ1, READ2, READ3]));

        t.register_match("seq2", complete_at(10)).unwrap();
        assert_eq!(trimmed(&t, 0), owned(&[READ1, READ2_TRIM10, READ3]));

        let no_match = |id| LogRow {
            read_id: id,
            match_type: NO_MATCH,
            trimmed_length: 20,
            mismatches: None,
            observed_primer: None,
        };
        let rows: Vec<LogRow> = t.log_rows().collect();
        assert_eq!(
            rows,
            [
                no_match("seq1"),
                LogRow {
                    read_id: "seq2",
                    match_type: "Complete",
                    trimmed_length: 10,
                    mismatches: Some(0),
                    observed_primer: Some(&b"ACTGCATTGA"[..]),
                },
                no_match("seq3"),
            ]
        );
    }

    #[test]
    fn test_output_min_length() {
        let mut t = reads();
        t.register_match("seq2", complete_at(10)).unwrap();

        assert_eq!(trimmed(&t, 0), owned(&[READ1, READ2_TRIM10, READ3]));
        assert_eq!(trimmed(&t, 15), owned(&[READ1, READ3]));
        assert!(trimmed(&t, 30).is_empty());
    }

    #[test]
    fn test_output_zero_length() {
        let mut t = reads();
        t.register_match("seq2", complete_at(0)).unwrap();

        assert_eq!(trimmed(&t, 0), owned(&[READ1, READ2_TRIM0, READ3]));
        assert_eq!(trimmed(&t, 1), owned(&[READ1, READ3]));
    }

    #[test]
    fn test_insertion_order_kept() {
        let mut t = reads();
        t.register_match("seq3", complete_at(4)).unwrap();
        t.register_match("seq1", PrimerMatch::new(Partial, 2, 0, b"AT")).unwrap();

        let ids: Vec<&str> = t.log_rows().map(|r| r.read_id).collect();
        assert_eq!(ids, ["seq1", "seq2", "seq3"]);
        let types: Vec<&str> = t.log_rows().map(|r| r.match_type).collect();
        assert_eq!(types, ["Partial", NO_MATCH, "Complete"]);
    }
}
