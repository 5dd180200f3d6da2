use std::fmt;

use memchr::memchr2;

use crate::dna::validate_iupac;
use crate::errors::*;
use crate::parse_utils::trim_ascii_whitespace;

/// A single fastq record.
#[derive(Debug, Clone, PartialEq)]
pub struct Read {
    id: String,
    desc: Vec<u8>,
    seq: Vec<u8>,
    qual: Vec<u8>,
}

impl Read {
    pub fn from_fastq(desc: &[u8], seq: &[u8], qual: &[u8]) -> Result<Self> {
        let id = read_id(desc);

        if seq.len() != qual.len() {
            return Err(Error::QualityLengthMismatch {
                id,
                seq_len: seq.len(),
                qual_len: qual.len(),
            });
        }
        validate_iupac(seq)?;

        Ok(Self {
            id,
            desc: desc.to_owned(),
            seq: seq.to_owned(),
            qual: qual.to_owned(),
        })
    }

    pub fn to_fastq(&self) -> (&[u8], &[u8], &[u8]) {
        (&self.desc, &self.seq, &self.qual)
    }

    /// The fastq record cut down to the bases before `end`.
    pub fn to_fastq_truncated(&self, end: usize) -> (&[u8], &[u8], &[u8]) {
        let end = end.min(self.seq.len());
        (&self.desc, &self.seq[..end], &self.qual[..end])
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn desc(&self) -> &[u8] {
        &self.desc
    }

    pub fn seq(&self) -> &[u8] {
        &self.seq
    }

    pub fn qual(&self) -> &[u8] {
        &self.qual
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }
}

/// The first whitespace-delimited token of a fastq description line.
pub fn read_id(desc: &[u8]) -> String {
    let Some(desc) = trim_ascii_whitespace(desc) else {
        return String::new();
    };
    let end = memchr2(b' ', b'\t', desc).unwrap_or(desc.len());
    utf8(&desc[..end])
}

impl fmt::Display for Read {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "name {}", utf8(&self.desc))?;
        writeln!(f, "seq  {}", utf8(&self.seq))?;
        writeln!(f, "qual {}", utf8(&self.qual))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_id() {
        assert_eq!(read_id(b"seq1"), "seq1");
        assert_eq!(read_id(b"M01 1:N:0:1 extra"), "M01");
        assert_eq!(read_id(b"  lead\tdesc"), "lead");
        assert_eq!(read_id(b""), "");
    }

    #[test]
    fn test_from_fastq() {
        let read = Read::from_fastq(b"r1 sample=A", b"ACGTN", b"FFFF#").unwrap();
        assert_eq!(read.id(), "r1");
        assert_eq!(read.desc(), b"r1 sample=A");
        assert_eq!(read.to_fastq_truncated(2), (&b"r1 sample=A"[..], &b"AC"[..], &b"FF"[..]));
        assert_eq!(read.to_fastq_truncated(10).1, b"ACGTN");
    }

    #[test]
    fn test_from_fastq_errors() {
        assert!(matches!(
            Read::from_fastq(b"r1", b"ACGT", b"FFF"),
            Err(Error::QualityLengthMismatch { .. })
        ));
        assert!(matches!(
            Read::from_fastq(b"r1", b"AC.T", b"FFFF"),
            Err(Error::InvalidBase { base: b'.', .. })
        ));
    }
}
