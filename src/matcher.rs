use std::fmt;

use crate::errors::*;

pub mod complete;
pub use complete::*;

pub mod partial;
pub use partial::*;

pub mod alignment;
pub use alignment::*;

pub use MatchMethod::*;

/// How a primer occurrence was found.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MatchMethod {
    Complete,
    Partial,
    Alignment,
}

impl MatchMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Complete => "Complete",
            Partial => "Partial",
            Alignment => "Alignment",
        }
    }
}

impl fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One detected primer occurrence in a read.
///
/// Everything from `start` to the end of the read is primer and gets trimmed.
#[derive(Clone, Debug, PartialEq)]
pub struct PrimerMatch {
    pub method: MatchMethod,
    pub start: usize,
    pub mismatches: usize,
    pub primer_seq: Vec<u8>,
}

impl PrimerMatch {
    pub fn new(method: MatchMethod, start: usize, mismatches: usize, primer_seq: &[u8]) -> Self {
        Self {
            method,
            start,
            mismatches,
            primer_seq: primer_seq.to_owned(),
        }
    }
}

/// A stage of the matching cascade.
pub trait Matcher {
    /// Look for a primer in a single read sequence.
    fn find_match(&self, seq: &[u8]) -> Result<Option<PrimerMatch>>;

    /// Look for primers in a batch of `(id, seq)` pairs and return the ids that matched.
    ///
    /// Stages that work on whole batches at once override this.
    fn find_in_seqs(&self, seqs: &[(&str, &[u8])]) -> Result<Vec<(String, PrimerMatch)>> {
        let mut res = Vec::new();
        for &(id, seq) in seqs {
            if let Some(m) = self.find_match(seq)? {
                res.push((id.to_owned(), m));
            }
        }
        Ok(res)
    }

    fn name(&self) -> &'static str;
}

impl<M: Matcher + ?Sized> Matcher for Box<M> {
    fn find_match(&self, seq: &[u8]) -> Result<Option<PrimerMatch>> {
        (**self).find_match(seq)
    }

    fn find_in_seqs(&self, seqs: &[(&str, &[u8])]) -> Result<Vec<(String, PrimerMatch)>> {
        (**self).find_in_seqs(seqs)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
