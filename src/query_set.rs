use crate::dna::*;
use crate::errors::*;

/// Ordered set of unambiguous primer sequences to search for.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QuerySet {
    queries: Vec<Vec<u8>>,
}

impl QuerySet {
    /// Build a query set from sequences that are already unambiguous.
    pub fn new(queries: impl IntoIterator<Item = impl AsRef<[u8]>>) -> Result<Self> {
        let mut res = Self::default();
        for q in queries {
            let q = q.as_ref();
            if q.is_empty() {
                return Err(Error::EmptyPrimer);
            }
            if let Some(&b) = q.iter().find(|&&b| complement(b).is_none()) {
                return Err(Error::InvalidBase {
                    base: b,
                    seq: utf8(q),
                });
            }
            res.push(q.to_owned());
        }
        Ok(res)
    }

    /// Deambiguate each primer in order and collect every concrete sequence.
    pub fn from_primers(primers: impl IntoIterator<Item = impl AsRef<[u8]>>) -> Result<Self> {
        let mut res = Self::default();
        for primer in primers {
            if primer.as_ref().is_empty() {
                return Err(Error::EmptyPrimer);
            }
            deambiguate(primer.as_ref())?
                .into_iter()
                .for_each(|q| res.push(q));
        }
        Ok(res)
    }

    /// Append the reverse complement of every query after the forward queries.
    pub fn with_reverse_complements(&self) -> Result<Self> {
        let mut res = self.clone();
        for q in &self.queries {
            res.push(reverse_complement(q)?);
        }
        Ok(res)
    }

    fn push(&mut self, query: Vec<u8>) {
        if !self.queries.contains(&query) {
            self.queries.push(query);
        }
    }

    pub fn queries(&self) -> &[Vec<u8>] {
        &self.queries
    }

    pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.queries.iter().map(|q| q.as_slice())
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    pub fn min_query_len(&self) -> Option<usize> {
        self.queries.iter().map(|q| q.len()).min()
    }
}
