use crate::dna::*;
use crate::matcher::*;
use crate::query_set::QuerySet;

/// Finds primers that run off either end of a read.
///
/// Short reads are often sequenced into the primer and end before the primer
/// does. No mismatches are tolerated.
pub struct PartialMatcher {
    min_length: usize,
    // the tail of a primer at the start of the read
    left_partials: Vec<Vec<u8>>,
    // the head of a primer at the end of the read
    right_partials: Vec<Vec<u8>>,
}

impl PartialMatcher {
    const NAME: &'static str = "partial matching";

    /// Build the partial patterns for every query, longest first.
    ///
    /// A `min_length` of zero is treated as one so that the empty pattern is never used.
    pub fn new(queries: &QuerySet, min_length: usize, revcomp: bool) -> Result<Self> {
        let min_length = min_length.max(1);
        let queries = if revcomp {
            queries.with_reverse_complements()?
        } else {
            queries.clone()
        };

        if queries.min_query_len().is_some_and(|l| l <= min_length) {
            log::warn!(
                "Some primers are not longer than the minimum partial length ({}), so they will never be partially matched",
                min_length
            );
        }

        let mut left_partials = Vec::new();
        let mut right_partials = Vec::new();

        for query in queries.iter() {
            left_partials.extend(partial_prefixes_min_length(query, min_length).map(|s| s.to_owned()));
            right_partials.extend(partial_suffixes_min_length(query, min_length).map(|s| s.to_owned()));
        }

        log::debug!(
            "{} left and {} right partial patterns of at least {} bp",
            left_partials.len(),
            right_partials.len(),
            min_length
        );

        Ok(Self {
            min_length,
            left_partials,
            right_partials,
        })
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }
}

impl Matcher for PartialMatcher {
    fn find_match(&self, seq: &[u8]) -> Result<Option<PrimerMatch>> {
        if let Some(p) = self.left_partials.iter().find(|p| seq.starts_with(p)) {
            return Ok(Some(PrimerMatch::new(Partial, 0, 0, p)));
        }

        let res = self
            .right_partials
            .iter()
            .find(|p| seq.ends_with(p))
            .map(|p| PrimerMatch::new(Partial, seq.len() - p.len(), 0, p));
        Ok(res)
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}
