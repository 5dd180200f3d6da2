use rustc_hash::FxHashMap;

use crate::dna::*;
use crate::matcher::*;
use crate::query_set::QuerySet;

pub const MAX_MISMATCHES: usize = 3;

/// Finds whole primers in a read, allowing a small number of substitutions.
///
/// For each mismatch count `k` up to the maximum, every query is expanded into
/// the set of patterns that differ from it at exactly `k` positions. Two kinds
/// of pattern are generated per set of positions: the query with those
/// positions replaced by `N`, and every concrete sequence with a different
/// base at each of those positions.
///
/// Patterns are compared literally against the read, so an `N` in a pattern
/// only lines up with an `N` in the read. A read carrying ambiguous bases can
/// therefore match a wildcard pattern and be reported with that tier's
/// mismatch count even though its bases are not a literal match. This is a
/// known approximation.
///
/// The number of patterns per query grows like `C(len, k) * 3^k`, so the
/// maximum number of mismatches is capped at [`MAX_MISMATCHES`].
pub struct CompleteMatcher {
    tiers: Vec<PatternTier>,
}

/// All patterns with exactly `mismatches` substitutions.
struct PatternTier {
    mismatches: usize,
    // distinct pattern lengths, ascending
    lengths: Vec<usize>,
    // pattern -> generation order, for breaking ties at the same position
    patterns: FxHashMap<Vec<u8>, usize>,
}

impl PatternTier {
    fn new(queries: &QuerySet, mismatches: usize) -> Result<Self> {
        let mut patterns = FxHashMap::default();
        let mut lengths = Vec::new();

        let mut add = |p: Vec<u8>| {
            if !lengths.contains(&p.len()) {
                lengths.push(p.len());
            }
            let order = patterns.len();
            patterns.entry(p).or_insert(order);
        };

        for query in queries.iter() {
            for idxs in combinations(query.len(), mismatches) {
                add(mask_positions_with_wildcard(query, &idxs));

                let mut q = query.to_owned();
                for &i in &idxs {
                    q[i] = complement_excluding(q[i])?;
                }
                deambiguate(&q)?.into_iter().for_each(&mut add);
            }
        }

        lengths.sort_unstable();

        Ok(Self {
            mismatches,
            lengths,
            patterns,
        })
    }

    /// Leftmost `(start, len)` of any pattern in the sequence.
    fn find(&self, seq: &[u8]) -> Option<(usize, usize)> {
        for start in 0..seq.len() {
            let mut best: Option<(usize, usize)> = None;

            for &len in &self.lengths {
                if start + len > seq.len() {
                    break;
                }
                if let Some(&order) = self.patterns.get(&seq[start..start + len]) {
                    if best.map_or(true, |(o, _)| order < o) {
                        best = Some((order, len));
                    }
                }
            }

            if let Some((_, len)) = best {
                return Some((start, len));
            }
        }

        None
    }
}

impl CompleteMatcher {
    const NAME: &'static str = "complete matching";

    /// Precompute the patterns for `0..=max_mismatches` substitutions.
    ///
    /// With `revcomp`, the reverse complement of each query is searched for too.
    pub fn new(queries: &QuerySet, max_mismatches: usize, revcomp: bool) -> Result<Self> {
        if max_mismatches > MAX_MISMATCHES {
            return Err(Error::TooManyMismatches(max_mismatches));
        }

        let queries = if revcomp {
            queries.with_reverse_complements()?
        } else {
            queries.clone()
        };

        let tiers = (0..=max_mismatches)
            .map(|k| PatternTier::new(&queries, k))
            .collect::<Result<Vec<_>>>()?;

        for tier in &tiers {
            log::debug!(
                "{} patterns with {} mismatches for {} queries",
                tier.patterns.len(),
                tier.mismatches,
                queries.len()
            );
        }

        Ok(Self { tiers })
    }

    pub fn max_mismatches(&self) -> usize {
        self.tiers.len() - 1
    }

    /// Number of distinct patterns with exactly `mismatches` substitutions.
    pub fn num_patterns(&self, mismatches: usize) -> usize {
        self.tiers.get(mismatches).map_or(0, |t| t.patterns.len())
    }
}

impl Matcher for CompleteMatcher {
    fn find_match(&self, seq: &[u8]) -> Result<Option<PrimerMatch>> {
        let res = self.tiers.iter().find_map(|tier| {
            tier.find(seq).map(|(start, len)| {
                PrimerMatch::new(Complete, start, tier.mismatches, &seq[start..start + len])
            })
        });
        Ok(res)
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}
