//! Nucleotide alphabet utilities.
//!
//! Sequences are plain byte slices in the upper case IUPAC alphabet. Primers
//! may use any ambiguity code, and [`deambiguate`] expands them into the
//! concrete sequences that the matchers search for.

use crate::errors::*;

/// The universal wildcard base.
pub const WILDCARD: u8 = b'N';

const IUPAC_BASES: &[u8] = b"TCAGRYMKSWHBVDN";

static AMBIGUOUS_BASES: [&[u8]; 256] = {
    const EMPTY: &[u8] = b"";
    let mut table = [EMPTY; 256];
    table[b'T' as usize] = b"T";
    table[b'C' as usize] = b"C";
    table[b'A' as usize] = b"A";
    table[b'G' as usize] = b"G";
    table[b'R' as usize] = b"AG";
    table[b'Y' as usize] = b"TC";
    table[b'M' as usize] = b"CA";
    table[b'K' as usize] = b"TG";
    table[b'S' as usize] = b"CG";
    table[b'W' as usize] = b"TA";
    table[b'H' as usize] = b"TCA";
    table[b'B' as usize] = b"TCG";
    table[b'V' as usize] = b"CAG";
    table[b'D' as usize] = b"TAG";
    table[b'N' as usize] = b"TCAG";
    table
};

static COMPLEMENT: [u8; 256] = {
    let mut comp = [0u8; 256];
    comp[b'A' as usize] = b'T';
    comp[b'T' as usize] = b'A';
    comp[b'C' as usize] = b'G';
    comp[b'G' as usize] = b'C';
    comp
};

fn invalid_base(base: u8, seq: &[u8]) -> Error {
    Error::InvalidBase {
        base,
        seq: utf8(seq),
    }
}

pub fn is_iupac(base: u8) -> bool {
    IUPAC_BASES.contains(&base)
}

pub fn validate_iupac(seq: &[u8]) -> Result<()> {
    match seq.iter().find(|&&b| !is_iupac(b)) {
        Some(&b) => Err(invalid_base(b, seq)),
        None => Ok(()),
    }
}

/// Expand every ambiguity code in `seq` into the full set of concrete sequences.
///
/// The result is the Cartesian product of the per-position base sets, with the
/// last position varying fastest. Its size is exponential in the number of
/// ambiguous positions.
pub fn deambiguate(seq: &[u8]) -> Result<Vec<Vec<u8>>> {
    let mut choices = Vec::with_capacity(seq.len());
    for &b in seq {
        let bases = AMBIGUOUS_BASES[b as usize];
        if bases.is_empty() {
            return Err(invalid_base(b, seq));
        }
        choices.push(bases);
    }

    let mut res = vec![Vec::with_capacity(seq.len())];

    for bases in choices {
        let mut next = Vec::with_capacity(res.len() * bases.len());
        for prefix in &res {
            for &b in bases {
                let mut s = prefix.clone();
                s.push(b);
                next.push(s);
            }
        }
        res = next;
    }

    Ok(res)
}

pub fn complement(base: u8) -> Option<u8> {
    match COMPLEMENT[base as usize] {
        0 => None,
        c => Some(c),
    }
}

/// Reverse complement of an unambiguous sequence.
pub fn reverse_complement(seq: &[u8]) -> Result<Vec<u8>> {
    seq.iter()
        .rev()
        .map(|&b| complement(b).ok_or_else(|| invalid_base(b, seq)))
        .collect()
}

/// The ambiguity code that matches any base except `base`.
pub fn complement_excluding(base: u8) -> Result<u8> {
    match base {
        b'T' => Ok(b'V'),
        b'C' => Ok(b'D'),
        b'A' => Ok(b'B'),
        b'G' => Ok(b'H'),
        _ => Err(invalid_base(base, &[base])),
    }
}

/// Suffixes of `seq` with lengths in `min_length..seq.len()`, longest first.
///
/// These are what remains of the sequence when it hangs off the left end of
/// a read.
pub fn partial_prefixes_min_length(seq: &[u8], min_length: usize) -> impl Iterator<Item = &[u8]> {
    let max_drop = seq.len().saturating_sub(min_length);
    (1..=max_drop).map(move |drop| &seq[drop..])
}

/// Prefixes of `seq` with lengths in `min_length..seq.len()`, longest first.
pub fn partial_suffixes_min_length(seq: &[u8], min_length: usize) -> impl Iterator<Item = &[u8]> {
    let max_drop = seq.len().saturating_sub(min_length);
    (1..=max_drop).map(move |drop| &seq[..seq.len() - drop])
}

pub fn mask_positions_with_wildcard(seq: &[u8], positions: &[usize]) -> Vec<u8> {
    let mut res = seq.to_owned();
    for &i in positions {
        res[i] = WILDCARD;
    }
    res
}

/// All `k`-element subsets of `0..n` in lexicographic order.
pub(crate) fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    let mut res = Vec::new();
    if k > n {
        return res;
    }

    let mut idxs: Vec<usize> = (0..k).collect();
    loop {
        res.push(idxs.clone());

        // find the rightmost index that can still be advanced
        let Some(i) = (0..k).rev().find(|&i| idxs[i] != i + n - k) else {
            return res;
        };
        idxs[i] += 1;
        for j in i + 1..k {
            idxs[j] = idxs[j - 1] + 1;
        }
    }
}
