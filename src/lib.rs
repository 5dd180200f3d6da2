//! Library for trimming primer sequences from sequencing reads.
//!
//! # Overview
//! A read that was sequenced past the end of its amplicon carries primer
//! sequence at its 3' end. Everything from the start of the primer to the end
//! of the read is removed.
//!
//! Primers are searched for with a cascade of increasingly permissive stages:
//! 1. [`CompleteMatcher`]: the whole primer, with up to a few substitutions
//! 2. [`PartialMatcher`]: a primer cut off by either end of the read, with no substitutions
//! 3. [`AlignmentMatcher`]: optional, aligns the remaining reads with `vsearch`
//!
//! Each stage only looks at the reads that earlier stages could not match, so
//! a read is matched at most once, by the cheapest stage that finds its
//! primer.
//!
//! ## Primers
//! Primers may contain IUPAC ambiguity codes. They are expanded with
//! [`deambiguate`] into a [`QuerySet`] of concrete sequences before any
//! matching happens. Reverse complements are added once, when a matcher is
//! built.
//!
//! ## Running a cascade
//! ```no_run
//! use primertrim::*;
//!
//! # fn main() -> primertrim::errors::Result<()> {
//! let opts = TrimOptions::new(["GCATCGATGAAGAACGCAGC"]);
//! let mut reads = TrimmableReads::from_fastq(read_fastq_file("reads.fastq")?)?;
//!
//! Pipeline::from_options(&opts)?.run(&mut reads)?;
//!
//! for (desc, seq, qual) in reads.trimmed_reads(opts.min_length) {
//!     println!("@{}\n{}\n+\n{}", utf8(desc), utf8(seq), utf8(qual));
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dna;
pub mod errors;
pub mod fastq;
pub mod matcher;
pub mod pipeline;
pub mod query_set;
pub mod read;
pub mod report;
pub mod trimmable_reads;
pub mod vsearch;

mod parse_utils;

// commonly used functions and types

pub use crate::config::*;
pub use crate::dna::*;
pub use crate::errors::utf8;
pub use crate::fastq::*;
pub use crate::matcher::*;
pub use crate::pipeline::*;
pub use crate::query_set::*;
pub use crate::read::*;
pub use crate::report::*;
pub use crate::trimmable_reads::*;
