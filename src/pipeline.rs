use crate::config::TrimOptions;
use crate::errors::*;
use crate::matcher::*;
use crate::trimmable_reads::TrimmableReads;

/// Ordered cascade of matching stages.
///
/// Each stage only sees the reads that all earlier stages left unmatched, and
/// it registers all of its matches before the next stage starts.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn Matcher>>,
}

/// Outcome of running one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageSummary {
    pub name: &'static str,
    pub searched: usize,
    pub matched: usize,
}

impl Pipeline {
    /// Create a new empty pipeline.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Append a stage to the end of the cascade.
    pub fn add<M: Matcher + 'static>(&mut self, stage: M) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Complete matching, then partial matching, then alignment if enabled.
    pub fn from_options(opts: &TrimOptions) -> Result<Self> {
        let queries = opts.query_set()?;
        log::info!(
            "{} primers expand to {} queries",
            opts.primers.len(),
            queries.len()
        );

        let mut res = Self::new();
        res.add(CompleteMatcher::new(&queries, opts.mismatches, opts.revcomp)?);
        res.add(PartialMatcher::new(&queries, opts.min_partial, opts.revcomp)?);

        if opts.alignment {
            let m = AlignmentMatcher::new(
                &queries,
                opts.alignment_dir.as_deref(),
                opts.min_id,
                opts.threads,
            )?;
            res.add(m.with_program(opts.vsearch_program.clone()));
        }

        Ok(res)
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Run every stage in order over the reads that are still unmatched.
    pub fn run(&self, reads: &mut TrimmableReads) -> Result<Vec<StageSummary>> {
        let mut res = Vec::with_capacity(self.stages.len());

        for stage in &self.stages {
            let seqs: Vec<(&str, &[u8])> = reads.unmatched_sequences().collect();
            let searched = seqs.len();
            let found = stage.find_in_seqs(&seqs)?;
            let matched = found.len();

            for (id, m) in found {
                reads.register_match(&id, m)?;
            }

            log::info!("{}: {} of {} reads matched", stage.name(), matched, searched);
            res.push(StageSummary {
                name: stage.name(),
                searched,
                matched,
            });
        }

        Ok(res)
    }
}
