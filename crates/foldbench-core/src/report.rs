//! Report and diagnostic output for a comparison run.
//!
//! The report stream carries one fixed-width line per fully-resolved job;
//! the diagnostic stream carries the startup line and per-job error
//! blocks. Both are plain `Write` sinks so tests can capture them.

use std::io::{self, Write};

use crate::bundle::JobBundle;
use crate::handler::JobOutcome;
use crate::jobs::ShardSpec;

pub struct Reporter<R: Write, D: Write> {
    report: R,
    diag: D,
}

impl<R: Write, D: Write> Reporter<R, D> {
    pub fn new(report: R, diag: D) -> Self {
        Self { report, diag }
    }

    /// Startup line stating the job count, and the shard fraction if sharded.
    pub fn startup(
        &mut self,
        selected: usize,
        total: usize,
        shard: Option<ShardSpec>,
    ) -> io::Result<()> {
        match shard {
            None => writeln!(self.diag, "Analyzing {} sequences", selected)?,
            Some(spec) => writeln!(
                self.diag,
                "Analyzing {} out of {} sequences (shard {} of {})",
                selected, total, spec.index, spec.count
            )?,
        }
        self.diag.flush()
    }

    pub fn header(&mut self) -> io::Result<()> {
        writeln!(
            self.report,
            "# Name        VF_Secs VF_RSSkB  TS_Secs TS_RSSkB  SC_Secs SC_RSSkB SMP_Secs SMP_RSSk     VF_folds     SC_folds"
        )?;
        self.report.flush()
    }

    /// Called by the pool for every job, in completion order.
    pub fn job_finished(&mut self, outcome: &JobOutcome) -> io::Result<()> {
        if !outcome.errors.is_empty() {
            writeln!(
                self.diag,
                "{} produced {} errors:\n{}",
                outcome.job.name,
                outcome.errors.len(),
                outcome.errors.join("\n")
            )?;
            self.diag.flush()?;
        }
        self.summary_line(&outcome.bundle)?;
        self.report.flush()
    }

    /// One fixed-width line per job; skipped unless every slot resolved.
    fn summary_line(&mut self, bundle: &JobBundle) -> io::Result<()> {
        let (Some(vf), Some(_svf), Some(sc), Some(smp)) = (
            &bundle.rnasubopt,
            &bundle.rnasubopt_single,
            &bundle.safe_complete,
            &bundle.single_max_pairs,
        ) else {
            return Ok(());
        };
        let Some(vf_res) = vf.resources.piped() else {
            return Ok(());
        };
        let (Some(sc_res), Some(smp_res)) = (sc.resources.single(), smp.resources.single())
        else {
            return Ok(());
        };

        writeln!(
            self.report,
            "{:<12} {:8.1} {:8} {:8.1} {:8} {:8.1} {:8} {:8.1} {:8} {:>12} {:>12}",
            vf.fold.name,
            vf_res.producer_user + vf_res.producer_sys,
            vf_res.producer_rss_kb,
            vf_res.consumer_user + vf_res.consumer_sys,
            vf_res.consumer_rss_kb,
            sc_res.user + sc_res.sys,
            sc_res.rss_kb,
            smp_res.user + smp_res.sys,
            smp_res.rss_kb,
            vf.fold.num_folds.to_string(),
            sc.fold.num_folds.to_string(),
        )
    }
}
