//! The per-job output artifact: four predictor slots, persisted as JSON.
//!
//! The bundle is also the resume store: on the next run it is read back and
//! only the missing slots are recomputed.

mod store;
mod types;

#[cfg(test)]
mod tests;

pub use store::{load_cached, save, CachedBundle};
pub use types::{
    CommandLine, FoldData, PipedResources, PredictorResult, ResourceBlock, ResourceUsage,
    SingleResources,
};

use serde::{Deserialize, Serialize};

/// Exactly four named slots. A persisted bundle always carries all four
/// keys; a slot is null when its predictor failed or was never run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobBundle {
    /// Primary fold search: RNAsubopt piped into the trivial-safety classifier.
    #[serde(rename = "RNAsubopt")]
    pub rnasubopt: Option<PredictorResult>,
    /// Single-optimum variant of the fold search.
    #[serde(rename = "RNAsuboptSingle")]
    pub rnasubopt_single: Option<PredictorResult>,
    /// Safe-and-complete folding analysis.
    #[serde(rename = "SafeComplete")]
    pub safe_complete: Option<PredictorResult>,
    /// Single maximum-pairs folding analysis.
    #[serde(rename = "SingleMaxPairs")]
    pub single_max_pairs: Option<PredictorResult>,
}

impl JobBundle {
    /// Presence flags for the slots covered by partial-state detection,
    /// in reporting order: fold search, safe-and-complete, single-max-pairs.
    /// The single-optimum slot is deliberately not tracked.
    pub fn tracked_present(&self) -> [bool; 3] {
        [
            self.rnasubopt.is_some(),
            self.safe_complete.is_some(),
            self.single_max_pairs.is_some(),
        ]
    }

    /// True when every slot holds a result; gates the summary line.
    pub fn all_present(&self) -> bool {
        self.rnasubopt.is_some()
            && self.rnasubopt_single.is_some()
            && self.safe_complete.is_some()
            && self.single_max_pairs.is_some()
    }
}
