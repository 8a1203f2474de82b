//! Serde shapes for predictor results, matching the persisted artifact
//! format key for key.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// CPU time and peak memory of one finished process, taken from wait4(2).
/// Fields are never negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceUsage {
    pub user_secs: f64,
    pub sys_secs: f64,
    pub max_rss_kb: i64,
}

/// Structural output decoded from one predictor run.
///
/// `NumFolds` can be astronomically large (the fold count grows
/// exponentially with sequence length), so it stays a JSON number rather
/// than a fixed-width integer. Unknown keys are kept in `extra` so cached
/// slots re-serialize without loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoldData {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Bases")]
    pub bases: u64,
    #[serde(rename = "NumFolds")]
    pub num_folds: Number,
    #[serde(rename = "NumPairs", default, skip_serializing_if = "Option::is_none")]
    pub num_pairs: Option<Number>,
    /// Per base, how many candidate foldings leave it unpaired.
    #[serde(rename = "Free")]
    pub free: Vec<i64>,
    /// Per base pair (i, j), how many candidate foldings pair them.
    #[serde(rename = "Pairs")]
    pub pairs: Vec<Vec<i64>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Command line(s) recorded for provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommandLine {
    /// `[producer, "|", consumer]` for a piped run.
    Piped(Vec<String>),
    /// A standalone invocation.
    Single(String),
}

impl CommandLine {
    pub fn single(command: String) -> Self {
        CommandLine::Single(command)
    }

    pub fn piped(producer: String, consumer: String) -> Self {
        CommandLine::Piped(vec![producer, "|".to_string(), consumer])
    }
}

/// Resource keys for a piped run, separated per pipeline leg.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipedResources {
    #[serde(rename = "RNAsuboptUser")]
    pub producer_user: f64,
    #[serde(rename = "RNAsuboptSys")]
    pub producer_sys: f64,
    #[serde(rename = "RNAsuboptRSS")]
    pub producer_rss_kb: i64,
    #[serde(rename = "TrivialSafetyUser")]
    pub consumer_user: f64,
    #[serde(rename = "TrivialSafetySys")]
    pub consumer_sys: f64,
    #[serde(rename = "TrivialSafetyRSS")]
    pub consumer_rss_kb: i64,
}

impl PipedResources {
    pub fn new(producer: &ResourceUsage, consumer: &ResourceUsage) -> Self {
        Self {
            producer_user: producer.user_secs,
            producer_sys: producer.sys_secs,
            producer_rss_kb: producer.max_rss_kb,
            consumer_user: consumer.user_secs,
            consumer_sys: consumer.sys_secs,
            consumer_rss_kb: consumer.max_rss_kb,
        }
    }
}

/// Resource keys for a standalone run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SingleResources {
    #[serde(rename = "User")]
    pub user: f64,
    #[serde(rename = "Sys")]
    pub sys: f64,
    #[serde(rename = "RSS")]
    pub rss_kb: i64,
}

impl SingleResources {
    pub fn new(usage: &ResourceUsage) -> Self {
        Self {
            user: usage.user_secs,
            sys: usage.sys_secs,
            rss_kb: usage.max_rss_kb,
        }
    }
}

/// Resource section of a persisted result; the shape depends on which
/// runner produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceBlock {
    Piped(PipedResources),
    Single(SingleResources),
}

impl ResourceBlock {
    pub fn piped(&self) -> Option<&PipedResources> {
        match self {
            ResourceBlock::Piped(res) => Some(res),
            ResourceBlock::Single(_) => None,
        }
    }

    pub fn single(&self) -> Option<&SingleResources> {
        match self {
            ResourceBlock::Single(res) => Some(res),
            ResourceBlock::Piped(_) => None,
        }
    }
}

/// One predictor's full persisted result: the decoded output plus command
/// line and resource provenance added by the runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictorResult {
    #[serde(flatten)]
    pub fold: FoldData,
    #[serde(rename = "Command")]
    pub command: CommandLine,
    #[serde(rename = "Resources")]
    pub resources: ResourceBlock,
}
