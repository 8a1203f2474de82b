//! Deterministic sharding of the job set across independent invocations.

use thiserror::Error;

/// A `"index:count"` shard selection: every `count`-th job starting at
/// `index`. Running all indices 0..count-1 covers the job set exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShardSpec {
    pub index: usize,
    pub count: usize,
}

/// Rejected shard specifications. The only fatal input validation in a
/// run: a bad spec aborts before any job is scheduled.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShardSpecError {
    #[error("Shard number and count should look like 2:8 (for shard two out of eight), got \"{0}\"")]
    Malformed(String),
    #[error("Shard number should be between 0 and shard count, got {index}:{count}")]
    OutOfRange { index: usize, count: usize },
    #[error("Shard count must be at least 1")]
    ZeroCount,
}

impl std::str::FromStr for ShardSpec {
    type Err = ShardSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((index, count)) = s.split_once(':') else {
            return Err(ShardSpecError::Malformed(s.to_string()));
        };
        let index: usize = index
            .parse()
            .map_err(|_| ShardSpecError::Malformed(s.to_string()))?;
        let count: usize = count
            .parse()
            .map_err(|_| ShardSpecError::Malformed(s.to_string()))?;
        if count == 0 {
            return Err(ShardSpecError::ZeroCount);
        }
        if index > count {
            return Err(ShardSpecError::OutOfRange { index, count });
        }
        // index == count wraps around to the first shard.
        let index = if index == count { 0 } else { index };
        Ok(ShardSpec { index, count })
    }
}

impl ShardSpec {
    /// Keep every `count`-th item starting at `index`.
    pub fn select<T>(&self, items: Vec<T>) -> Vec<T> {
        items
            .into_iter()
            .enumerate()
            .filter(|(i, _)| i % self.count == self.index)
            .map(|(_, item)| item)
            .collect()
    }
}
