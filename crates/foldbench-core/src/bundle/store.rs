//! Load and persist job bundles; loading doubles as the resume cache.

use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::Path;

use super::JobBundle;

/// Result of a cache lookup: the reusable slots plus any advisory errors.
#[derive(Debug, Default)]
pub struct CachedBundle {
    pub bundle: JobBundle,
    pub errors: Vec<String>,
}

/// Read a previously persisted bundle, if any.
///
/// An absent file is an empty cache and not an error; an unreadable or
/// undecodable file is an empty cache plus one recorded error. With
/// `clean` set the file is ignored entirely. Partial state among the
/// tracked slots is reported as a warning; the missing slots are simply
/// recomputed, present ones reused verbatim.
pub fn load_cached(path: &Path, clean: bool) -> CachedBundle {
    let mut errors = Vec::new();
    let mut bundle = JobBundle::default();

    if !clean {
        match fs::read(path) {
            Ok(data) => match serde_json::from_slice(&data) {
                Ok(cached) => bundle = cached,
                Err(e) => errors.push(format!(
                    "Failed to read existing data from {}: {}",
                    path.display(),
                    e
                )),
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => errors.push(format!("Failed to open file {}: {}", path.display(), e)),
        }
    }

    let present = bundle.tracked_present();
    let have = present.iter().filter(|p| **p).count();
    if have > 0 && have < present.len() {
        errors.push(format!(
            "Partial data exists: Viennafold: {}, Safe&Complete: {}, Single-Max-Pairs: {}",
            present[0] as u8, present[1] as u8, present[2] as u8
        ));
        tracing::debug!(path = %path.display(), "partial cached state, recomputing missing slots");
    }

    CachedBundle { bundle, errors }
}

/// Persist the bundle to the job's output path. Called at the end of every
/// job, even when some slots stayed empty.
pub fn save(path: &Path, bundle: &JobBundle) -> Result<()> {
    let data = serde_json::to_vec(bundle).context("encode bundle")?;
    fs::write(path, data).with_context(|| format!("write bundle to {}", path.display()))?;
    Ok(())
}
