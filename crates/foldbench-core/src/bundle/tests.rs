//! Tests for the bundle types and the cache/persist store.

use serde_json::{json, Number};
use tempfile::tempdir;

use super::*;

fn sample_result(name: &str, bases: u64) -> PredictorResult {
    let n = bases as usize;
    PredictorResult {
        fold: FoldData {
            name: name.to_string(),
            bases,
            num_folds: Number::from(4u64),
            num_pairs: None,
            free: vec![1; n],
            pairs: vec![vec![0; n]; n],
            extra: serde_json::Map::new(),
        },
        command: CommandLine::single(format!("safecomplete -json -in {name}.fasta")),
        resources: ResourceBlock::Single(SingleResources {
            user: 0.1,
            sys: 0.0,
            rss_kb: 1024,
        }),
    }
}

#[test]
fn empty_bundle_serializes_all_four_keys_as_null() {
    let value = serde_json::to_value(JobBundle::default()).unwrap();
    let obj = value.as_object().unwrap();
    assert_eq!(obj.len(), 4);
    for key in ["RNAsubopt", "RNAsuboptSingle", "SafeComplete", "SingleMaxPairs"] {
        assert!(obj.get(key).unwrap().is_null(), "{key} should be null");
    }
}

#[test]
fn bundle_roundtrip_keeps_extra_predictor_fields() {
    let mut result = sample_result("tRNA1", 2);
    result
        .fold
        .extra
        .insert("SafeBases".to_string(), json!([true, false]));
    let bundle = JobBundle {
        safe_complete: Some(result.clone()),
        ..Default::default()
    };

    let data = serde_json::to_vec(&bundle).unwrap();
    let back: JobBundle = serde_json::from_slice(&data).unwrap();
    assert_eq!(back.safe_complete, Some(result));
    assert!(back.rnasubopt.is_none());
    assert!(back.rnasubopt_single.is_none());
    assert!(back.single_max_pairs.is_none());
}

#[test]
fn resource_block_roundtrips_both_shapes() {
    let piped = ResourceBlock::Piped(PipedResources {
        producer_user: 1.5,
        producer_sys: 0.5,
        producer_rss_kb: 2048,
        consumer_user: 0.25,
        consumer_sys: 0.0,
        consumer_rss_kb: 512,
    });
    let value = serde_json::to_value(piped).unwrap();
    assert_eq!(value["RNAsuboptUser"], json!(1.5));
    assert_eq!(value["TrivialSafetyRSS"], json!(512));
    let back: ResourceBlock = serde_json::from_value(value).unwrap();
    assert_eq!(back, piped);

    let single = ResourceBlock::Single(SingleResources {
        user: 2.0,
        sys: 0.5,
        rss_kb: 4096,
    });
    let value = serde_json::to_value(single).unwrap();
    assert_eq!(value, json!({"User": 2.0, "Sys": 0.5, "RSS": 4096}));
    let back: ResourceBlock = serde_json::from_value(value).unwrap();
    assert_eq!(back, single);
}

#[test]
fn command_line_forms() {
    let piped = CommandLine::piped(
        "RNAsubopt -e 1 -i a.fasta".to_string(),
        "trivialsafety".to_string(),
    );
    let value = serde_json::to_value(&piped).unwrap();
    assert_eq!(
        value,
        json!(["RNAsubopt -e 1 -i a.fasta", "|", "trivialsafety"])
    );

    let single = CommandLine::single("safecomplete -json -in a.fasta".to_string());
    let value = serde_json::to_value(&single).unwrap();
    assert_eq!(value, json!("safecomplete -json -in a.fasta"));

    let back: CommandLine = serde_json::from_value(json!(["a", "|", "b"])).unwrap();
    assert_eq!(back, CommandLine::piped("a".to_string(), "b".to_string()));
}

#[test]
fn load_missing_file_is_empty_without_errors() {
    let dir = tempdir().unwrap();
    let cached = load_cached(&dir.path().join("absent.json"), false);
    assert_eq!(cached.bundle, JobBundle::default());
    assert!(cached.errors.is_empty());
}

#[test]
fn load_clean_ignores_existing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("job.json");
    let bundle = JobBundle {
        rnasubopt: Some(sample_result("x", 2)),
        rnasubopt_single: Some(sample_result("x", 2)),
        safe_complete: Some(sample_result("x", 2)),
        single_max_pairs: Some(sample_result("x", 2)),
    };
    save(&path, &bundle).unwrap();

    let cached = load_cached(&path, true);
    assert_eq!(cached.bundle, JobBundle::default());
    assert!(cached.errors.is_empty());
}

#[test]
fn load_garbage_records_one_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("job.json");
    std::fs::write(&path, b"not json at all").unwrap();

    let cached = load_cached(&path, false);
    assert_eq!(cached.bundle, JobBundle::default());
    assert_eq!(cached.errors.len(), 1);
    assert!(cached.errors[0].contains("Failed to read existing data from"));
}

#[test]
fn partial_state_warns_once() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("job.json");
    let bundle = JobBundle {
        safe_complete: Some(sample_result("x", 2)),
        ..Default::default()
    };
    save(&path, &bundle).unwrap();

    let cached = load_cached(&path, false);
    assert_eq!(cached.bundle.safe_complete, bundle.safe_complete);
    assert_eq!(cached.errors.len(), 1);
    assert_eq!(
        cached.errors[0],
        "Partial data exists: Viennafold: 0, Safe&Complete: 1, Single-Max-Pairs: 0"
    );
}

#[test]
fn full_or_empty_tracked_state_is_silent() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("job.json");

    // All three tracked slots present; the single-optimum slot missing is fine.
    let bundle = JobBundle {
        rnasubopt: Some(sample_result("x", 2)),
        safe_complete: Some(sample_result("x", 2)),
        single_max_pairs: Some(sample_result("x", 2)),
        ..Default::default()
    };
    save(&path, &bundle).unwrap();
    let cached = load_cached(&path, false);
    assert!(cached.errors.is_empty());

    save(&path, &JobBundle::default()).unwrap();
    let cached = load_cached(&path, false);
    assert!(cached.errors.is_empty());
}

#[test]
fn single_optimum_slot_is_not_tracked() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("job.json");
    let bundle = JobBundle {
        rnasubopt_single: Some(sample_result("x", 2)),
        ..Default::default()
    };
    save(&path, &bundle).unwrap();

    let cached = load_cached(&path, false);
    assert!(cached.errors.is_empty());
    assert!(cached.bundle.rnasubopt_single.is_some());
}

#[test]
fn save_then_load_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("job.json");
    let bundle = JobBundle {
        rnasubopt: Some(sample_result("tRNA1", 3)),
        rnasubopt_single: Some(sample_result("tRNA1", 3)),
        safe_complete: Some(sample_result("tRNA1", 3)),
        single_max_pairs: Some(sample_result("tRNA1", 3)),
    };
    save(&path, &bundle).unwrap();

    let cached = load_cached(&path, false);
    assert!(cached.errors.is_empty());
    assert_eq!(cached.bundle, bundle);
    assert!(cached.bundle.all_present());
}
