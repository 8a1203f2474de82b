//! Fake predictor programs for integration tests.
//!
//! Small /bin/sh scripts stand in for RNAsubopt, the trivial-safety
//! classifier, and the safe-and-complete analyzer. They derive the
//! sequence name the same way the real pipeline does: the fold-search
//! stub passes the input's base name downstream, the standalone stubs
//! read it from their `-in` argument.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

/// Fold-search producer: emits the sequence name derived from the `-i`
/// argument; real structural output is irrelevant to the orchestrator.
pub fn fake_rnasubopt(dir: &Path) -> PathBuf {
    write_script(
        dir,
        "rnasubopt",
        r#"for a; do f="$a"; done
n=$(basename "$f")
printf '%s\n' "${n%.*}""#,
    )
}

/// Safety classifier: reads the name from stdin and emits a bundle for it.
pub fn fake_trivialsafety(dir: &Path) -> PathBuf {
    write_script(
        dir,
        "trivialsafety",
        r#"read -r n
cat >/dev/null
printf '{"Name":"%s","Bases":2,"NumFolds":4,"Free":[1,1],"Pairs":[[0,3],[3,0]]}' "$n""#,
    )
}

/// Safe-and-complete analyzer; `-single` selects the max-pairs variant.
pub fn fake_safecomplete(dir: &Path) -> PathBuf {
    write_script(
        dir,
        "safecomplete",
        r#"for a; do f="$a"; done
n=$(basename "$f")
n="${n%.*}"
case "$*" in
*-single*) printf '{"Name":"%s","Bases":2,"NumFolds":1,"NumPairs":1,"Free":[0,0],"Pairs":[[0,1],[1,0]]}' "$n" ;;
*) printf '{"Name":"%s","Bases":2,"NumFolds":4,"Free":[1,1],"Pairs":[[0,3],[3,0]]}' "$n" ;;
esac"#,
    )
}
