//! Cross-checks between independently computed predictor results.

use crate::bundle::JobBundle;

/// Compare the fields that must agree between the primary fold search and
/// the safe-and-complete analysis of the same input. Mismatches are
/// reported, never corrected, and neither result is discarded.
pub fn cross_validate(bundle: &JobBundle) -> Vec<String> {
    let mut errors = Vec::new();
    let (Some(vf), Some(sc)) = (&bundle.rnasubopt, &bundle.safe_complete) else {
        return errors;
    };

    if vf.fold.bases != sc.fold.bases {
        errors.push(format!(
            "ViennaRNA found {} bases, Safe&Complete {} bases!",
            vf.fold.bases, sc.fold.bases
        ));
    }
    if vf.fold.name != sc.fold.name {
        errors.push(format!(
            "ViennaRNA found name {}, Safe&Complete name {}!",
            vf.fold.name, sc.fold.name
        ));
    }
    errors
}
