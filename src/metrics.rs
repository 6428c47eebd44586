//! Similarity metrics between a reference trace and a candidate trace.
//!
//! Both metrics take the amplitude vectors of one file pair. They assume equal
//! lengths; the comparator checks that before calling them.

use ndarray::{Array1, ArrayView1, Zip};

use crate::error::{Error, Result};

/// Euclidean (L2) norm.
pub fn l2_norm(v: ArrayView1<'_, f64>) -> f64 {
    v.dot(&v).sqrt()
}

/// Both vectors divided by their largest absolute sample.
///
/// Amplitudes above ~1e154 overflow a sum of squares. Both metrics are
/// invariant under a common positive scale, so they work on the scaled copies.
/// `None` when every sample is zero.
fn rescaled(
    a: ArrayView1<'_, f64>,
    b: ArrayView1<'_, f64>,
) -> Option<(Array1<f64>, Array1<f64>)> {
    let scale = a.iter().chain(b.iter()).fold(0.0_f64, |m, v| m.max(v.abs()));
    if scale == 0.0 || !scale.is_finite() {
        return None;
    }
    Some((a.mapv(|v| v / scale), b.mapv(|v| v / scale)))
}

/// Pearson correlation coefficient, the off-diagonal entry of the 2×2
/// correlation matrix of `reference` and `candidate`.
///
/// Identical vectors correlate perfectly, including constant ones. Any other
/// pair where one side has zero variance has no defined correlation and is
/// reported as [`Error::DegenerateVector`].
pub fn correlation(
    name: &str,
    reference: ArrayView1<'_, f64>,
    candidate: ArrayView1<'_, f64>,
) -> Result<f64> {
    debug_assert_eq!(reference.len(), candidate.len());
    if reference == candidate {
        return Ok(1.0);
    }
    let Some((reference, candidate)) = rescaled(reference, candidate) else {
        return Err(Error::degenerate(name, "zero-variance trace, correlation is undefined"));
    };
    let (Some(mean_r), Some(mean_c)) = (reference.mean(), candidate.mean()) else {
        return Err(Error::degenerate(name, "empty trace"));
    };

    let mut s_rr = 0.0;
    let mut s_cc = 0.0;
    let mut s_rc = 0.0;
    Zip::from(&reference).and(&candidate).for_each(|&r, &c| {
        let dr = r - mean_r;
        let dc = c - mean_c;
        s_rr += dr * dr;
        s_cc += dc * dc;
        s_rc += dr * dc;
    });

    if s_rr == 0.0 || s_cc == 0.0 {
        return Err(Error::degenerate(name, "zero-variance trace, correlation is undefined"));
    }

    let r = s_rc / (s_rr.sqrt() * s_cc.sqrt());
    if !r.is_finite() {
        return Err(Error::degenerate(name, format!("correlation evaluated to {r}")));
    }
    // Rounding can push |r| slightly above 1.
    Ok(r.clamp(-1.0, 1.0))
}

/// Normalized L2 error: `‖ref − cand‖ / sqrt(‖ref‖ · ‖cand‖)`.
///
/// Undefined when either vector is all zeros, which is reported as
/// [`Error::DegenerateVector`].
pub fn normalized_error(
    name: &str,
    reference: ArrayView1<'_, f64>,
    candidate: ArrayView1<'_, f64>,
) -> Result<f64> {
    debug_assert_eq!(reference.len(), candidate.len());
    let (reference, candidate) = rescaled(reference, candidate)
        .unwrap_or_else(|| (reference.to_owned(), candidate.to_owned()));
    let norm_r = l2_norm(reference.view());
    let norm_c = l2_norm(candidate.view());
    if norm_r == 0.0 || norm_c == 0.0 {
        let which = if norm_r == 0.0 { "reference" } else { "candidate" };
        return Err(Error::degenerate(
            name,
            format!("{which} trace is identically zero, normalized error is undefined"),
        ));
    }

    let diff = &reference - &candidate;
    let error = l2_norm(diff.view()) / (norm_r * norm_c).sqrt();
    if !error.is_finite() {
        return Err(Error::degenerate(name, format!("normalized error evaluated to {error}")));
    }
    Ok(error)
}
