//! Seismogram comparator: pairs reference and candidate files, computes the
//! similarity metrics for every pair and folds them into a verdict.
//!
//! The comparator never prints; see [`crate::report`] for rendering.

use std::path::Path;

use crate::config::{CompareConfig, ErrorPolicy};
use crate::data::loader::{discover_pairs, load_trace};
use crate::data::model::{AggregateResult, Comparison, FilePair, MetricResult, PairFailure};
use crate::error::{Aborted, Error, Result};
use crate::metrics;

// ---------------------------------------------------------------------------
// Comparator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Comparator {
    config: CompareConfig,
}

impl Comparator {
    pub fn new(config: CompareConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompareConfig {
        &self.config
    }

    /// Compare every reference seismogram in `reference_dir` with the file of
    /// the same name in `candidate_dir`.
    ///
    /// With [`ErrorPolicy::Abort`] the first failing pair ends the run and the
    /// rows computed so far travel back inside [`Aborted`].
    pub fn compare(
        &self,
        reference_dir: &Path,
        candidate_dir: &Path,
    ) -> std::result::Result<Comparison, Aborted> {
        let pairs = discover_pairs(reference_dir, candidate_dir, &self.config.pattern)?;
        log::info!(
            "Comparing {} seismogram(s): {} vs {}",
            pairs.len(),
            reference_dir.display(),
            candidate_dir.display()
        );

        let outcomes = self.evaluate_all(&pairs);

        let mut report = Vec::with_capacity(outcomes.len());
        let mut failures = Vec::new();
        let mut aggregate = AggregateResult::default();

        for (pair, outcome) in pairs.iter().zip(outcomes) {
            match outcome {
                Ok(result) => {
                    if self.config.tolerances.accepts_pair(&result) {
                        log::debug!("{result}");
                    } else {
                        log::info!("{result} (outside tolerance)");
                    }
                    aggregate.update(&result);
                    report.push(result);
                }
                Err(source) if self.config.on_error == ErrorPolicy::Abort => {
                    log::error!("{}: {source}", pair.name());
                    return Err(Aborted {
                        completed: report,
                        source,
                    });
                }
                Err(e) => {
                    log::warn!("Skipping {}: {e}", pair.name());
                    failures.push(PairFailure {
                        file_name: pair.name().to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }

        let mut passed = self.config.tolerances.accepts(&aggregate) && failures.is_empty();
        if report.is_empty() && failures.is_empty() {
            log::warn!(
                "No files matching '{}' in {}: verdict is a vacuous pass",
                self.config.pattern,
                reference_dir.display()
            );
            passed &= !self.config.fail_on_empty;
        }

        Ok(Comparison {
            passed,
            report,
            aggregate,
            failures,
        })
    }

    /// Metrics for every pair, in pair order.
    ///
    /// Sequentially, evaluation stops after the first error when aborting.
    /// The parallel path evaluates everything; the caller still stops at the
    /// first error in sorted order, so the outcome is the same.
    fn evaluate_all(&self, pairs: &[FilePair]) -> Vec<Result<MetricResult>> {
        if self.config.parallel {
            return self.evaluate_parallel(pairs);
        }

        let mut outcomes = Vec::with_capacity(pairs.len());
        for pair in pairs {
            let outcome = compare_pair(pair);
            let stop = outcome.is_err() && self.config.on_error == ErrorPolicy::Abort;
            outcomes.push(outcome);
            if stop {
                break;
            }
        }
        outcomes
    }

    #[cfg(feature = "parallel")]
    fn evaluate_parallel(&self, pairs: &[FilePair]) -> Vec<Result<MetricResult>> {
        use rayon::prelude::*;
        log::debug!("Comparing {} pair(s) on the rayon pool", pairs.len());
        pairs.par_iter().map(compare_pair).collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn evaluate_parallel(&self, pairs: &[FilePair]) -> Vec<Result<MetricResult>> {
        log::warn!("Built without the `parallel` feature; comparing sequentially");
        let sequential = Comparator::new(CompareConfig {
            parallel: false,
            ..self.config.clone()
        });
        sequential.evaluate_all(pairs)
    }
}

// ---------------------------------------------------------------------------
// One pair
// ---------------------------------------------------------------------------

/// Load both traces of a pair and compute its metrics.
pub fn compare_pair(pair: &FilePair) -> Result<MetricResult> {
    let reference = load_trace(pair.reference())?;
    let candidate = load_trace(pair.candidate())?;

    if reference.len() != candidate.len() {
        return Err(Error::ShapeMismatch {
            name: pair.name().to_string(),
            reference: reference.len(),
            candidate: candidate.len(),
        });
    }

    let r = reference.amplitude.view();
    let c = candidate.amplitude.view();
    let normalized_error = metrics::normalized_error(pair.name(), r, c)?;
    let correlation = metrics::correlation(pair.name(), r, c)?;
    if !(correlation.is_finite() && normalized_error.is_finite()) {
        return Err(Error::degenerate(
            pair.name(),
            format!("non-finite metrics: corr={correlation} err={normalized_error}"),
        ));
    }

    Ok(MetricResult {
        file_name: pair.name().to_string(),
        correlation,
        normalized_error,
    })
}
