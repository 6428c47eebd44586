use std::fmt;
use std::path::{Path, PathBuf};

use ndarray::Array1;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Trace – one seismogram file
// ---------------------------------------------------------------------------

/// A seismogram loaded from a whitespace-delimited table.
///
/// Only `amplitude` (the second column) takes part in the comparison; `time`
/// is kept for diagnostics.
#[derive(Debug, Clone)]
pub struct Trace {
    /// File the trace was read from.
    pub path: PathBuf,
    /// First column of the table.
    pub time: Array1<f64>,
    /// Second column of the table – same length as `time`.
    pub amplitude: Array1<f64>,
}

impl Trace {
    /// Number of samples.
    pub fn len(&self) -> usize {
        self.amplitude.len()
    }

    /// Whether the trace has no samples.
    pub fn is_empty(&self) -> bool {
        self.amplitude.is_empty()
    }
}

// ---------------------------------------------------------------------------
// FilePair – a reference file and its candidate counterpart
// ---------------------------------------------------------------------------

/// A reference file and the candidate file with the identical base name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct FilePair {
    name: String,
    reference: PathBuf,
    candidate: PathBuf,
}

impl FilePair {
    pub fn new(name: impl Into<String>, reference: PathBuf, candidate: PathBuf) -> Self {
        FilePair {
            name: name.into(),
            reference,
            candidate,
        }
    }

    /// Shared base name, e.g. `AA.S0001.BXZ.semd`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn reference(&self) -> &Path {
        &self.reference
    }

    pub fn candidate(&self) -> &Path {
        &self.candidate
    }
}

// ---------------------------------------------------------------------------
// MetricResult – one row of the report
// ---------------------------------------------------------------------------

/// Similarity metrics for one file pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricResult {
    pub file_name: String,
    /// Pearson correlation coefficient, 1.0 is perfect agreement.
    pub correlation: f64,
    /// Normalized L2 error, 0.0 means identical traces.
    pub normalized_error: f64,
}

impl fmt::Display for MetricResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: corr={:.6} err={:.3e}",
            self.file_name, self.correlation, self.normalized_error
        )
    }
}

// ---------------------------------------------------------------------------
// AggregateResult – worst case over all pairs
// ---------------------------------------------------------------------------

/// Worst-case metrics seen so far: lowest correlation, largest error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub min_correlation: f64,
    pub max_error: f64,
}

impl Default for AggregateResult {
    /// Starts at a perfect score, so an empty set passes vacuously.
    fn default() -> Self {
        AggregateResult {
            min_correlation: 1.0,
            max_error: 0.0,
        }
    }
}

impl AggregateResult {
    /// Fold one pair into the aggregate.
    ///
    /// A NaN metric sticks, so it can never be mistaken for a pass.
    pub fn update(&mut self, result: &MetricResult) {
        if result.correlation < self.min_correlation || result.correlation.is_nan() {
            self.min_correlation = result.correlation;
        }
        if result.normalized_error > self.max_error || result.normalized_error.is_nan() {
            self.max_error = result.normalized_error;
        }
    }

    /// Aggregate over a whole report.
    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a MetricResult>) -> Self {
        let mut agg = AggregateResult::default();
        for r in results {
            agg.update(r);
        }
        agg
    }
}

// ---------------------------------------------------------------------------
// PairFailure – a pair that could not be compared
// ---------------------------------------------------------------------------

/// A pair skipped in keep-going mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairFailure {
    pub file_name: String,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Comparison – everything one run of the comparator produces
// ---------------------------------------------------------------------------

/// Outcome of comparing a reference directory with a candidate directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub passed: bool,
    /// One row per compared pair, sorted by file name.
    pub report: Vec<MetricResult>,
    pub aggregate: AggregateResult,
    /// Pairs that failed to compare (only populated when skipping errors).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<PairFailure>,
}

impl Comparison {
    /// True when nothing was compared and the verdict is a vacuous pass.
    pub fn is_vacuous(&self) -> bool {
        self.report.is_empty() && self.failures.is_empty()
    }
}
