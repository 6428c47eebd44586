use serde::{Deserialize, Serialize};

use crate::data::loader::DEFAULT_PATTERN;
use crate::data::model::{AggregateResult, MetricResult};

// ---------------------------------------------------------------------------
// Tolerances
// ---------------------------------------------------------------------------

/// Pass/fail thresholds applied to the aggregate metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerances {
    /// Lowest acceptable Pearson correlation (1.0 is a perfect match).
    pub min_correlation: f64,
    /// Highest acceptable normalized L2 error (0.0 is a perfect match).
    pub max_error: f64,
}

impl Tolerances {
    pub const DEFAULT_MIN_CORRELATION: f64 = 0.99;
    pub const DEFAULT_MAX_ERROR: f64 = 1e-4;

    /// Verdict for a whole run.
    pub fn accepts(&self, aggregate: &AggregateResult) -> bool {
        aggregate.min_correlation >= self.min_correlation && aggregate.max_error <= self.max_error
    }

    /// Verdict for a single pair, used to flag rows in the report.
    pub fn accepts_pair(&self, result: &MetricResult) -> bool {
        result.correlation >= self.min_correlation && result.normalized_error <= self.max_error
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            min_correlation: Self::DEFAULT_MIN_CORRELATION,
            max_error: Self::DEFAULT_MAX_ERROR,
        }
    }
}

// ---------------------------------------------------------------------------
// Comparator configuration
// ---------------------------------------------------------------------------

/// What to do when one pair cannot be compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Stop at the first failing pair.
    #[default]
    Abort,
    /// Record the failure, keep going, and fail the verdict.
    Skip,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareConfig {
    /// Glob matched against reference file names.
    pub pattern: String,
    pub tolerances: Tolerances,
    pub on_error: ErrorPolicy,
    /// An empty file set passes vacuously unless this is set.
    pub fail_on_empty: bool,
    /// Compute pair metrics on the rayon pool (needs the `parallel` feature).
    pub parallel: bool,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_PATTERN.to_string(),
            tolerances: Tolerances::default(),
            on_error: ErrorPolicy::Abort,
            fail_on_empty: false,
            parallel: false,
        }
    }
}
