//! Regression check for seismic simulation examples.
//!
//! Runs an example, then compares the seismograms it wrote against a trusted
//! reference set using Pearson correlation and a normalized L2 error.

pub mod compare;
pub mod config;
pub mod data;
pub mod env;
pub mod error;
pub mod layout;
pub mod metrics;
pub mod report;
pub mod runner;

pub use compare::Comparator;
pub use config::{CompareConfig, ErrorPolicy, Tolerances};
pub use data::model::{AggregateResult, Comparison, FilePair, MetricResult, PairFailure, Trace};
pub use error::{Aborted, Error, Result};
pub use layout::ExampleLayout;
