/// Data layer: core types and file loading.
///
/// Architecture:
/// ```text
///  reference/OUTPUT_FILES/*.sem*     candidate/OUTPUT_FILES/*.sem*
///            │                                 │
///            └──────────────┬──────────────────┘
///                           ▼
///                    ┌──────────────┐
///                    │    loader    │  glob + pair by name → Vec<FilePair>
///                    └──────────────┘  parse table        → Trace
///                           │
///                           ▼
///                    ┌──────────────┐
///                    │    model     │  Trace, MetricResult, AggregateResult
///                    └──────────────┘
/// ```

pub mod loader;
pub mod model;
