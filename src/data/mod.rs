/// Data layer: core types, loading, and the validated dataset.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → (headers, Vec<Row>)
///   └──────────┘
///        │
///        ▼
///   ┌────────────────┐
///   │ TabularDataset  │  validate, pick time / y header → Vec<Point>
///   └────────────────┘
///        │
///        ▼
///   projection::{TimeSeriesProjection, PhaseSpaceProjection}
/// ```
pub mod dataset;
pub mod loader;
pub mod model;
