/// Data layer: core types, loading, and normalization.
///
/// Architecture:
/// ```text
///  .json / .csv / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Vec<Dataset>
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │   Dataset     │  label + sparse year → value
///   └──────────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ normalize  │  shared year axis, zero-filled, padded
///   └───────────┘
/// ```

pub mod loader;
pub mod model;
pub mod normalize;
