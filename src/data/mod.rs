/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset (rows without entity/year dropped)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<Record>, entity / type / year indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  committed FilterSelection → filtered subset
///   └──────────┘
///        │
///        ▼
///   timeseries · ranking · bloc · snapshot · table
/// ```

pub mod bloc;
pub mod filter;
pub mod loader;
pub mod model;
pub mod ranking;
pub mod snapshot;
pub mod table;
pub mod timeseries;
