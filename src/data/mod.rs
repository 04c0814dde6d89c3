/// Data layer: core types, loading, caching, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + clean → Dataset   (cache: path + mtime → Arc<Dataset>)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<FundingRecord>, year / startup / investor indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐     ┌───────────┐
///   │  filter   │ ──▶ │ aggregate │  group / explode / rank / bucket
///   └──────────┘     └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  filtered records → CSV
///   └──────────┘
/// ```

pub mod aggregate;
pub mod cache;
pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
