/// Data layer: core types, loading, filtering, aggregation and presentation.
///
/// Architecture:
/// ```text
///  .xlsx / .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file, normalise headers → ReportTable
///   └──────────┘
///        │  (memoized per source by `cache`)
///        ▼
///   ┌──────────┐
///   │  filter   │  country / industry / date predicates → filtered ReportTable
///   └──────────┘
///        │
///        ├──────────────────┐
///        ▼                  ▼
///   ┌───────────┐     ┌──────────┐
///   │ aggregate  │     │ present   │  dates, report links → DisplayTable
///   └───────────┘     └──────────┘
/// ```

pub mod aggregate;
pub mod cache;
pub mod filter;
pub mod loader;
pub mod model;
pub mod present;
