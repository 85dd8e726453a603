/// Data layer: core types, loading, filtering and export.
///
/// Architecture:
/// ```text
///  .xlsx / .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → ClimateDataset (fatal on bad schema)
///   └──────────┘
///        │
///        ▼
///   ┌────────────────┐
///   │ ClimateDataset │  Vec<CountryRecord>, countries, year bounds
///   └────────────────┘
///        │                         │
///        ▼                         ▼
///   ┌──────────┐             ┌──────────┐
///   │  filter   │ Selection  │  export   │ full table → CSV
///   └──────────┘             └──────────┘
/// ```

pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
