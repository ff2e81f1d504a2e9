//! Data layer: core types, loading, and crop filtering.
//!
//! Architecture:
//! ```text
//!  .csv / .tsv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → Table (normalized column names)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────────────────────┐
//!   │ YieldTable / MeasuresTable│  typed records
//!   └──────────────────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  case-insensitive crop match → matching rows
//!   └──────────┘
//! ```

pub mod filter;
pub mod loader;
pub mod model;
