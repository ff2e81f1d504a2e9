//! carbon-agro: crop carbon footprint estimation and sustainability
//! recommendations over two tabular datasets.
//!
//! - `data`: load and normalize the yield and measures tables
//! - `estimate`: linear footprint estimate from a crop's mean history
//! - `recommend`: deduplicated measures for a crop
//! - `cache`: explicit per-path-pair memoization of loaded datasets
//! - `report`: one crop analysis, ready for a front end

pub mod cache;
pub mod config;
pub mod data;
pub mod error;
pub mod estimate;
pub mod recommend;
pub mod report;

pub use cache::{DatasetCache, Datasets};
pub use config::{Config, EmissionFactors};
pub use data::loader::load_datasets;
pub use data::model::{CellValue, MeasureRecord, MeasuresTable, Table, YieldRecord, YieldTable};
pub use error::{Error, Result};
pub use estimate::{base_factor, estimate, estimate_input, BaseFactor, EstimationInput, Footprint};
pub use recommend::recommendations;
pub use report::{analyze, CropReport};
