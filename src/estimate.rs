//! Footprint estimation.
//!
//! `footprint = area * base_factor + fertilizer * fertilizer_factor
//!            + pesticide * pesticide_factor`
//!
//! The base factor is the mean historical footprint of the crop, or `1.0`
//! when the dataset has nothing usable for it.

use std::fmt;

use log::debug;
use serde::Serialize;

use crate::config::EmissionFactors;
use crate::data::filter::yield_rows_for;
use crate::data::model::{YieldRecord, YieldTable};
use crate::error::{Error, Result};

/// Neutral per-hectare factor for crops without footprint history.
pub const DEFAULT_BASE_FACTOR: f64 = 1.0;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// User-supplied quantities for one estimation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstimationInput {
    pub crop: String,
    /// Hectares.
    pub area: f64,
    /// Kilograms.
    pub fertilizer: f64,
    /// Kilograms.
    pub pesticide: f64,
}

impl EstimationInput {
    /// Build an input, rejecting negative or non-finite quantities.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` naming the first bad field.
    pub fn new(crop: impl Into<String>, area: f64, fertilizer: f64, pesticide: f64) -> Result<Self> {
        for (field, value) in [
            ("area", area),
            ("fertilizer", fertilizer),
            ("pesticide", pesticide),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidInput { field, value });
            }
        }
        Ok(Self {
            crop: crop.into(),
            area,
            fertilizer,
            pesticide,
        })
    }

    /// Whether a positive area was entered. Front ends gate the analysis on it.
    pub fn has_area(&self) -> bool {
        self.area > 0.0
    }
}

// ---------------------------------------------------------------------------
// Base factor
// ---------------------------------------------------------------------------

/// The per-hectare factor used for a crop and where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "source", content = "value", rename_all = "snake_case")]
pub enum BaseFactor {
    /// Mean of the crop's finite `carbon_footprint` values.
    Mean(f64),
    /// No usable history; [`DEFAULT_BASE_FACTOR`] applies.
    Default,
}

impl BaseFactor {
    pub fn value(self) -> f64 {
        match self {
            BaseFactor::Mean(v) => v,
            BaseFactor::Default => DEFAULT_BASE_FACTOR,
        }
    }
}

/// Compute the base factor for a crop's rows.
///
/// Infinite and missing values are dropped before averaging. An absent
/// column, an empty remainder, or a non-positive mean all give the default.
pub fn base_factor(rows: &[&YieldRecord], has_carbon_footprint: bool) -> BaseFactor {
    if !has_carbon_footprint {
        return BaseFactor::Default;
    }

    let values: Vec<f64> = rows
        .iter()
        .filter_map(|r| r.carbon_footprint)
        .filter(|v| v.is_finite())
        .collect();
    if values.is_empty() {
        return BaseFactor::Default;
    }

    let mean = values.iter().sum::<f64>() / values.len() as f64;
    // an overflowing sum must not leak infinity into the result
    if !mean.is_finite() || mean <= 0.0 {
        return BaseFactor::Default;
    }
    BaseFactor::Mean(mean)
}

// ---------------------------------------------------------------------------
// Footprint
// ---------------------------------------------------------------------------

/// An estimated footprint. `Display` shows two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Footprint {
    value: f64,
    base_factor: BaseFactor,
}

impl Footprint {
    /// Unrounded value, for downstream computation.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Value rounded to 2 decimal places, for display. Agrees with `Display`.
    pub fn rounded(&self) -> f64 {
        format!("{self}").parse().unwrap_or(self.value)
    }

    pub fn base_factor(&self) -> BaseFactor {
        self.base_factor
    }
}

impl fmt::Display for Footprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.value)
    }
}

/// Estimate the footprint for `crop` with the given quantities.
///
/// # Errors
///
/// `InvalidInput` for negative or non-finite quantities, `CropNotFound` if
/// the yield table has no rows for `crop`.
pub fn estimate(
    yields: &YieldTable,
    crop: &str,
    area: f64,
    fertilizer: f64,
    pesticide: f64,
    factors: &EmissionFactors,
) -> Result<Footprint> {
    let input = EstimationInput::new(crop, area, fertilizer, pesticide)?;
    estimate_input(yields, &input, factors)
}

/// Estimate from an already validated input.
///
/// # Errors
///
/// `CropNotFound` if the yield table has no rows for the input's crop.
pub fn estimate_input(
    yields: &YieldTable,
    input: &EstimationInput,
    factors: &EmissionFactors,
) -> Result<Footprint> {
    let rows = yield_rows_for(yields, &input.crop);
    if rows.is_empty() {
        return Err(Error::CropNotFound {
            crop: input.crop.clone(),
        });
    }

    let base = base_factor(&rows, yields.has_carbon_footprint);
    if base == BaseFactor::Default {
        debug!(
            "no usable carbon_footprint for '{}' ({} rows), using default base factor",
            input.crop,
            rows.len()
        );
    }

    let value = input.area * base.value()
        + input.fertilizer * factors.fertilizer_factor
        + input.pesticide * factors.pesticide_factor;

    Ok(Footprint {
        value,
        base_factor: base,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::collections::BTreeMap;

    fn record(crop: &str, cf: Option<f64>) -> YieldRecord {
        YieldRecord {
            crop: crop.to_string(),
            carbon_footprint: cf,
            attributes: BTreeMap::new(),
        }
    }

    fn table(rows: Vec<YieldRecord>) -> YieldTable {
        YieldTable {
            records: rows,
            has_carbon_footprint: true,
        }
    }

    #[test]
    fn test_rice_example() {
        let yields = table(vec![record("Rice", Some(2.0))]);
        let fp = estimate(&yields, "Rice", 10.0, 50.0, 20.0, &EmissionFactors::default()).unwrap();

        assert_eq!(fp.base_factor(), BaseFactor::Mean(2.0));
        assert_relative_eq!(fp.value(), 20.12, epsilon = 1e-9);
        assert_eq!(fp.rounded(), 20.12);
        assert_eq!(fp.to_string(), "20.12");
    }

    #[test]
    fn test_rounded_agrees_with_display_on_binary_halves() {
        let factors = EmissionFactors::default();
        for (cf, shown) in [(0.125, "0.12"), (0.375, "0.38"), (2.675, "2.67")] {
            let yields = table(vec![record("Rice", Some(cf))]);
            let fp = estimate(&yields, "Rice", 1.0, 0.0, 0.0, &factors).unwrap();
            assert_eq!(fp.value(), cf);
            assert_eq!(fp.to_string(), shown);
            assert_eq!(fp.rounded(), shown.parse::<f64>().unwrap());
        }
    }

    #[test]
    fn test_rounded_stays_finite_for_huge_values() {
        let yields = table(vec![record("Rice", Some(1e307))]);
        let fp = estimate(&yields, "Rice", 1.0, 0.0, 0.0, &EmissionFactors::default()).unwrap();
        assert!(fp.rounded().is_finite());
        assert_eq!(fp.rounded(), 1e307);
    }

    #[test]
    fn test_mean_excludes_infinities_and_nulls() {
        let yields = table(vec![
            record("Maize", Some(1.0)),
            record("Maize", Some(f64::INFINITY)),
            record("Maize", None),
            record("Maize", Some(f64::NEG_INFINITY)),
            record("Maize", Some(3.0)),
            record("Wheat", Some(100.0)),
        ]);
        let rows = yield_rows_for(&yields, "maize");
        assert_eq!(base_factor(&rows, true), BaseFactor::Mean(2.0));
    }

    #[test]
    fn test_nan_counts_as_missing() {
        let yields = table(vec![record("Rice", Some(f64::NAN)), record("Rice", Some(4.0))]);
        let rows = yield_rows_for(&yields, "Rice");
        assert_eq!(base_factor(&rows, true), BaseFactor::Mean(4.0));
    }

    #[test]
    fn test_default_when_all_values_unusable() {
        let yields = table(vec![
            record("Rice", Some(f64::INFINITY)),
            record("Rice", None),
        ]);
        let rows = yield_rows_for(&yields, "Rice");
        let base = base_factor(&rows, true);
        assert_eq!(base, BaseFactor::Default);
        assert_eq!(base.value(), 1.0);
    }

    #[test]
    fn test_default_when_mean_not_positive() {
        let yields = table(vec![record("Rice", Some(-2.0)), record("Rice", Some(1.0))]);
        let rows = yield_rows_for(&yields, "Rice");
        assert_eq!(base_factor(&rows, true), BaseFactor::Default);

        let zero = table(vec![record("Rice", Some(0.0))]);
        let rows = yield_rows_for(&zero, "Rice");
        assert_eq!(base_factor(&rows, true), BaseFactor::Default);
    }

    #[test]
    fn test_default_when_column_absent() {
        let yields = YieldTable {
            records: vec![record("Rice", None)],
            has_carbon_footprint: false,
        };
        let fp = estimate(&yields, "Rice", 3.0, 0.0, 0.0, &EmissionFactors::default()).unwrap();
        assert_eq!(fp.base_factor(), BaseFactor::Default);
        assert_relative_eq!(fp.value(), 3.0);
    }

    #[test]
    fn test_overflowing_mean_falls_back_to_default() {
        let yields = table(vec![record("Rice", Some(f64::MAX)), record("Rice", Some(f64::MAX))]);
        let rows = yield_rows_for(&yields, "Rice");
        assert_eq!(base_factor(&rows, true), BaseFactor::Default);
    }

    #[test]
    fn test_crop_not_found() {
        let yields = table(vec![record("Rice", Some(2.0))]);
        let err = estimate(&yields, "Barley", 1.0, 1.0, 1.0, &EmissionFactors::default()).unwrap_err();
        assert!(matches!(err, Error::CropNotFound { ref crop } if crop == "Barley"));
    }

    #[test]
    fn test_case_insensitive_crop() {
        let yields = table(vec![record("Wheat", Some(1.5)), record("wheat", Some(2.5))]);
        let factors = EmissionFactors::default();
        let a = estimate(&yields, "Wheat", 4.0, 10.0, 5.0, &factors).unwrap();
        let b = estimate(&yields, "wHEAT", 4.0, 10.0, 5.0, &factors).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.base_factor(), BaseFactor::Mean(2.0));
    }

    #[test]
    fn test_monotone_in_each_input() {
        let yields = table(vec![record("Rice", Some(2.0))]);
        let factors = EmissionFactors::default();
        let at = |a: f64, f: f64, p: f64| {
            estimate(&yields, "Rice", a, f, p, &factors).unwrap().value()
        };

        let steps = [0.0, 0.5, 1.0, 10.0, 250.0];
        for pair in steps.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            assert!(at(lo, 5.0, 5.0) <= at(hi, 5.0, 5.0));
            assert!(at(5.0, lo, 5.0) <= at(5.0, hi, 5.0));
            assert!(at(5.0, 5.0, lo) <= at(5.0, 5.0, hi));
        }
    }

    #[test]
    fn test_overridden_factors() {
        let yields = table(vec![record("Rice", Some(2.0))]);
        let factors = EmissionFactors {
            fertilizer_factor: 0.01,
            pesticide_factor: 0.1,
        };
        let fp = estimate(&yields, "Rice", 1.0, 100.0, 10.0, &factors).unwrap();
        assert_relative_eq!(fp.value(), 2.0 + 1.0 + 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_negative_input_rejected() {
        let yields = table(vec![record("Rice", Some(2.0))]);
        let err = estimate(&yields, "Rice", 1.0, -5.0, 0.0, &EmissionFactors::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { field: "fertilizer", .. }));
        assert!(EstimationInput::new("Rice", f64::INFINITY, 0.0, 0.0).is_err());
    }

    #[test]
    fn test_has_area() {
        assert!(!EstimationInput::new("Rice", 0.0, 1.0, 1.0).unwrap().has_area());
        assert!(EstimationInput::new("Rice", 0.1, 0.0, 0.0).unwrap().has_area());
    }
}
