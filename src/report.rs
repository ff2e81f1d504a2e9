use std::fmt;

use serde::Serialize;

use crate::cache::Datasets;
use crate::config::EmissionFactors;
use crate::error::Result;
use crate::estimate::{estimate_input, EstimationInput, Footprint};
use crate::recommend::recommendations;

// ---------------------------------------------------------------------------
// Crop analysis report
// ---------------------------------------------------------------------------

/// Everything a front end shows for one crop analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CropReport {
    pub input: EstimationInput,
    pub footprint: Footprint,
    /// Unique measures in first-seen order; empty when none are recorded.
    pub measures: Vec<String>,
}

impl CropReport {
    pub fn has_measures(&self) -> bool {
        !self.measures.is_empty()
    }
}

/// Estimate the footprint and look up measures for `input.crop`.
///
/// # Errors
///
/// `CropNotFound` if the crop has no yield rows. No footprint is produced in
/// that case, even when measures exist.
pub fn analyze(
    datasets: &Datasets,
    input: &EstimationInput,
    factors: &EmissionFactors,
) -> Result<CropReport> {
    let footprint = estimate_input(&datasets.yields, input, factors)?;
    let measures = recommendations(&datasets.measures, &input.crop);
    Ok(CropReport {
        input: input.clone(),
        footprint,
        measures,
    })
}

impl fmt::Display for CropReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Analysis for {}", self.input.crop)?;
        writeln!(f, "Entered Area: {} hectares", self.input.area)?;
        writeln!(f, "Fertilizer Used: {} kg", self.input.fertilizer)?;
        writeln!(f, "Pesticide Used: {} kg", self.input.pesticide)?;
        writeln!(f, "Estimated Carbon Footprint: {} units", self.footprint)?;

        if self.has_measures() {
            writeln!(f, "Recommended Measures")?;
            for measure in &self.measures {
                writeln!(f, "- {measure}")?;
            }
        } else {
            writeln!(f, "No specific measures found for this crop.")?;
        }
        Ok(())
    }
}
