use super::model::{MeasureRecord, MeasuresTable, YieldRecord, YieldTable};

// ---------------------------------------------------------------------------
// Crop predicate
// ---------------------------------------------------------------------------

/// Case-insensitive exact match between a row's crop and the requested one.
pub fn crop_matches(row_crop: &str, requested: &str) -> bool {
    row_crop == requested || row_crop.to_lowercase() == requested.to_lowercase()
}

/// Yield rows for `crop`, in dataset order.
pub fn yield_rows_for<'a>(table: &'a YieldTable, crop: &str) -> Vec<&'a YieldRecord> {
    table
        .records
        .iter()
        .filter(|r| crop_matches(&r.crop, crop))
        .collect()
}

/// Measure rows for `crop`, in dataset order.
pub fn measure_rows_for<'a>(table: &'a MeasuresTable, crop: &str) -> Vec<&'a MeasureRecord> {
    table
        .records
        .iter()
        .filter(|r| crop_matches(&r.crop, crop))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crop_matches_ignores_case_only() {
        assert!(crop_matches("Wheat", "wheat"));
        assert!(crop_matches("WHEAT", "Wheat"));
        assert!(!crop_matches("Wheat ", "wheat"));
        assert!(!crop_matches("Wheat", "Whe"));
    }

    #[test]
    fn test_measure_rows_for_keeps_order() {
        let table = MeasuresTable {
            records: vec![
                MeasureRecord {
                    crop: "Rice".into(),
                    necessary_measures: "A".into(),
                },
                MeasureRecord {
                    crop: "Wheat".into(),
                    necessary_measures: "B".into(),
                },
                MeasureRecord {
                    crop: "rice".into(),
                    necessary_measures: "C".into(),
                },
            ],
        };
        let rows: Vec<&str> = measure_rows_for(&table, "RICE")
            .iter()
            .map(|r| r.necessary_measures.as_str())
            .collect();
        assert_eq!(rows, vec!["A", "C"]);
    }
}
