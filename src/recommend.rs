//! Recommendation lookup over the measures dataset.

use std::collections::HashSet;

use crate::data::filter::measure_rows_for;
use crate::data::model::MeasuresTable;

/// Unique measures recorded for `crop`, in first-seen order.
///
/// An empty result is a normal outcome: a crop may have yield data but no
/// recorded measures.
pub fn recommendations(measures: &MeasuresTable, crop: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    measure_rows_for(measures, crop)
        .into_iter()
        .map(|r| r.necessary_measures.as_str())
        .filter(|m| seen.insert(*m))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::MeasureRecord;

    fn measures(rows: &[(&str, &str)]) -> MeasuresTable {
        MeasuresTable {
            records: rows
                .iter()
                .map(|(crop, m)| MeasureRecord {
                    crop: crop.to_string(),
                    necessary_measures: m.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_duplicates_collapsed_in_first_seen_order() {
        let table = measures(&[
            ("Wheat", "Use drip irrigation"),
            ("Wheat", "Use drip irrigation"),
            ("Wheat", "Rotate crops"),
        ]);
        assert_eq!(
            recommendations(&table, "Wheat"),
            vec!["Use drip irrigation", "Rotate crops"]
        );
    }

    #[test]
    fn test_case_insensitive_crop() {
        let table = measures(&[
            ("Wheat", "Rotate crops"),
            ("WHEAT", "Mulch"),
            ("Rice", "Flood control"),
        ]);
        assert_eq!(
            recommendations(&table, "wheat"),
            recommendations(&table, "Wheat")
        );
        assert_eq!(recommendations(&table, "wheat"), vec!["Rotate crops", "Mulch"]);
    }

    #[test]
    fn test_measure_duplicates_are_exact_match_only() {
        let table = measures(&[("Rice", "Mulch"), ("Rice", "mulch")]);
        assert_eq!(recommendations(&table, "Rice"), vec!["Mulch", "mulch"]);
    }

    #[test]
    fn test_unknown_crop_is_empty() {
        let table = measures(&[("Rice", "Mulch")]);
        assert!(recommendations(&table, "Barley").is_empty());
    }
}
