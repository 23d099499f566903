/// Run summary report.
///
/// One serializable record of what a batch run did: how many lines each
/// branch read, how many keys each side aggregated, and how the join came
/// out. Written as JSON next to the output table when configured, mostly
/// for eyeballing data-quality drift between monthly extracts.

use chrono::Utc;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub timestamp: String,
    pub dengue: BranchStats,
    pub chuvas: BranchStats,
    pub joined_rows: usize,
    pub dropped_keys: usize,
    pub output_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchStats {
    /// Data lines read, header excluded.
    pub lines_read: usize,
    /// Distinct join keys after aggregation.
    pub keys: usize,
}

impl RunReport {
    pub fn new(
        dengue: BranchStats,
        chuvas: BranchStats,
        joined_rows: usize,
        dropped_keys: usize,
        output_path: &str,
    ) -> Self {
        RunReport {
            timestamp: Utc::now().to_rfc3339(),
            dengue,
            chuvas,
            joined_rows,
            dropped_keys,
            output_path: output_path.to_string(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_serializes_with_branch_stats() {
        let report = RunReport::new(
            BranchStats { lines_read: 100, keys: 12 },
            BranchStats { lines_read: 300, keys: 15 },
            10,
            7,
            "resultado.csv",
        );
        let json = report.to_json().expect("report should serialize");
        assert!(json.contains("\"joined_rows\": 10"));
        assert!(json.contains("\"dropped_keys\": 7"));
        assert!(json.contains("\"lines_read\": 300"));
    }

    #[test]
    fn test_report_round_trips_through_json() {
        let report = RunReport::new(
            BranchStats { lines_read: 1, keys: 1 },
            BranchStats { lines_read: 2, keys: 2 },
            1,
            1,
            "out.csv",
        );
        let json = report.to_json().unwrap();
        let back: RunReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.joined_rows, report.joined_rows);
        assert_eq!(back.dengue.lines_read, 1);
    }
}
