//! Runtime configuration for the dashboard binary.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_INPUT: &str = "All_Attribute_Table.csv";
pub const DEFAULT_OUTPUT_DIR: &str = "dashboard_output";
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// CSV export of the accident attribute table
    pub input_path: PathBuf,

    /// Directory receiving per-section CSVs, summary.json and dashboard.json
    pub output_dir: PathBuf,

    /// Rows shown per section in console previews
    pub preview_rows: usize,

    /// Write export files in addition to the console preview
    pub export: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            preview_rows: DEFAULT_PREVIEW_ROWS,
            export: true,
        }
    }
}

impl DashboardConfig {
    pub fn validate(&self) -> Result<()> {
        if self.preview_rows == 0 {
            return Err(Error::configuration("preview rows must be at least 1"));
        }
        let ext = self
            .input_path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        if matches!(ext.as_deref(), Some("xlsx") | Some("xls")) {
            return Err(Error::configuration(format!(
                "'{}' is a spreadsheet; export its first sheet as CSV and pass that file",
                self.input_path.display()
            )));
        }
        Ok(())
    }
}
