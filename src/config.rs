/// Pipeline configuration.
///
/// One explicit context object holding everything a run needs — input paths,
/// per-dataset delimiters, the disease column schema, and the output header —
/// threaded through the pipeline instead of module-level globals. Loadable
/// from a TOML file; every field has a default matching the canonical
/// dengue/rainfall datasets, so a partial (or absent) file still yields a
/// runnable configuration.

use serde::Deserialize;
use std::path::Path;

use crate::model::{PipelineError, DISEASE_COLUMNS};

/// Header line of the joined output table. Written byte-identically as the
/// first output line, even when the join result is empty.
pub const OUTPUT_HEADER: &str = "UF;ANO;MES;CHUVA;DENGUE";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Path to the `|`-delimited dengue case dataset.
    pub disease_input: String,
    /// Path to the `,`-delimited rainfall dataset.
    pub rainfall_input: String,
    /// Path of the final joined table.
    pub output: String,
    /// Optional path to also write the JSON run report.
    pub report_output: Option<String>,

    /// Field delimiter of the disease dataset.
    pub disease_delimiter: char,
    /// Field delimiter of the rainfall dataset.
    pub rainfall_delimiter: char,
    /// Field delimiter of the output rows.
    pub output_delimiter: char,

    /// Column schema zipped positionally against disease rows.
    pub disease_columns: Vec<String>,
    /// Header line prepended to the output.
    pub output_header: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            disease_input: "casos_dengue.txt".to_string(),
            rainfall_input: "chuvas.csv".to_string(),
            output: "resultado.csv".to_string(),
            report_output: None,
            disease_delimiter: '|',
            rainfall_delimiter: ',',
            output_delimiter: ';',
            disease_columns: DISEASE_COLUMNS.iter().map(|c| c.to_string()).collect(),
            output_header: OUTPUT_HEADER.to_string(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a TOML file. Unset keys fall back to their
    /// defaults; an unreadable or malformed file is a fatal config error.
    pub fn load(path: &Path) -> Result<PipelineConfig, PipelineError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        toml::from_str(&text).map_err(|e| {
            PipelineError::Config(format!("cannot parse {}: {}", path.display(), e))
        })
    }
}
