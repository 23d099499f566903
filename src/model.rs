/// Core data types for the dengue/rainfall batch join pipeline.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no logic beyond small accessors, no I/O, and no external
/// dependencies — only types.

use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Dataset schema constants
// ---------------------------------------------------------------------------

/// Column schema of the dengue case dataset, in file order.
///
/// Raw lines are `|`-delimited and zipped positionally against this list;
/// see `parse::to_disease_record`.
pub const DISEASE_COLUMNS: [&str; 9] = [
    "id",
    "data_iniSE",
    "casos",
    "ibge_code",
    "cidade",
    "uf",
    "cep",
    "latitude",
    "longitude",
];

/// Name of the derived year-month field added to disease records after
/// parsing (`"2015-03"` for a `data_iniSE` of `"2015-03-10"`).
pub const FIELD_ANO_MES: &str = "ano_mes";

// ---------------------------------------------------------------------------
// Record types
// ---------------------------------------------------------------------------

/// One parsed row of the dengue case dataset.
///
/// A name→value mapping built by zipping `DISEASE_COLUMNS` against the split
/// fields of one raw line. Rows shorter than the schema produce a partial
/// mapping — absent columns are simply missing, not an error. The derived
/// `ano_mes` field is stored back onto the record by the key deriver so
/// later stages can read it.
#[derive(Debug, Clone, PartialEq)]
pub struct DiseaseRecord {
    pub fields: HashMap<String, String>,
}

impl DiseaseRecord {
    /// Field lookup by column name. Returns `None` for columns that were
    /// absent from a short row.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Field lookup with an empty-string fallback, for key derivation
    /// (a missing key field propagates as a malformed key, never a panic).
    pub fn get_or_empty(&self, name: &str) -> &str {
        self.get(name).unwrap_or("")
    }

    pub fn set(&mut self, name: &str, value: String) {
        self.fields.insert(name.to_string(), value);
    }
}

/// One parsed row of the rainfall dataset: `(date, millimeters, region)`,
/// taken positionally from a `,`-delimited line. No intermediate mapping is
/// used — the join key and measure are derived directly from these fields.
///
/// Fields absent from a short row are carried as empty strings: an empty
/// measure later fails numeric parsing (fatal), an empty date or region
/// yields a malformed key (tolerated).
#[derive(Debug, Clone, PartialEq)]
pub struct RainfallRecord {
    pub date: String,
    pub millimeters: String,
    pub region: String,
}

// ---------------------------------------------------------------------------
// Keyed and joined types
// ---------------------------------------------------------------------------

/// Composite join key `REGION-YEAR-MONTH`, e.g. `"SP-2015-03"`.
///
/// Equality is exact string equality: the two per-dataset key derivations
/// run independently and must produce byte-identical keys for the same
/// region and month. Keys are not validated — a malformed date yields a
/// best-effort key that simply never matches the other side.
pub type JoinKey = String;

/// One `(key, measure)` pair emitted by an aggregator: the sum of every raw
/// measure sharing that key within one dataset.
pub type AggregatedPoint = (JoinKey, f64);

/// The final denormalized row, present only for keys where both datasets
/// contributed an aggregate. Measures are carried as strings, already
/// rendered for output (see `format::render_measure`).
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedRow {
    pub region: String,
    pub year: String,
    pub month: String,
    pub rainfall: String,
    pub cases: String,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that abort a pipeline run.
///
/// There is no per-record skip or retry: a malformed numeric field is a
/// data-quality defect that must stop processing rather than silently
/// corrupt an aggregate, and any I/O failure voids the whole batch.
#[derive(Debug)]
pub enum PipelineError {
    /// A measure field that should be numeric held a non-empty, non-numeric
    /// value.
    BadNumericField {
        dataset: &'static str,
        field: &'static str,
        value: String,
    },
    /// Reading an input or writing the output failed.
    Io(std::io::Error),
    /// The configuration file could not be read or parsed.
    Config(String),
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::BadNumericField { dataset, field, value } => {
                write!(
                    f,
                    "non-numeric value {:?} in field '{}' of the {} dataset",
                    value, field, dataset
                )
            }
            PipelineError::Io(err) => write!(f, "I/O error: {}", err),
            PipelineError::Config(msg) => write!(f, "configuration error: {}", msg),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        PipelineError::Io(err)
    }
}
