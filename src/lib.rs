/// Batch join of dengue case counts and rainfall measurements.
///
/// Two delimited time-series extracts are keyed down to a shared
/// `REGION-YEAR-MONTH` space, summed per key, inner-joined, and written as
/// one `;`-delimited table headed `UF;ANO;MES;CHUVA;DENGUE`.
///
/// Module map, in pipeline order:
/// - `parse` — raw lines into records
/// - `key` — join key derivation
/// - `aggregate` — per-dataset grouping and summation
/// - `join` — co-group and reconcile the two sides
/// - `format` — output rows
/// - `pipeline` — sources, orchestration, sink
/// - `model`, `config`, `logging`, `report` — shared types and plumbing

pub mod aggregate;
pub mod config;
pub mod format;
pub mod join;
pub mod key;
pub mod logging;
pub mod model;
pub mod parse;
pub mod pipeline;
pub mod report;
