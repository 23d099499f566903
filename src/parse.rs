/// Record parsing: raw delimited lines into dataset records.
///
/// Splitting is deliberately dumb — every delimiter occurrence splits, no
/// trimming, no quoting, no type coercion. The inputs are machine-written
/// extracts, not general CSV, and the join key must be derived from the
/// bytes exactly as they appear.

use crate::model::{DiseaseRecord, RainfallRecord};

/// Split one raw line on every occurrence of `delimiter`.
///
/// An empty line yields a single empty field, not an error.
pub fn split_line(line: &str, delimiter: char) -> Vec<String> {
    line.split(delimiter).map(str::to_string).collect()
}

/// Zip split fields against a column schema into a disease record.
///
/// The zip is positional and truncates to the shorter side: a short row
/// produces a partial mapping with the trailing columns absent (accepted
/// silently — later stages decide whether an absent field matters), and
/// surplus fields beyond the schema are dropped.
pub fn to_disease_record(fields: Vec<String>, columns: &[String]) -> DiseaseRecord {
    let fields = columns
        .iter()
        .zip(fields)
        .map(|(name, value)| (name.clone(), value))
        .collect();
    DiseaseRecord { fields }
}

/// Take the rainfall triple `(date, millimeters, region)` positionally.
///
/// Absent positions become empty strings: an empty measure surfaces later
/// as a fatal numeric parse, an empty date or region as a malformed key.
/// Fields past the third are dropped.
pub fn to_rainfall_record(fields: Vec<String>) -> RainfallRecord {
    let mut iter = fields.into_iter();
    RainfallRecord {
        date: iter.next().unwrap_or_default(),
        millimeters: iter.next().unwrap_or_default(),
        region: iter.next().unwrap_or_default(),
    }
}
