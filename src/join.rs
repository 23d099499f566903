/// Join & reconcile: co-group the two aggregated streams and keep the
/// intersection.
///
/// The co-grouping is outer — every key from either side appears, mapped to
/// two possibly-empty value lists. Retention is then an AND: a key survives
/// only if both lists are non-empty, which makes the overall semantics an
/// inner join. One-sided keys are dropped silently; they are a normal
/// consequence of the datasets covering different months, not an error.
///
/// Each side has already reduced to one value per key, so the lists hold at
/// most one element in practice. The list contract stays anyway in case an
/// upstream change produces duplicates; the first element wins and extras
/// are logged (see DESIGN.md).

use std::collections::BTreeMap;

use crate::format;
use crate::logging::{self, Dataset};
use crate::model::{AggregatedPoint, JoinedRow};

/// Both sides' contributions for one key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoGrouped {
    pub chuvas: Vec<f64>,
    pub dengue: Vec<f64>,
}

impl CoGrouped {
    /// Retention rule: a key is kept iff both sides contributed.
    pub fn is_complete(&self) -> bool {
        !self.chuvas.is_empty() && !self.dengue.is_empty()
    }
}

/// Outer co-grouping over the union of keys.
///
/// `BTreeMap` gives ascending key order, which makes the joined output
/// deterministic across runs. Within one key, values keep their arrival
/// order per side.
pub fn co_group<R, D>(rainfall: R, disease: D) -> BTreeMap<String, CoGrouped>
where
    R: IntoIterator<Item = AggregatedPoint>,
    D: IntoIterator<Item = AggregatedPoint>,
{
    let mut groups: BTreeMap<String, CoGrouped> = BTreeMap::new();
    for (key, value) in rainfall {
        groups.entry(key).or_default().chuvas.push(value);
    }
    for (key, value) in disease {
        groups.entry(key).or_default().dengue.push(value);
    }
    groups
}

/// Unpack one retained key into the flat output row.
///
/// The key is split back into `(region, year, month)` on the first two `-`
/// occurrences. A region containing `-`, or a malformed key from a short
/// date, misattributes fields silently — the row carries garbage rather
/// than failing, and absent components become empty strings.
fn unpack(key: &str, grouped: &CoGrouped) -> JoinedRow {
    if grouped.chuvas.len() > 1 || grouped.dengue.len() > 1 {
        logging::warn(
            Dataset::Join,
            Some(key),
            &format!(
                "multiple aggregates per side ({} chuvas, {} dengue); taking the first",
                grouped.chuvas.len(),
                grouped.dengue.len()
            ),
        );
    }
    let mut parts = key.splitn(3, '-');
    JoinedRow {
        region: parts.next().unwrap_or("").to_string(),
        year: parts.next().unwrap_or("").to_string(),
        month: parts.next().unwrap_or("").to_string(),
        rainfall: format::render_measure(grouped.chuvas[0]),
        cases: format::render_measure(grouped.dengue[0]),
    }
}

/// Full join: co-group, filter to complete keys, unpack. Returns rows in
/// ascending key order along with the number of dropped one-sided keys.
pub fn join_datasets<R, D>(rainfall: R, disease: D) -> (Vec<JoinedRow>, usize)
where
    R: IntoIterator<Item = AggregatedPoint>,
    D: IntoIterator<Item = AggregatedPoint>,
{
    let groups = co_group(rainfall, disease);
    let total = groups.len();
    let rows: Vec<JoinedRow> = groups
        .iter()
        .filter(|(_, grouped)| grouped.is_complete())
        .map(|(key, grouped)| unpack(key, grouped))
        .collect();
    let dropped = total - rows.len();
    (rows, dropped)
}
