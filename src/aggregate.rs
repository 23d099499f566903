/// Per-dataset aggregation: group by join key and sum the measure.
///
/// The disease dataset aggregates in two explicit phases — records are first
/// grouped whole by region (`uf`), then each region group fans out one
/// `(REGION-YEAR-MONTH, cases)` emission per record, and only then are
/// emissions summed per fine-grained key. The fan-out must not start before
/// its region group is complete; collapsing the phases into a single
/// per-record grouping would be computationally equivalent here but would
/// change the observable grouping structure a parallel runner relies on.
///
/// The rainfall dataset is single-phase: key and normalized measure come
/// straight off each record, sums are taken per key, and each sum is then
/// rounded to one decimal place.
///
/// Summation is plain f64 addition, treated as commutative/associative for
/// this domain — no compensated accumulation. `merge_partials` lets a
/// partitioned execution reduce sub-batches independently and merge.

use std::collections::{BTreeMap, HashMap};

use crate::key;
use crate::model::{AggregatedPoint, DiseaseRecord, JoinKey, PipelineError, RainfallRecord};

// ---------------------------------------------------------------------------
// Disease: two-phase aggregation
// ---------------------------------------------------------------------------

/// Phase 1: group whole disease records by region.
///
/// A `BTreeMap` keeps region iteration order deterministic across runs.
/// Records with a missing `uf` group under the empty region rather than
/// erroring; the malformed keys they produce simply never join.
pub fn group_by_region(records: Vec<DiseaseRecord>) -> BTreeMap<String, Vec<DiseaseRecord>> {
    let mut groups: BTreeMap<String, Vec<DiseaseRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(key::region_key(&record)).or_default().push(record);
    }
    groups
}

/// Phase 2: fan out one keyed emission per record within a complete region
/// group.
///
/// Null handling happens here, per the measure's sanctioned rule: an absent
/// or empty `casos` contributes exactly `0.0`. A non-empty non-numeric
/// `casos` is a fatal parse error — silently zeroing it would corrupt the
/// aggregate.
pub fn disease_emissions(
    region: &str,
    records: &[DiseaseRecord],
) -> Result<Vec<AggregatedPoint>, PipelineError> {
    let mut points = Vec::with_capacity(records.len());
    for record in records {
        let cases = match record.get("casos") {
            None | Some("") => 0.0,
            Some(raw) => raw.parse().map_err(|_| PipelineError::BadNumericField {
                dataset: "dengue",
                field: "casos",
                value: raw.to_string(),
            })?,
        };
        points.push((key::disease_key(region, record), cases));
    }
    Ok(points)
}

/// Phase 3: sum emissions per fine-grained key.
///
/// Order-independent by design; also the reduction step shared with the
/// rainfall branch.
pub fn sum_by_key<I>(points: I) -> HashMap<JoinKey, f64>
where
    I: IntoIterator<Item = AggregatedPoint>,
{
    let mut sums: HashMap<JoinKey, f64> = HashMap::new();
    for (key, value) in points {
        *sums.entry(key).or_insert(0.0) += value;
    }
    sums
}

/// Full disease aggregation: region grouping, per-region fan-out, per-key
/// summation. Derives `ano_mes` on each record first so the fan-out can
/// read it by name.
pub fn aggregate_disease(
    mut records: Vec<DiseaseRecord>,
) -> Result<HashMap<JoinKey, f64>, PipelineError> {
    for record in &mut records {
        key::derive_ano_mes(record);
    }
    let mut emissions = Vec::with_capacity(records.len());
    for (region, group) in group_by_region(records) {
        emissions.extend(disease_emissions(&region, &group)?);
    }
    Ok(sum_by_key(emissions))
}

// ---------------------------------------------------------------------------
// Rainfall: single-phase aggregation
// ---------------------------------------------------------------------------

/// Round a summed rainfall volume to one decimal place.
///
/// Uses `f64::round`, i.e. round-half-away-from-zero at the shifted digit
/// (`10.25 → 10.3`). Applied once per key after summation, never per record.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Full rainfall aggregation: key + clamped measure per record, sum per
/// key, round each sum to one decimal.
pub fn aggregate_rainfall(
    records: &[RainfallRecord],
) -> Result<HashMap<JoinKey, f64>, PipelineError> {
    let mut points = Vec::with_capacity(records.len());
    for record in records {
        points.push(key::rainfall_point(record)?);
    }
    let mut sums = sum_by_key(points);
    for value in sums.values_mut() {
        *value = round_to_tenth(*value);
    }
    Ok(sums)
}

// ---------------------------------------------------------------------------
// Partitioned reduction
// ---------------------------------------------------------------------------

/// Merge one partial per-key sum into another.
///
/// Lets sub-batches be reduced independently and combined afterwards; every
/// record still contributes to its key exactly once. For rainfall, merge
/// un-rounded partials and round once at the end.
pub fn merge_partials(
    mut left: HashMap<JoinKey, f64>,
    right: HashMap<JoinKey, f64>,
) -> HashMap<JoinKey, f64> {
    for (key, value) in right {
        *left.entry(key).or_insert(0.0) += value;
    }
    left
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DISEASE_COLUMNS;
    use crate::parse::{split_line, to_disease_record};

    fn disease_records(lines: &[&str]) -> Vec<DiseaseRecord> {
        let columns: Vec<String> = DISEASE_COLUMNS.iter().map(|c| c.to_string()).collect();
        lines
            .iter()
            .map(|line| to_disease_record(split_line(line, '|'), &columns))
            .collect()
    }

    fn rain(date: &str, mm: &str, region: &str) -> RainfallRecord {
        RainfallRecord {
            date: date.to_string(),
            millimeters: mm.to_string(),
            region: region.to_string(),
        }
    }

    // --- Disease ------------------------------------------------------------

    #[test]
    fn test_region_grouping_precedes_fan_out() {
        let records = disease_records(&[
            "1|2015-03-10|10|3500|City|SP|00000|0|0",
            "2|2015-03-17|20|3300|Town|RJ|00000|0|0",
            "3|2015-04-05|30|3500|City|SP|00000|0|0",
        ]);
        let groups = group_by_region(records);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups["SP"].len(), 2, "both SP records in one complete group");
        assert_eq!(groups["RJ"].len(), 1);
    }

    #[test]
    fn test_fan_out_emits_one_point_per_record() {
        let mut records = disease_records(&[
            "1|2015-03-10|10|3500|City|SP|00000|0|0",
            "2|2015-03-17|20|3500|City|SP|00000|0|0",
        ]);
        for record in &mut records {
            crate::key::derive_ano_mes(record);
        }
        let points = disease_emissions("SP", &records).expect("numeric casos");
        assert_eq!(
            points,
            vec![
                ("SP-2015-03".to_string(), 10.0),
                ("SP-2015-03".to_string(), 20.0),
            ]
        );
    }

    #[test]
    fn test_disease_sums_per_region_and_month() {
        let records = disease_records(&[
            "1|2015-03-10|10|3500|City|SP|00000|0|0",
            "2|2015-03-17|20|3500|City|SP|00000|0|0",
            "3|2015-04-05|5|3500|City|SP|00000|0|0",
            "4|2015-03-12|7|3300|Town|RJ|00000|0|0",
        ]);
        let sums = aggregate_disease(records).expect("all casos numeric");
        assert_eq!(sums["SP-2015-03"], 30.0);
        assert_eq!(sums["SP-2015-04"], 5.0);
        assert_eq!(sums["RJ-2015-03"], 7.0);
    }

    #[test]
    fn test_empty_and_missing_casos_contribute_zero() {
        let records = disease_records(&[
            "1|2015-03-10||3500|City|SP|00000|0|0", // empty casos
            "2|2015-03-17",                         // short row, casos absent
            "3|2015-03-20|4|3500|City|SP|00000|0|0",
        ]);
        let sums = aggregate_disease(records).expect("null casos is not an error");
        assert_eq!(sums["SP-2015-03"], 4.0);
        // The short row has no uf either: it lands under a malformed key.
        assert_eq!(sums["-2015-03"], 0.0);
    }

    #[test]
    fn test_non_numeric_casos_aborts_the_run() {
        let records = disease_records(&["1|2015-03-10|muitos|3500|City|SP|00000|0|0"]);
        let result = aggregate_disease(records);
        assert!(matches!(
            result,
            Err(PipelineError::BadNumericField { dataset: "dengue", field: "casos", .. })
        ));
    }

    #[test]
    fn test_summation_is_order_independent() {
        let forward = disease_records(&[
            "1|2015-03-10|10|3500|City|SP|00000|0|0",
            "2|2015-03-17|20|3500|City|SP|00000|0|0",
            "3|2015-03-20|30|3500|City|SP|00000|0|0",
        ]);
        let mut reversed = forward.clone();
        reversed.reverse();
        let a = aggregate_disease(forward).expect("numeric");
        let b = aggregate_disease(reversed).expect("numeric");
        assert_eq!(a, b, "permuting input order must not change any sum");
    }

    // --- Rainfall -----------------------------------------------------------

    #[test]
    fn test_rainfall_sums_then_rounds_once() {
        let records = [
            rain("2015-03-10", "10.0", "SP"),
            rain("2015-03-11", "0.25", "SP"),
        ];
        let sums = aggregate_rainfall(&records).expect("numeric");
        // 10.25 rounds half away from zero at one decimal.
        assert_eq!(sums["SP-2015-03"], 10.3);
    }

    #[test]
    fn test_rainfall_example_from_canonical_row() {
        let records = [rain("2015-03-10", "25.67", "SP")];
        let sums = aggregate_rainfall(&records).expect("numeric");
        assert_eq!(sums["SP-2015-03"], 25.7);
    }

    #[test]
    fn test_negative_rainfall_contributes_zero_after_clamping() {
        let records = [
            rain("2015-03-10", "-9999.0", "SP"),
            rain("2015-03-11", "5.5", "SP"),
        ];
        let sums = aggregate_rainfall(&records).expect("numeric");
        assert_eq!(sums["SP-2015-03"], 5.5);
    }

    #[test]
    fn test_round_to_tenth_half_boundary_is_pinned() {
        // 10.25 and 102.5 are exactly representable in binary, so this
        // boundary is meaningful: half rounds away from zero.
        assert_eq!(round_to_tenth(10.25), 10.3);
        assert_eq!(round_to_tenth(12.34), 12.3);
        assert_eq!(round_to_tenth(12.0), 12.0);
    }

    // --- Partitioned reduction ----------------------------------------------

    #[test]
    fn test_merge_partials_accumulates_shared_keys() {
        let left = sum_by_key(vec![
            ("SP-2015-03".to_string(), 10.0),
            ("RJ-2015-03".to_string(), 1.0),
        ]);
        let right = sum_by_key(vec![
            ("SP-2015-03".to_string(), 20.0),
            ("MG-2015-03".to_string(), 2.0),
        ]);
        let merged = merge_partials(left, right);
        assert_eq!(merged["SP-2015-03"], 30.0);
        assert_eq!(merged["RJ-2015-03"], 1.0);
        assert_eq!(merged["MG-2015-03"], 2.0);
    }

    #[test]
    fn test_partitioned_reduction_equals_single_pass() {
        let points: Vec<AggregatedPoint> = (0..10)
            .map(|i| ("SP-2015-03".to_string(), i as f64))
            .collect();
        let single = sum_by_key(points.clone());
        let (a, b) = points.split_at(4);
        let merged = merge_partials(sum_by_key(a.to_vec()), sum_by_key(b.to_vec()));
        assert_eq!(single, merged);
    }
}
