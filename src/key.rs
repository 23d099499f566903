/// Join key derivation.
///
/// Both datasets reduce to the composite key `REGION-YEAR-MONTH`. The two
/// derivations run independently, so they must agree byte-for-byte on the
/// same region and month — that agreement is the correctness invariant the
/// whole join rests on. Keys are best-effort: a date with fewer than two
/// `-`-separated components still produces a (malformed) key rather than an
/// error, and validation is explicitly out of scope.

use crate::model::{DiseaseRecord, JoinKey, PipelineError, RainfallRecord, FIELD_ANO_MES};

/// Truncate an ISO-like date to its year-month prefix: the first two
/// `-`-separated components rejoined with `-`.
///
/// `"2015-03-10"` → `"2015-03"`. A single-component input comes back
/// unchanged; an empty input yields an empty string.
pub fn year_month(date: &str) -> String {
    date.split('-').take(2).collect::<Vec<_>>().join("-")
}

/// Derive `ano_mes` from `data_iniSE` and store it back onto the record,
/// so later stages (the region fan-out) can read it by name.
pub fn derive_ano_mes(record: &mut DiseaseRecord) {
    let ano_mes = year_month(record.get_or_empty("data_iniSE"));
    record.set(FIELD_ANO_MES, ano_mes);
}

/// Region key for the first-phase grouping of disease records: the raw `uf`
/// field, uppercase by convention in the data but passed through unvalidated.
pub fn region_key(record: &DiseaseRecord) -> String {
    record.get_or_empty("uf").to_string()
}

/// Fine-grained key for one disease record within its region group.
///
/// Composed from the region and the previously derived `ano_mes` field;
/// run `derive_ano_mes` first or the key ends in a dangling `-`.
pub fn disease_key(region: &str, record: &DiseaseRecord) -> JoinKey {
    format!("{}-{}", region, record.get_or_empty(FIELD_ANO_MES))
}

/// Key and normalized measure for one rainfall record, in one step.
///
/// The key is `{region}-{year_month(date)}`; the measure is the
/// `millimeters` field parsed as a float with negative values clamped to
/// `0.0` (sensor underflow markers like `-9999.0` must not poison a
/// monthly sum). A non-numeric measure — including the empty string left
/// by a short row — is a fatal parse error.
pub fn rainfall_point(record: &RainfallRecord) -> Result<(JoinKey, f64), PipelineError> {
    let key = format!("{}-{}", record.region, year_month(&record.date));
    let mm: f64 = record.millimeters.parse().map_err(|_| {
        PipelineError::BadNumericField {
            dataset: "chuvas",
            field: "mm",
            value: record.millimeters.clone(),
        }
    })?;
    let mm = if mm < 0.0 { 0.0 } else { mm };
    Ok((key, mm))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DISEASE_COLUMNS;
    use crate::parse::{split_line, to_disease_record};

    fn disease_record(line: &str) -> DiseaseRecord {
        let columns: Vec<String> = DISEASE_COLUMNS.iter().map(|c| c.to_string()).collect();
        to_disease_record(split_line(line, '|'), &columns)
    }

    #[test]
    fn test_year_month_truncates_full_date() {
        assert_eq!(year_month("2015-03-10"), "2015-03");
    }

    #[test]
    fn test_year_month_passes_short_dates_through() {
        // Fewer than two components: best-effort key, no error.
        assert_eq!(year_month("2015"), "2015");
        assert_eq!(year_month(""), "");
    }

    #[test]
    fn test_year_month_ignores_components_past_the_second() {
        assert_eq!(year_month("2015-03-10-extra"), "2015-03");
    }

    #[test]
    fn test_derive_ano_mes_stores_field_on_record() {
        let mut record = disease_record("1|2015-03-10|150|3500|City|SP|00000|0|0");
        derive_ano_mes(&mut record);
        assert_eq!(record.get("ano_mes"), Some("2015-03"));
    }

    #[test]
    fn test_derive_ano_mes_with_missing_date_yields_empty_field() {
        let mut record = disease_record("1");
        derive_ano_mes(&mut record);
        assert_eq!(record.get("ano_mes"), Some(""));
    }

    #[test]
    fn test_disease_and_rainfall_keys_agree_for_same_month() {
        let mut record = disease_record("1|2015-03-10|150|3500|City|SP|00000|0|0");
        derive_ano_mes(&mut record);
        let dengue_key = disease_key(&region_key(&record), &record);

        let rain = RainfallRecord {
            date: "2015-03-22".to_string(),
            millimeters: "12.0".to_string(),
            region: "SP".to_string(),
        };
        let (rain_key, _) = rainfall_point(&rain).expect("numeric measure should parse");

        assert_eq!(dengue_key, "SP-2015-03");
        assert_eq!(rain_key, dengue_key, "both derivations must be byte-identical");
    }

    #[test]
    fn test_rainfall_negative_measure_clamps_to_zero() {
        let rain = RainfallRecord {
            date: "2015-03-10".to_string(),
            millimeters: "-9999.0".to_string(),
            region: "SP".to_string(),
        };
        let (_, mm) = rainfall_point(&rain).expect("negative measure still parses");
        assert_eq!(mm, 0.0);
    }

    #[test]
    fn test_rainfall_non_numeric_measure_is_fatal() {
        let rain = RainfallRecord {
            date: "2015-03-10".to_string(),
            millimeters: "n/a".to_string(),
            region: "SP".to_string(),
        };
        assert!(matches!(
            rainfall_point(&rain),
            Err(PipelineError::BadNumericField { dataset: "chuvas", .. })
        ));
    }

    #[test]
    fn test_rainfall_empty_measure_from_short_row_is_fatal() {
        let rain = RainfallRecord {
            date: "2015-03-10".to_string(),
            millimeters: String::new(),
            region: String::new(),
        };
        assert!(rainfall_point(&rain).is_err(), "empty measure has no null rule");
    }
}
