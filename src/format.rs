/// Output row formatting.

use crate::model::JoinedRow;

/// Render a measure the way the output table has always carried floats:
/// integral values keep a trailing `.0` (`150.0`, not `150`), everything
/// else uses the shortest round-tripping decimal form.
pub fn render_measure(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// Join the row's five fields with the output delimiter, in the fixed
/// `UF;ANO;MES;CHUVA;DENGUE` order. The header line itself is the sink's
/// responsibility, attached exactly once per output.
pub fn format_row(row: &JoinedRow, delimiter: char) -> String {
    [
        row.region.as_str(),
        row.year.as_str(),
        row.month.as_str(),
        row.rainfall.as_str(),
        row.cases.as_str(),
    ]
    .join(&delimiter.to_string())
}
