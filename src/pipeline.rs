/// Pipeline orchestration: line sources, the two aggregation branches, the
/// join barrier, and the sink.
///
/// A run is batch all-or-nothing. Both branches must be fully aggregated
/// before the join starts (it is not a streaming join), and the output is
/// committed by writing to a temporary file and renaming it onto the final
/// path — a failed run leaves no partial output behind.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::aggregate;
use crate::config::PipelineConfig;
use crate::format;
use crate::join;
use crate::logging::{self, Dataset};
use crate::model::{DiseaseRecord, PipelineError, RainfallRecord};
use crate::parse;
use crate::report::{BranchStats, RunReport};

// ---------------------------------------------------------------------------
// Line sources
// ---------------------------------------------------------------------------

/// Read every data line of a delimited text file, skipping exactly one
/// header line. I/O errors are fatal; content is passed through untouched.
pub fn read_data_lines(path: &Path) -> Result<Vec<String>, PipelineError> {
    let file = File::open(path)?;
    let mut lines = Vec::new();
    for (i, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if i == 0 {
            continue; // header
        }
        lines.push(line);
    }
    Ok(lines)
}

fn parse_disease_lines(lines: &[String], config: &PipelineConfig) -> Vec<DiseaseRecord> {
    lines
        .iter()
        .map(|line| {
            let fields = parse::split_line(line, config.disease_delimiter);
            parse::to_disease_record(fields, &config.disease_columns)
        })
        .collect()
}

fn parse_rainfall_lines(lines: &[String], config: &PipelineConfig) -> Vec<RainfallRecord> {
    lines
        .iter()
        .map(|line| parse::to_rainfall_record(parse::split_line(line, config.rainfall_delimiter)))
        .collect()
}

// ---------------------------------------------------------------------------
// Sink
// ---------------------------------------------------------------------------

/// Write the header and every formatted row, atomically.
///
/// The rows land in `<output>.tmp` first and are renamed onto the final
/// path only after a successful flush, so a failing run cannot leave a
/// truncated table behind. The header goes first even when `rows` is empty.
pub fn write_output(
    path: &Path,
    header: &str,
    rows: &[String],
) -> Result<(), PipelineError> {
    let tmp_path = path.with_extension("tmp");
    {
        let file = File::create(&tmp_path)?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "{}", header)?;
        for row in rows {
            writeln!(writer, "{}", row)?;
        }
        writer.flush()?;
    }
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Run
// ---------------------------------------------------------------------------

/// Execute one whole batch run from the given configuration.
///
/// Reads and aggregates both datasets, joins them on the shared key space,
/// writes the output table, and returns the run report. Any error aborts
/// the run with no committed output.
pub fn run(config: &PipelineConfig) -> Result<RunReport, PipelineError> {
    // Dengue branch: parse, derive keys, two-phase aggregate.
    let disease_lines = read_data_lines(Path::new(&config.disease_input))?;
    let disease_records = parse_disease_lines(&disease_lines, config);
    let disease_sums = aggregate::aggregate_disease(disease_records)?;
    logging::log_branch_summary(Dataset::Dengue, disease_lines.len(), disease_sums.len());

    // Chuvas branch: parse, single-phase aggregate with rounding.
    let rainfall_lines = read_data_lines(Path::new(&config.rainfall_input))?;
    let rainfall_records = parse_rainfall_lines(&rainfall_lines, config);
    let rainfall_sums = aggregate::aggregate_rainfall(&rainfall_records)?;
    logging::log_branch_summary(Dataset::Chuvas, rainfall_lines.len(), rainfall_sums.len());

    let dengue_stats = BranchStats {
        lines_read: disease_lines.len(),
        keys: disease_sums.len(),
    };
    let chuvas_stats = BranchStats {
        lines_read: rainfall_lines.len(),
        keys: rainfall_sums.len(),
    };

    // Join barrier: both sides are fully materialized at this point.
    let (joined, dropped) = join::join_datasets(rainfall_sums, disease_sums);
    logging::info(
        Dataset::Join,
        None,
        &format!("{} keys joined, {} one-sided keys dropped", joined.len(), dropped),
    );

    let rows: Vec<String> = joined
        .iter()
        .map(|row| format::format_row(row, config.output_delimiter))
        .collect();
    write_output(Path::new(&config.output), &config.output_header, &rows)?;
    logging::info(
        Dataset::Sink,
        None,
        &format!("wrote {} rows to {}", rows.len(), config.output),
    );

    let report = RunReport::new(dengue_stats, chuvas_stats, joined.len(), dropped, &config.output);
    if let Some(ref report_path) = config.report_output {
        let json = report
            .to_json()
            .map_err(|e| PipelineError::Config(format!("cannot serialize run report: {}", e)))?;
        std::fs::write(report_path, json)?;
    }
    Ok(report)
}
