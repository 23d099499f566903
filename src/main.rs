/// Binary entry point: trigger a single batch run.
///
/// Usage: `denrain_pipeline [config.toml]` — one optional positional
/// argument naming the configuration file; with none, built-in defaults
/// are used. No other flags.

use std::path::Path;
use std::process::ExitCode;

use denrain_pipeline::config::PipelineConfig;
use denrain_pipeline::logging::{self, Dataset, LogLevel};
use denrain_pipeline::pipeline;

fn main() -> ExitCode {
    logging::init_logger(LogLevel::Info, None);

    let config = match std::env::args().nth(1) {
        Some(path) => match PipelineConfig::load(Path::new(&path)) {
            Ok(config) => config,
            Err(err) => {
                logging::error(Dataset::System, None, &err.to_string());
                return ExitCode::FAILURE;
            }
        },
        None => PipelineConfig::default(),
    };

    match pipeline::run(&config) {
        Ok(report) => {
            logging::info(
                Dataset::System,
                None,
                &format!(
                    "run complete: {} joined rows, {} one-sided keys dropped",
                    report.joined_rows, report.dropped_keys
                ),
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            logging::error(Dataset::System, None, &format!("run aborted: {}", err));
            ExitCode::FAILURE
        }
    }
}
