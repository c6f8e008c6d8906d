use std::path::PathBuf;
use std::process::ExitCode;

use calib_baseline_core::{
    compare_files, init_with_level, level_from_verbosity, ToleranceSpec, DEFAULT_RATIO_TOLERANCE,
};
use clap::Parser;

/// Compare a freshly computed calibration result against a recorded baseline.
///
/// Exits with status 0 when every check passes, 1 otherwise; one diagnostic
/// line is written per failure.
#[derive(Parser, Debug)]
#[command(name = "calib-baseline", version)]
struct Cli {
    /// Path to the recorded baseline result document.
    #[arg(long = "baseline-file")]
    baseline_file: PathBuf,

    /// Path to the newly produced result document.
    #[arg(long = "current-file")]
    current_file: PathBuf,

    /// Absolute translation-error threshold in millimeters.
    #[arg(long = "translation-error-threshold")]
    translation_error_threshold: f64,

    /// Absolute rotation-error threshold in degrees.
    #[arg(long = "rotation-error-threshold")]
    rotation_error_threshold: f64,

    /// Relative tolerance applied to all metric ratios.
    #[arg(long = "ratio-tolerance", default_value_t = DEFAULT_RATIO_TOLERANCE)]
    ratio_tolerance: f64,

    /// Verbosity (1=error, 2=warning, 3=info, 4=debug, 5=trace).
    #[arg(long, default_value_t = 3)]
    verbose: u8,

    /// Optional path for a JSON report of the recorded failures.
    #[arg(long = "report-json")]
    report_json: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let _ = init_with_level(level_from_verbosity(cli.verbose));

    let tolerances = ToleranceSpec {
        translation_error_mm: cli.translation_error_threshold,
        rotation_error_deg: cli.rotation_error_threshold,
        ratio_tolerance: cli.ratio_tolerance,
    };

    let report = compare_files(&cli.baseline_file, &cli.current_file, &tolerances);

    if let Some(path) = &cli.report_json {
        if let Err(err) = report.write_json(path) {
            log::error!("writing JSON report to {} failed: {err}", path.display());
            return ExitCode::FAILURE;
        }
        log::info!("wrote JSON report to {}", path.display());
    }

    if report.passed() {
        log::info!(
            "calibration results match the baseline within tolerances (translation {} mm, rotation {} deg, ratio {})",
            tolerances.translation_error_mm,
            tolerances.rotation_error_deg,
            tolerances.ratio_tolerance
        );
        ExitCode::SUCCESS
    } else {
        log::error!(
            "comparison to baseline failed with {} error(s)",
            report.failure_count()
        );
        ExitCode::FAILURE
    }
}
