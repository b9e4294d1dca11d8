use crate::models::config::AppConfig;
use crate::models::reading::PairingOutcome;
use crate::models::run_report::RunReport;
use crate::services::export::SpreadsheetExporter;
use crate::services::image_source::ImageSource;
use crate::services::mileage_run::{MileageRun, Pacer, RunContext, RunSettings, TokioPacer};
use crate::services::recognition::{GeminiClient, Recognizer};
use clap::Args;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Args)]
pub struct RunArgs {
    /// ZIP archive or directory of odometer photos
    pub source: PathBuf,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Seconds to wait after each recognition call
    #[arg(long)]
    pub delay: Option<u64>,

    /// Gemini model name
    #[arg(long)]
    pub model: Option<String>,

    /// Directory for the spreadsheet
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Add a sheet with the raw reading per photo
    #[arg(long)]
    pub raw_sheet: bool,

    /// Print the run report as JSON
    #[arg(long)]
    pub json: bool,

    /// Skip writing the spreadsheet
    #[arg(long)]
    pub no_export: bool,
}

/// Command line flags win over the config file for this run
pub fn apply_overrides(config: &mut AppConfig, args: &RunArgs) {
    if let Some(delay) = args.delay {
        config.pacing.delay_secs = delay;
    }
    if let Some(model) = &args.model {
        config.recognition.model = model.clone();
    }
    if let Some(out) = &args.out {
        config.export.output_dir = Some(out.clone());
    }
    if args.raw_sheet {
        config.export.include_raw_sheet = true;
    }
}

/// Load the photos and run the recognition batch.
/// A source without accepted images yields an insufficient-data report.
pub async fn collect_report(
    args: &RunArgs,
    config: &AppConfig,
    recognizer: &dyn Recognizer,
    pacer: &dyn Pacer,
) -> Result<RunReport, String> {
    let images = ImageSource::new(&config.source.extensions).load(&args.source)?;
    if images.is_empty() {
        warn!("No images found in {}", args.source.display());
    } else {
        info!("{} images found, starting recognition", images.len());
    }

    let settings = RunSettings {
        prompt: config.recognition.prompt.clone(),
        delay: Duration::from_secs(config.pacing.delay_secs),
    };

    Ok(MileageRun::new(recognizer, pacer, settings)
        .execute(RunContext::new(images))
        .await)
}

/// Recognize, reconcile, print and export
pub async fn run_batch(args: &RunArgs, config: &AppConfig) -> Result<(), String> {
    let client = GeminiClient::new(args.api_key.as_str(), &config.recognition)?;
    let report = collect_report(args, config, &client, &TokioPacer).await?;

    if args.json {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("Failed to serialize report: {}", e))?;
        println!("{}", json);
    } else {
        print!("{}", format_report(&report));
    }

    if let PairingOutcome::Paired(pairs) = &report.outcome {
        if !args.no_export {
            let dir = config
                .export
                .output_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from("."));
            let exporter = SpreadsheetExporter::new(
                config.export.file_suffix.as_str(),
                config.export.include_raw_sheet,
            );
            let path = exporter.export_to_dir(&dir, pairs, &report.results)?;
            info!("Spreadsheet written to {}", path.display());
            println!("Saved {}", path.display());
        }
    }

    Ok(())
}

/// Human-readable run summary: per-photo log, then the pair table
pub fn format_report(report: &RunReport) -> String {
    let mut out = String::new();

    for result in &report.results {
        let _ = writeln!(out, "{:<24} {}", result.file_name, result.display_text());
    }

    if report.quota_exhausted {
        let _ = writeln!(
            out,
            "Quota exhausted, {} photo(s) not processed",
            report.skipped
        );
    }

    let _ = writeln!(out);
    match &report.outcome {
        PairingOutcome::Paired(pairs) => {
            let _ = writeln!(out, "{:>10} {:>10} {:>10}", "Entry", "Exit", "Difference");
            for pair in pairs {
                let _ = writeln!(
                    out,
                    "{:>10} {:>10} {:>10}",
                    pair.entry, pair.exit, pair.difference
                );
            }
        }
        PairingOutcome::InsufficientData => {
            let _ = writeln!(out, "Not enough data to pair entry and exit readings.");
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::reading::{CandidateReading, RecognitionResult, ReconciledPair};

    fn args() -> RunArgs {
        RunArgs {
            source: PathBuf::from("photos.zip"),
            api_key: "key".to_string(),
            delay: None,
            model: None,
            out: None,
            raw_sheet: false,
            json: false,
            no_export: false,
        }
    }

    #[test]
    fn test_overrides_only_set_fields() {
        let mut config = AppConfig::default();
        apply_overrides(&mut config, &args());
        assert_eq!(config, AppConfig::default());

        let mut custom = args();
        custom.delay = Some(0);
        custom.model = Some("gemini-1.5-pro".to_string());
        custom.out = Some(PathBuf::from("/tmp/out"));
        custom.raw_sheet = true;
        apply_overrides(&mut config, &custom);

        assert_eq!(config.pacing.delay_secs, 0);
        assert_eq!(config.recognition.model, "gemini-1.5-pro");
        assert_eq!(config.export.output_dir, Some(PathBuf::from("/tmp/out")));
        assert!(config.export.include_raw_sheet);
    }

    #[test]
    fn test_format_report_with_pairs() {
        let report = RunReport {
            results: vec![
                RecognitionResult::text("a.jpg", "100 km"),
                RecognitionResult::failed("b.jpg", "timeout"),
                RecognitionResult::text("c.jpg", "300 km"),
            ],
            candidates: vec![
                CandidateReading {
                    mileage: 100,
                    occurrences: 1,
                },
                CandidateReading {
                    mileage: 300,
                    occurrences: 1,
                },
            ],
            outcome: PairingOutcome::Paired(vec![ReconciledPair::new(100, 300)]),
            quota_exhausted: false,
            skipped: 0,
        };

        let text = format_report(&report);
        assert!(text.contains("b.jpg"));
        assert!(text.contains("Error"));
        assert!(text.contains("Difference"));
        assert!(text.contains("200"));
        assert!(!text.contains("Quota"));
    }

    #[test]
    fn test_format_report_insufficient_after_quota() {
        let report = RunReport {
            results: vec![RecognitionResult::text("a.jpg", "100 km")],
            candidates: vec![CandidateReading {
                mileage: 100,
                occurrences: 1,
            }],
            outcome: PairingOutcome::InsufficientData,
            quota_exhausted: true,
            skipped: 3,
        };

        let text = format_report(&report);
        assert!(text.contains("Quota exhausted, 3 photo(s) not processed"));
        assert!(text.contains("Not enough data"));
    }

    #[tokio::test]
    async fn test_empty_archive_is_insufficient_data() {
        let dir = tempfile::tempdir().unwrap();
        let zip_path = dir.path().join("empty.zip");
        let mut writer = zip::ZipWriter::new(std::fs::File::create(&zip_path).unwrap());
        writer
            .start_file("notes.txt", zip::write::SimpleFileOptions::default())
            .unwrap();
        std::io::Write::write_all(&mut writer, b"no photos here").unwrap();
        writer.finish().unwrap();

        let mut run_args = args();
        run_args.source = zip_path;
        run_args.no_export = true;
        let config = AppConfig::default();

        let client = GeminiClient::new("key", &config.recognition).unwrap();
        let report = collect_report(&run_args, &config, &client, &TokioPacer)
            .await
            .unwrap();
        assert!(report.results.is_empty());
        assert_eq!(report.outcome, PairingOutcome::InsufficientData);

        let result = run_batch(&run_args, &config).await;
        assert_eq!(result, Ok(()));
    }

    #[tokio::test]
    async fn test_missing_source_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut run_args = args();
        run_args.source = dir.path().join("missing.zip");

        let err = run_batch(&run_args, &AppConfig::default())
            .await
            .unwrap_err();
        assert!(err.starts_with("Failed to open archive"));
    }
}
