use std::{
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use clap::Parser;
use colored::Colorize;
use framepack::{ExtractOptions, FfmpegLogLevel, FileOutcome, ProgressCallback, ProgressInfo};

const CLI_AFTER_HELP: &str = "Each input produces <stem>.h5 beside it, holding a VideoFrames dataset of PNG-encoded frames.\n\nExamples:\n  framepack clip.mp4\n  framepack recordings/*.avi\n\nEnvironment:\n  FRAMEPACK_FFMPEG_LOG  FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace). Default: error";

#[derive(Debug, Parser)]
#[command(
    name = "framepack",
    version,
    about = "Extract video frames into PNG-compressed HDF5 containers",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    /// Video files to extract.
    paths: Vec<PathBuf>,
}

/// Writes `[-] n/total frames processed.` in place on stdout.
#[derive(Default)]
struct TerminalProgress {
    line_open: AtomicBool,
}

impl TerminalProgress {
    /// End the in-place progress line, if one was written.
    fn finish_line(&self) {
        if self.line_open.swap(false, Ordering::AcqRel) {
            println!();
        }
    }
}

impl ProgressCallback for TerminalProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        let mut stdout = io::stdout().lock();
        let _ = write!(
            stdout,
            "\r{}",
            progress_line(info.current_frame, info.total_frames)
        );
        let _ = stdout.flush();
        self.line_open.store(true, Ordering::Release);
    }
}

fn progress_line(current: u64, total: u64) -> String {
    format!("[-] {current}/{total} frames processed.")
}

fn resolve_paths(paths: &[PathBuf]) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    paths
        .iter()
        .map(|path| {
            std::path::absolute(path)
                .map_err(|error| -> Box<dyn std::error::Error> {
                    format!("cannot resolve {}: {error}", path.display()).into()
                })
        })
        .collect()
}

fn report_outcome(outcome: &FileOutcome) {
    match &outcome.result {
        Ok(report) => {
            if report.short_read {
                eprintln!(
                    "{} {}",
                    "warning:".yellow().bold(),
                    format!(
                        "{} decoded {} of {} reported frames; remaining slots left empty",
                        outcome.input.display(),
                        report.frames_written,
                        report.frame_count,
                    )
                    .yellow()
                );
            }
            eprintln!(
                "{} {} ({}/{} frames)",
                "saved".green().bold(),
                report.output.display(),
                report.frames_written,
                report.frame_count,
            );
        }
        Err(error) => {
            eprintln!(
                "{} {}: {error}",
                "[!] Error:".red().bold(),
                outcome.input.display(),
            );
        }
    }
}

fn failure_count(outcomes: &[FileOutcome]) -> usize {
    outcomes.iter().filter(|outcome| !outcome.is_success()).count()
}

fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = framepack::ffmpeg_log_level_from_env(FfmpegLogLevel::Error)?;
    framepack::set_ffmpeg_log_level(level);

    if cli.paths.is_empty() {
        return Ok(ExitCode::SUCCESS);
    }

    let paths = resolve_paths(&cli.paths)?;

    let progress = Arc::new(TerminalProgress::default());
    let options = ExtractOptions::new().with_progress(progress.clone());

    let report = framepack::validate_inputs(&paths);
    if !report.is_valid() {
        for error in &report.errors {
            eprintln!("{} {error}.", "[!] Error:".red().bold());
        }
        return Ok(ExitCode::FAILURE);
    }

    let mut outcomes = Vec::with_capacity(report.accepted.len());
    for input in &report.accepted {
        let result = framepack::extract_file(input, &options);
        progress.finish_line();

        let outcome = FileOutcome {
            input: input.clone(),
            result,
        };
        report_outcome(&outcome);
        outcomes.push(outcome);
    }

    if failure_count(&outcomes) > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(error) => {
            eprintln!("{} {error}", "[!] Error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
