use clap::Parser;
use gyro_lib::{config::GyroConfig, replay::Replay};
use gyro_log::parse_log;
use std::{fs, path::PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(version)]
struct Opts {
    /// Gyroscope configuration toml file.
    ///
    /// The nominal configuration is used when not provided.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Don't print the published reports, only log the summary
    #[arg(long)]
    summary_only: bool,

    /// Replay log file
    log: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let opts = Opts::parse();

    let config = match &opts.config {
        Some(path) => GyroConfig::load(path)?,
        None => GyroConfig::nominal(),
    };

    let content = fs::read_to_string(&opts.log)?;
    let (_, entries) =
        parse_log(&content).map_err(|e| format!("Failed to parse replay log. {e}"))?;
    info!(log = %opts.log.display(), entries = entries.len(), "Replaying");

    let mut replay = Replay::new(&config)?;
    for entry in entries.iter() {
        let reports = replay.apply(entry)?;
        if !opts.summary_only {
            for r in reports.iter() {
                println!("{}", serde_json::to_string(r)?);
            }
        }
    }

    let summary = replay.summary();
    info!(
        entries = summary.entries,
        gyro = summary.gyro_reports,
        integrated = summary.integrated_reports,
        fifo = summary.fifo_reports,
        status = summary.status_reports,
        dropped = summary.dropped,
        vibration = summary.vibration_metric,
        coning = summary.coning_vibration,
        clipping = ?summary.clipping,
        "Replay complete"
    );

    Ok(())
}
