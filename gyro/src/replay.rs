//! Drives a pipeline from a parsed replay log.
//!
//! The pipeline clock follows the log: before a measurement entry is
//! ingested the clock is set to its sample time, so reports are stamped as
//! if the pipeline had run live.

use crate::{
    channel::{Subscriber, TracedMessage},
    clock::ManualClock,
    config::GyroConfig,
    error::GyroError,
    pipeline::{GyroPipeline, GyroTopics},
    reports::{GyroFifoReport, GyroIntegratedReport, GyroReport, GyroStatusReport},
    units::{Temperature, Timestamp},
};
use gyro_log::LogEntry;
use serde::Serialize;
use tracing::debug;

/// Any report, tagged with its topic when serialized
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "topic", rename_all = "snake_case")]
pub enum PublishedReport {
    Gyro(GyroReport),
    GyroIntegrated(GyroIntegratedReport),
    GyroFifo(GyroFifoReport),
    GyroStatus(GyroStatusReport),
}

impl TracedMessage for PublishedReport {
    fn topic(&self) -> &'static str {
        match self {
            PublishedReport::Gyro(r) => r.topic(),
            PublishedReport::GyroIntegrated(r) => r.topic(),
            PublishedReport::GyroFifo(r) => r.topic(),
            PublishedReport::GyroStatus(r) => r.topic(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReplaySummary {
    pub entries: usize,
    pub gyro_reports: usize,
    pub integrated_reports: usize,
    pub fifo_reports: usize,
    pub status_reports: usize,
    pub dropped: usize,
    pub first_timestamp: Option<Timestamp>,
    pub last_timestamp: Option<Timestamp>,
    pub vibration_metric: f32,
    pub coning_vibration: f32,
    pub clipping: [u64; 3],
}

#[derive(Debug)]
pub struct Replay {
    clock: ManualClock,
    pipeline: GyroPipeline<ManualClock>,
    gyro: Subscriber<GyroReport>,
    integrated: Subscriber<GyroIntegratedReport>,
    fifo: Subscriber<GyroFifoReport>,
    status: Subscriber<GyroStatusReport>,
    summary: ReplaySummary,
}

impl Replay {
    pub fn new(config: &GyroConfig) -> Result<Self, GyroError> {
        let topics = GyroTopics::new();
        let depth = config.queue_depth;
        let gyro = topics.gyro.subscriber(depth);
        let integrated = topics.integrated.subscriber(depth);
        let fifo = topics.fifo.subscriber(depth);
        let status = topics.status.subscriber(depth);

        let clock = ManualClock::default();
        let pipeline = GyroPipeline::from_config(config, clock.clone(), topics.publishers())?;

        Ok(Self {
            clock,
            pipeline,
            gyro,
            integrated,
            fifo,
            status,
            summary: ReplaySummary::default(),
        })
    }

    pub fn pipeline(&self) -> &GyroPipeline<ManualClock> {
        &self.pipeline
    }

    /// Applies one log entry and returns everything it caused to be
    /// published, in publish order.
    pub fn apply(&mut self, entry: &LogEntry) -> Result<Vec<PublishedReport>, GyroError> {
        self.summary.entries += 1;

        if let Some(t) = entry.timestamp() {
            let now = Timestamp::from_micros(t);
            self.clock.set(now);
            self.summary.first_timestamp.get_or_insert(now);
            self.summary.last_timestamp = Some(now);
        }

        match entry {
            LogEntry::Sample(s) => self.pipeline.ingest_sample(s.timestamp_sample, s.x, s.y, s.z),
            LogEntry::Fifo(f) => self.pipeline.ingest_fifo(f),
            LogEntry::Offset(o) => self.pipeline.set_calibration_offset(o.x, o.y, o.z),
            LogEntry::UpdateRate(hz) => self.pipeline.set_update_rate(*hz)?,
            LogEntry::Temperature(c) => self
                .pipeline
                .set_temperature(Temperature::from_degrees_celsius(*c)),
            LogEntry::ErrorCount(n) => self.pipeline.set_error_count(*n),
        }

        let mut reports = Vec::new();
        reports.extend(self.gyro.drain().into_iter().map(PublishedReport::Gyro));
        reports.extend(
            self.integrated
                .drain()
                .into_iter()
                .map(PublishedReport::GyroIntegrated),
        );
        reports.extend(self.fifo.drain().into_iter().map(PublishedReport::GyroFifo));
        reports.extend(self.status.drain().into_iter().map(PublishedReport::GyroStatus));

        for r in reports.iter() {
            match r {
                PublishedReport::Gyro(_) => self.summary.gyro_reports += 1,
                PublishedReport::GyroIntegrated(_) => self.summary.integrated_reports += 1,
                PublishedReport::GyroFifo(_) => self.summary.fifo_reports += 1,
                PublishedReport::GyroStatus(_) => self.summary.status_reports += 1,
            }
        }
        debug!(?entry, reports = reports.len(), "Applied log entry");

        Ok(reports)
    }

    pub fn summary(&self) -> ReplaySummary {
        let mut summary = self.summary.clone();
        summary.dropped = self.gyro.dropped()
            + self.integrated.dropped()
            + self.fifo.dropped()
            + self.status.dropped();
        summary.vibration_metric = self.pipeline.vibration().vibration_metric();
        summary.coning_vibration = self.pipeline.vibration().coning_vibration();
        summary.clipping = self.pipeline.clip().per_axis();
        summary
    }
}
