use gyro_types::prelude::*;
use na::Vector3;

/// One line of a replay log
#[derive(Clone, Debug, PartialEq)]
pub enum LogEntry {
    Sample(RawSample),
    Fifo(FifoSample),
    Offset(Vector3<f32>),
    UpdateRate(u16),
    Temperature(f32),
    ErrorCount(u64),
}

impl LogEntry {
    /// Sample time of a measurement entry, `None` for configuration entries
    pub fn timestamp(&self) -> Option<Microseconds> {
        match self {
            LogEntry::Sample(s) => Some(s.timestamp_sample),
            LogEntry::Fifo(f) => Some(f.timestamp_sample),
            _ => None,
        }
    }
}
