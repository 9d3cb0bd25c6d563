extern crate nalgebra as na;

pub use crate::entry::LogEntry;
pub use crate::parser::{parse_entry, parse_log, ParseError, ParseErrorExt};

pub mod entry;
pub mod parser;

pub const SAMPLE_TOKEN: &str = "S";
pub const FIFO_TOKEN: &str = "F";
pub const OFFSET_TOKEN: &str = "OFFSET";
pub const RATE_TOKEN: &str = "RATE";
pub const TEMPERATURE_TOKEN: &str = "TEMP";
pub const ERROR_COUNT_TOKEN: &str = "ERRORS";
pub const COMMENT_TOKEN: &str = "#";
