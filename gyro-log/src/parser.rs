//! A small line-oriented parser for gyro replay logs

use crate::{
    LogEntry, COMMENT_TOKEN, ERROR_COUNT_TOKEN, FIFO_TOKEN, OFFSET_TOKEN, RATE_TOKEN,
    SAMPLE_TOKEN, TEMPERATURE_TOKEN,
};
use gyro_types::prelude::*;
use na::Vector3;
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{i16, line_ending, not_line_ending, space0, space1, u16, u64},
    combinator::{eof, map, value},
    error::ErrorKind,
    multi::{fold_many0, separated_list0},
    number::complete::float,
    sequence::{delimited, pair, preceded, tuple},
    Err::Failure,
};
use tracing::debug;

pub type Result<I, O, E = ParseError<I>> = std::result::Result<(I, O), nom::Err<E>>;

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ParseError<I> {
    #[error("Invalid FIFO burst. {0}")]
    Burst(SampleError),
    #[error("Unexpected line")]
    UnexpectedLine(I),
    #[error("Parse error")]
    Nom(I, ErrorKind),
}

pub trait ParseErrorExt {
    fn is_failure(&self) -> bool;
}

impl<I> ParseErrorExt for nom::Err<ParseError<I>> {
    fn is_failure(&self) -> bool {
        matches!(self, nom::Err::Failure(_))
    }
}

/// Parses a whole log. Blank lines and comments are skipped; any other line
/// that isn't a known entry is a failure.
pub fn parse_log(log: &str) -> Result<&str, Vec<LogEntry>> {
    let (s, entries) = fold_many0(read_line, Vec::new, |mut entries, line| {
        if let Some(entry) = line {
            entries.push(entry);
        }
        entries
    })(log)?;

    if !s.trim().is_empty() {
        let (_, line) = not_line_ending(s)?;
        return Err(Failure(ParseError::UnexpectedLine(line)));
    }

    debug!(entries = entries.len(), "Parsed replay log");
    Ok((s, entries))
}

/// Parses a single entry line, including its line ending (or end of input)
pub fn parse_entry(s: &str) -> Result<&str, LogEntry> {
    let (s, _) = space0(s)?;
    let (s, entry) = alt((
        sample,
        fifo,
        map(offset, LogEntry::Offset),
        map(rate, LogEntry::UpdateRate),
        map(temperature, LogEntry::Temperature),
        map(error_count, LogEntry::ErrorCount),
    ))(s)?;
    let (s, _) = end_of_line(s)?;
    Ok((s, entry))
}

fn read_line(s: &str) -> Result<&str, Option<LogEntry>> {
    alt((
        value(None, pair(space0, line_ending)),
        value(None, comment),
        map(parse_entry, Some),
    ))(s)
}

fn comment(s: &str) -> Result<&str, &str> {
    let (s, _) = space0(s)?;
    let (s, _) = tag(COMMENT_TOKEN)(s)?;
    let (s, text) = not_line_ending(s)?;
    let (s, _) = alt((line_ending, eof))(s)?;
    Ok((s, text))
}

fn end_of_line(s: &str) -> Result<&str, &str> {
    let (s, _) = space0(s)?;
    alt((line_ending, eof))(s)
}

fn sample(s: &str) -> Result<&str, LogEntry> {
    let (s, _) = tag(SAMPLE_TOKEN)(s)?;
    let (s, _) = space1(s)?;
    let (s, timestamp) = u64(s)?;
    let (s, _) = eq(s)?;
    let (s, v) = v3(s)?;
    Ok((s, LogEntry::Sample(RawSample::new(timestamp, v.x, v.y, v.z))))
}

fn fifo(s: &str) -> Result<&str, LogEntry> {
    let (s, _) = tag(FIFO_TOKEN)(s)?;
    let (s, _) = space1(s)?;
    let (s, timestamp) = u64(s)?;
    let (s, _) = space1(s)?;
    let (s, dt) = float(s)?;
    let (s, _) = eq(s)?;
    let (s, x) = burst(s)?;
    let (s, _) = space1(s)?;
    let (s, y) = burst(s)?;
    let (s, _) = space1(s)?;
    let (s, z) = burst(s)?;
    let sample = FifoSample::from_slices(timestamp, dt, &x, &y, &z)
        .map_err(|e| Failure(ParseError::Burst(e)))?;
    Ok((s, LogEntry::Fifo(sample)))
}

fn offset(s: &str) -> Result<&str, Vector3<f32>> {
    preceded(pair(tag(OFFSET_TOKEN), eq), v3)(s)
}

fn rate(s: &str) -> Result<&str, u16> {
    preceded(pair(tag(RATE_TOKEN), eq), u16)(s)
}

fn temperature(s: &str) -> Result<&str, f32> {
    preceded(pair(tag(TEMPERATURE_TOKEN), eq), float)(s)
}

fn error_count(s: &str) -> Result<&str, u64> {
    preceded(pair(tag(ERROR_COUNT_TOKEN), eq), u64)(s)
}

fn burst(s: &str) -> Result<&str, Vec<i16>> {
    delimited(
        pair(tag("["), space0),
        separated_list0(space1, i16),
        pair(space0, tag("]")),
    )(s)
}

fn eq(s: &str) -> Result<&str, (&str, &str, &str)> {
    tuple((space0, tag("="), space0))(s)
}

fn v3(s: &str) -> Result<&str, Vector3<f32>> {
    let (s, x) = float(s)?;
    let (s, _) = space1(s)?;
    let (s, y) = float(s)?;
    let (s, _) = space1(s)?;
    let (s, z) = float(s)?;
    Ok((s, Vector3::new(x, y, z)))
}

impl<I> nom::error::ParseError<I> for ParseError<I> {
    fn from_error_kind(s: I, kind: ErrorKind) -> Self {
        ParseError::Nom(s, kind)
    }

    fn append(_: I, _: ErrorKind, other: Self) -> Self {
        other
    }
}
