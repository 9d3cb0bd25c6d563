//! Parse a FIFO capture recorded on the bench

use gyro_log::*;

const HOVER_LOG: &str = include_str!("test_fixtures/hover_fifo.log");

#[test]
fn hover_fifo_capture() {
    let (rest, entries) = parse_log(HOVER_LOG).unwrap();
    assert_eq!(rest, "");

    let bursts: Vec<_> = entries
        .iter()
        .filter_map(|e| match e {
            LogEntry::Fifo(f) => Some(f),
            _ => None,
        })
        .collect();
    assert_eq!(bursts.len(), 40);
    assert!(bursts.iter().all(|b| b.len() == 8 && b.dt == 125.0));

    let timestamps: Vec<u64> = entries.iter().filter_map(LogEntry::timestamp).collect();
    assert!(timestamps.windows(2).all(|w| w[1] > w[0]));

    // One stall in the capture, longer than two bursts
    let gaps = timestamps
        .windows(2)
        .filter(|w| (w[1] - w[0]) as f32 > 2.0 * bursts[0].span())
        .count();
    assert_eq!(gaps, 1);

    assert_eq!(entries.first(), Some(&LogEntry::UpdateRate(1000)));
    assert_eq!(entries.last(), Some(&LogEntry::ErrorCount(1)));
}

#[test]
fn line_by_line_matches_whole_log() {
    let mut count = 0;
    for line in HOVER_LOG.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with(COMMENT_TOKEN) {
            continue;
        }
        match parse_entry(line) {
            Ok((rest, _)) => assert_eq!(rest, ""),
            Err(e) => panic!("Parse error. {e}"),
        }
        count += 1;
    }
    let (_, entries) = parse_log(HOVER_LOG).unwrap();
    assert_eq!(count, entries.len());
}
