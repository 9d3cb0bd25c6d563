use crate::units::{Time, Timestamp};

/// Minimum spacing of status reports
pub const STATUS_INTERVAL_MS: f64 = 100.0;

#[derive(Debug, Clone)]
pub struct StatusThrottle {
    interval: Time,
    last_publish: Option<Timestamp>,
}

impl Default for StatusThrottle {
    fn default() -> Self {
        Self::new(Time::from_millis(STATUS_INTERVAL_MS))
    }
}

impl StatusThrottle {
    pub fn new(interval: Time) -> Self {
        Self {
            interval,
            last_publish: None,
        }
    }

    /// Returns true when a status report is due, and records `now` as the
    /// time of that report.
    pub fn poll(&mut self, now: Timestamp) -> bool {
        let due = match self.last_publish {
            None => true,
            Some(last) => {
                now.as_micros().saturating_sub(last.as_micros())
                    >= self.interval.as_micros().round() as u64
            }
        };
        if due {
            self.last_publish = Some(now);
        }
        due
    }

    pub fn last_publish(&self) -> Option<Timestamp> {
        self.last_publish
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_poll_is_due() {
        let mut t = StatusThrottle::default();
        assert!(t.poll(Timestamp::from_micros(0)));
        assert_eq!(t.last_publish(), Some(Timestamp::zero()));
    }

    #[test]
    fn spaced_by_interval() {
        let mut t = StatusThrottle::default();
        assert!(t.poll(Timestamp::from_micros(5_000)));
        assert!(!t.poll(Timestamp::from_micros(104_999)));
        assert!(t.poll(Timestamp::from_micros(105_000)));
        assert!(!t.poll(Timestamp::from_micros(105_001)));
        assert_eq!(t.last_publish(), Some(Timestamp::from_micros(105_000)));
    }

    #[test]
    fn clock_going_backwards_is_not_due() {
        let mut t = StatusThrottle::default();
        assert!(t.poll(Timestamp::from_micros(500_000)));
        assert!(!t.poll(Timestamp::from_micros(1_000)));
    }
}
