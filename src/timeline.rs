//! Timestamp distribution for generated batches.
//!
//! Every generator draws its record timestamps from here, which is what
//! makes the batch-is-sorted guarantee hold without any sink re-sorting.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rand::rngs::StdRng;

use crate::error::{Error, Result};

/// The shared generation window for a run, UTC instants, start <= end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if end < start {
            return Err(Error::Configuration(format!(
                "time_range end ({end}) precedes start ({start})"
            )));
        }
        Ok(Self { start, end })
    }

    /// Parse a window from two ISO-8601 strings.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        let parse_one = |s: &str| {
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| Error::Configuration(format!("invalid time_range value '{s}': {e}")))
        };
        Self::new(parse_one(start)?, parse_one(end)?)
    }

    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.start <= t && t <= self.end
    }
}

/// Draw `count` timestamps independently and uniformly from the window
/// (millisecond resolution) and return them sorted ascending.
///
/// Callers may rely on range membership and non-decreasing order only,
/// never on even spacing. A degenerate window (start == end) yields
/// `count` copies of that instant.
pub fn distribute(rng: &mut StdRng, count: usize, window: &TimeWindow) -> Vec<DateTime<Utc>> {
    let span_ms = (window.end - window.start).num_milliseconds();
    let mut timestamps: Vec<DateTime<Utc>> = (0..count)
        .map(|_| {
            let offset = if span_ms == 0 {
                0
            } else {
                rng.random_range(0..=span_ms)
            };
            window.start + Duration::milliseconds(offset)
        })
        .collect();
    timestamps.sort_unstable();
    timestamps
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::SeedableRng;

    fn window() -> TimeWindow {
        TimeWindow::new(
            Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 1, 1, 1, 0, 0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn exact_count_sorted_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let w = window();
        let ts = distribute(&mut rng, 500, &w);
        assert_eq!(ts.len(), 500);
        for pair in ts.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
        for t in &ts {
            assert!(w.contains(*t));
        }
    }

    #[test]
    fn zero_count_yields_empty() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(distribute(&mut rng, 0, &window()).is_empty());
    }

    #[test]
    fn degenerate_window_repeats_instant() {
        let instant = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let w = TimeWindow::new(instant, instant).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let ts = distribute(&mut rng, 10, &w);
        assert_eq!(ts.len(), 10);
        assert!(ts.iter().all(|t| *t == instant));
    }

    #[test]
    fn same_seed_same_timestamps() {
        let w = window();
        let a = distribute(&mut StdRng::seed_from_u64(42), 100, &w);
        let b = distribute(&mut StdRng::seed_from_u64(42), 100, &w);
        assert_eq!(a, b);
    }

    #[test]
    fn inverted_window_is_rejected() {
        let start = Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        assert!(TimeWindow::new(start, end).is_err());
    }

    #[test]
    fn parses_iso_8601() {
        let w = TimeWindow::parse("2026-01-01T00:00:00Z", "2026-01-01T01:00:00Z").unwrap();
        assert_eq!(w.start, Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
        assert!(TimeWindow::parse("not-a-date", "2026-01-01T01:00:00Z").is_err());
    }
}
