//! Date-run compression
//!
//! Anomaly period merging and habit streak detection share one algorithm:
//! run-length compression over a sorted set of calendar dates with a
//! gap-tolerance parameter. Anomaly merging allows a 1-day gap inside a run;
//! habit streaks require strictly consecutive dates (tolerance 0).

use chrono::NaiveDate;

/// One maximal run of dates under the caller's gap tolerance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRun {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Dates actually present in the run
    pub dates: Vec<NaiveDate>,
}

impl DateRun {
    /// Calendar span in days, `end - start + 1`
    pub fn span_days(&self) -> u32 {
        (self.end - self.start).num_days() as u32 + 1
    }

    /// Number of dates present in the run
    pub fn len(&self) -> u32 {
        self.dates.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Compress a date set into maximal runs.
///
/// `gap_tolerance` is the number of missing calendar days allowed between two
/// consecutive dates of the same run: 0 keeps only strictly consecutive dates
/// together, 1 lets a run survive a single missing day. Input order does not
/// matter; dates are sorted and deduplicated first.
pub fn compress_runs(dates: &[NaiveDate], gap_tolerance: i64) -> Vec<DateRun> {
    if dates.is_empty() {
        return Vec::new();
    }

    let mut sorted: Vec<NaiveDate> = dates.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut runs = Vec::new();
    let mut current = vec![sorted[0]];

    for &date in &sorted[1..] {
        let gap = (date - *current.last().unwrap_or(&date)).num_days();
        if gap <= gap_tolerance + 1 {
            current.push(date);
        } else {
            runs.push(make_run(current));
            current = vec![date];
        }
    }
    runs.push(make_run(current));

    runs
}

fn make_run(dates: Vec<NaiveDate>) -> DateRun {
    DateRun {
        start: dates[0],
        end: *dates.last().unwrap_or(&dates[0]),
        dates,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    #[test]
    fn test_strict_runs() {
        // 1-5 consecutive, gap, 8-10 consecutive
        let dates = vec![d(1), d(2), d(3), d(4), d(5), d(8), d(9), d(10)];
        let runs = compress_runs(&dates, 0);

        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].len(), 5);
        assert_eq!(runs[0].start, d(1));
        assert_eq!(runs[0].end, d(5));
        assert_eq!(runs[1].len(), 3);
        assert_eq!(runs[1].span_days(), 3);
    }

    #[test]
    fn test_one_day_gap_tolerance() {
        // With tolerance 1 the missing day 3 does not break the run
        let dates = vec![d(1), d(2), d(4), d(5), d(9)];
        let runs = compress_runs(&dates, 1);

        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].start, d(1));
        assert_eq!(runs[0].end, d(5));
        assert_eq!(runs[0].len(), 4);
        assert_eq!(runs[0].span_days(), 5);
        assert_eq!(runs[1].dates, vec![d(9)]);
    }

    #[test]
    fn test_same_dates_differ_by_tolerance() {
        let dates = vec![d(1), d(3), d(5)];

        // Strictly consecutive: three singleton runs
        assert_eq!(compress_runs(&dates, 0).len(), 3);
        // 1-day tolerance: one merged run
        let merged = compress_runs(&dates, 1);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].span_days(), 5);
    }

    #[test]
    fn test_unsorted_and_duplicate_input() {
        let dates = vec![d(3), d(1), d(2), d(2)];
        let runs = compress_runs(&dates, 0);

        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].len(), 3);
    }

    #[test]
    fn test_empty_input() {
        assert!(compress_runs(&[], 0).is_empty());
    }

    #[test]
    fn test_single_date() {
        let runs = compress_runs(&[d(7)], 0);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].span_days(), 1);
    }
}
