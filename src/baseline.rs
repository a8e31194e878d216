//! Daily baseline statistics
//!
//! Computes per-calendar-date watch counts with their mean and sample
//! standard deviation, plus per-date late-night counts. Anomaly detection
//! interprets daily activity relative to these baselines.

use crate::types::{DailyBaseline, Event};
use std::collections::BTreeMap;

/// Late-night hours, midnight through 4 AM inclusive
pub const LATE_NIGHT_HOURS: std::ops::RangeInclusive<u32> = 0..=4;

/// Computes per-day baselines for anomaly detection
pub struct BaselineStatistics;

impl BaselineStatistics {
    /// Count watch events per calendar date and derive mean/stddev.
    ///
    /// Watch events without a local timestamp are skipped and counted; the
    /// late-night map only carries dates with at least one late-night watch.
    pub fn compute(events: &[Event]) -> DailyBaseline {
        let mut daily_counts = BTreeMap::new();
        let mut late_night_counts = BTreeMap::new();
        let mut skipped = 0u32;
        let mut total_late_night = 0u32;

        for event in events.iter().filter(|e| e.is_watch()) {
            let date = match event.local_date() {
                Some(date) => date,
                None => {
                    skipped += 1;
                    continue;
                }
            };
            *daily_counts.entry(date).or_insert(0u32) += 1;

            if let Some(hour) = event.hour_local {
                if LATE_NIGHT_HOURS.contains(&hour) {
                    *late_night_counts.entry(date).or_insert(0u32) += 1;
                    total_late_night += 1;
                }
            }
        }

        let counts: Vec<u32> = daily_counts.values().copied().collect();
        let total_watches: u32 = counts.iter().sum();
        let mean = mean(&counts);
        let stddev = sample_stddev(&counts, mean);

        let late_night_baseline_pct = if total_watches > 0 {
            total_late_night as f64 / total_watches as f64 * 100.0
        } else {
            0.0
        };

        DailyBaseline {
            total_days: daily_counts.len() as u32,
            daily_counts,
            late_night_counts,
            mean,
            stddev,
            total_watches,
            total_late_night,
            late_night_baseline_pct,
            skipped,
        }
    }
}

fn mean(counts: &[u32]) -> f64 {
    if counts.is_empty() {
        return 0.0;
    }
    counts.iter().map(|&c| c as f64).sum::<f64>() / counts.len() as f64
}

/// Sample standard deviation (n-1); 0 when fewer than 2 values.
///
/// The n-1 denominator guards the division and keeps the binge threshold
/// conservative on short histories.
fn sample_stddev(counts: &[u32], mean: f64) -> f64 {
    if counts.len() < 2 {
        return 0.0;
    }
    let variance = counts
        .iter()
        .map(|&c| (c as f64 - mean).powi(2))
        .sum::<f64>()
        / (counts.len() - 1) as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EventType;
    use chrono::NaiveDate;

    fn watch(day: u32, hour: u32) -> Event {
        Event {
            event_type: EventType::Watch,
            engagement: None,
            timestamp_utc: None,
            timestamp_local: NaiveDate::from_ymd_opt(2024, 7, day)
                .unwrap()
                .and_hms_opt(hour, 0, 0),
            hour_local: Some(hour),
            day_of_week: None,
            month_local: Some(7),
            channel: None,
            channel_clean: None,
            text: None,
            text_clean: None,
            topics: Vec::new(),
        }
    }

    #[test]
    fn test_daily_counts() {
        let events = vec![watch(1, 9), watch(1, 10), watch(2, 9)];
        let baseline = BaselineStatistics::compute(&events);

        assert_eq!(baseline.total_days, 2);
        assert_eq!(baseline.total_watches, 3);
        let first = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        assert_eq!(baseline.daily_counts[&first], 2);
    }

    #[test]
    fn test_mean_and_sample_stddev() {
        // Nine days with 2 watches, one day with 20
        let mut events = Vec::new();
        for day in 1..=9 {
            events.push(watch(day, 12));
            events.push(watch(day, 13));
        }
        for _ in 0..20 {
            events.push(watch(10, 15));
        }

        let baseline = BaselineStatistics::compute(&events);
        assert!((baseline.mean - 3.8).abs() < 0.001);
        // Sample stddev of [2 x9, 20] is ~5.6921
        assert!((baseline.stddev - 5.6921).abs() < 0.001);
    }

    #[test]
    fn test_stddev_zero_for_single_day() {
        let baseline = BaselineStatistics::compute(&[watch(1, 9), watch(1, 10)]);
        assert_eq!(baseline.stddev, 0.0);
        assert!((baseline.mean - 2.0).abs() < 0.001);
    }

    #[test]
    fn test_late_night_counting() {
        let events = vec![watch(1, 0), watch(1, 3), watch(1, 4), watch(1, 5), watch(2, 12)];
        let baseline = BaselineStatistics::compute(&events);

        let first = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        assert_eq!(baseline.late_night_counts[&first], 3);
        assert_eq!(baseline.total_late_night, 3);
        // 3 of 5 watches late night
        assert!((baseline.late_night_baseline_pct - 60.0).abs() < 0.001);
        // Date without late-night watches is absent from the map
        assert!(!baseline
            .late_night_counts
            .contains_key(&NaiveDate::from_ymd_opt(2024, 7, 2).unwrap()));
    }

    #[test]
    fn test_missing_timestamp_skipped() {
        let mut no_ts = watch(1, 9);
        no_ts.timestamp_local = None;
        let baseline = BaselineStatistics::compute(&[no_ts]);

        assert_eq!(baseline.skipped, 1);
        assert_eq!(baseline.total_days, 0);
        assert_eq!(baseline.mean, 0.0);
    }

    #[test]
    fn test_empty_input() {
        let baseline = BaselineStatistics::compute(&[]);
        assert_eq!(baseline.total_watches, 0);
        assert_eq!(baseline.late_night_baseline_pct, 0.0);
    }
}
