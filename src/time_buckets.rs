//! Hourly, daily, and weekly activity aggregation
//!
//! Builds the 24-slot and 7-slot histograms, per-ISO-week peak days, fixed
//! day-interval totals, and the circular per-hour activity feeding the polar
//! chart. Ties always resolve to the lowest index so identical input yields
//! identical output.

use crate::types::{
    DayInterval, Event, HourActivity, IntervalCount, WatchPatterns, WeeklyPeakDay, DAY_NAMES,
};
use chrono::Datelike;
use std::collections::BTreeMap;

/// Aggregator for time-bucketed watch activity
pub struct TimeBucketAggregator;

impl TimeBucketAggregator {
    /// Aggregate watch events into hourly/daily/weekly distributions.
    ///
    /// Watch events lacking `hour_local` or `day_of_week` are skipped and
    /// counted; zero usable events produce all-zero distributions and null
    /// peaks rather than an error.
    pub fn aggregate(events: &[Event]) -> WatchPatterns {
        let mut hourly = [0u32; 24];
        let mut daily = [0u32; 7];
        let mut skipped = 0u32;

        // Per (ISO year, ISO week) day-of-week counts
        let mut weekly: BTreeMap<(i32, u32), [u32; 7]> = BTreeMap::new();

        for event in events.iter().filter(|e| e.is_watch()) {
            let (hour, day) = match (event.hour_local, event.day_of_week) {
                (Some(h), Some(d)) if h < 24 && d < 7 => (h, d),
                _ => {
                    skipped += 1;
                    continue;
                }
            };
            hourly[hour as usize] += 1;
            daily[day as usize] += 1;

            if let Some(date) = event.local_date() {
                let iso = date.iso_week();
                weekly.entry((iso.year(), iso.week())).or_default()[day as usize] += 1;
            }
        }

        let total: u32 = hourly.iter().sum();

        let (peak_hour, peak_hour_count) = argmax(&hourly);
        let (peak_day, peak_day_count) = argmax(&daily);
        let peak_hour = if total == 0 { None } else { peak_hour };
        let peak_day = if total == 0 { None } else { peak_day };

        let weekly_peak_days = weekly_peaks(&weekly);
        let (overall_peak_day, overall_peak_wins) = overall_peak(&weekly_peak_days);

        let time_intervals = interval_counts(&hourly);
        let peak_interval = if total == 0 {
            None
        } else {
            let counts: Vec<u32> = time_intervals.iter().map(|i| i.count).collect();
            argmax(&counts)
                .0
                .map(|i| time_intervals[i as usize].interval)
        };

        let circular_activity = circular_activity(&hourly, total);

        WatchPatterns {
            hourly_distribution: hourly.to_vec(),
            daily_distribution: daily.to_vec(),
            peak_hour,
            peak_hour_count: if total == 0 { 0 } else { peak_hour_count },
            peak_day,
            peak_day_name: peak_day.map(|d| DAY_NAMES[d as usize].to_string()),
            peak_day_count: if total == 0 { 0 } else { peak_day_count },
            weekly_peak_days,
            overall_peak_day,
            overall_peak_day_name: overall_peak_day.map(|d| DAY_NAMES[d as usize].to_string()),
            overall_peak_wins,
            total_weeks: weekly.len() as u32,
            time_intervals,
            peak_interval,
            circular_activity,
            skipped,
        }
    }
}

/// Index and value of the maximum slot; ties resolve to the lowest index
pub(crate) fn argmax(counts: &[u32]) -> (Option<u32>, u32) {
    let mut best: Option<(u32, u32)> = None;
    for (i, &count) in counts.iter().enumerate() {
        match best {
            Some((_, c)) if count <= c => {}
            _ => best = Some((i as u32, count)),
        }
    }
    match best {
        Some((i, c)) => (Some(i), c),
        None => (None, 0),
    }
}

/// Peak day per ISO week, ascending by (year, week)
fn weekly_peaks(weekly: &BTreeMap<(i32, u32), [u32; 7]>) -> Vec<WeeklyPeakDay> {
    weekly
        .iter()
        .filter_map(|(&(year, week), days)| {
            let (day, count) = argmax(days);
            day.map(|day| WeeklyPeakDay {
                iso_year: year,
                iso_week: week,
                day,
                day_name: DAY_NAMES[day as usize].to_string(),
                count,
            })
        })
        .collect()
}

/// Day winning the most weeks; ties resolve to the lowest day index
fn overall_peak(weekly_peaks: &[WeeklyPeakDay]) -> (Option<u32>, u32) {
    let mut wins = [0u32; 7];
    for peak in weekly_peaks {
        wins[peak.day as usize] += 1;
    }
    if weekly_peaks.is_empty() {
        return (None, 0);
    }
    argmax(&wins)
}

/// Totals for the four fixed six-hour intervals
fn interval_counts(hourly: &[u32; 24]) -> Vec<IntervalCount> {
    DayInterval::ALL
        .iter()
        .map(|&interval| {
            let count = hourly
                .iter()
                .enumerate()
                .filter(|(h, _)| DayInterval::from_hour(*h as u32) == Some(interval))
                .map(|(_, &c)| c)
                .sum();
            IntervalCount {
                interval,
                label: interval.label().to_string(),
                count,
            }
        })
        .collect()
}

/// Per-hour counts and percentages for the 24-hour polar chart
fn circular_activity(hourly: &[u32; 24], total: u32) -> Vec<HourActivity> {
    (0..24)
        .map(|hour| {
            let count = hourly[hour as usize];
            let percentage = if total > 0 {
                round2(count as f64 / total as f64 * 100.0)
            } else {
                0.0
            };
            HourActivity {
                hour,
                label: hour_label(hour),
                count,
                percentage,
            }
        })
        .collect()
}

/// 12-hour clock label for an hour, e.g. "12 AM", "3 PM"
pub(crate) fn hour_label(hour: u32) -> String {
    match hour {
        0 => "12 AM".to_string(),
        1..=11 => format!("{} AM", hour),
        12 => "12 PM".to_string(),
        _ => format!("{} PM", hour - 12),
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
