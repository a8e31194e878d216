//! Month-over-month viewing trends
//!
//! Aggregates per-calendar-month peaks and flags significant shifts between
//! consecutive months: the peak hour moving by four or more hours, or the
//! peak day crossing the weekday/weekend boundary.

use crate::time_buckets::{argmax, hour_label};
use crate::types::{Event, MonthlyStats, PatternShift, ShiftType, TemporalTrends, DAY_NAMES};
use chrono::Datelike;
use std::collections::BTreeMap;

/// Minimum peak-hour movement reported as a shift
const HOUR_SHIFT_THRESHOLD: u32 = 4;

/// Analyzer for month-over-month pattern shifts
pub struct TrendAnalyzer;

impl TrendAnalyzer {
    pub fn analyze(events: &[Event]) -> TemporalTrends {
        let mut months: BTreeMap<String, ([u32; 24], [u32; 7])> = BTreeMap::new();

        for event in events.iter().filter(|e| e.is_watch()) {
            let date = match event.local_date() {
                Some(date) => date,
                None => continue,
            };
            let (hour, day) = match (event.hour_local, event.day_of_week) {
                (Some(h), Some(d)) if h < 24 && d < 7 => (h, d),
                _ => continue,
            };
            let month = format!("{:04}-{:02}", date.year(), date.month());
            let (hourly, daily) = months.entry(month).or_insert(([0; 24], [0; 7]));
            hourly[hour as usize] += 1;
            daily[day as usize] += 1;
        }

        let monthly_stats: Vec<MonthlyStats> = months
            .iter()
            .map(|(month, (hourly, daily))| {
                let (peak_hour, peak_hour_count) = argmax(hourly);
                let (peak_day, peak_day_count) = argmax(daily);
                MonthlyStats {
                    month: month.clone(),
                    total_watches: hourly.iter().sum(),
                    peak_hour,
                    peak_hour_count,
                    peak_day,
                    peak_day_name: peak_day.map(|d| DAY_NAMES[d as usize].to_string()),
                    peak_day_count,
                }
            })
            .collect();

        let pattern_shifts = detect_shifts(&monthly_stats);

        TemporalTrends {
            total_months: monthly_stats.len() as u32,
            monthly_stats,
            pattern_shifts,
        }
    }
}

fn detect_shifts(monthly: &[MonthlyStats]) -> Vec<PatternShift> {
    let mut shifts = Vec::new();

    for pair in monthly.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);

        if let (Some(from), Some(to)) = (prev.peak_hour, next.peak_hour) {
            if from.abs_diff(to) >= HOUR_SHIFT_THRESHOLD {
                shifts.push(PatternShift {
                    shift_type: ShiftType::PeakHour,
                    from_month: prev.month.clone(),
                    to_month: next.month.clone(),
                    description: format!(
                        "Peak viewing hour shifted from {} to {}",
                        hour_label(from),
                        hour_label(to)
                    ),
                });
            }
        }

        if let (Some(from), Some(to)) = (prev.peak_day, next.peak_day) {
            if is_weekend(from) != is_weekend(to) {
                shifts.push(PatternShift {
                    shift_type: ShiftType::PeakDay,
                    from_month: prev.month.clone(),
                    to_month: next.month.clone(),
                    description: format!(
                        "Peak day moved from {} to {}",
                        DAY_NAMES[from as usize], DAY_NAMES[to as usize]
                    ),
                });
            }
        }
    }
    shifts
}

fn is_weekend(day: u32) -> bool {
    day >= 5
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EventType;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn watch(month: u32, day: u32, hour: u32) -> Event {
        let date = NaiveDate::from_ymd_opt(2024, month, day).unwrap();
        Event {
            event_type: EventType::Watch,
            engagement: None,
            timestamp_utc: None,
            timestamp_local: date.and_hms_opt(hour, 0, 0),
            hour_local: Some(hour),
            day_of_week: Some(date.weekday().num_days_from_monday()),
            month_local: Some(month),
            channel: None,
            channel_clean: None,
            text: None,
            text_clean: None,
            topics: Vec::new(),
        }
    }

    #[test]
    fn test_monthly_stats() {
        let events = vec![watch(1, 10, 9), watch(1, 10, 9), watch(1, 11, 21), watch(2, 5, 20)];
        let trends = TrendAnalyzer::analyze(&events);

        assert_eq!(trends.total_months, 2);
        assert_eq!(trends.monthly_stats[0].month, "2024-01");
        assert_eq!(trends.monthly_stats[0].total_watches, 3);
        assert_eq!(trends.monthly_stats[0].peak_hour, Some(9));
        assert_eq!(trends.monthly_stats[0].peak_hour_count, 2);
        assert_eq!(trends.monthly_stats[1].month, "2024-02");
    }

    #[test]
    fn test_peak_hour_shift_detected() {
        // January peaks at 9 AM, February at 9 PM
        let events = vec![
            watch(1, 10, 9),
            watch(1, 11, 9),
            watch(2, 10, 21),
            watch(2, 11, 21),
        ];
        let trends = TrendAnalyzer::analyze(&events);

        let shift = trends
            .pattern_shifts
            .iter()
            .find(|s| s.shift_type == ShiftType::PeakHour)
            .unwrap();
        assert_eq!(shift.from_month, "2024-01");
        assert_eq!(shift.to_month, "2024-02");
        assert_eq!(shift.description, "Peak viewing hour shifted from 9 AM to 9 PM");
    }

    #[test]
    fn test_small_hour_move_not_a_shift() {
        // 3-hour move stays below the threshold
        let events = vec![watch(1, 10, 9), watch(2, 10, 12)];
        let trends = TrendAnalyzer::analyze(&events);

        assert!(trends
            .pattern_shifts
            .iter()
            .all(|s| s.shift_type != ShiftType::PeakHour));
    }

    #[test]
    fn test_weekday_weekend_boundary_shift() {
        // January peaks Wednesday (Jan 10 2024), February peaks Saturday
        // (Feb 10 2024); hours kept close so only the day shift fires
        let events = vec![watch(1, 10, 20), watch(2, 10, 20)];
        let trends = TrendAnalyzer::analyze(&events);

        assert_eq!(trends.pattern_shifts.len(), 1);
        let shift = &trends.pattern_shifts[0];
        assert_eq!(shift.shift_type, ShiftType::PeakDay);
        assert_eq!(shift.description, "Peak day moved from Wednesday to Saturday");
    }

    #[test]
    fn test_weekday_to_weekday_not_a_shift() {
        // Wednesday to Thursday stays within weekdays
        let events = vec![watch(1, 10, 20), watch(2, 1, 20)];
        let trends = TrendAnalyzer::analyze(&events);

        assert!(trends.pattern_shifts.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let trends = TrendAnalyzer::analyze(&[]);
        assert_eq!(trends.total_months, 0);
        assert!(trends.monthly_stats.is_empty());
        assert!(trends.pattern_shifts.is_empty());
    }
}
