//! Viewing session segmentation
//!
//! Groups watch events into sessions separated by configurable gaps and
//! estimates total time spent. True per-video duration is absent from the
//! export, so totals use the fixed per-video estimate from the configuration.

use crate::config::InsightConfig;
use crate::types::{Event, SessionRecord, TimeSpent};
use chrono::{Duration, NaiveDateTime};
use std::collections::BTreeSet;

/// Segmenter for watch events into viewing sessions
pub struct SessionSegmenter;

impl SessionSegmenter {
    /// Segment watch events into sessions and estimate time spent.
    ///
    /// Watch events without a local timestamp are skipped and counted.
    /// Empty input yields an all-zero result, never an error.
    pub fn segment(events: &[Event], config: &InsightConfig) -> TimeSpent {
        let mut timestamps: Vec<NaiveDateTime> = Vec::new();
        let mut skipped = 0u32;

        for event in events.iter().filter(|e| e.is_watch()) {
            match event.timestamp_local {
                Some(ts) => timestamps.push(ts),
                None => skipped += 1,
            }
        }
        timestamps.sort_unstable();

        if timestamps.is_empty() {
            return TimeSpent {
                sessions: Vec::new(),
                session_count: 0,
                longest_session_minutes: 0.0,
                total_minutes: 0.0,
                total_hours: 0.0,
                average_daily_minutes: 0.0,
                total_days: 0,
                skipped,
            };
        }

        let gap_limit = Duration::minutes(config.session_gap_minutes);
        let estimate = config.per_video_minutes_estimate;

        let mut sessions: Vec<SessionRecord> = Vec::new();
        let mut start = timestamps[0];
        let mut end = timestamps[0];
        let mut count = 1u32;

        for &ts in &timestamps[1..] {
            if ts - end > gap_limit {
                sessions.push(make_session(start, end, count, estimate));
                start = ts;
                count = 1;
            } else {
                count += 1;
            }
            end = ts;
        }
        sessions.push(make_session(start, end, count, estimate));

        let longest_session_minutes = sessions
            .iter()
            .filter(|s| s.event_count >= 2)
            .map(|s| span_minutes(s.start, s.end))
            .fold(0.0, f64::max);

        let total_minutes = timestamps.len() as f64 * estimate;
        let total_hours = (total_minutes / 60.0).round();

        let active_days: BTreeSet<_> = timestamps.iter().map(|ts| ts.date()).collect();
        let total_days = active_days.len() as u32;
        let average_daily_minutes = if total_days > 0 {
            total_minutes / total_days as f64
        } else {
            0.0
        };

        TimeSpent {
            session_count: sessions.len() as u32,
            sessions,
            longest_session_minutes,
            total_minutes,
            total_hours,
            average_daily_minutes,
            total_days,
            skipped,
        }
    }
}

fn make_session(start: NaiveDateTime, end: NaiveDateTime, count: u32, estimate: f64) -> SessionRecord {
    SessionRecord {
        start,
        end,
        event_count: count,
        estimated_duration_minutes: count as f64 * estimate,
    }
}

fn span_minutes(start: NaiveDateTime, end: NaiveDateTime) -> f64 {
    (end - start).num_seconds() as f64 / 60.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EventType;
    use chrono::NaiveDate;

    fn watch_at(day: u32, hour: u32, minute: u32) -> Event {
        Event {
            event_type: EventType::Watch,
            engagement: None,
            timestamp_utc: None,
            timestamp_local: NaiveDate::from_ymd_opt(2024, 5, day)
                .unwrap()
                .and_hms_opt(hour, minute, 0),
            hour_local: Some(hour),
            day_of_week: None,
            month_local: Some(5),
            channel: None,
            channel_clean: None,
            text: None,
            text_clean: None,
            topics: Vec::new(),
        }
    }

    #[test]
    fn test_gap_splits_sessions() {
        // Three events within 30 minutes, then one 2 hours later
        let events = vec![
            watch_at(1, 20, 0),
            watch_at(1, 20, 10),
            watch_at(1, 20, 25),
            watch_at(1, 22, 30),
        ];
        let result = SessionSegmenter::segment(&events, &InsightConfig::default());

        assert_eq!(result.session_count, 2);
        assert_eq!(result.sessions[0].event_count, 3);
        assert_eq!(result.sessions[1].event_count, 1);
    }

    #[test]
    fn test_gap_exactly_at_threshold_stays_in_session() {
        let events = vec![watch_at(1, 20, 0), watch_at(1, 20, 30)];
        let result = SessionSegmenter::segment(&events, &InsightConfig::default());

        assert_eq!(result.session_count, 1);
        assert_eq!(result.sessions[0].event_count, 2);
    }

    #[test]
    fn test_totals_use_per_video_estimate() {
        let events = vec![
            watch_at(1, 20, 0),
            watch_at(1, 20, 10),
            watch_at(2, 9, 0),
        ];
        let result = SessionSegmenter::segment(&events, &InsightConfig::default());

        // 3 events x 4 minutes
        assert!((result.total_minutes - 12.0).abs() < 0.001);
        assert!((result.total_hours - 0.0).abs() < 0.001);
        assert_eq!(result.total_days, 2);
        assert!((result.average_daily_minutes - 6.0).abs() < 0.001);
    }

    #[test]
    fn test_longest_session_requires_two_events() {
        // Singleton session plus a 25-minute two-event session
        let events = vec![watch_at(1, 9, 0), watch_at(1, 20, 0), watch_at(1, 20, 25)];
        let result = SessionSegmenter::segment(&events, &InsightConfig::default());

        assert_eq!(result.session_count, 2);
        assert!((result.longest_session_minutes - 25.0).abs() < 0.001);
    }

    #[test]
    fn test_session_estimated_duration() {
        let events = vec![watch_at(1, 20, 0), watch_at(1, 20, 10)];
        let result = SessionSegmenter::segment(&events, &InsightConfig::default());

        assert!((result.sessions[0].estimated_duration_minutes - 8.0).abs() < 0.001);
    }

    #[test]
    fn test_missing_timestamps_counted() {
        let mut no_ts = watch_at(1, 20, 0);
        no_ts.timestamp_local = None;
        let result =
            SessionSegmenter::segment(&[no_ts, watch_at(1, 20, 5)], &InsightConfig::default());

        assert_eq!(result.skipped, 1);
        assert_eq!(result.session_count, 1);
    }

    #[test]
    fn test_empty_input() {
        let result = SessionSegmenter::segment(&[], &InsightConfig::default());

        assert_eq!(result.session_count, 0);
        assert_eq!(result.total_minutes, 0.0);
        assert_eq!(result.total_days, 0);
        assert_eq!(result.average_daily_minutes, 0.0);
    }

    #[test]
    fn test_unsorted_input_is_sorted_defensively() {
        let events = vec![watch_at(1, 20, 25), watch_at(1, 20, 0), watch_at(1, 20, 10)];
        let result = SessionSegmenter::segment(&events, &InsightConfig::default());

        assert_eq!(result.session_count, 1);
        assert_eq!(result.sessions[0].start, watch_at(1, 20, 0).timestamp_local.unwrap());
        assert_eq!(result.sessions[0].end, watch_at(1, 20, 25).timestamp_local.unwrap());
    }
}
