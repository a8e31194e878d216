//! Whole-snapshot summary
//!
//! Flat totals over the event list: counts per event type, unique watched
//! channels, the UTC date range, and how many events lack a local timestamp.

use crate::types::{Event, EventType, SnapshotSummary};
use std::collections::BTreeSet;

/// Builds the snapshot-level summary record
pub struct SummaryBuilder;

impl SummaryBuilder {
    pub fn build(events: &[Event]) -> SnapshotSummary {
        let mut total_watch = 0u32;
        let mut total_search = 0u32;
        let mut total_subscribe = 0u32;
        let mut missing_local_timestamp = 0u32;
        let mut channels: BTreeSet<&str> = BTreeSet::new();
        let mut first = None;
        let mut last = None;

        for event in events {
            match event.event_type {
                EventType::Watch => {
                    total_watch += 1;
                    if let Some(channel) = &event.channel_clean {
                        channels.insert(channel.as_str());
                    }
                }
                EventType::Search => total_search += 1,
                EventType::Subscribe => total_subscribe += 1,
            }
            if event.timestamp_local.is_none() {
                missing_local_timestamp += 1;
            }
            if let Some(ts) = event.timestamp_utc {
                if first.map_or(true, |f| ts < f) {
                    first = Some(ts);
                }
                if last.map_or(true, |l| ts > l) {
                    last = Some(ts);
                }
            }
        }

        SnapshotSummary {
            total_events: events.len() as u32,
            total_watch,
            total_search,
            total_subscribe,
            unique_channels: channels.len() as u32,
            first_event_utc: first,
            last_event_utc: last,
            missing_local_timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn event(event_type: EventType, day: u32, channel: Option<&str>) -> Event {
        Event {
            event_type,
            engagement: None,
            timestamp_utc: Some(Utc.with_ymd_and_hms(2024, 6, day, 12, 0, 0).unwrap()),
            timestamp_local: NaiveDate::from_ymd_opt(2024, 6, day)
                .unwrap()
                .and_hms_opt(14, 0, 0),
            hour_local: Some(14),
            day_of_week: None,
            month_local: Some(6),
            channel: channel.map(str::to_string),
            channel_clean: channel.map(str::to_string),
            text: None,
            text_clean: None,
            topics: Vec::new(),
        }
    }

    #[test]
    fn test_totals_and_range() {
        let events = vec![
            event(EventType::Watch, 1, Some("a")),
            event(EventType::Watch, 5, Some("a")),
            event(EventType::Search, 3, None),
            event(EventType::Subscribe, 2, Some("b")),
        ];
        let summary = SummaryBuilder::build(&events);

        assert_eq!(summary.total_events, 4);
        assert_eq!(summary.total_watch, 2);
        assert_eq!(summary.total_search, 1);
        assert_eq!(summary.total_subscribe, 1);
        // Subscribe-only channels are not counted as watched
        assert_eq!(summary.unique_channels, 1);
        assert_eq!(
            summary.first_event_utc,
            Some(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap())
        );
        assert_eq!(
            summary.last_event_utc,
            Some(Utc.with_ymd_and_hms(2024, 6, 5, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_missing_local_timestamps_counted() {
        let mut incomplete = event(EventType::Watch, 1, Some("a"));
        incomplete.timestamp_local = None;
        let summary = SummaryBuilder::build(&[incomplete]);

        assert_eq!(summary.missing_local_timestamp, 1);
    }

    #[test]
    fn test_empty_input() {
        let summary = SummaryBuilder::build(&[]);

        assert_eq!(summary.total_events, 0);
        assert_eq!(summary.first_event_utc, None);
        assert_eq!(summary.last_event_utc, None);
    }
}
