//! Subscription / watch-history set algebra
//!
//! Splits the subscribed-channel set against the watched-channel set:
//! channels actually watched, ghost subscriptions never opened, and channels
//! watched without a subscription. Percentages are relative to the
//! subscription count and 0 when there are no subscriptions.

use crate::time_buckets::round2;
use crate::types::{Event, EventType, SubscriptionOverlap};
use std::collections::BTreeSet;

/// Analyzer for subscription vs watch-history overlap
pub struct SubscriptionOverlapAnalyzer;

impl SubscriptionOverlapAnalyzer {
    pub fn analyze(events: &[Event]) -> SubscriptionOverlap {
        let mut subscribed: BTreeSet<&str> = BTreeSet::new();
        let mut watched: BTreeSet<&str> = BTreeSet::new();

        for event in events {
            let channel = match &event.channel_clean {
                Some(channel) => channel.as_str(),
                None => continue,
            };
            match event.event_type {
                EventType::Subscribe => {
                    subscribed.insert(channel);
                }
                EventType::Watch => {
                    watched.insert(channel);
                }
                EventType::Search => {}
            }
        }

        let overlap: Vec<String> = subscribed
            .intersection(&watched)
            .map(|c| c.to_string())
            .collect();
        let ghost: Vec<String> = subscribed
            .difference(&watched)
            .map(|c| c.to_string())
            .collect();
        let unsubscribed_watched: Vec<String> = watched
            .difference(&subscribed)
            .map(|c| c.to_string())
            .collect();

        let total_subscriptions = subscribed.len() as u32;
        let pct_of_subs = |count: usize| {
            if total_subscriptions > 0 {
                round2(count as f64 / total_subscriptions as f64 * 100.0)
            } else {
                0.0
            }
        };
        let overlap_pct = pct_of_subs(overlap.len());
        let ghost_pct = pct_of_subs(ghost.len());

        SubscriptionOverlap {
            total_subscriptions,
            total_watched_channels: watched.len() as u32,
            overlap,
            overlap_pct,
            ghost,
            ghost_pct,
            unsubscribed_watched,
        }
    }
}
