//! Channel-level analytics
//!
//! Two views over per-channel watch counts: a histogram across fixed
//! watch-count bins (with an optional monthly cross-tab), and a top-channel
//! ranking with engagement totals.

use crate::config::InsightConfig;
use crate::time_buckets::round2;
use crate::types::{
    BinCount, ChannelAnalytics, ChannelCount, ChannelDistribution, Engagement, EngagementFilter,
    Event, MonthlyBinCounts, BIN_LABELS,
};
use chrono::Datelike;
use std::collections::BTreeMap;

/// Bins channels by how many times each was watched
pub struct ChannelDistributionBinner;

impl ChannelDistributionBinner {
    /// Build the fixed-bin histogram and the monthly cross-tab.
    ///
    /// A channel's bin is determined by its all-time watch count; the
    /// cross-tab attributes each month's watches to that bin.
    pub fn bin(events: &[Event]) -> ChannelDistribution {
        let mut channel_counts: BTreeMap<&str, u32> = BTreeMap::new();
        let mut monthly: BTreeMap<String, BTreeMap<&str, u32>> = BTreeMap::new();

        for event in events.iter().filter(|e| e.is_watch()) {
            let channel = match &event.channel_clean {
                Some(channel) => channel.as_str(),
                None => continue,
            };
            *channel_counts.entry(channel).or_insert(0) += 1;

            if let Some(date) = event.local_date() {
                let month = format!("{:04}-{:02}", date.year(), date.month());
                *monthly.entry(month).or_default().entry(channel).or_insert(0) += 1;
            }
        }

        let mut bins = [(0u32, 0u32); BIN_LABELS.len()];
        let mut single_view_channels = 0u32;
        for &count in channel_counts.values() {
            let (channels, videos) = &mut bins[bin_index(count)];
            *channels += 1;
            *videos += count;
            if count == 1 {
                single_view_channels += 1;
            }
        }

        let bin_distribution: Vec<BinCount> = BIN_LABELS
            .iter()
            .zip(bins.iter())
            .map(|(&label, &(channels, videos))| BinCount {
                bin: label.to_string(),
                channel_count: channels,
                video_count: videos,
            })
            .collect();

        let temporal_by_bin: Vec<MonthlyBinCounts> = monthly
            .into_iter()
            .map(|(month, counts)| {
                let mut bins = vec![0u32; BIN_LABELS.len()];
                for (channel, count) in counts {
                    if let Some(&total) = channel_counts.get(channel) {
                        bins[bin_index(total)] += count;
                    }
                }
                MonthlyBinCounts { month, bins }
            })
            .collect();

        let total_channels = channel_counts.len() as u32;
        let total_videos: u32 = channel_counts.values().sum();
        let single_view_percentage = if total_channels > 0 {
            round2(single_view_channels as f64 / total_channels as f64 * 100.0)
        } else {
            0.0
        };

        ChannelDistribution {
            bin_distribution,
            temporal_by_bin,
            total_channels,
            total_videos,
            single_view_channels,
            single_view_percentage,
        }
    }
}

/// Index into [`BIN_LABELS`] for a watch count (count is at least 1)
fn bin_index(count: u32) -> usize {
    match count {
        0..=1 => 0,
        2..=5 => 1,
        6..=10 => 2,
        11..=20 => 3,
        21..=50 => 4,
        51..=100 => 5,
        _ => 6,
    }
}

/// Ranks channels by watch count with engagement totals
pub struct ChannelAnalyzer;

impl ChannelAnalyzer {
    /// Top channels by watch count under the given engagement filter.
    ///
    /// Ties rank by channel name ascending. Engagement totals always cover
    /// all watch events with a channel, independent of the filter.
    pub fn top_channels(
        events: &[Event],
        filter: EngagementFilter,
        config: &InsightConfig,
    ) -> ChannelAnalytics {
        let mut counts: BTreeMap<&str, u32> = BTreeMap::new();
        let mut display: BTreeMap<&str, &str> = BTreeMap::new();
        let mut active_count = 0u32;
        let mut passive_count = 0u32;

        for event in events.iter().filter(|e| e.is_watch()) {
            let channel = match &event.channel_clean {
                Some(channel) => channel.as_str(),
                None => continue,
            };
            match event.engagement {
                Some(Engagement::Active) => active_count += 1,
                Some(Engagement::Passive) => passive_count += 1,
                None => {}
            }
            let counted = match filter {
                EngagementFilter::All => true,
                EngagementFilter::Active => event.engagement == Some(Engagement::Active),
                EngagementFilter::Passive => event.engagement == Some(Engagement::Passive),
            };
            if !counted {
                continue;
            }
            *counts.entry(channel).or_insert(0) += 1;
            if let Some(name) = &event.channel {
                display.entry(channel).or_insert(name.as_str());
            }
        }

        let total_count: u32 = counts.values().sum();

        let mut ranked: Vec<(&str, u32)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        let total_unique_channels = ranked.len() as u32;
        let top: Vec<ChannelCount> = ranked
            .iter()
            .take(config.top_channels)
            .map(|&(channel, count)| ChannelCount {
                channel: display.get(channel).copied().unwrap_or(channel).to_string(),
                channel_clean: channel.to_string(),
                count,
                percentage: if total_count > 0 {
                    round2(count as f64 / total_count as f64 * 100.0)
                } else {
                    0.0
                },
            })
            .collect();

        let top_total: u32 = top.iter().map(|c| c.count).sum();

        ChannelAnalytics {
            engagement_filter: filter,
            total_unique_channels,
            total_count,
            top_channels: top,
            other_count: total_count - top_total,
            active_count,
            passive_count,
        }
    }
}
