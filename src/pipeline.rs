//! One-shot insight pipeline
//!
//! Runs every analysis stage over a read-only event snapshot and collects
//! the outputs into one serializable report. The engine holds only the
//! validated configuration, so concurrent runs share nothing.

use crate::anomalies::AnomalyDetector;
use crate::baseline::BaselineStatistics;
use crate::channels::{ChannelAnalyzer, ChannelDistributionBinner};
use crate::config::InsightConfig;
use crate::error::InsightError;
use crate::habits::HabitTracker;
use crate::patterns::PatternMiner;
use crate::searches::SearchAnalyzer;
use crate::sessions::SessionSegmenter;
use crate::subscriptions::SubscriptionOverlapAnalyzer;
use crate::summary::SummaryBuilder;
use crate::time_buckets::TimeBucketAggregator;
use crate::trends::TrendAnalyzer;
use crate::types::{
    AnomalyReport, ChannelAnalytics, ChannelDistribution, DailyBaseline, EngagementFilter, Event,
    HabitReport, PatternReport, SearchAnalytics, SnapshotSummary, SubscriptionOverlap,
    TemporalTrends, TimeSpent, WatchPatterns,
};
use serde::{Deserialize, Serialize};

/// Combined output of every analysis stage for one event snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightReport {
    pub summary: SnapshotSummary,
    pub watch_patterns: WatchPatterns,
    pub time_spent: TimeSpent,
    pub baseline: DailyBaseline,
    pub anomalies: AnomalyReport,
    pub habits: HabitReport,
    pub patterns: PatternReport,
    pub subscriptions: SubscriptionOverlap,
    pub channel_distribution: ChannelDistribution,
    pub channel_analytics: ChannelAnalytics,
    pub searches: SearchAnalytics,
    pub trends: TemporalTrends,
}

/// Stateless engine running all stages with one validated configuration
#[derive(Debug, Clone)]
pub struct InsightEngine {
    config: InsightConfig,
}

impl InsightEngine {
    /// Validate the configuration and build an engine.
    ///
    /// Configuration problems are the only errors this crate surfaces;
    /// they are rejected here, before any event is processed.
    pub fn new(config: InsightConfig) -> Result<Self, InsightError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &InsightConfig {
        &self.config
    }

    /// Run every stage over the snapshot.
    ///
    /// Pure function of the input: identical event lists yield identical
    /// reports, byte for byte once serialized.
    pub fn run(&self, events: &[Event]) -> InsightReport {
        let baseline = BaselineStatistics::compute(events);
        let anomalies = AnomalyDetector::detect(events, &baseline, &self.config);

        InsightReport {
            summary: SummaryBuilder::build(events),
            watch_patterns: TimeBucketAggregator::aggregate(events),
            time_spent: SessionSegmenter::segment(events, &self.config),
            anomalies,
            baseline,
            habits: HabitTracker::track(events, &self.config),
            patterns: PatternMiner::mine(events, &self.config),
            subscriptions: SubscriptionOverlapAnalyzer::analyze(events),
            channel_distribution: ChannelDistributionBinner::bin(events),
            channel_analytics: ChannelAnalyzer::top_channels(
                events,
                EngagementFilter::All,
                &self.config,
            ),
            searches: SearchAnalyzer::analyze(events, &self.config),
            trends: TrendAnalyzer::analyze(events),
        }
    }
}

/// One-shot convenience wrapper around [`InsightEngine`]
pub fn derive_insights(
    events: &[Event],
    config: &InsightConfig,
) -> Result<InsightReport, InsightError> {
    let engine = InsightEngine::new(config.clone())?;
    Ok(engine.run(events))
}
