//! Watchlens - deterministic insight engine for media watch-history exports
//!
//! Watchlens turns a normalized event snapshot (watch / search / subscribe
//! records) into serializable viewing insights through a pure pipeline:
//! time-bucket aggregation → session segmentation → baseline statistics →
//! anomaly detection → habit tracking → pattern mining → channel and trend
//! analytics.
//!
//! Every stage is a pure function of its input: no I/O, no clocks, no
//! randomness. Identical snapshots always serialize to identical reports.

pub mod anomalies;
pub mod baseline;
pub mod channels;
pub mod config;
pub mod error;
pub mod habits;
pub mod patterns;
pub mod pipeline;
pub mod searches;
pub mod sessions;
pub mod streaks;
pub mod subscriptions;
pub mod summary;
pub mod time_buckets;
pub mod trends;
pub mod types;

pub use config::InsightConfig;
pub use error::InsightError;
pub use pipeline::{derive_insights, InsightEngine, InsightReport};

// Stage exports
pub use anomalies::AnomalyDetector;
pub use baseline::BaselineStatistics;
pub use channels::{ChannelAnalyzer, ChannelDistributionBinner};
pub use habits::HabitTracker;
pub use patterns::PatternMiner;
pub use searches::SearchAnalyzer;
pub use sessions::SessionSegmenter;
pub use subscriptions::SubscriptionOverlapAnalyzer;
pub use summary::SummaryBuilder;
pub use time_buckets::TimeBucketAggregator;
pub use trends::TrendAnalyzer;

// Event model exports
pub use types::{Event, EventType};

/// Engine version embedded by consumers into report envelopes
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
