//! Core data types
//!
//! This module defines the normalized input [`Event`] and every derived record
//! the insight components produce. Derived records are plain serializable
//! structs intended for transport to a presentation layer; per-date maps use
//! `BTreeMap` so iteration order and serialized output are deterministic.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kind of a normalized history event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Watch,
    Search,
    Subscribe,
}

/// Engagement level attached to a watch event by the upstream normalizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Engagement {
    Active,
    Passive,
}

/// One normalized watch/search/subscribe record.
///
/// Events are produced by an upstream normalizer and treated as immutable.
/// Events with a null `timestamp_local` are excluded from temporal
/// aggregation and counted as skipped, never treated as an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Event kind
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// Engagement level (watch events only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engagement: Option<Engagement>,
    /// UTC instant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_utc: Option<DateTime<Utc>>,
    /// Wall-clock instant in the user's timezone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_local: Option<NaiveDateTime>,
    /// Local hour, 0-23
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hour_local: Option<u32>,
    /// Local day of week, Monday = 0
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<u32>,
    /// Local month, 1-12
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month_local: Option<u32>,
    /// Channel display name as it appeared in the export
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    /// Normalized channel name used for identity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_clean: Option<String>,
    /// Title or query text as it appeared in the export
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Normalized title or query text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_clean: Option<String>,
    /// Opaque topic labels from an upstream extractor
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub topics: Vec<String>,
}

impl Event {
    /// Calendar date of the local timestamp, if present
    pub fn local_date(&self) -> Option<NaiveDate> {
        self.timestamp_local.map(|ts| ts.date())
    }

    pub fn is_watch(&self) -> bool {
        self.event_type == EventType::Watch
    }
}

/// Day names indexed by `day_of_week` (Monday = 0)
pub const DAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// The four fixed six-hour intervals of a day
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayInterval {
    /// Hours 0-5
    Night,
    /// Hours 6-11
    Morning,
    /// Hours 12-17
    Afternoon,
    /// Hours 18-23
    Evening,
}

impl DayInterval {
    /// All intervals in chronological order
    pub const ALL: [DayInterval; 4] = [
        DayInterval::Night,
        DayInterval::Morning,
        DayInterval::Afternoon,
        DayInterval::Evening,
    ];

    /// Interval containing the given hour; `None` when the hour is out of range
    pub fn from_hour(hour: u32) -> Option<DayInterval> {
        match hour {
            0..=5 => Some(DayInterval::Night),
            6..=11 => Some(DayInterval::Morning),
            12..=17 => Some(DayInterval::Afternoon),
            18..=23 => Some(DayInterval::Evening),
            _ => None,
        }
    }

    /// Lowercase name used in rendered insight text
    pub fn name(&self) -> &'static str {
        match self {
            DayInterval::Night => "night",
            DayInterval::Morning => "morning",
            DayInterval::Afternoon => "afternoon",
            DayInterval::Evening => "evening",
        }
    }

    /// Display label with the hour span
    pub fn label(&self) -> &'static str {
        match self {
            DayInterval::Night => "Night (12AM-6AM)",
            DayInterval::Morning => "Morning (6AM-12PM)",
            DayInterval::Afternoon => "Afternoon (12PM-6PM)",
            DayInterval::Evening => "Evening (6PM-12AM)",
        }
    }
}

// ============================================================================
// TimeBucketAggregator output
// ============================================================================

/// Peak day within one ISO week
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyPeakDay {
    pub iso_year: i32,
    pub iso_week: u32,
    /// Winning day of week, Monday = 0 (ties resolve to the lowest index)
    pub day: u32,
    pub day_name: String,
    pub count: u32,
}

/// Per-hour slice of the 24-hour polar chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourActivity {
    pub hour: u32,
    /// 12-hour clock label, e.g. "12 AM", "3 PM"
    pub label: String,
    pub count: u32,
    /// Percentage of total counted watches, rounded to 2 decimals
    pub percentage: f64,
}

/// Count for one fixed day interval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalCount {
    pub interval: DayInterval,
    pub label: String,
    pub count: u32,
}

/// Hourly/daily/weekly activity distributions with peak detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchPatterns {
    /// Watch counts per hour 0-23
    pub hourly_distribution: Vec<u32>,
    /// Watch counts per day of week, Monday = 0
    pub daily_distribution: Vec<u32>,
    pub peak_hour: Option<u32>,
    pub peak_hour_count: u32,
    pub peak_day: Option<u32>,
    pub peak_day_name: Option<String>,
    pub peak_day_count: u32,
    /// Peak day per ISO week, ascending by (year, week)
    pub weekly_peak_days: Vec<WeeklyPeakDay>,
    /// Day winning the most weeks; ties resolve to the lowest day index
    pub overall_peak_day: Option<u32>,
    pub overall_peak_day_name: Option<String>,
    pub overall_peak_wins: u32,
    pub total_weeks: u32,
    pub time_intervals: Vec<IntervalCount>,
    pub peak_interval: Option<DayInterval>,
    pub circular_activity: Vec<HourActivity>,
    /// Watch events excluded for missing hour/day fields
    pub skipped: u32,
}

// ============================================================================
// SessionSegmenter output
// ============================================================================

/// One contiguous viewing session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub event_count: u32,
    /// `event_count x per_video_minutes_estimate`
    pub estimated_duration_minutes: f64,
}

/// Time-spent estimate derived from session segmentation.
///
/// Takeout-style exports carry no watch duration, so totals are
/// `events x per_video_minutes_estimate` rather than session spans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSpent {
    pub sessions: Vec<SessionRecord>,
    pub session_count: u32,
    /// Longest wall-clock span among sessions with at least 2 events, minutes
    pub longest_session_minutes: f64,
    pub total_minutes: f64,
    pub total_hours: f64,
    pub average_daily_minutes: f64,
    /// Distinct calendar dates with at least one counted watch
    pub total_days: u32,
    /// Watch events excluded for missing local timestamp
    pub skipped: u32,
}

// ============================================================================
// BaselineStatistics output
// ============================================================================

/// Per-day watch counts with the statistics anomaly detection runs on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBaseline {
    /// Watch count per calendar date
    pub daily_counts: BTreeMap<NaiveDate, u32>,
    /// Watch events in hours 0-4 per calendar date (dates with zero omitted)
    pub late_night_counts: BTreeMap<NaiveDate, u32>,
    /// Mean of the per-date counts
    pub mean: f64,
    /// Sample standard deviation (n-1); 0 when fewer than 2 dates
    pub stddev: f64,
    pub total_days: u32,
    pub total_watches: u32,
    pub total_late_night: u32,
    /// Late-night share of all counted watches, percent
    pub late_night_baseline_pct: f64,
    /// Watch events excluded for missing local timestamp
    pub skipped: u32,
}

// ============================================================================
// AnomalyDetector output
// ============================================================================

/// Kind of a flagged day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyType {
    LateNight,
    Binge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    High,
    Medium,
}

/// One flagged calendar date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyRecord {
    #[serde(rename = "type")]
    pub anomaly_type: AnomalyType,
    pub date: NaiveDate,
    /// Late-night count or daily watch count, depending on the type
    pub metric: u32,
    /// Daily count over mean; binge anomalies only, omitted when mean is 0
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<f64>,
    pub severity: Severity,
}

/// Run of adjacent flagged dates of the same type (up to a 1-day gap)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakPeriod {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Calendar span, `end - start + 1`
    pub duration_days: u32,
    /// Sum of the per-date metric across the run
    pub aggregate_total: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Chronotype {
    #[serde(rename = "Night Owl")]
    NightOwl,
    #[serde(rename = "Early Bird")]
    EarlyBird,
    Balanced,
}

/// Gap of 4+ calendar days between consecutive active dates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InactivePeriod {
    /// Last active date before the gap
    pub start: NaiveDate,
    /// First active date after the gap
    pub end: NaiveDate,
    /// Idle days strictly between start and end
    pub gap_days: u32,
}

/// Habitual patterns derived alongside anomaly detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorPatterns {
    pub chronotype: Chronotype,
    /// Watches in hours 20-23 and 0-4
    pub night_watches: u32,
    /// Watches in hours 5-11
    pub morning_watches: u32,
    pub weekend_warrior: bool,
    /// Weekend share of watches with a known day of week, percent
    pub weekend_pct: f64,
    pub inactive_periods: Vec<InactivePeriod>,
}

/// Full anomaly report: flagged days, merged periods, and derived patterns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyReport {
    /// Flagged dates of both types, ascending by date (late-night before
    /// binge on the same date)
    pub anomalies: Vec<AnomalyRecord>,
    pub late_night_periods: Vec<StreakPeriod>,
    pub binge_periods: Vec<StreakPeriod>,
    pub late_night_baseline_pct: f64,
    pub patterns: BehaviorPatterns,
}

// ============================================================================
// HabitTracker output
// ============================================================================

/// What a habit subject identifies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectKind {
    Channel,
    Video,
    Topic,
}

/// One maximal run of strictly consecutive watched dates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub length: u32,
}

/// Consecutive-day watching record for one subject
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitRecord {
    pub subject: String,
    pub kind: SubjectKind,
    /// Qualifying streaks only, ascending by start date
    pub streaks: Vec<Streak>,
    pub longest_streak: u32,
    /// Sum of qualifying streak lengths
    pub total_habit_days: u32,
    /// All distinct dates the subject was watched
    pub total_days_watched: u32,
    /// `min(100, 10 x total_habit_days)`
    pub habit_score: u32,
}

/// Habit report across channel, video, and topic subjects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitReport {
    pub channel_habits: Vec<HabitRecord>,
    pub video_habits: Vec<HabitRecord>,
    pub topic_habits: Vec<HabitRecord>,
    /// Overall habit formation score, 0-100
    pub habit_strength: u32,
    pub max_streak_days: u32,
    /// Watch events excluded for missing local timestamp
    pub skipped: u32,
}

// ============================================================================
// PatternMiner output
// ============================================================================

/// One `dimension=value` item of an association rule
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RuleItem {
    pub dimension: String,
    pub value: String,
}

/// One mined association rule with its statistics and rendered text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternRule {
    pub antecedent: RuleItem,
    pub consequent: RuleItem,
    /// Co-occurrence share of all transactions
    pub support: f64,
    /// `support(A and B) / support(A)`
    pub confidence: f64,
    /// `confidence / support(B)`
    pub lift: f64,
    /// Transactions containing both items
    pub occurrences: u32,
    /// Natural-language sentence with variable terms wrapped in `**`
    pub rendered_text: String,
}

/// Ranked association rules over daily viewing transactions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternReport {
    /// Top rules by lift, then confidence, then support
    pub rules: Vec<PatternRule>,
    /// Rules surviving the support/confidence thresholds before truncation
    pub total_rules: u32,
    pub total_transactions: u32,
}

// ============================================================================
// SubscriptionOverlapAnalyzer output
// ============================================================================

/// Set algebra between subscribed and watched channels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionOverlap {
    pub total_subscriptions: u32,
    pub total_watched_channels: u32,
    /// Subscribed and watched, sorted ascending
    pub overlap: Vec<String>,
    pub overlap_pct: f64,
    /// Subscribed but never watched, sorted ascending
    pub ghost: Vec<String>,
    pub ghost_pct: f64,
    /// Watched without a subscription, sorted ascending
    pub unsubscribed_watched: Vec<String>,
}

// ============================================================================
// ChannelDistributionBinner output
// ============================================================================

/// Labels of the fixed watch-count bins, ascending
pub const BIN_LABELS: [&str; 7] = ["1", "2-5", "6-10", "11-20", "21-50", "51-100", "100+"];

/// Channels and watches falling into one fixed count bin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinCount {
    pub bin: String,
    pub channel_count: u32,
    pub video_count: u32,
}

/// Per-bin watch counts for one calendar month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyBinCounts {
    /// `YYYY-MM`
    pub month: String,
    /// Counts aligned with [`BIN_LABELS`]
    pub bins: Vec<u32>,
}

/// Histogram of channels by watch-count range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelDistribution {
    pub bin_distribution: Vec<BinCount>,
    /// Monthly cross-tab, ascending by month
    pub temporal_by_bin: Vec<MonthlyBinCounts>,
    pub total_channels: u32,
    pub total_videos: u32,
    pub single_view_channels: u32,
    pub single_view_percentage: f64,
}

// ============================================================================
// Channel analytics (top channels)
// ============================================================================

/// Which engagement class of watch events to count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementFilter {
    #[default]
    All,
    Active,
    Passive,
}

/// One entry of the top-channel ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelCount {
    /// Display name, falling back to the normalized name
    pub channel: String,
    pub channel_clean: String,
    pub count: u32,
    /// Share of counted watches, rounded to 2 decimals
    pub percentage: f64,
}

/// Top channels by watch count with engagement totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelAnalytics {
    pub engagement_filter: EngagementFilter,
    pub total_unique_channels: u32,
    pub total_count: u32,
    pub top_channels: Vec<ChannelCount>,
    /// Counted watches outside the top entries
    pub other_count: u32,
    pub active_count: u32,
    pub passive_count: u32,
}

// ============================================================================
// Search analytics
// ============================================================================

/// One entry of the top-search-term ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchTerm {
    /// Display text, falling back to the normalized term
    pub term: String,
    pub term_clean: String,
    pub count: u32,
}

/// Totals and top terms over search events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchAnalytics {
    pub total_searches: u32,
    pub unique_terms: u32,
    /// Top terms by count desc, term asc
    pub top_terms: Vec<SearchTerm>,
    /// Search events excluded for missing normalized text
    pub skipped: u32,
}

// ============================================================================
// Temporal trends
// ============================================================================

/// Aggregates for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyStats {
    /// `YYYY-MM`
    pub month: String,
    pub total_watches: u32,
    pub peak_hour: Option<u32>,
    pub peak_hour_count: u32,
    pub peak_day: Option<u32>,
    pub peak_day_name: Option<String>,
    pub peak_day_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftType {
    PeakHour,
    PeakDay,
}

/// Significant month-over-month change in viewing rhythm
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternShift {
    #[serde(rename = "type")]
    pub shift_type: ShiftType,
    pub from_month: String,
    pub to_month: String,
    pub description: String,
}

/// Month-over-month viewing trends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalTrends {
    pub monthly_stats: Vec<MonthlyStats>,
    pub pattern_shifts: Vec<PatternShift>,
    pub total_months: u32,
}

// ============================================================================
// Snapshot summary
// ============================================================================

/// Whole-snapshot totals and date range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotSummary {
    pub total_events: u32,
    pub total_watch: u32,
    pub total_search: u32,
    pub total_subscribe: u32,
    pub unique_channels: u32,
    pub first_event_utc: Option<DateTime<Utc>>,
    pub last_event_utc: Option<DateTime<Utc>>,
    /// Events lacking a local timestamp
    pub missing_local_timestamp: u32,
}
