//! Engine configuration
//!
//! Every tunable threshold is carried in one value object that is passed
//! explicitly into each component call. Nothing is read from process-wide
//! state, so components stay pure and testable in isolation.

use crate::error::InsightError;
use serde::{Deserialize, Serialize};

/// Default gap between watch events that splits a viewing session
pub const DEFAULT_SESSION_GAP_MINUTES: i64 = 30;

/// Default per-video duration estimate in minutes.
///
/// Takeout-style exports carry no duration field; this is a documented
/// approximation, not something to correct via inference.
pub const DEFAULT_PER_VIDEO_MINUTES: f64 = 4.0;

/// Configuration value object for all insight components
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightConfig {
    /// Gap in minutes that starts a new viewing session
    pub session_gap_minutes: i64,
    /// Estimated minutes watched per event
    pub per_video_minutes_estimate: f64,
    /// Standard deviations above the mean for a binge day
    pub binge_std_multiplier: f64,
    /// Minimum daily watch count for a binge day
    pub binge_min_count: u32,
    /// Mean multiplier at which a binge day becomes high severity
    pub binge_high_multiplier: f64,
    /// Minimum late-night (hours 0-4) watches to flag a date
    pub late_night_min_count: u32,
    /// Late-night count at which the flag becomes high severity
    pub late_night_high_count: u32,
    /// Minimum support for an association rule
    pub min_support: f64,
    /// Minimum confidence for an association rule
    pub min_confidence: f64,
    /// Minimum raw co-occurrence count for an association rule
    pub min_rule_occurrences: u32,
    /// Association rules returned after ranking
    pub max_rules: usize,
    /// Top channels contributing items to each daily transaction
    pub channels_per_transaction: usize,
    /// Minimum consecutive days for a channel or topic habit streak
    pub habit_min_streak_days: u32,
    /// Minimum consecutive days for a video rewatch streak
    pub rewatch_min_streak_days: u32,
    /// Minimum distinct watched dates before a topic becomes a habit subject
    pub topic_min_days: u32,
    /// Top channels returned by channel analytics
    pub top_channels: usize,
    /// Top terms returned by search analytics
    pub top_search_terms: usize,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            session_gap_minutes: DEFAULT_SESSION_GAP_MINUTES,
            per_video_minutes_estimate: DEFAULT_PER_VIDEO_MINUTES,
            binge_std_multiplier: 2.0,
            binge_min_count: 10,
            binge_high_multiplier: 3.0,
            late_night_min_count: 3,
            late_night_high_count: 10,
            min_support: 0.05,
            min_confidence: 0.5,
            min_rule_occurrences: 3,
            max_rules: 4,
            channels_per_transaction: 3,
            habit_min_streak_days: 3,
            rewatch_min_streak_days: 2,
            topic_min_days: 5,
            top_channels: 20,
            top_search_terms: 20,
        }
    }
}

impl InsightConfig {
    /// Validate the configuration before any event is processed
    pub fn validate(&self) -> Result<(), InsightError> {
        if self.session_gap_minutes <= 0 {
            return Err(InsightError::InvalidConfig(format!(
                "session_gap_minutes must be positive, got {}",
                self.session_gap_minutes
            )));
        }
        if self.per_video_minutes_estimate <= 0.0 {
            return Err(InsightError::InvalidConfig(format!(
                "per_video_minutes_estimate must be positive, got {}",
                self.per_video_minutes_estimate
            )));
        }
        if self.binge_std_multiplier <= 0.0 {
            return Err(InsightError::InvalidConfig(format!(
                "binge_std_multiplier must be positive, got {}",
                self.binge_std_multiplier
            )));
        }
        if self.binge_high_multiplier <= 0.0 {
            return Err(InsightError::InvalidConfig(format!(
                "binge_high_multiplier must be positive, got {}",
                self.binge_high_multiplier
            )));
        }
        if self.binge_min_count == 0 || self.late_night_min_count == 0 {
            return Err(InsightError::InvalidConfig(
                "anomaly minimum counts must be at least 1".to_string(),
            ));
        }
        if self.late_night_high_count < self.late_night_min_count {
            return Err(InsightError::InvalidConfig(format!(
                "late_night_high_count ({}) must not be below late_night_min_count ({})",
                self.late_night_high_count, self.late_night_min_count
            )));
        }
        if !(self.min_support > 0.0 && self.min_support <= 1.0) {
            return Err(InsightError::InvalidConfig(format!(
                "min_support must be in (0, 1], got {}",
                self.min_support
            )));
        }
        if !(self.min_confidence > 0.0 && self.min_confidence <= 1.0) {
            return Err(InsightError::InvalidConfig(format!(
                "min_confidence must be in (0, 1], got {}",
                self.min_confidence
            )));
        }
        if self.channels_per_transaction == 0 {
            return Err(InsightError::InvalidConfig(
                "channels_per_transaction must be at least 1".to_string(),
            ));
        }
        if self.habit_min_streak_days < 2 || self.rewatch_min_streak_days < 2 {
            return Err(InsightError::InvalidConfig(
                "habit streak minimums must be at least 2 days".to_string(),
            ));
        }
        Ok(())
    }
}
