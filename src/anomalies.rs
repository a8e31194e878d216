//! Behavioral anomaly detection
//!
//! Flags late-night and binge days against the daily baseline, merges
//! adjacent flagged dates into streak periods, and derives chronotype,
//! weekend, and inactivity patterns.

use crate::config::InsightConfig;
use crate::streaks::compress_runs;
use crate::types::{
    AnomalyRecord, AnomalyReport, AnomalyType, BehaviorPatterns, Chronotype, DailyBaseline, Event,
    InactivePeriod, Severity, StreakPeriod,
};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Missing calendar days tolerated inside an anomaly streak period
const PERIOD_GAP_TOLERANCE: i64 = 1;

/// Minimum gap in calendar days between active dates to record inactivity
const INACTIVE_GAP_DAYS: i64 = 4;

/// Chronotype dominance ratio: one side must exceed 1.5x the other
const CHRONOTYPE_RATIO: f64 = 1.5;

/// Weekend share of watches above which the user is a weekend warrior
const WEEKEND_WARRIOR_PCT: f64 = 35.0;

/// Detector for late-night and binge anomalies
pub struct AnomalyDetector;

impl AnomalyDetector {
    /// Flag anomalous dates and derive behavior patterns.
    ///
    /// Thresholds come from the configuration; the baseline must have been
    /// computed from the same event snapshot.
    pub fn detect(
        events: &[Event],
        baseline: &DailyBaseline,
        config: &InsightConfig,
    ) -> AnomalyReport {
        let late_night = detect_late_night(baseline, config);
        let binge = detect_binge(baseline, config);

        let late_night_periods = merge_periods(&late_night);
        let binge_periods = merge_periods(&binge);

        // Interleave by date, late-night first on equal dates
        let mut anomalies: Vec<AnomalyRecord> = late_night.into_iter().chain(binge).collect();
        anomalies.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| rank(a.anomaly_type).cmp(&rank(b.anomaly_type)))
        });

        AnomalyReport {
            anomalies,
            late_night_periods,
            binge_periods,
            late_night_baseline_pct: baseline.late_night_baseline_pct,
            patterns: derive_patterns(events, baseline),
        }
    }
}

fn rank(anomaly_type: AnomalyType) -> u8 {
    match anomaly_type {
        AnomalyType::LateNight => 0,
        AnomalyType::Binge => 1,
    }
}

/// Dates with at least `late_night_min_count` watches in hours 0-4
fn detect_late_night(baseline: &DailyBaseline, config: &InsightConfig) -> Vec<AnomalyRecord> {
    baseline
        .late_night_counts
        .iter()
        .filter(|(_, &count)| count >= config.late_night_min_count)
        .map(|(&date, &count)| AnomalyRecord {
            anomaly_type: AnomalyType::LateNight,
            date,
            metric: count,
            multiplier: None,
            severity: if count >= config.late_night_high_count {
                Severity::High
            } else {
                Severity::Medium
            },
        })
        .collect()
}

/// Dates whose count exceeds `mean + multiplier x stddev` and the floor count
fn detect_binge(baseline: &DailyBaseline, config: &InsightConfig) -> Vec<AnomalyRecord> {
    let threshold = baseline.mean + config.binge_std_multiplier * baseline.stddev;

    baseline
        .daily_counts
        .iter()
        .filter(|(_, &count)| (count as f64) > threshold && count >= config.binge_min_count)
        .map(|(&date, &count)| {
            let multiplier = if baseline.mean > 0.0 {
                Some(count as f64 / baseline.mean)
            } else {
                None
            };
            let severity = match multiplier {
                Some(m) if m >= config.binge_high_multiplier => Severity::High,
                _ => Severity::Medium,
            };
            AnomalyRecord {
                anomaly_type: AnomalyType::Binge,
                date,
                metric: count,
                multiplier,
                severity,
            }
        })
        .collect()
}

/// Merge same-type flagged dates into periods, tolerating a 1-day gap
fn merge_periods(records: &[AnomalyRecord]) -> Vec<StreakPeriod> {
    let metrics: BTreeMap<NaiveDate, u32> =
        records.iter().map(|r| (r.date, r.metric)).collect();
    let dates: Vec<NaiveDate> = metrics.keys().copied().collect();

    compress_runs(&dates, PERIOD_GAP_TOLERANCE)
        .into_iter()
        .map(|run| StreakPeriod {
            start_date: run.start,
            end_date: run.end,
            duration_days: run.span_days(),
            aggregate_total: run.dates.iter().filter_map(|d| metrics.get(d)).sum(),
        })
        .collect()
}

/// Chronotype, weekend share, and inactive periods
fn derive_patterns(events: &[Event], baseline: &DailyBaseline) -> BehaviorPatterns {
    let mut night_watches = 0u32;
    let mut morning_watches = 0u32;
    let mut weekend_watches = 0u32;
    let mut weekday_watches = 0u32;

    for event in events.iter().filter(|e| e.is_watch()) {
        if let Some(hour) = event.hour_local {
            // Night: 8 PM through 4 AM; morning: 5 AM through 11 AM
            if (20..=23).contains(&hour) || (0..=4).contains(&hour) {
                night_watches += 1;
            } else if (5..=11).contains(&hour) {
                morning_watches += 1;
            }
        }
        if let Some(day) = event.day_of_week {
            if day >= 5 {
                weekend_watches += 1;
            } else {
                weekday_watches += 1;
            }
        }
    }

    let chronotype = if night_watches as f64 > morning_watches as f64 * CHRONOTYPE_RATIO {
        Chronotype::NightOwl
    } else if morning_watches as f64 > night_watches as f64 * CHRONOTYPE_RATIO {
        Chronotype::EarlyBird
    } else {
        Chronotype::Balanced
    };

    let total_dow = weekend_watches + weekday_watches;
    let weekend_pct = if total_dow > 0 {
        weekend_watches as f64 / total_dow as f64 * 100.0
    } else {
        0.0
    };

    BehaviorPatterns {
        chronotype,
        night_watches,
        morning_watches,
        weekend_warrior: weekend_pct > WEEKEND_WARRIOR_PCT,
        weekend_pct,
        inactive_periods: inactive_periods(baseline),
    }
}

/// Gaps of 4+ calendar days between consecutive active dates
fn inactive_periods(baseline: &DailyBaseline) -> Vec<InactivePeriod> {
    let dates: Vec<NaiveDate> = baseline.daily_counts.keys().copied().collect();

    dates
        .windows(2)
        .filter_map(|pair| {
            let gap = (pair[1] - pair[0]).num_days();
            if gap >= INACTIVE_GAP_DAYS {
                Some(InactivePeriod {
                    start: pair[0],
                    end: pair[1],
                    gap_days: (gap - 1) as u32,
                })
            } else {
                None
            }
        })
        .collect()
}
