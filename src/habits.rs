//! Habit streak tracking
//!
//! Detects consecutive-day watching habits per channel, rewatched video, and
//! topic. Habit runs are strictly consecutive (no gap tolerance), unlike the
//! 1-day tolerance used when merging anomaly periods.

use crate::config::InsightConfig;
use crate::streaks::compress_runs;
use crate::types::{Event, HabitRecord, HabitReport, Streak, SubjectKind};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

/// Qualifying channel subjects counted into the habit strength score
const STRENGTH_TOP_SUBJECTS: usize = 5;

/// Tracker for consecutive-day watching habits
pub struct HabitTracker;

impl HabitTracker {
    /// Detect habit streaks across channel, video, and topic subjects.
    ///
    /// Watch events without a local timestamp are skipped and counted. Output
    /// ordering is longest streak desc, total habit days desc, subject asc.
    pub fn track(events: &[Event], config: &InsightConfig) -> HabitReport {
        let mut channel_dates: BTreeMap<String, BTreeSet<NaiveDate>> = BTreeMap::new();
        let mut video_dates: BTreeMap<String, BTreeSet<NaiveDate>> = BTreeMap::new();
        let mut topic_dates: BTreeMap<String, BTreeSet<NaiveDate>> = BTreeMap::new();
        let mut skipped = 0u32;

        for event in events.iter().filter(|e| e.is_watch()) {
            let date = match event.local_date() {
                Some(date) => date,
                None => {
                    skipped += 1;
                    continue;
                }
            };

            if let Some(channel) = &event.channel_clean {
                channel_dates.entry(channel.clone()).or_default().insert(date);
            }
            if let Some(title) = &event.text_clean {
                video_dates.entry(title.clone()).or_default().insert(date);
            }
            for topic in &event.topics {
                topic_dates.entry(topic.clone()).or_default().insert(date);
            }
        }

        let channel_habits = collect_habits(
            &channel_dates,
            SubjectKind::Channel,
            config.habit_min_streak_days,
            0,
        );
        // Rewatch streaks qualify at 2 days; a video must appear on at least
        // 2 distinct dates to be a rewatch at all
        let video_habits = collect_habits(
            &video_dates,
            SubjectKind::Video,
            config.rewatch_min_streak_days,
            2,
        );
        let topic_habits = collect_habits(
            &topic_dates,
            SubjectKind::Topic,
            config.habit_min_streak_days,
            config.topic_min_days,
        );

        let max_streak_days = channel_habits
            .iter()
            .map(|h| h.longest_streak)
            .max()
            .unwrap_or(0);
        let habit_strength = habit_strength(&channel_habits, max_streak_days);

        HabitReport {
            channel_habits,
            video_habits,
            topic_habits,
            habit_strength,
            max_streak_days,
            skipped,
        }
    }
}

/// Build ordered habit records for one subject kind
fn collect_habits(
    subject_dates: &BTreeMap<String, BTreeSet<NaiveDate>>,
    kind: SubjectKind,
    min_streak_days: u32,
    min_total_days: u32,
) -> Vec<HabitRecord> {
    let mut records: Vec<HabitRecord> = subject_dates
        .iter()
        .filter(|(_, dates)| dates.len() as u32 >= min_total_days)
        .filter_map(|(subject, dates)| {
            let sorted: Vec<NaiveDate> = dates.iter().copied().collect();
            let streaks: Vec<Streak> = compress_runs(&sorted, 0)
                .into_iter()
                .filter(|run| run.len() >= min_streak_days)
                .map(|run| Streak {
                    start: run.start,
                    end: run.end,
                    length: run.len(),
                })
                .collect();

            if streaks.is_empty() {
                return None;
            }

            let longest_streak = streaks.iter().map(|s| s.length).max().unwrap_or(0);
            let total_habit_days: u32 = streaks.iter().map(|s| s.length).sum();

            Some(HabitRecord {
                subject: subject.clone(),
                kind,
                streaks,
                longest_streak,
                total_habit_days,
                total_days_watched: dates.len() as u32,
                habit_score: (10 * total_habit_days).min(100),
            })
        })
        .collect();

    records.sort_by(|a, b| {
        b.longest_streak
            .cmp(&a.longest_streak)
            .then_with(|| b.total_habit_days.cmp(&a.total_habit_days))
            .then_with(|| a.subject.cmp(&b.subject))
    });
    records
}

/// Overall habit formation score in [0, 100].
///
/// `min(100, 10 x qualifying channel subjects + 5 x longest channel streak
/// + sum of habit days across the top 5 channel subjects)` - monotone in
/// each input.
fn habit_strength(channel_habits: &[HabitRecord], max_streak: u32) -> u32 {
    if channel_habits.is_empty() {
        return 0;
    }
    let top_days: u32 = channel_habits
        .iter()
        .take(STRENGTH_TOP_SUBJECTS)
        .map(|h| h.total_habit_days)
        .sum();
    (10 * channel_habits.len() as u32 + 5 * max_streak + top_days).min(100)
}
