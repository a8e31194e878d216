//! Association rule mining over daily viewing transactions
//!
//! Each calendar date becomes one transaction holding the date's top channels,
//! its day of week, and its dominant day interval. Rules pair one channel item
//! with one temporal item in both directions and are kept when they clear the
//! support, occurrence, and confidence thresholds. Pairwise enumeration is
//! enough here; transactions carry at most a handful of items.

use crate::config::InsightConfig;
use crate::types::{DayInterval, Event, PatternReport, PatternRule, RuleItem, DAY_NAMES};
use chrono::{Datelike, NaiveDate};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

const DIM_CHANNEL: &str = "channel";
const DIM_DAY: &str = "day_of_week";
const DIM_BUCKET: &str = "hour_bucket";

/// Miner for channel/time association rules
pub struct PatternMiner;

impl PatternMiner {
    /// Mine ranked association rules from watch events.
    ///
    /// Fewer transactions than `min_rule_occurrences` cannot produce any
    /// rule; the report then carries only the transaction count.
    pub fn mine(events: &[Event], config: &InsightConfig) -> PatternReport {
        let transactions = build_transactions(events, config);
        let total = transactions.len() as u32;

        let mut item_counts: BTreeMap<RuleItem, u32> = BTreeMap::new();
        let mut pair_counts: BTreeMap<(RuleItem, RuleItem), u32> = BTreeMap::new();

        for items in transactions.values() {
            for item in items {
                *item_counts.entry(item.clone()).or_insert(0) += 1;
            }
            let channels = items.iter().filter(|i| i.dimension == DIM_CHANNEL);
            for channel in channels {
                for temporal in items.iter().filter(|i| i.dimension != DIM_CHANNEL) {
                    *pair_counts
                        .entry((channel.clone(), temporal.clone()))
                        .or_insert(0) += 1;
                }
            }
        }

        let mut rules: Vec<PatternRule> = Vec::new();
        for ((channel, temporal), &occ) in &pair_counts {
            let support = occ as f64 / total as f64;
            if support < config.min_support || occ < config.min_rule_occurrences {
                continue;
            }
            for (antecedent, consequent) in
                [(channel, temporal), (temporal, channel)]
            {
                let rule = make_rule(
                    antecedent,
                    consequent,
                    occ,
                    support,
                    &item_counts,
                    total,
                );
                if rule.confidence >= config.min_confidence {
                    rules.push(rule);
                }
            }
        }

        rules.sort_by(rank_rules);
        let total_rules = rules.len() as u32;
        rules.truncate(config.max_rules);

        PatternReport {
            rules,
            total_rules,
            total_transactions: total,
        }
    }
}

/// One item set per calendar date, keyed for deterministic iteration
fn build_transactions(
    events: &[Event],
    config: &InsightConfig,
) -> BTreeMap<NaiveDate, Vec<RuleItem>> {
    let mut active_dates: BTreeSet<NaiveDate> = BTreeSet::new();
    let mut channel_counts: BTreeMap<NaiveDate, BTreeMap<String, u32>> = BTreeMap::new();
    let mut interval_counts: BTreeMap<NaiveDate, [u32; 4]> = BTreeMap::new();

    for event in events.iter().filter(|e| e.is_watch()) {
        let date = match event.local_date() {
            Some(date) => date,
            None => continue,
        };
        active_dates.insert(date);
        if let Some(channel) = &event.channel_clean {
            *channel_counts
                .entry(date)
                .or_default()
                .entry(channel.clone())
                .or_insert(0) += 1;
        }
        if let Some(interval) = event.hour_local.and_then(DayInterval::from_hour) {
            interval_counts.entry(date).or_default()
                [DayInterval::ALL.iter().position(|&i| i == interval).unwrap_or(0)] += 1;
        }
    }

    // Every active date is a transaction; one without channels still carries
    // its temporal items and dilutes supports
    let mut transactions = BTreeMap::new();
    for &date in &active_dates {
        let mut items = Vec::new();

        if let Some(counts) = channel_counts.get(&date) {
            let mut ranked: Vec<(&String, u32)> =
                counts.iter().map(|(name, &count)| (name, count)).collect();
            ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
            for (name, _) in ranked.into_iter().take(config.channels_per_transaction) {
                items.push(RuleItem {
                    dimension: DIM_CHANNEL.to_string(),
                    value: name.clone(),
                });
            }
        }

        let weekday = date.weekday().num_days_from_monday() as usize;
        items.push(RuleItem {
            dimension: DIM_DAY.to_string(),
            value: DAY_NAMES[weekday].to_string(),
        });

        if let Some(interval) = dominant_interval(interval_counts.get(&date)) {
            items.push(RuleItem {
                dimension: DIM_BUCKET.to_string(),
                value: interval.name().to_string(),
            });
        }

        transactions.insert(date, items);
    }
    transactions
}

/// Interval with the most watches on the date; ties resolve to the earliest
fn dominant_interval(counts: Option<&[u32; 4]>) -> Option<DayInterval> {
    let counts = counts?;
    let mut best: Option<(DayInterval, u32)> = None;
    for (i, &interval) in DayInterval::ALL.iter().enumerate() {
        if counts[i] == 0 {
            continue;
        }
        match best {
            Some((_, c)) if counts[i] <= c => {}
            _ => best = Some((interval, counts[i])),
        }
    }
    best.map(|(interval, _)| interval)
}

fn make_rule(
    antecedent: &RuleItem,
    consequent: &RuleItem,
    occ: u32,
    support: f64,
    item_counts: &BTreeMap<RuleItem, u32>,
    total: u32,
) -> PatternRule {
    let antecedent_count = item_counts.get(antecedent).copied().unwrap_or(0);
    let consequent_count = item_counts.get(consequent).copied().unwrap_or(0);

    let confidence = if antecedent_count > 0 {
        occ as f64 / antecedent_count as f64
    } else {
        0.0
    };
    let consequent_support = consequent_count as f64 / total as f64;
    let lift = if consequent_support > 0.0 {
        confidence / consequent_support
    } else {
        0.0
    };

    let rendered_text = render_rule(antecedent, consequent, confidence);

    PatternRule {
        antecedent: antecedent.clone(),
        consequent: consequent.clone(),
        support,
        confidence,
        lift,
        occurrences: occ,
        rendered_text,
    }
}

/// Natural-language sentence for one rule, variable terms wrapped in `**`
fn render_rule(antecedent: &RuleItem, consequent: &RuleItem, confidence: f64) -> String {
    let pct = (confidence * 100.0).round() as u32;
    match (antecedent.dimension.as_str(), consequent.dimension.as_str()) {
        (DIM_DAY, DIM_CHANNEL) => format!(
            "You watch **{}** on **{}s** ({}% of the time)",
            consequent.value, antecedent.value, pct
        ),
        (DIM_CHANNEL, DIM_DAY) => format!(
            "When you watch **{}**, it's usually a **{}** ({}% of the time)",
            antecedent.value, consequent.value, pct
        ),
        (DIM_BUCKET, DIM_CHANNEL) => format!(
            "**{}** is your **{}** go-to ({}%)",
            consequent.value, antecedent.value, pct
        ),
        _ => format!(
            "You save **{}** for the **{}** ({}% of the time)",
            antecedent.value, consequent.value, pct
        ),
    }
}

/// Lift desc, confidence desc, support desc, then item order for stable ties
fn rank_rules(a: &PatternRule, b: &PatternRule) -> Ordering {
    b.lift
        .partial_cmp(&a.lift)
        .unwrap_or(Ordering::Equal)
        .then_with(|| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| b.support.partial_cmp(&a.support).unwrap_or(Ordering::Equal))
        .then_with(|| a.antecedent.cmp(&b.antecedent))
        .then_with(|| a.consequent.cmp(&b.consequent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EventType;
    use pretty_assertions::assert_eq;

    fn watch(date: NaiveDate, hour: u32, channel: &str) -> Event {
        Event {
            event_type: EventType::Watch,
            engagement: None,
            timestamp_utc: None,
            timestamp_local: date.and_hms_opt(hour, 0, 0),
            hour_local: Some(hour),
            day_of_week: Some(date.weekday().num_days_from_monday()),
            month_local: Some(date.month()),
            channel: Some(channel.to_string()),
            channel_clean: Some(channel.to_string()),
            text: None,
            text_clean: None,
            topics: Vec::new(),
        }
    }

    fn june(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    #[test]
    fn test_saturday_channel_rule_tops_ranking() {
        // Channel on four Saturday evenings plus one Wednesday morning
        let mut events = Vec::new();
        for day in [1, 8, 15, 22] {
            events.push(watch(june(day), 20, "weekend cinema"));
        }
        events.push(watch(june(5), 9, "weekend cinema"));

        let report = PatternMiner::mine(&events, &InsightConfig::default());
        assert_eq!(report.total_transactions, 5);

        let top = &report.rules[0];
        assert_eq!(top.antecedent.dimension, "day_of_week");
        assert_eq!(top.antecedent.value, "Saturday");
        assert_eq!(top.consequent.value, "weekend cinema");
        assert!((top.confidence - 1.0).abs() < 1e-9);
        assert_eq!(top.occurrences, 4);
        assert!((top.support - 0.8).abs() < 1e-9);
        assert_eq!(
            top.rendered_text,
            "You watch **weekend cinema** on **Saturdays** (100% of the time)"
        );
    }

    #[test]
    fn test_occurrence_floor_filters_rare_pairs() {
        // Two Saturdays only: perfect confidence but below min occurrences
        let events = vec![
            watch(june(1), 20, "rare"),
            watch(june(8), 20, "rare"),
        ];
        let report = PatternMiner::mine(&events, &InsightConfig::default());

        assert_eq!(report.total_transactions, 2);
        assert!(report.rules.is_empty());
        assert_eq!(report.total_rules, 0);
    }

    #[test]
    fn test_confidence_filters_weak_direction() {
        // Channel on 4 Saturdays and 5 assorted weekdays: Saturday implies
        // the channel, but the channel implies Saturday only 4/9 of the time
        let mut events = Vec::new();
        for day in [1, 8, 15, 22] {
            events.push(watch(june(day), 20, "mixed"));
        }
        for day in [3, 4, 5, 6, 7] {
            events.push(watch(june(day), 20, "mixed"));
        }

        let report = PatternMiner::mine(&events, &InsightConfig::default());
        assert!(report.rules.iter().any(|r| {
            r.antecedent.value == "Saturday" && r.consequent.value == "mixed"
        }));
        assert!(!report.rules.iter().any(|r| {
            r.antecedent.value == "mixed" && r.consequent.value == "Saturday"
        }));
    }

    #[test]
    fn test_top_channels_per_transaction_capped() {
        // Four channels on one date, default cap of 3; "dd" has the fewest
        // watches and is dropped
        let mut events = Vec::new();
        for (channel, count) in [("aa", 3), ("bb", 2), ("cc", 2), ("dd", 1)] {
            for _ in 0..count {
                events.push(watch(june(1), 20, channel));
            }
        }
        let transactions = build_transactions(&events, &InsightConfig::default());

        let items = &transactions[&june(1)];
        let channels: Vec<&str> = items
            .iter()
            .filter(|i| i.dimension == "channel")
            .map(|i| i.value.as_str())
            .collect();
        assert_eq!(channels, vec!["aa", "bb", "cc"]);
    }

    #[test]
    fn test_dominant_interval_tie_resolves_earliest() {
        // One morning and one evening watch on the same date
        let events = vec![watch(june(3), 9, "ch"), watch(june(3), 20, "ch")];
        let transactions = build_transactions(&events, &InsightConfig::default());

        let bucket = transactions[&june(3)]
            .iter()
            .find(|i| i.dimension == "hour_bucket")
            .map(|i| i.value.clone());
        assert_eq!(bucket.as_deref(), Some("morning"));
    }

    #[test]
    fn test_max_rules_truncation() {
        // Saturday evenings produce four surviving rules with the default
        // thresholds; total_rules counts them before the cap
        let mut events = Vec::new();
        for day in [1, 8, 15, 22] {
            events.push(watch(june(day), 20, "weekend cinema"));
        }
        events.push(watch(june(5), 9, "weekend cinema"));

        let report = PatternMiner::mine(&events, &InsightConfig::default());
        assert!(report.rules.len() <= 4);
        assert!(report.total_rules >= report.rules.len() as u32);
    }

    #[test]
    fn test_channel_less_date_still_a_transaction() {
        // Four Saturday evenings with a channel, plus a Wednesday whose only
        // watch carries no channel: five transactions, and the Saturday rule's
        // support is diluted accordingly
        let mut events = Vec::new();
        for day in [1, 8, 15, 22] {
            events.push(watch(june(day), 20, "weekend cinema"));
        }
        let mut unattributed = watch(june(5), 9, "ignored");
        unattributed.channel_clean = None;
        events.push(unattributed);

        let report = PatternMiner::mine(&events, &InsightConfig::default());
        assert_eq!(report.total_transactions, 5);

        let rule = report
            .rules
            .iter()
            .find(|r| r.antecedent.value == "Saturday")
            .unwrap();
        assert!((rule.support - 0.8).abs() < 1e-9);

        let transactions = build_transactions(&events, &InsightConfig::default());
        let wednesday = &transactions[&june(5)];
        assert!(wednesday.iter().all(|i| i.dimension != "channel"));
        assert!(wednesday.iter().any(|i| i.value == "Wednesday"));
        assert!(wednesday.iter().any(|i| i.value == "morning"));
    }

    #[test]
    fn test_empty_input() {
        let report = PatternMiner::mine(&[], &InsightConfig::default());
        assert_eq!(report.total_transactions, 0);
        assert!(report.rules.is_empty());
    }
}
