//! Search analytics
//!
//! Counts search events by normalized query text and ranks the top terms.
//! Display text falls back to the normalized term when the export carried no
//! raw query.

use crate::config::InsightConfig;
use crate::types::{Event, EventType, SearchAnalytics, SearchTerm};
use std::collections::BTreeMap;

/// Ranks search terms by how often they were queried
pub struct SearchAnalyzer;

impl SearchAnalyzer {
    /// Aggregate search events into term counts.
    ///
    /// Search events without normalized text are skipped and counted but
    /// still included in `total_searches`. Ties rank by term ascending.
    pub fn analyze(events: &[Event], config: &InsightConfig) -> SearchAnalytics {
        let mut counts: BTreeMap<&str, u32> = BTreeMap::new();
        let mut display: BTreeMap<&str, &str> = BTreeMap::new();
        let mut total_searches = 0u32;
        let mut skipped = 0u32;

        for event in events
            .iter()
            .filter(|e| e.event_type == EventType::Search)
        {
            total_searches += 1;
            let term = match &event.text_clean {
                Some(term) => term.as_str(),
                None => {
                    skipped += 1;
                    continue;
                }
            };
            *counts.entry(term).or_insert(0) += 1;
            if let Some(raw) = &event.text {
                display.entry(term).or_insert(raw.as_str());
            }
        }

        let unique_terms = counts.len() as u32;

        let mut ranked: Vec<(&str, u32)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        let top_terms: Vec<SearchTerm> = ranked
            .into_iter()
            .take(config.top_search_terms)
            .map(|(term, count)| SearchTerm {
                term: display.get(term).copied().unwrap_or(term).to_string(),
                term_clean: term.to_string(),
                count,
            })
            .collect();

        SearchAnalytics {
            total_searches,
            unique_terms,
            top_terms,
            skipped,
        }
    }
}
