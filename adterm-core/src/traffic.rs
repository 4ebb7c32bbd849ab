//! Site-traffic aggregation by attribution source.
//!
//! Groups page views and conversions by `utm_source`, computes per-source
//! conversion rates, and approximates entry and exit pages from the first and
//! last page view of each session.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::metrics::percent;

/// Label used for events without a `utm_source`.
pub const DIRECT_SOURCE: &str = "(direct)";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    PageView,
    Conversion,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::PageView => write!(f, "page_view"),
            EventKind::Conversion => write!(f, "conversion"),
        }
    }
}

/// A single tracked visit event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrafficEvent {
    pub session_id: String,
    pub kind: EventKind,
    pub path: String,
    pub utm_source: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

impl TrafficEvent {
    /// The attribution source, or [`DIRECT_SOURCE`] when blank or missing.
    pub fn source(&self) -> &str {
        match self.utm_source.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s,
            _ => DIRECT_SOURCE,
        }
    }
}

/// Per-source totals.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SourceSummary {
    pub source: String,
    pub page_views: u64,
    pub sessions: u64,
    /// Distinct sessions with at least one conversion event.
    pub conversions: u64,
    /// `conversions / sessions * 100`, `0.0` without sessions.
    pub conversion_rate: f64,
}

/// Per-path entry/exit counts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageFlow {
    pub path: String,
    pub views: u64,
    pub entries: u64,
    pub exits: u64,
}

#[derive(Default)]
struct SourceAcc<'a> {
    page_views: u64,
    sessions: BTreeSet<&'a str>,
    converted: BTreeSet<&'a str>,
}

/// Summarize events by attribution source, busiest source first.
pub fn summarize_by_source(events: &[TrafficEvent]) -> Vec<SourceSummary> {
    let mut by_source: BTreeMap<&str, SourceAcc<'_>> = BTreeMap::new();

    for event in events {
        let acc = by_source.entry(event.source()).or_default();
        acc.sessions.insert(event.session_id.as_str());
        match event.kind {
            EventKind::PageView => acc.page_views += 1,
            EventKind::Conversion => {
                acc.converted.insert(event.session_id.as_str());
            }
        }
    }

    let mut summaries: Vec<SourceSummary> = by_source
        .into_iter()
        .map(|(source, acc)| {
            let sessions = acc.sessions.len() as u64;
            let conversions = acc.converted.len() as u64;
            SourceSummary {
                source: source.to_string(),
                page_views: acc.page_views,
                sessions,
                conversions,
                conversion_rate: percent(conversions as f64, sessions as f64),
            }
        })
        .collect();

    // BTreeMap iteration already orders by source; the stable sort keeps
    // that as the tie-break.
    summaries.sort_by(|a, b| b.sessions.cmp(&a.sessions));
    summaries
}

/// Approximate entry and exit pages from page-view order within sessions.
///
/// Events at the same instant keep their input order. Sessions without page
/// views contribute nothing.
pub fn entry_exit_pages(events: &[TrafficEvent]) -> Vec<PageFlow> {
    let mut sessions: HashMap<&str, Vec<&TrafficEvent>> = HashMap::new();
    let mut flows: BTreeMap<&str, PageFlow> = BTreeMap::new();

    for event in events.iter().filter(|e| e.kind == EventKind::PageView) {
        sessions.entry(event.session_id.as_str()).or_default().push(event);
        flow_for(&mut flows, &event.path).views += 1;
    }

    for views in sessions.values_mut() {
        views.sort_by_key(|e| e.occurred_at);
        let (Some(&first), Some(&last)) = (views.first(), views.last()) else {
            continue;
        };
        flow_for(&mut flows, &first.path).entries += 1;
        flow_for(&mut flows, &last.path).exits += 1;
    }

    let mut result: Vec<PageFlow> = flows.into_values().collect();
    result.sort_by(|a, b| b.views.cmp(&a.views));
    result
}

fn flow_for<'a, 'm>(flows: &'m mut BTreeMap<&'a str, PageFlow>, path: &'a str) -> &'m mut PageFlow {
    flows.entry(path).or_insert_with(|| PageFlow {
        path: path.to_string(),
        views: 0,
        entries: 0,
        exits: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ev(session: &str, kind: EventKind, path: &str, source: Option<&str>, minute: u32) -> TrafficEvent {
        TrafficEvent {
            session_id: session.to_string(),
            kind,
            path: path.to_string(),
            utm_source: source.map(String::from),
            occurred_at: Utc.with_ymd_and_hms(2025, 3, 1, 10, minute, 0).unwrap(),
        }
    }

    fn sample() -> Vec<TrafficEvent> {
        use EventKind::*;
        vec![
            ev("s1", PageView, "/", Some("google"), 0),
            ev("s1", PageView, "/windshield-replacement", Some("google"), 2),
            ev("s1", Conversion, "/book", Some("google"), 5),
            ev("s2", PageView, "/locations/austin", Some("google"), 1),
            ev("s3", PageView, "/", None, 3),
            ev("s3", PageView, "/book", Some(""), 4),
            ev("s4", PageView, "/", Some("facebook"), 6),
        ]
    }

    #[test]
    fn groups_by_source_with_direct_fallback() {
        let summaries = summarize_by_source(&sample());
        assert_eq!(summaries.len(), 3);

        let google = &summaries[0];
        assert_eq!(google.source, "google");
        assert_eq!(google.sessions, 2);
        assert_eq!(google.page_views, 3);
        assert_eq!(google.conversions, 1);
        assert!((google.conversion_rate - 50.0).abs() < 1e-9);

        let direct = summaries.iter().find(|s| s.source == DIRECT_SOURCE).unwrap();
        assert_eq!(direct.sessions, 1);
        assert_eq!(direct.page_views, 2);
        assert_eq!(direct.conversion_rate, 0.0);
    }

    #[test]
    fn ties_on_sessions_order_by_source_name() {
        let summaries = summarize_by_source(&sample());
        let names: Vec<&str> = summaries.iter().map(|s| s.source.as_str()).collect();
        assert_eq!(names, vec!["google", DIRECT_SOURCE, "facebook"]);
    }

    #[test]
    fn entry_and_exit_pages() {
        let flows = entry_exit_pages(&sample());
        let home = flows.iter().find(|f| f.path == "/").unwrap();
        assert_eq!(home.views, 3);
        assert_eq!(home.entries, 3); // s1, s3, s4
        assert_eq!(home.exits, 1); // s4

        let book = flows.iter().find(|f| f.path == "/book").unwrap();
        assert_eq!(book.views, 1);
        assert_eq!(book.entries, 0);
        assert_eq!(book.exits, 1); // s3; the s1 conversion is not a page view

        let austin = flows.iter().find(|f| f.path == "/locations/austin").unwrap();
        assert_eq!((austin.entries, austin.exits), (1, 1));
        assert_eq!(flows[0].path, "/");
    }

    #[test]
    fn empty_input() {
        assert!(summarize_by_source(&[]).is_empty());
        assert!(entry_exit_pages(&[]).is_empty());
    }
}
