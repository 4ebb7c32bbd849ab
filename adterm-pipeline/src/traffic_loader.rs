//! CSV loader for site-traffic events.
//!
//! Expected columns: `session_id,kind,path,utm_source,occurred_at`, with
//! `kind` one of `page_view`/`conversion` and `occurred_at` in RFC 3339.
//! An empty `utm_source` means direct traffic.

use std::io::Read;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use adterm_core::{EventKind, TrafficEvent};

use crate::error::{AdTermError, Result};

#[derive(Debug, Deserialize)]
struct RawEvent {
    session_id: String,
    kind: String,
    path: String,
    #[serde(default)]
    utm_source: Option<String>,
    occurred_at: String,
}

const REQUIRED_COLUMNS: [&str; 4] = ["session_id", "kind", "path", "occurred_at"];

/// Load traffic events from a CSV reader.
pub fn load_traffic_events<R: Read>(reader: R) -> Result<Vec<TrafficEvent>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| AdTermError::Csv { line: 1, source: e })?
        .clone();
    for required in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h.eq_ignore_ascii_case(required)) {
            return Err(AdTermError::MissingColumn(required));
        }
    }
    let headers: csv::StringRecord = headers.iter().map(|h| h.to_ascii_lowercase()).collect();

    let mut events = Vec::new();
    for result in csv_reader.records() {
        let record = result.map_err(|e| AdTermError::Csv {
            line: e.position().map(|p| p.line()).unwrap_or(0),
            source: e,
        })?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        if record.iter().all(|cell| cell.is_empty()) {
            continue;
        }

        let raw: RawEvent = record
            .deserialize(Some(&headers))
            .map_err(|e| AdTermError::Csv { line, source: e })?;

        let kind = match raw.kind.to_ascii_lowercase().as_str() {
            "page_view" | "pageview" | "view" => EventKind::PageView,
            "conversion" | "convert" => EventKind::Conversion,
            _ => {
                return Err(AdTermError::UnknownEventKind {
                    line,
                    value: raw.kind,
                })
            }
        };

        let occurred_at = DateTime::parse_from_rfc3339(&raw.occurred_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| AdTermError::InvalidTimestamp {
                line,
                value: raw.occurred_at.clone(),
            })?;

        events.push(TrafficEvent {
            session_id: raw.session_id,
            kind,
            path: raw.path,
            utm_source: raw.utm_source.filter(|s| !s.is_empty()),
            occurred_at,
        });
    }

    log::debug!("loaded {} traffic events", events.len());
    Ok(events)
}

/// Load traffic events from a CSV file path.
pub fn load_traffic_events_file(path: &str) -> Result<Vec<TrafficEvent>> {
    let file = std::fs::File::open(path).map_err(|e| AdTermError::Io {
        path: path.to_string(),
        source: e,
    })?;
    load_traffic_events(file)
}
