//! CSV search-terms report loader.
//!
//! Parses the advertising platform's search-terms export into
//! `SearchTermRecord` structs. Column names are matched loosely:
//!   term        <- "Search term", "search_term", "term", "query"
//!   impressions <- "Impr.", "Impressions"
//!   clicks      <- "Clicks"
//!   cost        <- "Cost"
//!   conversions <- "Conversions", "Conv."
//!   campaign    <- "Campaign" (optional)
//!
//! Title/date lines above the header row are skipped, as are the platform's
//! "Total: ..." summary rows at the bottom.

use std::collections::HashMap;
use std::io::Read;

use serde::Deserialize;

use adterm_core::SearchTermRow;

use crate::error::{AdTermError, Result};

/// Campaign label used when the report has no campaign column.
pub const NO_CAMPAIGN: &str = "(none)";

/// One validated line of the report, campaign included.
/// The classifier works on `SearchTermRow`, which has no campaign.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchTermRecord {
    pub campaign: Option<String>,
    pub term: String,
    pub impressions: u64,
    pub clicks: u64,
    pub cost: f64,
    pub conversions: u64,
}

impl SearchTermRecord {
    /// Convert to a classifier row (drops campaign).
    pub fn to_search_term_row(&self) -> SearchTermRow {
        SearchTermRow {
            term: self.term.clone(),
            impressions: self.impressions,
            clicks: self.clicks,
            cost: self.cost,
            conversions: self.conversions,
        }
    }
}

/// Raw cells under canonical header names, validated afterwards so errors can
/// name the column and line.
#[derive(Debug, Deserialize)]
struct RawRecord {
    term: String,
    impressions: String,
    clicks: String,
    cost: String,
    conversions: String,
    #[serde(default)]
    campaign: Option<String>,
}

const REQUIRED_COLUMNS: [&str; 5] = ["term", "impressions", "clicks", "cost", "conversions"];

/// Load search-term records from a CSV reader.
pub fn load_search_terms<R: Read>(mut reader: R) -> Result<Vec<SearchTermRecord>> {
    let mut text = String::new();
    reader.read_to_string(&mut text).map_err(|e| AdTermError::Io {
        path: "<input>".into(),
        source: e,
    })?;

    let skipped_lines = preamble_len(&text);
    let body: String = text
        .lines()
        .skip(skipped_lines)
        .collect::<Vec<_>>()
        .join("\n");
    let offset = skipped_lines as u64;

    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let headers = csv_reader
        .headers()
        .map_err(|e| AdTermError::Csv {
            line: offset + 1,
            source: e,
        })?
        .clone();
    let canonical: csv::StringRecord = headers.iter().map(canonical_header).collect();
    for required in REQUIRED_COLUMNS {
        if !canonical.iter().any(|h| h == required) {
            return Err(AdTermError::MissingColumn(required));
        }
    }
    let term_idx = canonical
        .iter()
        .position(|h| h == "term")
        .ok_or(AdTermError::MissingColumn("term"))?;

    let mut records = Vec::new();
    let mut summary_rows = 0usize;
    for result in csv_reader.records() {
        let record = result.map_err(|e| AdTermError::Csv {
            line: offset + e.position().map(|p| p.line()).unwrap_or(0),
            source: e,
        })?;
        let line = offset + record.position().map(|p| p.line()).unwrap_or(0);

        if record.iter().all(|cell| cell.is_empty()) {
            continue;
        }

        let term = record.get(term_idx).unwrap_or("").trim();
        if term.is_empty() || is_summary_row(term) {
            summary_rows += 1;
            continue;
        }

        let raw: RawRecord = record
            .deserialize(Some(&canonical))
            .map_err(|e| AdTermError::Csv { line, source: e })?;

        records.push(SearchTermRecord {
            campaign: raw
                .campaign
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            term: raw.term.trim().to_string(),
            impressions: parse_count(&raw.impressions, "impressions", line)?,
            clicks: parse_count(&raw.clicks, "clicks", line)?,
            cost: parse_money(&raw.cost, "cost", line)?,
            conversions: parse_count(&raw.conversions, "conversions", line)?,
        });
    }

    log::debug!(
        "loaded {} search terms ({} preamble lines, {} summary/blank rows skipped)",
        records.len(),
        skipped_lines,
        summary_rows
    );
    Ok(records)
}

/// Load search-term records from a CSV file path.
pub fn load_search_terms_file(path: &str) -> Result<Vec<SearchTermRecord>> {
    let file = std::fs::File::open(path).map_err(|e| AdTermError::Io {
        path: path.to_string(),
        source: e,
    })?;
    load_search_terms(file)
}

/// Merge records that share a term (case- and whitespace-insensitive) by
/// summing their metrics. First-seen order and spelling are kept.
///
/// The same query often appears once per ad group or campaign; the
/// classifier expects one row per distinct term.
pub fn consolidate_terms(records: &[SearchTermRecord]) -> Vec<SearchTermRow> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut rows: Vec<SearchTermRow> = Vec::new();

    for record in records {
        let key = record
            .term
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        match index.get(&key) {
            Some(&i) => {
                let row = &mut rows[i];
                row.impressions = row.impressions.saturating_add(record.impressions);
                row.clicks = row.clicks.saturating_add(record.clicks);
                row.cost += record.cost;
                row.conversions = row.conversions.saturating_add(record.conversions);
            }
            None => {
                index.insert(key, rows.len());
                rows.push(record.to_search_term_row());
            }
        }
    }

    rows
}

/// Group records by campaign, sorted by campaign name.
pub fn group_by_campaign(records: &[SearchTermRecord]) -> Vec<(String, Vec<SearchTermRecord>)> {
    let mut groups: HashMap<String, Vec<SearchTermRecord>> = HashMap::new();
    for record in records {
        let campaign = record
            .campaign
            .clone()
            .unwrap_or_else(|| NO_CAMPAIGN.to_string());
        groups.entry(campaign).or_default().push(record.clone());
    }
    let mut result: Vec<_> = groups.into_iter().collect();
    result.sort_by(|a, b| a.0.cmp(&b.0));
    result
}

/// Map a report header to the loader's field name.
fn canonical_header(header: &str) -> String {
    let h = header
        .trim()
        .trim_matches('"')
        .trim_end_matches('.')
        .to_lowercase()
        .replace(' ', "_");
    match h.as_str() {
        "search_term" | "term" | "search_query" | "query" => "term".into(),
        "impr" | "impressions" => "impressions".into(),
        "clicks" => "clicks".into(),
        "cost" => "cost".into(),
        "conversions" | "conv" => "conversions".into(),
        "campaign" => "campaign".into(),
        _ => h,
    }
}

/// Number of lines before the header row (the first line with a term
/// column). Zero when no such line exists, so the missing-column check
/// reports the problem.
fn preamble_len(text: &str) -> usize {
    text.lines()
        .position(|line| line.split(',').any(|cell| canonical_header(cell) == "term"))
        .unwrap_or(0)
}

fn is_summary_row(term: &str) -> bool {
    term.to_lowercase().starts_with("total:")
}

fn clean_numeric(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '$' | '€' | '£' | ' '))
        .collect()
}

/// Whole, non-negative count. `""` and `"--"` read as zero; `"12.00"` is 12.
/// Exponents, non-zero fractions and values past `u64::MAX` are rejected.
fn parse_count(raw: &str, column: &'static str, line: u64) -> Result<u64> {
    let cleaned = clean_numeric(raw);
    if cleaned.is_empty() || cleaned == "--" {
        return Ok(0);
    }
    let invalid = || AdTermError::InvalidNumber {
        line,
        column,
        value: raw.to_string(),
    };
    let whole = match cleaned.split_once('.') {
        Some((whole, fraction)) if fraction.chars().all(|c| c == '0') => whole,
        Some(_) => return Err(invalid()),
        None => cleaned.as_str(),
    };
    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    whole.parse::<u64>().map_err(|_| invalid())
}

/// Finite, non-negative amount; currency symbols and separators are ignored.
fn parse_money(raw: &str, column: &'static str, line: u64) -> Result<f64> {
    let cleaned = clean_numeric(raw);
    if cleaned.is_empty() || cleaned == "--" {
        return Ok(0.0);
    }
    let invalid = || AdTermError::InvalidNumber {
        line,
        column,
        value: raw.to_string(),
    };
    let value: f64 = cleaned.parse().map_err(|_| invalid())?;
    if !value.is_finite() || value < 0.0 {
        return Err(invalid());
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CSV: &str = "\
term,impressions,clicks,cost,conversions
rival brand x,50,0,0,0
windshield repair near me,80,0,0,0
windshield replacement,120,30,450.00,6
";

    const PLATFORM_EXPORT: &str = "\
Search terms report
\"March 1, 2025 - March 31, 2025\"
Search term,Match type,Campaign,Impr.,Clicks,Cost,Conversions
windshield replacement austin,Phrase match,Austin - Replacement,\"1,204\",88,\"$1,012.40\",9.00
safelite near me,Broad match,Austin - Brand Conquest,310,0,$0.00,0.00
rock chip repair,Exact match,Austin - Repair,96,7,$41.30,--
Total: Account,,,\"1,610\",95,\"$1,053.70\",9.00
Total: Search,,,\"1,610\",95,\"$1,053.70\",9.00
";

    #[test]
    fn load_sample_csv() {
        let records = load_search_terms(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].term, "rival brand x");
        assert_eq!(records[2].impressions, 120);
        assert_eq!(records[2].clicks, 30);
        assert!((records[2].cost - 450.0).abs() < 0.01);
        assert_eq!(records[2].conversions, 6);
        assert!(records[0].campaign.is_none());
    }

    #[test]
    fn platform_export_with_preamble_and_totals() {
        let records = load_search_terms(PLATFORM_EXPORT.as_bytes()).unwrap();
        assert_eq!(records.len(), 3, "summary rows must be skipped");

        let first = &records[0];
        assert_eq!(first.term, "windshield replacement austin");
        assert_eq!(first.campaign.as_deref(), Some("Austin - Replacement"));
        assert_eq!(first.impressions, 1204);
        assert!((first.cost - 1012.40).abs() < 0.001);
        assert_eq!(first.conversions, 9);

        assert_eq!(records[2].conversions, 0, "'--' reads as zero");
    }

    #[test]
    fn missing_column_is_reported() {
        let csv_data = "term,impressions,clicks,cost\nx,1,0,0\n";
        let err = load_search_terms(csv_data.as_bytes()).unwrap_err();
        assert!(matches!(err, AdTermError::MissingColumn("conversions")));
    }

    #[test]
    fn invalid_number_reports_line_and_column() {
        let csv_data = "\
term,impressions,clicks,cost,conversions
ok,10,1,2.50,0
bad,ten,1,2.50,0
";
        let err = load_search_terms(csv_data.as_bytes()).unwrap_err();
        match err {
            AdTermError::InvalidNumber { line, column, value } => {
                assert_eq!(line, 3);
                assert_eq!(column, "impressions");
                assert_eq!(value, "ten");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn line_numbers_account_for_preamble() {
        let csv_data = "\
Search terms report
All time
Search term,Impr.,Clicks,Cost,Conversions
chip repair,10,-1,0,0
";
        match load_search_terms(csv_data.as_bytes()).unwrap_err() {
            AdTermError::InvalidNumber { line, column, .. } => {
                assert_eq!(line, 4);
                assert_eq!(column, "clicks");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn fractional_counts_are_rejected() {
        let csv_data = "term,impressions,clicks,cost,conversions\nx,10,2,1,1.5\n";
        let err = load_search_terms(csv_data.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            AdTermError::InvalidNumber { column: "conversions", .. }
        ));
    }

    #[test]
    fn exponent_counts_are_rejected() {
        let csv_data = "term,impressions,clicks,cost,conversions\nx,1e3,2,1,0\n";
        match load_search_terms(csv_data.as_bytes()).unwrap_err() {
            AdTermError::InvalidNumber { line, column, value } => {
                assert_eq!(line, 2);
                assert_eq!(column, "impressions");
                assert_eq!(value, "1e3");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn large_counts_keep_full_precision() {
        let csv_data = "term,impressions,clicks,cost,conversions\nx,9007199254740993,0,0,0\n";
        let records = load_search_terms(csv_data.as_bytes()).unwrap();
        assert_eq!(records[0].impressions, 9_007_199_254_740_993);
    }

    #[test]
    fn out_of_range_count_is_rejected() {
        let csv_data = "term,impressions,clicks,cost,conversions\nx,18446744073709551616,0,0,0\n";
        assert!(matches!(
            load_search_terms(csv_data.as_bytes()).unwrap_err(),
            AdTermError::InvalidNumber { column: "impressions", .. }
        ));
    }

    #[test]
    fn consolidation_saturates_instead_of_overflowing() {
        let csv_data = format!(
            "term,impressions,clicks,cost,conversions\nx,{max},0,0,0\nX,{max},0,0,0\n",
            max = u64::MAX
        );
        let records = load_search_terms(csv_data.as_bytes()).unwrap();
        let rows = consolidate_terms(&records);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].impressions, u64::MAX);
    }

    #[test]
    fn negative_cost_is_rejected() {
        let csv_data = "term,impressions,clicks,cost,conversions\nx,10,2,-4,0\n";
        assert!(load_search_terms(csv_data.as_bytes()).is_err());
    }

    #[test]
    fn consolidate_sums_duplicate_terms() {
        let csv_data = "\
term,campaign,impressions,clicks,cost,conversions
Windshield Replacement,A,100,10,50,1
near me glass,A,20,0,0,0
windshield  replacement,B,50,5,25,1
";
        let records = load_search_terms(csv_data.as_bytes()).unwrap();
        let rows = consolidate_terms(&records);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].term, "Windshield Replacement");
        assert_eq!(rows[0].impressions, 150);
        assert_eq!(rows[0].clicks, 15);
        assert!((rows[0].cost - 75.0).abs() < 1e-9);
        assert_eq!(rows[0].conversions, 2);
        assert_eq!(rows[1].term, "near me glass");
    }

    #[test]
    fn group_records_by_campaign() {
        let records = load_search_terms(PLATFORM_EXPORT.as_bytes()).unwrap();
        let groups = group_by_campaign(&records);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].0, "Austin - Brand Conquest");

        let plain = load_search_terms(SAMPLE_CSV.as_bytes()).unwrap();
        let groups = group_by_campaign(&plain);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].0, NO_CAMPAIGN);
        assert_eq!(groups[0].1.len(), 3);
    }
}
