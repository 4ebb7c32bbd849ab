//! JSON contracts and human-readable rendering for the CLI.

use chrono::Utc;
use serde::Serialize;

use adterm_core::{ClassificationResult, PageFlow, SourceSummary};
use adterm_pipeline::candidate_pipeline::PipelineResult;
use adterm_pipeline::types::{Recommendation, ReportPeriod, ReportQuery};

// ---------------------------------------------------------------------------
// JSON output contract
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct DigestJson<'a> {
    generated_at: String,
    request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    period: Option<ReportPeriod>,
    pipeline_ms: u128,
    classification: &'a ClassificationResult,
    recommendations: Vec<RecommendationJson>,
    summary: SummaryJson,
}

#[derive(Serialize)]
struct RecommendationJson {
    id: String,
    kind: String,
    term: String,
    impressions: u64,
    clicks: u64,
    cost: f64,
    conversions: u64,
    conv_rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    cost_per_conversion: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bid_delta_pct: Option<f64>,
    competitor: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    matched_phrase: Option<String>,
    share_of_spend: f64,
    priority_score: f64,
    note: String,
}

#[derive(Serialize)]
struct SummaryJson {
    terms_processed: usize,
    recommendations_detected: usize,
    recommendations_filtered_out: usize,
    recommendations_selected: usize,
    wasted_impressions: u64,
    negative_keywords: usize,
}

#[derive(Serialize)]
pub struct TrafficJson<'a> {
    sources: &'a [SourceSummary],
    pages: &'a [PageFlow],
}

pub fn build_digest_json<'a>(
    result: &PipelineResult<ReportQuery, Recommendation>,
    classification: &'a ClassificationResult,
    terms_processed: usize,
    negative_keywords: usize,
    pipeline_ms: u128,
) -> DigestJson<'a> {
    DigestJson {
        generated_at: Utc::now().to_rfc3339(),
        request_id: result.query.request_id.clone(),
        period: result.query.period.clone(),
        pipeline_ms,
        classification,
        recommendations: result
            .selected_candidates
            .iter()
            .map(|c| RecommendationJson {
                id: c.id.clone(),
                kind: format!("{:?}", c.kind),
                term: c.term.clone(),
                impressions: c.impressions,
                clicks: c.clicks,
                cost: c.cost,
                conversions: c.conversions,
                conv_rate: c.conv_rate,
                cost_per_conversion: c.cost_per_conversion,
                bid_delta_pct: c.bid_delta_pct,
                competitor: c.competitor,
                matched_phrase: c.matched_phrase.clone(),
                share_of_spend: c.share_of_spend.unwrap_or(0.0),
                priority_score: c.priority_score.unwrap_or(0.0),
                note: c.note.clone().unwrap_or_default(),
            })
            .collect(),
        summary: SummaryJson {
            terms_processed,
            recommendations_detected: result.retrieved_candidates.len(),
            recommendations_filtered_out: result.filtered_candidates.len(),
            recommendations_selected: result.selected_candidates.len(),
            wasted_impressions: classification.wasted.iter().map(|r| r.impressions).sum(),
            negative_keywords,
        },
    }
}

pub fn build_traffic_json<'a>(sources: &'a [SourceSummary], pages: &'a [PageFlow]) -> TrafficJson<'a> {
    TrafficJson { sources, pages }
}

// ---------------------------------------------------------------------------
// Human-readable output
// ---------------------------------------------------------------------------

/// Format a number with comma thousands separators.
pub fn format_thousands(amount: f64) -> String {
    let whole = amount.abs().round() as u64;
    let sign = if amount < 0.0 && whole > 0 { "-" } else { "" };
    let s = whole.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    format!("{}{}", sign, result.chars().rev().collect::<String>())
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
        out.push('\u{2026}');
        out
    }
}

pub fn print_digest(
    result: &PipelineResult<ReportQuery, Recommendation>,
    classification: &ClassificationResult,
    terms_processed: usize,
    load_ms: u128,
    pipeline_ms: u128,
) {
    let rule = "\u{2550}".repeat(62);
    println!();
    println!("  \u{2554}{}\u{2557}", rule);
    println!("  \u{2551}{:^62}\u{2551}", "ADTERM \u{00b7} Search-Term Optimization Digest");
    println!("  \u{255a}{}\u{255d}", rule);
    println!();

    if let Some(period) = &result.query.period {
        println!("  Period {} to {}", period.start, period.end);
    }
    println!(
        "  {} terms  \u{00b7}  {} impressions  \u{00b7}  {} clicks  \u{00b7}  ${} spend",
        terms_processed,
        format_thousands(classification.total_impressions as f64),
        format_thousands(classification.total_clicks as f64),
        format_thousands(classification.total_cost)
    );
    println!(
        "  {} conversions  \u{00b7}  ${:.2} per conversion",
        classification.total_conversions, classification.cost_per_conversion
    );
    println!(
        "  {} converters  \u{00b7}  {} wasted  \u{00b7}  {} competitors  \u{00b7}  {} high intent",
        classification.converters.len(),
        classification.wasted.len(),
        classification.competitors.len(),
        classification.high_intent.len()
    );
    println!(
        "  {} recommendations ({} filtered out)  \u{00b7}  Top {} selected",
        result.retrieved_candidates.len(),
        result.filtered_candidates.len(),
        result.selected_candidates.len()
    );
    println!();

    if result.selected_candidates.is_empty() {
        println!("  Nothing to act on in this report.");
    } else {
        println!("  {:\u{2500}<64}", "");
        for (i, c) in result.selected_candidates.iter().enumerate() {
            let delta = c
                .bid_delta_pct
                .map(|d| format!("{:+.0}%", d))
                .unwrap_or_default();
            println!(
                "  {:>2}. {:18} {:30} {:>6}  score {:.1}",
                i + 1,
                c.kind.to_string(),
                truncate(&c.term, 30),
                delta,
                c.priority_score.unwrap_or(0.0)
            );
            println!(
                "      {} impr \u{00b7} {} clicks \u{00b7} ${:.2} \u{00b7} {} conv ({:.1}%)",
                c.impressions, c.clicks, c.cost, c.conversions, c.conv_rate
            );
            if let Some(note) = &c.note {
                println!("      {}", note);
            }
            println!();
        }
        println!("  {:\u{2500}<64}", "");
    }

    println!();
    println!(
        "  CSV loaded in {}ms \u{00b7} Pipeline ran in {}ms",
        load_ms, pipeline_ms
    );
    println!();
}

pub fn print_traffic(sources: &[SourceSummary], pages: &[PageFlow]) {
    println!();
    println!("  {:24} {:>10} {:>9} {:>11} {:>8}", "SOURCE", "PAGEVIEWS", "SESSIONS", "CONVERSIONS", "RATE");
    println!("  {:\u{2500}<66}", "");
    for s in sources {
        println!(
            "  {:24} {:>10} {:>9} {:>11} {:>7.1}%",
            truncate(&s.source, 24),
            s.page_views,
            s.sessions,
            s.conversions,
            s.conversion_rate
        );
    }
    println!();
    println!("  {:36} {:>8} {:>8} {:>8}", "PAGE", "VIEWS", "ENTRIES", "EXITS");
    println!("  {:\u{2500}<66}", "");
    for p in pages {
        println!(
            "  {:36} {:>8} {:>8} {:>8}",
            truncate(&p.path, 36),
            p.views,
            p.entries,
            p.exits
        );
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_separators() {
        assert_eq!(format_thousands(0.0), "0");
        assert_eq!(format_thousands(999.4), "999");
        assert_eq!(format_thousands(1_125.7), "1,126");
        assert_eq!(format_thousands(2_249_000.0), "2,249,000");
    }

    #[test]
    fn long_terms_are_cut() {
        assert_eq!(truncate("near me", 10), "near me");
        assert_eq!(truncate("windshield replacement austin", 10), "windshiel\u{2026}");
    }
}
