//! Export of classification results: bid-change CSV and negative keywords.

use std::collections::HashSet;

use adterm_core::{recommend_bid, BidRecommendation, ClassificationResult};

use crate::error::{AdTermError, Result};

pub const BID_CSV_HEADER: [&str; 5] = [
    "keyword",
    "current_conv_rate",
    "current_cost_per_conv",
    "recommended_bid_delta",
    "note",
];

/// Bid recommendations for the first `limit` converters, best first.
pub fn bid_recommendations(result: &ClassificationResult, limit: usize) -> Vec<BidRecommendation> {
    result
        .converters
        .iter()
        .take(limit)
        .filter_map(|row| {
            let competitor = result.competitors.iter().any(|c| c.term == row.term);
            recommend_bid(row, result.cost_per_conversion, competitor)
        })
        .collect()
}

/// Render the bid recommendations as CSV text, header included.
pub fn bid_recommendations_csv(result: &ClassificationResult, limit: usize) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(BID_CSV_HEADER)?;

    for rec in bid_recommendations(result, limit) {
        let conv_rate = format!("{:.2}%", rec.conv_rate);
        let cost_per_conv = rec
            .cost_per_conversion
            .map(|c| format!("{:.2}", c))
            .unwrap_or_else(|| "N/A".to_string());
        let delta = format!("{:+}%", rec.bid_delta_pct.round() as i64);
        writer.write_record([
            rec.term.as_str(),
            conv_rate.as_str(),
            cost_per_conv.as_str(),
            delta.as_str(),
            rec.note.as_str(),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| AdTermError::Io {
        path: "<bid csv>".into(),
        source: e.into_error(),
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Terms to add as negative keywords: wasted terms plus competitor terms
/// that never converted. Case-insensitive de-duplication, first-seen order.
pub fn negative_keywords(result: &ClassificationResult) -> Vec<String> {
    let mut seen = HashSet::new();
    result
        .wasted
        .iter()
        .chain(result.non_converting_competitors())
        .filter(|row| seen.insert(row.term.to_lowercase()))
        .map(|row| row.term.clone())
        .collect()
}

/// Newline-joined [`negative_keywords`].
pub fn negative_keyword_list(result: &ClassificationResult) -> String {
    negative_keywords(result).join("\n")
}
