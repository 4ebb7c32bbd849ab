//! Bid-change rules for converting search terms.

use serde::Serialize;

use crate::row::SearchTermRow;
use crate::thresholds::*;

/// A recommended bid change for one converting term.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BidRecommendation {
    pub term: String,
    /// Current conversion rate in percent.
    pub conv_rate: f64,
    /// Current cost per conversion, `None` when not applicable.
    pub cost_per_conversion: Option<f64>,
    /// Recommended change in percent (positive = raise).
    pub bid_delta_pct: f64,
    pub note: String,
}

/// Recommend a bid change for a converting row.
///
/// `account_cpa` is the account-wide cost per conversion; `0.0` disables the
/// efficiency cap. `competitor` marks a rival-brand term that converts.
/// Returns `None` for rows without conversions.
pub fn recommend_bid(
    row: &SearchTermRow,
    account_cpa: f64,
    competitor: bool,
) -> Option<BidRecommendation> {
    if !row.has_conversions() {
        return None;
    }

    let conv_rate = row.conv_rate();
    let cpa = row.cost_per_conversion();

    let (mut delta, mut note) = if conv_rate >= STRONG_CONV_RATE_PCT {
        (STRONG_BID_DELTA_PCT, format!("strong converter at {:.1}%", conv_rate))
    } else if conv_rate >= SOLID_CONV_RATE_PCT {
        (SOLID_BID_DELTA_PCT, format!("solid converter at {:.1}%", conv_rate))
    } else {
        (BASE_BID_DELTA_PCT, format!("converting at {:.1}%", conv_rate))
    };

    if let Some(cpa) = cpa {
        if account_cpa > 0.0 && cpa > account_cpa * CPA_CEILING_FACTOR {
            delta = delta.min(CAPPED_BID_DELTA_PCT);
            note.push_str(&format!(
                "; efficiency below account average (cost per conversion {:.2} vs {:.2})",
                cpa, account_cpa
            ));
        }
    }

    if competitor {
        note.push_str("; competitor term converting; keep");
    }

    Some(BidRecommendation {
        term: row.term.clone(),
        conv_rate,
        cost_per_conversion: cpa,
        bid_delta_pct: delta,
        note,
    })
}
