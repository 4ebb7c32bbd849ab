//! Centralized thresholds for bid recommendations and pipeline defaults.
//!
//! Tuned for a single-market local service advertiser. Changing a value here
//! affects both the exported bid sheet and the ranked recommendations.

/// Conversion rate (percent) at or above which a term is a strong converter.
pub const STRONG_CONV_RATE_PCT: f64 = 20.0;

/// Conversion rate (percent) at or above which a term is a solid converter.
pub const SOLID_CONV_RATE_PCT: f64 = 10.0;

/// Bid increase for strong converters, in percent.
pub const STRONG_BID_DELTA_PCT: f64 = 25.0;

/// Bid increase for solid converters, in percent.
pub const SOLID_BID_DELTA_PCT: f64 = 15.0;

/// Bid increase for any other converting term, in percent.
pub const BASE_BID_DELTA_PCT: f64 = 10.0;

/// A term whose cost per conversion exceeds the account average by more than
/// this factor has its increase capped.
pub const CPA_CEILING_FACTOR: f64 = 1.5;

/// The capped increase, in percent.
pub const CAPPED_BID_DELTA_PCT: f64 = 5.0;

/// Default number of recommendations shown in a digest.
pub const DEFAULT_TOP: usize = 10;

/// Default minimum impressions for a non-converting term to be recommended on.
pub const DEFAULT_MIN_IMPRESSIONS: u64 = 10;
