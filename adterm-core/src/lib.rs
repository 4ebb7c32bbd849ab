pub mod bid;
pub mod classifier;
pub mod metrics;
pub mod row;
pub mod thresholds;
pub mod traffic;
pub mod vocabulary;

pub use bid::{recommend_bid, BidRecommendation};
pub use classifier::{classify, classify_term, detect_signals, ClassificationResult, TermClass, TermSignals};
pub use row::SearchTermRow;
pub use traffic::{entry_exit_pages, summarize_by_source, EventKind, PageFlow, SourceSummary, TrafficEvent};
pub use vocabulary::{Vocabularies, Vocabulary};
