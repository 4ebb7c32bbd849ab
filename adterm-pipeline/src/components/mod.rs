pub mod kind_diversity_scorer;
pub mod kind_filter;
pub mod low_volume_filter;
pub mod period_query_hydrator;
pub mod recommendation_note_hydrator;
pub mod report_log_side_effect;
pub mod search_term_source;
pub mod spend_impact_scorer;
pub mod spend_share_hydrator;
pub mod top_k_selector;
