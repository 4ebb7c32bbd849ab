/// Last path segment of a type name, used as a component's log name.
///
/// `"adterm_pipeline::components::top_k_selector::TopKSelector"` becomes
/// `"TopKSelector"`.
pub fn short_type_name(full: &str) -> &str {
    full.rsplit("::").next().unwrap_or(full)
}
