use super::summary::ConversationSummary;

/// Case-insensitive substring match of `query` against a display name
///
/// Both sides are lowercased with Unicode's locale-independent mapping. An
/// empty query matches everything.
pub fn matches_query(display_name: &str, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    display_name.to_lowercase().contains(&query.to_lowercase())
}

/// Order-preserving subsequence of `summaries` whose names match `query`
pub fn filter_summaries<'a>(
    summaries: &'a [ConversationSummary],
    query: &str,
) -> Vec<&'a ConversationSummary> {
    if query.is_empty() {
        return summaries.iter().collect();
    }

    let needle = query.to_lowercase();
    summaries
        .iter()
        .filter(|summary| summary.display_name.to_lowercase().contains(&needle))
        .collect()
}
