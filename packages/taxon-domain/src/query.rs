use crate::CategoryId;

/// Shortest query text that reaches the name index, counted in Unicode scalar values, so a
/// single emoji is too short.
pub const MIN_QUERY_CHARS: usize = 2;

/// Wildcard substring pattern for a name-index scan.
///
/// Returns `None` when the text is too short to be worth scanning.
pub fn name_pattern(text: &str) -> Option<String> {
	if text.chars().count() < MIN_QUERY_CHARS {
		return None;
	}

	Some(format!("*{}*", text.to_lowercase()))
}

/// Parses the trailing id segment of a name-index member such as `"news:5"`.
pub fn parse_key_id(key: &str, separator: &str) -> Option<CategoryId> {
	key.rsplit(separator).next()?.parse().ok()
}
