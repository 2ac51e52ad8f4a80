//! Read-only guard for ad-hoc SQL.
//!
//! This is a defense-in-depth filter, not a security boundary: the database
//! role should be read-only as well. The substring check rejects
//! forbidden words anywhere, including inside literals and
//! identifiers such as `updated_at`.

use crate::errors::{ToolError, ToolResult};

/// Keywords rejected anywhere in an ad-hoc query (case-insensitive).
pub const FORBIDDEN_KEYWORDS: [&str; 9] = [
    "INSERT", "UPDATE", "DELETE", "DROP", "CREATE", "ALTER", "TRUNCATE", "GRANT", "REVOKE",
];

/// Validate an ad-hoc query and return it trimmed, without trailing `;`.
///
/// # Errors
///
/// Returns `InvalidRequest` if the query is empty, does not start with
/// `SELECT`, or contains a forbidden keyword.
pub fn check_select(query: &str) -> ToolResult<String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(ToolError::invalid("Query is required"));
    }

    let upper = trimmed.to_uppercase();
    if !upper.starts_with("SELECT") {
        return Err(ToolError::invalid(
            "Only SELECT queries are allowed for safety. This server is read-only.",
        ));
    }

    if let Some(keyword) = FORBIDDEN_KEYWORDS.iter().find(|kw| upper.contains(*kw)) {
        return Err(ToolError::invalid(format!(
            "Query contains forbidden keyword: {keyword}. Only read-only SELECT queries are allowed."
        )));
    }

    Ok(trimmed.trim_end_matches(';').trim_end().to_owned())
}
