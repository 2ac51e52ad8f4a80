//! Gmail tool catalog and request decoding.

use rmcp::model::Tool;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::errors::{ToolError, ToolResult};
use crate::mcp::catalog::tool;
use crate::mcp::ToolRequest;

/// Ceiling for `max_results` and `max_delete`.
pub const MAX_BATCH: i64 = 100;

fn query_only(description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "query": { "type": "string", "description": description }
        },
        "required": ["query"]
    })
}

/// Static Gmail catalog.
#[must_use]
pub fn catalog() -> Vec<Tool> {
    vec![
        tool(
            "search_emails",
            "Search Gmail messages and list sender, subject, and date",
            json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Gmail search query. Examples: 'subject:Invoice', 'from:example.com', 'is:unread older_than:30d'"
                    },
                    "max_results": {
                        "type": "integer",
                        "description": "Maximum number of results to return (default 20, max 100)",
                        "default": 20
                    },
                    "include_snippet": {
                        "type": "boolean",
                        "description": "Include email snippet/preview in results (default true)",
                        "default": true
                    }
                },
                "required": ["query"]
            }),
        ),
        tool(
            "delete_emails",
            "Permanently delete emails matching a Gmail search query",
            json!({
                "type": "object",
                "properties": {
                    "query": { "type": "string", "description": "Gmail search query to find emails to delete" },
                    "max_delete": {
                        "type": "integer",
                        "description": "Maximum number of emails to delete (safety limit, default 50)",
                        "default": 50
                    }
                },
                "required": ["query"]
            }),
        ),
        tool(
            "star_emails",
            "Star emails matching a Gmail search query",
            query_only("Gmail search query to find emails to star"),
        ),
        tool(
            "unstar_emails",
            "Remove the star from emails matching a Gmail search query",
            query_only("Gmail search query to find emails to unstar"),
        ),
        tool(
            "mark_as_read",
            "Mark emails matching a Gmail search query as read",
            query_only("Gmail search query to find emails to mark as read"),
        ),
        tool(
            "mark_as_unread",
            "Mark emails matching a Gmail search query as unread",
            query_only("Gmail search query to find emails to mark as unread"),
        ),
        tool(
            "archive_emails",
            "Archive emails matching a Gmail search query (remove from inbox)",
            query_only("Gmail search query to find emails to archive"),
        ),
        tool(
            "get_email_details",
            "Get sender, recipients, subject, date, and labels of one email",
            json!({
                "type": "object",
                "properties": {
                    "email_id": { "type": "string", "description": "Gmail message ID" }
                },
                "required": ["email_id"]
            }),
        ),
    ]
}

fn default_max_results() -> i64 {
    20
}

fn default_max_delete() -> i64 {
    50
}

fn default_true() -> bool {
    true
}

/// `search_emails` arguments.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SearchArgs {
    /// Gmail search query.
    pub query: String,
    /// Result cap, clamped to 1..=100.
    #[serde(default = "default_max_results")]
    pub max_results: i64,
    /// Whether to fetch sender, subject, date, and snippet per message.
    #[serde(default = "default_true")]
    pub include_snippet: bool,
}

/// `delete_emails` arguments.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DeleteArgs {
    /// Gmail search query.
    pub query: String,
    /// Safety cap, clamped to 1..=100.
    #[serde(default = "default_max_delete")]
    pub max_delete: i64,
}

/// Arguments for query-driven label changes.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct QueryArgs {
    /// Gmail search query.
    pub query: String,
}

/// `get_email_details` arguments.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DetailsArgs {
    /// Gmail message id.
    pub email_id: String,
}

/// Decoded Gmail invocation.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "tool", content = "arguments", rename_all = "snake_case")]
pub enum GmailRequest {
    /// `search_emails`
    SearchEmails(SearchArgs),
    /// `delete_emails`
    DeleteEmails(DeleteArgs),
    /// `star_emails`
    StarEmails(QueryArgs),
    /// `unstar_emails`
    UnstarEmails(QueryArgs),
    /// `mark_as_read`
    MarkAsRead(QueryArgs),
    /// `mark_as_unread`
    MarkAsUnread(QueryArgs),
    /// `archive_emails`
    ArchiveEmails(QueryArgs),
    /// `get_email_details`
    GetEmailDetails(DetailsArgs),
}

fn require_query(query: &str) -> ToolResult<()> {
    if query.trim().is_empty() {
        return Err(ToolError::invalid("Query must not be empty"));
    }
    Ok(())
}

impl ToolRequest for GmailRequest {
    fn normalize(self) -> ToolResult<Self> {
        Ok(match self {
            Self::SearchEmails(mut args) => {
                require_query(&args.query)?;
                args.max_results = args.max_results.clamp(1, MAX_BATCH);
                Self::SearchEmails(args)
            }
            Self::DeleteEmails(mut args) => {
                require_query(&args.query)?;
                args.max_delete = args.max_delete.clamp(1, MAX_BATCH);
                Self::DeleteEmails(args)
            }
            Self::StarEmails(ref args)
            | Self::UnstarEmails(ref args)
            | Self::MarkAsRead(ref args)
            | Self::MarkAsUnread(ref args)
            | Self::ArchiveEmails(ref args) => {
                require_query(&args.query)?;
                self
            }
            Self::GetEmailDetails(ref args) => {
                if args.email_id.trim().is_empty() {
                    return Err(ToolError::invalid("email_id must not be empty"));
                }
                self
            }
        })
    }
}
