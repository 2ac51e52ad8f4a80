//! Gmail adapter: search plus query-driven bulk delete, star, read-state,
//! and archive operations.
//!
//! Bulk operations search first, then mutate each match independently. A
//! failed message is logged and counted; it never aborts the batch.

pub mod auth;
pub mod mailbox;
pub mod tools;

use std::collections::HashMap;
use std::sync::Arc;

use rmcp::model::Tool;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{error, info};

use crate::errors::ToolResult;
use crate::mcp::{BoxFuture, Payload, ToolSet};

use self::mailbox::{LabelChange, Mailbox, MessageFormat};
use self::tools::{GmailRequest, SearchArgs};

/// Server name announced to the host.
pub const SERVER_NAME: &str = "gmail-cleaner";

const INSTRUCTIONS: &str = "Gmail cleanup tools. Every bulk action takes a Gmail search query \
    (e.g. 'from:newsletter@example.com older_than:1y'); run search_emails first to preview.";

const NO_MATCH_MESSAGE: &str =
    "No emails found matching this query. Try using 'search_emails' first to verify emails exist.";
const DELETE_HINT: &str = "For 5+ year old emails, try: 'before:2020/01/01' or 'older_than:1825d'";
const QUERY_HINT: &str = "Gmail query syntax: 'from:', 'subject:', 'is:unread', 'older_than:30d', \
    'has:attachment'; combine terms with spaces.";

/// Mutation applied to every message matching a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAction {
    /// Permanent delete.
    Delete,
    /// Add `STARRED`.
    Star,
    /// Remove `STARRED`.
    Unstar,
    /// Remove `UNREAD`.
    MarkRead,
    /// Add `UNREAD`.
    MarkUnread,
    /// Remove `INBOX`.
    Archive,
}

impl BulkAction {
    /// Name reported in the tally.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Delete => "delete",
            Self::Star => "star",
            Self::Unstar => "unstar",
            Self::MarkRead => "mark_as_read",
            Self::MarkUnread => "mark_as_unread",
            Self::Archive => "archive",
        }
    }

    /// Label edit for label-based actions; `None` for delete.
    #[must_use]
    pub fn label_change(self) -> Option<LabelChange> {
        match self {
            Self::Delete => None,
            Self::Star => Some(LabelChange::add("STARRED")),
            Self::Unstar => Some(LabelChange::remove("STARRED")),
            Self::MarkRead => Some(LabelChange::remove("UNREAD")),
            Self::MarkUnread => Some(LabelChange::add("UNREAD")),
            Self::Archive => Some(LabelChange::remove("INBOX")),
        }
    }
}

/// Outcome of a bulk action.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BulkTally {
    /// Action performed.
    pub action: &'static str,
    /// Query that selected the messages.
    pub query: String,
    /// Messages matched.
    pub found: usize,
    /// Messages mutated.
    pub succeeded: usize,
    /// Messages whose mutation failed.
    pub failed: usize,
    /// Explanation when nothing matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Query-syntax hint when nothing matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

/// Gmail tool set over any [`Mailbox`].
pub struct GmailTools {
    mailbox: Arc<dyn Mailbox>,
}

impl GmailTools {
    /// Create the tool set.
    pub fn new(mailbox: Arc<dyn Mailbox>) -> Self {
        Self { mailbox }
    }

    /// Search, then apply `action` to each match independently.
    ///
    /// # Errors
    ///
    /// Only the initial search can fail; per-message failures are counted.
    pub async fn bulk(&self, action: BulkAction, query: &str, cap: Option<i64>) -> ToolResult<BulkTally> {
        let ids = self.mailbox.list_message_ids(query, cap).await?;
        info!(action = action.as_str(), found = ids.len(), "messages matched");

        let mut tally = BulkTally {
            action: action.as_str(),
            query: query.to_owned(),
            found: ids.len(),
            succeeded: 0,
            failed: 0,
            message: None,
            hint: None,
        };
        if ids.is_empty() {
            tally.message = Some(NO_MATCH_MESSAGE.to_owned());
            tally.hint = Some(match action {
                BulkAction::Delete => DELETE_HINT.to_owned(),
                _ => QUERY_HINT.to_owned(),
            });
            return Ok(tally);
        }

        for id in &ids {
            let outcome = match action.label_change() {
                None => self.mailbox.delete_message(id).await,
                Some(change) => self.mailbox.modify_labels(id, change).await,
            };
            match outcome {
                Ok(()) => tally.succeeded += 1,
                Err(err) => {
                    tally.failed += 1;
                    error!(action = action.as_str(), message_id = %id, %err, "message update failed");
                }
            }
        }
        info!(
            action = action.as_str(),
            succeeded = tally.succeeded,
            failed = tally.failed,
            "bulk action finished"
        );
        Ok(tally)
    }

    async fn search(&self, args: SearchArgs) -> ToolResult<Value> {
        let ids = self
            .mailbox
            .list_message_ids(&args.query, Some(args.max_results))
            .await?;
        if ids.is_empty() {
            return Ok(json!({
                "query": args.query,
                "count": 0,
                "emails": [],
                "message": format!("No emails found matching query: '{}'", args.query),
            }));
        }

        let mut emails = Vec::with_capacity(ids.len());
        for id in &ids {
            if !args.include_snippet {
                emails.push(json!({ "id": id }));
                continue;
            }
            let message = self.mailbox.get_message(id, MessageFormat::Metadata).await?;
            let headers = headers(&message);
            emails.push(json!({
                "id": id,
                "from": header_or(&headers, "From", "Unknown"),
                "subject": header_or(&headers, "Subject", "No Subject"),
                "date": header_or(&headers, "Date", "Unknown"),
                "snippet": message.get("snippet").and_then(Value::as_str).unwrap_or_default(),
            }));
        }

        Ok(json!({
            "query": args.query,
            "count": ids.len(),
            "emails": emails,
        }))
    }

    async fn details(&self, email_id: &str) -> ToolResult<Value> {
        let message = self.mailbox.get_message(email_id, MessageFormat::Full).await?;
        let headers = headers(&message);
        Ok(json!({
            "id": message.get("id").and_then(Value::as_str).unwrap_or(email_id),
            "thread_id": message.get("threadId").and_then(Value::as_str).unwrap_or_default(),
            "from": header_or(&headers, "From", "Unknown"),
            "to": header_or(&headers, "To", "Unknown"),
            "subject": header_or(&headers, "Subject", "No Subject"),
            "date": header_or(&headers, "Date", "Unknown"),
            "snippet": message.get("snippet").and_then(Value::as_str).unwrap_or_default(),
            "labels": message.get("labelIds").cloned().unwrap_or_else(|| json!([])),
        }))
    }

    async fn run(&self, request: GmailRequest) -> ToolResult<Payload> {
        let tally = match request {
            GmailRequest::SearchEmails(args) => return self.search(args).await.map(Payload::Json),
            GmailRequest::GetEmailDetails(args) => {
                return self.details(&args.email_id).await.map(Payload::Json);
            }
            GmailRequest::DeleteEmails(args) => {
                self.bulk(BulkAction::Delete, &args.query, Some(args.max_delete)).await?
            }
            GmailRequest::StarEmails(args) => self.bulk(BulkAction::Star, &args.query, None).await?,
            GmailRequest::UnstarEmails(args) => self.bulk(BulkAction::Unstar, &args.query, None).await?,
            GmailRequest::MarkAsRead(args) => self.bulk(BulkAction::MarkRead, &args.query, None).await?,
            GmailRequest::MarkAsUnread(args) => {
                self.bulk(BulkAction::MarkUnread, &args.query, None).await?
            }
            GmailRequest::ArchiveEmails(args) => self.bulk(BulkAction::Archive, &args.query, None).await?,
        };
        Payload::json(tally)
    }
}

/// Case-sensitive header map from a message resource's payload.
fn headers(message: &Value) -> HashMap<&str, &str> {
    message
        .pointer("/payload/headers")
        .and_then(Value::as_array)
        .map(|headers| {
            headers
                .iter()
                .filter_map(|header| {
                    Some((
                        header.get("name")?.as_str()?,
                        header.get("value")?.as_str()?,
                    ))
                })
                .collect()
        })
        .unwrap_or_default()
}

fn header_or<'a>(headers: &HashMap<&'a str, &'a str>, name: &str, fallback: &'a str) -> &'a str {
    headers.get(name).copied().unwrap_or(fallback)
}

impl ToolSet for GmailTools {
    type Request = GmailRequest;

    fn server_name(&self) -> &'static str {
        SERVER_NAME
    }

    fn instructions(&self) -> &'static str {
        INSTRUCTIONS
    }

    fn catalog(&self) -> Vec<Tool> {
        tools::catalog()
    }

    fn execute(&self, request: GmailRequest) -> BoxFuture<'_, ToolResult<Payload>> {
        Box::pin(self.run(request))
    }

    fn close(&self) -> BoxFuture<'_, ()> {
        self.mailbox.close()
    }
}
