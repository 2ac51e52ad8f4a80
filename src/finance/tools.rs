//! Finance tool catalog and request decoding.

use chrono::{Datelike, NaiveDate, Utc};
use rmcp::model::Tool;
use serde::Deserialize;
use serde_json::json;

use super::guard;
use crate::errors::{ToolError, ToolResult};
use crate::mcp::catalog::tool;
use crate::mcp::ToolRequest;

/// Ceiling for row limits.
pub const MAX_LIMIT: i64 = 100;
/// Ceiling for the monthly-totals window.
pub const MAX_MONTHS: i64 = 120;

/// Static finance catalog.
#[must_use]
pub fn catalog() -> Vec<Tool> {
    let empty = || json!({ "type": "object", "properties": {} });
    vec![
        tool(
            "get_spending_summary",
            "Get spending totals by category, optionally filtered by date range and person",
            json!({
                "type": "object",
                "properties": {
                    "start_date": { "type": "string", "description": "Start date (YYYY-MM-DD)" },
                    "end_date": { "type": "string", "description": "End date (YYYY-MM-DD)" },
                    "person_id": { "type": "integer", "description": "Filter by person ID" }
                }
            }),
        ),
        tool(
            "get_recent_transactions",
            "Get recent transactions with optional category, person, and amount filters",
            json!({
                "type": "object",
                "properties": {
                    "limit": {
                        "type": "integer",
                        "description": "Number of transactions to return (default 20, max 100)",
                        "default": 20
                    },
                    "category": { "type": "string", "description": "Filter by category name" },
                    "person_id": { "type": "integer", "description": "Filter by person ID" },
                    "min_amount": { "type": "number", "description": "Minimum transaction amount" },
                    "max_amount": { "type": "number", "description": "Maximum transaction amount" }
                }
            }),
        ),
        tool(
            "get_monthly_totals",
            "Get total spending per month for the trailing months",
            json!({
                "type": "object",
                "properties": {
                    "months": {
                        "type": "integer",
                        "description": "Number of months to include (default 12)",
                        "default": 12
                    },
                    "person_id": { "type": "integer", "description": "Filter by person ID" }
                }
            }),
        ),
        tool(
            "get_category_breakdown",
            "Get spending by category with percentages for a year or a single month",
            json!({
                "type": "object",
                "properties": {
                    "year": { "type": "integer", "description": "Year (default current year)" },
                    "month": { "type": "integer", "description": "Month 1-12 (optional)" }
                }
            }),
        ),
        tool(
            "search_transactions",
            "Search transactions by description text",
            json!({
                "type": "object",
                "properties": {
                    "search_term": { "type": "string", "description": "Text to search for in descriptions" },
                    "limit": {
                        "type": "integer",
                        "description": "Maximum results (default 20, max 100)",
                        "default": 20
                    }
                },
                "required": ["search_term"]
            }),
        ),
        tool("list_categories", "List all spending categories", empty()),
        tool("list_persons", "List all persons in the budget", empty()),
        tool("list_accounts", "List all account types", empty()),
        tool(
            "get_database_status",
            "Check database connectivity and basic row counts",
            empty(),
        ),
        tool(
            "execute_select_query",
            "Run a custom read-only SELECT query against the budget_app schema",
            json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "SELECT statement to execute (read-only)"
                    }
                },
                "required": ["query"]
            }),
        ),
    ]
}

fn default_limit() -> i64 {
    20
}

fn default_months() -> i64 {
    12
}

/// `get_spending_summary` arguments.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct SpendingArgs {
    /// Inclusive lower bound.
    pub start_date: Option<String>,
    /// Inclusive upper bound.
    pub end_date: Option<String>,
    /// Person filter.
    pub person_id: Option<i64>,
}

/// `get_recent_transactions` arguments.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RecentArgs {
    /// Row cap, clamped to 1..=100.
    #[serde(default = "default_limit")]
    pub limit: i64,
    /// Category name.
    pub category: Option<String>,
    /// Person filter.
    pub person_id: Option<i64>,
    /// Inclusive minimum amount.
    pub min_amount: Option<f64>,
    /// Inclusive maximum amount.
    pub max_amount: Option<f64>,
}

/// `get_monthly_totals` arguments.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct MonthlyArgs {
    /// Trailing window, clamped to 1..=120.
    #[serde(default = "default_months")]
    pub months: i64,
    /// Person filter.
    pub person_id: Option<i64>,
}

/// `get_category_breakdown` arguments.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct BreakdownArgs {
    /// Calendar year; the current year when absent.
    pub year: Option<i64>,
    /// Calendar month 1-12.
    pub month: Option<i64>,
}

/// `search_transactions` arguments.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SearchArgs {
    /// Description substring.
    pub search_term: String,
    /// Row cap, clamped to 1..=100.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

/// `execute_select_query` arguments.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SelectArgs {
    /// Ad-hoc SQL.
    pub query: String,
}

/// Tools without arguments.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct NoArgs {}

/// Decoded finance invocation.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "tool", content = "arguments", rename_all = "snake_case")]
pub enum FinanceRequest {
    /// `get_spending_summary`
    GetSpendingSummary(SpendingArgs),
    /// `get_recent_transactions`
    GetRecentTransactions(RecentArgs),
    /// `get_monthly_totals`
    GetMonthlyTotals(MonthlyArgs),
    /// `get_category_breakdown`
    GetCategoryBreakdown(BreakdownArgs),
    /// `search_transactions`
    SearchTransactions(SearchArgs),
    /// `list_categories`
    ListCategories(NoArgs),
    /// `list_persons`
    ListPersons(NoArgs),
    /// `list_accounts`
    ListAccounts(NoArgs),
    /// `get_database_status`
    GetDatabaseStatus(NoArgs),
    /// `execute_select_query`
    ExecuteSelectQuery(SelectArgs),
}

/// Reject dates that are not `YYYY-MM-DD`.
///
/// # Errors
///
/// Returns `InvalidRequest` naming the offending field.
pub fn check_date(field: &str, value: Option<&str>) -> ToolResult<()> {
    match value {
        Some(date) if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() => Err(
            ToolError::invalid(format!("{field} must be a date in YYYY-MM-DD format, got '{date}'")),
        ),
        _ => Ok(()),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

impl ToolRequest for FinanceRequest {
    fn normalize(self) -> ToolResult<Self> {
        Ok(match self {
            Self::GetSpendingSummary(mut args) => {
                args.start_date = non_blank(args.start_date);
                args.end_date = non_blank(args.end_date);
                check_date("start_date", args.start_date.as_deref())?;
                check_date("end_date", args.end_date.as_deref())?;
                Self::GetSpendingSummary(args)
            }
            Self::GetRecentTransactions(mut args) => {
                args.limit = args.limit.clamp(1, MAX_LIMIT);
                args.category = non_blank(args.category);
                Self::GetRecentTransactions(args)
            }
            Self::GetMonthlyTotals(mut args) => {
                args.months = args.months.clamp(1, MAX_MONTHS);
                Self::GetMonthlyTotals(args)
            }
            Self::GetCategoryBreakdown(mut args) => {
                if let Some(month) = args.month {
                    if !(1..=12).contains(&month) {
                        return Err(ToolError::invalid(format!(
                            "month must be between 1 and 12, got {month}"
                        )));
                    }
                }
                args.year = Some(args.year.unwrap_or_else(|| i64::from(Utc::now().year())));
                Self::GetCategoryBreakdown(args)
            }
            Self::SearchTransactions(mut args) => {
                if args.search_term.trim().is_empty() {
                    return Err(ToolError::invalid("search_term must not be empty"));
                }
                args.limit = args.limit.clamp(1, MAX_LIMIT);
                Self::SearchTransactions(args)
            }
            Self::ExecuteSelectQuery(args) => Self::ExecuteSelectQuery(SelectArgs {
                query: guard::check_select(&args.query)?,
            }),
            other => other,
        })
    }
}
