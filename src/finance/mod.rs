//! Personal-finance adapter over the `budget_app` Postgres schema.
//!
//! The server starts even when the database is unreachable; every tool then
//! answers with the connection diagnostic, and `get_database_status` reports
//! it without failing.

pub mod guard;
pub mod queries;
pub mod query;
pub mod store;
pub mod tools;

use std::sync::Arc;

use rmcp::model::Tool;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::errors::ToolResult;
use crate::mcp::{BoxFuture, Payload, ToolSet};

use self::queries::{SpendingFilter, TransactionFilter, SCHEMA};
use self::query::SqlQuery;
use self::store::{FinanceStore, ALLOWED_HOST};
use self::tools::FinanceRequest;

/// Server name announced to the host.
pub const SERVER_NAME: &str = "finance-database";

const INSTRUCTIONS: &str = "Read-only access to the personal budget database (schema budget_app): \
    spending summaries, transactions, monthly totals, and category breakdowns. Use \
    get_database_status when a call reports the database as unavailable.";

/// Round to cents.
#[must_use]
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Sum of `total_amount` over aggregate rows, rounded to cents.
#[must_use]
pub fn grand_total(rows: &[Value]) -> f64 {
    round_cents(
        rows.iter()
            .filter_map(|row| row.get("total_amount").and_then(Value::as_f64))
            .sum(),
    )
}

/// Finance tool set over any [`FinanceStore`].
pub struct FinanceTools {
    store: Arc<dyn FinanceStore>,
    database: String,
}

impl FinanceTools {
    /// Create the tool set; `database` is reported by the status tool.
    pub fn new(store: Arc<dyn FinanceStore>, database: impl Into<String>) -> Self {
        Self {
            store,
            database: database.into(),
        }
    }

    async fn rows(&self, query: &SqlQuery) -> ToolResult<Vec<Value>> {
        self.store.fetch_rows(query).await
    }

    /// Connectivity report; never fails.
    pub async fn status(&self) -> Value {
        if let Err(err) = self.store.ensure_connection().await {
            warn!(database = %self.database, %err, "database status check failed");
            return json!({
                "connected": false,
                "database": self.database,
                "error": err.message,
                "hint": err.hint,
            });
        }

        let mut report = json!({
            "connected": true,
            "database": self.database,
            "host": ALLOWED_HOST,
            "schema": SCHEMA,
        });
        match self.store.fetch_row(&queries::database_stats()).await {
            Ok(stats) => report["stats"] = stats.unwrap_or_else(|| json!({})),
            Err(err) => report["stats_error"] = Value::String(err.message),
        }
        report
    }

    async fn run(&self, request: FinanceRequest) -> ToolResult<Value> {
        Ok(match request {
            FinanceRequest::GetSpendingSummary(args) => {
                let filter = SpendingFilter {
                    start_date: args.start_date,
                    end_date: args.end_date,
                    person_id: args.person_id,
                };
                let summary = self.rows(&queries::spending_summary(&filter)).await?;
                json!({
                    "grand_total": grand_total(&summary),
                    "summary": summary,
                    "filters": {
                        "start_date": filter.start_date,
                        "end_date": filter.end_date,
                        "person_id": filter.person_id,
                    },
                })
            }
            FinanceRequest::GetRecentTransactions(args) => {
                let filter = TransactionFilter {
                    category: args.category,
                    person_id: args.person_id,
                    min_amount: args.min_amount,
                    max_amount: args.max_amount,
                };
                let transactions = self
                    .rows(&queries::recent_transactions(&filter, args.limit))
                    .await?;
                json!({ "count": transactions.len(), "transactions": transactions })
            }
            FinanceRequest::GetMonthlyTotals(args) => {
                let totals = self
                    .rows(&queries::monthly_totals(args.months, args.person_id))
                    .await?;
                json!({ "months_included": args.months, "monthly_totals": totals })
            }
            FinanceRequest::GetCategoryBreakdown(args) => {
                let year = args.year.unwrap_or_default();
                let breakdown = self
                    .rows(&queries::category_breakdown(year, args.month))
                    .await?;
                json!({
                    "year": year,
                    "month": args.month,
                    "grand_total": grand_total(&breakdown),
                    "breakdown": breakdown,
                })
            }
            FinanceRequest::SearchTransactions(args) => {
                let results = self
                    .rows(&queries::search_transactions(&args.search_term, args.limit))
                    .await?;
                json!({
                    "search_term": args.search_term,
                    "count": results.len(),
                    "results": results,
                })
            }
            FinanceRequest::ListCategories(_) => {
                json!({ "categories": self.rows(&queries::list_categories()).await? })
            }
            FinanceRequest::ListPersons(_) => {
                json!({ "persons": self.rows(&queries::list_persons()).await? })
            }
            FinanceRequest::ListAccounts(_) => {
                json!({ "accounts": self.rows(&queries::list_accounts()).await? })
            }
            FinanceRequest::GetDatabaseStatus(_) => self.status().await,
            FinanceRequest::ExecuteSelectQuery(args) => {
                info!(query = %args.query, "executing ad-hoc select");
                let results = self.rows(&queries::ad_hoc(args.query.clone())).await?;
                json!({
                    "query": args.query,
                    "row_count": results.len(),
                    "results": results,
                })
            }
        })
    }
}

impl ToolSet for FinanceTools {
    type Request = FinanceRequest;

    fn server_name(&self) -> &'static str {
        SERVER_NAME
    }

    fn instructions(&self) -> &'static str {
        INSTRUCTIONS
    }

    fn catalog(&self) -> Vec<Tool> {
        tools::catalog()
    }

    fn execute(&self, request: FinanceRequest) -> BoxFuture<'_, ToolResult<Payload>> {
        Box::pin(async move { self.run(request).await.map(Payload::Json) })
    }

    fn close(&self) -> BoxFuture<'_, ()> {
        self.store.close()
    }
}
