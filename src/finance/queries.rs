//! SQL for each finance tool.
//!
//! Only the schema name is interpolated; every caller value is bound.

use super::query::{SqlParam, SqlQuery};

/// Schema holding the budget tables.
pub const SCHEMA: &str = "budget_app";

/// Optional filters shared by spending queries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpendingFilter {
    /// Inclusive lower date bound (`YYYY-MM-DD`).
    pub start_date: Option<String>,
    /// Inclusive upper date bound (`YYYY-MM-DD`).
    pub end_date: Option<String>,
    /// Person id.
    pub person_id: Option<i64>,
}

/// Filters for the recent-transactions listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    /// Category name, matched case-insensitively.
    pub category: Option<String>,
    /// Person id.
    pub person_id: Option<i64>,
    /// Inclusive minimum amount.
    pub min_amount: Option<f64>,
    /// Inclusive maximum amount.
    pub max_amount: Option<f64>,
}

/// Per-category count, sum, average, minimum, and maximum.
#[must_use]
pub fn spending_summary(filter: &SpendingFilter) -> SqlQuery {
    SqlQuery::new(format!(
        "SELECT sc.category_name, \
                COUNT(*) AS transaction_count, \
                SUM(t.amount) AS total_amount, \
                AVG(t.amount) AS avg_amount, \
                MIN(t.amount) AS min_amount, \
                MAX(t.amount) AS max_amount \
         FROM {SCHEMA}.transactions t \
         JOIN {SCHEMA}.spending_categories sc ON t.category_id = sc.id \
         WHERE 1=1"
    ))
    .and_where_some(
        "t.transaction_date >= ?::date",
        filter.start_date.clone().map(SqlParam::Text),
    )
    .and_where_some(
        "t.transaction_date <= ?::date",
        filter.end_date.clone().map(SqlParam::Text),
    )
    .and_where_some("t.person_id = ?", filter.person_id.map(SqlParam::Int))
    .push("GROUP BY sc.category_name ORDER BY total_amount DESC")
    .build()
}

/// Newest transactions matching the filters.
#[must_use]
pub fn recent_transactions(filter: &TransactionFilter, limit: i64) -> SqlQuery {
    SqlQuery::new(format!(
        "SELECT t.id, t.transaction_date, t.description, t.amount, \
                sc.category_name, p.name AS person_name, at.account_name \
         FROM {SCHEMA}.transactions t \
         JOIN {SCHEMA}.spending_categories sc ON t.category_id = sc.id \
         JOIN {SCHEMA}.persons p ON t.person_id = p.id \
         JOIN {SCHEMA}.account_type at ON t.account_type_id = at.id \
         WHERE 1=1"
    ))
    .and_where_some(
        "LOWER(sc.category_name) = LOWER(?)",
        filter.category.clone().map(SqlParam::Text),
    )
    .and_where_some("t.person_id = ?", filter.person_id.map(SqlParam::Int))
    .and_where_some("t.amount >= ?::numeric", filter.min_amount.map(SqlParam::Float))
    .and_where_some("t.amount <= ?::numeric", filter.max_amount.map(SqlParam::Float))
    .push("ORDER BY t.transaction_date DESC")
    .limit(limit)
    .build()
}

/// Monthly totals for the trailing `months` calendar months.
#[must_use]
pub fn monthly_totals(months: i64, person_id: Option<i64>) -> SqlQuery {
    SqlQuery::new(format!(
        "SELECT DATE_TRUNC('month', t.transaction_date) AS month, \
                SUM(t.amount) AS total_amount, \
                COUNT(*) AS transaction_count \
         FROM {SCHEMA}.transactions t \
         WHERE 1=1"
    ))
    .and_where(
        "t.transaction_date >= DATE_TRUNC('month', CURRENT_DATE) - make_interval(months => ?::int)",
        SqlParam::Int(months),
    )
    .and_where_some("t.person_id = ?", person_id.map(SqlParam::Int))
    .push("GROUP BY DATE_TRUNC('month', t.transaction_date) ORDER BY month DESC")
    .build()
}

/// Category totals with their share of the period total.
#[must_use]
pub fn category_breakdown(year: i64, month: Option<i64>) -> SqlQuery {
    SqlQuery::new(format!(
        "SELECT sc.category_name, \
                SUM(t.amount) AS total_amount, \
                COUNT(*) AS transaction_count, \
                ROUND(100.0 * SUM(t.amount) / SUM(SUM(t.amount)) OVER (), 2) AS percentage \
         FROM {SCHEMA}.transactions t \
         JOIN {SCHEMA}.spending_categories sc ON t.category_id = sc.id \
         WHERE 1=1"
    ))
    .and_where("EXTRACT(YEAR FROM t.transaction_date) = ?", SqlParam::Int(year))
    .and_where_some("EXTRACT(MONTH FROM t.transaction_date) = ?", month.map(SqlParam::Int))
    .push("GROUP BY sc.category_name ORDER BY total_amount DESC")
    .build()
}

/// Case-insensitive substring search over descriptions.
#[must_use]
pub fn search_transactions(term: &str, limit: i64) -> SqlQuery {
    SqlQuery::new(format!(
        "SELECT t.id, t.transaction_date, t.description, t.amount, \
                sc.category_name, p.name AS person_name \
         FROM {SCHEMA}.transactions t \
         JOIN {SCHEMA}.spending_categories sc ON t.category_id = sc.id \
         JOIN {SCHEMA}.persons p ON t.person_id = p.id \
         WHERE 1=1"
    ))
    .and_where("LOWER(t.description) LIKE LOWER(?)", SqlParam::Text(format!("%{term}%")))
    .push("ORDER BY t.transaction_date DESC")
    .limit(limit)
    .build()
}

/// All spending categories by name.
#[must_use]
pub fn list_categories() -> SqlQuery {
    SqlQuery::new(format!(
        "SELECT id, category_name FROM {SCHEMA}.spending_categories ORDER BY category_name"
    ))
}

/// All persons by name.
#[must_use]
pub fn list_persons() -> SqlQuery {
    SqlQuery::new(format!("SELECT id, name FROM {SCHEMA}.persons ORDER BY name"))
}

/// All account types by name.
#[must_use]
pub fn list_accounts() -> SqlQuery {
    SqlQuery::new(format!(
        "SELECT id, account_name FROM {SCHEMA}.account_type ORDER BY account_name"
    ))
}

/// Row counts reported by the status tool.
#[must_use]
pub fn database_stats() -> SqlQuery {
    SqlQuery::new(format!(
        "SELECT (SELECT COUNT(*) FROM {SCHEMA}.transactions) AS total_transactions, \
                (SELECT COUNT(*) FROM {SCHEMA}.persons) AS total_persons, \
                (SELECT COUNT(*) FROM {SCHEMA}.spending_categories) AS total_categories"
    ))
}

/// A guarded ad-hoc SELECT, run without parameters.
#[must_use]
pub fn ad_hoc(select: String) -> SqlQuery {
    SqlQuery::new(select)
}
