//! SQL generation for the finance tools: placeholder numbering must always
//! match the bound parameter list, and caller values never reach the text.

use data_adapters::finance::queries::{self, SpendingFilter, TransactionFilter, SCHEMA};
use data_adapters::finance::query::SqlParam;

#[test]
fn spending_summary_without_filters_binds_nothing() {
    let query = queries::spending_summary(&SpendingFilter::default());
    assert!(query.params().is_empty());
    assert!(!query.text().contains('$'));
    assert!(query.text().contains("GROUP BY sc.category_name ORDER BY total_amount DESC"));
}

#[test]
fn spending_summary_numbers_each_filter() {
    let filter = SpendingFilter {
        start_date: Some("2024-01-01".into()),
        end_date: Some("2024-03-31".into()),
        person_id: Some(2),
    };
    let query = queries::spending_summary(&filter);

    assert!(query.text().contains("t.transaction_date >= $1::date"));
    assert!(query.text().contains("t.transaction_date <= $2::date"));
    assert!(query.text().contains("t.person_id = $3"));
    assert_eq!(
        query.params(),
        &[
            SqlParam::Text("2024-01-01".into()),
            SqlParam::Text("2024-03-31".into()),
            SqlParam::Int(2),
        ]
    );
}

#[test]
fn skipped_filters_do_not_leave_gaps() {
    let filter = SpendingFilter {
        start_date: None,
        end_date: Some("2024-03-31".into()),
        person_id: Some(1),
    };
    let query = queries::spending_summary(&filter);
    assert!(query.text().contains("<= $1::date"));
    assert!(query.text().contains("t.person_id = $2"));
    assert_eq!(query.params().len(), 2);
}

#[test]
fn recent_transactions_limit_follows_filters() {
    let filter = TransactionFilter {
        category: Some("Groceries".into()),
        person_id: None,
        min_amount: None,
        max_amount: Some(250.0),
    };
    let query = queries::recent_transactions(&filter, 20);

    assert!(query.text().contains("LOWER(sc.category_name) = LOWER($1)"));
    assert!(query.text().contains("t.amount <= $2::numeric"));
    assert!(query.text().ends_with("ORDER BY t.transaction_date DESC LIMIT $3"));
    assert_eq!(query.params()[2], SqlParam::Int(20));
}

#[test]
fn search_term_is_bound_not_interpolated() {
    let term = "coffee'; DROP TABLE budget_app.transactions; --";
    let query = queries::search_transactions(term, 5);

    assert!(!query.text().contains("coffee"));
    assert!(query.text().contains("LIKE LOWER($1)"));
    assert_eq!(query.params()[0], SqlParam::Text(format!("%{term}%")));
    assert_eq!(query.params()[1], SqlParam::Int(5));
}

#[test]
fn monthly_totals_binds_window_first() {
    let query = queries::monthly_totals(6, Some(3));
    assert!(query.text().contains("make_interval(months => $1::int)"));
    assert!(query.text().contains("t.person_id = $2"));
    assert_eq!(query.params(), &[SqlParam::Int(6), SqlParam::Int(3)]);
}

#[test]
fn category_breakdown_month_is_optional() {
    let year_only = queries::category_breakdown(2024, None);
    assert_eq!(year_only.params(), &[SqlParam::Int(2024)]);
    assert!(!year_only.text().contains("EXTRACT(MONTH"));

    let with_month = queries::category_breakdown(2024, Some(3));
    assert!(with_month.text().contains("EXTRACT(MONTH FROM t.transaction_date) = $2"));
    assert!(with_month.text().contains("SUM(SUM(t.amount)) OVER ()"));
}

#[test]
fn only_the_schema_is_interpolated() {
    for query in [
        queries::list_categories(),
        queries::list_persons(),
        queries::list_accounts(),
        queries::database_stats(),
    ] {
        assert!(query.text().contains(&format!("{SCHEMA}.")), "{}", query.text());
        assert!(query.params().is_empty());
    }
}

#[test]
fn listings_sort_by_name() {
    assert!(queries::list_categories().text().ends_with("ORDER BY category_name"));
    assert!(queries::list_persons().text().ends_with("ORDER BY name"));
    assert!(queries::list_accounts().text().ends_with("ORDER BY account_name"));
}
