use std::sync::Arc;

use data_adapters::mcp::Dispatcher;
use data_adapters::stocks::StockTools;
use data_adapters::ToolError;
use serde_json::{json, Value};

use super::test_helpers::{args, error_body, param, text, Params, StubApi};

fn dispatcher(api: &Arc<StubApi>) -> Dispatcher<StockTools> {
    Dispatcher::new(StockTools::new(api.clone()))
}

fn global_quote(symbol: &str, price: &str, change: &str) -> Value {
    json!({
        "Global Quote": {
            "01. symbol": symbol,
            "02. open": "100.00",
            "03. high": "110.00",
            "04. low": "95.00",
            "05. price": price,
            "06. volume": "52164528",
            "07. latest trading day": "2024-05-01",
            "08. previous close": "100.00",
            "09. change": change,
            "10. change percent": "1.5000%"
        }
    })
}

fn market(_: &str, params: &Params) -> Result<Value, ToolError> {
    match (param(params, "function"), param(params, "symbol")) {
        (Some("GLOBAL_QUOTE"), Some("AAPL")) => Ok(global_quote("AAPL", "101.50", "1.50")),
        (Some("GLOBAL_QUOTE"), Some("MSFT")) => Ok(global_quote("MSFT", "400.25", "-2.75")),
        (Some("GLOBAL_QUOTE"), Some(_)) => Ok(json!({ "Global Quote": {} })),
        _ => Err(ToolError::upstream("unexpected request")),
    }
}

#[tokio::test]
async fn quote_renders_report() {
    let api = StubApi::new(market);
    let result = dispatcher(&api)
        .call("get_stock_quote", args(json!({ "symbol": "aapl" })))
        .await;

    let report = text(&result);
    assert!(report.starts_with("📈 **AAPL Stock Quote**"));
    assert!(report.contains("**Current Price:** $101.50"));
    assert!(report.contains("**Volume:** 52,164,528"));
    assert!(report.contains("**Latest Trading Day:** 2024-05-01"));
}

#[tokio::test]
async fn empty_quote_is_not_found() {
    let api = StubApi::new(market);
    let result = dispatcher(&api)
        .call("get_stock_quote", args(json!({ "symbol": "ZZZZ" })))
        .await;

    let body = error_body(&result);
    assert_eq!(body["kind"], json!("not_found"));
    assert_eq!(body["message"], json!("No data found for symbol: ZZZZ"));
}

#[tokio::test]
async fn portfolio_lists_failed_symbols() {
    let api = StubApi::new(market);
    let result = dispatcher(&api)
        .call("get_portfolio_summary", args(json!({ "symbols": ["AAPL", "ZZZZ", "MSFT"] })))
        .await;

    assert_ne!(result.is_error, Some(true));
    let report = text(&result);
    assert!(report.contains("🟢 **AAPL**: $101.50 (+1.50 | 1.5000%)"));
    assert!(report.contains("❌ **ZZZZ**: Error - No data found for symbol: ZZZZ"));
    assert!(report.contains("🔴 **MSFT**: $400.25 (-2.75 | 1.5000%)"));
    assert!(report.contains("- Total Current Value: $501.75"));
    assert!(report.contains("- Number of Positions: 3"));
    assert_eq!(api.call_count(), 3);
}

#[tokio::test]
async fn daily_prices_forward_output_size() {
    let api = StubApi::new(|_, params: &Params| {
        assert_eq!(param(params, "function"), Some("TIME_SERIES_DAILY_ADJUSTED"));
        assert_eq!(param(params, "outputsize"), Some("full"));
        Ok(json!({
            "Time Series (Daily)": {
                "2024-05-01": {
                    "1. open": "100.0", "2. high": "105.0", "3. low": "99.0",
                    "4. close": "104.0", "5. adjusted close": "104.0", "6. volume": "1000"
                },
                "2024-05-02": {
                    "1. open": "104.0", "2. high": "104.5", "3. low": "101.0",
                    "4. close": "102.0", "5. adjusted close": "102.0", "6. volume": "2000"
                }
            }
        }))
    });
    let result = dispatcher(&api)
        .call("get_daily_prices", args(json!({ "symbol": "ibm", "outputsize": "full" })))
        .await;

    let report = text(&result);
    assert!(report.starts_with("📊 **IBM - Recent Daily Prices**"));
    let newest = report.find("2024-05-02").unwrap();
    let oldest = report.find("2024-05-01").unwrap();
    assert!(newest < oldest);
    assert!(report.contains("Close: $104.00 | Change: +4.00 (+4.0%)"));
}

#[tokio::test]
async fn search_without_matches_says_so() {
    let api = StubApi::new(|_, _| Ok(json!({ "bestMatches": [] })));
    let result = dispatcher(&api)
        .call("search_stocks", args(json!({ "keywords": "nothing" })))
        .await;

    assert_eq!(text(&result), "No stocks found matching 'nothing'");
}

#[tokio::test]
async fn rate_limit_surfaces_as_error() {
    let api = StubApi::new(|_, _| Err(ToolError::rate_limited("API rate limit reached.")));
    let result = dispatcher(&api)
        .call("get_company_overview", args(json!({ "symbol": "IBM" })))
        .await;

    assert_eq!(error_body(&result)["kind"], json!("rate_limited"));
}
