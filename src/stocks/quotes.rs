//! Typed views over Alpha Vantage responses.
//!
//! Alpha Vantage encodes every number as a string under numbered keys
//! (`"05. price"`); these parsers turn them into plain records.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::errors::{ToolError, ToolResult};

/// Daily bars reported per request.
pub const DAILY_WINDOW: usize = 10;
/// Symbol search matches reported per request.
pub const SEARCH_WINDOW: usize = 10;

/// Real-time quote.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Quote {
    /// Ticker.
    pub symbol: String,
    /// Last price.
    pub price: f64,
    /// Absolute change from previous close.
    pub change: f64,
    /// Change as reported, e.g. `"1.23%"`.
    pub change_percent: String,
    /// Session volume.
    pub volume: i64,
    /// Latest trading day.
    pub latest_trading_day: String,
    /// Previous close.
    pub previous_close: f64,
    /// Session open.
    pub open: f64,
    /// Session high.
    pub high: f64,
    /// Session low.
    pub low: f64,
}

/// Company fundamentals, kept as reported strings.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct CompanyOverview {
    /// Ticker.
    pub symbol: String,
    /// Company name.
    pub name: String,
    /// Business description.
    pub description: String,
    /// Sector.
    pub sector: String,
    /// Industry.
    pub industry: String,
    /// Market capitalization.
    pub market_cap: String,
    /// Price/earnings ratio.
    pub pe_ratio: String,
    /// Dividend yield.
    pub dividend_yield: String,
    /// 52-week high.
    pub week52_high: String,
    /// 52-week low.
    pub week52_low: String,
    /// Beta.
    pub beta: String,
    /// Earnings per share.
    pub eps: String,
}

/// One daily bar.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DailyPrice {
    /// Trading date (`YYYY-MM-DD`).
    pub date: String,
    /// Open.
    pub open: f64,
    /// High.
    pub high: f64,
    /// Low.
    pub low: f64,
    /// Close.
    pub close: f64,
    /// Split/dividend adjusted close.
    pub adjusted_close: f64,
    /// Volume.
    pub volume: i64,
}

impl DailyPrice {
    /// Close minus open.
    #[must_use]
    pub fn change(&self) -> f64 {
        self.close - self.open
    }

    /// Change relative to open, in percent; zero when open is zero.
    #[must_use]
    pub fn change_percent(&self) -> f64 {
        if self.open.abs() < f64::EPSILON {
            0.0
        } else {
            self.change() / self.open * 100.0
        }
    }
}

/// Symbol search match.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SymbolMatch {
    /// Ticker.
    pub symbol: String,
    /// Security name.
    pub name: String,
    /// Security type.
    pub kind: String,
    /// Listing region.
    pub region: String,
    /// Trading currency.
    pub currency: String,
    /// Relevance score as reported.
    pub match_score: String,
}

fn text(map: &Map<String, Value>, key: &str) -> String {
    map.get(key).and_then(Value::as_str).unwrap_or_default().to_owned()
}

fn float(map: &Map<String, Value>, key: &str) -> f64 {
    match map.get(key) {
        Some(Value::String(raw)) => raw.trim().parse().unwrap_or(0.0),
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn integer(map: &Map<String, Value>, key: &str) -> i64 {
    match map.get(key) {
        Some(Value::String(raw)) => raw.trim().parse().unwrap_or(0),
        Some(Value::Number(n)) => n.as_i64().unwrap_or(0),
        _ => 0,
    }
}

/// Parse a `GLOBAL_QUOTE` body.
///
/// # Errors
///
/// Returns `NotFound` when the body carries no quote for the symbol.
pub fn parse_quote(body: &Value, symbol: &str) -> ToolResult<Quote> {
    let quote = body
        .get("Global Quote")
        .and_then(Value::as_object)
        .filter(|quote| !quote.is_empty())
        .ok_or_else(|| ToolError::not_found(format!("No data found for symbol: {symbol}")))?;

    Ok(Quote {
        symbol: text(quote, "01. symbol"),
        price: float(quote, "05. price"),
        change: float(quote, "09. change"),
        change_percent: text(quote, "10. change percent"),
        volume: integer(quote, "06. volume"),
        latest_trading_day: text(quote, "07. latest trading day"),
        previous_close: float(quote, "08. previous close"),
        open: float(quote, "02. open"),
        high: float(quote, "03. high"),
        low: float(quote, "04. low"),
    })
}

/// Parse an `OVERVIEW` body.
///
/// # Errors
///
/// Returns `NotFound` when the body has no `Symbol`.
pub fn parse_overview(body: &Value, symbol: &str) -> ToolResult<CompanyOverview> {
    let data = body
        .as_object()
        .filter(|data| data.contains_key("Symbol"))
        .ok_or_else(|| ToolError::not_found(format!("No company data found for symbol: {symbol}")))?;

    Ok(CompanyOverview {
        symbol: text(data, "Symbol"),
        name: text(data, "Name"),
        description: text(data, "Description"),
        sector: text(data, "Sector"),
        industry: text(data, "Industry"),
        market_cap: text(data, "MarketCapitalization"),
        pe_ratio: text(data, "PERatio"),
        dividend_yield: text(data, "DividendYield"),
        week52_high: text(data, "52WeekHigh"),
        week52_low: text(data, "52WeekLow"),
        beta: text(data, "Beta"),
        eps: text(data, "EPS"),
    })
}

/// Parse a `TIME_SERIES_DAILY_ADJUSTED` body, newest first.
///
/// # Errors
///
/// Returns `NotFound` when the body has no daily series.
pub fn parse_daily(body: &Value, symbol: &str) -> ToolResult<Vec<DailyPrice>> {
    let series = body
        .get("Time Series (Daily)")
        .and_then(Value::as_object)
        .ok_or_else(|| ToolError::not_found(format!("No daily data found for symbol: {symbol}")))?;

    let mut dates: Vec<&String> = series.keys().collect();
    dates.sort_unstable_by(|a, b| b.cmp(a));

    Ok(dates
        .into_iter()
        .take(DAILY_WINDOW)
        .filter_map(|date| {
            let bar = series.get(date)?.as_object()?;
            Some(DailyPrice {
                date: date.clone(),
                open: float(bar, "1. open"),
                high: float(bar, "2. high"),
                low: float(bar, "3. low"),
                close: float(bar, "4. close"),
                adjusted_close: float(bar, "5. adjusted close"),
                volume: integer(bar, "6. volume"),
            })
        })
        .collect())
}

/// Parse a `SYMBOL_SEARCH` body; absent matches yield an empty list.
#[must_use]
pub fn parse_matches(body: &Value) -> Vec<SymbolMatch> {
    body.get("bestMatches")
        .and_then(Value::as_array)
        .map(|matches| {
            matches
                .iter()
                .filter_map(Value::as_object)
                .take(SEARCH_WINDOW)
                .map(|entry| SymbolMatch {
                    symbol: text(entry, "1. symbol"),
                    name: text(entry, "2. name"),
                    kind: text(entry, "3. type"),
                    region: text(entry, "4. region"),
                    currency: text(entry, "8. currency"),
                    match_score: text(entry, "9. matchScore"),
                })
                .collect()
        })
        .unwrap_or_default()
}
