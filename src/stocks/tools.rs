//! Stock tool catalog and request decoding.

use rmcp::model::Tool;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::errors::{ToolError, ToolResult};
use crate::mcp::catalog::tool;
use crate::mcp::ToolRequest;

fn symbol_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "symbol": { "type": "string", "description": "Stock symbol (e.g., AAPL, MSFT, GOOGL)" }
        },
        "required": ["symbol"]
    })
}

/// Static stocks catalog.
#[must_use]
pub fn catalog() -> Vec<Tool> {
    vec![
        tool("get_stock_quote", "Get real-time stock quote for a symbol", symbol_schema()),
        tool(
            "get_company_overview",
            "Get company overview and fundamental data",
            symbol_schema(),
        ),
        tool(
            "get_daily_prices",
            "Get daily historical stock prices",
            json!({
                "type": "object",
                "properties": {
                    "symbol": { "type": "string", "description": "Stock symbol (e.g., AAPL, MSFT, GOOGL)" },
                    "outputsize": {
                        "type": "string",
                        "description": "Amount of data to return",
                        "enum": ["compact", "full"],
                        "default": "compact"
                    }
                },
                "required": ["symbol"]
            }),
        ),
        tool(
            "search_stocks",
            "Search for stock symbols by company name or keywords",
            json!({
                "type": "object",
                "properties": {
                    "keywords": { "type": "string", "description": "Company name or keywords to search for" }
                },
                "required": ["keywords"]
            }),
        ),
        tool(
            "get_portfolio_summary",
            "Get quotes for multiple stocks (portfolio view)",
            json!({
                "type": "object",
                "properties": {
                    "symbols": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "List of stock symbols"
                    }
                },
                "required": ["symbols"]
            }),
        ),
    ]
}

/// History depth for daily prices.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputSize {
    /// Last 100 sessions.
    #[default]
    Compact,
    /// Full history.
    Full,
}

impl OutputSize {
    /// Query-string value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Full => "full",
        }
    }
}

/// Single-symbol arguments.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SymbolArgs {
    /// Ticker, upper-cased during normalization.
    pub symbol: String,
}

/// `get_daily_prices` arguments.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DailyArgs {
    /// Ticker.
    pub symbol: String,
    /// History depth.
    #[serde(default)]
    pub outputsize: OutputSize,
}

/// `search_stocks` arguments.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SearchArgs {
    /// Company name or keywords.
    pub keywords: String,
}

/// `get_portfolio_summary` arguments.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PortfolioArgs {
    /// Tickers in the portfolio.
    pub symbols: Vec<String>,
}

/// Decoded stocks invocation.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "tool", content = "arguments", rename_all = "snake_case")]
pub enum StocksRequest {
    /// `get_stock_quote`
    GetStockQuote(SymbolArgs),
    /// `get_company_overview`
    GetCompanyOverview(SymbolArgs),
    /// `get_daily_prices`
    GetDailyPrices(DailyArgs),
    /// `search_stocks`
    SearchStocks(SearchArgs),
    /// `get_portfolio_summary`
    GetPortfolioSummary(PortfolioArgs),
}

fn ticker(symbol: &str) -> ToolResult<String> {
    let symbol = symbol.trim();
    if symbol.is_empty() {
        return Err(ToolError::invalid("Symbol is required"));
    }
    Ok(symbol.to_uppercase())
}

impl ToolRequest for StocksRequest {
    fn normalize(self) -> ToolResult<Self> {
        Ok(match self {
            Self::GetStockQuote(args) => Self::GetStockQuote(SymbolArgs {
                symbol: ticker(&args.symbol)?,
            }),
            Self::GetCompanyOverview(args) => Self::GetCompanyOverview(SymbolArgs {
                symbol: ticker(&args.symbol)?,
            }),
            Self::GetDailyPrices(args) => Self::GetDailyPrices(DailyArgs {
                symbol: ticker(&args.symbol)?,
                outputsize: args.outputsize,
            }),
            Self::SearchStocks(args) => {
                if args.keywords.trim().is_empty() {
                    return Err(ToolError::invalid("Keywords are required"));
                }
                Self::SearchStocks(args)
            }
            Self::GetPortfolioSummary(args) => {
                if args.symbols.is_empty() {
                    return Err(ToolError::invalid("At least one symbol is required"));
                }
                Self::GetPortfolioSummary(args)
            }
        })
    }
}
