//! Alpha Vantage adapter: quotes, fundamentals, daily history, symbol
//! search, and portfolio summaries rendered as text reports.

pub mod format;
pub mod provider;
pub mod quotes;
pub mod tools;

use std::sync::Arc;

use rmcp::model::Tool;
use tracing::warn;

use crate::errors::ToolResult;
use crate::mcp::{BoxFuture, Payload, ToolSet};

use self::format::Position;
use self::provider::StocksApi;
use self::quotes::Quote;
use self::tools::StocksRequest;

/// Server name announced to the host.
pub const SERVER_NAME: &str = "stock-data";

const INSTRUCTIONS: &str = "Stock market data from Alpha Vantage. The free tier allows a \
    handful of calls per minute; rate-limit notices are reported as errors.";

/// Stock tool set over any [`StocksApi`].
pub struct StockTools {
    api: Arc<dyn StocksApi>,
}

impl StockTools {
    /// Create the tool set.
    pub fn new(api: Arc<dyn StocksApi>) -> Self {
        Self { api }
    }

    /// Fetch one quote.
    ///
    /// # Errors
    ///
    /// Propagates upstream failures; `NotFound` when no quote exists.
    pub async fn quote(&self, symbol: &str) -> ToolResult<Quote> {
        let body = self
            .api
            .query(vec![("function", "GLOBAL_QUOTE".into()), ("symbol", symbol.to_uppercase())])
            .await?;
        quotes::parse_quote(&body, symbol)
    }

    async fn run(&self, request: StocksRequest) -> ToolResult<Payload> {
        let report = match request {
            StocksRequest::GetStockQuote(args) => format::quote(&self.quote(&args.symbol).await?),
            StocksRequest::GetCompanyOverview(args) => {
                let body = self
                    .api
                    .query(vec![("function", "OVERVIEW".into()), ("symbol", args.symbol.clone())])
                    .await?;
                format::overview(&quotes::parse_overview(&body, &args.symbol)?)
            }
            StocksRequest::GetDailyPrices(args) => {
                let body = self
                    .api
                    .query(vec![
                        ("function", "TIME_SERIES_DAILY_ADJUSTED".into()),
                        ("symbol", args.symbol.clone()),
                        ("outputsize", args.outputsize.as_str().into()),
                    ])
                    .await?;
                format::daily_prices(&args.symbol, &quotes::parse_daily(&body, &args.symbol)?)
            }
            StocksRequest::SearchStocks(args) => {
                let body = self
                    .api
                    .query(vec![("function", "SYMBOL_SEARCH".into()), ("keywords", args.keywords.clone())])
                    .await?;
                format::search_results(&args.keywords, &quotes::parse_matches(&body))
            }
            StocksRequest::GetPortfolioSummary(args) => {
                let mut positions = Vec::with_capacity(args.symbols.len());
                for symbol in &args.symbols {
                    match self.quote(symbol).await {
                        Ok(quote) => positions.push(Position::Quoted(quote)),
                        Err(err) => {
                            warn!(symbol = %symbol, %err, "portfolio quote failed");
                            positions.push(Position::Failed {
                                symbol: symbol.clone(),
                                message: err.message,
                            });
                        }
                    }
                }
                format::portfolio(&positions)
            }
        };
        Ok(Payload::Text(report))
    }
}

impl ToolSet for StockTools {
    type Request = StocksRequest;

    fn server_name(&self) -> &'static str {
        SERVER_NAME
    }

    fn instructions(&self) -> &'static str {
        INSTRUCTIONS
    }

    fn catalog(&self) -> Vec<Tool> {
        tools::catalog()
    }

    fn execute(&self, request: StocksRequest) -> BoxFuture<'_, ToolResult<Payload>> {
        Box::pin(self.run(request))
    }

    fn close(&self) -> BoxFuture<'_, ()> {
        self.api.close()
    }
}
