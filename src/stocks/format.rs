//! Markdown-style text reports.

use std::fmt::Write as _;

use super::quotes::{CompanyOverview, DailyPrice, Quote, SymbolMatch};

const DESCRIPTION_PREVIEW: usize = 300;

/// Insert thousands separators: `1234567` becomes `1,234,567`.
#[must_use]
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Quote card.
#[must_use]
pub fn quote(quote: &Quote) -> String {
    format!(
        "📈 **{symbol} Stock Quote**\n\n\
         **Current Price:** ${price:.2}\n\
         **Change:** ${change:.2} ({change_percent})\n\
         **Volume:** {volume}\n\n\
         **Daily Range:**\n\
         - Open: ${open:.2}\n\
         - High: ${high:.2}\n\
         - Low: ${low:.2}\n\
         - Previous Close: ${previous_close:.2}\n\n\
         **Latest Trading Day:** {day}",
        symbol = quote.symbol,
        price = quote.price,
        change = quote.change,
        change_percent = quote.change_percent,
        volume = group_thousands(quote.volume),
        open = quote.open,
        high = quote.high,
        low = quote.low,
        previous_close = quote.previous_close,
        day = quote.latest_trading_day,
    )
}

/// Company profile with a truncated description.
#[must_use]
pub fn overview(overview: &CompanyOverview) -> String {
    let preview: String = overview.description.chars().take(DESCRIPTION_PREVIEW).collect();
    format!(
        "🏢 **{name} ({symbol})**\n\n\
         **Sector:** {sector}\n\
         **Industry:** {industry}\n\n\
         **Key Metrics:**\n\
         - Market Cap: {market_cap}\n\
         - P/E Ratio: {pe}\n\
         - EPS: {eps}\n\
         - Beta: {beta}\n\
         - Dividend Yield: {dividend}\n\n\
         **52-Week Range:** ${low} - ${high}\n\n\
         **Description:**\n{preview}...",
        name = overview.name,
        symbol = overview.symbol,
        sector = overview.sector,
        industry = overview.industry,
        market_cap = overview.market_cap,
        pe = overview.pe_ratio,
        eps = overview.eps,
        beta = overview.beta,
        dividend = overview.dividend_yield,
        low = overview.week52_low,
        high = overview.week52_high,
    )
}

/// Recent daily bars with intraday change.
#[must_use]
pub fn daily_prices(symbol: &str, prices: &[DailyPrice]) -> String {
    let mut out = format!("📊 **{symbol} - Recent Daily Prices**\n\n");
    for bar in prices {
        let change = bar.change();
        let direction = if change >= 0.0 { "📈" } else { "📉" };
        let _ = writeln!(out, "**{}** {direction}", bar.date);
        let _ = writeln!(
            out,
            "  Close: ${:.2} | Change: {change:+.2} ({:+.1}%)",
            bar.close,
            bar.change_percent()
        );
        let _ = writeln!(
            out,
            "  Range: ${:.2} - ${:.2} | Volume: {}\n",
            bar.low,
            bar.high,
            group_thousands(bar.volume)
        );
    }
    out
}

/// Symbol search listing.
#[must_use]
pub fn search_results(keywords: &str, matches: &[SymbolMatch]) -> String {
    if matches.is_empty() {
        return format!("No stocks found matching '{keywords}'");
    }
    let mut out = format!("🔍 **Search Results for '{keywords}'**\n\n");
    for entry in matches {
        let _ = writeln!(out, "**{}** - {}", entry.symbol, entry.name);
        let _ = writeln!(out, "  Type: {} | Region: {}", entry.kind, entry.region);
        let _ = writeln!(
            out,
            "  Currency: {} | Match Score: {}\n",
            entry.currency, entry.match_score
        );
    }
    out
}

/// One portfolio line: a quote or the failure for that symbol.
#[derive(Debug, Clone, PartialEq)]
pub enum Position {
    /// Quote retrieved.
    Quoted(Quote),
    /// Lookup failed for the symbol.
    Failed {
        /// Requested ticker.
        symbol: String,
        /// Failure message.
        message: String,
    },
}

/// Portfolio summary; the total sums the prices of quoted positions.
#[must_use]
pub fn portfolio(positions: &[Position]) -> String {
    let mut out = String::from("💼 **Portfolio Summary**\n\n");
    let mut total = 0.0;
    for position in positions {
        match position {
            Position::Quoted(quote) => {
                let marker = if quote.change >= 0.0 { "🟢" } else { "🔴" };
                let _ = writeln!(
                    out,
                    "{marker} **{}**: ${:.2} ({:+.2} | {})",
                    quote.symbol, quote.price, quote.change, quote.change_percent
                );
                total += quote.price;
            }
            Position::Failed { symbol, message } => {
                let _ = writeln!(out, "❌ **{symbol}**: Error - {message}");
            }
        }
    }
    let _ = write!(
        out,
        "\n**Portfolio Metrics:**\n- Total Current Value: ${total:.2}\n- Number of Positions: {}\n",
        positions.len()
    );
    out
}
