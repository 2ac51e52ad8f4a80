use data_adapters::stocks::format::{self, Position};
use data_adapters::stocks::quotes::{CompanyOverview, DailyPrice, Quote, SymbolMatch};

fn quote(symbol: &str, price: f64, change: f64) -> Quote {
    Quote {
        symbol: symbol.into(),
        price,
        change,
        change_percent: format!("{change:.2}%"),
        volume: 52_164_528,
        latest_trading_day: "2024-05-01".into(),
        previous_close: price - change,
        open: price,
        high: price,
        low: price,
    }
}

#[test]
fn quote_card_groups_volume() {
    let card = format::quote(&quote("AAPL", 169.3, -1.25));
    assert!(card.starts_with("📈 **AAPL Stock Quote**"));
    assert!(card.contains("**Current Price:** $169.30"));
    assert!(card.contains("**Change:** $-1.25 (-1.25%)"));
    assert!(card.contains("**Volume:** 52,164,528"));
    assert!(card.ends_with("**Latest Trading Day:** 2024-05-01"));
}

#[test]
fn overview_truncates_description() {
    let overview = CompanyOverview {
        symbol: "IBM".into(),
        name: "IBM".into(),
        description: "x".repeat(500),
        ..CompanyOverview::default()
    };
    let card = format::overview(&overview);
    assert!(card.contains(&format!("{}...", "x".repeat(300))));
    assert!(!card.contains(&"x".repeat(301)));
}

#[test]
fn daily_prices_mark_direction() {
    let bars = [
        DailyPrice {
            date: "2024-05-02".into(),
            open: 100.0,
            high: 104.0,
            low: 99.0,
            close: 102.0,
            adjusted_close: 102.0,
            volume: 1_500,
        },
        DailyPrice {
            date: "2024-05-01".into(),
            open: 100.0,
            high: 101.0,
            low: 95.0,
            close: 96.0,
            adjusted_close: 96.0,
            volume: 900,
        },
    ];
    let report = format::daily_prices("IBM", &bars);
    assert!(report.starts_with("📊 **IBM - Recent Daily Prices**"));
    assert!(report.contains("**2024-05-02** 📈"));
    assert!(report.contains("Change: +2.00 (+2.0%)"));
    assert!(report.contains("**2024-05-01** 📉"));
    assert!(report.contains("Volume: 1,500"));
}

#[test]
fn search_results_list_matches() {
    let matches = [SymbolMatch {
        symbol: "TSCO.LON".into(),
        name: "Tesco PLC".into(),
        kind: "Equity".into(),
        region: "United Kingdom".into(),
        currency: "GBX".into(),
        match_score: "0.7273".into(),
    }];
    let report = format::search_results("tesco", &matches);
    assert!(report.contains("**TSCO.LON** - Tesco PLC"));
    assert!(report.contains("Currency: GBX | Match Score: 0.7273"));
}

#[test]
fn portfolio_isolates_failed_positions() {
    let positions = [
        Position::Quoted(quote("AAPL", 100.0, 1.0)),
        Position::Failed {
            symbol: "ZZZZ".into(),
            message: "No data found for symbol: ZZZZ".into(),
        },
        Position::Quoted(quote("MSFT", 250.5, -2.0)),
    ];
    let report = format::portfolio(&positions);
    assert!(report.contains("🟢 **AAPL**: $100.00"));
    assert!(report.contains("❌ **ZZZZ**: Error - No data found for symbol: ZZZZ"));
    assert!(report.contains("🔴 **MSFT**: $250.50"));
    assert!(report.contains("- Total Current Value: $350.50"));
    assert!(report.contains("- Number of Positions: 3"));
}
