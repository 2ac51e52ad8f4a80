//! Tool menus advertised by each server.
//!
//! Every name listed here must be routable by the server's dispatcher, and
//! nothing else may be.

use std::sync::Arc;

use data_adapters::config::GlobalConfig;
use data_adapters::finance::store::PgFinanceStore;
use data_adapters::finance::FinanceTools;
use data_adapters::gmail::mailbox::GmailClient;
use data_adapters::gmail::GmailTools;
use data_adapters::mcp::{Dispatcher, ToolSet};
use data_adapters::news::provider::NewsApiClient;
use data_adapters::news::NewsTools;
use data_adapters::stocks::provider::AlphaVantageClient;
use data_adapters::stocks::StockTools;
use data_adapters::weather::provider::OpenWeatherClient;
use data_adapters::weather::WeatherTools;
use data_adapters::{finance, gmail, news, stocks, weather};

fn names<T: ToolSet>(tools: &T) -> Vec<String> {
    tools.catalog().iter().map(|tool| tool.name.to_string()).collect()
}

#[test]
fn finance_menu() {
    let config = GlobalConfig::default();
    let tools = FinanceTools::new(Arc::new(PgFinanceStore::new(config.finance)), "money_stuff");
    assert_eq!(tools.server_name(), finance::SERVER_NAME);
    assert_eq!(
        names(&tools),
        [
            "get_spending_summary",
            "get_recent_transactions",
            "get_monthly_totals",
            "get_category_breakdown",
            "search_transactions",
            "list_categories",
            "list_persons",
            "list_accounts",
            "get_database_status",
            "execute_select_query",
        ]
    );
}

#[test]
fn gmail_menu() {
    let tools = GmailTools::new(Arc::new(GmailClient::new(GlobalConfig::default().gmail)));
    assert_eq!(tools.server_name(), gmail::SERVER_NAME);
    assert_eq!(
        names(&tools),
        [
            "search_emails",
            "delete_emails",
            "star_emails",
            "unstar_emails",
            "mark_as_read",
            "mark_as_unread",
            "archive_emails",
            "get_email_details",
        ]
    );
}

#[test]
fn news_menu() {
    let tools = NewsTools::new(Arc::new(NewsApiClient::new(GlobalConfig::default().news)));
    assert_eq!(tools.server_name(), news::SERVER_NAME);
    assert_eq!(
        names(&tools),
        [
            "get_top_headlines",
            "search_news",
            "get_sources",
            "get_headlines_by_source",
            "get_category_news",
        ]
    );
}

#[test]
fn weather_menu() {
    let tools = WeatherTools::new(Arc::new(OpenWeatherClient::new(GlobalConfig::default().weather)));
    assert_eq!(tools.server_name(), weather::SERVER_NAME);
    assert_eq!(
        names(&tools),
        [
            "get_current_weather",
            "get_forecast",
            "get_air_quality",
            "search_locations",
            "get_weather_alerts",
            "get_multi_location_weather",
        ]
    );
}

#[test]
fn stocks_menu() {
    let tools = StockTools::new(Arc::new(AlphaVantageClient::new(GlobalConfig::default().stocks)));
    assert_eq!(tools.server_name(), stocks::SERVER_NAME);
    assert_eq!(
        names(&tools),
        [
            "get_stock_quote",
            "get_company_overview",
            "get_daily_prices",
            "search_stocks",
            "get_portfolio_summary",
        ]
    );
}

#[test]
fn dispatcher_snapshots_the_catalog() {
    let tools = StockTools::new(Arc::new(AlphaVantageClient::new(GlobalConfig::default().stocks)));
    let expected = names(&tools);
    let dispatcher = Dispatcher::new(tools);
    let listed: Vec<String> = dispatcher
        .catalog()
        .iter()
        .map(|tool| tool.name.to_string())
        .collect();
    assert_eq!(listed, expected);
}

#[test]
fn instructions_are_announced() {
    let config = GlobalConfig::default();
    let news = NewsTools::new(Arc::new(NewsApiClient::new(config.news)));
    assert!(!news.instructions().is_empty());
    let weather = WeatherTools::new(Arc::new(OpenWeatherClient::new(config.weather)));
    assert!(weather.instructions().contains("lat,lon"));
}
