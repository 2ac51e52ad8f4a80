use std::sync::Arc;

use data_adapters::mcp::Dispatcher;
use data_adapters::news::NewsTools;
use data_adapters::ToolError;
use serde_json::{json, Value};

use super::test_helpers::{args, body, error_body, param, Params, StubApi};

fn dispatcher(api: &Arc<StubApi>) -> Dispatcher<NewsTools> {
    Dispatcher::new(NewsTools::new(api.clone()))
}

fn headlines(title: &str) -> Value {
    json!({
        "status": "ok",
        "totalResults": 42,
        "articles": [{
            "source": { "id": null, "name": "Example Times" },
            "author": null,
            "title": title,
            "description": "desc",
            "url": "https://example.com/a",
            "urlToImage": null,
            "publishedAt": "2024-01-01T00:00:00Z",
            "content": "body"
        }]
    })
}

#[tokio::test]
async fn top_headlines_defaults_to_us() {
    let api = StubApi::new(|_, _| Ok(headlines("Hello")));
    let result = dispatcher(&api).call("get_top_headlines", args(json!({}))).await;

    let body = body(&result);
    assert_eq!(body["total_results"], json!(42));
    assert_eq!(body["country"], json!("us"));
    assert_eq!(body["article_count"], json!(1));
    assert_eq!(body["articles"][0]["source"], json!("Example Times"));
    assert_eq!(body["articles"][0]["author"], json!(""));

    let calls = api.calls.lock().unwrap();
    assert_eq!(calls[0].0, "top-headlines");
    assert_eq!(param(&calls[0].1, "country"), Some("us"));
    assert_eq!(param(&calls[0].1, "pageSize"), Some("10"));
    assert_eq!(param(&calls[0].1, "q"), None);
}

#[tokio::test]
async fn search_forwards_filters() {
    let api = StubApi::new(|_, _| Ok(headlines("Rust 2.0")));
    let result = dispatcher(&api)
        .call(
            "search_news",
            args(json!({ "query": "rust", "sort_by": "popularity", "from_date": "2024-01-01" })),
        )
        .await;

    let body = body(&result);
    assert_eq!(body["query"], json!("rust"));
    assert_eq!(body["sort_by"], json!("popularity"));

    let calls = api.calls.lock().unwrap();
    assert_eq!(calls[0].0, "everything");
    let params = &calls[0].1;
    assert_eq!(param(params, "sortBy"), Some("popularity"));
    assert_eq!(param(params, "searchIn"), Some("title,description"));
    assert_eq!(param(params, "from"), Some("2024-01-01"));
    assert_eq!(param(params, "to"), None);
}

#[tokio::test]
async fn sources_echo_filters() {
    let api = StubApi::new(|_, _| {
        Ok(json!({
            "status": "ok",
            "sources": [{ "id": "bbc-news", "name": "BBC News", "category": "general", "language": "en", "country": "gb" }]
        }))
    });
    let result = dispatcher(&api)
        .call("get_sources", args(json!({ "country": "gb" })))
        .await;

    let body = body(&result);
    assert_eq!(body["source_count"], json!(1));
    assert_eq!(body["filters"]["country"], json!("gb"));
    assert_eq!(body["filters"]["category"], json!(null));
    assert_eq!(body["sources"][0]["id"], json!("bbc-news"));
    assert_eq!(api.endpoints(), ["top-headlines/sources"]);
}

#[tokio::test]
async fn category_news_isolates_country_failures() {
    let api = StubApi::new(|_, params: &Params| match param(params, "country") {
        Some("de") => Err(ToolError::rate_limited("API rate limit exceeded. Please try again later.")),
        Some(country) => Ok(headlines(&format!("{country} tech"))),
        None => Err(ToolError::invalid("country missing")),
    });
    let result = dispatcher(&api)
        .call(
            "get_category_news",
            args(json!({ "category": "technology", "countries": ["us", "de", "gb"] })),
        )
        .await;

    assert_ne!(result.is_error, Some(true));
    let body = body(&result);
    assert_eq!(body["category"], json!("technology"));
    assert_eq!(body["countries_count"], json!(3));

    let groups = body["news_by_country"].as_array().unwrap();
    assert_eq!(groups.len(), 3);
    assert_eq!(groups[0]["country"], json!("us"));
    assert_eq!(groups[0]["articles"][0]["country"], json!("us"));
    assert_eq!(groups[0]["articles"][0]["title"], json!("us tech"));
    assert_eq!(groups[1]["country"], json!("de"));
    assert!(groups[1]["error"].as_str().unwrap().contains("rate limit"));
    assert_eq!(groups[2]["article_count"], json!(1));

    for (_, params) in api.calls.lock().unwrap().iter() {
        assert_eq!(param(params, "category"), Some("technology"));
        assert_eq!(param(params, "pageSize"), Some("5"));
    }
}

#[tokio::test]
async fn single_lookup_failure_is_an_error() {
    let api = StubApi::new(|_, _| Err(ToolError::not_found("The news source you've entered doesn't exist.")));
    let result = dispatcher(&api)
        .call("get_headlines_by_source", args(json!({ "source": "nope" })))
        .await;

    let body = error_body(&result);
    assert_eq!(body["kind"], json!("not_found"));
}
