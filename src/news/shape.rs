//! Flattening of NewsAPI articles and sources.

use serde_json::{json, Value};

fn field(data: &Value, key: &str) -> Value {
    match data.get(key) {
        Some(Value::Null) | None => Value::String(String::new()),
        Some(value) => value.clone(),
    }
}

/// Flatten one article to the fields callers care about.
#[must_use]
pub fn article(raw: &Value) -> Value {
    json!({
        "title": field(raw, "title"),
        "description": field(raw, "description"),
        "author": field(raw, "author"),
        "source": raw.pointer("/source/name").and_then(Value::as_str).unwrap_or(""),
        "url": field(raw, "url"),
        "image_url": field(raw, "urlToImage"),
        "published_at": field(raw, "publishedAt"),
        "content": field(raw, "content"),
    })
}

/// Flatten every article in a response body.
#[must_use]
pub fn articles(body: &Value) -> Vec<Value> {
    body.get("articles")
        .and_then(Value::as_array)
        .map(|items| items.iter().map(article).collect())
        .unwrap_or_default()
}

/// Reported `totalResults`, zero when absent.
#[must_use]
pub fn total_results(body: &Value) -> i64 {
    body.get("totalResults").and_then(Value::as_i64).unwrap_or(0)
}

/// Flatten the `sources` listing.
#[must_use]
pub fn sources(body: &Value) -> Vec<Value> {
    body.get("sources")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|source| {
                    json!({
                        "id": field(source, "id"),
                        "name": field(source, "name"),
                        "description": field(source, "description"),
                        "url": field(source, "url"),
                        "category": field(source, "category"),
                        "language": field(source, "language"),
                        "country": field(source, "country"),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}
