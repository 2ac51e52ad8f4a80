use data_adapters::news::shape;
use serde_json::json;

#[test]
fn articles_are_flattened() {
    let body = json!({
        "status": "ok",
        "totalResults": 2,
        "articles": [
            {
                "source": { "id": "bbc-news", "name": "BBC News" },
                "author": "Jane Doe",
                "title": "Rates held",
                "description": "The bank held rates.",
                "url": "https://bbc.co.uk/1",
                "urlToImage": "https://bbc.co.uk/1.jpg",
                "publishedAt": "2024-05-01T10:00:00Z",
                "content": "Full text"
            },
            { "source": { "id": null, "name": null }, "title": "Bare" }
        ]
    });

    let articles = shape::articles(&body);
    assert_eq!(shape::total_results(&body), 2);
    assert_eq!(articles.len(), 2);
    assert_eq!(
        articles[0],
        json!({
            "title": "Rates held",
            "description": "The bank held rates.",
            "author": "Jane Doe",
            "source": "BBC News",
            "url": "https://bbc.co.uk/1",
            "image_url": "https://bbc.co.uk/1.jpg",
            "published_at": "2024-05-01T10:00:00Z",
            "content": "Full text",
        })
    );
    assert_eq!(articles[1]["source"], json!(""));
    assert_eq!(articles[1]["url"], json!(""));
}

#[test]
fn missing_articles_yield_empty_list() {
    assert!(shape::articles(&json!({ "status": "ok" })).is_empty());
    assert_eq!(shape::total_results(&json!({})), 0);
}

#[test]
fn sources_are_flattened() {
    let body = json!({
        "sources": [{
            "id": "the-verge", "name": "The Verge", "description": null,
            "url": "https://www.theverge.com", "category": "technology",
            "language": "en", "country": "us"
        }]
    });
    let sources = shape::sources(&body);
    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0]["id"], json!("the-verge"));
    assert_eq!(sources[0]["description"], json!(""));
    assert_eq!(sources[0]["category"], json!("technology"));
}
