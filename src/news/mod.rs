//! NewsAPI adapter: headlines, keyword search, sources, and per-country
//! category roundups.

pub mod provider;
pub mod shape;
pub mod tools;

use std::sync::Arc;

use rmcp::model::Tool;
use serde_json::{json, Value};
use tracing::warn;

use crate::errors::ToolResult;
use crate::mcp::{BoxFuture, Payload, ToolSet};

use self::provider::NewsApi;
use self::tools::{
    CategoryNewsArgs, HeadlinesArgs, NewsRequest, SearchArgs, SourceHeadlinesArgs, SourcesArgs,
};

/// Server name announced to the host.
pub const SERVER_NAME: &str = "news-data";

const INSTRUCTIONS: &str = "News from NewsAPI. Use get_sources to discover source ids; \
    category news fans out over at most five countries.";

/// News tool set over any [`NewsApi`].
pub struct NewsTools {
    api: Arc<dyn NewsApi>,
}

impl NewsTools {
    /// Create the tool set.
    pub fn new(api: Arc<dyn NewsApi>) -> Self {
        Self { api }
    }

    async fn top_headlines(&self, args: HeadlinesArgs) -> ToolResult<Value> {
        let mut params = vec![
            ("country", args.country.clone()),
            ("pageSize", args.page_size.to_string()),
        ];
        if let Some(category) = args.category {
            params.push(("category", category.as_str().to_owned()));
        }
        if let Some(query) = &args.query {
            params.push(("q", query.clone()));
        }

        let body = self.api.get("top-headlines", params).await?;
        let articles = shape::articles(&body);
        Ok(json!({
            "total_results": shape::total_results(&body),
            "country": args.country,
            "category": args.category.map(|c| c.as_str()),
            "query": args.query,
            "article_count": articles.len(),
            "articles": articles,
        }))
    }

    async fn search(&self, args: SearchArgs) -> ToolResult<Value> {
        let mut params = vec![
            ("q", args.query.clone()),
            ("searchIn", args.search_in.clone()),
            ("sortBy", args.sort_by.as_str().to_owned()),
            ("language", args.language.clone()),
            ("pageSize", args.page_size.to_string()),
        ];
        if let Some(from) = &args.from_date {
            params.push(("from", from.clone()));
        }
        if let Some(to) = &args.to_date {
            params.push(("to", to.clone()));
        }

        let body = self.api.get("everything", params).await?;
        let articles = shape::articles(&body);
        Ok(json!({
            "total_results": shape::total_results(&body),
            "query": args.query,
            "sort_by": args.sort_by.as_str(),
            "language": args.language,
            "article_count": articles.len(),
            "articles": articles,
        }))
    }

    async fn sources(&self, args: SourcesArgs) -> ToolResult<Value> {
        let mut params = Vec::new();
        if let Some(category) = args.category {
            params.push(("category", category.as_str().to_owned()));
        }
        if let Some(language) = &args.language {
            params.push(("language", language.clone()));
        }
        if let Some(country) = &args.country {
            params.push(("country", country.clone()));
        }

        let body = self.api.get("top-headlines/sources", params).await?;
        let sources = shape::sources(&body);
        Ok(json!({
            "source_count": sources.len(),
            "filters": {
                "category": args.category.map(|c| c.as_str()),
                "language": args.language,
                "country": args.country,
            },
            "sources": sources,
        }))
    }

    async fn by_source(&self, args: SourceHeadlinesArgs) -> ToolResult<Value> {
        let params = vec![
            ("sources", args.source.clone()),
            ("pageSize", args.page_size.to_string()),
        ];
        let body = self.api.get("top-headlines", params).await?;
        let articles = shape::articles(&body);
        Ok(json!({
            "total_results": shape::total_results(&body),
            "source": args.source,
            "article_count": articles.len(),
            "articles": articles,
        }))
    }

    async fn category_news(&self, args: CategoryNewsArgs) -> Value {
        let mut by_country = Vec::with_capacity(args.countries.len());
        for country in &args.countries {
            let params = vec![
                ("country", country.clone()),
                ("category", args.category.as_str().to_owned()),
                ("pageSize", args.page_size.to_string()),
            ];
            match self.api.get("top-headlines", params).await {
                Ok(body) => {
                    let articles: Vec<Value> = shape::articles(&body)
                        .into_iter()
                        .map(|mut article| {
                            if let Value::Object(map) = &mut article {
                                map.insert("country".into(), Value::String(country.clone()));
                            }
                            article
                        })
                        .collect();
                    by_country.push(json!({
                        "country": country,
                        "article_count": articles.len(),
                        "articles": articles,
                    }));
                }
                Err(err) => {
                    warn!(country = %country, %err, "category news lookup failed");
                    by_country.push(json!({ "country": country, "error": err.message }));
                }
            }
        }

        json!({
            "category": args.category.as_str(),
            "countries_count": args.countries.len(),
            "news_by_country": by_country,
        })
    }

    async fn run(&self, request: NewsRequest) -> ToolResult<Payload> {
        let body = match request {
            NewsRequest::GetTopHeadlines(args) => self.top_headlines(args).await?,
            NewsRequest::SearchNews(args) => self.search(args).await?,
            NewsRequest::GetSources(args) => self.sources(args).await?,
            NewsRequest::GetHeadlinesBySource(args) => self.by_source(args).await?,
            NewsRequest::GetCategoryNews(args) => self.category_news(args).await,
        };
        Ok(Payload::Json(body))
    }
}

impl ToolSet for NewsTools {
    type Request = NewsRequest;

    fn server_name(&self) -> &'static str {
        SERVER_NAME
    }

    fn instructions(&self) -> &'static str {
        INSTRUCTIONS
    }

    fn catalog(&self) -> Vec<Tool> {
        tools::catalog()
    }

    fn execute(&self, request: NewsRequest) -> BoxFuture<'_, ToolResult<Payload>> {
        Box::pin(self.run(request))
    }

    fn close(&self) -> BoxFuture<'_, ()> {
        self.api.close()
    }
}
