//! News tool catalog and request decoding.

use rmcp::model::Tool;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::errors::{ToolError, ToolResult};
use crate::mcp::catalog::tool;
use crate::mcp::ToolRequest;

/// NewsAPI page size ceiling.
pub const MAX_PAGE_SIZE: i64 = 100;
/// Per-country page size ceiling for category news.
pub const MAX_CATEGORY_PAGE_SIZE: i64 = 20;
/// Countries queried per category-news call.
pub const MAX_CATEGORY_COUNTRIES: usize = 5;

const CATEGORIES: [&str; 7] = [
    "business",
    "entertainment",
    "general",
    "health",
    "science",
    "sports",
    "technology",
];

const COUNTRIES: &str = "us, gb, ca, au, de, fr, it, es, nl, no, se, jp, kr, cn, in, br, mx, ar";

/// NewsAPI headline category.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// business
    Business,
    /// entertainment
    Entertainment,
    /// general
    General,
    /// health
    Health,
    /// science
    Science,
    /// sports
    Sports,
    /// technology
    Technology,
}

impl Category {
    /// Query-string value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Business => "business",
            Self::Entertainment => "entertainment",
            Self::General => "general",
            Self::Health => "health",
            Self::Science => "science",
            Self::Sports => "sports",
            Self::Technology => "technology",
        }
    }
}

/// Sort order for `everything` searches.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
pub enum SortBy {
    /// relevancy
    #[serde(rename = "relevancy")]
    Relevancy,
    /// popularity
    #[serde(rename = "popularity")]
    Popularity,
    /// publishedAt
    #[default]
    #[serde(rename = "publishedAt")]
    PublishedAt,
}

impl SortBy {
    /// Query-string value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Relevancy => "relevancy",
            Self::Popularity => "popularity",
            Self::PublishedAt => "publishedAt",
        }
    }
}

fn page_size_schema(default: i64, maximum: i64) -> Value {
    json!({
        "type": "integer",
        "description": format!("Number of results to return (max {maximum})"),
        "default": default,
        "minimum": 1,
        "maximum": maximum
    })
}

fn category_schema(description: &str) -> Value {
    json!({
        "type": "string",
        "description": format!("{description}. Options: {}", CATEGORIES.join(", ")),
        "enum": CATEGORIES
    })
}

/// Static news catalog.
#[must_use]
pub fn catalog() -> Vec<Tool> {
    vec![
        tool(
            "get_top_headlines",
            "Get top news headlines by country, category, or source",
            json!({
                "type": "object",
                "properties": {
                    "country": {
                        "type": "string",
                        "description": format!("2-letter country code (e.g., 'us', 'gb', 'de'). Options: {COUNTRIES}"),
                        "default": "us"
                    },
                    "category": category_schema("News category"),
                    "query": { "type": "string", "description": "Keywords to search for in headlines" },
                    "page_size": page_size_schema(10, MAX_PAGE_SIZE)
                },
                "required": []
            }),
        ),
        tool(
            "search_news",
            "Search for news articles by keyword across all sources",
            json!({
                "type": "object",
                "properties": {
                    "query": { "type": "string", "description": "Keywords or phrases to search for" },
                    "search_in": {
                        "type": "string",
                        "description": "Where to search: 'title', 'description', 'content', or comma-separated combination",
                        "default": "title,description"
                    },
                    "sort_by": {
                        "type": "string",
                        "description": "Sort order. Options: relevancy, popularity, publishedAt",
                        "enum": ["relevancy", "popularity", "publishedAt"],
                        "default": "publishedAt"
                    },
                    "language": {
                        "type": "string",
                        "description": "2-letter language code (e.g., 'en', 'es', 'fr')",
                        "default": "en"
                    },
                    "from_date": { "type": "string", "description": "Oldest article date (ISO 8601 format: YYYY-MM-DD)" },
                    "to_date": { "type": "string", "description": "Newest article date (ISO 8601 format: YYYY-MM-DD)" },
                    "page_size": page_size_schema(10, MAX_PAGE_SIZE)
                },
                "required": ["query"]
            }),
        ),
        tool(
            "get_sources",
            "Get available news sources, optionally filtered by category, language, or country",
            json!({
                "type": "object",
                "properties": {
                    "category": category_schema("Filter by category"),
                    "language": { "type": "string", "description": "Filter by language (e.g., 'en', 'es', 'fr')" },
                    "country": { "type": "string", "description": format!("Filter by country code. Options: {COUNTRIES}") }
                },
                "required": []
            }),
        ),
        tool(
            "get_headlines_by_source",
            "Get top headlines from a specific news source",
            json!({
                "type": "object",
                "properties": {
                    "source": {
                        "type": "string",
                        "description": "News source ID (e.g., 'bbc-news', 'cnn', 'the-verge'). Use get_sources to find valid IDs."
                    },
                    "page_size": page_size_schema(10, MAX_PAGE_SIZE)
                },
                "required": ["source"]
            }),
        ),
        tool(
            "get_category_news",
            "Get news for a specific category across multiple countries",
            json!({
                "type": "object",
                "properties": {
                    "category": category_schema("News category"),
                    "countries": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": format!("List of country codes. Options: {COUNTRIES}"),
                        "default": ["us"]
                    },
                    "page_size": page_size_schema(5, MAX_CATEGORY_PAGE_SIZE)
                },
                "required": ["category"]
            }),
        ),
    ]
}

fn default_country() -> String {
    "us".into()
}

fn default_countries() -> Vec<String> {
    vec![default_country()]
}

fn default_page_size() -> i64 {
    10
}

fn default_category_page_size() -> i64 {
    5
}

fn default_search_in() -> String {
    "title,description".into()
}

fn default_language() -> String {
    "en".into()
}

/// `get_top_headlines` arguments.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct HeadlinesArgs {
    /// Two-letter country code.
    #[serde(default = "default_country")]
    pub country: String,
    /// Optional category filter.
    #[serde(default)]
    pub category: Option<Category>,
    /// Optional keyword filter.
    #[serde(default)]
    pub query: Option<String>,
    /// Page size, clamped to 1..=100.
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

/// `search_news` arguments.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SearchArgs {
    /// Keywords or phrases.
    pub query: String,
    /// Fields to search.
    #[serde(default = "default_search_in")]
    pub search_in: String,
    /// Sort order.
    #[serde(default)]
    pub sort_by: SortBy,
    /// Two-letter language code.
    #[serde(default = "default_language")]
    pub language: String,
    /// Oldest article date.
    #[serde(default)]
    pub from_date: Option<String>,
    /// Newest article date.
    #[serde(default)]
    pub to_date: Option<String>,
    /// Page size, clamped to 1..=100.
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

/// `get_sources` filters.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct SourcesArgs {
    /// Category filter.
    #[serde(default)]
    pub category: Option<Category>,
    /// Language filter.
    #[serde(default)]
    pub language: Option<String>,
    /// Country filter.
    #[serde(default)]
    pub country: Option<String>,
}

/// `get_headlines_by_source` arguments.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SourceHeadlinesArgs {
    /// NewsAPI source id.
    pub source: String,
    /// Page size, clamped to 1..=100.
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

/// `get_category_news` arguments.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CategoryNewsArgs {
    /// Category to fetch.
    pub category: Category,
    /// Country codes; only the first five are queried.
    #[serde(default = "default_countries")]
    pub countries: Vec<String>,
    /// Per-country page size, clamped to 1..=20.
    #[serde(default = "default_category_page_size")]
    pub page_size: i64,
}

/// Decoded news invocation.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "tool", content = "arguments", rename_all = "snake_case")]
pub enum NewsRequest {
    /// `get_top_headlines`
    GetTopHeadlines(HeadlinesArgs),
    /// `search_news`
    SearchNews(SearchArgs),
    /// `get_sources`
    GetSources(SourcesArgs),
    /// `get_headlines_by_source`
    GetHeadlinesBySource(SourceHeadlinesArgs),
    /// `get_category_news`
    GetCategoryNews(CategoryNewsArgs),
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

impl ToolRequest for NewsRequest {
    fn normalize(self) -> ToolResult<Self> {
        Ok(match self {
            Self::GetTopHeadlines(mut args) => {
                args.page_size = args.page_size.clamp(1, MAX_PAGE_SIZE);
                args.query = non_blank(args.query);
                Self::GetTopHeadlines(args)
            }
            Self::SearchNews(mut args) => {
                if args.query.trim().is_empty() {
                    return Err(ToolError::invalid("Query is required"));
                }
                args.page_size = args.page_size.clamp(1, MAX_PAGE_SIZE);
                args.from_date = non_blank(args.from_date);
                args.to_date = non_blank(args.to_date);
                Self::SearchNews(args)
            }
            Self::GetSources(mut args) => {
                args.language = non_blank(args.language);
                args.country = non_blank(args.country);
                Self::GetSources(args)
            }
            Self::GetHeadlinesBySource(mut args) => {
                if args.source.trim().is_empty() {
                    return Err(ToolError::invalid("Source is required"));
                }
                args.page_size = args.page_size.clamp(1, MAX_PAGE_SIZE);
                Self::GetHeadlinesBySource(args)
            }
            Self::GetCategoryNews(mut args) => {
                args.page_size = args.page_size.clamp(1, MAX_CATEGORY_PAGE_SIZE);
                args.countries.truncate(MAX_CATEGORY_COUNTRIES);
                Self::GetCategoryNews(args)
            }
        })
    }
}
