#![forbid(unsafe_code)]

//! MCP tool servers adapting a personal-finance database, Gmail, NewsAPI,
//! OpenWeatherMap, and Alpha Vantage.

pub mod config;
pub mod errors;
pub mod finance;
pub mod gmail;
pub mod http;
pub mod mcp;
pub mod news;
pub mod stocks;
pub mod weather;

pub use config::GlobalConfig;
pub use errors::{AppError, ErrorKind, Result, ToolError, ToolResult};
