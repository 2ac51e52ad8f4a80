//! Model Context Protocol server layer shared by every adapter.

pub mod catalog;
pub mod dispatch;
pub mod handler;
pub mod payload;
pub mod transport;

pub use dispatch::{BoxFuture, Dispatcher, ToolRequest, ToolSet};
pub use payload::Payload;
