pub mod http;
pub mod tool;

pub use http::{HttpClient, HttpResponse, Sleeper};
pub use tool::{Tool, ToolResult, ToolSpec};
