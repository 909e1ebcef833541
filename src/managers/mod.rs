pub mod http_tool;

pub use http_tool::HttpToolManager;
