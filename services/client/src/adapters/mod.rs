pub mod http;

pub use http::HttpPortalAdapter;
