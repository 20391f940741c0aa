pub mod arrivals;
pub mod fetch_utils;
pub mod http_client;
pub mod urls;

// Re-export URL utilities
pub use urls::*;
// Re-export HTTP client utilities
pub use http_client::create_http_client_with_timeout;
pub use arrivals::{ArrivalsFetcher, ArrivalsSource};
pub use fetch_utils::{fetch, fetch_text, parse_json_body};
