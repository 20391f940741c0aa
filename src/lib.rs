//! Tyne and Wear Metro arrivals board
//!
//! Polls the Nexus real-time information API for one station platform, filters
//! and formats the upcoming trains and draws them as a terminal board. Station
//! and platform lists are kept in a local cache that can be refreshed on demand.
//!
//! # Examples
//!
//! ```rust,no_run
//! use metro_rti::app::build_scheduler;
//! use metro_rti::data_fetcher::api::create_http_client_with_timeout;
//! use metro_rti::{AppError, Config};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AppError> {
//!     let config = Config {
//!         station: Some("MTS".into()),
//!         platform: Some("1".into()),
//!         ..Config::default()
//!     };
//!     let client = create_http_client_with_timeout(config.http_timeout_seconds)?;
//!
//!     let mut scheduler = build_scheduler(&config, client);
//!     scheduler.validate_selection().await;
//!     scheduler.run_cycle().await?;
//!
//!     for train in &scheduler.current().trains {
//!         println!("{} in {} min", train.destination(), train.due_in());
//!     }
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod board;
pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod data_fetcher;
pub mod error;
pub mod logging;
pub mod notifications;
pub mod scheduler;
pub mod template;
pub mod testing_utils;

// Re-export commonly used types for convenience
pub use board::{BoardOptions, RenderModel};
pub use config::Config;
pub use data_fetcher::{
    ArrivalsFetcher, ArrivalsProcessor, CacheRefresher, DisplayArrival, FileCacheStorage,
    PlatformNumber, RawArrival, ReferenceDataStore, StationCode,
};
pub use error::AppError;
pub use notifications::Notification;
pub use scheduler::{RefreshScheduler, SchedulerHandle};

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
