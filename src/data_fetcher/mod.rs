pub mod api;
pub mod cache;
pub mod models;
pub mod processors;

pub use api::{ArrivalsFetcher, ArrivalsSource};
pub use cache::{CacheRefresher, CacheStorage, FileCacheStorage, ReferenceDataStore};
pub use models::{DisplayArrival, PlatformNumber, RawArrival, StationCode};
pub use processors::{ArrivalsProcessor, ProcessorSettings};
