//! Lazily loaded station and platform tables
//!
//! The store reads each table from [`CacheStorage`] on first access and keeps it
//! until [`ReferenceDataStore::invalidate`] is called.
//!
//! # Concurrency
//! Access takes `&mut self`: the store is owned by the single refresh task and all
//! loads happen sequentially from it. Loads are not coalesced; two callers sharing
//! a store would each have to wait for the other's load to finish.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};

use super::storage::{CacheStorage, ReferenceKind};
use crate::data_fetcher::models::{PlatformTable, StationTable};
use crate::error::AppError;

/// Load state of one reference table
#[derive(Debug, Clone)]
pub enum TableState<T> {
    Unloaded,
    Loaded(Arc<T>),
}

impl<T> TableState<T> {
    pub fn is_loaded(&self) -> bool {
        matches!(self, TableState::Loaded(_))
    }
}

/// Owns the in-memory station and platform tables.
pub struct ReferenceDataStore<S> {
    storage: S,
    stations: TableState<StationTable>,
    platforms: TableState<PlatformTable>,
}

impl<S: CacheStorage> ReferenceDataStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            stations: TableState::Unloaded,
            platforms: TableState::Unloaded,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Station code to name table, loaded from the cache on first use.
    ///
    /// A failed load leaves the table unloaded; there is no stale fallback.
    pub async fn stations(&mut self) -> Result<Arc<StationTable>, AppError> {
        if let TableState::Loaded(table) = &self.stations {
            return Ok(Arc::clone(table));
        }
        let table: Arc<StationTable> = Arc::new(load(&self.storage, ReferenceKind::Stations).await?);
        info!("Loaded {} stations from cache", table.len());
        self.stations = TableState::Loaded(Arc::clone(&table));
        Ok(table)
    }

    /// Platforms-by-station table, loaded from the cache on first use.
    pub async fn platforms(&mut self) -> Result<Arc<PlatformTable>, AppError> {
        if let TableState::Loaded(table) = &self.platforms {
            return Ok(Arc::clone(table));
        }
        let table: Arc<PlatformTable> =
            Arc::new(load(&self.storage, ReferenceKind::Platforms).await?);
        info!("Loaded platforms of {} stations from cache", table.len());
        self.platforms = TableState::Loaded(Arc::clone(&table));
        Ok(table)
    }

    /// Drops both tables so the next access reads the cache again
    pub fn invalidate(&mut self) {
        debug!("Invalidating cached stations and platforms");
        self.stations = TableState::Unloaded;
        self.platforms = TableState::Unloaded;
    }

    pub fn stations_state(&self) -> &TableState<StationTable> {
        &self.stations
    }

    pub fn platforms_state(&self) -> &TableState<PlatformTable> {
        &self.platforms
    }
}

#[instrument(skip(storage))]
async fn load<T: DeserializeOwned, S: CacheStorage>(
    storage: &S,
    kind: ReferenceKind,
) -> Result<T, AppError> {
    let body = storage.read(kind).await?;
    serde_json::from_str(&body)
        .map_err(|e| AppError::cache_read(storage.location(kind), format!("invalid JSON: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_fetcher::models::StationCode;
    use crate::testing_utils::{MemoryCacheStorage, sample_platforms_json, sample_stations_json};

    fn seeded_storage() -> MemoryCacheStorage {
        let storage = MemoryCacheStorage::new();
        storage.put(ReferenceKind::Stations, &sample_stations_json());
        storage.put(ReferenceKind::Platforms, &sample_platforms_json());
        storage
    }

    #[tokio::test]
    async fn test_lazy_load_reads_once() {
        let storage = seeded_storage();
        let mut store = ReferenceDataStore::new(storage.clone());

        assert!(!store.stations_state().is_loaded());
        assert_eq!(storage.reads(ReferenceKind::Stations), 0);

        let first = store.stations().await.unwrap();
        let second = store.stations().await.unwrap();

        assert_eq!(storage.reads(ReferenceKind::Stations), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first[&StationCode::from("MTS")], "Monument");
    }

    #[tokio::test]
    async fn test_tables_load_independently() {
        let storage = seeded_storage();
        let mut store = ReferenceDataStore::new(storage.clone());

        store.platforms().await.unwrap();
        assert_eq!(storage.reads(ReferenceKind::Platforms), 1);
        assert_eq!(storage.reads(ReferenceKind::Stations), 0);
    }

    #[tokio::test]
    async fn test_invalidate_reloads_exactly_once() {
        let storage = seeded_storage();
        let mut store = ReferenceDataStore::new(storage.clone());

        store.stations().await.unwrap();
        store.platforms().await.unwrap();

        store.invalidate();
        assert!(!store.stations_state().is_loaded());
        assert!(!store.platforms_state().is_loaded());

        store.stations().await.unwrap();
        store.stations().await.unwrap();
        store.platforms().await.unwrap();
        store.platforms().await.unwrap();

        assert_eq!(storage.reads(ReferenceKind::Stations), 2);
        assert_eq!(storage.reads(ReferenceKind::Platforms), 2);
    }

    #[tokio::test]
    async fn test_reload_sees_new_data() {
        let storage = seeded_storage();
        let mut store = ReferenceDataStore::new(storage.clone());
        store.stations().await.unwrap();

        storage.put(ReferenceKind::Stations, r#"{"HAY": "Haymarket"}"#);
        assert!(store.stations().await.unwrap().contains_key(&StationCode::from("MTS")));

        store.invalidate();
        let reloaded = store.stations().await.unwrap();
        assert!(reloaded.contains_key(&StationCode::from("HAY")));
        assert!(!reloaded.contains_key(&StationCode::from("MTS")));
    }

    #[tokio::test]
    async fn test_empty_table_is_cached() {
        let storage = MemoryCacheStorage::new();
        storage.put(ReferenceKind::Stations, "{}");
        let mut store = ReferenceDataStore::new(storage.clone());

        assert!(store.stations().await.unwrap().is_empty());
        assert!(store.stations().await.unwrap().is_empty());
        assert_eq!(storage.reads(ReferenceKind::Stations), 1);
    }

    #[tokio::test]
    async fn test_missing_cache_is_read_error_without_fallback() {
        let storage = MemoryCacheStorage::new();
        let mut store = ReferenceDataStore::new(storage.clone());

        assert!(matches!(
            store.stations().await,
            Err(AppError::CacheRead { .. })
        ));
        assert!(!store.stations_state().is_loaded());

        // Not cached: a second access tries again
        assert!(store.stations().await.is_err());
        assert_eq!(storage.reads(ReferenceKind::Stations), 2);
    }

    #[tokio::test]
    async fn test_invalid_json_is_read_error() {
        let storage = MemoryCacheStorage::new();
        storage.put(ReferenceKind::Platforms, "<html>");
        let mut store = ReferenceDataStore::new(storage);

        match store.platforms().await {
            Err(AppError::CacheRead { path, message }) => {
                assert_eq!(path, "memory:platforms.json");
                assert!(message.starts_with("invalid JSON"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
