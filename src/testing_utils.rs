//! Builders and in-memory fakes shared by unit and integration tests

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::data_fetcher::api::ArrivalsSource;
use crate::data_fetcher::cache::{CacheStorage, ReferenceKind};
use crate::data_fetcher::models::{PlatformNumber, RawArrival, StationCode};
use crate::error::AppError;

/// Builder for [`RawArrival`] records with sensible defaults
pub struct ArrivalBuilder {
    arrival: RawArrival,
}

impl ArrivalBuilder {
    pub fn new(trn: &str) -> Self {
        Self {
            arrival: RawArrival {
                trn: trn.to_string(),
                last_event: "APPROACHING".to_string(),
                last_event_location: "Monument Platform 1".to_string(),
                last_event_time: "2024-05-01T12:00:00".to_string(),
                destination: "Airport".to_string(),
                due_in: 1,
                line: "GREEN".to_string(),
            },
        }
    }

    pub fn event(mut self, event: &str) -> Self {
        self.arrival.last_event = event.to_string();
        self
    }

    pub fn location(mut self, location: &str) -> Self {
        self.arrival.last_event_location = location.to_string();
        self
    }

    pub fn event_time(mut self, time: &str) -> Self {
        self.arrival.last_event_time = time.to_string();
        self
    }

    pub fn destination(mut self, destination: &str) -> Self {
        self.arrival.destination = destination.to_string();
        self
    }

    pub fn due_in(mut self, due_in: i64) -> Self {
        self.arrival.due_in = due_in;
        self
    }

    pub fn line(mut self, line: &str) -> Self {
        self.arrival.line = line.to_string();
        self
    }

    pub fn build(self) -> RawArrival {
        self.arrival
    }
}

/// Station table JSON as served by `/stations`
pub fn sample_stations_json() -> String {
    r#"{"MTS":"Monument","CEN":"Central Station","HAY":"Haymarket"}"#.to_string()
}

/// Platform table JSON as served by `/stations/platforms`
pub fn sample_platforms_json() -> String {
    r#"{
        "MTS": [
            {"platformNumber": 1, "description": "Westbound", "helperText": "Platform 1 (towards Airport)"},
            {"platformNumber": 2, "description": "Eastbound", "helperText": "Platform 2 (towards Coast)"},
            {"platformNumber": 3, "description": "Northbound", "helperText": "Platform 3"},
            {"platformNumber": 4, "description": "Southbound", "helperText": "Platform 4"}
        ],
        "CEN": [
            {"platformNumber": 1, "helperText": "Platform 1"},
            {"platformNumber": 2, "helperText": "Platform 2"}
        ],
        "HAY": [
            {"platformNumber": 1, "helperText": "Platform 1"},
            {"platformNumber": 2, "helperText": "Platform 2"}
        ]
    }"#
    .to_string()
}

#[derive(Default)]
struct MemoryInner {
    bodies: HashMap<ReferenceKind, String>,
    reads: HashMap<ReferenceKind, usize>,
    fail_writes: bool,
}

/// [`CacheStorage`] kept in memory that counts reads per dataset.
/// Clones share the same contents.
#[derive(Clone, Default)]
pub struct MemoryCacheStorage {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage holding the sample station and platform tables
    pub fn with_samples() -> Self {
        let storage = Self::new();
        storage.put(ReferenceKind::Stations, &sample_stations_json());
        storage.put(ReferenceKind::Platforms, &sample_platforms_json());
        storage
    }

    pub fn put(&self, kind: ReferenceKind, body: &str) {
        self.lock().bodies.insert(kind, body.to_string());
    }

    pub fn get(&self, kind: ReferenceKind) -> Option<String> {
        self.lock().bodies.get(&kind).cloned()
    }

    /// Number of reads of a dataset so far, failed reads included
    pub fn reads(&self, kind: ReferenceKind) -> usize {
        self.lock().reads.get(&kind).copied().unwrap_or(0)
    }

    pub fn fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CacheStorage for MemoryCacheStorage {
    async fn read(&self, kind: ReferenceKind) -> Result<String, AppError> {
        let mut inner = self.lock();
        *inner.reads.entry(kind).or_insert(0) += 1;
        inner
            .bodies
            .get(&kind)
            .cloned()
            .ok_or_else(|| AppError::cache_read(self.location(kind), "not cached"))
    }

    async fn write(&self, kind: ReferenceKind, body: &str) -> Result<(), AppError> {
        let mut inner = self.lock();
        if inner.fail_writes {
            return Err(AppError::cache_write(self.location(kind), "writes disabled"));
        }
        inner.bodies.insert(kind, body.to_string());
        Ok(())
    }

    fn location(&self, kind: ReferenceKind) -> String {
        format!("memory:{}", kind.file_name())
    }
}

/// [`ArrivalsSource`] that replays scripted responses.
///
/// Responses are served in order; once the script runs out the last response is
/// repeated. Each fetch can be given an artificial delay, and the source records
/// how many fetches ran at the same time.
#[derive(Clone, Default)]
pub struct ScriptedArrivals {
    script: Arc<Mutex<VecDeque<Result<Vec<RawArrival>, String>>>>,
    last: Arc<Mutex<Option<Result<Vec<RawArrival>, String>>>>,
    delay: Duration,
    calls: Arc<AtomicUsize>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
    requested: Arc<Mutex<Vec<(StationCode, PlatformNumber)>>>,
}

impl ScriptedArrivals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn push_ok(&self, arrivals: Vec<RawArrival>) {
        self.push(Ok(arrivals));
    }

    /// Queues a failed fetch
    pub fn push_err(&self, message: &str) {
        self.push(Err(message.to_string()));
    }

    fn push(&self, response: Result<Vec<RawArrival>, String>) {
        self.script
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push_back(response);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn requested(&self) -> Vec<(StationCode, PlatformNumber)> {
        self.requested.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    fn next_response(&self) -> Result<Vec<RawArrival>, String> {
        let next = self
            .script
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .pop_front();
        let mut last = self.last.lock().unwrap_or_else(|p| p.into_inner());
        match next {
            Some(response) => {
                *last = Some(response.clone());
                response
            }
            None => last.clone().unwrap_or_else(|| Ok(Vec::new())),
        }
    }
}

impl ArrivalsSource for ScriptedArrivals {
    async fn fetch_arrivals(
        &self,
        station: &StationCode,
        platform: &PlatformNumber,
    ) -> Result<Vec<RawArrival>, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push((station.clone(), platform.clone()));

        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.next_response()
            .map_err(|message| AppError::api_server_error(500, message, "scripted://times"))
    }
}
