//! Downloads the reference datasets and replaces the persisted copies

use reqwest::Client;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument};

use super::storage::{CacheStorage, ReferenceKind};
use crate::data_fetcher::api::{build_platforms_url, build_stations_url, fetch_text, parse_json_body};
use crate::error::AppError;
use crate::notifications::{self, Notification, NotificationReceiver, NotificationSender};

/// Refreshes the persisted station and platform datasets from the live API.
pub struct CacheRefresher<S> {
    client: Client,
    base_url: String,
    storage: S,
}

impl<S: CacheStorage + 'static> CacheRefresher<S> {
    pub fn new(client: Client, base_url: impl Into<String>, storage: S) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            storage,
        }
    }

    /// Downloads stations, then platforms, persisting each body as received.
    ///
    /// Bodies that are not JSON are rejected and leave the old copy in place.
    /// The first failure aborts the refresh.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<(), AppError> {
        info!("Updating cached stations and platforms");

        for (kind, url) in [
            (ReferenceKind::Stations, build_stations_url(&self.base_url)),
            (ReferenceKind::Platforms, build_platforms_url(&self.base_url)),
        ] {
            let body = fetch_text(&self.client, &url).await?;
            parse_json_body::<serde_json::Value>(&body, &url)?;
            self.storage.write(kind, &body).await?;
            debug!("Persisted {:?} to {}", kind, self.storage.location(kind));
        }

        info!("Updated cached stations and platforms");
        Ok(())
    }

    /// Runs the refresher as its own task.
    ///
    /// Every [`Notification::RequestCacheUpdate`] received on the returned handle
    /// triggers one refresh; a successful refresh sends
    /// [`Notification::CacheUpdated`] to `notify`. Failures are logged and the
    /// task keeps serving requests.
    pub fn spawn(self, notify: NotificationSender) -> RefresherHandle {
        let (requests, receiver) = notifications::channel();
        let task = tokio::spawn(self.serve(receiver, notify));
        RefresherHandle { requests, task }
    }

    async fn serve(self, mut requests: NotificationReceiver, notify: NotificationSender) {
        while let Some(notification) = requests.recv().await {
            if notification != Notification::RequestCacheUpdate {
                debug!("Cache refresher ignoring {:?}", notification);
                continue;
            }

            match self.refresh().await {
                Ok(()) => {
                    if notify.send(Notification::CacheUpdated).is_err() {
                        debug!("Nobody is listening for cache updates, stopping refresher");
                        break;
                    }
                }
                Err(e) => error!("Failed to update reference data cache: {}", e),
            }
        }
    }
}

/// Handle of a spawned [`CacheRefresher`]
pub struct RefresherHandle {
    requests: NotificationSender,
    task: JoinHandle<()>,
}

impl RefresherHandle {
    /// Queues a refresh; returns false if the refresher task has stopped
    pub fn request_update(&self) -> bool {
        self.requests.send(Notification::RequestCacheUpdate).is_ok()
    }

    /// Sender that forwards notifications to the refresher
    pub fn sender(&self) -> NotificationSender {
        self.requests.clone()
    }

    /// Stops the refresher once queued requests are handled
    pub async fn shutdown(self) {
        drop(self.requests);
        let _ = self.task.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_fetcher::api::http_client::create_test_http_client;
    use crate::testing_utils::{MemoryCacheStorage, sample_platforms_json, sample_stations_json};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_reference(server: &MockServer, stations: ResponseTemplate, platforms: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path("/stations"))
            .respond_with(stations)
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/stations/platforms"))
            .respond_with(platforms)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_refresh_persists_bodies_verbatim() {
        let server = MockServer::start().await;
        let stations = sample_stations_json();
        let platforms = sample_platforms_json();
        mount_reference(
            &server,
            ResponseTemplate::new(200).set_body_string(stations.clone()),
            ResponseTemplate::new(200).set_body_string(platforms.clone()),
        )
        .await;

        let storage = MemoryCacheStorage::new();
        let refresher = CacheRefresher::new(create_test_http_client(), server.uri(), storage.clone());
        refresher.refresh().await.unwrap();

        assert_eq!(storage.get(ReferenceKind::Stations).unwrap(), stations);
        assert_eq!(storage.get(ReferenceKind::Platforms).unwrap(), platforms);
    }

    #[tokio::test]
    async fn test_refresh_rejects_non_json_body() {
        let server = MockServer::start().await;
        mount_reference(
            &server,
            ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"),
            ResponseTemplate::new(200).set_body_string("{}"),
        )
        .await;

        let storage = MemoryCacheStorage::new();
        storage.put(ReferenceKind::Stations, "{\"MTS\":\"Monument\"}");
        let refresher = CacheRefresher::new(create_test_http_client(), server.uri(), storage.clone());

        let error = refresher.refresh().await.unwrap_err();
        assert!(error.is_fetch_error());
        assert_eq!(
            storage.get(ReferenceKind::Stations).unwrap(),
            "{\"MTS\":\"Monument\"}"
        );
        assert!(storage.get(ReferenceKind::Platforms).is_none());
    }

    #[tokio::test]
    async fn test_write_failure_is_cache_write_error() {
        let server = MockServer::start().await;
        mount_reference(
            &server,
            ResponseTemplate::new(200).set_body_string("{}"),
            ResponseTemplate::new(200).set_body_string("{}"),
        )
        .await;

        let storage = MemoryCacheStorage::new();
        storage.fail_writes(true);
        let refresher = CacheRefresher::new(create_test_http_client(), server.uri(), storage);

        assert!(matches!(
            refresher.refresh().await,
            Err(AppError::CacheWrite { .. })
        ));
    }

    #[tokio::test]
    async fn test_spawned_refresher_signals_cache_updated() {
        let server = MockServer::start().await;
        mount_reference(
            &server,
            ResponseTemplate::new(200).set_body_string("{}"),
            ResponseTemplate::new(200).set_body_string("{}"),
        )
        .await;

        let (notify, mut events) = notifications::channel();
        let refresher = CacheRefresher::new(
            create_test_http_client(),
            server.uri(),
            MemoryCacheStorage::new(),
        );
        let handle = refresher.spawn(notify);

        assert!(handle.request_update());
        assert_eq!(events.recv().await, Some(Notification::CacheUpdated));

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_spawned_refresher_survives_failures() {
        let server = MockServer::start().await;
        mount_reference(
            &server,
            ResponseTemplate::new(500),
            ResponseTemplate::new(200).set_body_string("{}"),
        )
        .await;

        let (notify, mut events) = notifications::channel();
        let handle = CacheRefresher::new(
            create_test_http_client(),
            server.uri(),
            MemoryCacheStorage::new(),
        )
        .spawn(notify);

        assert!(handle.request_update());
        assert!(handle.request_update());
        handle.shutdown().await;

        // Both refreshes failed, so no CacheUpdated was sent and the task ended cleanly
        assert!(events.try_recv().is_err());
        assert_eq!(server.received_requests().await.unwrap().len(), 2);
    }
}
