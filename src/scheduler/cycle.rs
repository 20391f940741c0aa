//! The refresh cycle and the loop that drives it.
//!
//! A cycle fetches the arrivals of the configured platform, runs them through
//! the [`ArrivalsProcessor`] and publishes a new [`RenderModel`]. The first cycle
//! starts immediately, later ones on a fixed interval. Cycles never overlap: a
//! tick that falls due while a cycle is still running is skipped.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{oneshot, watch};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error, info, warn};

use super::handle::SchedulerHandle;
use crate::board::RenderModel;
use crate::config::Config;
use crate::config::selection::{SelectionLabels, SelectionReport, validate_selection};
use crate::data_fetcher::api::ArrivalsSource;
use crate::data_fetcher::cache::{CacheStorage, ReferenceDataStore};
use crate::data_fetcher::models::{PlatformNumber, StationCode};
use crate::data_fetcher::processors::{ArrivalsProcessor, ProcessorSettings};
use crate::error::AppError;
use crate::notifications::{Notification, NotificationReceiver, NotificationSender};
use crate::template::TemplateRenderer;

/// Where the scheduler is within the current cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    Idle,
    Fetching,
    Processing,
    Published,
}

/// Inputs of the scheduler taken from the board config
#[derive(Debug, Clone)]
pub struct SchedulerSettings {
    pub station: Option<StationCode>,
    pub platform: Option<PlatformNumber>,
    pub platform_format: String,
    pub interval: Duration,
    pub processor: ProcessorSettings,
}

impl From<&Config> for SchedulerSettings {
    fn from(config: &Config) -> Self {
        Self {
            station: config.station.clone(),
            platform: config.platform.clone(),
            platform_format: config.platform_format.clone(),
            interval: config.update_interval(),
            processor: ProcessorSettings::from(config),
        }
    }
}

/// Drives fetch, process and publish for one station platform.
pub struct RefreshScheduler<A, S> {
    source: A,
    store: ReferenceDataStore<S>,
    processor: ArrivalsProcessor,
    renderer: Arc<dyn TemplateRenderer>,
    station: Option<StationCode>,
    platform: Option<PlatformNumber>,
    platform_format: String,
    interval: Duration,
    labels: SelectionLabels,
    state: CycleState,
    publisher: watch::Sender<Arc<RenderModel>>,
    diagnostics: Option<NotificationSender>,
    refresher: Option<NotificationSender>,
}

impl<A, S> RefreshScheduler<A, S>
where
    A: ArrivalsSource + 'static,
    S: CacheStorage + 'static,
{
    pub fn new(
        source: A,
        store: ReferenceDataStore<S>,
        renderer: Arc<dyn TemplateRenderer>,
        settings: SchedulerSettings,
    ) -> Self {
        let labels = SelectionLabels::default();
        let (publisher, _) = watch::channel(Arc::new(RenderModel::with_labels(&labels)));

        Self {
            source,
            store,
            processor: ArrivalsProcessor::new(settings.processor, Arc::clone(&renderer)),
            renderer,
            station: settings.station,
            platform: settings.platform,
            platform_format: settings.platform_format,
            interval: settings.interval,
            labels,
            state: CycleState::Idle,
            publisher,
            diagnostics: None,
            refresher: None,
        }
    }

    /// Sends a [`Notification::ConfigError`] to `sender` for every selection problem
    pub fn with_diagnostics(mut self, sender: NotificationSender) -> Self {
        self.diagnostics = Some(sender);
        self
    }

    /// Forwards [`Notification::RequestCacheUpdate`] to a cache refresher
    pub fn with_cache_refresher(mut self, sender: NotificationSender) -> Self {
        self.refresher = Some(sender);
        self
    }

    /// Receiver of the published render models
    pub fn subscribe(&self) -> watch::Receiver<Arc<RenderModel>> {
        self.publisher.subscribe()
    }

    /// The most recently published model
    pub fn current(&self) -> Arc<RenderModel> {
        Arc::clone(&self.publisher.borrow())
    }

    pub fn state(&self) -> CycleState {
        self.state
    }

    pub fn labels(&self) -> &SelectionLabels {
        &self.labels
    }

    /// Checks the station and platform against the reference data and updates
    /// the header labels.
    ///
    /// Problems are reported but never stop the scheduler.
    pub async fn validate_selection(&mut self) -> SelectionReport {
        let report = validate_selection(
            self.station.as_ref(),
            self.platform.as_ref(),
            &mut self.store,
            &self.platform_format,
            self.renderer.as_ref(),
        )
        .await;

        for problem in &report.errors {
            self.report_config_error(problem.to_string());
        }

        if report.labels != self.labels {
            self.labels = report.labels.clone();
            let current = self.current();
            self.publisher.send_replace(Arc::new(RenderModel {
                station_label: self.labels.station.clone(),
                platform_label: self.labels.platform.clone(),
                trains: current.trains.clone(),
            }));
        }

        report
    }

    /// Runs one fetch, process and publish pass.
    ///
    /// On failure the previously published model stays in place.
    pub async fn run_cycle(&mut self) -> Result<(), AppError> {
        let result = self.cycle().await;
        if result.is_err() {
            self.state = CycleState::Idle;
        }
        result
    }

    async fn cycle(&mut self) -> Result<(), AppError> {
        let station = self
            .station
            .as_ref()
            .ok_or_else(|| AppError::missing_config("station"))?;
        let platform = self
            .platform
            .as_ref()
            .ok_or_else(|| AppError::missing_config("platform"))?;

        self.state = CycleState::Fetching;
        let raw = self.source.fetch_arrivals(station, platform).await?;
        debug!("Fetched {} arrivals for {}/{}", raw.len(), station, platform);

        self.state = CycleState::Processing;
        let processed = self.processor.process(&raw);
        for problem in &processed.errors {
            warn!("Skipped arrival: {}", problem);
        }
        if processed.all_failed() {
            return Err(processed
                .errors
                .into_iter()
                .next()
                .unwrap_or_else(|| AppError::template_render("", "no arrival could be rendered")));
        }

        self.publisher.send_replace(Arc::new(RenderModel {
            station_label: self.labels.station.clone(),
            platform_label: self.labels.platform.clone(),
            trains: processed.trains,
        }));
        self.state = CycleState::Published;
        Ok(())
    }

    /// Starts the scheduler loop on its own task.
    ///
    /// The selection is validated first, then the first cycle runs without
    /// delay. `inbox` carries notifications from the rest of the application.
    pub fn spawn(self, inbox: NotificationReceiver) -> SchedulerHandle {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(self.run(inbox, shutdown_rx));
        SchedulerHandle::new(shutdown_tx, task)
    }

    async fn run(mut self, mut inbox: NotificationReceiver, mut shutdown: oneshot::Receiver<()>) {
        info!("Starting refresh scheduler, interval {:?}", self.interval);
        self.validate_selection().await;

        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            // Shutdown wins over a tick that became due during the last cycle
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Refresh scheduler stopped");
                    break;
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.run_cycle().await {
                        warn!("Refresh cycle failed, keeping previous arrivals: {}", e);
                    }
                }
                Some(notification) = inbox.recv() => {
                    self.handle_notification(notification).await;
                }
            }
        }
    }

    async fn handle_notification(&mut self, notification: Notification) {
        match notification {
            Notification::CacheUpdated => {
                info!("Reference data updated, reloading");
                self.store.invalidate();
                self.validate_selection().await;
            }
            Notification::RequestCacheUpdate => match &self.refresher {
                Some(refresher) => {
                    if refresher.send(Notification::RequestCacheUpdate).is_err() {
                        warn!("Cache refresher is not running");
                    }
                }
                None => warn!("Cache update requested but no refresher is configured"),
            },
            Notification::ConfigError(message) => error!("Configuration error: {}", message),
        }
    }

    fn report_config_error(&self, message: String) {
        error!("Configuration error: {}", message);
        if let Some(diagnostics) = &self.diagnostics {
            let _ = diagnostics.send(Notification::ConfigError(message));
        }
    }
}
