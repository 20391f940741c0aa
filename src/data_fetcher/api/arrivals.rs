//! Live arrivals for one station platform

use std::future::Future;

use reqwest::Client;
use tracing::{debug, instrument};

use super::fetch_utils::fetch;
use super::urls::{apply_cors_relay, build_times_url};
use crate::data_fetcher::models::{PlatformNumber, RawArrival, StationCode};
use crate::error::AppError;

/// Source of live arrival records for the refresh loop.
pub trait ArrivalsSource: Send + Sync {
    /// Fetches the arrivals of a station platform, in API order.
    fn fetch_arrivals(
        &self,
        station: &StationCode,
        platform: &PlatformNumber,
    ) -> impl Future<Output = Result<Vec<RawArrival>, AppError>> + Send;
}

/// Fetches arrivals from `{base_url}/times/{station}/{platform}`.
#[derive(Debug, Clone)]
pub struct ArrivalsFetcher {
    client: Client,
    base_url: String,
    cors_relay: Option<String>,
}

impl ArrivalsFetcher {
    pub fn new(client: Client, base_url: impl Into<String>, cors_relay: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            cors_relay,
        }
    }

    /// Full request URL for a station platform, relay included
    pub fn url_for(&self, station: &StationCode, platform: &PlatformNumber) -> String {
        let url = build_times_url(&self.base_url, station.as_str(), platform.as_str());
        apply_cors_relay(self.cors_relay.as_deref(), &url)
    }
}

impl ArrivalsSource for ArrivalsFetcher {
    #[instrument(skip_all, fields(station = %station, platform = %platform))]
    async fn fetch_arrivals(
        &self,
        station: &StationCode,
        platform: &PlatformNumber,
    ) -> Result<Vec<RawArrival>, AppError> {
        let url = self.url_for(station, platform);
        let arrivals: Vec<RawArrival> = fetch(&self.client, &url).await?;
        debug!("Fetched {} arrivals for {}/{}", arrivals.len(), station, platform);
        Ok(arrivals)
    }
}
