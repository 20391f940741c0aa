use crate::board::{BoardDisplay, BoardOptions, TerminalManager};
use crate::board::terminal::TerminalConfig;
use crate::cli::Args;
use crate::config::Config;
use crate::data_fetcher::api::create_http_client_with_timeout;
use crate::data_fetcher::{
    ArrivalsFetcher, CacheRefresher, FileCacheStorage, ReferenceDataStore,
};
use crate::error::AppError;
use crate::notifications::{self, Notification, NotificationReceiver, NotificationSender};
use crate::scheduler::{RefreshScheduler, SchedulerSettings};
use crate::template::JinjaRenderer;
use crossterm::{execute, terminal::SetTitle};
use reqwest::Client;
use std::io::stdout;
use std::sync::Arc;
use tracing::{info, warn};

/// Builds the scheduler for the configured station platform, reading reference
/// data from the on-disk cache.
pub fn build_scheduler(
    config: &Config,
    client: Client,
) -> RefreshScheduler<ArrivalsFetcher, FileCacheStorage> {
    let fetcher = ArrivalsFetcher::new(
        client,
        config.api_base_url.clone(),
        config.cors_relay.clone(),
    );
    let store = ReferenceDataStore::new(FileCacheStorage::new(config.cache_dir()));

    RefreshScheduler::new(
        fetcher,
        store,
        Arc::new(JinjaRenderer::new()),
        SchedulerSettings::from(config),
    )
}

/// Display options of the board, with `--plain` turning colours off
pub fn board_options(args: &Args, config: &Config) -> BoardOptions {
    let mut options = BoardOptions::from(config);
    if args.plain {
        options.colorize = false;
    }
    options
}

/// Run the live board until Ctrl+C or `q`.
///
/// - Spawns the cache refresher and the refresh scheduler
/// - Requests a cache update first if `update_cache_on_start` is set
/// - Redraws the board on the alternate screen on every publish
/// - `u` on the board requests a cache update, `q` quits
/// - After exit, prints the configuration problems found while running
pub async fn run_board(args: &Args, config: &Config) -> Result<(), AppError> {
    let client = create_http_client_with_timeout(config.http_timeout_seconds)?;

    let (inbox_tx, inbox_rx) = notifications::channel();
    let (diagnostics_tx, diagnostics_rx) = notifications::channel();

    let refresher = CacheRefresher::new(
        client.clone(),
        config.api_base_url.clone(),
        FileCacheStorage::new(config.cache_dir()),
    )
    .spawn(inbox_tx.clone());

    let scheduler = build_scheduler(config, client)
        .with_diagnostics(diagnostics_tx)
        .with_cache_refresher(refresher.sender());
    let models = scheduler.subscribe();

    request_cache_update_on_start(config, &inbox_tx);
    let scheduler = scheduler.spawn(inbox_rx);

    execute!(stdout(), SetTitle("Metro RTI"))?;
    let terminal = TerminalManager::with_config(TerminalConfig {
        debug_mode: args.debug,
    });
    let display = BoardDisplay::new(board_options(args, config));

    let result = display
        .run(&terminal, models, inbox_tx, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await;

    scheduler.shutdown().await;
    refresher.shutdown().await;

    print_config_problems(diagnostics_rx);
    result
}

/// Queues a cache update when `update_cache_on_start` is set.
///
/// Returns whether a request was queued.
fn request_cache_update_on_start(config: &Config, inbox: &NotificationSender) -> bool {
    if !config.update_cache_on_start {
        return false;
    }
    info!("Updating reference data on start");
    if inbox.send(Notification::RequestCacheUpdate).is_err() {
        warn!("Refresh scheduler inbox closed, cache update on start dropped");
        return false;
    }
    true
}

/// Prints each distinct configuration problem once
fn print_config_problems(mut diagnostics: NotificationReceiver) {
    let mut seen: Vec<String> = Vec::new();
    while let Ok(notification) = diagnostics.try_recv() {
        if let Notification::ConfigError(message) = notification
            && !seen.contains(&message)
        {
            eprintln!("Config error: {message}");
            seen.push(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_update_on_start_is_queued_when_enabled() {
        let (inbox, mut received) = notifications::channel();

        assert!(!request_cache_update_on_start(&Config::default(), &inbox));
        assert!(received.try_recv().is_err());

        let config = Config {
            update_cache_on_start: true,
            ..Config::default()
        };
        assert!(request_cache_update_on_start(&config, &inbox));
        assert_eq!(received.try_recv(), Ok(Notification::RequestCacheUpdate));
    }

    #[test]
    fn test_cache_update_on_start_with_closed_inbox() {
        let (inbox, received) = notifications::channel();
        drop(received);
        let config = Config {
            update_cache_on_start: true,
            ..Config::default()
        };
        assert!(!request_cache_update_on_start(&config, &inbox));
    }

    #[test]
    fn test_plain_flag_disables_colours() {
        let args = Args {
            plain: true,
            ..Args::default()
        };
        assert!(!board_options(&args, &Config::default()).colorize);
    }
}
