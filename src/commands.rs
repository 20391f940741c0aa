use crate::app::{board_options, build_scheduler};
use crate::board::BoardDisplay;
use crate::cli::Args;
use crate::config::Config;
use crate::data_fetcher::api::create_http_client_with_timeout;
use crate::data_fetcher::models::{
    PlatformNumber, PlatformTable, StationCode, StationTable, platform_numbers,
};
use crate::data_fetcher::{CacheRefresher, FileCacheStorage, ReferenceDataStore};
use crate::error::AppError;
use crossterm::{execute, terminal::SetTitle};
use std::io::{Write, stdout};
use tracing::warn;

/// Applies `--station` and `--platform` on top of the loaded config.
pub fn apply_cli_overrides(config: &mut Config, args: &Args) {
    if let Some(station) = &args.station {
        config.station = Some(StationCode::new(station.trim()));
    }
    if let Some(platform) = &args.platform {
        config.platform = Some(PlatformNumber::new(platform.trim()));
    }
}

/// Handles the --list-config command.
///
/// Displays current configuration settings.
/// Sets appropriate terminal title.
pub async fn handle_list_config_command(args: &Args) -> Result<(), AppError> {
    execute!(stdout(), SetTitle("Metro RTI"))?;
    Config::display(args.config.as_deref()).await?;
    Ok(())
}

/// Handles the --update-cache command.
///
/// Downloads stations and platforms into the cache directory once.
pub async fn handle_update_cache_command(config: &Config) -> Result<(), AppError> {
    let client = create_http_client_with_timeout(config.http_timeout_seconds)?;
    let storage = FileCacheStorage::new(config.cache_dir());
    let refresher = CacheRefresher::new(client, config.api_base_url.clone(), storage.clone());

    refresher.refresh().await?;
    println!("Reference data updated in {}", storage.dir().display());
    Ok(())
}

/// Handles the --list-stations command.
///
/// Prints every cached station with its name and platform numbers.
pub async fn handle_list_stations_command(config: &Config) -> Result<(), AppError> {
    let storage = FileCacheStorage::new(config.cache_dir());
    let mut store = ReferenceDataStore::new(storage);

    let stations = store.stations().await.inspect_err(|_| {
        eprintln!("No usable station cache. Run with --update-cache first.");
    })?;
    let platforms = store.platforms().await?;

    let mut out = stdout().lock();
    write_station_list(&mut out, &stations, &platforms)?;
    Ok(())
}

fn write_station_list<W: Write>(
    out: &mut W,
    stations: &StationTable,
    platforms: &PlatformTable,
) -> Result<(), AppError> {
    for (code, name) in stations {
        let numbers = platform_numbers(platforms, code);
        if numbers.is_empty() {
            writeln!(out, "{:<5} {}", code.as_str(), name)?;
        } else {
            writeln!(
                out,
                "{:<5} {:<30} platforms {}",
                code.as_str(),
                name,
                numbers.join(", ")
            )?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Handles the --once command.
///
/// Validates the selection, runs one refresh cycle and prints the board.
/// Configuration and fetch problems are reported on stderr; the board is
/// printed regardless.
pub async fn handle_once_command(args: &Args, config: &Config) -> Result<(), AppError> {
    let client = create_http_client_with_timeout(config.http_timeout_seconds)?;
    let mut scheduler = build_scheduler(config, client);

    let report = scheduler.validate_selection().await;
    for problem in &report.errors {
        eprintln!("Config error: {problem}");
    }

    if let Err(e) = scheduler.run_cycle().await {
        warn!("Refresh failed: {}", e);
        eprintln!("Could not refresh arrivals: {e}");
    }

    let display = BoardDisplay::new(board_options(args, config));
    display.print(&mut stdout().lock(), &scheduler.current())?;
    Ok(())
}
