use clap::Parser;
use metro_rti::AppError;
use metro_rti::app::run_board;
use metro_rti::cli::Args;
use metro_rti::commands::{
    apply_cli_overrides, handle_list_config_command, handle_list_stations_command,
    handle_once_command, handle_update_cache_command,
};
use metro_rti::config::Config;
use metro_rti::logging::setup_logging;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref()).await?;
    apply_cli_overrides(&mut config, &args);

    // The guard must stay alive until main returns so buffered logs are flushed
    let (log_file_path, _guard) = setup_logging(&args, &config).await?;
    info!(
        "{} {} starting, logging to {}",
        metro_rti::NAME,
        metro_rti::VERSION,
        log_file_path
    );

    if args.list_config {
        return handle_list_config_command(&args).await;
    }

    if args.update_cache {
        return handle_update_cache_command(&config).await;
    }

    if args.list_stations {
        return handle_list_stations_command(&config).await;
    }

    if args.once {
        return handle_once_command(&args, &config).await;
    }

    run_board(&args, &config).await
}
