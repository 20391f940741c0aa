use clap::Parser;
use clap::builder::styling::{AnsiColor, Effects, Styles};

fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .usage(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Yellow.on_default())
        .error(AnsiColor::Red.on_default().effects(Effects::BOLD))
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Red.on_default())
}

/// Determines if the application should run in non-interactive mode
/// Non-interactive mode is used when any of these conditions are met:
/// - --once flag is set (one refresh, print the board and exit)
/// - the reference data cache is updated or listed
/// - config operations are requested
pub fn is_noninteractive_mode(args: &Args) -> bool {
    args.once || args.update_cache || args.list_stations || args.list_config
}

/// Tyne and Wear Metro arrivals board
///
/// Shows the next trains for one station platform, refreshed on a fixed
/// interval from the Nexus real-time information API.
///
/// Station and platform come from the config file, the METRO_RTI_STATION and
/// METRO_RTI_PLATFORM environment variables, or the options below.
/// Press Ctrl+C to quit the board.
#[derive(Parser, Debug, Default)]
#[command(about, long_about = None)]
#[command(styles = get_styles())]
pub struct Args {
    /// Path of the config file. Defaults to the platform config directory.
    #[arg(short = 'c', long = "config", value_name = "PATH", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Station code to show, e.g. MTS for Monument
    #[arg(short = 's', long = "station", value_name = "CODE")]
    pub station: Option<String>,

    /// Platform number at the station
    #[arg(short = 'p', long = "platform", value_name = "NUMBER")]
    pub platform: Option<String>,

    /// Run one refresh, print the board and exit.
    /// The output stays visible in terminal history.
    #[arg(short, long)]
    pub once: bool,

    /// Download the station and platform lists into the local cache and exit
    #[arg(long = "update-cache", help_heading = "Reference Data")]
    pub update_cache: bool,

    /// List cached stations with their platforms and exit
    #[arg(long = "list-stations", help_heading = "Reference Data")]
    pub list_stations: bool,

    /// List current configuration settings
    #[arg(long = "list-config", short = 'l', help_heading = "Configuration")]
    pub list_config: bool,

    /// Disable colours in the board output
    #[arg(long = "plain", help_heading = "Display Options")]
    pub plain: bool,

    /// Enable debug mode: the board is drawn in the normal screen and
    /// one-shot commands also log to the terminal.
    #[arg(long = "debug", help_heading = "Debug")]
    pub debug: bool,

    /// Specify a custom log file path. If not provided, logs will be written to the default location.
    #[arg(long = "log-file", help_heading = "Debug")]
    pub log_file: Option<String>,
}
