//! Text layout of the board.
//!
//! Layout is built as plain lines, with ANSI colour codes only when colours are
//! enabled, so the same output serves the live board and `--once`.

use super::colors::*;
use super::{BoardOptions, RenderModel};
use crate::constants::board::{CONTENT_MARGIN, DESTINATION_WIDTH, DUE_WIDTH};
use crate::data_fetcher::models::DisplayArrival;

/// Due time as shown on the board
///
/// # Examples
/// ```
/// use metro_rti::board::format_due_in;
///
/// assert_eq!(format_due_in(-1), "Due");
/// assert_eq!(format_due_in(0), "Due");
/// assert_eq!(format_due_in(1), "1 min");
/// assert_eq!(format_due_in(12), "12 mins");
/// ```
pub fn format_due_in(due_in: i64) -> String {
    match due_in {
        i64::MIN..=0 => "Due".to_string(),
        1 => "1 min".to_string(),
        n => format!("{n} mins"),
    }
}

/// Lines of the board, top to bottom
pub fn render_lines(model: &RenderModel, options: &BoardOptions) -> Vec<String> {
    let mut lines = Vec::with_capacity(model.trains.len() + 4);
    let margin = " ".repeat(CONTENT_MARGIN);

    if options.show_station {
        lines.push(header_line(&model.station_label, options.colorize));
    }
    if options.show_platform {
        lines.push(subheader_line(&model.platform_label, options.colorize));
    }
    if !lines.is_empty() {
        lines.push(String::new());
    }

    if model.trains.is_empty() {
        lines.push(format!("{margin}No trains"));
        return lines;
    }

    for train in &model.trains {
        let row = train_row(train, options);
        if options.colorize {
            lines.push(format!(
                "{margin}\x1b[38;5;{}m{}\x1b[0m",
                get_ansi_code(line_fg(train.line()), 231),
                row
            ));
        } else {
            lines.push(format!("{margin}{row}"));
        }
    }

    lines
}

fn header_line(label: &str, colorize: bool) -> String {
    if colorize {
        format!(
            "\x1b[48;5;{}m\x1b[38;5;{}m {} \x1b[0m",
            get_ansi_code(header_bg(), 21),
            get_ansi_code(header_fg(), 231),
            label
        )
    } else {
        format!(" {label}")
    }
}

fn subheader_line(label: &str, colorize: bool) -> String {
    if colorize {
        format!(
            " \x1b[38;5;{}m{}\x1b[0m",
            get_ansi_code(subheader_fg(), 51),
            label
        )
    } else {
        format!(" {label}")
    }
}

fn train_row(train: &DisplayArrival, options: &BoardOptions) -> String {
    let mut columns: Vec<String> = Vec::with_capacity(3);

    if options.show_destination {
        columns.push(format!(
            "{:<width$}",
            truncate(train.destination(), DESTINATION_WIDTH),
            width = DESTINATION_WIDTH
        ));
    }
    if options.show_due_in {
        columns.push(format!(
            "{:>width$}",
            format_due_in(train.due_in()),
            width = DUE_WIDTH
        ));
    }
    if options.show_location {
        columns.push(train.location_string.clone());
    }

    columns.join("  ").trim_end().to_string()
}

fn truncate(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}
