//! Terminal handling for the live board
//!
//! The board runs on the alternate screen and is redrawn whenever a new
//! [`RenderModel`] is published. `q` quits and `u` asks for fresh reference
//! data.

use std::future::Future;
use std::io::{Stdout, Write, stdout};
use std::sync::Arc;

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute, queue,
    style::Print,
    terminal::{
        Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
        enable_raw_mode,
    },
};
use tokio::sync::watch;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info};

use super::input::{INPUT_POLL_INTERVAL, drain_key_events};
use super::render::render_lines;
use super::{BoardOptions, RenderModel};
use crate::error::AppError;
use crate::notifications::NotificationSender;

/// Configuration for terminal management operations
#[derive(Debug, Clone, Default)]
pub struct TerminalConfig {
    /// Draw into the normal screen instead of the alternate one
    pub debug_mode: bool,
}

/// Terminal manager responsible for setup and cleanup operations
#[derive(Debug, Default)]
pub struct TerminalManager {
    config: TerminalConfig,
}

impl TerminalManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TerminalConfig) -> Self {
        Self { config }
    }

    /// Enters raw mode and the alternate screen, and hides the cursor
    pub fn setup_terminal(&self) -> Result<Stdout, AppError> {
        let mut stdout = stdout();
        if !self.config.debug_mode {
            enable_raw_mode()?;
            execute!(stdout, EnterAlternateScreen, Hide)?;
        }
        Ok(stdout)
    }

    /// Restores the terminal to its original state
    pub fn cleanup_terminal(&self, mut stdout: Stdout) -> Result<(), AppError> {
        if !self.config.debug_mode {
            execute!(stdout, Show, LeaveAlternateScreen)?;
            disable_raw_mode()?;
        }
        Ok(())
    }

    pub fn config(&self) -> &TerminalConfig {
        &self.config
    }
}

/// Draws render models to a terminal
#[derive(Debug, Clone, Copy)]
pub struct BoardDisplay {
    options: BoardOptions,
}

impl BoardDisplay {
    pub fn new(options: BoardOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &BoardOptions {
        &self.options
    }

    /// Clears the screen and draws the whole board in one flush
    pub fn draw<W: Write>(&self, out: &mut W, model: &RenderModel) -> Result<(), AppError> {
        queue!(out, MoveTo(0, 0), Clear(ClearType::All))?;
        for (row, line) in render_lines(model, &self.options).into_iter().enumerate() {
            let row = u16::try_from(row).unwrap_or(u16::MAX);
            queue!(out, MoveTo(0, row), Print(line))?;
        }
        out.flush()?;
        Ok(())
    }

    /// Writes the board as plain consecutive lines, for one-shot output
    pub fn print<W: Write>(&self, out: &mut W, model: &RenderModel) -> Result<(), AppError> {
        for line in render_lines(model, &self.options) {
            writeln!(out, "{line}")?;
        }
        out.flush()?;
        Ok(())
    }

    /// Redraws the board on every published model until `shutdown` completes,
    /// the quit key is pressed or the publisher goes away.
    ///
    /// Cache update requests from the keyboard are sent on `requests`.
    pub async fn run(
        self,
        terminal: &TerminalManager,
        mut models: watch::Receiver<Arc<RenderModel>>,
        requests: NotificationSender,
        shutdown: impl Future<Output = ()>,
    ) -> Result<(), AppError> {
        let mut stdout = terminal.setup_terminal()?;
        let result = self
            .redraw_loop(&mut stdout, &mut models, &requests, shutdown)
            .await;
        terminal.cleanup_terminal(stdout)?;
        result
    }

    async fn redraw_loop(
        &self,
        stdout: &mut Stdout,
        models: &mut watch::Receiver<Arc<RenderModel>>,
        requests: &NotificationSender,
        shutdown: impl Future<Output = ()>,
    ) -> Result<(), AppError> {
        tokio::pin!(shutdown);

        let initial = Arc::clone(&models.borrow_and_update());
        self.draw(stdout, &initial)?;

        let mut input = interval(INPUT_POLL_INTERVAL);
        input.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Board shutting down");
                    return Ok(());
                }
                _ = input.tick() => {
                    if drain_key_events(requests)? {
                        return Ok(());
                    }
                }
                changed = models.changed() => {
                    if changed.is_err() {
                        debug!("Render model publisher closed");
                        return Ok(());
                    }
                    let model = Arc::clone(&models.borrow_and_update());
                    self.draw(stdout, &model)?;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_display() -> BoardDisplay {
        BoardDisplay::new(BoardOptions {
            colorize: false,
            ..BoardOptions::default()
        })
    }

    #[test]
    fn test_terminal_manager_creation() {
        let manager = TerminalManager::new();
        assert!(!manager.config().debug_mode);

        let manager = TerminalManager::with_config(TerminalConfig { debug_mode: true });
        assert!(manager.config().debug_mode);
    }

    #[test]
    fn test_print_writes_plain_lines() {
        let model = RenderModel {
            station_label: "Haymarket".to_string(),
            platform_label: "Platform 2".to_string(),
            trains: Vec::new(),
        };
        let mut out = Vec::new();
        plain_display().print(&mut out, &model).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, " Haymarket\n Platform 2\n\n No trains\n");
    }

    #[test]
    fn test_draw_positions_every_line() {
        let model = RenderModel::default();
        let mut out = Vec::new();
        plain_display().draw(&mut out, &model).unwrap();

        let text = String::from_utf8(out).unwrap();
        // Cursor moves to the first column of row 4 (1-based) for "No trains"
        assert!(text.contains("\x1b[4;1H No trains"), "{text:?}");
    }
}
