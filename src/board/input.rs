//! Keyboard handling for the live board

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::notifications::{Notification, NotificationSender};

/// How often pending key events are drained
pub const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Actions the board reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardCommand {
    Quit,
    UpdateCache,
}

/// Maps a key press to a board command
pub fn board_command(key_event: &KeyEvent) -> Option<BoardCommand> {
    if key_event.kind == KeyEventKind::Release {
        return None;
    }
    match key_event.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(BoardCommand::Quit),
        // Raw mode swallows SIGINT, so Ctrl+C arrives as a key
        KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(BoardCommand::Quit)
        }
        KeyCode::Char('u') => Some(BoardCommand::UpdateCache),
        _ => None,
    }
}

/// Reads every key event already queued by the terminal without blocking.
///
/// Returns `true` when the board should quit.
pub fn drain_key_events(requests: &NotificationSender) -> Result<bool, AppError> {
    while event::poll(Duration::ZERO)? {
        if let Event::Key(key_event) = event::read()? {
            debug!("Key event: {:?}", key_event.code);
            if apply_command(board_command(&key_event), requests) {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

/// Carries out a command; returns `true` for quit
pub fn apply_command(command: Option<BoardCommand>, requests: &NotificationSender) -> bool {
    match command {
        Some(BoardCommand::Quit) => {
            info!("Quit requested");
            true
        }
        Some(BoardCommand::UpdateCache) => {
            info!("Reference data update requested from the board");
            if requests.send(Notification::RequestCacheUpdate).is_err() {
                warn!("Refresh scheduler is not running, cache update dropped");
            }
            false
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_key_bindings() {
        assert_eq!(
            board_command(&key(KeyCode::Char('q'), KeyModifiers::NONE)),
            Some(BoardCommand::Quit)
        );
        assert_eq!(
            board_command(&key(KeyCode::Esc, KeyModifiers::NONE)),
            Some(BoardCommand::Quit)
        );
        assert_eq!(
            board_command(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(BoardCommand::Quit)
        );
        assert_eq!(
            board_command(&key(KeyCode::Char('u'), KeyModifiers::NONE)),
            Some(BoardCommand::UpdateCache)
        );
        assert_eq!(board_command(&key(KeyCode::Char('c'), KeyModifiers::NONE)), None);
        assert_eq!(board_command(&key(KeyCode::Enter, KeyModifiers::NONE)), None);
    }

    #[test]
    fn test_key_release_is_ignored() {
        let mut release = key(KeyCode::Char('q'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(board_command(&release), None);
    }

    #[test]
    fn test_update_key_requests_cache_update() {
        let (requests, mut inbox) = notifications::channel();

        assert!(!apply_command(Some(BoardCommand::UpdateCache), &requests));
        assert_eq!(inbox.try_recv(), Ok(Notification::RequestCacheUpdate));

        assert!(apply_command(Some(BoardCommand::Quit), &requests));
        assert!(!apply_command(None, &requests));
        assert!(inbox.try_recv().is_err());
    }

    #[test]
    fn test_update_request_without_scheduler_does_not_quit() {
        let (requests, inbox) = notifications::channel();
        drop(inbox);
        assert!(!apply_command(Some(BoardCommand::UpdateCache), &requests));
    }
}
