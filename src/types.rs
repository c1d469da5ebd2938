//! Common types and data structures

use crate::constants::MAX_MESSAGES;
use crate::protocol::{Action, Game};
use crate::strategy::StrategyKind;
use chrono::{DateTime, Local};
use std::collections::VecDeque;

/// State of the websocket session
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Closed(Option<String>),
    Failed(String),
}

impl ConnectionStatus {
    pub fn is_alive(&self) -> bool {
        matches!(self, ConnectionStatus::Connecting | ConnectionStatus::Connected)
    }

    pub fn label(&self) -> String {
        match self {
            ConnectionStatus::Disconnected => "Disconnected".into(),
            ConnectionStatus::Connecting => "Connecting…".into(),
            ConnectionStatus::Connected => "Connected".into(),
            ConnectionStatus::Closed(None) => "Closed".into(),
            ConnectionStatus::Closed(Some(reason)) => format!("Closed ({})", reason),
            ConnectionStatus::Failed(e) => format!("Failed: {}", e),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct LogMessage {
    pub at: DateTime<Local>,
    pub level: MessageLevel,
    pub text: String,
}

/// On-screen message log, oldest entries dropped first
#[derive(Debug, Default)]
pub struct MessageLog {
    entries: VecDeque<LogMessage>,
}

impl MessageLog {
    pub fn push(&mut self, level: MessageLevel, text: impl Into<String>) {
        if self.entries.len() == MAX_MESSAGES {
            self.entries.pop_front();
        }
        self.entries.push_back(LogMessage { at: Local::now(), level, text: text.into() });
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(MessageLevel::Info, text);
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.push(MessageLevel::Success, text);
    }

    pub fn warning(&mut self, text: impl Into<String>) {
        self.push(MessageLevel::Warning, text);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(MessageLevel::Error, text);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &LogMessage> {
        self.entries.iter()
    }
}

/// Bookkeeping for the round currently being played
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoundState {
    /// 1-based; 0 before the first running state
    pub round: u32,
    pub deadline: Option<String>,
    /// Answer already sent this round
    pub answered: Option<Action>,
    pub game_over: bool,
}

impl RoundState {
    /// Advance on a freshly received state. Returns true when a new round began.
    pub fn observe(&mut self, game: &Game) -> bool {
        if !game.running {
            self.game_over = true;
            self.deadline = None;
            return false;
        }
        if self.game_over {
            *self = RoundState::default();
        }
        self.round += 1;
        self.deadline = game.deadline.clone();
        self.answered = None;
        true
    }

    pub fn can_answer(&self) -> bool {
        self.round > 0 && !self.game_over && self.answered.is_none()
    }
}

/// Frames of a recorded game and the frame being shown
#[derive(Debug, Clone)]
pub struct Replay {
    pub recording_id: i64,
    pub frames: Vec<Game>,
    pub cursor: usize,
}

impl Replay {
    pub fn new(recording_id: i64, frames: Vec<Game>) -> Self {
        Self { recording_id, frames, cursor: 0 }
    }

    pub fn current(&self) -> Option<&Game> {
        self.frames.get(self.cursor)
    }

    /// Move to `index`, clamped to the available frames.
    pub fn seek(&mut self, index: usize) {
        self.cursor = index.min(self.frames.len().saturating_sub(1));
    }

    pub fn last_index(&self) -> usize {
        self.frames.len().saturating_sub(1)
    }
}

/// Requests raised by components, applied by the app after the frame
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Connect { url: String, key: String },
    Disconnect,
    SendAction(Action),
    SetAutoplay(bool),
    SetStrategy(StrategyKind),
    SetGridLines(bool),
    SetRecording(bool),
    SyncClock,
    ClearMessages,
    OpenReplay(i64),
    SeekReplay(usize),
    CloseReplay,
    ExportRecording(i64),
    DeleteRecording(i64),
    SaveSnapshot,
    OpenRules,
    OpenLogs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::tests::sample;

    #[test]
    fn message_log_is_capped() {
        let mut log = MessageLog::default();
        for i in 0..MAX_MESSAGES + 10 {
            log.info(format!("m{i}"));
        }
        assert_eq!(log.len(), MAX_MESSAGES);
        assert_eq!(log.iter().next().unwrap().text, "m10");
        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn rounds_advance_on_running_states() {
        let mut game = sample();
        let mut round = RoundState::default();
        assert!(!round.can_answer());

        assert!(round.observe(&game));
        assert_eq!(round.round, 1);
        assert!(round.can_answer());
        round.answered = Some(Action::TurnLeft);
        assert!(!round.can_answer());

        assert!(round.observe(&game));
        assert_eq!(round.round, 2);
        assert_eq!(round.answered, None);

        game.running = false;
        assert!(!round.observe(&game));
        assert!(round.game_over);
        assert!(!round.can_answer());
        assert_eq!(round.round, 2);
    }

    #[test]
    fn new_game_restarts_round_count() {
        let mut game = sample();
        let mut round = RoundState::default();
        round.observe(&game);
        game.running = false;
        round.observe(&game);
        game.running = true;
        assert!(round.observe(&game));
        assert_eq!(round.round, 1);
        assert!(!round.game_over);
    }

    #[test]
    fn replay_seek_is_clamped() {
        let mut replay = Replay::new(1, vec![sample(), sample(), sample()]);
        replay.seek(10);
        assert_eq!(replay.cursor, 2);
        replay.seek(1);
        assert_eq!(replay.cursor, 1);
        let mut empty = Replay::new(2, Vec::new());
        empty.seek(3);
        assert_eq!(empty.cursor, 0);
        assert!(empty.current().is_none());
    }

    #[test]
    fn status_labels() {
        assert!(ConnectionStatus::Connected.is_alive());
        assert!(!ConnectionStatus::Closed(None).is_alive());
        assert_eq!(ConnectionStatus::Closed(Some("bye".into())).label(), "Closed (bye)");
    }
}
