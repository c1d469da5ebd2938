//! spe_ed wire format
//!
//! The server pushes the whole game state as one JSON text message per round
//! and a final one when the game ends. Clients answer each round with a single
//! `{"action": "..."}` message.

use crate::colors::EMPTY;
use crate::constants::{HOLES_EACH_STEP, HOLE_SPEED, MAX_SPEED, MIN_SPEED};
use crate::error::{ClientError, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Heading of a player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn turned_left(self) -> Self {
        match self {
            Direction::Up => Direction::Left,
            Direction::Left => Direction::Down,
            Direction::Down => Direction::Right,
            Direction::Right => Direction::Up,
        }
    }

    pub fn turned_right(self) -> Self {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }

    /// Unit step in board coordinates (y grows downwards).
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

/// Answer a player sends for a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    TurnLeft,
    TurnRight,
    SlowDown,
    SpeedUp,
    ChangeNothing,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::TurnLeft,
        Action::TurnRight,
        Action::SlowDown,
        Action::SpeedUp,
        Action::ChangeNothing,
    ];

    pub fn wire_name(self) -> &'static str {
        match self {
            Action::TurnLeft => "turn_left",
            Action::TurnRight => "turn_right",
            Action::SlowDown => "slow_down",
            Action::SpeedUp => "speed_up",
            Action::ChangeNothing => "change_nothing",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Action::TurnLeft => "Turn left",
            Action::TurnRight => "Turn right",
            Action::SlowDown => "Slow down",
            Action::SpeedUp => "Speed up",
            Action::ChangeNothing => "Change nothing",
        }
    }
}

/// Message sent to the server
#[derive(Debug, Serialize)]
pub struct ActionMessage {
    pub action: Action,
}

impl ActionMessage {
    pub fn encode(action: Action) -> Result<String> {
        Ok(serde_json::to_string(&ActionMessage { action })?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub x: i32,
    pub y: i32,
    pub direction: Direction,
    pub speed: u8,
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Whether moves in `round` (1-based) leave gaps: from speed 3 on, every sixth
/// round only the first and last cell of the move are filled.
pub fn leaves_gaps(round: u32, speed: u8) -> bool {
    speed >= HOLE_SPEED && round > 0 && round % HOLES_EACH_STEP == 0
}

impl Player {
    /// Cells this player would move through this round after `action`, or
    /// `None` if the action pushes the speed out of range.
    pub fn path(&self, action: Action) -> Option<Vec<(i32, i32)>> {
        let mut direction = self.direction;
        let mut speed = self.speed;
        match action {
            Action::TurnLeft => direction = direction.turned_left(),
            Action::TurnRight => direction = direction.turned_right(),
            Action::SpeedUp => speed = speed.checked_add(1)?,
            Action::SlowDown => speed = speed.checked_sub(1)?,
            Action::ChangeNothing => {}
        }
        if !(MIN_SPEED..=MAX_SPEED).contains(&speed) {
            return None;
        }

        let (dx, dy) = direction.delta();
        Some(
            (1..=i32::from(speed))
                .map(|step| (self.x + dx * step, self.y + dy * step))
                .collect(),
        )
    }
}

/// Full game state as broadcast by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub width: i32,
    pub height: i32,
    /// `cells[y][x]`
    pub cells: Vec<Vec<i8>>,
    pub players: BTreeMap<u8, Player>,
    pub you: u8,
    pub running: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
}

impl Game {
    pub fn decode(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn me(&self) -> Option<&Player> {
        self.players.get(&self.you)
    }

    pub fn cell(&self, x: i32, y: i32) -> Option<i8> {
        if x < 0 || y < 0 {
            return None;
        }
        self.cells.get(y as usize)?.get(x as usize).copied()
    }

    pub fn is_free(&self, x: i32, y: i32) -> bool {
        self.cell(x, y) == Some(EMPTY)
    }

    /// Whether `player` would survive its move after `action`. Holes in trails
    /// are not taken into account, so jumps over them count as unsafe.
    pub fn path_is_clear(&self, player: &Player, action: Action) -> bool {
        player
            .path(action)
            .is_some_and(|path| path.iter().all(|&(x, y)| self.is_free(x, y)))
    }

    pub fn active_count(&self) -> usize {
        self.players.values().filter(|p| p.active).count()
    }

    /// Winner of a finished game; `None` while running or on a draw.
    pub fn winner(&self) -> Option<u8> {
        if self.running {
            return None;
        }
        let mut active = self.players.iter().filter(|(_, p)| p.active);
        match (active.next(), active.next()) {
            (Some((id, _)), None) => Some(*id),
            _ => None,
        }
    }

    pub fn deadline_at(&self) -> Option<DateTime<Utc>> {
        self.deadline.as_deref().and_then(|d| parse_rfc3339(d).ok())
    }

    /// Number of non-empty cells.
    pub fn occupied_cells(&self) -> usize {
        self.cells.iter().flatten().filter(|&&c| c != EMPTY).count()
    }
}

/// Response of the server's time endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ServerTime {
    pub time: String,
    #[serde(default)]
    pub milliseconds: i64,
}

impl ServerTime {
    pub fn instant(&self) -> Result<DateTime<Utc>> {
        Ok(parse_rfc3339(&self.time)? + Duration::milliseconds(self.milliseconds))
    }
}

pub fn parse_rfc3339(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ClientError::Timestamp(s.to_string()))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const SAMPLE: &str = r#"{
        "width": 5,
        "height": 4,
        "cells": [
            [0, 0, 0, 0, 0],
            [0, 1, 0, 0, 2],
            [0, 1, 0, -1, 0],
            [0, 0, 0, 0, 0]
        ],
        "players": {
            "1": {"x": 1, "y": 1, "direction": "up", "speed": 1, "active": true},
            "2": {"x": 4, "y": 1, "direction": "left", "speed": 2, "active": true, "name": "Bob"}
        },
        "you": 1,
        "running": true,
        "deadline": "2021-01-11T17:00:05Z"
    }"#;

    pub(crate) fn sample() -> Game {
        Game::decode(SAMPLE).unwrap()
    }

    #[test]
    fn decodes_server_state() {
        let game = sample();
        assert_eq!((game.width, game.height), (5, 4));
        assert_eq!(game.players.len(), 2);
        assert_eq!(game.me().unwrap().direction, Direction::Up);
        assert_eq!(game.players[&2].name.as_deref(), Some("Bob"));
        assert_eq!(game.cell(3, 2), Some(-1));
        assert_eq!(game.cell(5, 0), None);
        assert_eq!(game.cell(-1, 0), None);
        assert_eq!(game.occupied_cells(), 4);
    }

    #[test]
    fn final_state_has_no_deadline() {
        let text = SAMPLE.replace(r#""running": true,"#, r#""running": false"#);
        let text = text.replace(r#""deadline": "2021-01-11T17:00:05Z""#, "");
        let game = Game::decode(&text).unwrap();
        assert!(game.deadline.is_none());
        assert!(game.deadline_at().is_none());
    }

    #[test]
    fn deadline_parses_as_utc() {
        let game = sample();
        let deadline = game.deadline_at().unwrap();
        assert_eq!(deadline.to_rfc3339(), "2021-01-11T17:00:05+00:00");
    }

    #[test]
    fn action_message_uses_wire_names() {
        for action in Action::ALL {
            let json = ActionMessage::encode(action).unwrap();
            assert_eq!(json, format!(r#"{{"action":"{}"}}"#, action.wire_name()));
        }
    }

    #[test]
    fn turning_is_relative_to_heading() {
        assert_eq!(Direction::Up.turned_left(), Direction::Left);
        assert_eq!(Direction::Up.turned_right(), Direction::Right);
        assert_eq!(Direction::Left.turned_left().turned_left(), Direction::Right);
        for d in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
            assert_eq!(d.turned_left().turned_right(), d);
        }
    }

    #[test]
    fn path_respects_speed_limits() {
        let game = sample();
        let me = game.me().unwrap();
        assert!(me.path(Action::SlowDown).is_none());
        assert_eq!(me.path(Action::SpeedUp).unwrap(), vec![(1, 0), (1, -1)]);
        assert_eq!(me.path(Action::TurnRight).unwrap(), vec![(2, 1)]);

        let mut fast = me.clone();
        fast.speed = MAX_SPEED;
        assert!(fast.path(Action::SpeedUp).is_none());
    }

    #[test]
    fn clear_paths() {
        let game = sample();
        let me = game.me().unwrap();
        assert!(game.path_is_clear(me, Action::ChangeNothing));
        assert!(!game.path_is_clear(me, Action::SpeedUp)); // leaves the board
        assert!(game.path_is_clear(me, Action::TurnLeft));
        assert!(!game.path_is_clear(me, Action::SlowDown));

        let bob = &game.players[&2];
        // two steps left from (4,1): (3,1) and (2,1) are free
        assert!(game.path_is_clear(bob, Action::ChangeNothing));
        // turning left heads down into (4,2), (4,3)
        assert!(game.path_is_clear(bob, Action::TurnLeft));
    }

    #[test]
    fn winner_only_after_the_game() {
        let mut game = sample();
        assert_eq!(game.winner(), None);
        game.running = false;
        assert_eq!(game.winner(), None, "two active players is not a win");
        game.players.get_mut(&2).unwrap().active = false;
        assert_eq!(game.winner(), Some(1));
        game.players.get_mut(&1).unwrap().active = false;
        assert_eq!(game.winner(), None, "draw");
    }

    #[test]
    fn gaps_every_sixth_round_at_speed() {
        assert!(leaves_gaps(6, 3));
        assert!(leaves_gaps(12, 10));
        assert!(!leaves_gaps(6, 2));
        assert!(!leaves_gaps(5, 3));
        assert!(!leaves_gaps(0, 5));
    }

    #[test]
    fn server_time_adds_milliseconds() {
        let t = ServerTime { time: "2021-01-11T17:00:05Z".into(), milliseconds: 250 };
        let instant = t.instant().unwrap();
        assert_eq!(instant.timestamp_millis() % 1000, 250);
        assert!(ServerTime { time: "yesterday".into(), milliseconds: 0 }.instant().is_err());
    }

    #[test]
    fn round_trips_through_json() {
        let game = sample();
        let text = serde_json::to_string(&game).unwrap();
        assert_eq!(Game::decode(&text).unwrap(), game);
    }
}
