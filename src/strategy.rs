//! Autopilot strategies
//!
//! Simple opponents in the spirit of the server's built-in bots. They only look
//! one round ahead.

use crate::protocol::{Action, Direction, Game, Player};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StrategyKind {
    /// Straight ahead until blocked, then turn.
    #[default]
    Cautious,
    /// Keep one hand on the wall.
    WallHugger,
    /// Random move among those that survive this round.
    RandomSafe,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 3] = [
        StrategyKind::Cautious,
        StrategyKind::WallHugger,
        StrategyKind::RandomSafe,
    ];

    pub fn label(self) -> &'static str {
        match self {
            StrategyKind::Cautious => "Cautious",
            StrategyKind::WallHugger => "Wall hugger",
            StrategyKind::RandomSafe => "Random (safe)",
        }
    }
}

/// Actions that keep the player alive for this round.
pub fn safe_actions(game: &Game, player: &Player) -> Vec<Action> {
    Action::ALL
        .into_iter()
        .filter(|&a| game.path_is_clear(player, a))
        .collect()
}

/// Next cell straight ahead after changing heading to `direction`.
fn next_free(game: &Game, player: &Player, direction: Direction) -> bool {
    let (dx, dy) = direction.delta();
    game.is_free(player.x + dx, player.y + dy)
}

pub struct Autopilot {
    kind: StrategyKind,
    /// Side the wall hugger keeps its hand on; picked on first use.
    hand: Option<Action>,
    rng: StdRng,
}

impl Autopilot {
    pub fn new(kind: StrategyKind) -> Self {
        Self::with_rng(kind, StdRng::from_entropy())
    }

    pub fn with_rng(kind: StrategyKind, rng: StdRng) -> Self {
        Self { kind, hand: None, rng }
    }

    pub fn kind(&self) -> StrategyKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: StrategyKind) {
        if kind != self.kind {
            self.kind = kind;
            self.hand = None;
        }
    }

    /// Forget per-game state.
    pub fn reset(&mut self) {
        self.hand = None;
    }

    /// Pick an answer for the current round. Returns `None` when there is
    /// nothing to answer (game over, or we are out).
    pub fn choose(&mut self, game: &Game) -> Option<Action> {
        if !game.running {
            return None;
        }
        let me = game.me().filter(|p| p.active)?;
        let action = match self.kind {
            StrategyKind::Cautious => self.cautious(game, me),
            StrategyKind::WallHugger => self.wall_hugger(game, me),
            StrategyKind::RandomSafe => self.random_safe(game, me),
        };
        Some(action)
    }

    fn cautious(&mut self, game: &Game, me: &Player) -> Action {
        if next_free(game, me, me.direction) {
            return Action::ChangeNothing;
        }
        let (first, second) = if self.rng.gen_bool(0.5) {
            (Action::TurnLeft, Action::TurnRight)
        } else {
            (Action::TurnRight, Action::TurnLeft)
        };
        let heading = |a: Action| match a {
            Action::TurnLeft => me.direction.turned_left(),
            _ => me.direction.turned_right(),
        };
        if next_free(game, me, heading(first)) {
            first
        } else {
            second
        }
    }

    fn wall_hugger(&mut self, game: &Game, me: &Player) -> Action {
        let hand = *self.hand.get_or_insert_with(|| {
            if self.rng.gen_bool(0.5) {
                Action::TurnLeft
            } else {
                Action::TurnRight
            }
        });
        let (towards, away) = match hand {
            Action::TurnLeft => (me.direction.turned_left(), me.direction.turned_right()),
            _ => (me.direction.turned_right(), me.direction.turned_left()),
        };
        let other = if hand == Action::TurnLeft {
            Action::TurnRight
        } else {
            Action::TurnLeft
        };

        if next_free(game, me, towards) {
            hand
        } else if next_free(game, me, me.direction) {
            Action::ChangeNothing
        } else if next_free(game, me, away) {
            other
        } else {
            Action::ChangeNothing
        }
    }

    fn random_safe(&mut self, game: &Game, me: &Player) -> Action {
        safe_actions(game, me)
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(Action::ChangeNothing)
    }
}
