//! UI module - component registry, bootstrap and the components themselves
//!
//! Components read application state through a [`View`] and request changes
//! by pushing [`Intent`]s, which the app applies once the frame is drawn.

pub mod components;
pub mod registry;

use crate::clock::ServerClock;
use crate::constants::MOUNT_ANCHOR;
use crate::db::Recording;
use crate::protocol::Game;
use crate::strategy::StrategyKind;
use crate::types::{ConnectionStatus, Intent, MessageLog, Replay, RoundState};
use components::*;
use registry::{Registry, RegistryError};
use tracing::info;

/// Everything a component may look at while drawing one frame.
pub struct View<'a> {
    /// Live state, or the replay frame being shown
    pub game: Option<&'a Game>,
    pub live: bool,
    pub round: &'a RoundState,
    pub connection: &'a ConnectionStatus,
    pub server_url: &'a str,
    pub api_key: &'a str,
    pub messages: &'a MessageLog,
    pub clock: &'a ServerClock,
    pub autoplay: bool,
    pub strategy: StrategyKind,
    pub record_games: bool,
    pub grid_lines: bool,
    pub recordings: &'a [Recording],
    pub replay: Option<&'a Replay>,
    pub intents: &'a mut Vec<Intent>,
}

impl View<'_> {
    pub fn emit(&mut self, intent: Intent) {
        self.intents.push(intent);
    }

    /// Whether an action may be sent right now.
    pub fn can_act(&self) -> bool {
        self.live
            && *self.connection == ConnectionStatus::Connected
            && self.round.can_answer()
            && self
                .game
                .is_some_and(|g| g.running && g.me().is_some_and(|p| p.active))
    }
}

/// Register the components and mount the root.
pub fn bootstrap() -> Result<Registry, RegistryError> {
    let mut registry = Registry::default();

    registry.register(Box::new(StateComponent))?;
    registry.register(Box::new(CellsComponent::default()))?;
    registry.register(Box::new(PlayersComponent))?;
    registry.register(Box::new(MessagesComponent::default()))?;
    registry.register(Box::new(ConnectionComponent::default()))?;
    registry.register(Box::new(ControlsComponent))?;
    registry.register(Box::new(BoxComponent))?;
    registry.register(Box::new(ServerTimeComponent))?;
    registry.register(Box::new(PlayerComponent))?;
    registry.register(Box::new(HistoryComponent::default()))?;

    registry.mount(Box::new(MainComponent::default()), MOUNT_ANCHOR)?;

    info!(
        components = registry.components().len(),
        root = registry.root_name(),
        anchor = MOUNT_ANCHOR,
        "UI bootstrapped"
    );
    Ok(registry)
}
