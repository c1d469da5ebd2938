//! App module - application state and the intents components raise

mod connection;
mod history;
mod rounds;
mod server_time;

use crate::clock::ServerClock;
use crate::constants::RULES_URL;
use crate::db::{Database, Recording};
use crate::protocol::Game;
use crate::settings::Settings;
use crate::strategy::Autopilot;
use crate::theme;
use crate::types::*;
use crate::ui::registry::Registry;
use crate::ui::View;
use connection::{Session, SessionEvent};
use eframe::egui;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

// ============================================================================
// APP STATE
// ============================================================================

pub struct App {
    pub(crate) db: Database,
    pub(crate) settings: Settings,
    pub(crate) registry: Registry,
    pub(crate) runtime: tokio::runtime::Runtime,
    pub(crate) http: reqwest::Client,
    pub(crate) data_dir: PathBuf,
    // Live game
    pub(crate) game: Option<Game>,
    pub(crate) round: RoundState,
    pub(crate) connection: ConnectionStatus,
    pub(crate) session: Option<Session>,
    pub(crate) next_session_id: u64,
    pub(crate) events_tx: mpsc::UnboundedSender<SessionEvent>,
    pub(crate) events_rx: mpsc::UnboundedReceiver<SessionEvent>,
    pub(crate) clock: Arc<Mutex<ServerClock>>,
    pub(crate) messages: MessageLog,
    pub(crate) autopilot: Autopilot,
    // History
    pub(crate) recordings: Vec<Recording>,
    /// Recording being written and the index of its next frame
    pub(crate) current_recording: Option<(i64, u32)>,
    pub(crate) replay: Option<Replay>,
    // Window
    pub(crate) window_pos: Option<egui::Pos2>,
    pub(crate) window_size: Option<egui::Vec2>,
    pub(crate) needs_center: bool,
    pub(crate) clock_synced_once: bool,
}

// ============================================================================
// APP INITIALIZATION & HELPERS
// ============================================================================

impl App {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        runtime: tokio::runtime::Runtime,
        db: Database,
        registry: Registry,
        settings: Settings,
        data_dir: PathBuf,
    ) -> Self {
        // Force dark theme
        cc.egui_ctx.set_theme(egui::Theme::Dark);

        // Phosphor icons as a fallback for the default fonts
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        theme::apply_visuals(&cc.egui_ctx);

        let mut app = Self::with_parts(runtime, db, registry, settings, data_dir);
        app.messages.info(format!(
            "{} recorded games. Enter an API key and connect to play.",
            app.recordings.len()
        ));
        app
    }

    /// Application state without any window setup.
    pub(crate) fn with_parts(
        runtime: tokio::runtime::Runtime,
        db: Database,
        registry: Registry,
        settings: Settings,
        data_dir: PathBuf,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let autopilot = Autopilot::new(settings.strategy);

        let mut app = Self {
            db,
            settings,
            registry,
            runtime,
            http: reqwest::Client::new(),
            data_dir,
            game: None,
            round: RoundState::default(),
            connection: ConnectionStatus::default(),
            session: None,
            next_session_id: 0,
            events_tx,
            events_rx,
            clock: Arc::new(Mutex::new(ServerClock::default())),
            messages: MessageLog::default(),
            autopilot,
            recordings: Vec::new(),
            current_recording: None,
            replay: None,
            window_pos: None,
            window_size: None,
            needs_center: false,
            clock_synced_once: false,
        };

        app.refresh_recordings();
        app
    }

    pub fn save_settings(&mut self) {
        self.settings.window_x = self.window_pos.map(|p| p.x);
        self.settings.window_y = self.window_pos.map(|p| p.y);
        self.settings.window_w = self.window_size.map(|s| s.x);
        self.settings.window_h = self.window_size.map(|s| s.y);
        self.settings.save(&self.data_dir);
    }

    /// State shown on the board: the replay frame if a replay is open.
    pub(crate) fn visible_game(&self) -> Option<&Game> {
        match &self.replay {
            Some(replay) => replay.current(),
            None => self.game.as_ref(),
        }
    }

    /// Draw one frame from the mounted root, then apply what the components asked for.
    pub(crate) fn render(&mut self, ctx: &egui::Context) {
        let clock = self.clock.lock().unwrap().clone();
        let mut intents = Vec::new();

        let game = match &self.replay {
            Some(replay) => replay.current(),
            None => self.game.as_ref(),
        };
        let mut view = View {
            game,
            live: self.replay.is_none(),
            round: &self.round,
            connection: &self.connection,
            server_url: &self.settings.server_url,
            api_key: &self.settings.api_key,
            messages: &self.messages,
            clock: &clock,
            autoplay: self.settings.autoplay,
            strategy: self.settings.strategy,
            record_games: self.settings.record_games,
            grid_lines: self.settings.grid_lines,
            recordings: &self.recordings,
            replay: self.replay.as_ref(),
            intents: &mut intents,
        };
        self.registry.render(ctx, &mut view);

        for intent in intents {
            self.apply_intent(ctx, intent);
        }
    }

    pub(crate) fn apply_intent(&mut self, ctx: &egui::Context, intent: Intent) {
        debug!(?intent, "Applying intent");
        match intent {
            Intent::Connect { url, key } => self.connect(ctx, url, key),
            Intent::Disconnect => self.disconnect(),
            Intent::SendAction(action) => {
                if self.replay.is_some() {
                    self.messages.warning("Close the replay to play");
                } else {
                    self.send_action(action);
                }
            }
            Intent::SetAutoplay(on) => {
                self.settings.autoplay = on;
                self.messages.info(if on { "Autopilot on" } else { "Autopilot off" });
                if on {
                    self.autoplay_round();
                }
            }
            Intent::SetStrategy(kind) => {
                self.settings.strategy = kind;
                self.autopilot.set_kind(kind);
                self.messages.info(format!("Strategy: {}", kind.label()));
            }
            Intent::SetGridLines(on) => self.settings.grid_lines = on,
            Intent::SetRecording(on) => {
                self.settings.record_games = on;
                if !on {
                    // The game in progress stays unfinished.
                    self.stop_recording();
                }
            }
            Intent::SyncClock => self.sync_clock(ctx),
            Intent::ClearMessages => self.messages.clear(),
            Intent::OpenReplay(id) => self.open_replay(id),
            Intent::SeekReplay(index) => self.seek_replay(index),
            Intent::CloseReplay => self.close_replay(),
            Intent::ExportRecording(id) => self.export_recording(id),
            Intent::DeleteRecording(id) => self.delete_recording(id),
            Intent::SaveSnapshot => self.save_snapshot(),
            Intent::OpenRules => {
                if let Err(e) = open::that(RULES_URL) {
                    warn!(error = %e, "Failed to open rules page");
                }
            }
            Intent::OpenLogs => {
                let logs = self.data_dir.join("logs");
                info!(path = %logs.display(), "Opening logs folder");
                if let Err(e) = open::that(&logs) {
                    warn!(error = %e, "Failed to open logs folder");
                    self.messages.error(format!("Could not open {}", logs.display()));
                }
            }
        }
    }
}
