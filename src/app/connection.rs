//! Websocket session with the game server

use super::App;
use crate::clock::session_url;
use crate::error::ClientError;
use crate::protocol::{Action, ActionMessage, Game};
use crate::types::ConnectionStatus;
use eframe::egui;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// What the session task reports back to the UI.
#[derive(Debug)]
pub(crate) enum NetEvent {
    Connected,
    State(Box<Game>),
    Malformed(String),
    Closed(Option<String>),
    Failed(String),
}

/// A session event tagged with the session it came from.
pub(crate) type SessionEvent = (u64, NetEvent);

pub(crate) struct Session {
    pub(crate) id: u64,
    pub(crate) actions: mpsc::UnboundedSender<Action>,
    pub(crate) cancel: CancellationToken,
}

/// Run one websocket session until it closes, fails or is cancelled.
async fn run_session(
    id: u64,
    url: String,
    mut actions: mpsc::UnboundedReceiver<Action>,
    events: mpsc::UnboundedSender<SessionEvent>,
    cancel: CancellationToken,
    ctx: egui::Context,
) {
    let report = |event: NetEvent| {
        // The receiver only goes away when the app is shutting down.
        let _ = events.send((id, event));
        ctx.request_repaint();
    };

    let stream = tokio::select! {
        _ = cancel.cancelled() => return,
        result = connect_async(url.as_str()) => match result {
            Ok((stream, _)) => stream,
            Err(e) => {
                report(NetEvent::Failed(ClientError::from(e).to_string()));
                return;
            }
        }
    };
    report(NetEvent::Connected);

    let (mut sink, mut stream) = stream.split();
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                if let Err(e) = sink.send(Message::Close(None)).await {
                    debug!(session = id, error = %e, "Close frame not sent");
                }
                debug!(session = id, "Session cancelled");
                return;
            }
            Some(action) = actions.recv() => {
                let text = match ActionMessage::encode(action) {
                    Ok(text) => text,
                    Err(e) => {
                        warn!(error = %e, "Failed to encode action");
                        continue;
                    }
                };
                if let Err(e) = sink.send(Message::text(text)).await {
                    report(NetEvent::Failed(ClientError::from(e).to_string()));
                    return;
                }
            }
            frame = stream.next() => match frame {
                Some(Ok(Message::Text(text))) => match Game::decode(text.as_str()) {
                    Ok(game) => report(NetEvent::State(Box::new(game))),
                    Err(e) => report(NetEvent::Malformed(e.to_string())),
                },
                Some(Ok(Message::Close(frame))) => {
                    let reason = frame
                        .map(|f| f.reason.as_str().to_string())
                        .filter(|r| !r.is_empty());
                    report(NetEvent::Closed(reason));
                    return;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    report(NetEvent::Failed(ClientError::from(e).to_string()));
                    return;
                }
                None => {
                    report(NetEvent::Closed(None));
                    return;
                }
            }
        }
    }
}

impl App {
    pub(crate) fn connect(&mut self, ctx: &egui::Context, url: String, key: String) {
        self.disconnect();
        self.settings.server_url = url;
        self.settings.api_key = key;

        let target = match session_url(&self.settings.server_url, &self.settings.api_key) {
            Ok(target) => target,
            Err(e) => {
                warn!(error = %e, "Not connecting");
                self.messages.error(e.to_string());
                self.connection = ConnectionStatus::Failed(e.to_string());
                return;
            }
        };

        self.next_session_id += 1;
        let id = self.next_session_id;
        let (actions_tx, actions_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        self.runtime.spawn(run_session(
            id,
            target,
            actions_rx,
            self.events_tx.clone(),
            cancel.clone(),
            ctx.clone(),
        ));

        self.session = Some(Session { id, actions: actions_tx, cancel });
        self.connection = ConnectionStatus::Connecting;
        self.game = None;
        self.round = Default::default();
        self.replay = None;
        self.autopilot.reset();

        info!(session = id, server = %self.settings.server_url, "Connecting");
        self.messages.info(format!("Connecting to {}", self.settings.server_url));
    }

    /// Cancel the running session, if any. A game in progress stays unfinished in the history.
    pub(crate) fn disconnect(&mut self) {
        if let Some(session) = self.session.take() {
            session.cancel.cancel();
            info!(session = session.id, "Disconnected");
            self.messages.info("Disconnected");
        }
        self.stop_recording();
        if self.connection.is_alive() {
            self.connection = ConnectionStatus::Disconnected;
        }
    }

    /// Drain events from the session task. Events of replaced sessions are dropped.
    pub(crate) fn poll_events(&mut self, ctx: &egui::Context) {
        while let Ok((id, event)) = self.events_rx.try_recv() {
            if self.session.as_ref().map(|s| s.id) != Some(id) {
                debug!(session = id, "Dropping event of a stale session");
                continue;
            }

            match event {
                NetEvent::Connected => {
                    info!(session = id, "Connected");
                    self.connection = ConnectionStatus::Connected;
                    self.messages.success("Connected, waiting for the game to start");
                    self.sync_clock(ctx);
                }
                NetEvent::State(game) => self.apply_state(*game),
                NetEvent::Malformed(e) => {
                    warn!(error = %e, "Ignoring malformed state");
                    self.messages.warning(format!("Ignored malformed state: {}", e));
                }
                NetEvent::Closed(reason) => {
                    info!(session = id, ?reason, "Connection closed by server");
                    self.messages.info(match &reason {
                        Some(reason) => format!("Connection closed: {}", reason),
                        None => "Connection closed".to_string(),
                    });
                    self.end_session(ConnectionStatus::Closed(reason));
                }
                NetEvent::Failed(e) => {
                    error!(session = id, error = %e, "Connection failed");
                    self.messages.error(format!("Connection failed: {}", e));
                    self.end_session(ConnectionStatus::Failed(e));
                }
            }
        }
    }

    fn end_session(&mut self, status: ConnectionStatus) {
        self.session = None;
        self.stop_recording();
        self.connection = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{attach_session, headless};
    use crate::protocol::tests::sample;
    use crate::settings::Settings;

    #[test]
    fn disconnect_lists_the_unfinished_game() {
        let mut app = headless(Settings::default());
        let _sent = attach_session(&mut app);
        app.apply_state(sample());
        app.apply_state(sample());

        app.disconnect();

        assert!(app.session.is_none());
        assert_eq!(app.connection, ConnectionStatus::Disconnected);
        assert_eq!(app.recordings.len(), app.db.game_count().unwrap());
        assert_eq!(app.recordings[0].frame_count, 2);
        assert_eq!(app.recordings[0].outcome(), "unfinished");
    }

    #[test]
    fn server_close_lists_the_unfinished_game() {
        let mut app = headless(Settings::default());
        let _sent = attach_session(&mut app);
        app.apply_state(sample());

        let id = app.session.as_ref().map(|s| s.id).unwrap();
        app.events_tx.send((id, NetEvent::Closed(Some("bye".into())))).unwrap();
        app.poll_events(&egui::Context::default());

        assert!(app.session.is_none());
        assert!(app.current_recording.is_none());
        assert_eq!(app.connection, ConnectionStatus::Closed(Some("bye".into())));
        assert_eq!(app.recordings.len(), 1);
        assert_eq!(app.recordings[0].frame_count, 1);
    }

    #[test]
    fn events_of_replaced_sessions_are_dropped() {
        let mut app = headless(Settings::default());
        let _sent = attach_session(&mut app);
        let stale = app.session.as_ref().map(|s| s.id).unwrap();
        let _sent = attach_session(&mut app);

        app.events_tx.send((stale, NetEvent::Failed("old".into()))).unwrap();
        app.poll_events(&egui::Context::default());

        assert!(app.session.is_some());
        assert_eq!(app.connection, ConnectionStatus::Connected);
    }
}
