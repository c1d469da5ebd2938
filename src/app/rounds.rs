//! Round bookkeeping, answering the server and recording games

use super::App;
use crate::protocol::{Action, Game};
use crate::types::{ConnectionStatus, RoundState};
use chrono::Utc;
use tracing::{debug, error, info, warn};

/// Why an action may not be sent right now, if it may not.
pub(crate) fn refusal(connection: &ConnectionStatus, game: Option<&Game>, round: &RoundState) -> Option<&'static str> {
    if *connection != ConnectionStatus::Connected {
        return Some("not connected");
    }
    let Some(game) = game else {
        return Some("no game yet");
    };
    if !game.running || round.game_over {
        return Some("the game is over");
    }
    if !game.me().is_some_and(|p| p.active) {
        return Some("you are out");
    }
    if round.answered.is_some() {
        // A second answer in the same round gets the player disqualified.
        return Some("already answered this round");
    }
    None
}

impl App {
    /// Take in a state pushed by the server.
    pub(crate) fn apply_state(&mut self, game: Game) {
        let was_over = self.round.game_over;
        let new_round = self.round.observe(&game);

        if new_round {
            debug!(round = self.round.round, deadline = ?self.round.deadline, "New round");
            if self.round.round == 1 {
                info!(
                    width = game.width,
                    height = game.height,
                    players = game.players.len(),
                    you = game.you,
                    "Game started"
                );
                self.messages.success(format!(
                    "Game started on a {}×{} board with {} players, you are player {}",
                    game.width,
                    game.height,
                    game.players.len(),
                    game.you
                ));
                self.autopilot.reset();
                self.start_recording(&game);
            }
        }

        self.record_frame(&game);

        if !game.running && !was_over {
            self.announce_result(&game);
            self.finish_recording(game.winner());
        }

        let eliminated = self
            .game
            .as_ref()
            .and_then(|prev| prev.me().map(|p| p.active))
            .unwrap_or(false)
            && !game.me().is_some_and(|p| p.active);
        if eliminated {
            warn!(round = self.round.round, "Own player eliminated");
            self.messages.warning(format!("You were eliminated in round {}", self.round.round));
        }

        self.game = Some(game);

        if new_round {
            self.autoplay_round();
        }
    }

    /// Let the autopilot answer the current round if it is enabled.
    pub(crate) fn autoplay_round(&mut self) {
        if !self.settings.autoplay || !self.round.can_answer() {
            return;
        }
        let choice = self.game.as_ref().and_then(|g| self.autopilot.choose(g));
        if let Some(action) = choice {
            debug!(strategy = ?self.autopilot.kind(), action = action.wire_name(), "Autopilot move");
            self.send_action(action);
        }
    }

    /// Answer the current round. At most one action is sent per round.
    pub(crate) fn send_action(&mut self, action: Action) -> bool {
        if let Some(reason) = refusal(&self.connection, self.game.as_ref(), &self.round) {
            warn!(action = action.wire_name(), reason, "Action not sent");
            self.messages.warning(format!("{} not sent: {}", action.label(), reason));
            return false;
        }
        let Some(session) = &self.session else {
            return false;
        };
        if session.actions.send(action).is_err() {
            error!("Session task is gone");
            self.messages.error("Session closed, action not sent");
            return false;
        }

        self.round.answered = Some(action);
        info!(round = self.round.round, action = action.wire_name(), "Action sent");
        true
    }

    fn announce_result(&mut self, game: &Game) {
        match game.winner() {
            Some(w) if w == game.you => {
                info!(rounds = self.round.round, "Game won");
                self.messages.success("You won!");
            }
            Some(w) => {
                info!(winner = w, "Game lost");
                self.messages.info(format!("Player {} won", w));
            }
            None => {
                info!("Game ended in a draw");
                self.messages.info("Game over, nobody survived");
            }
        }
    }

    fn start_recording(&mut self, game: &Game) {
        if !self.settings.record_games {
            return;
        }
        match self.db.start_game(game, &self.settings.server_url, Utc::now()) {
            Ok(id) => {
                debug!(recording = id, "Recording game");
                self.current_recording = Some((id, 0));
                self.refresh_recordings();
            }
            Err(e) => {
                error!(error = %e, "Failed to start recording");
                self.messages.error(format!("Recording failed: {}", e));
            }
        }
    }

    fn record_frame(&mut self, game: &Game) {
        let Some((id, next)) = self.current_recording.as_mut() else {
            return;
        };
        match self.db.append_frame(*id, *next, game) {
            Ok(()) => *next += 1,
            Err(e) => {
                error!(recording = *id, error = %e, "Failed to store frame");
                self.messages.error(format!("Recording failed: {}", e));
                self.stop_recording();
            }
        }
    }

    fn finish_recording(&mut self, winner: Option<u8>) {
        let Some((id, frames)) = self.current_recording.take() else {
            return;
        };
        if let Err(e) = self.db.finish_game(id, winner) {
            error!(recording = id, error = %e, "Failed to finish recording");
        }
        info!(recording = id, frames, "Recording saved");
        self.refresh_recordings();
    }

    /// Stop writing the current game. It is kept as unfinished.
    pub(crate) fn stop_recording(&mut self) {
        if let Some((id, frames)) = self.current_recording.take() {
            info!(recording = id, frames, "Recording left unfinished");
            self.refresh_recordings();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{attach_session, headless};
    use crate::protocol::tests::sample;
    use crate::settings::Settings;

    #[test]
    fn answers_once_per_round() {
        let game = sample();
        let mut round = RoundState::default();
        round.observe(&game);
        let connected = ConnectionStatus::Connected;

        assert_eq!(refusal(&connected, Some(&game), &round), None);

        round.answered = Some(Action::TurnLeft);
        assert_eq!(refusal(&connected, Some(&game), &round), Some("already answered this round"));

        round.observe(&game);
        assert_eq!(refusal(&connected, Some(&game), &round), None);
    }

    #[test]
    fn refuses_without_a_live_player() {
        let mut game = sample();
        let mut round = RoundState::default();
        round.observe(&game);

        assert_eq!(
            refusal(&ConnectionStatus::Connecting, Some(&game), &round),
            Some("not connected")
        );
        assert_eq!(refusal(&ConnectionStatus::Connected, None, &round), Some("no game yet"));

        game.players.get_mut(&1).unwrap().active = false;
        assert_eq!(refusal(&ConnectionStatus::Connected, Some(&game), &round), Some("you are out"));

        game.running = false;
        round.observe(&game);
        assert_eq!(
            refusal(&ConnectionStatus::Connected, Some(&game), &round),
            Some("the game is over")
        );
    }

    #[test]
    fn autopilot_answers_each_round_once() {
        let mut settings = Settings::default();
        settings.autoplay = true;
        let mut app = headless(settings);
        let mut sent = attach_session(&mut app);

        app.apply_state(sample());
        assert!(sent.try_recv().is_ok());
        assert!(app.round.answered.is_some());

        app.autoplay_round();
        assert!(!app.send_action(Action::TurnRight));
        assert!(sent.try_recv().is_err());

        app.apply_state(sample());
        assert_eq!(app.round.round, 2);
        assert!(sent.try_recv().is_ok());
        assert!(sent.try_recv().is_err());
    }

    #[test]
    fn records_a_game_until_the_winner_is_known() {
        let mut app = headless(Settings::default());
        let _sent = attach_session(&mut app);

        app.apply_state(sample());
        assert_eq!(app.recordings.len(), 1);
        assert_eq!(app.recordings[0].outcome(), "unfinished");

        app.apply_state(sample());
        let mut last = sample();
        last.running = false;
        last.deadline = None;
        last.players.get_mut(&2).unwrap().active = false;
        app.apply_state(last);

        assert!(app.current_recording.is_none());
        let recording = &app.recordings[0];
        assert!(recording.finished);
        assert_eq!(recording.winner, Some(1));
        assert_eq!(recording.frame_count, 3);
        assert_eq!(recording.outcome(), "won");
        assert_eq!(app.db.load_frames(recording.id).unwrap().len(), 3);
    }

    #[test]
    fn nothing_is_recorded_when_turned_off() {
        let mut settings = Settings::default();
        settings.record_games = false;
        let mut app = headless(settings);
        let _sent = attach_session(&mut app);

        app.apply_state(sample());
        assert!(app.recordings.is_empty());
        assert_eq!(app.db.game_count().unwrap(), 0);
    }
}
