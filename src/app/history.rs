//! Recorded games: replay, export, delete, board snapshots

use super::App;
use crate::constants::SNAPSHOT_SCALE;
use crate::db::Database;
use crate::error::Result;
use crate::types::Replay;
use crate::utils::save_board_png;
use std::path::Path;
use tracing::{error, info};

/// Write the frames of a recording to `path` as a JSON array. Returns the frame count.
pub(crate) fn export_frames(db: &Database, id: i64, path: &Path) -> Result<usize> {
    let frames = db.load_frames(id)?;
    let json = serde_json::to_string_pretty(&frames)?;
    std::fs::write(path, json)?;
    Ok(frames.len())
}

impl App {
    pub(crate) fn refresh_recordings(&mut self) {
        match self.db.list_games() {
            Ok(recordings) => self.recordings = recordings,
            Err(e) => error!(error = %e, "Failed to list recordings"),
        }
    }

    pub(crate) fn open_replay(&mut self, id: i64) {
        match self.db.load_frames(id) {
            Ok(frames) if frames.is_empty() => {
                self.messages.warning(format!("Recording #{} has no frames", id));
            }
            Ok(frames) => {
                let outcome = match self.db.get_game(id) {
                    Ok(Some(recording)) => recording.outcome(),
                    _ => "unknown".to_string(),
                };
                info!(recording = id, frames = frames.len(), %outcome, "Replay opened");
                self.messages.info(format!("Replaying game #{}, {} ({} frames)", id, outcome, frames.len()));
                self.replay = Some(Replay::new(id, frames));
            }
            Err(e) => {
                error!(recording = id, error = %e, "Failed to load recording");
                self.messages.error(format!("Could not load game #{}: {}", id, e));
            }
        }
    }

    pub(crate) fn seek_replay(&mut self, index: usize) {
        if let Some(replay) = self.replay.as_mut() {
            replay.seek(index);
        }
    }

    pub(crate) fn close_replay(&mut self) {
        if let Some(replay) = self.replay.take() {
            info!(recording = replay.recording_id, "Replay closed");
        }
    }

    pub(crate) fn export_recording(&mut self, id: i64) {
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(format!("spe_ed-game-{}.json", id))
            .add_filter("JSON", &["json"])
            .save_file()
        else {
            return;
        };

        match export_frames(&self.db, id, &path) {
            Ok(count) => {
                info!(recording = id, path = %path.display(), count, "Recording exported");
                self.messages.success(format!("Exported {} frames to {}", count, path.display()));
            }
            Err(e) => {
                error!(recording = id, error = %e, "Export failed");
                self.messages.error(format!("Export failed: {}", e));
            }
        }
    }

    pub(crate) fn delete_recording(&mut self, id: i64) {
        if self.replay.as_ref().is_some_and(|r| r.recording_id == id) {
            self.close_replay();
        }
        if self.current_recording.is_some_and(|(current, _)| current == id) {
            self.current_recording = None;
        }

        match self.db.delete_game(id) {
            Ok(()) => {
                info!(recording = id, "Recording deleted");
                self.messages.info(format!("Deleted game #{}", id));
            }
            Err(e) => {
                error!(recording = id, error = %e, "Failed to delete recording");
                self.messages.error(format!("Could not delete game #{}: {}", id, e));
            }
        }
        self.refresh_recordings();
    }

    /// Save the board currently shown (live or replay) as PNG.
    pub(crate) fn save_snapshot(&mut self) {
        let Some(game) = self.visible_game() else {
            return;
        };
        let Some(path) = rfd::FileDialog::new()
            .set_file_name("spe_ed-board.png")
            .add_filter("PNG", &["png"])
            .save_file()
        else {
            return;
        };

        match save_board_png(game, SNAPSHOT_SCALE, &path) {
            Ok(()) => {
                info!(path = %path.display(), "Snapshot saved");
                self.messages.success(format!("Saved {}", path.display()));
            }
            Err(e) => {
                error!(error = %e, "Snapshot failed");
                self.messages.error(format!("Snapshot failed: {}", e));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::tests::sample;
    use crate::protocol::Game;
    use chrono::Utc;

    #[test]
    fn export_writes_frames_as_json_array() {
        let db = Database::open_in_memory().unwrap();
        let game = sample();
        let id = db.start_game(&game, "wss://example/spe_ed", Utc::now()).unwrap();
        db.append_frame(id, 0, &game).unwrap();
        db.append_frame(id, 1, &game).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.json");
        assert_eq!(export_frames(&db, id, &path).unwrap(), 2);

        let text = std::fs::read_to_string(&path).unwrap();
        let frames: Vec<Game> = serde_json::from_str(&text).unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0], game);
    }
}
