//! Game history database
//! Stores every state received during a game so it can be replayed or exported

use crate::error::Result;
use crate::protocol::Game;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;
use tracing::debug;

/// Recorded game metadata
#[derive(Debug, Clone, PartialEq)]
pub struct Recording {
    pub id: i64,
    pub started_at: String,
    pub server: String,
    pub width: i32,
    pub height: i32,
    pub you: u8,
    pub players: usize,
    pub frame_count: u32,
    pub winner: Option<u8>,
    pub finished: bool,
}

impl Recording {
    pub fn outcome(&self) -> String {
        match (self.finished, self.winner) {
            (false, _) => "unfinished".into(),
            (true, Some(w)) if w == self.you => "won".into(),
            (true, Some(w)) => format!("player {} won", w),
            (true, None) => "draw".into(),
        }
    }
}

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database at the given path
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init_schema()?;
        debug!(path = %path.display(), "Database opened");
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let db = Self { conn: Connection::open_in_memory()? };
        db.init_schema()?;
        Ok(db)
    }

    /// Initialize database schema
    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS games (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                started_at TEXT NOT NULL,
                server TEXT NOT NULL,
                width INTEGER NOT NULL,
                height INTEGER NOT NULL,
                you INTEGER NOT NULL,
                players INTEGER NOT NULL,
                frame_count INTEGER NOT NULL DEFAULT 0,
                winner INTEGER,
                finished INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS frames (
                game_id INTEGER NOT NULL REFERENCES games(id) ON DELETE CASCADE,
                idx INTEGER NOT NULL,
                received_at TEXT NOT NULL,
                state TEXT NOT NULL,
                PRIMARY KEY (game_id, idx)
            );",
        )?;
        Ok(())
    }

    /// Create a recording for a game that just started
    pub fn start_game(&self, game: &Game, server: &str, started_at: DateTime<Utc>) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO games (started_at, server, width, height, you, players)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                started_at.to_rfc3339(),
                server,
                game.width,
                game.height,
                game.you,
                game.players.len() as i64
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(id, "Recording started");
        Ok(id)
    }

    /// Append a state; `idx` is the position of the frame in the game.
    pub fn append_frame(&self, game_id: i64, idx: u32, game: &Game) -> Result<()> {
        let state = serde_json::to_string(game)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO frames (game_id, idx, received_at, state)
             VALUES (?1, ?2, ?3, ?4)",
            params![game_id, idx, Utc::now().to_rfc3339(), state],
        )?;
        self.conn.execute(
            "UPDATE games SET frame_count = (SELECT COUNT(*) FROM frames WHERE game_id = ?1) WHERE id = ?1",
            params![game_id],
        )?;
        Ok(())
    }

    pub fn finish_game(&self, game_id: i64, winner: Option<u8>) -> Result<()> {
        self.conn.execute(
            "UPDATE games SET finished = 1, winner = ?1 WHERE id = ?2",
            params![winner, game_id],
        )?;
        debug!(id = game_id, ?winner, "Recording finished");
        Ok(())
    }

    /// All recordings, newest first
    pub fn list_games(&self) -> Result<Vec<Recording>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, started_at, server, width, height, you, players, frame_count, winner, finished
             FROM games ORDER BY id DESC",
        )?;

        let games = stmt
            .query_map([], |row| {
                Ok(Recording {
                    id: row.get(0)?,
                    started_at: row.get(1)?,
                    server: row.get(2)?,
                    width: row.get(3)?,
                    height: row.get(4)?,
                    you: row.get(5)?,
                    players: row.get::<_, i64>(6)? as usize,
                    frame_count: row.get(7)?,
                    winner: row.get(8)?,
                    finished: row.get::<_, i32>(9)? != 0,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(games)
    }

    pub fn get_game(&self, game_id: i64) -> Result<Option<Recording>> {
        Ok(self.list_games()?.into_iter().find(|g| g.id == game_id))
    }

    /// Frames of a recording in order
    pub fn load_frames(&self, game_id: i64) -> Result<Vec<Game>> {
        let mut stmt = self
            .conn
            .prepare("SELECT state FROM frames WHERE game_id = ?1 ORDER BY idx")?;
        let states = stmt
            .query_map(params![game_id], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        states.iter().map(|s| Game::decode(s)).collect()
    }

    pub fn delete_game(&self, game_id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM frames WHERE game_id = ?1", params![game_id])?;
        self.conn
            .execute("DELETE FROM games WHERE id = ?1", params![game_id])?;
        Ok(())
    }

    pub fn game_count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM games", [], |r| r.get(0))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::tests::sample;

    #[test]
    fn records_and_replays_a_game() {
        let db = Database::open_in_memory().unwrap();
        let mut game = sample();
        let id = db.start_game(&game, "wss://example/spe_ed", Utc::now()).unwrap();

        db.append_frame(id, 0, &game).unwrap();
        game.cells[0][0] = 2;
        db.append_frame(id, 1, &game).unwrap();
        game.running = false;
        game.players.get_mut(&2).unwrap().active = false;
        db.append_frame(id, 2, &game).unwrap();
        db.finish_game(id, game.winner()).unwrap();

        let rec = db.get_game(id).unwrap().unwrap();
        assert_eq!(rec.frame_count, 3);
        assert_eq!((rec.width, rec.height, rec.you, rec.players), (5, 4, 1, 2));
        assert!(rec.finished);
        assert_eq!(rec.winner, Some(1));
        assert_eq!(rec.outcome(), "won");

        let frames = db.load_frames(id).unwrap();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[1].cells[0][0], 2);
        assert!(!frames[2].running);
    }

    #[test]
    fn lists_newest_first_and_deletes() {
        let db = Database::open_in_memory().unwrap();
        let game = sample();
        let a = db.start_game(&game, "s", Utc::now()).unwrap();
        let b = db.start_game(&game, "s", Utc::now()).unwrap();
        db.append_frame(a, 0, &game).unwrap();

        let ids: Vec<i64> = db.list_games().unwrap().iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![b, a]);

        db.delete_game(a).unwrap();
        assert_eq!(db.game_count().unwrap(), 1);
        assert!(db.load_frames(a).unwrap().is_empty());
    }

    #[test]
    fn interrupted_games_stay_unfinished() {
        let db = Database::open_in_memory().unwrap();
        let id = db.start_game(&sample(), "s", Utc::now()).unwrap();
        let rec = db.get_game(id).unwrap().unwrap();
        assert!(!rec.finished);
        assert_eq!(rec.outcome(), "unfinished");
    }

    #[test]
    fn empty_database() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.game_count().unwrap(), 0);
        assert!(db.list_games().unwrap().is_empty());
    }
}
