//! Error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid server URL `{0}`")]
    InvalidUrl(String),
    #[error("missing API key; set one in the connection panel or via KEY")]
    MissingKey,
    #[error("websocket error: {0}")]
    WebSocket(#[from] Box<tokio_tungstenite::tungstenite::Error>),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("invalid timestamp `{0}`")]
    Timestamp(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("board of {width}×{height} cells is too large to render")]
    BoardTooLarge { width: i32, height: i32 },
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

impl From<tokio_tungstenite::tungstenite::Error> for ClientError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        ClientError::WebSocket(Box::new(e))
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
