//! Error types surfaced by the game shell

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    /// No drawing surface could be obtained for the session
    #[error("rendering surface unavailable")]
    SurfaceUnavailable,

    #[error("unknown career `{0}`")]
    UnknownCareer(String),

    /// A session is already running or finished; restart first
    #[error("a session is already in progress")]
    SessionInProgress,

    #[error("invalid career catalog: {0}")]
    Catalog(#[from] serde_json::Error),
}

#[cfg(target_arch = "wasm32")]
impl From<GameError> for wasm_bindgen::JsValue {
    fn from(err: GameError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}
