//! Setup errors
//!
//! Only construction can fail. Once a game is running, every per-frame path
//! (input, physics, collision, AI, rendering) is total.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The host element (or selector) the surface should mount into does not resolve
    #[error("host container not found: {0}")]
    ContainerNotFound(String),
    /// The 2D drawing context could not be acquired
    #[error("drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),
    /// The game-kind factory was asked for a game it does not know
    #[error("unknown game type: {0}")]
    UnknownGame(String),
    /// The options object passed by the host page is not valid config JSON
    #[error("invalid engine config: {0}")]
    InvalidConfig(#[from] serde_json::Error),
    /// An input listener could not be registered on the host
    #[error("failed to attach {event} listener")]
    Listener { event: &'static str },
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(target_arch = "wasm32")]
impl From<EngineError> for wasm_bindgen::JsValue {
    fn from(err: EngineError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_game_names_the_type() {
        let err = EngineError::UnknownGame("tetris".into());
        assert_eq!(err.to_string(), "unknown game type: tetris");
    }

    #[test]
    fn test_config_error_converts() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: EngineError = parse.unwrap_err().into();
        assert!(matches!(err, EngineError::InvalidConfig(_)));
    }
}
