/// Errors surfaced at the boundary of the engine.
///
/// Engine operations themselves are total; the only failure mode is input that
/// never should have reached them (unknown direction text, malformed rows,
/// out-of-range configuration).
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl GameError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        GameError::InvalidArgument(msg.into())
    }
}

pub type Result<T, E = GameError> = std::result::Result<T, E>;
