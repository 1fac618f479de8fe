use thiserror::Error;

/// Failures surfaced while setting up or driving a player.
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("playlist has no tracks")]
    EmptyPlaylist,

    #[error("remote audio is not supported: {0}")]
    RemoteSource(String),

    #[error("audio output unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Why a source failed to become ready.
///
/// `Aborted` is what a superseded load reports; it is never treated as a
/// failure of the track.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("load aborted by a newer load")]
    Aborted,

    #[error("{0}")]
    Failed(String),
}
