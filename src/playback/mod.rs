//! Playback state machines shared by every player.
//!
//! Nothing in here touches an audio device. Backends plug in through
//! [`AudioBackend`]; the rodio implementation lives in the `player` module.

pub mod binding;
pub mod error;
pub mod playlist;
pub mod single;
pub mod time;
pub mod waveform;

#[cfg(test)]
pub(crate) mod testing;

pub use binding::{
    AudioBackend, AudioBinding, AudioSurface, Epoch, Notice, Playback, SurfaceEvent,
    SurfaceEventKind,
};
pub use error::{LoadError, PlaybackError};
pub use playlist::PlaylistPlayer;
pub use single::SingleTrackPlayer;
pub use time::format_time;

use serde::{Deserialize, Serialize};

/// One entry of a playlist. The order of tracks is the play order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub title: String,
    pub file: String,
}

impl Track {
    pub fn new(title: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            file: file.into(),
        }
    }
}
