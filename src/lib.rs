pub mod config;
pub mod constants;
pub mod gallery;
pub mod keys;
pub mod kit;
pub mod playback;
pub mod templates;
pub mod thumbnails;
pub mod utils;

#[cfg(feature = "player")]
pub mod player;
