//! Project-wide constants used across multiple modules.
//!
//! This module centralizes constant definitions to avoid duplication and ensure
//! consistency across the codebase.

/// Spinner animation characters for progress indicators
pub const SPINNER_CHARS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Image extensions picked up by the thumbnail generator
pub const PHOTO_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Supported audio file extensions
pub const AUDIO_EXTENSIONS: &[&str] = &["wav", "flac", "mp3", "ogg"];

/// Volume a freshly constructed player starts at
pub const DEFAULT_VOLUME: f32 = 0.8;

/// Longest edge of a generated thumbnail, in pixels
pub const DEFAULT_THUMBNAIL_SIZE: u32 = 800;

/// JPEG quality used for generated thumbnails
pub const DEFAULT_JPEG_QUALITY: u8 = 85;

/// Subdirectory of the public dir holding URL-safe photo copies
pub const PHOTOS_DIR: &str = "photos";

/// Subdirectory of the photos dir holding thumbnails
pub const THUMBNAILS_DIR: &str = "thumbnails";

/// Default press-kit content file name
pub const KIT_FILE: &str = "epk.toml";

/// Number of bars the waveform renderer works with
pub const WAVEFORM_PEAKS: usize = 512;

/// Minimum interval between position notifications while playing
pub const TIME_UPDATE_INTERVAL_MS: u64 = 100;
