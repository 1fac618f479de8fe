pub mod check;
pub mod config;
pub mod init;
pub mod kit;
pub mod new;
pub mod photos;
pub mod play;
pub mod thumbnails;

use epk_studio::config::Config;
use std::path::PathBuf;

/// Kit file named on the command line, or the configured one.
pub(crate) fn kit_path(arg: Option<&str>, config: &Config) -> PathBuf {
    match arg {
        Some(path) => PathBuf::from(shellexpand::tilde(path).as_ref()),
        None => config.kit_path(),
    }
}
