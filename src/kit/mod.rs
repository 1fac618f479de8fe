//! Press-kit content: who the act is, what to play, what to show.
//!
//! A kit is a TOML file (`epk.toml` by default) next to a public asset
//! directory. Asset URLs in the kit are site-absolute (`/arcade.mp3`,
//! `/photos/thumbnails/x.jpg`) and resolve under that directory.

pub mod pages;

use crate::constants::AUDIO_EXTENSIONS;
use crate::gallery::Photo;
use crate::playback::Track;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KitError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid kit file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("remote assets are not supported: {0}")]
    RemoteAsset(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    #[serde(default)]
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub label: String,
    pub href: String,
}

impl Link {
    /// The address of a `mailto:` link
    pub fn email(&self) -> Option<&str> {
        self.href.strip_prefix("mailto:")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kit {
    pub name: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default = "default_public_dir")]
    pub public_dir: String,
    #[serde(default)]
    pub featured_photo: Option<String>,
    #[serde(default)]
    pub bio: Vec<String>,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub tracks: Vec<Track>,
    #[serde(default)]
    pub photos: Vec<Photo>,

    /// Directory the kit was loaded from; relative paths resolve against it.
    #[serde(skip)]
    pub root: PathBuf,
}

fn default_public_dir() -> String {
    "public".to_string()
}

impl Kit {
    pub fn load(path: &Path) -> Result<Self, KitError> {
        let contents = fs::read_to_string(path).map_err(|source| KitError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut kit = Self::parse(&contents).map_err(|source| KitError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        kit.root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(kit)
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        let mut kit: Kit = toml::from_str(contents)?;
        kit.root = PathBuf::from(".");
        Ok(kit)
    }

    pub fn public_root(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.public_dir);
        self.root.join(expanded.as_ref())
    }

    /// Map an asset URL to a local file under the public directory.
    pub fn resolve_asset(&self, url: &str) -> Result<PathBuf, KitError> {
        resolve_asset(&self.public_root(), url)
    }

    pub fn featured_photo(&self) -> Option<&Photo> {
        let id = self.featured_photo.as_deref()?;
        self.photos.iter().find(|p| p.id == id)
    }

    /// Problems worth reporting before the kit is shown.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.name.trim().is_empty() {
            problems.push("kit has no name".to_string());
        }
        if self.tracks.is_empty() {
            problems.push("no tracks: the press kit player needs at least one".to_string());
        }

        let mut seen = HashSet::new();
        for photo in &self.photos {
            if !seen.insert(photo.id.as_str()) {
                problems.push(format!("duplicate photo id '{}'", photo.id));
            }
        }

        let mut files = HashSet::new();
        for track in &self.tracks {
            if !files.insert(track.file.as_str()) {
                problems.push(format!("track file '{}' is listed twice", track.file));
            }
            if !is_audio(&track.file) {
                problems.push(format!("track file '{}' is not a supported audio format", track.file));
            }
        }

        if let Some(id) = &self.featured_photo
            && self.featured_photo().is_none()
        {
            problems.push(format!("featured photo '{id}' is not in the gallery"));
        }

        let assets = self
            .tracks
            .iter()
            .map(|t| t.file.as_str())
            .chain(
                self.photos
                    .iter()
                    .flat_map(|p| [p.thumbnail.as_str(), p.full_size.as_str()]),
            );
        for url in assets {
            match self.resolve_asset(url) {
                Ok(path) if !path.exists() => {
                    problems.push(format!("missing asset {url} ({})", path.display()))
                }
                Ok(_) => {}
                Err(e) => problems.push(e.to_string()),
            }
        }

        problems
    }
}

fn is_audio(url: &str) -> bool {
    Path::new(url)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| AUDIO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

/// Map a site-absolute or relative asset URL onto `public_root`.
pub fn resolve_asset(public_root: &Path, url: &str) -> Result<PathBuf, KitError> {
    if url.contains("://") {
        return Err(KitError::RemoteAsset(url.to_string()));
    }
    let relative = url.trim_start_matches('/');
    let mut path = public_root.to_path_buf();
    for part in relative.split('/').filter(|p| !p.is_empty() && *p != ".") {
        if part == ".." {
            path.pop();
        } else {
            path.push(part);
        }
    }
    Ok(path)
}
