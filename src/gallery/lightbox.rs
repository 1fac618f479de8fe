//! Photo grid with an overlay viewer.
//!
//! The lightbox is either closed or showing one photo by index. Navigation
//! wraps around the photo list in both directions. While open, the gallery
//! holds a key listener on the shared router; closing the lightbox or tearing
//! the gallery down drops it.

use super::photo::Photo;
use crate::keys::{KeyListener, KeyRouter, Overlay};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightboxState {
    Closed,
    Open(usize),
}

/// Keys the lightbox reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightboxKey {
    /// ArrowLeft
    Prev,
    /// ArrowRight
    Next,
    /// Escape
    Close,
}

/// Which control inside a tile was activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileTarget {
    Image,
    Download,
}

pub struct Gallery {
    photos: Vec<Photo>,
    show_download: bool,
    state: LightboxState,
    router: KeyRouter,
    listener: Option<KeyListener>,
}

impl Gallery {
    pub fn new(photos: Vec<Photo>, show_download: bool, router: KeyRouter) -> Self {
        Self {
            photos,
            show_download,
            state: LightboxState::Closed,
            router,
            listener: None,
        }
    }

    /// Open the lightbox on `index`. Out-of-range indexes are ignored.
    pub fn open(&mut self, index: usize) -> bool {
        if index >= self.photos.len() {
            return false;
        }
        self.state = LightboxState::Open(index);
        if self.listener.is_none() {
            self.listener = Some(self.router.install(Overlay::Lightbox));
        }
        true
    }

    pub fn close(&mut self) {
        self.state = LightboxState::Closed;
        self.listener = None;
    }

    pub fn prev(&mut self) {
        if let LightboxState::Open(index) = self.state {
            let len = self.photos.len();
            self.state = LightboxState::Open((index + len - 1) % len);
        }
    }

    pub fn next(&mut self) {
        if let LightboxState::Open(index) = self.state {
            self.state = LightboxState::Open((index + 1) % self.photos.len());
        }
    }

    /// Route a key to the lightbox. Returns whether it was consumed.
    pub fn handle_key(&mut self, key: LightboxKey) -> bool {
        if !self.is_open() {
            return false;
        }
        match key {
            LightboxKey::Prev => self.prev(),
            LightboxKey::Next => self.next(),
            LightboxKey::Close => self.close(),
        }
        true
    }

    /// Activate a control inside the tile at `index`.
    ///
    /// The image opens the lightbox. The download control only yields the
    /// full-size URL and leaves the lightbox as it is.
    pub fn activate(&mut self, index: usize, target: TileTarget) -> Option<&str> {
        match target {
            TileTarget::Image => {
                self.open(index);
                None
            }
            TileTarget::Download => self.download_link(index),
        }
    }

    /// Full-size URL offered for download, when downloads are enabled.
    pub fn download_link(&self, index: usize) -> Option<&str> {
        if !self.show_download {
            return None;
        }
        self.photos.get(index).map(|p| p.full_size.as_str())
    }

    pub fn teardown(&mut self) {
        self.close();
    }

    pub fn state(&self) -> LightboxState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, LightboxState::Open(_))
    }

    pub fn open_index(&self) -> Option<usize> {
        match self.state {
            LightboxState::Open(index) => Some(index),
            LightboxState::Closed => None,
        }
    }

    /// The photo shown in the lightbox
    pub fn current(&self) -> Option<&Photo> {
        self.open_index().and_then(|i| self.photos.get(i))
    }

    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn show_download(&self) -> bool {
        self.show_download
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photos(count: usize) -> Vec<Photo> {
        (0..count)
            .map(|i| Photo {
                id: format!("p{i}"),
                thumbnail: format!("/photos/thumbnails/p{i}.jpg"),
                full_size: format!("/photos/p{i}.jpg"),
                photographer: "Chris Donahue".to_string(),
                photographer_link: String::new(),
                date: "January 30, 2026".to_string(),
                venue: "Chess Club".to_string(),
            })
            .collect()
    }

    fn gallery(count: usize, show_download: bool) -> (Gallery, KeyRouter) {
        let router = KeyRouter::new();
        (Gallery::new(photos(count), show_download, router.clone()), router)
    }

    #[test]
    fn test_starts_closed() {
        let (gallery, router) = gallery(3, false);
        assert_eq!(gallery.state(), LightboxState::Closed);
        assert!(gallery.current().is_none());
        assert!(router.is_empty());
    }

    #[test]
    fn test_keyboard_scenario() {
        let (mut gallery, router) = gallery(3, false);
        assert!(gallery.open(1));
        assert_eq!(gallery.state(), LightboxState::Open(1));
        assert_eq!(router.topmost(), Some(Overlay::Lightbox));

        gallery.handle_key(LightboxKey::Next);
        assert_eq!(gallery.state(), LightboxState::Open(2));
        gallery.handle_key(LightboxKey::Next);
        assert_eq!(gallery.state(), LightboxState::Open(0));
        gallery.handle_key(LightboxKey::Close);
        assert_eq!(gallery.state(), LightboxState::Closed);
        assert!(router.is_empty());
    }

    #[test]
    fn test_prev_wraps_to_last() {
        let (mut gallery, _router) = gallery(4, false);
        gallery.open(0);
        gallery.prev();
        assert_eq!(gallery.open_index(), Some(3));
    }

    #[test]
    fn test_single_photo_wraps_to_itself() {
        let (mut gallery, _router) = gallery(1, false);
        gallery.open(0);
        gallery.next();
        assert_eq!(gallery.open_index(), Some(0));
        gallery.prev();
        assert_eq!(gallery.open_index(), Some(0));
    }

    #[test]
    fn test_keys_ignored_while_closed() {
        let (mut gallery, _router) = gallery(3, false);
        assert!(!gallery.handle_key(LightboxKey::Next));
        gallery.next();
        assert_eq!(gallery.state(), LightboxState::Closed);
    }

    #[test]
    fn test_open_out_of_range() {
        let (mut gallery, router) = gallery(2, false);
        assert!(!gallery.open(2));
        assert_eq!(gallery.state(), LightboxState::Closed);
        assert!(router.is_empty());
    }

    #[test]
    fn test_reopen_keeps_single_listener() {
        let (mut gallery, router) = gallery(3, false);
        gallery.open(0);
        gallery.open(2);
        assert_eq!(router.len(), 1);
        assert_eq!(gallery.current().map(|p| p.id.as_str()), Some("p2"));
    }

    #[test]
    fn test_download_does_not_toggle_lightbox() {
        let (mut gallery, _router) = gallery(3, true);
        assert_eq!(gallery.activate(1, TileTarget::Download), Some("/photos/p1.jpg"));
        assert_eq!(gallery.state(), LightboxState::Closed);

        gallery.open(2);
        assert_eq!(gallery.activate(0, TileTarget::Download), Some("/photos/p0.jpg"));
        assert_eq!(gallery.state(), LightboxState::Open(2));
    }

    #[test]
    fn test_download_disabled() {
        let (mut gallery, _router) = gallery(3, false);
        assert_eq!(gallery.activate(0, TileTarget::Download), None);
        assert_eq!(gallery.activate(0, TileTarget::Image), None);
        assert_eq!(gallery.state(), LightboxState::Open(0));
    }

    #[test]
    fn test_teardown_removes_listener() {
        let (mut gallery, router) = gallery(3, false);
        gallery.open(1);
        gallery.teardown();
        assert!(router.is_empty());

        gallery.open(1);
        drop(gallery);
        assert!(router.is_empty());
    }
}
