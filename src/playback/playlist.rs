//! Playlist player: one binding walking an ordered list of tracks.
//!
//! The playlist never wraps. Skipping carries the current play state over to
//! the new track, picking a track from the list always plays it, and a track
//! that finishes hands over to the next one until the list runs out.

use super::Track;
use super::binding::{AudioBackend, AudioBinding, Notice, Playback, SurfaceEvent};
use super::error::PlaybackError;
use log::info;

pub struct PlaylistPlayer<B: AudioBackend> {
    binding: AudioBinding<B>,
    tracks: Vec<Track>,
    active_index: usize,
}

impl<B: AudioBackend> PlaylistPlayer<B> {
    /// Build a player and start loading the first track, paused.
    pub fn new(backend: B, tracks: Vec<Track>, volume: f32) -> Result<Self, PlaybackError> {
        if tracks.is_empty() {
            return Err(PlaybackError::EmptyPlaylist);
        }
        let mut binding = AudioBinding::new(backend, volume);
        binding.bind(&tracks[0].file, false);
        Ok(Self {
            binding,
            tracks,
            active_index: 0,
        })
    }

    /// Pick a track from the list.
    ///
    /// The active track toggles play/pause without reloading; any other track
    /// is loaded and starts playing once ready.
    pub fn select_track(&mut self, index: usize) {
        if index >= self.tracks.len() {
            return;
        }
        if index == self.active_index {
            self.binding.toggle();
        } else {
            self.switch_to(index, true);
        }
    }

    pub fn skip_prev(&mut self) {
        if self.can_skip_prev() {
            let autoplay = self.binding.is_playing();
            self.switch_to(self.active_index - 1, autoplay);
        }
    }

    pub fn skip_next(&mut self) {
        if self.can_skip_next() {
            let autoplay = self.binding.is_playing();
            self.switch_to(self.active_index + 1, autoplay);
        }
    }

    pub fn can_skip_prev(&self) -> bool {
        self.active_index > 0
    }

    pub fn can_skip_next(&self) -> bool {
        self.active_index + 1 < self.tracks.len()
    }

    /// Feed a surface event through the binding, advancing on finish.
    pub fn handle(&mut self, event: SurfaceEvent) -> Option<Notice> {
        let notice = self.binding.handle(event);
        if notice == Some(Notice::Finished) && self.can_skip_next() {
            info!("Track {} finished, advancing", self.active_index + 1);
            self.switch_to(self.active_index + 1, true);
        }
        notice
    }

    fn switch_to(&mut self, index: usize, autoplay: bool) {
        self.active_index = index;
        self.binding.bind(&self.tracks[index].file, autoplay);
    }

    pub fn toggle(&mut self) -> bool {
        self.binding.toggle()
    }

    pub fn seek_fraction(&mut self, fraction: f64) {
        self.binding.seek_fraction(fraction);
    }

    pub fn seek_by(&mut self, delta: f64) {
        self.binding.seek_by(delta);
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.binding.set_volume(volume);
    }

    pub fn tick(&mut self) {
        self.binding.tick();
    }

    pub fn teardown(&mut self) {
        self.binding.teardown();
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn active_track(&self) -> &Track {
        &self.tracks[self.active_index]
    }

    pub fn binding(&self) -> &AudioBinding<B> {
        &self.binding
    }

    pub fn playback(&self) -> Playback {
        self.binding.playback()
    }

    pub fn is_playing(&self) -> bool {
        self.binding.is_playing()
    }

    pub fn is_loading(&self) -> bool {
        self.binding.is_loading()
    }

    pub fn position(&self) -> f64 {
        self.binding.position()
    }

    pub fn duration(&self) -> f64 {
        self.binding.duration()
    }

    pub fn volume(&self) -> f32 {
        self.binding.volume()
    }
}
