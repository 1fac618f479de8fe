use super::binding::{AudioBackend, AudioBinding, Notice, Playback, SurfaceEvent};

/// A player bound to one fixed source.
///
/// The source is bound at construction. It is only rebound when the URL
/// itself changes, which counts as a fresh bind.
pub struct SingleTrackPlayer<B: AudioBackend> {
    binding: AudioBinding<B>,
    title: String,
    url: String,
}

impl<B: AudioBackend> SingleTrackPlayer<B> {
    pub fn new(backend: B, title: impl Into<String>, url: impl Into<String>, volume: f32) -> Self {
        let url = url.into();
        let mut binding = AudioBinding::new(backend, volume);
        binding.bind(&url, false);
        Self {
            binding,
            title: title.into(),
            url,
        }
    }

    /// Point the player at a (possibly) different source.
    pub fn set_source(&mut self, title: impl Into<String>, url: impl Into<String>) {
        self.title = title.into();
        let url = url.into();
        if url != self.url {
            self.binding.bind(&url, false);
            self.url = url;
        }
    }

    pub fn handle(&mut self, event: SurfaceEvent) -> Option<Notice> {
        self.binding.handle(event)
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

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn url(&self) -> &str {
        &self.url
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
}
