//! Audio engine binding: one playable source plus its waveform, driven
//! through an epoch-guarded lifecycle.
//!
//! The binding owns at most one [`AudioSurface`] at a time. Every call to
//! [`AudioBinding::bind`] or [`AudioBinding::teardown`] releases the current
//! surface first and advances the epoch. Backends deliver their asynchronous
//! results as [`SurfaceEvent`]s tagged with the epoch the surface was opened
//! under, and [`AudioBinding::handle`] drops any event whose epoch is no longer
//! the live one. A slow decode of a track the user already skipped away from
//! can therefore never set the duration of, or start, the track that replaced
//! it.
//!
//! ```text
//!   Idle ──bind──▶ Loading ──Ready──▶ Paused ◀──toggle──▶ Playing
//!                     │                  ▲                  │
//!                     └──Error──▶ Failed └──────Finish──────┘
//! ```

use super::error::{LoadError, PlaybackError};
use log::{debug, error, info};

/// Generation counter identifying one bind of a binding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Epoch(u64);

impl Epoch {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Epoch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle state of the currently bound source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    Idle,
    Loading,
    Paused,
    Playing,
    /// The load failed; controls stay inert until the track is bound again.
    Failed,
}

impl Playback {
    pub fn is_ready(self) -> bool {
        matches!(self, Playback::Paused | Playback::Playing)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEventKind {
    /// Enough of the source is decoded to know its length.
    Ready { duration: f64, peaks: Vec<f32> },
    /// Position in seconds, throttled by the surface.
    TimeUpdate(f64),
    /// Playback reached the end of the source.
    Finish,
    Error(LoadError),
}

/// An asynchronous notification from a surface.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceEvent {
    pub epoch: Epoch,
    pub kind: SurfaceEventKind,
}

impl SurfaceEvent {
    pub fn new(epoch: Epoch, kind: SurfaceEventKind) -> Self {
        Self { epoch, kind }
    }
}

/// What a live event meant for the embedding player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Ready,
    Finished,
    Failed,
}

/// A rendering/playback surface tied to exactly one source.
pub trait AudioSurface {
    fn play(&mut self);
    fn pause(&mut self);
    fn seek(&mut self, seconds: f64);
    fn set_volume(&mut self, volume: f32);

    /// Give the surface a chance to publish position and finish events.
    fn tick(&mut self) {}

    /// Stop output and free the source. Must be safe to call repeatedly.
    fn release(&mut self);
}

/// Creates surfaces. Results of the load are reported later as events
/// carrying the epoch passed here.
pub trait AudioBackend {
    type Surface: AudioSurface;

    fn open(&mut self, url: &str, epoch: Epoch) -> Result<Self::Surface, PlaybackError>;
}

pub struct AudioBinding<B: AudioBackend> {
    backend: B,
    surface: Option<B::Surface>,
    epoch: Epoch,
    source: Option<String>,
    playback: Playback,
    position: f64,
    duration: f64,
    volume: f32,
    autoplay: bool,
    peaks: Vec<f32>,
}

impl<B: AudioBackend> AudioBinding<B> {
    pub fn new(backend: B, volume: f32) -> Self {
        Self {
            backend,
            surface: None,
            epoch: Epoch::default(),
            source: None,
            playback: Playback::Idle,
            position: 0.0,
            duration: 0.0,
            volume: clamp_volume(volume).unwrap_or(1.0),
            autoplay: false,
            peaks: Vec::new(),
        }
    }

    /// Release whatever is bound and start loading `url`.
    ///
    /// With `autoplay` set, playback starts as soon as the new source is ready.
    pub fn bind(&mut self, url: &str, autoplay: bool) {
        self.release_surface();
        self.epoch = self.epoch.next();
        self.source = Some(url.to_string());
        self.position = 0.0;
        self.duration = 0.0;
        self.peaks.clear();
        self.autoplay = autoplay;
        self.playback = Playback::Loading;

        match self.backend.open(url, self.epoch) {
            Ok(mut surface) => {
                surface.set_volume(self.volume);
                self.surface = Some(surface);
                info!("Loading {url} (epoch {})", self.epoch);
            }
            Err(e) => {
                error!("Failed to open {url}: {e}");
                self.autoplay = false;
                self.playback = Playback::Failed;
            }
        }
    }

    /// Apply an event from a surface. Events from a superseded bind are ignored.
    pub fn handle(&mut self, event: SurfaceEvent) -> Option<Notice> {
        if event.epoch != self.epoch {
            debug!(
                "Ignoring stale event from epoch {} (live epoch {})",
                event.epoch, self.epoch
            );
            return None;
        }
        let surface = self.surface.as_mut()?;

        match event.kind {
            SurfaceEventKind::Ready { duration, peaks } => {
                if self.playback != Playback::Loading {
                    return None;
                }
                self.duration = if duration.is_finite() { duration.max(0.0) } else { 0.0 };
                self.peaks = peaks;
                surface.set_volume(self.volume);
                if std::mem::take(&mut self.autoplay) {
                    surface.play();
                    self.playback = Playback::Playing;
                } else {
                    self.playback = Playback::Paused;
                }
                Some(Notice::Ready)
            }
            SurfaceEventKind::TimeUpdate(position) => {
                if self.playback.is_ready() && position.is_finite() {
                    self.position = position.clamp(0.0, self.duration);
                }
                None
            }
            SurfaceEventKind::Finish => {
                if !self.playback.is_ready() {
                    return None;
                }
                self.position = self.duration;
                self.playback = Playback::Paused;
                Some(Notice::Finished)
            }
            SurfaceEventKind::Error(LoadError::Aborted) => {
                debug!("Load for epoch {} was aborted", self.epoch);
                None
            }
            SurfaceEventKind::Error(LoadError::Failed(reason)) => {
                error!(
                    "Audio error for {}: {reason}",
                    self.source.as_deref().unwrap_or("<unbound>")
                );
                self.autoplay = false;
                self.playback = Playback::Failed;
                Some(Notice::Failed)
            }
        }
    }

    /// Flip between playing and paused. Returns false when not ready.
    pub fn toggle(&mut self) -> bool {
        match self.playback {
            Playback::Playing => {
                self.pause();
                true
            }
            Playback::Paused => {
                self.play();
                true
            }
            _ => false,
        }
    }

    pub fn play(&mut self) {
        if self.playback != Playback::Paused {
            return;
        }
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        // A finished track starts over.
        if self.duration > 0.0 && self.position >= self.duration {
            surface.seek(0.0);
            self.position = 0.0;
        }
        surface.play();
        self.playback = Playback::Playing;
    }

    pub fn pause(&mut self) {
        if self.playback != Playback::Playing {
            return;
        }
        if let Some(surface) = self.surface.as_mut() {
            surface.pause();
            self.playback = Playback::Paused;
        }
    }

    /// Jump to an absolute position. Ignored unless the source is ready.
    pub fn seek(&mut self, seconds: f64) {
        if !self.playback.is_ready() || !seconds.is_finite() {
            return;
        }
        if let Some(surface) = self.surface.as_mut() {
            let target = seconds.clamp(0.0, self.duration);
            surface.seek(target);
            self.position = target;
        }
    }

    /// Seek to a fraction of the track, as a click on the waveform does.
    pub fn seek_fraction(&mut self, fraction: f64) {
        self.seek(fraction.clamp(0.0, 1.0) * self.duration);
    }

    pub fn seek_by(&mut self, delta: f64) {
        self.seek(self.position + delta);
    }

    /// Set the volume, clamped to `[0, 1]`. Applies immediately in every
    /// state and survives rebinding.
    pub fn set_volume(&mut self, volume: f32) {
        let Some(volume) = clamp_volume(volume) else {
            return;
        };
        self.volume = volume;
        if let Some(surface) = self.surface.as_mut() {
            surface.set_volume(volume);
        }
    }

    pub fn tick(&mut self) {
        if let Some(surface) = self.surface.as_mut() {
            surface.tick();
        }
    }

    /// Release the surface and invalidate every pending event.
    ///
    /// Safe to call more than once, including after a failed bind.
    pub fn teardown(&mut self) {
        self.release_surface();
        self.epoch = self.epoch.next();
        self.source = None;
        self.playback = Playback::Idle;
        self.position = 0.0;
        self.duration = 0.0;
        self.autoplay = false;
        self.peaks.clear();
    }

    fn release_surface(&mut self) {
        if let Some(mut surface) = self.surface.take() {
            surface.release();
        }
    }

    pub fn playback(&self) -> Playback {
        self.playback
    }

    pub fn is_playing(&self) -> bool {
        self.playback == Playback::Playing
    }

    pub fn is_loading(&self) -> bool {
        self.playback == Playback::Loading
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Played fraction in `[0, 1]`
    pub fn progress(&self) -> f64 {
        if self.duration > 0.0 {
            (self.position / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Normalized waveform peaks of the ready source, empty otherwise.
    pub fn peaks(&self) -> &[f32] {
        &self.peaks
    }
}

impl<B: AudioBackend> Drop for AudioBinding<B> {
    fn drop(&mut self) {
        self.release_surface();
    }
}

fn clamp_volume(volume: f32) -> Option<f32> {
    if volume.is_nan() {
        None
    } else {
        Some(volume.clamp(0.0, 1.0))
    }
}
