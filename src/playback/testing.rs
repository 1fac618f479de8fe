//! In-memory backend recording every surface call, for state machine tests.

use super::binding::{AudioBackend, AudioSurface, Epoch, SurfaceEvent, SurfaceEventKind};
use super::error::{LoadError, PlaybackError};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Open(String, Epoch),
    Play(Epoch),
    Pause(Epoch),
    Seek(Epoch, f64),
    Volume(Epoch, f32),
    Release(Epoch),
}

#[derive(Clone, Default)]
pub struct FakeBackend {
    calls: Rc<RefCell<Vec<Call>>>,
    failing: Vec<String>,
}

impl FakeBackend {
    pub fn failing(urls: &[&str]) -> Self {
        Self {
            failing: urls.iter().map(|u| u.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn opened(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Open(url, _) => Some(url.clone()),
                _ => None,
            })
            .collect()
    }
}

pub struct FakeSurface {
    epoch: Epoch,
    calls: Rc<RefCell<Vec<Call>>>,
    released: bool,
}

impl AudioBackend for FakeBackend {
    type Surface = FakeSurface;

    fn open(&mut self, url: &str, epoch: Epoch) -> Result<FakeSurface, PlaybackError> {
        self.calls
            .borrow_mut()
            .push(Call::Open(url.to_string(), epoch));
        if self.failing.iter().any(|f| f == url) {
            return Err(PlaybackError::Unavailable(url.to_string()));
        }
        Ok(FakeSurface {
            epoch,
            calls: Rc::clone(&self.calls),
            released: false,
        })
    }
}

impl AudioSurface for FakeSurface {
    fn play(&mut self) {
        self.calls.borrow_mut().push(Call::Play(self.epoch));
    }

    fn pause(&mut self) {
        self.calls.borrow_mut().push(Call::Pause(self.epoch));
    }

    fn seek(&mut self, seconds: f64) {
        self.calls.borrow_mut().push(Call::Seek(self.epoch, seconds));
    }

    fn set_volume(&mut self, volume: f32) {
        self.calls.borrow_mut().push(Call::Volume(self.epoch, volume));
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.calls.borrow_mut().push(Call::Release(self.epoch));
        }
    }
}

pub fn ready(epoch: Epoch, duration: f64) -> SurfaceEvent {
    SurfaceEvent::new(
        epoch,
        SurfaceEventKind::Ready {
            duration,
            peaks: vec![0.2, 0.9, 0.4, 1.0],
        },
    )
}

pub fn time(epoch: Epoch, position: f64) -> SurfaceEvent {
    SurfaceEvent::new(epoch, SurfaceEventKind::TimeUpdate(position))
}

pub fn finish(epoch: Epoch) -> SurfaceEvent {
    SurfaceEvent::new(epoch, SurfaceEventKind::Finish)
}

pub fn error(epoch: Epoch, reason: &str) -> SurfaceEvent {
    SurfaceEvent::new(
        epoch,
        SurfaceEventKind::Error(LoadError::Failed(reason.to_string())),
    )
}
