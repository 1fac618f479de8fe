//! rodio-backed audio surfaces.
//!
//! Opening a source spawns a decode thread that reads the whole file into
//! memory (WAV through hound, FLAC through claxon, anything else through
//! rodio's own decoder), computes the waveform peaks and then reports back on
//! the shared event channel. Nothing is queued on the sink until the first
//! `play`, so an abandoned track never makes a sound.

use crate::constants::{TIME_UPDATE_INTERVAL_MS, WAVEFORM_PEAKS};
use crate::kit::{KitError, resolve_asset};
use crate::playback::waveform::compute_peaks;
use crate::playback::{
    AudioBackend, AudioSurface, Epoch, LoadError, PlaybackError, SurfaceEvent, SurfaceEventKind,
};
use rodio::{OutputStream, OutputStreamHandle, Sink, Source};
use std::convert::Infallible;
use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
    mpsc,
};
use std::thread;
use std::time::{Duration, Instant};

type DecodeResult = Result<DecodedAudio, Box<dyn Error + Send + Sync>>;

/// Samples decoded between two looks at the cancel flag.
const CANCEL_CHECK_INTERVAL: usize = 4096;

/// The surface was released while its file was still decoding.
#[derive(Debug, thiserror::Error)]
#[error("decode cancelled")]
pub struct Cancelled;

// Type alias for the backend creation result
type BackendResult = Result<(RodioBackend, mpsc::Receiver<SurfaceEvent>), Box<dyn Error>>;

/// Interleaved samples of a fully decoded track.
#[derive(Clone, Debug)]
pub struct DecodedAudio {
    samples: Arc<Vec<f32>>,
    channels: u16,
    sample_rate: u32,
}

impl DecodedAudio {
    fn new(samples: Vec<f32>, channels: u16, sample_rate: u32) -> DecodeResult {
        if channels == 0 || sample_rate == 0 {
            return Err(format!("invalid stream: {channels} channels at {sample_rate} Hz").into());
        }
        Ok(Self {
            samples: Arc::new(samples),
            channels,
            sample_rate,
        })
    }

    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / (self.sample_rate as f64 * self.channels as f64)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample index of a position in seconds, aligned to a frame.
    fn offset_of(&self, seconds: f64) -> usize {
        let frame = (seconds.max(0.0) * self.sample_rate as f64) as usize;
        (frame * self.channels as usize).min(self.samples.len())
    }

    fn seconds_at(&self, offset: usize) -> f64 {
        offset as f64 / (self.sample_rate as f64 * self.channels as f64)
    }
}

pub struct RodioBackend {
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
    events_tx: mpsc::Sender<SurfaceEvent>,
    public_root: PathBuf,
}

impl RodioBackend {
    /// Open the default output device. Asset URLs resolve under `public_root`.
    pub fn new(public_root: impl Into<PathBuf>) -> BackendResult {
        let (stream, stream_handle) = OutputStream::try_default()?;
        let (events_tx, events_rx) = mpsc::channel();

        Ok((
            Self {
                _stream: stream,
                stream_handle,
                events_tx,
                public_root: public_root.into(),
            },
            events_rx,
        ))
    }
}

impl AudioBackend for RodioBackend {
    type Surface = RodioSurface;

    fn open(&mut self, url: &str, epoch: Epoch) -> Result<RodioSurface, PlaybackError> {
        let path = resolve_asset(&self.public_root, url).map_err(|e| match e {
            KitError::RemoteAsset(url) => PlaybackError::RemoteSource(url),
            other => PlaybackError::Unavailable(other.to_string()),
        })?;

        let sink = Sink::try_new(&self.stream_handle)
            .map_err(|e| PlaybackError::Unavailable(e.to_string()))?;
        sink.pause();

        let decoded = Arc::new(Mutex::new(None));
        let cancelled = Arc::new(AtomicBool::new(false));

        spawn_decoder(
            path,
            epoch,
            self.events_tx.clone(),
            Arc::clone(&decoded),
            Arc::clone(&cancelled),
        )?;

        Ok(RodioSurface {
            stream_handle: self.stream_handle.clone(),
            sink: Some(sink),
            events_tx: self.events_tx.clone(),
            epoch,
            decoded,
            audio: None,
            cancelled,
            samples_played: Arc::new(AtomicUsize::new(0)),
            queued: false,
            paused: true,
            finished: false,
            volume: 1.0,
            last_update: None,
        })
    }
}

fn spawn_decoder(
    path: PathBuf,
    epoch: Epoch,
    events_tx: mpsc::Sender<SurfaceEvent>,
    slot: Arc<Mutex<Option<DecodedAudio>>>,
    cancelled: Arc<AtomicBool>,
) -> Result<(), PlaybackError> {
    thread::Builder::new()
        .name(format!("epk-decode-{}", epoch.value()))
        .spawn(move || {
            let started = Instant::now();
            let result = decode_file(&path, &cancelled);

            let kind = if cancelled.load(Ordering::Acquire) {
                log::debug!("Abandoned decode of {} for epoch {epoch}", path.display());
                SurfaceEventKind::Error(LoadError::Aborted)
            } else {
                match result {
                    Ok(audio) => {
                        let duration = audio.duration();
                        let peaks = compute_peaks(&audio.samples, audio.channels, WAVEFORM_PEAKS);
                        log::info!(
                            "Decoded {} in {:?}: {:.1}s, {} Hz, {} channels",
                            path.display(),
                            started.elapsed(),
                            duration,
                            audio.sample_rate,
                            audio.channels
                        );
                        match slot.lock() {
                            Ok(mut slot) => {
                                *slot = Some(audio);
                                SurfaceEventKind::Ready { duration, peaks }
                            }
                            Err(_) => SurfaceEventKind::Error(LoadError::Failed(
                                "decoded audio could not be stored".to_string(),
                            )),
                        }
                    }
                    Err(e) => {
                        log::error!("Failed to decode {}: {e}", path.display());
                        SurfaceEventKind::Error(LoadError::Failed(e.to_string()))
                    }
                }
            };

            // The receiver is gone once the app has shut down.
            let _ = events_tx.send(SurfaceEvent::new(epoch, kind));
        })?;
    Ok(())
}

/// Decode a whole file to interleaved `f32` samples.
///
/// Returns [`Cancelled`] as soon as `cancelled` is seen set.
pub fn decode_file(path: &Path, cancelled: &AtomicBool) -> DecodeResult {
    if cancelled.load(Ordering::Acquire) {
        return Err(Box::new(Cancelled));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "wav" => decode_wav(path, cancelled),
        "flac" => decode_flac(path, cancelled),
        _ => decode_other(path, cancelled),
    }
}

fn collect_samples<E>(
    samples: impl Iterator<Item = Result<f32, E>>,
    cancelled: &AtomicBool,
) -> Result<Vec<f32>, Box<dyn Error + Send + Sync>>
where
    E: Error + Send + Sync + 'static,
{
    let mut out = Vec::new();
    for (i, sample) in samples.enumerate() {
        if i % CANCEL_CHECK_INTERVAL == 0 && cancelled.load(Ordering::Acquire) {
            return Err(Box::new(Cancelled));
        }
        out.push(sample?);
    }
    Ok(out)
}

fn decode_wav(path: &Path, cancelled: &AtomicBool) -> DecodeResult {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();

    let samples = match spec.sample_format {
        hound::SampleFormat::Float => collect_samples(reader.samples::<f32>(), cancelled)?,
        hound::SampleFormat::Int => {
            if !(1..=32).contains(&spec.bits_per_sample) {
                return Err(format!("Unsupported bit depth: {}", spec.bits_per_sample).into());
            }
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            let samples = reader.samples::<i32>().map(|s| s.map(|s| s as f32 / scale));
            collect_samples(samples, cancelled)?
        }
    };

    DecodedAudio::new(samples, spec.channels, spec.sample_rate)
}

fn decode_flac(path: &Path, cancelled: &AtomicBool) -> DecodeResult {
    let mut reader = claxon::FlacReader::open(path)?;
    let info = reader.streaminfo();
    if !(1..=32).contains(&info.bits_per_sample) {
        return Err(format!("Unsupported bit depth: {}", info.bits_per_sample).into());
    }
    let scale = (1i64 << (info.bits_per_sample - 1)) as f32;

    let samples = reader.samples().map(|s| s.map(|s| s as f32 / scale));
    let samples = collect_samples(samples, cancelled)?;

    DecodedAudio::new(samples, info.channels as u16, info.sample_rate)
}

fn decode_other(path: &Path, cancelled: &AtomicBool) -> DecodeResult {
    let file = BufReader::new(File::open(path)?);
    let decoder = rodio::Decoder::new(file)?;
    let channels = decoder.channels();
    let sample_rate = decoder.sample_rate();
    let samples = decoder.map(|s| Ok::<_, Infallible>(s as f32 / 32768.0));
    let samples = collect_samples(samples, cancelled)?;

    DecodedAudio::new(samples, channels, sample_rate)
}

/// One opened source on its own sink.
pub struct RodioSurface {
    stream_handle: OutputStreamHandle,
    sink: Option<Sink>,
    events_tx: mpsc::Sender<SurfaceEvent>,
    epoch: Epoch,
    /// Filled by the decode thread.
    decoded: Arc<Mutex<Option<DecodedAudio>>>,
    audio: Option<DecodedAudio>,
    cancelled: Arc<AtomicBool>,
    samples_played: Arc<AtomicUsize>,
    queued: bool,
    paused: bool,
    finished: bool,
    volume: f32,
    last_update: Option<Instant>,
}

impl RodioSurface {
    fn audio(&mut self) -> Option<&DecodedAudio> {
        if self.audio.is_none() {
            self.audio = self.decoded.lock().ok().and_then(|slot| slot.clone());
        }
        self.audio.as_ref()
    }

    fn is_released(&self) -> bool {
        self.sink.is_none()
    }

    /// Append the decoded samples from the current position, once per sink.
    fn ensure_queued(&mut self) {
        if self.queued || self.is_released() {
            return;
        }
        let start = self.samples_played.load(Ordering::Relaxed);
        let Some(audio) = self.audio().cloned() else {
            return;
        };
        let source = MonitoredSource::new(&audio, start, Arc::clone(&self.samples_played));
        if let Some(sink) = &self.sink {
            sink.append(source);
            self.queued = true;
        }
    }

    fn send(&self, kind: SurfaceEventKind) {
        let _ = self.events_tx.send(SurfaceEvent::new(self.epoch, kind));
    }
}

impl AudioSurface for RodioSurface {
    fn play(&mut self) {
        self.ensure_queued();
        if let Some(sink) = &self.sink {
            sink.play();
            self.paused = false;
            self.finished = false;
        }
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
            self.paused = true;
        }
    }

    // rodio cannot seek a queued iterator, so the samples are re-queued
    // from the target offset on a fresh sink.
    fn seek(&mut self, seconds: f64) {
        if self.is_released() {
            return;
        }
        let Some(offset) = self.audio().map(|a| a.offset_of(seconds)) else {
            return;
        };

        let sink = match Sink::try_new(&self.stream_handle) {
            Ok(sink) => sink,
            Err(e) => {
                log::error!("Failed to create sink for seek: {e}");
                return;
            }
        };
        sink.pause();
        sink.set_volume(self.volume);
        if let Some(old) = self.sink.replace(sink) {
            old.stop();
        }

        self.samples_played.store(offset, Ordering::Relaxed);
        self.queued = false;
        self.finished = false;
        self.last_update = None;
        log::info!("Seek to {seconds:.2}s (sample {offset})");

        if !self.paused {
            self.play();
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(sink) = &self.sink {
            sink.set_volume(volume);
        }
    }

    fn tick(&mut self) {
        if self.is_released() || self.paused || self.finished {
            return;
        }
        let played = self.samples_played.load(Ordering::Relaxed);
        let Some((len, position)) = self.audio().map(|a| (a.len(), a.seconds_at(played))) else {
            return;
        };

        let due = self
            .last_update
            .is_none_or(|t| t.elapsed() >= Duration::from_millis(TIME_UPDATE_INTERVAL_MS));
        if due {
            self.send(SurfaceEventKind::TimeUpdate(position));
            self.last_update = Some(Instant::now());
        }

        let drained = self.sink.as_ref().is_some_and(|s| self.queued && s.empty());
        if played >= len || drained {
            self.finished = true;
            self.paused = true;
            if let Some(sink) = &self.sink {
                sink.pause();
            }
            self.send(SurfaceEventKind::Finish);
        }
    }

    fn release(&mut self) {
        self.cancelled.store(true, Ordering::Release);
        if let Some(sink) = self.sink.take() {
            sink.stop();
            log::debug!("Released surface for epoch {}", self.epoch);
        }
    }
}

impl Drop for RodioSurface {
    fn drop(&mut self) {
        self.release();
    }
}

// Source over decoded samples that counts what has been played
struct MonitoredSource {
    samples: Arc<Vec<f32>>,
    position: usize,
    channels: u16,
    sample_rate: u32,
    samples_played: Arc<AtomicUsize>,
}

impl MonitoredSource {
    fn new(audio: &DecodedAudio, start: usize, samples_played: Arc<AtomicUsize>) -> Self {
        Self {
            samples: Arc::clone(&audio.samples),
            position: start.min(audio.samples.len()),
            channels: audio.channels,
            sample_rate: audio.sample_rate,
            samples_played,
        }
    }
}

impl Iterator for MonitoredSource {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        let sample = *self.samples.get(self.position)?;
        self.position += 1;
        self.samples_played.fetch_add(1, Ordering::Relaxed);
        Some(sample)
    }
}

impl Source for MonitoredSource {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        self.channels
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        let remaining = self.samples.len().saturating_sub(self.position);
        let frames = remaining as f64 / self.channels as f64;
        Some(Duration::from_secs_f64(frames / self.sample_rate as f64))
    }
}
