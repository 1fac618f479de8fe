//! Main application state and control flow for the press-kit player.
//!
//! The app owns one deck (a playlist for a kit, or a single track), the photo
//! gallery and the key router both of them share. It drains surface events
//! from the audio backend, routes keyboard and mouse input to the topmost
//! overlay, and hands everything to the `ui` module for drawing.

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::info;
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use std::cell::Cell;
use std::error::Error;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use super::audio::RodioBackend;
use super::preview::PreviewCache;
use super::ui;
use crate::gallery::{Gallery, LightboxKey, TileTarget};
use crate::keys::{KeyListener, KeyRouter, Overlay};
use crate::kit::Kit;
use crate::kit::pages::Page;
use crate::playback::{
    AudioBackend, AudioBinding, Epoch, Notice, Playback, PlaylistPlayer, SingleTrackPlayer,
    SurfaceEvent, Track,
};

const SEEK_STEP_SECONDS: f64 = 5.0;
const VOLUME_STEP: f32 = 0.05;
const STATUS_TIMEOUT: Duration = Duration::from_secs(3);

/// The player driving the audio of a session.
pub enum Deck<B: AudioBackend> {
    Playlist(PlaylistPlayer<B>),
    Single(SingleTrackPlayer<B>),
}

impl<B: AudioBackend> Deck<B> {
    pub fn binding(&self) -> &AudioBinding<B> {
        match self {
            Deck::Playlist(player) => player.binding(),
            Deck::Single(player) => player.binding(),
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Deck::Playlist(player) => &player.active_track().title,
            Deck::Single(player) => player.title(),
        }
    }

    /// Playlist entries; empty for a single track.
    pub fn tracks(&self) -> &[Track] {
        match self {
            Deck::Playlist(player) => player.tracks(),
            Deck::Single(_) => &[],
        }
    }

    pub fn active_index(&self) -> Option<usize> {
        match self {
            Deck::Playlist(player) => Some(player.active_index()),
            Deck::Single(_) => None,
        }
    }

    pub fn can_skip_prev(&self) -> bool {
        matches!(self, Deck::Playlist(player) if player.can_skip_prev())
    }

    pub fn can_skip_next(&self) -> bool {
        matches!(self, Deck::Playlist(player) if player.can_skip_next())
    }

    fn handle(&mut self, event: SurfaceEvent) -> Option<Notice> {
        match self {
            Deck::Playlist(player) => player.handle(event),
            Deck::Single(player) => player.handle(event),
        }
    }

    fn toggle(&mut self) -> bool {
        match self {
            Deck::Playlist(player) => player.toggle(),
            Deck::Single(player) => player.toggle(),
        }
    }

    fn seek_by(&mut self, delta: f64) {
        match self {
            Deck::Playlist(player) => player.seek_by(delta),
            Deck::Single(player) => player.seek_by(delta),
        }
    }

    fn seek_fraction(&mut self, fraction: f64) {
        match self {
            Deck::Playlist(player) => player.seek_fraction(fraction),
            Deck::Single(player) => player.seek_fraction(fraction),
        }
    }

    fn set_volume(&mut self, volume: f32) {
        match self {
            Deck::Playlist(player) => player.set_volume(volume),
            Deck::Single(player) => player.set_volume(volume),
        }
    }

    fn tick(&mut self) {
        match self {
            Deck::Playlist(player) => player.tick(),
            Deck::Single(player) => player.tick(),
        }
    }

    fn teardown(&mut self) {
        match self {
            Deck::Playlist(player) => player.teardown(),
            Deck::Single(player) => player.teardown(),
        }
    }
}

/// Screen areas recorded while drawing, for mouse hit testing.
#[derive(Debug, Clone, Copy, Default)]
pub struct HitAreas {
    pub frame: Rect,
    pub waveform: Option<Rect>,
}

pub struct App<B: AudioBackend> {
    pub should_quit: bool,
    /// `None` when playing a lone file.
    pub kit: Option<Kit>,
    pub page: Page,
    pub deck: Deck<B>,
    pub gallery: Gallery,
    pub router: KeyRouter,
    help: Option<KeyListener>,
    pub selected_tile: usize,
    pub status_message: Option<String>,
    status_timer: Option<Instant>,
    /// Bind whose failure is already on the status line.
    failure_reported: Option<Epoch>,
    pub previews: PreviewCache,
    pub hit_areas: Cell<HitAreas>,
    download_dir: Option<PathBuf>,
}

impl<B: AudioBackend> App<B> {
    /// Full press kit: Home and Press Kit pages, playlist and gallery.
    pub fn for_kit(kit: Kit, backend: B, volume: f32) -> Result<Self, Box<dyn Error>> {
        let router = KeyRouter::new();
        let player = PlaylistPlayer::new(backend, kit.tracks.clone(), volume)?;
        let gallery = Gallery::new(kit.photos.clone(), true, router.clone());
        Ok(Self::new(
            Some(kit),
            Page::Home,
            Deck::Playlist(player),
            gallery,
            router,
        ))
    }

    /// One track, no pages and no gallery.
    pub fn for_track(title: &str, url: &str, backend: B, volume: f32) -> Self {
        let router = KeyRouter::new();
        let player = SingleTrackPlayer::new(backend, title, url, volume);
        let gallery = Gallery::new(Vec::new(), false, router.clone());
        Self::new(None, Page::PressKit, Deck::Single(player), gallery, router)
    }

    fn new(
        kit: Option<Kit>,
        page: Page,
        deck: Deck<B>,
        gallery: Gallery,
        router: KeyRouter,
    ) -> Self {
        Self {
            should_quit: false,
            kit,
            page,
            deck,
            gallery,
            router,
            help: None,
            selected_tile: 0,
            status_message: None,
            status_timer: None,
            failure_reported: None,
            previews: PreviewCache::new(),
            hit_areas: Cell::new(HitAreas::default()),
            download_dir: dirs::download_dir(),
        }
    }

    pub fn help_visible(&self) -> bool {
        self.help.is_some()
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!("{message}");
        self.status_message = Some(message);
        self.status_timer = Some(Instant::now());
    }

    fn expire_status(&mut self) {
        if let Some(timer) = self.status_timer
            && timer.elapsed() > STATUS_TIMEOUT
        {
            self.status_message = None;
            self.status_timer.take();
        }
    }

    /// Apply every pending surface event, then let the surface publish.
    pub fn pump(&mut self, events: &mpsc::Receiver<SurfaceEvent>) {
        while let Ok(event) = events.try_recv() {
            self.deck.handle(event);
        }
        self.report_failure();
        self.deck.tick();
    }

    // A bind fails either in `open` or later on the decode thread; both end
    // in `Playback::Failed` for the live epoch.
    fn report_failure(&mut self) {
        let binding = self.deck.binding();
        let epoch = binding.epoch();
        if binding.playback() != Playback::Failed || self.failure_reported == Some(epoch) {
            return;
        }
        self.failure_reported = Some(epoch);
        let title = self.deck.title().to_string();
        self.set_status(format!("Could not load \"{title}\""));
    }

    /// Local file behind an asset URL of the kit.
    pub fn asset_path(&self, url: &str) -> Option<PathBuf> {
        self.kit.as_ref()?.resolve_asset(url).ok()
    }

    /// Queue decoding of the photos the next frame is going to show.
    pub fn prepare_previews(&mut self) {
        self.previews.collect();
        let mut wanted = Vec::new();
        if let Some(photo) = self.gallery.current() {
            wanted.push(photo.full_size.clone());
        }
        if self.page == Page::Home
            && let Some(photo) = self.kit.as_ref().and_then(Kit::featured_photo)
        {
            wanted.push(photo.thumbnail.clone());
        }
        for url in wanted {
            if let Some(path) = self.asset_path(&url) {
                self.previews.load(&path);
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.router.topmost() {
            Some(Overlay::Help) => self.handle_help_keys(key),
            Some(Overlay::Lightbox) => self.handle_lightbox_keys(key),
            None => self.handle_page_keys(key),
        }
    }

    fn handle_help_keys(&mut self, key: KeyEvent) {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
            self.help = None;
        }
    }

    fn handle_lightbox_keys(&mut self, key: KeyEvent) {
        let lightbox_key = match key.code {
            KeyCode::Left => LightboxKey::Prev,
            KeyCode::Right => LightboxKey::Next,
            KeyCode::Esc => LightboxKey::Close,
            KeyCode::Char('?') => {
                self.toggle_help();
                return;
            }
            _ => return,
        };
        self.gallery.handle_key(lightbox_key);
        if let Some(index) = self.gallery.open_index() {
            self.selected_tile = index;
        }
    }

    fn handle_page_keys(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.toggle_help(),
            KeyCode::Tab if self.kit.is_some() => self.switch_page(),
            KeyCode::Char(' ') => {
                self.deck.toggle();
            }
            KeyCode::Char('n') => {
                if let Deck::Playlist(player) = &mut self.deck {
                    player.skip_next();
                }
            }
            KeyCode::Char('p') => {
                if let Deck::Playlist(player) = &mut self.deck {
                    player.skip_prev();
                }
            }
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                if let Deck::Playlist(player) = &mut self.deck
                    && index < player.tracks().len()
                {
                    player.select_track(index);
                }
            }
            KeyCode::Char('+') | KeyCode::Char('=') => self.nudge_volume(VOLUME_STEP),
            KeyCode::Char('-') => self.nudge_volume(-VOLUME_STEP),
            KeyCode::Left => self.deck.seek_by(-SEEK_STEP_SECONDS),
            KeyCode::Right => self.deck.seek_by(SEEK_STEP_SECONDS),
            KeyCode::Char('j') | KeyCode::Down => self.move_tile(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_tile(-1),
            KeyCode::Enter if self.gallery_visible() => {
                self.gallery.activate(self.selected_tile, TileTarget::Image);
            }
            KeyCode::Char('d') if self.gallery_visible() => self.download_selected(),
            _ => {}
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if !matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
            return;
        }
        let areas = self.hit_areas.get();
        match self.router.topmost() {
            Some(Overlay::Help) => self.help = None,
            Some(Overlay::Lightbox) => {
                let image = ui::lightbox_rect(areas.frame);
                if !contains(image, mouse.column, mouse.row) {
                    self.gallery.close();
                }
            }
            None => {
                if let Some(waveform) = areas.waveform
                    && contains(waveform, mouse.column, mouse.row)
                    && waveform.width > 0
                {
                    let fraction = (mouse.column - waveform.x) as f64 / waveform.width as f64;
                    self.deck.seek_fraction(fraction);
                }
            }
        }
    }

    fn toggle_help(&mut self) {
        if self.help.take().is_none() {
            self.help = Some(self.router.install(Overlay::Help));
        }
    }

    fn switch_page(&mut self) {
        self.gallery.close();
        self.page = self.page.next();
        info!("Switched to {} page", self.page.title());
    }

    fn gallery_visible(&self) -> bool {
        self.page == Page::PressKit && !self.gallery.photos().is_empty()
    }

    fn move_tile(&mut self, delta: isize) {
        if !self.gallery_visible() {
            return;
        }
        let last = self.gallery.photos().len() - 1;
        self.selected_tile = self.selected_tile.saturating_add_signed(delta).min(last);
    }

    fn nudge_volume(&mut self, delta: f32) {
        let volume = self.deck.binding().volume() + delta;
        self.deck.set_volume(volume);
    }

    /// Copy the selected photo's original into the download directory.
    fn download_selected(&mut self) {
        let Some(url) = self
            .gallery
            .activate(self.selected_tile, TileTarget::Download)
            .map(str::to_string)
        else {
            return;
        };
        match self.download(&url) {
            Ok(dest) => self.set_status(format!("Saved {}", dest.display())),
            Err(e) => {
                log::error!("Download of {url} failed: {e}");
                self.set_status(format!("Download failed: {e}"));
            }
        }
    }

    fn download(&self, url: &str) -> Result<PathBuf, Box<dyn Error>> {
        let kit = self.kit.as_ref().ok_or("no press kit loaded")?;
        let source = kit.resolve_asset(url)?;
        let dir = self
            .download_dir
            .as_deref()
            .ok_or("Unable to find download directory")?;
        let name = source.file_name().ok_or("asset has no file name")?;
        fs::create_dir_all(dir)?;
        let dest = dir.join(name);
        fs::copy(&source, &dest)?;
        Ok(dest)
    }

    /// Stop audio and drop every overlay.
    pub fn teardown(&mut self) {
        self.help = None;
        self.gallery.teardown();
        self.deck.teardown();
    }
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}

/// Launch the full press-kit player for the kit at `kit_path`.
pub fn run_kit(kit_path: &Path, volume: f32) -> Result<(), Box<dyn Error>> {
    let kit = Kit::load(kit_path)?;
    init_logging()?;
    info!("Starting press kit player for {}", kit.name);

    for problem in kit.validate() {
        log::warn!("{problem}");
    }

    let (backend, events) = RodioBackend::new(kit.public_root())?;
    let app = App::for_kit(kit, backend, volume)?;
    run(app, events)
}

/// Launch the single-track player for one audio file.
pub fn run_single(file: &Path, volume: f32) -> Result<(), Box<dyn Error>> {
    if !file.is_file() {
        return Err(format!("File not found: {}", file.display()).into());
    }
    init_logging()?;

    let root = file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let name = file
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or("file name is not valid UTF-8")?;
    let title = file
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name)
        .to_string();
    info!("Starting single track player for {}", file.display());

    let (backend, events) = RodioBackend::new(root)?;
    let app = App::for_track(&title, name, backend, volume);
    run(app, events)
}

fn run<A: AudioBackend>(
    mut app: App<A>,
    events: mpsc::Receiver<SurfaceEvent>,
) -> Result<(), Box<dyn Error>> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, &events);
    app.teardown();

    // Restore terminal before reporting anything
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = &res {
        log::error!("Player stopped: {e}");
    }
    res
}

fn run_app<T: ratatui::backend::Backend, A: AudioBackend>(
    terminal: &mut Terminal<T>,
    app: &mut App<A>,
    events: &mpsc::Receiver<SurfaceEvent>,
) -> Result<(), Box<dyn Error>> {
    loop {
        app.pump(events);
        app.expire_status();
        app.prepare_previews();

        terminal.draw(|f| ui::draw(f, app))?;

        // Poll for events with a short timeout to allow continuous rendering
        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn init_logging() -> Result<(), Box<dyn Error>> {
    use simplelog::*;
    use std::fs::File;

    let log_file = std::env::temp_dir().join("epk-player.log");
    CombinedLogger::init(vec![WriteLogger::new(
        LevelFilter::Debug,
        Config::default(),
        File::create(log_file)?,
    )])?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::LightboxState;
    use crate::playback::testing::{Call, FakeBackend, ready};
    use crate::playback::{LoadError, SurfaceEventKind};
    use crossterm::event::{KeyEventState, KeyModifiers};
    use tempfile::TempDir;

    const KIT: &str = r#"
name = "so many cults"
tagline = "Psych Rock"

[[tracks]]
title = "Arcade"
file = "/arcade.mp3"

[[tracks]]
title = "Big Bad"
file = "/big-bad.mp3"

[[photos]]
id = "p0"
thumbnail = "/photos/thumbnails/p0.jpg"
full_size = "/photos/p0.jpg"
photographer = "A"

[[photos]]
id = "p1"
thumbnail = "/photos/thumbnails/p1.jpg"
full_size = "/photos/p1.jpg"
photographer = "B"
"#;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn app() -> (App<FakeBackend>, FakeBackend) {
        let backend = FakeBackend::default();
        let app = App::for_kit(Kit::parse(KIT).unwrap(), backend.clone(), 0.8).unwrap();
        (app, backend)
    }

    fn make_ready(app: &mut App<FakeBackend>) {
        let epoch = app.deck.binding().epoch();
        let (tx, rx) = mpsc::channel();
        tx.send(ready(epoch, 120.0)).unwrap();
        app.pump(&rx);
    }

    #[test]
    fn test_kit_app_starts_on_home_with_first_track_bound() {
        let (app, backend) = app();
        assert_eq!(app.page, Page::Home);
        assert_eq!(backend.opened(), vec!["/arcade.mp3"]);
        assert_eq!(app.deck.binding().playback(), Playback::Loading);
        assert!(!app.help_visible());
    }

    #[test]
    fn test_empty_playlist_is_an_error() {
        let kit = Kit::parse("name = \"x\"").unwrap();
        assert!(App::for_kit(kit, FakeBackend::default(), 0.8).is_err());
    }

    #[test]
    fn test_space_toggles_once_ready() {
        let (mut app, _) = app();
        app.handle_key(key(KeyCode::Char(' ')));
        assert_eq!(app.deck.binding().playback(), Playback::Loading);

        make_ready(&mut app);
        app.handle_key(key(KeyCode::Char(' ')));
        assert!(app.deck.binding().is_playing());
    }

    #[test]
    fn test_number_keys_select_tracks() {
        let (mut app, backend) = app();
        app.handle_key(key(KeyCode::Char('2')));
        assert_eq!(app.deck.active_index(), Some(1));
        app.handle_key(key(KeyCode::Char('9')));
        assert_eq!(app.deck.active_index(), Some(1));
        assert_eq!(backend.opened(), vec!["/arcade.mp3", "/big-bad.mp3"]);
    }

    #[test]
    fn test_volume_keys_clamp() {
        let (mut app, _) = app();
        for _ in 0..10 {
            app.handle_key(key(KeyCode::Char('+')));
        }
        assert_eq!(app.deck.binding().volume(), 1.0);
    }

    #[test]
    fn test_gallery_keys_only_on_press_kit_page() {
        let (mut app, _) = app();
        app.handle_key(key(KeyCode::Enter));
        assert!(!app.gallery.is_open());

        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.page, Page::PressKit);
        app.handle_key(key(KeyCode::Char('j')));
        app.handle_key(key(KeyCode::Char('j')));
        assert_eq!(app.selected_tile, 1);
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.gallery.state(), LightboxState::Open(1));
    }

    #[test]
    fn test_lightbox_takes_keys_while_open() {
        let (mut app, backend) = app();
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.gallery.state(), LightboxState::Open(0));

        // Arrows navigate photos instead of seeking, and 'q' is swallowed
        app.handle_key(key(KeyCode::Left));
        assert_eq!(app.gallery.state(), LightboxState::Open(1));
        app.handle_key(key(KeyCode::Char('q')));
        assert!(!app.should_quit);
        assert!(!backend.calls().iter().any(|c| matches!(c, Call::Seek(..))));

        app.handle_key(key(KeyCode::Esc));
        assert!(!app.gallery.is_open());
        assert!(app.router.is_empty());
    }

    #[test]
    fn test_help_sits_above_lightbox() {
        let (mut app, _) = app();
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Enter));
        app.handle_key(key(KeyCode::Char('?')));
        assert_eq!(app.router.topmost(), Some(Overlay::Help));

        app.handle_key(key(KeyCode::Right));
        assert_eq!(app.gallery.state(), LightboxState::Open(0));

        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.router.topmost(), Some(Overlay::Lightbox));
        app.handle_key(key(KeyCode::Right));
        assert_eq!(app.gallery.state(), LightboxState::Open(1));
    }

    #[test]
    fn test_click_outside_lightbox_closes_it() {
        let (mut app, _) = app();
        app.hit_areas.set(HitAreas {
            frame: Rect::new(0, 0, 100, 40),
            waveform: None,
        });
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Enter));

        let inside = ui::lightbox_rect(Rect::new(0, 0, 100, 40));
        app.handle_mouse(click(inside.x + 1, inside.y + 1));
        assert!(app.gallery.is_open());

        app.handle_mouse(click(0, 0));
        assert!(!app.gallery.is_open());
    }

    #[test]
    fn test_click_on_waveform_seeks() {
        let (mut app, backend) = app();
        make_ready(&mut app);
        app.hit_areas.set(HitAreas {
            frame: Rect::new(0, 0, 100, 40),
            waveform: Some(Rect::new(10, 5, 40, 3)),
        });

        app.handle_mouse(click(30, 6));
        assert_eq!(app.deck.binding().position(), 60.0);
        assert!(backend.calls().iter().any(|c| matches!(c, Call::Seek(_, s) if *s == 60.0)));
    }

    #[test]
    fn test_download_copies_original() {
        let dir = TempDir::new().unwrap();
        let public = dir.path().join("public/photos");
        fs::create_dir_all(&public).unwrap();
        fs::write(public.join("p0.jpg"), b"jpeg").unwrap();
        let kit_path = dir.path().join("epk.toml");
        fs::write(&kit_path, KIT).unwrap();

        let mut app =
            App::for_kit(Kit::load(&kit_path).unwrap(), FakeBackend::default(), 0.8).unwrap();
        app.download_dir = Some(dir.path().join("downloads"));
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Char('d')));

        assert_eq!(
            fs::read(dir.path().join("downloads/p0.jpg")).unwrap(),
            b"jpeg"
        );
        assert!(!app.gallery.is_open());
        assert!(app.status_message.unwrap().starts_with("Saved"));
    }

    #[test]
    fn test_failed_load_sets_status() {
        let backend = FakeBackend::failing(&["/arcade.mp3"]);
        let mut app = App::for_kit(Kit::parse(KIT).unwrap(), backend, 0.8).unwrap();
        assert_eq!(app.deck.binding().playback(), Playback::Failed);

        let (_tx, rx) = mpsc::channel();
        app.pump(&rx);
        assert_eq!(app.status_message.as_deref(), Some("Could not load \"Arcade\""));

        // Reported once per bind
        app.status_message = None;
        app.pump(&rx);
        assert!(app.status_message.is_none());
    }

    #[test]
    fn test_decode_failure_sets_status() {
        let (mut app, _backend) = app();
        let (tx, rx) = mpsc::channel();
        let epoch = app.deck.binding().epoch();
        tx.send(SurfaceEvent::new(
            epoch,
            SurfaceEventKind::Error(LoadError::Failed("bad header".to_string())),
        ))
        .unwrap();

        app.pump(&rx);
        assert_eq!(app.deck.binding().playback(), Playback::Failed);
        assert_eq!(app.status_message.as_deref(), Some("Could not load \"Arcade\""));
    }

    #[test]
    fn test_single_track_app() {
        let backend = FakeBackend::default();
        let mut app = App::for_track("Arcade", "arcade.wav", backend.clone(), 0.5);
        assert!(app.kit.is_none());
        assert!(app.deck.tracks().is_empty());

        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Char('n')));
        assert_eq!(backend.opened(), vec!["arcade.wav"]);

        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_teardown_releases_everything() {
        let (mut app, backend) = app();
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Enter));
        app.handle_key(key(KeyCode::Char('?')));

        app.teardown();
        assert!(app.router.is_empty());
        assert!(backend.calls().iter().any(|c| matches!(c, Call::Release(_))));
    }
}
