//! Terminal previews of gallery photos.
//!
//! Photos are decoded on a worker thread, shrunk to a small working copy and
//! cached by path. Drawing maps two pixel rows onto one cell with the upper
//! half block (foreground is the top pixel, background the bottom one); the
//! rendered cells are kept for the last area size of each photo.

use image::RgbImage;
use image::imageops::{self, FilterType};
use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

/// Largest working copy kept in memory, in pixels.
const PREVIEW_MAX_WIDTH: u32 = 320;
const PREVIEW_MAX_HEIGHT: u32 = 240;

pub enum Preview {
    Loading,
    Image(RgbImage),
    /// The file is missing or could not be decoded.
    Broken,
}

type Rendered = (u16, u16, Vec<Line<'static>>);

pub struct PreviewCache {
    entries: HashMap<PathBuf, Preview>,
    rendered: RefCell<HashMap<PathBuf, Rendered>>,
    done_tx: mpsc::Sender<(PathBuf, Preview)>,
    done_rx: mpsc::Receiver<(PathBuf, Preview)>,
}

impl Default for PreviewCache {
    fn default() -> Self {
        let (done_tx, done_rx) = mpsc::channel();
        Self {
            entries: HashMap::new(),
            rendered: RefCell::new(HashMap::new()),
            done_tx,
            done_rx,
        }
    }
}

impl PreviewCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start decoding `path` in the background unless it is known already.
    pub fn load(&mut self, path: &Path) {
        if self.entries.contains_key(path) {
            return;
        }
        let owned = path.to_path_buf();
        let tx = self.done_tx.clone();
        let spawned = thread::Builder::new()
            .name("epk-preview".to_string())
            .spawn(move || {
                let preview = load_preview(&owned);
                let _ = tx.send((owned, preview));
            });
        match spawned {
            Ok(_) => {
                self.entries.insert(path.to_path_buf(), Preview::Loading);
            }
            Err(e) => {
                log::warn!("Decoding preview {} inline: {e}", path.display());
                self.entries.insert(path.to_path_buf(), load_preview(path));
            }
        }
    }

    /// Store every preview the worker threads have finished.
    pub fn collect(&mut self) {
        while let Ok((path, preview)) = self.done_rx.try_recv() {
            self.rendered.borrow_mut().remove(&path);
            self.entries.insert(path, preview);
        }
    }

    pub fn get(&self, path: &Path) -> Option<&Preview> {
        self.entries.get(path)
    }

    /// Half-block cells of a decoded preview, reused while the area keeps its size.
    pub fn lines(&self, path: &Path, width: u16, height: u16) -> Option<Vec<Line<'static>>> {
        let Some(Preview::Image(image)) = self.entries.get(path) else {
            return None;
        };
        let mut rendered = self.rendered.borrow_mut();
        if let Some((w, h, lines)) = rendered.get(path)
            && (*w, *h) == (width, height)
        {
            return Some(lines.clone());
        }
        let lines = half_blocks(image, width, height);
        rendered.insert(path.to_path_buf(), (width, height, lines.clone()));
        Some(lines)
    }

    /// Number of previews still decoding.
    pub fn pending(&self) -> usize {
        self.entries
            .values()
            .filter(|p| matches!(p, Preview::Loading))
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn load_preview(path: &Path) -> Preview {
    match image::open(path) {
        Ok(img) => Preview::Image(img.thumbnail(PREVIEW_MAX_WIDTH, PREVIEW_MAX_HEIGHT).to_rgb8()),
        Err(e) => {
            log::warn!("Could not load preview {}: {e}", path.display());
            Preview::Broken
        }
    }
}

/// Render `image` into at most `width` x `height` cells, keeping its aspect.
pub fn half_blocks(image: &RgbImage, width: u16, height: u16) -> Vec<Line<'static>> {
    let (w, h) = image.dimensions();
    if w == 0 || h == 0 || width == 0 || height == 0 {
        return Vec::new();
    }

    let scale = (width as f64 / w as f64).min(height as f64 * 2.0 / h as f64);
    let target_w = ((w as f64 * scale) as u32).max(1);
    let target_h = ((h as f64 * scale) as u32).max(1);
    let scaled = imageops::resize(image, target_w, target_h, FilterType::Triangle);

    (0..target_h)
        .step_by(2)
        .map(|y| {
            let spans: Vec<Span> = (0..target_w)
                .map(|x| {
                    let top = rgb(scaled.get_pixel(x, y));
                    let style = if y + 1 < target_h {
                        Style::default().fg(top).bg(rgb(scaled.get_pixel(x, y + 1)))
                    } else {
                        Style::default().fg(top)
                    };
                    Span::styled("▀", style)
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

fn rgb(pixel: &image::Rgb<u8>) -> Color {
    let [r, g, b] = pixel.0;
    Color::Rgb(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};
    use tempfile::TempDir;

    fn wait_for(cache: &mut PreviewCache) {
        let deadline = Instant::now() + Duration::from_secs(10);
        cache.collect();
        while cache.pending() > 0 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(10));
            cache.collect();
        }
    }

    #[test]
    fn test_half_blocks_fit_area() {
        let image = RgbImage::from_pixel(40, 20, image::Rgb([200, 10, 10]));
        let lines = half_blocks(&image, 20, 20);

        // 40x20 scaled to 20x10 pixels is 5 rows of cells
        assert_eq!(lines.len(), 5);
        assert!(lines.iter().all(|l| l.spans.len() == 20));
        assert_eq!(lines[0].spans[0].style.fg, Some(Color::Rgb(200, 10, 10)));
    }

    #[test]
    fn test_half_blocks_empty_area() {
        let image = RgbImage::new(4, 4);
        assert!(half_blocks(&image, 0, 10).is_empty());
    }

    #[test]
    fn test_cache_marks_broken_images() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("good.png");
        RgbImage::from_pixel(8, 8, image::Rgb([0, 0, 0])).save(&good).unwrap();
        let bad = dir.path().join("missing.jpg");

        let mut cache = PreviewCache::new();
        cache.load(&good);
        cache.load(&bad);
        cache.load(&good);
        assert_eq!(cache.len(), 2);

        wait_for(&mut cache);
        assert_eq!(cache.pending(), 0);
        assert!(matches!(cache.get(&good), Some(Preview::Image(_))));
        assert!(matches!(cache.get(&bad), Some(Preview::Broken)));
    }

    #[test]
    fn test_rendered_lines_follow_area_size() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wide.png");
        RgbImage::from_pixel(40, 20, image::Rgb([0, 90, 0])).save(&path).unwrap();

        let mut cache = PreviewCache::new();
        assert!(cache.lines(&path, 20, 20).is_none());
        cache.load(&path);
        assert!(matches!(cache.get(&path), Some(Preview::Loading)));
        assert!(cache.lines(&path, 20, 20).is_none());

        wait_for(&mut cache);
        assert_eq!(cache.lines(&path, 20, 20).unwrap().len(), 5);
        assert_eq!(cache.lines(&path, 20, 20).unwrap().len(), 5);
        assert_eq!(cache.lines(&path, 10, 20).unwrap()[0].spans.len(), 10);
    }
}
