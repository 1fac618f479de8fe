//! Offline photo preparation for the gallery.
//!
//! Every matching source image gets two outputs under the public directory:
//! a byte-for-byte copy with a URL-safe name in `photos/`, and a downscaled
//! JPEG with the same name in `photos/thumbnails/`. Thumbnails keep their
//! aspect ratio, cap the longest edge and are never upscaled.
//!
//! Files are processed in parallel with rayon. A file that fails is reported
//! and the rest of the batch carries on.

use crate::constants::{PHOTOS_DIR, PHOTO_EXTENSIONS, THUMBNAILS_DIR};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use indicatif::ProgressBar;
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ThumbnailError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{}: {source}", path.display())]
    Image {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("{}: file name is not valid UTF-8", .0.display())]
    InvalidName(PathBuf),

    #[error("{}: URL-safe name '{name}' is already taken by another file", path.display())]
    DuplicateName { path: PathBuf, name: String },
}

#[derive(Debug, Clone)]
pub struct ThumbnailOptions {
    /// Directory scanned (non-recursively) for source images
    pub source_dir: PathBuf,
    /// Public asset root; outputs go to `<public>/photos[/thumbnails]`
    pub public_dir: PathBuf,
    /// Only file names containing this text are processed; empty matches all
    pub filter: String,
    pub max_size: u32,
    pub quality: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub source: PathBuf,
    pub safe_name: String,
    pub photo: PathBuf,
    pub thumbnail: PathBuf,
    pub dimensions: (u32, u32),
}

#[derive(Debug, Default)]
pub struct Report {
    pub generated: Vec<Generated>,
    pub failed: Vec<ThumbnailError>,
}

/// URL-safe file name: lowercased, whitespace runs become `-`, `@` becomes
/// `at` and `#` is dropped.
pub fn safe_name(file_name: &str) -> String {
    let mut out = String::with_capacity(file_name.len());
    let mut in_whitespace = false;
    for c in file_name.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                out.push('-');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        match c {
            '@' => out.push_str("at"),
            '#' => {}
            _ => out.extend(c.to_lowercase()),
        }
    }
    out
}

/// Dimensions that fit inside a `max`×`max` box, preserving aspect ratio and
/// never enlarging.
pub fn fit_inside(width: u32, height: u32, max: u32) -> (u32, u32) {
    if width <= max && height <= max {
        return (width, height);
    }
    let scale = max as f64 / width.max(height) as f64;
    let scaled = |v: u32| ((v as f64 * scale).round() as u32).clamp(1, max);
    (scaled(width), scaled(height))
}

fn is_photo(path: &Path, filter: &str) -> bool {
    let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
        return false;
    };
    if name.starts_with('.') || !name.contains(filter) {
        return false;
    }
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .is_some_and(|ext| PHOTO_EXTENSIONS.contains(&ext.as_str()))
}

/// Source images in `dir` whose name contains `filter`, sorted by path.
pub fn find_sources(dir: &Path, filter: &str) -> Result<Vec<PathBuf>, ThumbnailError> {
    let io_err = |source| ThumbnailError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut sources = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_file() && is_photo(&path, filter) {
            sources.push(path);
        }
    }
    sources.sort();
    Ok(sources)
}

/// Copy one source and write its thumbnail.
pub fn process_photo(
    source: &Path,
    photos_dir: &Path,
    thumbs_dir: &Path,
    max_size: u32,
    quality: u8,
) -> Result<Generated, ThumbnailError> {
    let file_name = source
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| ThumbnailError::InvalidName(source.to_path_buf()))?;
    let name = safe_name(file_name);
    let photo = photos_dir.join(&name);
    let thumbnail = thumbs_dir.join(&name);

    fs::copy(source, &photo).map_err(|e| ThumbnailError::Io {
        path: photo.clone(),
        source: e,
    })?;

    let image = image::open(source).map_err(|e| ThumbnailError::Image {
        path: source.to_path_buf(),
        source: e,
    })?;
    let resized = shrink(&image, max_size);
    write_jpeg(&resized, &thumbnail, quality)?;

    log::info!("Thumbnail {} -> {}", file_name, thumbnail.display());
    Ok(Generated {
        source: source.to_path_buf(),
        safe_name: name,
        photo,
        thumbnail,
        dimensions: resized.dimensions(),
    })
}

fn shrink(image: &DynamicImage, max_size: u32) -> DynamicImage {
    let (width, height) = image.dimensions();
    let (new_width, new_height) = fit_inside(width, height, max_size);
    if (new_width, new_height) == (width, height) {
        image.clone()
    } else {
        image.resize_exact(new_width, new_height, FilterType::Lanczos3)
    }
}

fn write_jpeg(image: &DynamicImage, path: &Path, quality: u8) -> Result<(), ThumbnailError> {
    let file = File::create(path).map_err(|e| ThumbnailError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut writer = BufWriter::new(file);
    let encoder = JpegEncoder::new_with_quality(&mut writer, quality.clamp(1, 100));
    image
        .to_rgb8()
        .write_with_encoder(encoder)
        .map_err(|e| ThumbnailError::Image {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Process every matching source image in parallel.
pub fn generate(options: &ThumbnailOptions, progress: &ProgressBar) -> Result<Report, ThumbnailError> {
    let photos_dir = options.public_dir.join(PHOTOS_DIR);
    let thumbs_dir = photos_dir.join(THUMBNAILS_DIR);
    fs::create_dir_all(&thumbs_dir).map_err(|e| ThumbnailError::Io {
        path: thumbs_dir.clone(),
        source: e,
    })?;

    let sources = find_sources(&options.source_dir, &options.filter)?;
    progress.set_length(sources.len() as u64);

    let mut report = Report::default();
    let mut claimed: HashMap<String, PathBuf> = HashMap::new();
    let mut unique = Vec::with_capacity(sources.len());
    for source in sources {
        let name = source
            .file_name()
            .map(|n| safe_name(&n.to_string_lossy()))
            .unwrap_or_default();
        if claimed.contains_key(&name) {
            progress.inc(1);
            report.failed.push(ThumbnailError::DuplicateName { path: source, name });
        } else {
            claimed.insert(name, source.clone());
            unique.push(source);
        }
    }

    let results: Vec<Result<Generated, ThumbnailError>> = unique
        .par_iter()
        .map(|source| {
            let result = process_photo(
                source,
                &photos_dir,
                &thumbs_dir,
                options.max_size,
                options.quality,
            );
            progress.inc(1);
            result
        })
        .collect();

    for result in results {
        match result {
            Ok(generated) => report.generated.push(generated),
            Err(e) => {
                log::error!("Thumbnail failed: {e}");
                report.failed.push(e);
            }
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    #[test]
    fn test_safe_name() {
        assert_eq!(
            safe_name("2026-01-30 - So Many Cults @ Chess Club - by Thomas Egan #1.jpg"),
            "2026-01-30---so-many-cults-at-chess-club---by-thomas-egan-1.jpg"
        );
        assert_eq!(safe_name("A  B\tC.PNG"), "a-b-c.png");
        assert_eq!(safe_name("plain.jpg"), "plain.jpg");
    }

    #[test]
    fn test_fit_inside() {
        assert_eq!(fit_inside(4000, 3000, 800), (800, 600));
        assert_eq!(fit_inside(3000, 4000, 800), (600, 800));
        assert_eq!(fit_inside(640, 480, 800), (640, 480));
        assert_eq!(fit_inside(800, 800, 800), (800, 800));
        assert_eq!(fit_inside(10000, 5, 800), (800, 1));
    }

    #[test]
    fn test_is_photo_filters() {
        assert!(is_photo(Path::new("/p/Chess Club 1.JPG"), "Chess Club"));
        assert!(is_photo(Path::new("/p/x.jpeg"), ""));
        assert!(!is_photo(Path::new("/p/Other 1.jpg"), "Chess Club"));
        assert!(!is_photo(Path::new("/p/Chess Club.gif"), "Chess Club"));
        assert!(!is_photo(Path::new("/p/.Chess Club.jpg"), ""));
    }

    fn write_image(path: &Path, width: u32, height: u32) {
        RgbImage::from_pixel(width, height, Rgb([200, 40, 40]))
            .save(path)
            .unwrap();
    }

    #[test]
    fn test_generate_writes_copies_and_thumbnails() {
        let dir = TempDir::new().unwrap();
        let public = dir.path().join("public");
        fs::create_dir_all(&public).unwrap();
        write_image(&public.join("Chess Club @ Night #2.png"), 1200, 600);
        write_image(&public.join("Chess Club small.jpg"), 100, 50);
        write_image(&public.join("unrelated.jpg"), 100, 50);

        let options = ThumbnailOptions {
            source_dir: public.clone(),
            public_dir: public.clone(),
            filter: "Chess Club".to_string(),
            max_size: 800,
            quality: 85,
        };
        let report = generate(&options, &ProgressBar::hidden()).unwrap();

        assert!(report.failed.is_empty());
        assert_eq!(report.generated.len(), 2);

        let big = report
            .generated
            .iter()
            .find(|g| g.safe_name == "chess-club-at-night-2.png")
            .unwrap();
        assert_eq!(big.dimensions, (800, 400));
        assert!(public.join("photos/chess-club-at-night-2.png").exists());
        assert!(public.join("photos/thumbnails/chess-club-at-night-2.png").exists());

        let thumb = image::open(public.join("photos/thumbnails/chess-club-small.jpg")).unwrap();
        assert_eq!(thumb.dimensions(), (100, 50));
        assert!(!public.join("photos/unrelated.jpg").exists());
    }

    #[test]
    fn test_generate_reports_bad_files_and_continues() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("broken.jpg"), b"not an image").unwrap();
        write_image(&dir.path().join("good.jpg"), 20, 20);

        let options = ThumbnailOptions {
            source_dir: dir.path().to_path_buf(),
            public_dir: dir.path().join("out"),
            filter: String::new(),
            max_size: 800,
            quality: 85,
        };
        let report = generate(&options, &ProgressBar::hidden()).unwrap();
        assert_eq!(report.generated.len(), 1);
        assert_eq!(report.failed.len(), 1);
        assert!(matches!(report.failed[0], ThumbnailError::Image { .. }));
    }

    #[test]
    fn test_generate_rejects_name_collisions() {
        let dir = TempDir::new().unwrap();
        write_image(&dir.path().join("Set #1.jpg"), 10, 10);
        write_image(&dir.path().join("set 1.jpg"), 10, 10);

        let options = ThumbnailOptions {
            source_dir: dir.path().to_path_buf(),
            public_dir: dir.path().join("out"),
            filter: String::new(),
            max_size: 800,
            quality: 85,
        };
        let report = generate(&options, &ProgressBar::hidden()).unwrap();
        assert_eq!(report.generated.len(), 1);
        assert!(matches!(
            &report.failed[0],
            ThumbnailError::DuplicateName { name, .. } if name == "set-1.jpg"
        ));
    }

    #[test]
    fn test_missing_source_dir() {
        let result = find_sources(Path::new("/nonexistent/epk/photos"), "");
        assert!(matches!(result, Err(ThumbnailError::Io { .. })));
    }
}
