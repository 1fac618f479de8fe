use epk_studio::config::Config;
use epk_studio::constants::{PHOTOS_DIR, THUMBNAILS_DIR};
use epk_studio::thumbnails::{ThumbnailOptions, generate};
use epk_studio::utils::progress::create_progress_bar;
use owo_colors::OwoColorize;
use std::error::Error;
use std::path::PathBuf;

pub struct ThumbnailArgs<'a> {
    pub source: Option<&'a str>,
    pub public: Option<&'a str>,
    pub filter: Option<&'a str>,
    pub max_size: Option<u32>,
    pub quality: Option<u8>,
}

pub fn handle_thumbnails(args: ThumbnailArgs) -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    let options = resolve_options(&args, &config)?;

    if !options.source_dir.is_dir() {
        return Err(format!("Source directory not found: {}", options.source_dir.display()).into());
    }

    println!(
        "{} {}",
        "Scanning".bright_black(),
        options.source_dir.display().to_string().cyan()
    );
    if !options.filter.is_empty() {
        println!(
            "{} {}",
            "Filter:".bright_black(),
            options.filter.yellow()
        );
    }

    let pb = create_progress_bar(0);
    let report = generate(&options, &pb)?;
    pb.finish_and_clear();

    for generated in &report.generated {
        let (width, height) = generated.dimensions;
        println!(
            "  {} {} {}",
            "✓".green(),
            generated.safe_name,
            format!("({width}x{height})").bright_black()
        );
    }
    for failure in &report.failed {
        println!("  {} {}", "✗".red(), failure);
    }

    let photos_dir = options.public_dir.join(PHOTOS_DIR);
    println!();
    println!(
        "{} {} generated, {} failed",
        "Summary:".bold(),
        report.generated.len().to_string().green(),
        report.failed.len().to_string().red()
    );
    println!(
        "  {} {}",
        "Photos:".bright_black(),
        photos_dir.display().to_string().cyan()
    );
    println!(
        "  {} {}",
        "Thumbnails:".bright_black(),
        photos_dir.join(THUMBNAILS_DIR).display().to_string().cyan()
    );

    if report.generated.is_empty() && report.failed.is_empty() {
        println!("{}", "No matching photos found".yellow());
    }

    Ok(())
}

fn resolve_options(args: &ThumbnailArgs, config: &Config) -> Result<ThumbnailOptions, Box<dyn Error>> {
    let expand = |p: &str| PathBuf::from(shellexpand::tilde(p).as_ref());
    let public_dir = args.public.map(expand).unwrap_or_else(|| PathBuf::from("public"));
    let source_dir = args.source.map(expand).unwrap_or_else(|| public_dir.clone());

    let max_size = args.max_size.unwrap_or(config.thumbnail_size);
    if max_size == 0 {
        return Err("--max-size must be greater than 0".into());
    }
    let quality = args.quality.unwrap_or(config.jpeg_quality);
    if !(1..=100).contains(&quality) {
        return Err("--quality must be between 1 and 100".into());
    }

    Ok(ThumbnailOptions {
        source_dir,
        public_dir,
        filter: args
            .filter
            .map(str::to_string)
            .unwrap_or_else(|| config.photo_filter.clone()),
        max_size,
        quality,
    })
}
