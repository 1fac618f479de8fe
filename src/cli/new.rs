use dialoguer::{Input, theme::ColorfulTheme};
use epk_studio::constants::{KIT_FILE, PHOTOS_DIR, THUMBNAILS_DIR};
use epk_studio::templates::generate_kit_template;
use epk_studio::utils::progress::create_progress_bar;
use owo_colors::OwoColorize;
use std::error::Error;
use std::fs;
use std::path::Path;

pub fn handle_new(name: Option<&str>, path: Option<&str>) -> Result<(), Box<dyn Error>> {
    let display_name = match name {
        Some(n) => n.to_string(),
        None => Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt("Band or artist name")
            .interact_text()?,
    };

    let slug = normalize_kit_name(&display_name);
    if slug.is_empty() {
        return Err("Kit name cannot be empty".into());
    }

    let parent_dir = match path {
        Some(p) => shellexpand::tilde(p).to_string(),
        None => std::env::current_dir()?.to_string_lossy().to_string(),
    };
    let kit_dir = Path::new(&parent_dir).join(&slug);

    if kit_dir.exists() {
        eprintln!(
            "{} '{}' already exists at {}",
            "Error:".red().bold(),
            slug.yellow(),
            kit_dir.display().to_string().cyan()
        );
        return Err("Press kit already exists".into());
    }

    println!(
        "{} {}",
        "Creating press kit:".bright_black(),
        display_name.cyan().bold()
    );
    println!(
        "{} {}",
        "Location:".bright_black(),
        kit_dir.display().to_string().cyan()
    );
    println!();

    let pb = create_progress_bar(2);
    pb.set_message("Creating asset directories...");
    create_asset_dirs(&kit_dir)?;
    pb.inc(1);

    pb.set_message(format!("Writing {KIT_FILE}..."));
    fs::write(kit_dir.join(KIT_FILE), generate_kit_template(&display_name))?;
    pb.inc(1);
    pb.finish_and_clear();

    println!(
        "{} Press kit '{}' created",
        "✓".green().bold(),
        display_name.cyan().bold()
    );
    println!("\n{}", "Next steps:".yellow().bold());
    println!(
        "  {} {}",
        "$".bright_black(),
        format!("cd {}", kit_dir.display()).cyan()
    );
    println!(
        "  {} {}",
        "#".bright_black(),
        "Drop tracks and photos into public/".bright_black().italic()
    );
    println!("  {} {}", "$".bright_black(), "epk thumbnails".cyan());
    println!("  {} {}", "$".bright_black(), "epk check".cyan());

    Ok(())
}

fn create_asset_dirs(kit_dir: &Path) -> Result<(), Box<dyn Error>> {
    let thumbnails = kit_dir.join("public").join(PHOTOS_DIR).join(THUMBNAILS_DIR);
    fs::create_dir_all(&thumbnails)?;
    Ok(())
}

/// Directory name for a kit: lowercase, words joined by '-', punctuation dropped.
fn normalize_kit_name(name: &str) -> String {
    name.to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .map(|word| {
            word.chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
