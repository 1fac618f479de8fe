use super::kit_path;
use epk_studio::config::Config;
use epk_studio::kit::Kit;
use owo_colors::OwoColorize;
use std::error::Error;

pub fn handle_photos(kit: Option<&str>, json: bool) -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    let kit = Kit::load(&kit_path(kit, &config))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&kit.photos)?);
        return Ok(());
    }

    if kit.photos.is_empty() {
        println!("{}", "No photos in this kit".yellow());
        return Ok(());
    }

    let featured = kit.featured_photo().map(|p| p.id.as_str());
    println!("{} ({})", "Photos".bold(), kit.photos.len());
    for photo in &kit.photos {
        let marker = if Some(photo.id.as_str()) == featured {
            "★".yellow().to_string()
        } else {
            " ".to_string()
        };
        println!("{marker} {:<24} {}", photo.id.cyan(), photo.caption());
        println!("  {:<24} {}", "", photo.full_size.bright_black());
    }

    Ok(())
}
