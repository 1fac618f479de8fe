use super::kit_path;
use epk_studio::config::Config;
use epk_studio::kit::Kit;
use epk_studio::utils::progress::create_progress_spinner;
use owo_colors::OwoColorize;
use std::error::Error;

pub fn handle_check(kit: Option<&str>) -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    let path = kit_path(kit, &config);

    let spinner = create_progress_spinner();
    spinner.set_message(format!("Checking {}", path.display()));
    let kit = Kit::load(&path)?;
    let problems = kit.validate();
    spinner.finish_and_clear();

    println!(
        "{} {} ({} tracks, {} photos)",
        "Kit:".bright_black(),
        kit.name.cyan().bold(),
        kit.tracks.len(),
        kit.photos.len()
    );

    if problems.is_empty() {
        println!("{} No problems found", "✓".green().bold());
        return Ok(());
    }

    for problem in &problems {
        println!("  {} {problem}", "⚠".yellow());
    }
    Err(format!("{} problem(s) found", problems.len()).into())
}
