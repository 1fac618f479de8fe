use epk_studio::config::Config;
use std::error::Error;

pub fn handle_kit(kit: Option<&str>) -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    let path = super::kit_path(kit, &config);

    #[cfg(feature = "player")]
    {
        epk_studio::player::run_kit(&path, config.default_volume)
    }

    #[cfg(not(feature = "player"))]
    {
        let kit = epk_studio::kit::Kit::load(&path)?;
        println!("{}", kit.name);
        print_player_note();
        Ok(())
    }
}

#[cfg(not(feature = "player"))]
pub(crate) fn print_player_note() {
    use owo_colors::OwoColorize;
    println!();
    println!(
        "{} The press kit player requires the 'player' feature to be enabled.",
        "Note:".yellow()
    );
    println!();
    println!("To enable it, install with:");
    println!("  {}", "cargo install epk-studio --features player".cyan());
    println!();
    println!("Or if building from source:");
    println!("  {}", "cargo build --release --features player".cyan());
}
