use epk_studio::config::Config;
use owo_colors::OwoColorize;
use std::error::Error;

pub fn handle_init() -> Result<(), Box<dyn Error>> {
    if Config::exists()? {
        return Err(
            "epk is already initialized. Use 'epk config set <key> <value>' to change settings."
                .into(),
        );
    }

    let config = Config::new();
    config.save()?;

    println!("{} epk initialized", "✓".green().bold());
    println!(
        "Configuration saved to: {}",
        Config::config_path()?.display().to_string().cyan()
    );

    Ok(())
}
