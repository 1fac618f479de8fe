use epk_studio::config::Config;
use std::error::Error;

pub fn handle_play(file: &str) -> Result<(), Box<dyn Error>> {
    #[cfg(feature = "player")]
    {
        let config = Config::load()?;
        let path = std::path::PathBuf::from(shellexpand::tilde(file).as_ref());
        epk_studio::player::run_single(&path, config.default_volume)
    }

    #[cfg(not(feature = "player"))]
    {
        let _ = file;
        let _ = Config::load()?;
        super::kit::print_player_note();
        Ok(())
    }
}
