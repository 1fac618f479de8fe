use epk_studio::config::Config;
use tempfile::TempDir;

#[test]
fn test_config_lifecycle() {
    // Create a temporary directory for test config
    let temp_dir = TempDir::new().unwrap();

    // Override the config path for testing
    unsafe {
        std::env::set_var("XDG_CONFIG_HOME", temp_dir.path());
    }

    // Missing file means defaults
    assert!(!Config::exists().unwrap());
    assert_eq!(Config::load().unwrap(), Config::new());

    Config::new().save().unwrap();
    assert!(Config::exists().unwrap());

    let mut config = Config::load().unwrap();
    config.set_value("photo_filter", "Chess Club").unwrap();
    config.set_value("default_volume", "0.6").unwrap();
    config.save().unwrap();

    // Verify mutations persisted
    let reloaded = Config::load().unwrap();
    assert_eq!(reloaded.photo_filter, "Chess Club");
    assert_eq!(reloaded.default_volume, 0.6);
    assert_eq!(reloaded.thumbnail_size, 800);

    let mut config = Config::load().unwrap();
    assert!(config.set_value("invalid_key", "value").is_err());
    assert!(config.set_value("jpeg_quality", "101").is_err());

    // A hand-edited file with an out-of-range value is rejected on load
    std::fs::write(Config::config_path().unwrap(), "default_volume = 3.0\n").unwrap();
    assert!(Config::load().is_err());
}
