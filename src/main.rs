//! epk - an electronic press kit in the terminal.
//!
//! The tool covers two jobs:
//!
//! 1. **Preparing a kit**: scaffolding an `epk.toml` with its public asset
//!    directory, generating gallery thumbnails from source photos, and
//!    checking that every track and photo the kit names actually exists.
//!
//! 2. **Presenting a kit** (optional `player` feature): a terminal rendition
//!    of the press kit with a Home and a Press Kit page, a waveform playlist
//!    player and a photo gallery with a lightbox.

use clap::{CommandFactory, Parser, Subcommand, builder::PossibleValuesParser};
use clap_complete::{Generator, Shell, generate};
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};
use std::error::Error;
use std::io;

mod cli;

#[derive(Parser)]
#[command(name = "epk")]
#[command(about = "Terminal-based electronic press kit with waveform player and photo lightbox")]
#[command(version)]
struct Cli {
    /// Log progress details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize epk configuration
    Init,
    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Generate shell completions
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Create a new press kit scaffold
    New {
        /// Band or artist name (prompted for when omitted)
        name: Option<String>,
        /// Parent directory for the kit (defaults to current directory)
        #[arg(short, long)]
        path: Option<String>,
    },
    /// Copy photos under URL-safe names and generate gallery thumbnails
    Thumbnails {
        /// Directory holding the source photos (defaults to the public directory)
        #[arg(short, long)]
        source: Option<String>,
        /// Public asset directory receiving photos/ and photos/thumbnails/
        #[arg(long)]
        public: Option<String>,
        /// Only process files whose name contains this text
        #[arg(short, long)]
        filter: Option<String>,
        /// Longest thumbnail edge in pixels
        #[arg(long)]
        max_size: Option<u32>,
        /// JPEG quality of the thumbnails (1-100)
        #[arg(short, long)]
        quality: Option<u8>,
    },
    /// List the photos of a kit
    Photos {
        /// Kit file (defaults to the configured kit_file)
        kit: Option<String>,
        /// Print the photo records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate a kit and report missing assets
    Check {
        /// Kit file (defaults to the configured kit_file)
        kit: Option<String>,
    },
    /// Play a single audio file
    Play {
        /// Audio file to play
        file: String,
    },
    /// Open the press kit player
    Kit {
        /// Kit file (defaults to the configured kit_file)
        kit: Option<String>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// View current configuration
    View,
    /// Set a configuration value
    Set {
        /// Configuration key
        #[arg(value_parser = PossibleValuesParser::new([
            "default_volume",
            "thumbnail_size",
            "jpeg_quality",
            "photo_filter",
            "kit_file",
        ]))]
        key: String,
        /// Configuration value
        value: String,
    },
    /// Edit configuration file in your editor
    Edit,
}

fn print_completions<G: Generator>(generator: G, cmd: &mut clap::Command) {
    generate(
        generator,
        cmd,
        cmd.get_name().to_string(),
        &mut io::stdout(),
    );
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };
    // A second logger cannot be installed; the first one wins.
    let _ = TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    // The player logs to a file so the terminal UI stays intact
    if !matches!(cli.command, Commands::Play { .. } | Commands::Kit { .. }) {
        init_logging(cli.verbose);
    }

    match cli.command {
        Commands::Init => {
            cli::init::handle_init()?;
        }
        Commands::Config { action } => match action {
            ConfigAction::View => {
                cli::config::handle_config_view()?;
            }
            ConfigAction::Set { key, value } => {
                cli::config::handle_config_set(&key, &value)?;
            }
            ConfigAction::Edit => {
                cli::config::handle_config_edit()?;
            }
        },
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            print_completions(shell, &mut cmd);
        }
        Commands::New { name, path } => {
            cli::new::handle_new(name.as_deref(), path.as_deref())?;
        }
        Commands::Thumbnails {
            source,
            public,
            filter,
            max_size,
            quality,
        } => {
            cli::thumbnails::handle_thumbnails(cli::thumbnails::ThumbnailArgs {
                source: source.as_deref(),
                public: public.as_deref(),
                filter: filter.as_deref(),
                max_size,
                quality,
            })?;
        }
        Commands::Photos { kit, json } => {
            cli::photos::handle_photos(kit.as_deref(), json)?;
        }
        Commands::Check { kit } => {
            cli::check::handle_check(kit.as_deref())?;
        }
        Commands::Play { file } => {
            cli::play::handle_play(&file)?;
        }
        Commands::Kit { kit } => {
            cli::kit::handle_kit(kit.as_deref())?;
        }
    }

    Ok(())
}
