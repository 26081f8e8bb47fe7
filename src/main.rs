mod authorize;
mod config;
mod credentials;
mod logging;
mod models;
mod ports;
mod scrape;
mod services;
mod spotify_rs;
mod station;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use color_eyre::{Result, eyre::Context};

use crate::{
    config::Config,
    credentials::{
        CLIENT_ID_VAR, CLIENT_SECRET_VAR, Credentials, REFRESH_TOKEN_VAR, find_credentials,
    },
    logging::{level_for_verbosity, setup_logging},
    services::{
        spotify::client::SpotifyHttpAdapter,
        station_page::BbcPageHttpAdapter,
        sync::{PlaylistSyncService, UpdateOptions},
    },
    station::Station,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The config file to use
    #[arg(short, long, env = "BBC_TO_SPOTIFY_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Console log level, overrides -v/-q
    #[arg(long, global = true, env = "LOG_LEVEL")]
    log_level: Option<log::LevelFilter>,

    /// More console output, repeat for more
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Less console output
    #[arg(short, long, action = ArgAction::Count, global = true)]
    quiet: u8,

    /// File log level (default: debug)
    #[arg(long, default_value = "debug", global = true)]
    log_file_level: log::LevelFilter,

    /// Path to log file
    #[arg(long, env = "BBC_TO_SPOTIFY_LOG_FILE", global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add a station's playlist tracks to an existing Spotify playlist
    UpdatePlaylist {
        /// The Spotify playlist to update
        playlist_id: String,

        /// The station to take tracks from
        #[arg(value_enum)]
        source: Station,

        /// Remove tracks no longer on the station and any duplicates
        #[arg(short, long)]
        prune: bool,

        /// Don't add tracks the playlist already has
        #[arg(short = 'N', long = "no-dups")]
        no_dups: bool,

        /// Insert new tracks at the top of the playlist
        #[arg(long)]
        prepend: bool,

        /// Stamp the playlist description with the update time
        #[arg(short, long = "update-desc")]
        update_desc: bool,

        /// Log what would change without changing anything
        #[arg(short = 'n', long)]
        dry_run: bool,
    },
    /// Create a new Spotify playlist from a station's playlist
    CreatePlaylist {
        /// Name of the new playlist
        name: String,

        /// The station to take tracks from
        #[arg(value_enum)]
        source: Station,

        /// Make the playlist private
        #[arg(short, long)]
        private: bool,

        /// Description of the new playlist
        #[arg(long)]
        desc: Option<String>,

        /// Log what would be created without creating anything
        #[arg(short = 'n', long)]
        dry_run: bool,
    },
    /// Get a refresh token for your Spotify account
    Authorize {
        /// Redirect URI registered for your Spotify app
        #[arg(long)]
        redirect_uri: Option<String>,
    },
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Create a default config file, if it doesn't exist
    CreateDefault,
    /// Print the path to the config file
    Path,
}

fn print_missing_credentials() {
    println!("No Spotify credentials found.");
    println!("Run `bbc-to-spotify authorize` to create them, or set");
    println!("{}, {} and {}.", CLIENT_ID_VAR, CLIENT_SECRET_VAR, REFRESH_TOKEN_VAR);
}

fn sync_service(
    config: &Config,
    credentials: Credentials,
) -> PlaylistSyncService<SpotifyHttpAdapter, BbcPageHttpAdapter> {
    PlaylistSyncService::new(
        SpotifyHttpAdapter::new(
            credentials,
            config.request_timeout(),
            config.market().map(str::to_string),
        ),
        BbcPageHttpAdapter::new(config.request_timeout()),
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let console_level = args
        .log_level
        .unwrap_or_else(|| level_for_verbosity(i16::from(args.verbose) - i16::from(args.quiet)));
    setup_logging(console_level, args.log_file.clone(), args.log_file_level)?;

    log::debug!("bbc-to-spotify starting");
    log::debug!("Loading configuration");

    let config = {
        if let Some(config) = args.config {
            Config::from_file(&config)
        } else {
            Config::load()
        }
    }
    .with_context(|| "Failed to load bbc-to-spotify config")?;

    match args.command {
        Commands::UpdatePlaylist {
            playlist_id,
            source,
            prune,
            no_dups,
            prepend,
            update_desc,
            dry_run,
        } => {
            let Some(credentials) = find_credentials(config.credentials_path().as_deref())? else {
                print_missing_credentials();
                return Ok(());
            };

            let options = UpdateOptions {
                remove_duplicates: no_dups,
                prune,
                prepend,
                update_description: update_desc,
                dry_run,
            };
            let summary = sync_service(&config, credentials)
                .update_playlist(source, &playlist_id, options)
                .await?;

            let verb = if dry_run { "Would have" } else { "Have" };
            println!(
                "{} added {} and removed {} tracks on playlist {}",
                verb, summary.added, summary.removed, playlist_id
            );
            if let Some(description) = summary.description {
                println!("Description: {}", description);
            }
        }
        Commands::CreatePlaylist {
            name,
            source,
            private,
            desc,
            dry_run,
        } => {
            let Some(credentials) = find_credentials(config.credentials_path().as_deref())? else {
                print_missing_credentials();
                return Ok(());
            };

            let playlist = sync_service(&config, credentials)
                .create_playlist(source, &name, private, desc, dry_run)
                .await?;

            if dry_run {
                println!(
                    "Would have created playlist '{}' with {} tracks",
                    playlist.name,
                    playlist.tracks.len()
                );
            } else {
                println!("Created playlist '{}': {}", playlist.name, playlist.id);
            }
        }
        Commands::Authorize { redirect_uri } => {
            let redirect_uri = redirect_uri.unwrap_or_else(|| config.redirect_uri().to_string());
            authorize::authorize(
                config.credentials_path().as_deref(),
                &redirect_uri,
                config.request_timeout(),
            )
            .await?;
        }
        Commands::Config(config_commands) => match config_commands {
            ConfigCommands::CreateDefault => {
                log::debug!("Creating default config");
                let path = Config::create_default()?;
                println!("Config file at {}", path.display());
            }
            ConfigCommands::Path => match Config::config_path() {
                Some(path) => println!("{}", path.display()),
                None => println!("No default config path found"),
            },
        },
    }

    Ok(())
}
