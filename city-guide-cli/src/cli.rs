use anyhow::Context;
use city_guide_core::{
    Config, FavoritesStore, LookupPipeline, Providers, build_map_points, map_points_geojson,
    provider::NominatimGeocoder,
};
use clap::{ArgAction, Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    render::{self, SaveOutcome},
    shell::Shell,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "city-guide",
    version,
    about = "Current weather, country and USD exchange rate for any city"
)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Use this favorites file instead of the configured one.
    #[arg(long, global = true, value_name = "PATH")]
    pub favorites: Option<PathBuf>,

    /// Runs the interactive shell when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key in the config file.
    Configure,

    /// Look up weather, country and exchange rate for a city.
    Search {
        city: String,

        /// Add the city to favorites after a successful lookup.
        #[arg(long)]
        save: bool,
    },

    /// Manage saved cities.
    Favorites {
        #[command(subcommand)]
        action: FavoritesCommand,
    },

    /// Interactive session: search, save, list and map favorites.
    Shell,
}

#[derive(Debug, Subcommand)]
pub enum FavoritesCommand {
    /// Print saved cities in the order they were added.
    List,

    /// Save a city without looking it up.
    Add { city: String },

    /// Geocode saved cities and print their coordinates.
    Map {
        /// Also write the points as a GeoJSON FeatureCollection.
        #[arg(long, value_name = "PATH")]
        geojson: Option<PathBuf>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Shell) {
            Command::Configure => configure(),
            command => {
                let mut config = Config::load()?.with_env_overrides();
                if let Some(path) = self.favorites {
                    config.favorites_file = Some(path);
                }

                App::from_config(&config)?.execute(command).await
            }
        }
    }
}

/// Everything a command needs, built once from config.
pub struct App {
    pub pipeline: LookupPipeline,
    pub geocoder: NominatimGeocoder,
    pub favorites: FavoritesStore,
}

impl App {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        if !config.has_api_key() {
            tracing::warn!(
                "No weather API key configured; lookups will be rejected by the provider. \
                 Set OPEN_WEATHER_KEY or run `city-guide configure`."
            );
        }

        let providers = Providers::from_config(config)?;
        let favorites = FavoritesStore::from_config(config)?;
        tracing::debug!(path = %favorites.path().display(), "Using favorites file");

        Ok(Self {
            pipeline: LookupPipeline::from_providers(&providers),
            geocoder: providers.geocoder,
            favorites,
        })
    }

    pub async fn print_map(&self, geojson: Option<&Path>) -> anyhow::Result<()> {
        let cities = self.favorites.load();
        if cities.is_empty() {
            println!("{}", render::favorites(&cities));
            return Ok(());
        }

        let points = build_map_points(&self.geocoder, &cities).await;
        println!("{}", render::map_points(&points, cities.len()));

        if let Some(path) = geojson {
            let doc = serde_json::to_string_pretty(&map_points_geojson(&points))
                .context("Failed to serialize map points")?;
            fs::write(path, doc)
                .with_context(|| format!("Failed to write GeoJSON file: {}", path.display()))?;
            println!("Map written to {}", path.display());
        }

        Ok(())
    }

    /// Save `city` and describe the outcome, telling a duplicate apart
    /// from a failed write.
    pub fn save_favorite(&self, city: Option<&str>) -> String {
        let Some(city) = city.map(str::trim).filter(|c| !c.is_empty()) else {
            return "Nothing to save, search for a city first".to_string();
        };

        let outcome = if self.favorites.save_current(Some(city)) {
            SaveOutcome::Saved
        } else if self.favorites.contains(city) {
            SaveOutcome::AlreadySaved
        } else {
            SaveOutcome::Failed
        };

        render::save_outcome(city, outcome)
    }

    async fn execute(&self, command: Command) -> anyhow::Result<()> {
        match command {
            Command::Configure => configure()?,
            Command::Search { city, save } => {
                let result = self.pipeline.lookup_city(&city).await?;
                println!("{}", render::lookup(&result));

                if save {
                    println!("{}", self.save_favorite(Some(&result.city)));
                }
            }
            Command::Favorites { action } => match action {
                FavoritesCommand::List => println!("{}", render::favorites(&self.favorites.load())),
                FavoritesCommand::Add { city } => println!("{}", self.save_favorite(Some(&city))),
                FavoritesCommand::Map { geojson } => self.print_map(geojson.as_deref()).await?,
            },
            Command::Shell => Shell::new(self).run().await?,
        }

        Ok(())
    }
}

/// Prompt for the API key and persist it. Environment overrides are not saved.
fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim();
    if api_key.is_empty() {
        anyhow::bail!("API key must not be empty");
    }

    config.set_api_key(api_key.to_string());
    config.save()?;

    println!("Saved API key to {}", Config::config_file_path()?.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_shell() {
        let cli = Cli::try_parse_from(["city-guide"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn search_with_save_and_global_flags() {
        let cli = Cli::try_parse_from([
            "city-guide",
            "search",
            "New York",
            "--save",
            "-vv",
            "--favorites",
            "f.json",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.favorites, Some(PathBuf::from("f.json")));
        match cli.command {
            Some(Command::Search { city, save }) => {
                assert_eq!(city, "New York");
                assert!(save);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn favorites_map_accepts_geojson_path() {
        let cli = Cli::try_parse_from(["city-guide", "favorites", "map", "--geojson", "out.geojson"])
            .unwrap();

        match cli.command {
            Some(Command::Favorites { action: FavoritesCommand::Map { geojson } }) => {
                assert_eq!(geojson, Some(PathBuf::from("out.geojson")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn search_requires_city() {
        assert!(Cli::try_parse_from(["city-guide", "search"]).is_err());
    }

    fn app_with_favorites(path: PathBuf) -> App {
        let config = Config {
            favorites_file: Some(path),
            ..Config::default()
        };
        App::from_config(&config).unwrap()
    }

    #[test]
    fn save_favorite_reports_saved_then_duplicate() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_with_favorites(dir.path().join("favorites.json"));

        assert_eq!(app.save_favorite(Some(" Paris ")), "✅ Saved Paris!");
        assert_eq!(app.save_favorite(Some("Paris")), "Paris already saved");
        assert!(app.save_favorite(Some("  ")).starts_with("Nothing to save"));
        assert_eq!(app.favorites.load(), vec!["Paris"]);
    }

    #[test]
    fn save_favorite_reports_failed_write() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "file, not a directory").unwrap();
        let app = app_with_favorites(blocker.join("favorites.json"));

        assert_eq!(app.save_favorite(Some("Paris")), "Could not save Paris to favorites");
    }

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
