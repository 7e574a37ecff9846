//! Interactive session.
//!
//! One action runs to completion before the next prompt, so searches and
//! saves never overlap.

use anyhow::Result;
use inquire::{InquireError, Select, Text};
use std::fmt;

use crate::{cli::App, render};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Search,
    Save,
    Favorites,
    Map,
    Clear,
    Quit,
}

impl Action {
    const ALL: [Action; 6] = [
        Action::Search,
        Action::Save,
        Action::Favorites,
        Action::Map,
        Action::Clear,
        Action::Quit,
    ];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Search => "Search",
            Action::Save => "Save current city",
            Action::Favorites => "Favorites",
            Action::Map => "Map favorites",
            Action::Clear => "Clear",
            Action::Quit => "Quit",
        })
    }
}

pub struct Shell<'a> {
    app: &'a App,
    current_city: Option<String>,
}

impl<'a> Shell<'a> {
    pub fn new(app: &'a App) -> Self {
        Self { app, current_city: None }
    }

    pub async fn run(mut self) -> Result<()> {
        println!("🌍 City Guide");

        loop {
            let action = match Select::new("What next?", Action::ALL.to_vec()).prompt() {
                Ok(action) => action,
                Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
                Err(e) => return Err(e.into()),
            };

            match action {
                Action::Search => {
                    let city = match Text::new("City:").prompt() {
                        Ok(city) => city,
                        Err(InquireError::OperationCanceled) => continue,
                        Err(InquireError::OperationInterrupted) => break,
                        Err(e) => return Err(e.into()),
                    };
                    println!("{}", self.search(&city).await);
                }
                Action::Save => println!("{}", self.save_current()),
                Action::Favorites => println!("{}", render::favorites(&self.app.favorites.load())),
                Action::Map => self.app.print_map(None).await?,
                Action::Clear => self.clear(),
                Action::Quit => break,
            }
        }

        Ok(())
    }

    /// Look up `input`; a failure clears the current city.
    async fn search(&mut self, input: &str) -> String {
        let city = input.trim();
        if city.is_empty() {
            return "Please enter city name".to_string();
        }

        match self.app.pipeline.lookup_city(city).await {
            Ok(result) => {
                self.current_city = Some(result.city.clone());
                render::lookup(&result)
            }
            Err(e) => {
                self.current_city = None;
                format!("Error: {e}")
            }
        }
    }

    fn save_current(&self) -> String {
        self.app.save_favorite(self.current_city.as_deref())
    }

    fn clear(&mut self) {
        self.current_city = None;
        print!("\x1B[2J\x1B[1;1H");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use city_guide_core::Config;

    fn app_in(dir: &tempfile::TempDir) -> App {
        let mut config = Config::default();
        config.favorites_file = Some(dir.path().join("favorites.json"));
        // Unroutable endpoint so a search fails fast without real traffic.
        config.endpoints.weather = "http://127.0.0.1:9/weather".into();
        App::from_config(&config).unwrap()
    }

    #[tokio::test]
    async fn blank_search_asks_for_a_city() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_in(&dir);
        let mut shell = Shell::new(&app);

        assert_eq!(shell.search("   ").await, "Please enter city name");
        assert!(shell.current_city.is_none());
    }

    #[tokio::test]
    async fn failed_search_resets_current_city() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_in(&dir);
        let mut shell = Shell::new(&app);
        shell.current_city = Some("Paris".into());

        let out = shell.search("Paris").await;

        assert!(out.starts_with("Error: Weather error:"), "got {out}");
        assert!(shell.current_city.is_none());
    }

    #[test]
    fn save_without_current_city() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_in(&dir);
        let shell = Shell::new(&app);

        assert!(shell.save_current().starts_with("Nothing to save"));
        assert!(app.favorites.load().is_empty());
    }

    #[test]
    fn save_current_city_once() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_in(&dir);
        let mut shell = Shell::new(&app);
        shell.current_city = Some("Paris".into());

        assert_eq!(shell.save_current(), "✅ Saved Paris!");
        assert_eq!(shell.save_current(), "Paris already saved");
        assert_eq!(app.favorites.load(), vec!["Paris"]);
    }
}
