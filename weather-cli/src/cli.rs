use anyhow::{Context, Result, anyhow};
use chrono::Local;
use clap::{Parser, Subcommand};
use inquire::{Select, Text};
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use weather_core::{
    Config, FetchError, GENERIC_ERROR_MESSAGE, Settings, Units, WeatherReport, WeatherService,
    client_from_config,
};

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather from OpenWeather")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and preferred units.
    Configure,

    /// Show current weather for a city.
    Show {
        /// City name; defaults to the last city searched successfully.
        city: Option<String>,

        /// Units to request: metric, imperial or standard.
        #[arg(long)]
        units: Option<String>,
    },

    /// Show current weather for a coordinate pair.
    Here {
        /// Latitude; defaults to the configured location.
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude; defaults to the configured location.
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        /// Units to request: metric, imperial or standard.
        #[arg(long)]
        units: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, units } => show(city, units.as_deref()).await,
            Command::Here { lat, lon, units } => here(lat.zip(lon), units.as_deref()).await,
        }
    }
}

fn configure() -> Result<()> {
    let mut cfg = Config::load()?;

    let current_key = cfg.api_key().map(str::to_owned).unwrap_or_default();
    let api_key = Text::new("OpenWeather API key:")
        .with_initial_value(&current_key)
        .with_help_message("Get one at https://home.openweathermap.org/api_keys")
        .prompt()
        .context("Failed to read API key")?;
    if api_key.trim().is_empty() {
        return Err(anyhow!("API key must not be empty"));
    }
    cfg.set_api_key(api_key.trim());

    let choices = Units::all().to_vec();
    let cursor = choices.iter().position(|u| *u == cfg.units).unwrap_or(0);
    cfg.units = Select::new("Units:", choices)
        .with_starting_cursor(cursor)
        .prompt()
        .context("Failed to read units")?;

    let path = cfg.save()?;
    println!("Saved configuration to {}", path.display());

    Ok(())
}

async fn show(city: Option<String>, units: Option<&str>) -> Result<()> {
    let config = Config::load()?.with_env_overrides();
    let api_key = config.api_key()?.to_owned();
    let mut settings = Settings::load()?;

    let city = resolve_city(city, &settings)?;
    let service = build_service(&config, units)?;
    search_city(&service, &mut settings, &city, &api_key).await
}

fn resolve_city(city: Option<String>, settings: &Settings) -> Result<String> {
    match city {
        Some(city) => Ok(city),
        None => settings.last_city().map(str::to_owned).ok_or_else(|| {
            anyhow!(
                "No city given and no previous search recorded.\n\
                 Hint: run `weather show <CITY>`."
            )
        }),
    }
}

/// The city is remembered only after the search succeeded.
async fn search_city(
    service: &WeatherService,
    settings: &mut Settings,
    city: &str,
    api_key: &str,
) -> Result<()> {
    present(service, |svc| svc.fetch_by_city(city, api_key)).await?;

    settings.set_last_city(city);
    if let Err(err) = settings.save() {
        warn!("Could not remember last city: {err:#}");
    }

    Ok(())
}

async fn here(coordinates: Option<(f64, f64)>, units: Option<&str>) -> Result<()> {
    let config = Config::load()?.with_env_overrides();
    let api_key = config.api_key()?.to_owned();

    let (latitude, longitude) = coordinates
        .or_else(|| config.location.map(|loc| (loc.latitude, loc.longitude)))
        .ok_or_else(|| {
            anyhow!(
                "Location unavailable.\n\
                 Hint: pass --lat/--lon or add a [location] table to the config file."
            )
        })?;

    let service = build_service(&config, units)?;
    present(&service, |svc| {
        svc.fetch_by_coordinates(latitude, longitude, &api_key)
    })
    .await
}

fn build_service(config: &Config, units: Option<&str>) -> Result<WeatherService> {
    let units = match units {
        Some(units) => Units::try_from(units)?,
        None => config.units,
    };

    Ok(WeatherService::new(client_from_config(config)).with_units(units))
}

/// Subscribes to the service, starts the fetch and renders whatever it published.
async fn present<F>(service: &WeatherService, start: F) -> Result<()>
where
    F: FnOnce(&WeatherService) -> JoinHandle<Result<WeatherReport, FetchError>>,
{
    let mut reports = service.subscribe_report();
    let mut errors = service.subscribe_error();

    let outcome = start(service)
        .await
        .context("Weather fetch task did not complete")?;
    debug!(succeeded = outcome.is_ok(), "weather fetch finished");

    if errors.has_changed()? {
        let error = errors.borrow_and_update().clone();
        if let Some(err) = error {
            service.clear_error();
            return Err(anyhow::Error::new(err).context(GENERIC_ERROR_MESSAGE));
        }
    }

    let report = reports.borrow_and_update().clone();
    let report = report.ok_or_else(|| anyhow!(GENERIC_ERROR_MESSAGE))?;
    debug!(icon = %report.icon_url(), "rendering report");

    println!(
        "{}",
        output::render_report(&report, service.units(), Local::now().naive_local())
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mockall::mock;
    use std::sync::Arc;
    use tempfile::TempDir;
    use weather_core::{WeatherClient, WeatherQuery};

    mock! {
        Client {}

        #[async_trait]
        impl WeatherClient for Client {
            async fn current_weather(&self, query: &WeatherQuery) -> Result<WeatherReport, FetchError>;
        }
    }

    impl std::fmt::Debug for MockClient {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("MockClient").finish()
        }
    }

    fn london() -> WeatherReport {
        WeatherReport {
            city_name: "London".into(),
            temperature: 15.0,
            humidity_percent: 80,
            description: "Clear".into(),
            icon_id: "01d".into(),
        }
    }

    fn service_returning(outcome: Result<WeatherReport, FetchError>) -> WeatherService {
        let mut client = MockClient::new();
        client
            .expect_current_weather()
            .times(1)
            .returning(move |_| outcome.clone());
        WeatherService::new(Arc::new(client))
    }

    fn settings_in(dir: &TempDir) -> Settings {
        Settings::load_from(dir.path().join("settings.toml")).unwrap()
    }

    #[test]
    fn explicit_city_wins_over_last_city() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = settings_in(&dir);
        settings.set_last_city("Paris");

        let city = resolve_city(Some("Oslo".into()), &settings).unwrap();

        assert_eq!(city, "Oslo");
    }

    #[test]
    fn missing_city_falls_back_to_last_city() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = settings_in(&dir);
        settings.set_last_city("Paris");

        assert_eq!(resolve_city(None, &settings).unwrap(), "Paris");
    }

    #[test]
    fn missing_city_without_history_errors_with_hint() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(&dir);

        let err = resolve_city(None, &settings).unwrap_err();

        assert!(err.to_string().contains("Hint: run `weather show <CITY>`"));
    }

    #[tokio::test]
    async fn successful_search_remembers_city() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = settings_in(&dir);
        let service = service_returning(Ok(london()));

        search_city(&service, &mut settings, "London", "K").await.unwrap();

        assert_eq!(settings.last_city(), Some("London"));
        assert_eq!(settings_in(&dir).last_city(), Some("London"));
        assert_eq!(service.report(), Some(london()));
        assert_eq!(service.error(), None);
    }

    #[tokio::test]
    async fn failed_search_keeps_last_city_and_clears_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = settings_in(&dir);
        settings.set_last_city("Paris");
        settings.save().unwrap();
        let service = service_returning(Err(FetchError::network("connection refused")));

        let err = search_city(&service, &mut settings, "London", "K")
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), GENERIC_ERROR_MESSAGE);
        assert!(format!("{err:#}").contains("network failure: connection refused"));
        assert_eq!(settings.last_city(), Some("Paris"));
        assert_eq!(settings_in(&dir).last_city(), Some("Paris"));
        assert_eq!(service.error(), None);
        assert_eq!(service.report(), None);
    }
}
