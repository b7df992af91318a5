use clap::Parser;
use skyglass_core::{AppError, Config, ConfigError, TemperatureUnit, WeatherError};
use skyglass_weather::{load_favorites, Favorite, WeatherProvider, WeatherReport};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Current weather and same-day history for a place name
#[derive(Debug, Parser)]
#[command(name = "skyglass", version, about)]
struct Args {
    /// Place name to look up, e.g. "London"
    location: Option<String>,

    /// Temperature unit: c or f
    #[arg(short, long)]
    unit: Option<TemperatureUnit>,

    /// Years of same-day history to walk back through
    #[arg(long)]
    history: Option<u32>,

    /// JSON file of favorite locations (name -> "C" | "F")
    #[arg(long)]
    favorites: Option<PathBuf>,

    /// Config file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Keep typed config errors typed when they come back through anyhow.
fn config_error(e: anyhow::Error) -> AppError {
    match e.downcast::<ConfigError>() {
        Ok(config) => AppError::Config(config),
        Err(other) => AppError::Other(other),
    }
}

async fn lookup(provider: &WeatherProvider, name: &str, unit: TemperatureUnit, history_years: u32) {
    match provider.retrieve(name, unit, history_years).await {
        Ok(snapshot) => print!("{}", WeatherReport::new(name, &snapshot)),
        Err(e) => {
            tracing::debug!("Lookup failed: {}", e);
            println!("No weather data for {}", name);
        }
    }
    println!();
}

/// Load favorites when a file is configured.
///
/// A bad file is reported inline and skipped when there is still a location
/// to look up; otherwise it is the error the run ends with.
fn favorites_or_notice(path: Option<&Path>, has_location: bool) -> Result<Vec<Favorite>, WeatherError> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };

    match load_favorites(path) {
        Ok(favorites) => Ok(favorites),
        Err(e) => {
            let e = WeatherError::from(e);
            if !has_location {
                return Err(e);
            }
            tracing::warn!("{}", e);
            println!("{}", e.user_message());
            Ok(Vec::new())
        }
    }
}

async fn run(args: Args) -> Result<(), AppError> {
    let (config, _validation) =
        Config::load_validated(args.config.as_deref()).map_err(config_error)?;
    tracing::debug!("Config directory: {}", config.config_dir.display());
    let weather = &config.weather;

    if !weather.has_api_key() {
        return Err(ConfigError::MissingSetting(format!(
            "weather.api_key (or {})",
            skyglass_core::config::API_KEY_ENV
        ))
        .into());
    }

    let unit = args.unit.unwrap_or(weather.temperature_unit);
    let history_years = args.history.unwrap_or(weather.history_years);
    let favorites_path = args.favorites.or_else(|| config.favorites_path());
    let favorites = favorites_or_notice(favorites_path.as_deref(), args.location.is_some())?;

    if favorites.is_empty() && args.location.is_none() {
        return Err(ConfigError::MissingSetting("a location or a favorites file".to_string()).into());
    }

    let provider = WeatherProvider::new(weather)?;
    tracing::debug!("Using {:?}", provider);

    for favorite in &favorites {
        lookup(&provider, &favorite.name, favorite.unit, history_years).await;
    }
    if let Some(location) = args.location.as_deref() {
        lookup(&provider, location, unit, history_years).await;
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = skyglass_core::init("info") {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_location_and_flags() {
        let args = Args::parse_from(["skyglass", "London", "--unit", "f", "--history", "3"]);
        assert_eq!(args.location.as_deref(), Some("London"));
        assert_eq!(args.unit, Some(TemperatureUnit::Fahrenheit));
        assert_eq!(args.history, Some(3));
        assert!(args.favorites.is_none());
    }

    #[test]
    fn test_rejects_unknown_unit() {
        assert!(Args::try_parse_from(["skyglass", "London", "--unit", "kelvin"]).is_err());
    }

    #[test]
    fn test_no_favorites_file_is_empty() {
        assert!(favorites_or_notice(None, false).unwrap().is_empty());
    }

    #[test]
    fn test_bad_favorites_without_location_is_the_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("favorite_locations.json");
        std::fs::write(&path, "[\"London\"]").unwrap();

        let err = favorites_or_notice(Some(&path), false).unwrap_err();
        assert!(matches!(err, WeatherError::Favorites(_)));

        let app: AppError = err.into();
        assert_eq!(app.user_message(), "Favorites file is malformed. Check its contents.");
    }

    #[test]
    fn test_bad_favorites_with_location_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.json");

        assert!(favorites_or_notice(Some(&missing), true).unwrap().is_empty());
    }

    #[test]
    fn test_favorites_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("favorite_locations.json");
        std::fs::write(&path, r#"{"_comment": "x", "Oslo": "C", "Austin": "F"}"#).unwrap();

        let favorites = favorites_or_notice(Some(&path), false).unwrap();
        let names: Vec<&str> = favorites.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Austin", "Oslo"]);
    }

    #[test]
    fn test_config_error_stays_typed() {
        let err = config_error(ConfigError::NotFound("/nope".into()).into());
        assert!(matches!(err, AppError::Config(ConfigError::NotFound(_))));

        let err = config_error(anyhow::anyhow!("disk on fire"));
        assert!(matches!(err, AppError::Other(_)));
    }
}
