//! Favorite locations file: a JSON object mapping location name to "C" or "F".
//!
//! Keys starting with an underscore (`_comment`, `_note`) are metadata and
//! are dropped before use.

use serde_json::Value;
use skyglass_core::WeatherError;
use std::path::Path;

use crate::types::TemperatureUnit;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Favorite {
    pub name: String,
    pub unit: TemperatureUnit,
}

#[derive(Debug, thiserror::Error)]
pub enum FavoritesError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Expected a JSON object of location -> unit")]
    NotAnObject,

    #[error("Invalid unit {value} for {location}")]
    InvalidUnit { location: String, value: String },
}

impl From<FavoritesError> for WeatherError {
    fn from(e: FavoritesError) -> Self {
        WeatherError::Favorites(e.to_string())
    }
}

fn is_metadata_key(key: &str) -> bool {
    key.starts_with('_')
}

/// Parse favorites from JSON text. Entries come back sorted by name.
pub fn parse_favorites(json: &str) -> Result<Vec<Favorite>, FavoritesError> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Object(map) = value else {
        return Err(FavoritesError::NotAnObject);
    };

    let mut favorites = map
        .into_iter()
        .filter(|(name, _)| !is_metadata_key(name))
        .map(|(name, raw)| {
            raw.as_str()
                .and_then(|s| s.parse::<TemperatureUnit>().ok())
                .ok_or_else(|| FavoritesError::InvalidUnit {
                    location: name.clone(),
                    value: raw.to_string(),
                })
                .map(|unit| Favorite { name, unit })
        })
        .collect::<Result<Vec<_>, _>>()?;

    favorites.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(favorites)
}

/// Read and parse a favorites file.
pub fn load_favorites(path: &Path) -> Result<Vec<Favorite>, FavoritesError> {
    let contents = std::fs::read_to_string(path).map_err(|source| FavoritesError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let favorites = parse_favorites(&contents)?;
    tracing::debug!("Loaded {} favorites from {}", favorites.len(), path.display());
    Ok(favorites)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strips_metadata_keys() {
        let favorites = parse_favorites(
            r#"{
                "_comment": "units are C or F",
                "_note": "edited by hand",
                "Tokyo": "C",
                "Chicago": "F"
            }"#,
        )
        .unwrap();

        assert_eq!(
            favorites,
            vec![
                Favorite {
                    name: "Chicago".to_string(),
                    unit: TemperatureUnit::Fahrenheit
                },
                Favorite {
                    name: "Tokyo".to_string(),
                    unit: TemperatureUnit::Celsius
                },
            ]
        );
    }

    #[test]
    fn test_parse_empty_object() {
        assert!(parse_favorites("{}").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_unknown_unit() {
        let err = parse_favorites(r#"{"Paris": "K"}"#).unwrap_err();
        assert!(matches!(err, FavoritesError::InvalidUnit { ref location, .. } if location == "Paris"));
    }

    #[test]
    fn test_parse_rejects_non_string_unit() {
        let err = parse_favorites(r#"{"Paris": 1}"#).unwrap_err();
        assert!(matches!(err, FavoritesError::InvalidUnit { .. }));
    }

    #[test]
    fn test_parse_rejects_array() {
        let err = parse_favorites(r#"["Paris"]"#).unwrap_err();
        assert!(matches!(err, FavoritesError::NotAnObject));
    }

    #[test]
    fn test_parse_rejects_bad_json() {
        let err = parse_favorites("{").unwrap_err();
        assert!(matches!(err, FavoritesError::Json(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("favorite_locations.json");
        std::fs::write(&path, r#"{"_comment": "x", "London": "C"}"#).unwrap();

        let favorites = load_favorites(&path).unwrap();
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].name, "London");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_favorites(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, FavoritesError::Io { .. }));

        let weather: WeatherError = err.into();
        assert!(weather.to_string().contains("absent.json"));
    }
}
