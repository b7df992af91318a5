//! Weather lookup pipeline: place name -> coordinates -> current conditions ->
//! same-day history. Every external call is made at most once and in order.

use chrono::{DateTime, Datelike, Utc};
use skyglass_core::config::MAX_HISTORY_YEARS;
use skyglass_core::{NetworkError, WeatherConfig, WeatherError};
use std::time::Duration;
use tracing::instrument;

use crate::fetch::HttpFetcher;
use crate::history::build_history;
use crate::types::{CurrentWeather, GeoResult, HistoricalPoint, TemperatureUnit, WeatherSnapshot};
use crate::{current, geocode, historical};

/// Endpoint URLs for the three API calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub geocoding: String,
    pub onecall: String,
    pub timemachine: String,
}

impl From<&WeatherConfig> for Endpoints {
    fn from(config: &WeatherConfig) -> Self {
        Self {
            geocoding: config.geocoding_url.clone(),
            onecall: config.onecall_url.clone(),
            timemachine: config.timemachine_url.clone(),
        }
    }
}

/// Pipeline stages, logged as a lookup progresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Resolving,
    FetchingCurrent,
    BuildingHistory,
    Done,
    Failed,
}

#[derive(Clone)]
pub struct WeatherProvider {
    fetcher: HttpFetcher,
    endpoints: Endpoints,
    api_key: String,
}

impl std::fmt::Debug for WeatherProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherProvider")
            .field("endpoints", &self.endpoints)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl WeatherProvider {
    pub fn new(config: &WeatherConfig) -> Result<Self, NetworkError> {
        Self::with_endpoints(
            Endpoints::from(config),
            &config.api_key,
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn with_endpoints(
        endpoints: Endpoints,
        api_key: &str,
        timeout: Duration,
    ) -> Result<Self, NetworkError> {
        Ok(Self {
            fetcher: HttpFetcher::new(timeout)?,
            endpoints,
            api_key: api_key.to_string(),
        })
    }

    /// Resolve a place name to the first geocoding match.
    #[instrument(skip(self), level = "debug")]
    pub async fn resolve(&self, name: &str) -> Option<GeoResult> {
        geocode::resolve(&self.fetcher, &self.endpoints.geocoding, &self.api_key, name).await
    }

    /// Current conditions at a coordinate.
    #[instrument(skip(self), level = "debug")]
    pub async fn fetch_current(&self, latitude: f64, longitude: f64) -> Option<CurrentWeather> {
        current::fetch_current(
            &self.fetcher,
            &self.endpoints.onecall,
            &self.api_key,
            latitude,
            longitude,
        )
        .await
    }

    /// Reading for the same instant `years` calendar years ago.
    #[instrument(skip(self), level = "debug")]
    pub async fn fetch_historical(
        &self,
        latitude: f64,
        longitude: f64,
        years: u32,
    ) -> Option<HistoricalPoint> {
        self.fetch_historical_at(latitude, longitude, years, Utc::now())
            .await
    }

    async fn fetch_historical_at(
        &self,
        latitude: f64,
        longitude: f64,
        years: u32,
        now: DateTime<Utc>,
    ) -> Option<HistoricalPoint> {
        historical::fetch_historical(
            &self.fetcher,
            &self.endpoints.timemachine,
            &self.api_key,
            latitude,
            longitude,
            years,
            now,
        )
        .await
    }

    /// Current weather for `name` plus up to `history_years` years of
    /// same-day history.
    ///
    /// # Errors
    ///
    /// `LocationNotFound` when geocoding yields nothing, `NoData` when the
    /// current-conditions call does. A short history is not an error.
    #[instrument(skip(self), level = "info")]
    pub async fn retrieve(
        &self,
        name: &str,
        unit: TemperatureUnit,
        history_years: u32,
    ) -> Result<WeatherSnapshot, WeatherError> {
        self.retrieve_at(name, unit, history_years, Utc::now()).await
    }

    /// `retrieve` against a fixed clock.
    pub async fn retrieve_at(
        &self,
        name: &str,
        unit: TemperatureUnit,
        history_years: u32,
        now: DateTime<Utc>,
    ) -> Result<WeatherSnapshot, WeatherError> {
        let history_years = if history_years > MAX_HISTORY_YEARS {
            tracing::warn!(
                "History of {} years requested, capping at {}",
                history_years,
                MAX_HISTORY_YEARS
            );
            MAX_HISTORY_YEARS
        } else {
            history_years
        };

        tracing::debug!(stage = ?Stage::Resolving, %name);
        let Some(location) = self.resolve(name).await else {
            tracing::debug!(stage = ?Stage::Failed, "Could not resolve {}", name);
            return Err(WeatherError::LocationNotFound(name.to_string()));
        };

        tracing::debug!(stage = ?Stage::FetchingCurrent, lat = location.latitude, lon = location.longitude);
        let Some(current) = self
            .fetch_current(location.latitude, location.longitude)
            .await
        else {
            tracing::debug!(stage = ?Stage::Failed, "No current weather for {}", name);
            return Err(WeatherError::NoData(name.to_string()));
        };

        if history_years > 0 {
            tracing::debug!(stage = ?Stage::BuildingHistory, history_years);
        }
        let history = build_history(
            now.year(),
            current.temperature,
            unit,
            history_years,
            move |years| async move {
                self.fetch_historical_at(location.latitude, location.longitude, years, now)
                    .await
                    .map(|point| point.temperature)
            },
        )
        .await;

        tracing::debug!(stage = ?Stage::Done, years = history.len());
        tracing::info!(
            "Weather for {}: {}, {}{}",
            name,
            current.description,
            crate::units::to_local(current.temperature, unit),
            unit
        );

        Ok(WeatherSnapshot {
            location,
            current,
            history,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_from_config() {
        let config = WeatherConfig::default();
        let endpoints = Endpoints::from(&config);
        assert_eq!(endpoints.geocoding, config.geocoding_url);
        assert_eq!(endpoints.timemachine, config.timemachine_url);
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = WeatherConfig {
            api_key: "super-secret".to_string(),
            ..WeatherConfig::default()
        };
        let provider = WeatherProvider::new(&config).unwrap();
        let debug = format!("{:?}", provider);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("redacted"));
    }
}
