use serde::{Deserialize, Serialize};
use skyglass_core::WeatherError;

pub use skyglass_core::TemperatureUnit;

use crate::history::HistoricalSeries;

/// Coordinates of the first geocoding match for a place name
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoResult {
    pub latitude: f64,
    pub longitude: f64,
}

/// Current conditions at a coordinate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    /// Observation time, epoch seconds (UTC)
    pub timestamp: i64,
    /// IANA zone of the location, e.g. "Europe/London"
    pub timezone: String,
    /// Temperature in kelvin
    pub temperature: f64,
    /// Relative humidity in percent
    pub humidity: u8,
    pub description: String,
    /// OpenWeatherMap icon id, e.g. "01d"
    pub icon_id: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Temperature at a single past instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    /// Epoch seconds (UTC)
    pub timestamp: i64,
    /// Temperature in kelvin
    pub temperature: f64,
}

/// Everything one lookup produces
#[derive(Debug, Clone, Serialize)]
pub struct WeatherSnapshot {
    pub location: GeoResult,
    pub current: CurrentWeather,
    pub history: HistoricalSeries,
}

impl WeatherSnapshot {
    /// Unit the current temperature and the history are displayed in
    pub fn unit(&self) -> TemperatureUnit {
        self.history.unit()
    }

    /// Current temperature converted to the snapshot's unit
    pub fn temperature(&self) -> i32 {
        crate::units::to_local(self.current.temperature, self.unit())
    }
}

/// Local time formatting errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeError {
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Timestamp out of range: {0}")]
    InvalidTimestamp(i64),
}

impl From<TimeError> for WeatherError {
    fn from(e: TimeError) -> Self {
        match e {
            TimeError::InvalidTimezone(zone) => WeatherError::InvalidTimezone(zone),
            other => WeatherError::NoData(other.to_string()),
        }
    }
}
