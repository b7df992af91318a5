//! Plain-text rendering of a lookup: summary line, local time, icon and map
//! links, and the history table.

use skyglass_core::WeatherError;
use std::fmt;

use crate::local_time::format_local;
use crate::types::WeatherSnapshot;

const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";
const MAP_BASE_URL: &str = "https://www.openstreetmap.org";
const MAP_ZOOM: u8 = 13;

/// Icon image URL for an OpenWeatherMap icon id
pub fn icon_url(icon_id: &str) -> String {
    format!("{}/{}@2x.png", ICON_BASE_URL, icon_id)
}

/// Map URL centered on a coordinate with a single marker
pub fn map_url(latitude: f64, longitude: f64) -> String {
    format!(
        "{base}/?mlat={lat}&mlon={lon}#map={zoom}/{lat}/{lon}",
        base = MAP_BASE_URL,
        lat = latitude,
        lon = longitude,
        zoom = MAP_ZOOM
    )
}

#[derive(Debug, Clone)]
pub struct WeatherReport {
    pub summary: String,
    /// Formatted local time, or the notice shown in its place
    pub local_time: Result<String, String>,
    pub icon_url: String,
    pub map_url: String,
    pub history: Vec<String>,
    pub trend: Option<String>,
}

impl WeatherReport {
    pub fn new(location_name: &str, snapshot: &WeatherSnapshot) -> Self {
        let current = &snapshot.current;
        let unit = snapshot.unit();

        let summary = format!(
            "Weather Conditions in {}: {}, {}{}, {}% humidity",
            location_name,
            current.description,
            snapshot.temperature(),
            unit,
            current.humidity
        );

        let local_time = format_local(current.timestamp, &current.timezone).map_err(|e| {
            tracing::warn!("Cannot format local time for {}: {}", location_name, e);
            WeatherError::from(e).user_message().to_string()
        });

        let history = snapshot
            .history
            .entries()
            .iter()
            .map(|e| format!("{}: {}{}", e.year, e.temperature, unit))
            .collect();

        let trend = snapshot.history.trend().map(|t| {
            format!(
                "min {}{u}, max {}{u}, mean {:.1}{u}, change {:+}{u}",
                t.min,
                t.max,
                t.mean,
                t.change,
                u = unit
            )
        });

        Self {
            summary,
            local_time,
            icon_url: icon_url(&current.icon_id),
            map_url: map_url(snapshot.location.latitude, snapshot.location.longitude),
            history,
            trend,
        }
    }
}

impl fmt::Display for WeatherReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.summary)?;
        match &self.local_time {
            Ok(time) => writeln!(f, "{} (local time)", time)?,
            Err(notice) => writeln!(f, "{}", notice)?,
        }
        writeln!(f, "Icon: {}", self.icon_url)?;
        writeln!(f, "Map: {}", self.map_url)?;

        if !self.history.is_empty() {
            writeln!(f, "Same day in past years:")?;
            for row in &self.history {
                writeln!(f, "  {}", row)?;
            }
        }
        if let Some(trend) = &self.trend {
            writeln!(f, "Trend: {}", trend)?;
        }
        Ok(())
    }
}
