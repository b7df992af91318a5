//! Same-instant weather N calendar years ago, via the One Call time machine.

use chrono::{DateTime, Months, Utc};
use serde::Deserialize;

use crate::fetch::{decode, HttpFetcher};
use crate::types::HistoricalPoint;

#[derive(Debug, Deserialize)]
struct TimeMachineResponse {
    #[serde(default)]
    data: Vec<TimeMachinePoint>,
}

#[derive(Debug, Deserialize)]
struct TimeMachinePoint {
    dt: i64,
    temp: f64,
}

/// The instant `years` calendar years before `now`.
///
/// Feb 29 clamps to Feb 28 when the target year is not a leap year.
pub fn years_back(now: DateTime<Utc>, years: u32) -> Option<DateTime<Utc>> {
    now.checked_sub_months(Months::new(years.checked_mul(12)?))
}

/// Fetch the reading for `years` calendar years before `now`. `years` must be at least 1.
pub async fn fetch_historical(
    fetcher: &HttpFetcher,
    url: &str,
    api_key: &str,
    latitude: f64,
    longitude: f64,
    years: u32,
    now: DateTime<Utc>,
) -> Option<HistoricalPoint> {
    if years == 0 {
        tracing::debug!("Historical lookup needs at least one year back");
        return None;
    }

    let target = years_back(now, years)?;
    let params = [
        ("lat", latitude.to_string()),
        ("lon", longitude.to_string()),
        ("dt", target.timestamp().to_string()),
        ("appid", api_key.to_string()),
    ];
    let body = fetcher.fetch(url, &params).await?;
    let response: TimeMachineResponse = decode(body, "historical weather")?;

    match response.data.into_iter().next() {
        Some(point) => Some(HistoricalPoint {
            timestamp: point.dt,
            temperature: point.temp,
        }),
        None => {
            tracing::debug!("No historical coverage for {}", target);
            None
        }
    }
}
