//! Forward geocoding: convert a free-text place name to coordinates.
//! Uses the OpenWeatherMap direct geocoding API.

use serde::Deserialize;

use crate::fetch::{decode, HttpFetcher};
use crate::types::GeoResult;

#[derive(Debug, Deserialize)]
struct GeocodeCandidate {
    lat: f64,
    lon: f64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    country: Option<String>,
}

/// Resolve `name` to the coordinates of the service's top-ranked match.
/// Returns `None` for blank names, failed requests and empty result lists.
pub async fn resolve(
    fetcher: &HttpFetcher,
    url: &str,
    api_key: &str,
    name: &str,
) -> Option<GeoResult> {
    let query = name.trim();
    if query.is_empty() {
        tracing::debug!("Skipping geocode for blank location name");
        return None;
    }

    let params = [("q", query.to_string()), ("appid", api_key.to_string())];
    let body = fetcher.fetch(url, &params).await?;
    let candidates: Vec<GeocodeCandidate> = decode(body, "geocoding")?;

    // Later candidates are alternates; the first one wins
    let best = candidates.into_iter().next()?;
    tracing::info!(
        "Geocoded '{}' to {} ({}) at ({:.4}, {:.4})",
        query,
        best.name.as_deref().unwrap_or(query),
        best.country.as_deref().unwrap_or("?"),
        best.lat,
        best.lon
    );

    Some(GeoResult {
        latitude: best.lat,
        longitude: best.lon,
    })
}
