//! Current conditions from the One Call endpoint.

use serde::Deserialize;

use crate::fetch::{decode, HttpFetcher};
use crate::types::CurrentWeather;

#[derive(Debug, Deserialize)]
struct OneCallResponse {
    lat: f64,
    lon: f64,
    timezone: String,
    current: CurrentBlock,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    dt: i64,
    temp: f64,
    humidity: u8,
    #[serde(default)]
    weather: Vec<ConditionBlock>,
}

#[derive(Debug, Deserialize)]
struct ConditionBlock {
    description: String,
    icon: String,
}

impl OneCallResponse {
    fn into_current(self) -> Option<CurrentWeather> {
        let condition = self.current.weather.into_iter().next()?;
        Some(CurrentWeather {
            timestamp: self.current.dt,
            timezone: self.timezone,
            temperature: self.current.temp,
            humidity: self.current.humidity,
            description: condition.description,
            icon_id: condition.icon,
            latitude: self.lat,
            longitude: self.lon,
        })
    }
}

/// Fetch current conditions at a coordinate. One attempt, no retry.
pub async fn fetch_current(
    fetcher: &HttpFetcher,
    url: &str,
    api_key: &str,
    latitude: f64,
    longitude: f64,
) -> Option<CurrentWeather> {
    let params = [
        ("lat", latitude.to_string()),
        ("lon", longitude.to_string()),
        ("appid", api_key.to_string()),
    ];
    let body = fetcher.fetch(url, &params).await?;
    let response: OneCallResponse = decode(body, "current weather")?;

    let current = response.into_current();
    if current.is_none() {
        tracing::debug!("Current weather response has no condition entry");
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn london_body() -> serde_json::Value {
        serde_json::json!({
            "lat": 51.5,
            "lon": -0.12,
            "timezone": "Europe/London",
            "timezone_offset": 0,
            "current": {
                "dt": 1_700_000_000,
                "temp": 283.15,
                "feels_like": 282.0,
                "humidity": 70,
                "weather": [
                    {"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}
                ]
            }
        })
    }

    #[tokio::test]
    async fn test_fetch_current_parses_snapshot() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/3.0/onecall"))
            .and(query_param("lat", "51.5"))
            .and(query_param("lon", "-0.12"))
            .and(query_param("appid", "key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(london_body()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let fetcher = HttpFetcher::with_default_timeout().unwrap();
        let url = format!("{}/data/3.0/onecall", mock_server.uri());
        let current = fetch_current(&fetcher, &url, "key", 51.5, -0.12)
            .await
            .unwrap();

        assert_eq!(current.timestamp, 1_700_000_000);
        assert_eq!(current.timezone, "Europe/London");
        assert_eq!(current.temperature, 283.15);
        assert_eq!(current.humidity, 70);
        assert_eq!(current.description, "clear sky");
        assert_eq!(current.icon_id, "01d");
    }

    #[tokio::test]
    async fn test_fetch_current_missing_condition_is_none() {
        let mock_server = MockServer::start().await;
        let mut body = london_body();
        body["current"]["weather"] = serde_json::json!([]);

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&mock_server)
            .await;

        let fetcher = HttpFetcher::with_default_timeout().unwrap();
        assert!(fetch_current(&fetcher, &mock_server.uri(), "key", 51.5, -0.12)
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_fetch_current_missing_block_is_none() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "lat": 51.5, "lon": -0.12, "timezone": "Europe/London"
            })))
            .mount(&mock_server)
            .await;

        let fetcher = HttpFetcher::with_default_timeout().unwrap();
        assert!(fetch_current(&fetcher, &mock_server.uri(), "key", 51.5, -0.12)
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_fetch_current_is_not_retried() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&mock_server)
            .await;

        let fetcher = HttpFetcher::with_default_timeout().unwrap();
        assert!(fetch_current(&fetcher, &mock_server.uri(), "key", 51.5, -0.12)
            .await
            .is_none());
    }
}
