//! Weather lookups for Skyglass
//!
//! Resolves a place name through OpenWeatherMap geocoding, fetches current
//! conditions from the One Call API, and walks back through same-day history
//! until the first year without data.

pub mod current;
pub mod favorites;
pub mod fetch;
pub mod geocode;
pub mod historical;
pub mod history;
pub mod local_time;
pub mod provider;
pub mod report;
pub mod types;
pub mod units;

pub use favorites::{load_favorites, parse_favorites, Favorite, FavoritesError};
pub use fetch::HttpFetcher;
pub use history::{HistoricalSeries, Trend, YearTemperature};
pub use local_time::format_local;
pub use provider::{Endpoints, WeatherProvider};
pub use report::WeatherReport;
pub use types::*;
pub use units::to_local;
