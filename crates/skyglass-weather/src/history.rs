//! Year-by-year temperature history for one location.
//!
//! The series is always a prefix of the requested range: the current year
//! first, then one year back, two years back, and so on. It stops growing at
//! the first year without data; gaps are never recorded.

use serde::Serialize;
use std::future::Future;

use crate::types::TemperatureUnit;
use crate::units::to_local;

/// One row of the series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearTemperature {
    pub year: i32,
    pub temperature: i32,
}

/// Min/max/mean over the series, for trend displays
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Trend {
    pub min: i32,
    pub max: i32,
    pub mean: f64,
    /// Current year minus the oldest year in the series, saturating
    pub change: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricalSeries {
    unit: TemperatureUnit,
    entries: Vec<YearTemperature>,
}

impl HistoricalSeries {
    pub fn new(unit: TemperatureUnit) -> Self {
        Self {
            unit,
            entries: Vec::new(),
        }
    }

    pub fn unit(&self) -> TemperatureUnit {
        self.unit
    }

    pub fn entries(&self) -> &[YearTemperature] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, year: i32) -> Option<i32> {
        self.entries
            .iter()
            .find(|e| e.year == year)
            .map(|e| e.temperature)
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.entries.iter().map(|e| e.year)
    }

    /// Append a kelvin reading for `year`, converted to the series unit.
    fn push_kelvin(&mut self, year: i32, kelvin: f64) {
        self.entries.push(YearTemperature {
            year,
            temperature: to_local(kelvin, self.unit),
        });
    }

    /// Summary statistics; `None` with fewer than two entries.
    pub fn trend(&self) -> Option<Trend> {
        if self.entries.len() < 2 {
            return None;
        }

        let temps = self.entries.iter().map(|e| e.temperature);
        let min = temps.clone().min()?;
        let max = temps.clone().max()?;
        let sum: i64 = temps.map(i64::from).sum();
        let mean = sum as f64 / self.entries.len() as f64;
        // Saturated readings (see `to_local`) must not overflow
        let change = self
            .entries
            .first()?
            .temperature
            .saturating_sub(self.entries.last()?.temperature);

        Some(Trend {
            min,
            max,
            mean,
            change,
        })
    }
}

/// Build a series seeded with the current reading, then walk back one year
/// at a time, awaiting each lookup before issuing the next.
///
/// `lookup(k)` returns the kelvin reading `k` years back. The first `None`
/// ends the walk; later years are not attempted.
pub async fn build_history<F, Fut>(
    current_year: i32,
    current_kelvin: f64,
    unit: TemperatureUnit,
    history_years: u32,
    mut lookup: F,
) -> HistoricalSeries
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Option<f64>>,
{
    let mut series = HistoricalSeries::new(unit);
    if history_years == 0 {
        return series;
    }

    series.push_kelvin(current_year, current_kelvin);

    for years_back in 1..=history_years {
        let year = current_year - years_back as i32;
        match lookup(years_back).await {
            Some(kelvin) => series.push_kelvin(year, kelvin),
            None => {
                tracing::info!(
                    "No data for {}, stopping history at {} of {} years",
                    year,
                    years_back - 1,
                    history_years
                );
                break;
            }
        }
    }

    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[tokio::test]
    async fn test_zero_years_never_looks_up() {
        let calls = RefCell::new(Vec::new());
        let series = build_history(2024, 283.15, TemperatureUnit::Celsius, 0, |k| {
            calls.borrow_mut().push(k);
            async { Some(280.0) }
        })
        .await;

        assert!(series.is_empty());
        assert!(calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_full_history_in_descending_years() {
        let series = build_history(2024, 283.15, TemperatureUnit::Celsius, 3, |k| async move {
            Some(283.15 - f64::from(k))
        })
        .await;

        let years: Vec<i32> = series.years().collect();
        assert_eq!(years, vec![2024, 2023, 2022, 2021]);
        assert_eq!(series.get(2024), Some(10));
        assert_eq!(series.get(2021), Some(7));
    }

    #[tokio::test]
    async fn test_stops_at_first_miss() {
        let calls = RefCell::new(Vec::new());
        let series = build_history(2024, 283.15, TemperatureUnit::Celsius, 10, |k| {
            calls.borrow_mut().push(k);
            async move {
                if k < 3 {
                    Some(280.0)
                } else {
                    None
                }
            }
        })
        .await;

        let years: Vec<i32> = series.years().collect();
        assert_eq!(years, vec![2024, 2023, 2022]);
        assert_eq!(series.get(2021), None);
        // Years after the miss are not attempted
        assert_eq!(*calls.borrow(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_miss_on_first_year_keeps_current() {
        let series = build_history(2024, 300.0, TemperatureUnit::Fahrenheit, 5, |_| async {
            None
        })
        .await;

        assert_eq!(series.len(), 1);
        assert_eq!(
            series.entries()[0],
            YearTemperature {
                year: 2024,
                temperature: 80
            }
        );
        assert_eq!(series.unit(), TemperatureUnit::Fahrenheit);
    }

    #[test]
    fn test_trend_needs_two_entries() {
        let mut series = HistoricalSeries::new(TemperatureUnit::Celsius);
        series.push_kelvin(2024, 283.15);
        assert!(series.trend().is_none());

        series.push_kelvin(2023, 278.15);
        series.push_kelvin(2022, 288.15);
        let trend = series.trend().unwrap();
        assert_eq!(trend.min, 5);
        assert_eq!(trend.max, 15);
        assert_eq!(trend.mean, 10.0);
        assert_eq!(trend.change, -5);
    }

    #[test]
    fn test_trend_with_saturated_readings() {
        let mut series = HistoricalSeries::new(TemperatureUnit::Celsius);
        series.push_kelvin(2024, 1e300);
        series.push_kelvin(2023, -1e300);

        let trend = series.trend().unwrap();
        assert_eq!(trend.max, i32::MAX);
        assert_eq!(trend.min, i32::MIN);
        assert_eq!(trend.change, i32::MAX);
        assert_eq!(trend.mean, -0.5);

        let mut falling = HistoricalSeries::new(TemperatureUnit::Celsius);
        falling.push_kelvin(2024, -1e300);
        falling.push_kelvin(2023, 1e300);
        assert_eq!(falling.trend().unwrap().change, i32::MIN);
    }
}
