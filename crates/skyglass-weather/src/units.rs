//! Kelvin to display-unit conversion.

use crate::types::TemperatureUnit;

const KELVIN_OFFSET: f64 = 273.15;

/// Convert a kelvin reading to whole degrees, truncating toward zero.
pub fn to_local(kelvin: f64, unit: TemperatureUnit) -> i32 {
    let celsius = kelvin - KELVIN_OFFSET;
    let value = match unit {
        TemperatureUnit::Celsius => celsius,
        TemperatureUnit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
    };
    // `as` truncates and saturates; NaN becomes 0
    value.trunc() as i32
}
