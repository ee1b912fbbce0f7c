//! Temperature conversion for display.

use crate::types::TemperatureUnit;

/// Round half-up, so 0.5 becomes 1 and -0.5 becomes 0.
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Convert a Fahrenheit reading to the display unit, rounded to an integer.
pub fn to_display_temperature(fahrenheit: f64, unit: TemperatureUnit) -> i64 {
    match unit {
        TemperatureUnit::Celsius => round_half_up((fahrenheit - 32.0) * 5.0 / 9.0),
        TemperatureUnit::Fahrenheit => round_half_up(fahrenheit),
    }
}

/// Celsius reading normalized to Fahrenheit
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_freezing_and_boiling_points() {
        assert_eq!(to_display_temperature(32.0, TemperatureUnit::Celsius), 0);
        assert_eq!(to_display_temperature(212.0, TemperatureUnit::Celsius), 100);
    }

    #[test]
    fn test_fahrenheit_rounds() {
        assert_eq!(to_display_temperature(71.4, TemperatureUnit::Fahrenheit), 71);
        assert_eq!(to_display_temperature(71.5, TemperatureUnit::Fahrenheit), 72);
        assert_eq!(to_display_temperature(-3.5, TemperatureUnit::Fahrenheit), -3);
    }

    #[test]
    fn test_celsius_negative() {
        // (-40 - 32) * 5/9 = -40
        assert_eq!(to_display_temperature(-40.0, TemperatureUnit::Celsius), -40);
        // (0 - 32) * 5/9 = -17.78
        assert_eq!(to_display_temperature(0.0, TemperatureUnit::Celsius), -18);
    }

    #[test]
    fn test_celsius_to_fahrenheit() {
        assert_eq!(celsius_to_fahrenheit(100.0), 212.0);
        assert_eq!(celsius_to_fahrenheit(-40.0), -40.0);
    }

    proptest! {
        #[test]
        fn fahrenheit_display_is_nearest_integer(f in -200.0f64..200.0) {
            let shown = to_display_temperature(f, TemperatureUnit::Fahrenheit) as f64;
            prop_assert!((shown - f).abs() <= 0.5);
        }

        #[test]
        fn celsius_display_is_nearest_integer(f in -200.0f64..200.0) {
            let exact = (f - 32.0) * 5.0 / 9.0;
            let shown = to_display_temperature(f, TemperatureUnit::Celsius) as f64;
            prop_assert!((shown - exact).abs() <= 0.5 + 1e-9);
        }
    }
}
