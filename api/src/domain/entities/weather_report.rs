//! Successful lookup payload

use serde::{Serialize, Serializer};

use super::{CityName, Temperature};

/// City plus current temperature, as returned to callers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    pub city: CityName,
    #[serde(rename = "temp_C", serialize_with = "serialize_reading")]
    pub temp_c: f64,
    #[serde(rename = "temp_F", serialize_with = "serialize_reading")]
    pub temp_f: f64,
    #[serde(rename = "temp_K", serialize_with = "serialize_reading")]
    pub temp_k: f64,
}

impl WeatherReport {
    pub fn new(city: CityName, temperature: Temperature) -> Self {
        Self {
            city,
            temp_c: temperature.celsius,
            temp_f: temperature.fahrenheit,
            temp_k: temperature.kelvin,
        }
    }
}

/// Whole readings are written without a fractional part (`25`, not `25.0`).
fn serialize_reading<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0; // 2^53

    if value.fract() == 0.0 && value.abs() < MAX_EXACT {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_rio_payload_exactly() {
        let report = WeatherReport::new(
            CityName::new("Rio de Janeiro").unwrap(),
            Temperature::from_readings(25.0, None),
        );

        assert_eq!(
            serde_json::to_string(&report).unwrap(),
            r#"{"city":"Rio de Janeiro","temp_C":25,"temp_F":77,"temp_K":298.15}"#
        );
    }

    #[test]
    fn keeps_fractional_readings() {
        let report = WeatherReport::new(
            CityName::new("Curitiba").unwrap(),
            Temperature::from_readings(-1.5, None),
        );

        assert_eq!(
            serde_json::to_string(&report).unwrap(),
            r#"{"city":"Curitiba","temp_C":-1.5,"temp_F":29.3,"temp_K":271.65}"#
        );
    }
}
