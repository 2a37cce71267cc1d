use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    condition::map_condition,
    convert::{capitalize, degrees_to_compass, kelvin_to_celsius},
};

/// Values used when a field is absent from the provider response or has an
/// unexpected JSON type. An empty `weather` list counts as absent.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefaults {
    /// `name`.
    pub city: String,
    /// `main.temp`, in Kelvin.
    pub temperature_k: f64,
    /// `main.feels_like`, in Kelvin.
    pub feels_like_k: f64,
    /// `main.humidity`, percent.
    pub humidity: i64,
    /// `wind.speed`, m/s.
    pub wind_speed: f64,
    /// `wind.deg`.
    pub wind_deg: f64,
    /// `weather[0].description`.
    pub description: String,
    /// `weather[0].id`.
    pub condition_id: i64,
}

impl Default for FieldDefaults {
    fn default() -> Self {
        Self {
            city: String::new(),
            temperature_k: 0.0,
            feels_like_k: 0.0,
            humidity: 0,
            wind_speed: 0.0,
            wind_deg: 0.0,
            description: String::new(),
            condition_id: 0,
        }
    }
}

/// Normalized current weather for one city.
///
/// Serialized field names and order are part of the JSON output format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedWeather {
    #[serde(rename = "cidade")]
    pub city: String,
    #[serde(rename = "temperatura")]
    pub temperature_c: f64,
    #[serde(rename = "sensacao")]
    pub feels_like_c: f64,
    #[serde(rename = "umidade")]
    pub humidity_pct: i64,
    #[serde(rename = "vento")]
    pub wind_speed_mps: f64,
    pub wind_cardinal: String,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "condicao")]
    pub condition: String,
}

impl ParsedWeather {
    /// Build from a response body that already passed
    /// [`validate_response`](crate::validate::validate_response).
    pub(crate) fn from_validated(raw: &Value, defaults: &FieldDefaults) -> Self {
        let main = raw.get("main");
        let wind = raw.get("wind");
        let weather = raw
            .get("weather")
            .and_then(Value::as_array)
            .and_then(|list| list.first());

        let city = str_field(Some(raw), "name").unwrap_or(&defaults.city);
        let temp = f64_field(main, "temp").unwrap_or(defaults.temperature_k);
        let feels_like = f64_field(main, "feels_like").unwrap_or(defaults.feels_like_k);
        let humidity = i64_field(main, "humidity").unwrap_or(defaults.humidity);
        let speed = f64_field(wind, "speed").unwrap_or(defaults.wind_speed);
        let deg = f64_field(wind, "deg").unwrap_or(defaults.wind_deg);
        let description = str_field(weather, "description").unwrap_or(&defaults.description);
        let condition_id = i64_field(weather, "id").unwrap_or(defaults.condition_id);

        Self {
            city: city.to_string(),
            temperature_c: kelvin_to_celsius(temp),
            feels_like_c: kelvin_to_celsius(feels_like),
            humidity_pct: humidity,
            wind_speed_mps: speed,
            wind_cardinal: degrees_to_compass(deg).to_string(),
            description: capitalize(description),
            condition: map_condition(condition_id).to_string(),
        }
    }
}

fn f64_field(obj: Option<&Value>, key: &str) -> Option<f64> {
    obj?.get(key)?.as_f64()
}

fn i64_field(obj: Option<&Value>, key: &str) -> Option<i64> {
    let value = obj?.get(key)?;
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f.round() as i64))
}

fn str_field<'a>(obj: Option<&'a Value>, key: &str) -> Option<&'a str> {
    obj?.get(key)?.as_str()
}
