//! Rendering of [`ParsedWeather`] for display.

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::{error::WeatherError, model::ParsedWeather};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Multi-line human-readable block.
    #[default]
    Text,
    /// Indented JSON, non-ASCII characters kept as-is.
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(as_json: bool) -> Self {
        if as_json { Self::Json } else { Self::Text }
    }
}

pub fn format_output(parsed: &ParsedWeather, format: OutputFormat) -> Result<String, WeatherError> {
    match format {
        OutputFormat::Text => Ok(render_text(parsed)),
        OutputFormat::Json => render_json(parsed),
    }
}

fn render_text(p: &ParsedWeather) -> String {
    format!(
        "[{}]  \n\
         {:.1}°C (Sensação: {:.1}°C)  \n\
         Umidade: {}%  |  Vento: {} m/s {}  \n\
         {}",
        p.city,
        p.temperature_c,
        p.feels_like_c,
        p.humidity_pct,
        p.wind_speed_mps,
        p.wind_cardinal,
        p.condition,
    )
}

fn render_json(p: &ParsedWeather) -> Result<String, WeatherError> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    p.serialize(&mut ser)?;
    // serde_json only ever writes valid UTF-8.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recife() -> ParsedWeather {
        ParsedWeather {
            city: "Recife".into(),
            temperature_c: 27.0,
            feels_like_c: 27.9,
            humidity_pct: 70,
            wind_speed_mps: 3.5,
            wind_cardinal: "E".into(),
            description: "Céu limpo".into(),
            condition: "☀️ Céu limpo".into(),
        }
    }

    #[test]
    fn text_template() {
        let out = format_output(&recife(), OutputFormat::Text).unwrap();
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "[Recife]  ");
        assert_eq!(lines[1], "27.0°C (Sensação: 27.9°C)  ");
        assert_eq!(lines[2], "Umidade: 70%  |  Vento: 3.5 m/s E  ");
        assert_eq!(lines[3], "☀️ Céu limpo");
    }

    #[test]
    fn json_is_indented_and_unescaped() {
        let out = format_output(&recife(), OutputFormat::Json).unwrap();

        assert!(out.starts_with("{\n    \"cidade\": \"Recife\""));
        assert!(out.contains("\"descricao\": \"Céu limpo\""));
        assert!(!out.contains("\\u"));

        let back: ParsedWeather = serde_json::from_str(&out).unwrap();
        assert_eq!(back, recife());
    }

    #[test]
    fn json_flag_selects_format() {
        assert_eq!(OutputFormat::from_json_flag(true), OutputFormat::Json);
        assert_eq!(OutputFormat::from_json_flag(false), OutputFormat::Text);
    }
}
