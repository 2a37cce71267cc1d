//! Unit and format converters.

const ABSOLUTE_ZERO_C: f64 = 273.15;

const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Kelvin to Celsius, rounded to one decimal place.
pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    round_to_tenth(kelvin - ABSOLUTE_ZERO_C)
}

/// Label for the 22.5° compass bucket containing `deg`.
///
/// Any real angle is accepted; negative and >= 360 values wrap around.
pub fn degrees_to_compass(deg: f64) -> &'static str {
    let bucket = ((deg + 11.25) / 22.5).floor() as i64;
    COMPASS_POINTS[bucket.rem_euclid(16) as usize]
}

/// Upper-case the first character and lower-case the rest.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}
