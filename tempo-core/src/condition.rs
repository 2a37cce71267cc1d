//! Classification of provider condition codes into display labels.

/// Weather condition category, derived from the provider's numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    Storm,
    Drizzle,
    Rain,
    Snow,
    Mist,
    ClearSky,
    FewClouds,
    ScatteredClouds,
    BrokenClouds,
    Overcast,
    Undefined,
}

impl Condition {
    /// Total over all integers; unknown codes are [`Condition::Undefined`].
    pub fn from_code(code: i64) -> Self {
        match code {
            200..300 => Self::Storm,
            300..400 => Self::Drizzle,
            500..600 => Self::Rain,
            600..700 => Self::Snow,
            700..800 => Self::Mist,
            800 => Self::ClearSky,
            801 => Self::FewClouds,
            802 => Self::ScatteredClouds,
            803 => Self::BrokenClouds,
            804 => Self::Overcast,
            _ => Self::Undefined,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Storm => "⛈️ Tempestade",
            Self::Drizzle => "🌦️ Garoa",
            Self::Rain => "🌧️ Chuva",
            Self::Snow => "❄️ Neve",
            Self::Mist => "🌫️ Névoa",
            Self::ClearSky => "☀️ Céu limpo",
            Self::FewClouds => "⛅ Poucas nuvens",
            Self::ScatteredClouds => "🌥️ Nuvens dispersas",
            Self::BrokenClouds => "☁️ Nuvens quebradas",
            Self::Overcast => "☁️ Nublado",
            Self::Undefined => "🌈 Condição indefinida",
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Display label for a provider condition code.
pub fn map_condition(code: i64) -> &'static str {
    Condition::from_code(code).label()
}
