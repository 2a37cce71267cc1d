//! Error taxonomy for the weather pipeline.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WeatherError {
    /// The provider does not know the requested city.
    #[error("❌ Cidade não encontrada")]
    NotFound,

    /// Provider-side failure other than not-found (invalid key, quota, ...).
    #[error("❌ Erro da API OpenWeather: {message}")]
    Provider { message: String },

    /// HTTP status or network-level failure.
    #[error("❌ Erro na requisição{}: {message}", status_suffix(.status))]
    Transport { status: Option<u16>, message: String },

    #[error("❌ Falha na tradução: {0}")]
    Translation(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Failed to render output: {0}")]
    Render(#[from] serde_json::Error),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

/// Discriminant of [`WeatherError`], for callers that branch on the failure kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Provider,
    Transport,
    Translation,
    Cache,
    Render,
}

impl WeatherError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound => ErrorKind::NotFound,
            Self::Provider { .. } => ErrorKind::Provider,
            Self::Transport { .. } => ErrorKind::Transport,
            Self::Translation(_) => ErrorKind::Translation,
            Self::Cache(_) => ErrorKind::Cache,
            Self::Render(_) => ErrorKind::Render,
        }
    }

    pub fn transport(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Transport {
            status,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        Self::transport(err.status().map(|s| s.as_u16()), err.to_string())
    }
}
