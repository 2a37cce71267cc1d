//! Core library for the `tempo` weather agent.
//!
//! This crate defines:
//! - Unit converters and condition classification
//! - Provider response validation and the error taxonomy
//! - A rate-limited, cached OpenWeather client
//! - The `WeatherAgent` that ties them together and renders output
//! - Configuration & credentials handling
//!
//! It is used by `tempo-cli`, but can also be reused by other binaries or services.

pub mod agent;
pub mod cache;
pub mod client;
pub mod condition;
pub mod config;
pub mod convert;
pub mod error;
pub mod format;
pub mod model;
pub mod rate_limit;
pub mod translate;
pub mod validate;

pub use agent::{AgentSettings, WeatherAgent};
pub use cache::ResponseCache;
pub use client::WeatherClient;
pub use condition::{Condition, map_condition};
pub use config::Config;
pub use convert::{degrees_to_compass, kelvin_to_celsius};
pub use error::{ErrorKind, WeatherError};
pub use format::OutputFormat;
pub use model::{FieldDefaults, ParsedWeather};
pub use rate_limit::RateLimiter;
pub use translate::{GoogleTranslator, Translator};
pub use validate::validate_response;
