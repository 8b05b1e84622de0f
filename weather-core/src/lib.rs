//! Core library for the `weather` recorder.
//!
//! This crate defines:
//! - Configuration loading from the environment (and an optional TOML file)
//! - The OpenWeather client behind the [`WeatherProvider`] trait
//! - The InfluxDB v2 writer behind the [`TimeSeriesStore`] trait
//! - [`WeatherService`], which owns both and is the error boundary for callers
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod service;
pub mod store;

pub use config::{Config, FileConfig};
pub use error::WeatherError;
pub use model::{RequestContext, WeatherRecord};
pub use provider::{OpenWeatherProvider, WeatherProvider};
pub use service::WeatherService;
pub use store::{InfluxStore, Point, TimeSeriesStore};
