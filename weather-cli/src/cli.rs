use std::{
    io,
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{InquireError, Text};
use tracing::error;
use weather_core::{Config, WeatherError, WeatherService};

use crate::frontend::{self, Outcome};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Fetch current weather and record it in InfluxDB")]
pub struct Cli {
    /// TOML file with default settings; environment variables take precedence.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Prompt for city names until cancelled (the default).
    Interactive,

    /// Show and record the weather for one city.
    Show {
        /// City name, e.g. "New York".
        city: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        let service = match start(self.config.as_deref()).await {
            Ok(service) => service,
            Err(e) => {
                error!(error = %e, "Startup failed");
                return Err(e.into());
            }
        };

        let result = match self.command.unwrap_or(Command::Interactive) {
            Command::Interactive => interactive(&service).await.map(|()| ExitCode::SUCCESS),
            Command::Show { city } => show(&service, &city).await,
        };

        service.shutdown();
        result
    }
}

/// Resolve settings and connect. Any failure here is fatal.
async fn start(config: Option<&Path>) -> Result<WeatherService, WeatherError> {
    let config = Config::load(config).map_err(WeatherError::Config)?;
    WeatherService::connect(&config).await
}

async fn interactive(service: &WeatherService) -> anyhow::Result<()> {
    println!("Weather App");

    loop {
        let city = match Text::new("Enter city name (e.g., 'New York')").prompt() {
            Ok(city) => city,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e).context("Failed to read city name"),
        };

        frontend::submit(service, &city, &mut io::stdout().lock()).await?;
    }

    Ok(())
}

async fn show(service: &WeatherService, city: &str) -> anyhow::Result<ExitCode> {
    let outcome = frontend::submit(service, city, &mut io::stdout().lock()).await?;

    Ok(match outcome {
        outcome if outcome.is_success() => ExitCode::SUCCESS,
        Outcome::Rejected => ExitCode::from(2),
        _ => ExitCode::FAILURE,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreadable_config_file_stops_startup() {
        let missing = std::env::temp_dir().join("weather-cli-absent/config.toml");

        let err = start(Some(&missing)).await.unwrap_err();

        assert!(matches!(err, WeatherError::Config(_)));
        assert!(err.to_string().starts_with("Failed to read config file"));
    }
}
