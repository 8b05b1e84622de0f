use thiserror::Error;

/// The one error type callers of [`crate::WeatherService`] see.
///
/// `Display` is the user-facing message; the wrapped cause chain is
/// rendered inline.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Missing setting or database initialization failure. Fatal at startup.
    #[error("{0:#}")]
    Config(anyhow::Error),

    #[error("Error fetching weather data: {0:#}")]
    Fetch(anyhow::Error),

    #[error("Failed to save data to InfluxDB: {0:#}")]
    Persist(anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn display_includes_cause_chain() {
        let cause = anyhow!("connection refused").context("Failed to send request to OpenWeather");
        let err = WeatherError::Fetch(cause);

        assert_eq!(
            err.to_string(),
            "Error fetching weather data: Failed to send request to OpenWeather: connection refused"
        );
    }

    #[test]
    fn config_errors_show_the_bare_cause() {
        let err = WeatherError::Config(anyhow!("INFLUXDB_ORG environment variable not set"));

        assert_eq!(err.to_string(), "INFLUXDB_ORG environment variable not set");
    }
}
