use chrono::Utc;
use tracing::{debug, error, info};

use crate::{
    Config, RequestContext, WeatherError, WeatherRecord,
    provider::{OpenWeatherProvider, WeatherProvider},
    store::{InfluxStore, Point, TimeSeriesStore, ensure_bucket},
};

/// Live handles to the weather API and the time-series store.
///
/// Construct once with [`WeatherService::connect`], pass by reference to the
/// frontend, and call [`WeatherService::shutdown`] when done.
#[derive(Debug)]
pub struct WeatherService {
    provider: Box<dyn WeatherProvider>,
    store: Box<dyn TimeSeriesStore>,
}

impl WeatherService {
    /// Build the OpenWeather and InfluxDB clients from `config` and make sure
    /// the target bucket exists.
    pub async fn connect(config: &Config) -> Result<Self, WeatherError> {
        let provider = OpenWeatherProvider::from_config(config).map_err(WeatherError::Config)?;
        let store = InfluxStore::from_config(config).map_err(WeatherError::Config)?;

        Self::with_parts(Box::new(provider), Box::new(store)).await
    }

    pub async fn with_parts(
        provider: Box<dyn WeatherProvider>,
        store: Box<dyn TimeSeriesStore>,
    ) -> Result<Self, WeatherError> {
        let bucket = store.bucket().to_string();

        match ensure_bucket(store.as_ref()).await {
            Ok(created) => {
                if created {
                    info!(bucket = %bucket, "Created InfluxDB bucket");
                }
                info!(bucket = %bucket, "Connected to InfluxDB");
            }
            Err(e) => {
                error!(
                    bucket = %bucket,
                    error = %format!("{e:#}"),
                    "Failed to connect to InfluxDB"
                );
                return Err(WeatherError::Config(e.context("Failed to connect to InfluxDB")));
            }
        }

        Ok(Self { provider, store })
    }

    pub async fn fetch_weather(
        &self,
        ctx: &RequestContext,
    ) -> Result<WeatherRecord, WeatherError> {
        debug!(
            city = %ctx.city,
            correlation_id = %ctx.correlation_id,
            "Starting weather data fetch"
        );

        match self.provider.fetch_weather(ctx).await {
            Ok(record) => {
                info!(
                    city = %ctx.city,
                    correlation_id = %ctx.correlation_id,
                    temperature = record.temperature,
                    humidity = record.humidity,
                    wind_speed = record.wind_speed,
                    "Successfully fetched weather data"
                );
                Ok(record)
            }
            Err(e) => {
                error!(
                    city = %ctx.city,
                    correlation_id = %ctx.correlation_id,
                    error = %format!("{e:#}"),
                    "Failed to fetch weather data"
                );
                Err(WeatherError::Fetch(e))
            }
        }
    }

    /// Write `record` as one point stamped with the current time.
    pub async fn persist(
        &self,
        record: &WeatherRecord,
        ctx: &RequestContext,
    ) -> Result<(), WeatherError> {
        debug!(
            city = %ctx.city,
            correlation_id = %ctx.correlation_id,
            "Saving data to InfluxDB"
        );

        let result = match now_ns() {
            Ok(ts) => {
                let point = Point::weather(record, &ctx.city, ts);
                self.store.write_point(&point).await
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                info!(
                    city = %ctx.city,
                    correlation_id = %ctx.correlation_id,
                    bucket = %self.store.bucket(),
                    "Successfully saved data to InfluxDB"
                );
                Ok(())
            }
            Err(e) => {
                error!(
                    city = %ctx.city,
                    correlation_id = %ctx.correlation_id,
                    error = %format!("{e:#}"),
                    "Failed to save data to InfluxDB"
                );
                Err(WeatherError::Persist(e))
            }
        }
    }

    /// Drop both HTTP clients. Pooled connections close with them.
    pub fn shutdown(self) {
        info!(bucket = %self.store.bucket(), "Releasing InfluxDB and OpenWeather clients");
    }
}

fn now_ns() -> anyhow::Result<i64> {
    Utc::now()
        .timestamp_nanos_opt()
        .ok_or_else(|| anyhow::anyhow!("Current time is outside the nanosecond timestamp range"))
}
