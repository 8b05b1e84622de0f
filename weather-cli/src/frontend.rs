//! One submission of the city form: validate, fetch, render, persist.

use std::io::{self, Write};

use weather_core::{RequestContext, WeatherRecord, WeatherService};

pub const EMPTY_CITY_WARNING: &str = "Please enter a city name.";

/// How a submission ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Nothing was requested; the form stays idle.
    Rejected,
    FetchFailed,
    /// Weather was fetched and shown. `persisted` is false when the write
    /// that followed failed; the shown values stand regardless.
    Fetched { persisted: bool },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Fetched { persisted: true })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Banner {
    Success { city: String, record: WeatherRecord },
    Warning(String),
    Error(String),
}

impl Banner {
    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        match self {
            Banner::Success { city, record } => {
                writeln!(out, "Weather in {city}:")?;
                writeln!(out, "  Temperature: {} °C", record.temperature)?;
                writeln!(out, "  Wind Speed: {} m/s", record.wind_speed)?;
                writeln!(out, "  Humidity: {} %", record.humidity)
            }
            Banner::Warning(msg) => writeln!(out, "warning: {msg}"),
            Banner::Error(msg) => writeln!(out, "error: {msg}"),
        }
    }
}

/// Handle one form submission, rendering banners to `out` as soon as each
/// stage completes.
pub async fn submit(
    service: &WeatherService,
    city: &str,
    out: &mut impl Write,
) -> io::Result<Outcome> {
    let city = city.trim();
    if city.is_empty() {
        Banner::Warning(EMPTY_CITY_WARNING.to_string()).render(out)?;
        return Ok(Outcome::Rejected);
    }

    let ctx = RequestContext::new(city);

    let record = match service.fetch_weather(&ctx).await {
        Ok(record) => record,
        Err(e) => {
            Banner::Error(e.to_string()).render(out)?;
            return Ok(Outcome::FetchFailed);
        }
    };

    Banner::Success {
        city: city.to_string(),
        record,
    }
    .render(out)?;
    out.flush()?;

    let persisted = match service.persist(&record, &ctx).await {
        Ok(()) => true,
        Err(e) => {
            Banner::Error(e.to_string()).render(out)?;
            false
        }
    };

    Ok(Outcome::Fetched { persisted })
}
