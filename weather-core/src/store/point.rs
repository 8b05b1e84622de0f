//! InfluxDB line protocol points.
//!
//! ```text
//! weather,city=London temperature=15.2,humidity=70,wind_speed=3.1 1700000000000000000
//! ```

use anyhow::{Result, anyhow, ensure};

use crate::WeatherRecord;

/// Measurement name every weather point is written under.
pub const WEATHER_MEASUREMENT: &str = "weather";

/// One timestamped, tagged, multi-field record.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    measurement: String,
    tags: Vec<(String, String)>,
    fields: Vec<(String, f64)>,
    timestamp_ns: i64,
}

impl Point {
    pub fn new(measurement: impl Into<String>, timestamp_ns: i64) -> Self {
        Self {
            measurement: measurement.into(),
            tags: Vec::new(),
            fields: Vec::new(),
            timestamp_ns,
        }
    }

    /// The point stored for one weather observation of `city`.
    pub fn weather(record: &WeatherRecord, city: &str, timestamp_ns: i64) -> Self {
        Self::new(WEATHER_MEASUREMENT, timestamp_ns)
            .tag("city", city)
            .field("temperature", record.temperature)
            .field("humidity", record.humidity)
            .field("wind_speed", record.wind_speed)
    }

    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.push((key.into(), value.into()));
        self
    }

    pub fn field(mut self, key: impl Into<String>, value: f64) -> Self {
        self.fields.push((key.into(), value));
        self
    }

    pub fn measurement(&self) -> &str {
        &self.measurement
    }

    pub fn tags(&self) -> &[(String, String)] {
        &self.tags
    }

    pub fn fields(&self) -> &[(String, f64)] {
        &self.fields
    }

    pub fn timestamp_ns(&self) -> i64 {
        self.timestamp_ns
    }

    /// Render as a single line-protocol line (no trailing newline).
    ///
    /// Tags are sorted by key and tags with an empty value are dropped.
    /// Fields keep insertion order; at least one finite field is required.
    /// Line breaks are rejected anywhere in a name, key or tag value, since
    /// they would split the point into several lines.
    pub fn to_line_protocol(&self) -> Result<String> {
        ensure!(
            !self.measurement.is_empty(),
            "Point has an empty measurement name"
        );
        ensure!(
            !self.fields.is_empty(),
            "Point '{}' has no fields",
            self.measurement
        );

        let mut line = escape("measurement", &self.measurement, MEASUREMENT_SPECIALS)?;

        let mut tags: Vec<_> = self.tags.iter().filter(|(_, v)| !v.is_empty()).collect();
        tags.sort_by(|a, b| a.0.cmp(&b.0));
        for (key, value) in tags {
            line.push(',');
            line.push_str(&escape("tag key", key, KEY_SPECIALS)?);
            line.push('=');
            line.push_str(&escape("tag value", value, KEY_SPECIALS)?);
        }

        for (i, (key, value)) in self.fields.iter().enumerate() {
            if !value.is_finite() {
                return Err(anyhow!("Field '{key}' has non-finite value {value}"));
            }
            line.push(if i == 0 { ' ' } else { ',' });
            line.push_str(&escape("field key", key, KEY_SPECIALS)?);
            line.push('=');
            line.push_str(&value.to_string());
        }

        line.push(' ');
        line.push_str(&self.timestamp_ns.to_string());

        Ok(line)
    }
}

const MEASUREMENT_SPECIALS: &[char] = &['\\', ',', ' '];
const KEY_SPECIALS: &[char] = &['\\', ',', '=', ' '];

fn escape(what: &str, raw: &str, specials: &[char]) -> Result<String> {
    ensure!(
        !raw.contains(['\n', '\r']),
        "Line protocol {what} {raw:?} contains a line break"
    );

    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if specials.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    Ok(out)
}
