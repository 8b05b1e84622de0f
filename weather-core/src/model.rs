use uuid::Uuid;

/// Current conditions for one city, in metric units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherRecord {
    /// Degrees Celsius.
    pub temperature: f64,
    /// Relative humidity, percent.
    pub humidity: f64,
    /// Metres per second.
    pub wind_speed: f64,
}

/// One user-initiated request. The correlation id ties together every log
/// line emitted while fetching and persisting for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub city: String,
    pub correlation_id: String,
}

impl RequestContext {
    /// Start a request for `city` with a fresh random correlation id.
    pub fn new(city: impl Into<String>) -> Self {
        Self::with_correlation_id(city, Uuid::new_v4().to_string())
    }

    pub fn with_correlation_id(city: impl Into<String>, correlation_id: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            correlation_id: correlation_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_request_gets_a_distinct_correlation_id() {
        let a = RequestContext::new("London");
        let b = RequestContext::new("London");

        assert_eq!(a.city, "London");
        assert_ne!(a.correlation_id, b.correlation_id);
        assert!(Uuid::parse_str(&a.correlation_id).is_ok());
    }
}
