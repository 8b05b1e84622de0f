use crate::{RequestContext, WeatherRecord};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

pub use openweather::OpenWeatherProvider;

/// Source of current conditions for a city.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_weather(&self, ctx: &RequestContext) -> anyhow::Result<WeatherRecord>;
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_bodies_are_kept() {
        assert_eq!(truncate_body("city not found"), "city not found");
    }

    #[test]
    fn long_bodies_are_cut_on_a_char_boundary() {
        let body = format!("{}é{}", "a".repeat(199), "b".repeat(50));
        let cut = truncate_body(&body);

        assert!(cut.ends_with("..."));
        assert_eq!(cut.len(), 199 + 3);
    }
}
