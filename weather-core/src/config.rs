use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const DEFAULT_INFLUXDB_URL: &str = "http://localhost:8086";
pub const DEFAULT_OPENWEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

pub const OPENWEATHER_API_KEY: &str = "OPENWEATHER_API_KEY";
pub const OPENWEATHER_URL: &str = "OPENWEATHER_URL";
pub const INFLUXDB_URL: &str = "INFLUXDB_URL";
pub const INFLUXDB_TOKEN: &str = "INFLUXDB_TOKEN";
pub const INFLUXDB_ORG: &str = "INFLUXDB_ORG";
pub const INFLUXDB_BUCKET: &str = "INFLUXDB_BUCKET";

/// Optional on-disk settings. Every key mirrors an environment variable
/// (lowercased) and is overridden by it.
///
/// Example TOML:
/// influxdb_org = "home"
/// influxdb_bucket = "weather"
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    pub openweather_api_key: Option<String>,
    pub openweather_url: Option<String>,
    pub influxdb_url: Option<String>,
    pub influxdb_token: Option<String>,
    pub influxdb_org: Option<String>,
    pub influxdb_bucket: Option<String>,
}

impl FileConfig {
    /// Read the file at `path`. A missing file is an error here; use
    /// [`FileConfig::load_default`] for the optional platform location.
    pub fn read(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load the platform config file, or return an empty default if it doesn't
    /// exist (or there is no platform config directory at all).
    pub fn load_default() -> Result<Self> {
        let Ok(path) = Self::default_path() else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Ok(Self::default());
        }

        Self::read(&path)
    }

    /// Path to the platform config file.
    pub fn default_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-recorder", "weather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    fn value(&self, name: &str) -> Option<&str> {
        match name {
            OPENWEATHER_API_KEY => self.openweather_api_key.as_deref(),
            OPENWEATHER_URL => self.openweather_url.as_deref(),
            INFLUXDB_URL => self.influxdb_url.as_deref(),
            INFLUXDB_TOKEN => self.influxdb_token.as_deref(),
            INFLUXDB_ORG => self.influxdb_org.as_deref(),
            INFLUXDB_BUCKET => self.influxdb_bucket.as_deref(),
            _ => None,
        }
    }
}

/// Process-wide settings, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_key: String,
    pub weather_url: String,
    pub influx_url: String,
    pub influx_token: String,
    pub influx_org: String,
    pub influx_bucket: String,
}

impl Config {
    /// Resolve settings from the process environment, layered over the
    /// config file at `path` (or the platform default location).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => FileConfig::read(path)?,
            None => FileConfig::load_default()?,
        };

        Self::from_sources(&file, |name| std::env::var(name).ok())
    }

    /// Resolve settings from `env` first, then `file`. Empty values count as unset.
    pub fn from_sources<F>(file: &FileConfig, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| -> Option<String> {
            env(name).filter(|v| !v.trim().is_empty()).or_else(|| {
                file.value(name)
                    .filter(|v| !v.trim().is_empty())
                    .map(str::to_owned)
            })
        };
        let required = |name: &str| -> Result<String> {
            lookup(name).ok_or_else(|| anyhow!("{name} environment variable not set"))
        };

        Ok(Self {
            api_key: required(OPENWEATHER_API_KEY)?,
            influx_token: required(INFLUXDB_TOKEN)?,
            influx_org: required(INFLUXDB_ORG)?,
            influx_bucket: required(INFLUXDB_BUCKET)?,
            influx_url: lookup(INFLUXDB_URL)
                .unwrap_or_else(|| DEFAULT_INFLUXDB_URL.to_string()),
            weather_url: lookup(OPENWEATHER_URL)
                .unwrap_or_else(|| DEFAULT_OPENWEATHER_URL.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| map.get(name).cloned()
    }

    fn full_env() -> Vec<(&'static str, &'static str)> {
        vec![
            (OPENWEATHER_API_KEY, "OPEN_KEY"),
            (INFLUXDB_TOKEN, "TOKEN"),
            (INFLUXDB_ORG, "home"),
            (INFLUXDB_BUCKET, "weather"),
        ]
    }

    #[test]
    fn loads_required_settings_and_defaults() {
        let cfg = Config::from_sources(&FileConfig::default(), env_of(&full_env()))
            .expect("complete environment must load");

        assert_eq!(cfg.api_key, "OPEN_KEY");
        assert_eq!(cfg.influx_token, "TOKEN");
        assert_eq!(cfg.influx_org, "home");
        assert_eq!(cfg.influx_bucket, "weather");
        assert_eq!(cfg.influx_url, DEFAULT_INFLUXDB_URL);
        assert_eq!(cfg.weather_url, DEFAULT_OPENWEATHER_URL);
    }

    #[test]
    fn missing_required_setting_is_named() {
        for missing in [OPENWEATHER_API_KEY, INFLUXDB_TOKEN, INFLUXDB_ORG, INFLUXDB_BUCKET] {
            let env: Vec<_> = full_env().into_iter().filter(|(k, _)| *k != missing).collect();
            let err = Config::from_sources(&FileConfig::default(), env_of(&env)).unwrap_err();

            assert_eq!(err.to_string(), format!("{missing} environment variable not set"));
        }
    }

    #[test]
    fn empty_value_counts_as_missing() {
        let env = env_of(&[
            (OPENWEATHER_API_KEY, "OPEN_KEY"),
            (INFLUXDB_TOKEN, "  "),
            (INFLUXDB_ORG, "home"),
            (INFLUXDB_BUCKET, "weather"),
        ]);

        let err = Config::from_sources(&FileConfig::default(), env).unwrap_err();
        assert!(err.to_string().contains(INFLUXDB_TOKEN));
    }

    #[test]
    fn env_overrides_file_and_file_fills_gaps() {
        let file = FileConfig {
            openweather_api_key: Some("FILE_KEY".into()),
            influxdb_url: Some("http://influx.lan:8086".into()),
            influxdb_bucket: Some("file-bucket".into()),
            ..FileConfig::default()
        };
        let env = env_of(&[
            (OPENWEATHER_API_KEY, "ENV_KEY"),
            (INFLUXDB_TOKEN, "TOKEN"),
            (INFLUXDB_ORG, "home"),
        ]);

        let cfg = Config::from_sources(&file, env).expect("layered config must load");

        assert_eq!(cfg.api_key, "ENV_KEY");
        assert_eq!(cfg.influx_bucket, "file-bucket");
        assert_eq!(cfg.influx_url, "http://influx.lan:8086");
    }

    #[test]
    fn reads_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "influxdb_org = \"home\"\ninfluxdb_bucket = \"weather\"\n").unwrap();

        let file = FileConfig::read(&path).expect("file must parse");

        assert_eq!(file.influxdb_org.as_deref(), Some("home"));
        assert_eq!(file.influxdb_bucket.as_deref(), Some("weather"));
        assert!(file.influxdb_token.is_none());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileConfig::read(&dir.path().join("absent.toml")).unwrap_err();

        assert!(err.to_string().contains("Failed to read config file"));
    }
}
