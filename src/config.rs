//! Application configuration
//!
//! Settings are layered, later sources overriding earlier ones:
//! 1. Built-in defaults (`Settings::default()`)
//! 2. `config/default.toml` in the working directory, if present
//! 3. A user file passed with `--config`
//! 4. Environment variables prefixed with `TOURMAP__`,
//!    e.g. `TOURMAP__API__BASE_URL` -> `api.base_url`

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::data::geo::{DEFAULT_BOUNDS, DEFAULT_CENTER};
use crate::data::{BoundingBox, Location};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub api: ApiSettings,
    pub map: MapSettings,
    pub ui: UiSettings,
    pub logging: LoggingSettings,
}

/// Listing API connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL including the version path
    pub base_url: String,
    pub api_key: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// How long a cached response stays fresh, in seconds
    pub cache_ttl_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapSettings {
    pub center: Location,
    /// Area queried for listings
    pub bounds: BoundingBox,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiSettings {
    pub results_per_page: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default filter when `RUST_LOG` is not set
    pub level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api: ApiSettings {
                base_url: "https://api.fredericksburg-tourism.com/v1".to_string(),
                api_key: String::new(),
                timeout_secs: 30,
                cache_ttl_secs: 30 * 60,
            },
            map: MapSettings {
                center: DEFAULT_CENTER,
                bounds: DEFAULT_BOUNDS,
            },
            ui: UiSettings {
                results_per_page: 10,
            },
            logging: LoggingSettings {
                level: "info".to_string(),
            },
        }
    }
}

impl Settings {
    /// Loads settings from all layers
    ///
    /// # Arguments
    /// * `path` - Optional user configuration file; it must exist when given
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(File::with_name("config/default").required(false));

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        builder
            .add_source(
                Environment::with_prefix("TOURMAP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.api.timeout_secs, 30);
        assert_eq!(settings.api.cache_ttl_secs, 1800);
        assert_eq!(settings.ui.results_per_page, 10);
        assert_eq!(settings.logging.level, "info");
        assert_eq!(settings.map.center, DEFAULT_CENTER);
    }

    #[test]
    fn test_load_without_files_yields_defaults() {
        let settings = Settings::load(None).expect("defaults should load");
        assert_eq!(settings.ui.results_per_page, 10);
        assert!(settings.api.base_url.starts_with("https://"));
    }

    #[test]
    fn test_user_file_overrides_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        writeln!(
            file,
            "[api]\nbase_url = \"http://localhost:9000/v2\"\ncache_ttl_secs = 60\n\n[ui]\nresults_per_page = 25"
        )
        .unwrap();

        let settings = Settings::load(Some(file.path())).expect("should load");

        assert_eq!(settings.api.base_url, "http://localhost:9000/v2");
        assert_eq!(settings.api.cache_ttl_secs, 60);
        assert_eq!(settings.ui.results_per_page, 25);
        // Untouched keys keep their defaults
        assert_eq!(settings.api.timeout_secs, 30);
        assert_eq!(settings.map.bounds, DEFAULT_BOUNDS);
    }

    #[test]
    fn test_missing_user_file_is_an_error() {
        let result = Settings::load(Some(Path::new("/nonexistent/tourmap.toml")));
        assert!(result.is_err());
    }
}
