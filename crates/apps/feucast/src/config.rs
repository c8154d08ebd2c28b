use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use scene::components::Geometry;
use serde_json::Value;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_EXPORT_DIR: &str = ".";
pub const DEFAULT_HTTP_TIMEOUT_S: f64 = 60.0;
pub const DEFAULT_PLAY_SPEED: f64 = 1.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("HTTP timeout must be a positive number of seconds, got {0}")]
    Timeout(f64),

    #[error("cannot read perimeter {path}: {source}")]
    PerimeterRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("perimeter {path} is not valid JSON: {source}")]
    PerimeterJson {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("perimeter {0} holds no Polygon or MultiPolygon geometry")]
    NotAPolygon(PathBuf),
}

/// Settings shared by every subcommand.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub export_dir: PathBuf,
    pub http_timeout_s: f64,
    pub play_speed: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            export_dir: PathBuf::from(DEFAULT_EXPORT_DIR),
            http_timeout_s: DEFAULT_HTTP_TIMEOUT_S,
            play_speed: DEFAULT_PLAY_SPEED,
        }
    }
}

impl Config {
    /// Reads `FEUCAST_*` variables; unset or unparsable values keep their
    /// defaults.
    pub fn from_env() -> Self {
        Self {
            api_url: env_var_string("FEUCAST_API_URL", DEFAULT_API_URL),
            export_dir: PathBuf::from(env_var_string("FEUCAST_EXPORT_DIR", DEFAULT_EXPORT_DIR)),
            http_timeout_s: env_var_f64("FEUCAST_HTTP_TIMEOUT_S", DEFAULT_HTTP_TIMEOUT_S),
            play_speed: env_var_f64("FEUCAST_PLAY_SPEED", DEFAULT_PLAY_SPEED),
        }
    }

    pub fn http_timeout(&self) -> Result<Duration, ConfigError> {
        Duration::try_from_secs_f64(self.http_timeout_s)
            .ok()
            .filter(|d| !d.is_zero())
            .ok_or(ConfigError::Timeout(self.http_timeout_s))
    }
}

fn env_var_string(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_var_f64(key: &str, default: f64) -> f64 {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Extracts the perimeter from a GeoJSON geometry, feature, or feature
/// collection (first feature).
pub fn perimeter_from_geojson(value: &Value) -> Option<Geometry> {
    let geometry = match value.get("type").and_then(Value::as_str) {
        Some("Feature") => value.get("geometry")?,
        Some("FeatureCollection") => value.get("features")?.get(0)?.get("geometry")?,
        _ => value,
    };
    Geometry::from_geojson(geometry)
}

pub async fn load_perimeter(path: &Path) -> Result<Geometry, ConfigError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| ConfigError::PerimeterRead {
            path: path.to_path_buf(),
            source,
        })?;
    let value: Value =
        serde_json::from_slice(&bytes).map_err(|source| ConfigError::PerimeterJson {
            path: path.to_path_buf(),
            source,
        })?;
    perimeter_from_geojson(&value).ok_or_else(|| ConfigError::NotAPolygon(path.to_path_buf()))
}
