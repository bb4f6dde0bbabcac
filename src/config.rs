//! Configuration module

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;

/// Wallpaper used when `BACKGROUND_IMAGE_URL` is not set
pub const DEFAULT_BACKGROUND_IMAGE_URL: &str =
    "https://wallpapersmug.com/download/1366x768/46b360/lake-night-huts-lanterns.jpg";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address
    pub host: IpAddr,

    /// Server port
    pub port: u16,

    /// Serialized regression model (`.onnx` or `.json`)
    pub model_path: PathBuf,

    /// Reload the model file before every prediction
    pub reload_model_per_request: bool,

    /// Page background image
    pub background_image_url: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(IpAddr::from([0, 0, 0, 0])),

            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8501),

            model_path: env::var("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("models/energy_model.json")),

            reload_model_per_request: env::var("RELOAD_MODEL_PER_REQUEST")
                .ok()
                .and_then(|v| parse_flag(&v))
                .unwrap_or(false),

            background_image_url: env::var("BACKGROUND_IMAGE_URL")
                .unwrap_or_else(|_| DEFAULT_BACKGROUND_IMAGE_URL.to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: 8501,
            model_path: PathBuf::from("models/energy_model.json"),
            reload_model_per_request: false,
            background_image_url: DEFAULT_BACKGROUND_IMAGE_URL.to_string(),
        }
    }
}

/// Parse a boolean-ish environment value
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("true"), Some(true));
        assert_eq!(parse_flag(" ON "), Some(true));
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag("no"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, 8501);
        assert!(!config.reload_model_per_request);
        assert_eq!(config.model_path, PathBuf::from("models/energy_model.json"));
    }

    #[test]
    fn test_default_model_ships_with_repo() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join(Config::default().model_path);
        assert!(path.exists(), "missing {}", path.display());
    }
}
