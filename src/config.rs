use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

const CONFIG_PATH_ENV_VAR: &str = "GRAFIK_CONFIG_FILE";

pub(crate) fn find_configfile_locations() -> io::Result<Vec<PathBuf>> {
    let config_env: Option<PathBuf> = env::var(CONFIG_PATH_ENV_VAR).ok().map(PathBuf::from);

    let home = dirs::home_dir().ok_or_else(|| {
        io::Error::new(io::ErrorKind::Other, "Unable to find home directory")
    })?;

    let home_config = home.join(".grafik.toml");

    let config_xdg = dirs::config_dir()
        .unwrap_or_else(|| home.join(".config"))
        .join("grafik")
        .join("config.toml");

    let mut locations = vec![config_xdg, home_config];

    if let Some(path) = config_env {
        locations.insert(0, path);
    }

    Ok(locations)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Base URL of the scheduler server.
    pub base_url: String,
    /// Browser-exported cookie file checked for the session flag.
    pub cookie_file: Option<PathBuf>,
    pub tick_rate_ms: u64,
    /// Pause between a successful submission and following its redirect.
    pub redirect_delay_ms: u64,
    /// Years offered around the current one in the year selector.
    pub year_span: u32,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            base_url: "http://127.0.0.1:8000".to_owned(),
            cookie_file: None,
            tick_rate_ms: 500,
            redirect_delay_ms: 1500,
            year_span: 2,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> io::Result<Config> {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err.to_string()))
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }

    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }
}

/// Loads the explicitly given config file, the first one found in the
/// standard locations, or the defaults when none exists.
pub fn load_suitable_config(explicit: Option<&Path>) -> io::Result<Config> {
    if let Some(path) = explicit {
        return Config::load(path);
    }

    for location in find_configfile_locations()? {
        if location.is_file() {
            log::info!("using config file {}", location.display());
            return Config::load(&location);
        }
    }

    Ok(Config::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let config: Config = toml::from_str(
            r#"
            base_url = "https://grafik.example.pl"
            cookie_file = "/tmp/cookies.txt"
            "#,
        )
        .unwrap();

        assert_eq!(config.base_url, "https://grafik.example.pl");
        assert_eq!(config.cookie_file.as_deref(), Some(Path::new("/tmp/cookies.txt")));
        assert_eq!(config.redirect_delay(), Duration::from_millis(1500));
        assert_eq!(config.tick_rate(), Duration::from_millis(500));
        assert_eq!(config.year_span, 2);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: Result<Config, _> = toml::from_str("base_urll = \"typo\"");
        assert!(result.is_err());
    }
}
