// Configuration management
use crate::error::{Error, Result};
use crate::expiry::{LabelStyle, UnclassifiablePolicy};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const RECORDS_ENV: &str = "TENANTWATCH_RECORDS";
pub const CALENDAR_ENV: &str = "TENANTWATCH_CALENDAR";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub records: RecordsConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RecordsConfig {
    pub path: Option<String>,
}

/// Which calendar decides where a day starts and ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CalendarZone {
    #[default]
    Local,
    Utc,
}

impl std::str::FromStr for CalendarZone {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(CalendarZone::Local),
            "utc" => Ok(CalendarZone::Utc),
            other => Err(Error::Config(format!(
                "Unknown calendar zone '{}' (expected 'local' or 'utc')",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CalendarConfig {
    #[serde(default)]
    pub zone: CalendarZone,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Whether the `all` bucket lists records with an unparseable expiry date
    #[serde(default = "default_all_includes_unclassifiable")]
    pub all_includes_unclassifiable: bool,
}

fn default_all_includes_unclassifiable() -> bool {
    true
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            all_includes_unclassifiable: default_all_includes_unclassifiable(),
        }
    }
}

impl ClassifierConfig {
    pub fn policy(&self) -> UnclassifiablePolicy {
        UnclassifiablePolicy::from_include(self.all_includes_unclassifiable)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DisplayConfig {
    #[serde(default)]
    pub label_style: LabelStyle,
}

impl Config {
    /// Get the config directory path
    ///
    /// Priority:
    /// 1. XDG_CONFIG_HOME/tenantwatch (if env var is set)
    /// 2. ~/.config/tenantwatch (if ~/.config exists)
    /// 3. ~/.tenantwatch (fallback on Unix, doesn't create ~/.config)
    /// 4. Platform default on Windows
    pub fn config_dir() -> Result<PathBuf> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            return Ok(PathBuf::from(xdg_config).join("tenantwatch"));
        }

        #[cfg(unix)]
        {
            if let Some(home_dir) = dirs::home_dir() {
                let xdg_config = home_dir.join(".config");

                if xdg_config.exists() {
                    return Ok(xdg_config.join("tenantwatch"));
                }

                return Ok(home_dir.join(".tenantwatch"));
            }
        }

        #[cfg(not(unix))]
        {
            if let Some(config_dir) = dirs::config_dir() {
                return Ok(config_dir.join("tenantwatch"));
            }
        }

        Err(Error::Config(
            "Could not determine config directory".to_string(),
        ))
    }

    /// Get the config file path
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from file, environment variables, and defaults
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_file_path()?)?;
        config.apply_env()?;
        Ok(config)
    }

    /// Load configuration from a specific file, falling back to defaults when absent
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                config_path.display()
            );
            return Ok(Config::default());
        }

        tracing::debug!("Loading config from: {}", config_path.display());
        let contents = fs::read_to_string(config_path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Override with environment variables if set
    fn apply_env(&mut self) -> Result<()> {
        if let Ok(path) = std::env::var(RECORDS_ENV) {
            tracing::debug!("Using {} from environment: {}", RECORDS_ENV, path);
            self.records.path = Some(path);
        }

        if let Ok(zone) = std::env::var(CALENDAR_ENV) {
            tracing::debug!("Using {} from environment: {}", CALENDAR_ENV, zone);
            self.calendar.zone = zone.parse()?;
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(config_dir) = config_path.parent() {
            if !config_dir.exists() {
                fs::create_dir_all(config_dir).map_err(|e| {
                    Error::Config(format!("Failed to create config directory: {}", e))
                })?;
                tracing::info!("Created config directory: {}", config_dir.display());
            }
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(config_path, toml_string)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

        tracing::info!("Saved config to: {}", config_path.display());
        Ok(())
    }

    /// Create a sample config file with comments
    pub fn create_sample() -> Result<PathBuf> {
        let config_path = Self::config_file_path()?;
        Self::create_sample_at(&config_path)?;
        Ok(config_path)
    }

    pub fn create_sample_at(config_path: &Path) -> Result<()> {
        if let Some(config_dir) = config_path.parent() {
            if !config_dir.exists() {
                fs::create_dir_all(config_dir).map_err(|e| {
                    Error::Config(format!("Failed to create config directory: {}", e))
                })?;
            }
        }

        // Don't overwrite existing config
        if config_path.exists() {
            return Err(Error::Config(format!(
                "Config file already exists at: {}",
                config_path.display()
            )));
        }

        fs::write(config_path, SAMPLE_CONFIG)
            .map_err(|e| Error::Config(format!("Failed to write sample config: {}", e)))?;

        Ok(())
    }

    /// Resolve the records file: CLI argument, then environment/config file
    pub fn records_path(&self, records_arg: Option<String>) -> Result<String> {
        records_arg
            .or_else(|| self.records.path.clone().filter(|path| !path.trim().is_empty()))
            .ok_or_else(|| {
                Error::Config(format!(
                    "Records file not configured. Provide --records, set {}, or set [records] path in the config file",
                    RECORDS_ENV
                ))
            })
    }
}

const SAMPLE_CONFIG: &str = r#"# tenantwatch configuration
# Location priority:
#   1. $XDG_CONFIG_HOME/tenantwatch/config.toml (if XDG_CONFIG_HOME is set)
#   2. ~/.config/tenantwatch/config.toml (if ~/.config exists)
#   3. ~/.tenantwatch/config.toml (fallback)
#
# You can also set these values via environment variables:
#   TENANTWATCH_RECORDS
#   TENANTWATCH_CALENDAR

[records]
# JSON snapshot of the backend's /users response ("-" reads stdin)
# Example: path = "/home/me/users.json"
path = ""

[calendar]
# Calendar used to decide day boundaries: "local" or "utc" (default: local)
zone = "local"

[classifier]
# Whether the "all" bucket lists records whose expiry date cannot be parsed
all_includes_unclassifiable = true

[display]
# Relative label style: "full" ("Expires in 4 days") or "compact" ("4 days left")
label_style = "full"
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.calendar.zone, CalendarZone::Local);
        assert!(config.classifier.all_includes_unclassifiable);
        assert_eq!(config.classifier.policy(), UnclassifiablePolicy::Include);
        assert_eq!(config.display.label_style, LabelStyle::Full);
        assert!(config.records.path.is_none());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load_from(&temp_dir.path().join("config.toml")).unwrap();
        assert!(config.classifier.all_includes_unclassifiable);
    }

    #[test]
    fn test_sample_config_parses() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        Config::create_sample_at(&path).unwrap();
        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.records.path.as_deref(), Some(""));
        assert_eq!(config.calendar.zone, CalendarZone::Local);
        assert_eq!(config.display.label_style, LabelStyle::Full);

        let err = Config::create_sample_at(&path).unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("already exists")));
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.records.path = Some("/srv/users.json".to_string());
        config.calendar.zone = CalendarZone::Utc;
        config.classifier.all_includes_unclassifiable = false;
        config.display.label_style = LabelStyle::Compact;
        config.save_to(&path).unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.records.path.as_deref(), Some("/srv/users.json"));
        assert_eq!(reloaded.calendar.zone, CalendarZone::Utc);
        assert_eq!(reloaded.classifier.policy(), UnclassifiablePolicy::Exclude);
        assert_eq!(reloaded.display.label_style, LabelStyle::Compact);
    }

    #[test]
    fn test_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[calendar]\nzone = \"utc\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.calendar.zone, CalendarZone::Utc);
        assert!(config.classifier.all_includes_unclassifiable);
    }

    #[test]
    fn test_invalid_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[calendar]\nzone = \"mars\"\n").unwrap();

        assert!(matches!(Config::load_from(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_records_path_resolution() {
        let mut config = Config::default();
        assert!(config.records_path(None).is_err());

        config.records.path = Some("  ".to_string());
        assert!(config.records_path(None).is_err());

        config.records.path = Some("/srv/users.json".to_string());
        assert_eq!(config.records_path(None).unwrap(), "/srv/users.json");
        assert_eq!(
            config.records_path(Some("-".to_string())).unwrap(),
            "-"
        );
    }

    #[test]
    fn test_calendar_zone_parse() {
        assert_eq!("UTC".parse::<CalendarZone>().unwrap(), CalendarZone::Utc);
        assert_eq!(" local".parse::<CalendarZone>().unwrap(), CalendarZone::Local);
        assert!("mars".parse::<CalendarZone>().is_err());
    }
}
