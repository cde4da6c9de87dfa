use crate::domain::error::{Result, ZeiError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSettings {
    #[serde(default = "default_level")]
    pub level: String, // "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_true")]
    pub file_logging_enabled: bool,
    #[serde(default = "default_true")]
    pub console_logging_enabled: bool,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    #[serde(default = "default_prefix")]
    pub file_name_prefix: String,
    #[serde(default = "default_false")]
    pub show_file_line: bool,
    #[serde(default = "default_false")]
    pub show_thread_ids: bool,
    #[serde(default = "default_true")]
    pub show_target: bool,
    #[serde(default = "default_true")]
    pub ansi_colors: bool,
    #[serde(default = "default_rotation")]
    pub rotation: String, // "daily", "hourly", "minutely", "never"
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_level(),
            file_logging_enabled: default_true(),
            console_logging_enabled: default_true(),
            log_dir: default_log_dir(),
            file_name_prefix: default_prefix(),
            show_file_line: default_false(),
            show_thread_ids: default_false(),
            show_target: default_true(),
            ansi_colors: default_true(),
            rotation: default_rotation(),
        }
    }
}

impl LogSettings {
    /// Console-only, quiet logging for one-shot commands
    pub fn cli() -> Self {
        Self {
            level: "warn".to_string(),
            file_logging_enabled: false,
            show_target: false,
            ..Self::default()
        }
    }

    /// Same as the default, with a different log file prefix
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            file_name_prefix: prefix.to_string(),
            ..Self::default()
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}
fn default_true() -> bool {
    true
}
fn default_false() -> bool {
    false
}
fn default_log_dir() -> String {
    dirs::cache_dir()
        .map(|dir| dir.join("zei").join("logs").to_string_lossy().into_owned())
        .unwrap_or_else(|| "logs".to_string())
}
fn default_prefix() -> String {
    "zeid".to_string()
}
fn default_rotation() -> String {
    "daily".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    // Remote API credentials
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub api_secret: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_api_timeout_secs")]
    pub api_timeout_secs: u64,

    // Device selection
    #[serde(default)]
    pub serial_number: Option<String>,

    // Notifications
    #[serde(default = "default_true")]
    pub notifications_enabled: bool,
    #[serde(default = "default_false")]
    pub show_side: bool,

    // Local RPC
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    // Logging Settings
    #[serde(default)]
    pub log_settings: LogSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_secret: String::new(),
            api_base_url: default_api_base_url(),
            api_timeout_secs: default_api_timeout_secs(),
            serial_number: None,
            notifications_enabled: true,
            show_side: false,
            listen_addr: default_listen_addr(),
            log_settings: LogSettings::default(),
        }
    }
}

impl Settings {
    /// Credentials must be present before the daemon can sign in
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(ZeiError::Config("missing API key".to_string()));
        }
        if self.api_secret.trim().is_empty() {
            return Err(ZeiError::Config("missing API secret".to_string()));
        }
        Ok(())
    }

    /// The listen address with Go-style ":PORT" expanded to loopback
    pub fn resolved_listen_addr(&self) -> String {
        resolve_listen_addr(&self.listen_addr)
    }
}

pub fn resolve_listen_addr(addr: &str) -> String {
    match addr.strip_prefix(':') {
        Some(port) => format!("127.0.0.1:{}", port),
        None => addr.to_string(),
    }
}

fn default_api_base_url() -> String {
    "https://api.timeular.com/api/v2".to_string()
}
fn default_api_timeout_secs() -> u64 {
    30
}
fn default_listen_addr() -> String {
    "127.0.0.1:8594".to_string()
}

pub struct SettingsService {
    settings: Settings,
}

impl SettingsService {
    /// Load from the user config directory. A missing file means defaults;
    /// a file that exists but cannot be read or parsed is an error.
    pub fn new() -> Result<Self> {
        let path = Self::default_settings_path()?;
        if !path.exists() {
            return Ok(Self {
                settings: Settings::default(),
            });
        }
        Self::with_path(&path)
    }

    /// Load from an explicitly given path, which must exist and parse
    pub fn with_path(settings_path: &Path) -> Result<Self> {
        Ok(Self {
            settings: Self::load_from_file(settings_path)?,
        })
    }

    pub fn default_settings_path() -> Result<PathBuf> {
        let mut path = dirs::config_dir()
            .ok_or_else(|| ZeiError::Config("could not determine config directory".to_string()))?;
        path.push("zei");
        path.push("settings.json");
        Ok(path)
    }

    fn load_from_file(path: &Path) -> Result<Settings> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ZeiError::Config(format!("read {}: {}", path.display(), e)))?;
        serde_json::from_str(&contents)
            .map_err(|e| ZeiError::Config(format!("parse {}: {}", path.display(), e)))
    }

    pub fn into_settings(self) -> Settings {
        self.settings
    }
}
