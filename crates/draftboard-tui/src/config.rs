// Configuration loading and parsing (draftboard.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

/// Name of the single config file under `config/`.
pub const CONFIG_FILE: &str = "draftboard.toml";

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub draft: DraftConfig,
    pub timer: TimerConfig,
    pub notice: NoticeConfig,
    pub export: ExportConfig,
    /// Directory relative paths in the config resolve against.
    pub base_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            draft: DraftConfig::default(),
            timer: TimerConfig::default(),
            notice: NoticeConfig::default(),
            export: ExportConfig::default(),
            base_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Resolve a path from the config file against `base_dir`. Absolute
    /// paths pass through unchanged.
    pub fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

// ---------------------------------------------------------------------------
// draftboard.toml structs
// ---------------------------------------------------------------------------

/// On-disk shape of draftboard.toml. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    draft: DraftConfig,
    timer: TimerConfig,
    notice: NoticeConfig,
    export: ExportConfig,
}

/// Optional name lists loaded when the session starts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DraftConfig {
    pub players_file: Option<String>,
    pub coaches_file: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    pub enabled: bool,
    pub turn_seconds: u64,
}

impl Default for TimerConfig {
    fn default() -> Self {
        TimerConfig {
            enabled: true,
            turn_seconds: 60,
        }
    }
}

impl TimerConfig {
    pub fn turn_duration(&self) -> Duration {
        Duration::from_secs(self.turn_seconds)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NoticeConfig {
    pub ttl_secs: u64,
}

impl Default for NoticeConfig {
    fn default() -> Self {
        NoticeConfig { ttl_secs: 3 }
    }
}

impl NoticeConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub available_path: String,
    pub board_path: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            available_path: "exports/available-players.txt".into(),
            board_path: "exports/draft-board.json".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/draftboard.toml` relative to
/// the given `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy defaults.
/// Prefer `load_config()` which handles default initialization automatically.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let file: ConfigFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    let config = Config {
        draft: file.draft,
        timer: file.timer,
        notice: file.notice,
        export: file.export,
        base_dir: base_dir.to_path_buf(),
    };

    validate(&config)?;

    Ok(config)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the crate directory or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    let mut copied = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }

        let target = config_dir.join(file_name);
        if copy_if_missing(&path, &target)? {
            copied.push(target);
        }
    }

    Ok(copied)
}

/// Convenience wrapper: loads config relative to the current working directory.
/// Ensures default config files are copied before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

/// Copy `source` to `target` unless `target` already exists. Returns whether
/// a copy happened.
fn copy_if_missing(source: &Path, target: &Path) -> Result<bool, ConfigError> {
    let mut dest = match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(target)
    {
        Ok(dest) => dest,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => {
            return Err(ConfigError::DefaultsCopyError {
                message: format!("failed to create {}: {e}", target.display()),
            })
        }
    };

    let content = std::fs::read(source).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read {}: {e}", source.display()),
    })?;
    std::io::Write::write_all(&mut dest, &content).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to write {}: {e}", target.display()),
    })?;
    Ok(true)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.timer.turn_seconds == 0 {
        return Err(ConfigError::ValidationError {
            field: "timer.turn_seconds".into(),
            message: "must be greater than 0".into(),
        });
    }

    if config.notice.ttl_secs == 0 {
        return Err(ConfigError::ValidationError {
            field: "notice.ttl_secs".into(),
            message: "must be greater than 0".into(),
        });
    }

    let paths: &[(&str, &str)] = &[
        ("export.available_path", config.export.available_path.as_str()),
        ("export.board_path", config.export.board_path.as_str()),
    ];
    for (name, val) in paths {
        if val.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must not be empty".into(),
            });
        }
    }

    let lists: &[(&str, &Option<String>)] = &[
        ("draft.players_file", &config.draft.players_file),
        ("draft.coaches_file", &config.draft.coaches_file),
    ];
    for (name, val) in lists {
        if val.as_deref().is_some_and(|v| v.trim().is_empty()) {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must not be empty when set".into(),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
