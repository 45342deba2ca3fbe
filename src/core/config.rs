//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.presenter/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::runtime::store::DEFAULT_TRANSITION_BUFFER;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PresenterConfig {
    #[serde(default)]
    pub chain: ChainConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ChainConfig {
    /// Pause between the first grandchild closing and the second appearing.
    pub delay_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RuntimeConfig {
    pub transition_buffer: Option<usize>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LogConfig {
    pub level: Option<String>,
    pub file: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_CHAIN_DELAY_MS: u64 = 0;
pub const DEFAULT_LOG_LEVEL: &str = "debug";
pub const DEFAULT_LOG_FILE: &str = "presenter.log";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub chain_delay: Duration,
    pub transition_buffer: usize,
    pub log_level: String,
    pub log_file: PathBuf,
}

/// Values given on the command line. `None` = not specified.
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub chain_delay_ms: Option<u64>,
    pub log_level: Option<String>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.presenter/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".presenter").join("config.toml"))
}

/// Load config from `path`, or from `~/.presenter/config.toml` when `None`.
///
/// If the default file doesn't exist, generates a commented-out default and
/// returns `PresenterConfig::default()`. An explicit path that doesn't exist
/// is an I/O error. A malformed file is `ConfigError::Parse`.
pub fn load_config(path: Option<&Path>) -> Result<PresenterConfig, ConfigError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match config_path() {
            Some(p) => {
                if !p.exists() {
                    info!("No config file found, generating default at {}", p.display());
                    generate_default_config(&p);
                    return Ok(PresenterConfig::default());
                }
                p
            }
            None => {
                warn!("Could not determine home directory, using default config");
                return Ok(PresenterConfig::default());
            }
        },
    };

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config = parse_config(&contents)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

pub fn parse_config(contents: &str) -> Result<PresenterConfig, ConfigError> {
    toml::from_str(contents).map_err(ConfigError::Parse)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Presenter Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [chain]
# delay_ms = 0                 # Pause before the second grandchild appears (PRESENTER_CHAIN_DELAY_MS)

# [runtime]
# transition_buffer = 64       # Transitions a slow subscriber may lag behind

# [log]
# level = "debug"              # "error", "warn", "info", "debug", "trace" (PRESENTER_LOG_LEVEL)
# file = "presenter.log"       # (PRESENTER_LOG_FILE)
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &PresenterConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

fn resolve_with_env(
    config: &PresenterConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Chain delay: CLI → env → config → default
    let chain_delay_ms = cli
        .chain_delay_ms
        .or_else(|| {
            env("PRESENTER_CHAIN_DELAY_MS").and_then(|v| match v.trim().parse() {
                Ok(ms) => Some(ms),
                Err(e) => {
                    warn!("Ignoring PRESENTER_CHAIN_DELAY_MS={:?}: {}", v, e);
                    None
                }
            })
        })
        .or(config.chain.delay_ms)
        .unwrap_or(DEFAULT_CHAIN_DELAY_MS);

    // Log level: CLI → env → config → default
    let log_level = cli
        .log_level
        .clone()
        .or_else(|| env("PRESENTER_LOG_LEVEL"))
        .or_else(|| config.log.level.clone())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

    // Log file: env → config → default
    let log_file = env("PRESENTER_LOG_FILE")
        .or_else(|| config.log.file.clone())
        .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());

    ResolvedConfig {
        chain_delay: Duration::from_millis(chain_delay_ms),
        transition_buffer: config
            .runtime
            .transition_buffer
            .unwrap_or(DEFAULT_TRANSITION_BUFFER),
        log_level,
        log_file: PathBuf::from(log_file),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_default_config_is_empty() {
        let config = PresenterConfig::default();
        assert!(config.chain.delay_ms.is_none());
        assert!(config.log.level.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let resolved =
            resolve_with_env(&PresenterConfig::default(), &CliOverrides::default(), no_env);
        assert_eq!(resolved.chain_delay, Duration::ZERO);
        assert_eq!(resolved.transition_buffer, DEFAULT_TRANSITION_BUFFER);
        assert_eq!(resolved.log_level, "debug");
        assert_eq!(resolved.log_file, PathBuf::from("presenter.log"));
    }

    #[test]
    fn test_config_values_override_defaults() {
        let config = parse_config(
            r#"
[chain]
delay_ms = 2000

[runtime]
transition_buffer = 8

[log]
level = "info"
file = "/tmp/presenter.log"
"#,
        )
        .unwrap();
        let resolved = resolve_with_env(&config, &CliOverrides::default(), no_env);
        assert_eq!(resolved.chain_delay, Duration::from_secs(2));
        assert_eq!(resolved.transition_buffer, 8);
        assert_eq!(resolved.log_level, "info");
        assert_eq!(resolved.log_file, PathBuf::from("/tmp/presenter.log"));
    }

    #[test]
    fn test_env_beats_file_and_cli_beats_env() {
        let config = parse_config("[chain]\ndelay_ms = 10\n").unwrap();
        let env = |key: &str| (key == "PRESENTER_CHAIN_DELAY_MS").then(|| "20".to_string());

        let resolved = resolve_with_env(&config, &CliOverrides::default(), env);
        assert_eq!(resolved.chain_delay, Duration::from_millis(20));

        let cli = CliOverrides {
            chain_delay_ms: Some(30),
            ..Default::default()
        };
        let resolved = resolve_with_env(&config, &cli, env);
        assert_eq!(resolved.chain_delay, Duration::from_millis(30));
    }

    #[test]
    fn test_unparseable_env_delay_falls_through() {
        let config = parse_config("[chain]\ndelay_ms = 10\n").unwrap();
        let env = |key: &str| (key == "PRESENTER_CHAIN_DELAY_MS").then(|| "soon".to_string());
        let resolved = resolve_with_env(&config, &CliOverrides::default(), env);
        assert_eq!(resolved.chain_delay, Duration::from_millis(10));
    }

    #[test]
    fn test_sparse_toml_parses() {
        let config = parse_config("[log]\nlevel = \"warn\"\n").unwrap();
        assert_eq!(config.log.level.as_deref(), Some("warn"));
        assert!(config.chain.delay_ms.is_none());
        assert!(config.runtime.transition_buffer.is_none());
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let err = parse_config("[chain]\ndelay_ms = \"later\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("config parse error"));
    }

    #[test]
    fn test_missing_explicit_path_is_io_error() {
        let err = load_config(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
