//! Configuration file management for dogflow.
//!
//! Provides a TOML-based config file at `~/.config/dogflow/config.toml` and a
//! resolution chain: CLI flag > env var > config file > default.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use dogflow_db::config::StoreConfig;

/// Currency symbol used when nothing else is configured.
pub const DEFAULT_CURRENCY: &str = "R$";

/// Env var overriding the currency symbol.
pub const CURRENCY_ENV_VAR: &str = "DOGFLOW_CURRENCY";

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub store: StoreSection,
    #[serde(default)]
    pub display: DisplaySection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StoreSection {
    /// Path of the JSON data file.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DisplaySection {
    pub currency_symbol: Option<String>,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the dogflow config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/dogflow` or `~/.config/dogflow`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("dogflow");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("dogflow")
}

/// Return the path to the dogflow config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. Returns an error if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    load_config_from(&config_path())
}

fn load_config_from(path: &Path) -> Result<ConfigFile> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents).context("failed to parse config file")?;
    Ok(config)
}

/// Serialize and write the config file, creating parent dirs as needed.
/// Sets file permissions to 0600 on Unix.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    save_config_to(config, &config_path())
}

fn save_config_to(config: &ConfigFile, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create config directory {}", dir.display()))?;
    }

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct DogflowConfig {
    pub store_config: StoreConfig,
    pub currency_symbol: String,
}

impl DogflowConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - Store path: `cli_db_path` > `DOGFLOW_DB_PATH` env > `store.path` > `<data dir>/dogflow/dogflow_db.json`
    /// - Currency: `DOGFLOW_CURRENCY` env > `display.currency_symbol` > `R$`
    ///
    /// A missing config file is not an error; an unreadable one is.
    pub fn resolve(cli_db_path: Option<&Path>) -> Result<Self> {
        let path = config_path();
        let file_config = if path.exists() {
            Some(load_config_from(&path)?)
        } else {
            None
        };

        let store_path = if let Some(p) = cli_db_path {
            p.to_path_buf()
        } else if let Some(p) = std::env::var_os(StoreConfig::ENV_VAR) {
            PathBuf::from(p)
        } else if let Some(p) = file_config.as_ref().and_then(|c| c.store.path.clone()) {
            p
        } else {
            StoreConfig::default_path()
        };

        let currency_symbol = if let Ok(symbol) = std::env::var(CURRENCY_ENV_VAR) {
            symbol
        } else if let Some(symbol) = file_config
            .as_ref()
            .and_then(|c| c.display.currency_symbol.clone())
        {
            symbol
        } else {
            DEFAULT_CURRENCY.to_string()
        };

        Ok(Self {
            store_config: StoreConfig::new(store_path),
            currency_symbol,
        })
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn lock_env() -> std::sync::MutexGuard<'static, ()> {
        crate::test_util::lock_env()
    }

    /// Point `XDG_CONFIG_HOME` at a fresh temp dir and clear the dogflow env
    /// vars for the duration of `f`.
    fn with_clean_env<T>(f: impl FnOnce(&Path) -> T) -> T {
        let tmp = tempfile::TempDir::new().unwrap();
        let orig_xdg = std::env::var_os("XDG_CONFIG_HOME");
        let orig_db = std::env::var_os(StoreConfig::ENV_VAR);
        let orig_currency = std::env::var_os(CURRENCY_ENV_VAR);
        unsafe { std::env::set_var("XDG_CONFIG_HOME", tmp.path()) };
        unsafe { std::env::remove_var(StoreConfig::ENV_VAR) };
        unsafe { std::env::remove_var(CURRENCY_ENV_VAR) };

        let result = f(tmp.path());

        match orig_xdg {
            Some(v) => unsafe { std::env::set_var("XDG_CONFIG_HOME", v) },
            None => unsafe { std::env::remove_var("XDG_CONFIG_HOME") },
        }
        match orig_db {
            Some(v) => unsafe { std::env::set_var(StoreConfig::ENV_VAR, v) },
            None => unsafe { std::env::remove_var(StoreConfig::ENV_VAR) },
        }
        match orig_currency {
            Some(v) => unsafe { std::env::set_var(CURRENCY_ENV_VAR, v) },
            None => unsafe { std::env::remove_var(CURRENCY_ENV_VAR) },
        }
        result
    }

    fn write_file_config(db_path: &str, currency: &str) {
        save_config(&ConfigFile {
            store: StoreSection {
                path: Some(PathBuf::from(db_path)),
            },
            display: DisplaySection {
                currency_symbol: Some(currency.to_string()),
            },
        })
        .unwrap();
    }

    #[test]
    fn save_and_load_config_roundtrip() {
        let _lock = lock_env();
        with_clean_env(|_| {
            write_file_config("/srv/dogflow/db.json", "US$");

            let loaded = load_config().unwrap();
            assert_eq!(loaded.store.path, Some(PathBuf::from("/srv/dogflow/db.json")));
            assert_eq!(loaded.display.currency_symbol.as_deref(), Some("US$"));
        });
    }

    #[test]
    fn partial_config_file_is_accepted() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[display]\ncurrency_symbol = \"€\"\n").unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert!(loaded.store.path.is_none());
        assert_eq!(loaded.display.currency_symbol.as_deref(), Some("€"));
    }

    #[cfg(unix)]
    #[test]
    fn save_config_sets_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("config.toml");
        save_config_to(&ConfigFile::default(), &path).unwrap();

        let meta = std::fs::metadata(&path).unwrap();
        assert_eq!(meta.permissions().mode() & 0o777, 0o600);
    }

    #[test]
    fn resolve_with_cli_flag_overrides_all() {
        let _lock = lock_env();
        with_clean_env(|_| {
            write_file_config("/from/file.json", "US$");
            unsafe { std::env::set_var(StoreConfig::ENV_VAR, "/from/env.json") };

            let config = DogflowConfig::resolve(Some(Path::new("/from/cli.json"))).unwrap();
            assert_eq!(config.store_config.path, PathBuf::from("/from/cli.json"));
        });
    }

    #[test]
    fn resolve_with_env_var_overrides_config_file() {
        let _lock = lock_env();
        with_clean_env(|_| {
            write_file_config("/from/file.json", "US$");
            unsafe { std::env::set_var(StoreConfig::ENV_VAR, "/from/env.json") };
            unsafe { std::env::set_var(CURRENCY_ENV_VAR, "€") };

            let config = DogflowConfig::resolve(None).unwrap();
            assert_eq!(config.store_config.path, PathBuf::from("/from/env.json"));
            assert_eq!(config.currency_symbol, "€");
        });
    }

    #[test]
    fn resolve_reads_config_file() {
        let _lock = lock_env();
        with_clean_env(|_| {
            write_file_config("/from/file.json", "US$");

            let config = DogflowConfig::resolve(None).unwrap();
            assert_eq!(config.store_config.path, PathBuf::from("/from/file.json"));
            assert_eq!(config.currency_symbol, "US$");
        });
    }

    #[test]
    fn resolve_defaults_when_nothing_set() {
        let _lock = lock_env();
        with_clean_env(|_| {
            let config = DogflowConfig::resolve(None).unwrap();
            assert_eq!(config.store_config.path, StoreConfig::default_path());
            assert_eq!(config.currency_symbol, DEFAULT_CURRENCY);
        });
    }

    #[test]
    fn resolve_rejects_malformed_config_file() {
        let _lock = lock_env();
        with_clean_env(|dir| {
            let path = dir.join("dogflow").join("config.toml");
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, "[store\npath = 3").unwrap();

            let err = DogflowConfig::resolve(None).unwrap_err();
            assert!(
                format!("{err:#}").contains("failed to parse config file"),
                "unexpected error: {err:#}"
            );
        });
    }

    #[test]
    fn config_path_ends_with_expected_filename() {
        let path = config_path();
        assert!(
            path.ends_with("dogflow/config.toml"),
            "unexpected config path: {}",
            path.display()
        );
    }
}
