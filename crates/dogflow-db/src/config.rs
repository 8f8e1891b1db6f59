use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

/// Store configuration.
///
/// Reads from the `DOGFLOW_DB_PATH` environment variable, falling back to
/// `<data dir>/dogflow/dogflow_db.json` when unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Location of the JSON document file.
    pub path: PathBuf,
}

impl StoreConfig {
    /// File name used when no explicit path is configured.
    pub const DEFAULT_FILE_NAME: &str = "dogflow_db.json";

    /// Environment variable that overrides the store location.
    pub const ENV_VAR: &str = "DOGFLOW_DB_PATH";

    /// The platform data directory joined with `dogflow/dogflow_db.json`.
    ///
    /// Falls back to the current directory when the platform reports no
    /// data directory.
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dogflow")
            .join(Self::DEFAULT_FILE_NAME)
    }

    /// Build a config from the environment.
    ///
    /// Priority: `DOGFLOW_DB_PATH` env var, then [`Self::default_path`].
    pub fn from_env() -> Self {
        let path = env::var_os(Self::ENV_VAR)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(Self::default_path);
        Self { path }
    }

    /// Build a config from an explicit path (useful for tests and CLI flags).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Sibling file the store writes to before renaming it over [`Self::path`].
    pub fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| OsString::from(Self::DEFAULT_FILE_NAME));
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
