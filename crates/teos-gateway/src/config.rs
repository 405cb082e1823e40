//! Gateway configuration.
//!
//! The configuration file is JSON:
//!
//! ```json
//! {
//!   "version": "1.0.0",
//!   "teos_executable": "teos/build/teos",
//!   "node_block_count": 20,
//!   "node_block_num": 3
//! }
//! ```
//!
//! The executable is looked up first at the fixed build location
//! `<config dir>/teos/build/teos`, then at `teos_executable` (absolute, or
//! relative to the config dir).

use crate::error::{GatewayError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Configuration key naming the executable.
pub const TEOS_EXECUTABLE_KEY: &str = "teos_executable";

/// Build location checked before the configured path.
pub const DEFAULT_BUILD_LOCATION: &str = "teos/build/teos";

/// On-disk configuration record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Front-end version string.
    pub version: String,

    /// Path to the executable, absolute or relative to the config file.
    #[serde(default)]
    pub teos_executable: Option<String>,

    /// Attempt budget for node readiness probing.
    pub node_block_count: u32,

    /// Head block number at which the node counts as ready.
    pub node_block_num: u64,

    /// Interval between probe attempts, in milliseconds.
    #[serde(default = "default_probe_interval_ms")]
    pub node_probe_interval_ms: u64,

    /// Gateway-wide verbosity.
    #[serde(default = "default_true")]
    pub verbose: bool,
}

fn default_probe_interval_ms() -> u64 {
    1000
}

fn default_true() -> bool {
    true
}

/// Settings for node readiness probing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeSettings {
    /// Maximum number of `get info` attempts.
    pub attempts: u32,
    /// Head block number to wait for.
    pub target_block: u64,
    /// Sleep before each attempt.
    pub interval: Duration,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            attempts: 20,
            target_block: 3,
            interval: Duration::from_millis(default_probe_interval_ms()),
        }
    }
}

/// Resolved configuration handed to [`crate::Gateway::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Front-end version string.
    pub version: String,
    /// Absolute path of the executable.
    pub teos_exe: PathBuf,
    /// Gateway-wide verbosity; combined with each call's own flag.
    pub verbose: bool,
    /// Node readiness probing.
    pub probe: ProbeSettings,
}

impl GatewayConfig {
    /// Configuration for a known executable with default settings.
    #[must_use]
    pub fn new(teos_exe: impl Into<PathBuf>) -> Self {
        Self {
            version: String::new(),
            teos_exe: teos_exe.into(),
            verbose: true,
            probe: ProbeSettings::default(),
        }
    }

    /// Set verbosity.
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Set probe settings.
    #[must_use]
    pub fn with_probe(mut self, probe: ProbeSettings) -> Self {
        self.probe = probe;
        self
    }

    /// Load and resolve a configuration file.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the file cannot be read or parsed, or if
    /// no executable is found at either location.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| GatewayError::config(path, format!("cannot read: {e}")))?;
        let file: ConfigFile = serde_json::from_str(&text)
            .map_err(|e| GatewayError::config(path, format!("invalid config: {e}")))?;

        info!(path = %path.display(), version = %file.version, "read teos setup");
        Self::from_file(path, file)
    }

    /// Resolve a parsed configuration record found at `path`.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if no executable is found.
    pub fn from_file(path: &Path, file: ConfigFile) -> Result<Self> {
        let config_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let teos_exe = resolve_executable(config_dir, file.teos_executable.as_deref())
            .ok_or_else(|| {
                GatewayError::config(
                    path,
                    format!(
                        "do not know the teos executable; expected {{\"{TEOS_EXECUTABLE_KEY}\":\"absolute-path-to-teos-executable\"}}"
                    ),
                )
            })?;
        debug!(teos_exe = %teos_exe.display(), "resolved teos executable");

        Ok(Self {
            version: file.version,
            teos_exe,
            verbose: file.verbose,
            probe: ProbeSettings {
                attempts: file.node_block_count,
                target_block: file.node_block_num,
                interval: Duration::from_millis(file.node_probe_interval_ms),
            },
        })
    }
}

/// Find the executable: the fixed build location wins over the configured one.
#[must_use]
pub fn resolve_executable(config_dir: &Path, configured: Option<&str>) -> Option<PathBuf> {
    let built = config_dir.join(DEFAULT_BUILD_LOCATION);
    if built.is_file() {
        return Some(canonical(built));
    }

    let configured = configured.filter(|value| !value.is_empty())?;
    let absolute = Path::new(configured);
    if absolute.is_absolute() && absolute.is_file() {
        return Some(canonical(absolute.to_path_buf()));
    }

    // A leading separator still means "relative to the config dir".
    let relative = config_dir.join(configured.trim_start_matches(['/', '\\']));
    relative.is_file().then(|| canonical(relative))
}

fn canonical(path: PathBuf) -> PathBuf {
    std::fs::canonicalize(&path).unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("config.json");
        std::fs::write(&path, body).expect("write config");
        path
    }

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create dirs");
        }
        std::fs::write(path, b"").expect("touch");
    }

    #[test]
    fn test_build_location_preferred() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(&dir.path().join("teos/build/teos"));
        touch(&dir.path().join("bin/teos"));
        let path = write_config(
            dir.path(),
            r#"{"version":"1.2","teos_executable":"bin/teos","node_block_count":5,"node_block_num":2}"#,
        );

        let config = GatewayConfig::load(&path).expect("load");
        assert!(config.teos_exe.ends_with("teos/build/teos"));
        assert_eq!(config.version, "1.2");
        assert_eq!(config.probe.attempts, 5);
        assert_eq!(config.probe.target_block, 2);
        assert_eq!(config.probe.interval, Duration::from_millis(1000));
        assert!(config.verbose);
    }

    #[test]
    fn test_configured_path_fallback() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(&dir.path().join("bin/teos"));
        let path = write_config(
            dir.path(),
            r#"{"version":"1.2","teos_executable":"/bin/teos","node_block_count":5,"node_block_num":2,"verbose":false,"node_probe_interval_ms":10}"#,
        );

        // "/bin/teos" does not exist on the host, the config-relative one does.
        let config = GatewayConfig::load(&path).expect("config-relative executable");
        assert!(config.teos_exe.ends_with("bin/teos"));
        assert!(config.teos_exe.starts_with(std::fs::canonicalize(dir.path()).expect("canonical")));
        assert!(!config.verbose);
        assert_eq!(config.probe.interval, Duration::from_millis(10));
    }

    #[test]
    fn test_unknown_executable_is_config_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_config(
            dir.path(),
            r#"{"version":"1.2","node_block_count":5,"node_block_num":2}"#,
        );
        let err = GatewayConfig::load(&path).expect_err("no executable");
        assert!(matches!(err, GatewayError::Config { .. }));
        assert!(err.to_string().contains(TEOS_EXECUTABLE_KEY));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = GatewayConfig::load(dir.path().join("absent.json")).expect_err("missing");
        assert!(matches!(err, GatewayError::Config { .. }));
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_config(dir.path(), "{ not json");
        let err = GatewayConfig::load(&path).expect_err("malformed");
        assert!(err.to_string().contains("invalid config"));
    }

    #[test]
    fn test_new_defaults() {
        let config = GatewayConfig::new("/opt/teos/teos").with_verbose(false);
        assert!(!config.verbose);
        assert_eq!(config.probe, ProbeSettings::default());
    }
}
