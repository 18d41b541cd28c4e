//! Configuration file path resolution: `--config` flag, then `CONFIG_PATH`.

use clap::Parser;

/// Environment variable consulted when no `--config` flag is given.
pub const CONFIG_PATH_ENV: &str = "CONFIG_PATH";

/// Environment abstraction for configuration lookups.
///
/// This trait allows testing with mock environments without unsafe env var
/// mutations.
pub trait ConfigEnv {
    /// Fetch a string value by name.
    fn string(&self, name: &str) -> Option<String>;
}

/// Environment access backed by the real process environment.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultConfigEnv;

impl ConfigEnv for DefaultConfigEnv {
    fn string(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// `accounts-backend` command arguments.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "accounts-backend",
    about = "User account persistence service",
    version
)]
pub struct ConfigArgs {
    /// Path to the base YAML configuration file. Falls back to `CONFIG_PATH`.
    #[arg(long = "config", value_name = "path")]
    pub config: Option<String>,
}

/// Pick the configuration path: flag first, then `CONFIG_PATH`.
///
/// Empty values count as unset. When neither source supplies a path the
/// result is the empty string, which [`crate::AppConfig::load`] rejects.
///
/// # Examples
///
/// ```
/// use accounts_backend::config::{resolve_path, DefaultConfigEnv};
///
/// assert_eq!(resolve_path(Some("/etc/accounts.yaml"), &DefaultConfigEnv), "/etc/accounts.yaml");
/// ```
pub fn resolve_path<E: ConfigEnv>(flag: Option<&str>, env: &E) -> String {
    if let Some(path) = flag.filter(|path| !path.is_empty()) {
        return path.to_owned();
    }
    env.string(CONFIG_PATH_ENV).unwrap_or_default()
}
