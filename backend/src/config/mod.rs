//! Process configuration resolved once at startup.
//!
//! A YAML base file is read from the path chosen by [`resolve_path`]. When the
//! resolved `env` is non-empty, a sibling `config.<env>.yaml` overlay is
//! applied over it: every field the overlay sets to a non-empty, non-zero
//! value replaces the base value, and a missing overlay is skipped. The result
//! is validated before it is handed to the rest of the process as a plain
//! value. Nothing here terminates the process: the entry point decides what a
//! load failure means.

mod path;

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::Figment;
use figment::providers::{Format, Yaml};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

pub use path::{CONFIG_PATH_ENV, ConfigArgs, ConfigEnv, DefaultConfigEnv, resolve_path};

const DEFAULT_ENV: &str = "local";
const DEFAULT_MIGRATIONS_PATH: &str = "./migrations";
const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(60 * 60);

/// Errors raised while resolving or validating configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Neither the `--config` flag nor `CONFIG_PATH` supplied a path.
    #[error("config path is empty")]
    EmptyPath,
    /// No file exists at the requested path.
    #[error("config file does not exist: {path}")]
    FileNotFound { path: PathBuf },
    /// A base or overlay file could not be read or decoded.
    #[error("failed to read config {path}: {message}")]
    Parse { path: PathBuf, message: String },
    /// A required field is absent or zero after merging.
    #[error("invalid config: {field} is required")]
    Validation { field: &'static str },
}

/// gRPC listener settings consumed by the transport layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GrpcConfig {
    /// Listening port. Required, must be non-zero.
    #[serde(default)]
    pub port: u16,
    /// Per-request deadline. Required, must be non-zero.
    #[serde(default, with = "humantime_serde")]
    pub timeout: Duration,
}

/// Fully merged and validated application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    /// Deployment environment name; selects the overlay file.
    #[serde(default = "default_env")]
    pub env: String,
    /// Location of the backing store (a PostgreSQL connection URL).
    #[serde(default)]
    pub storage_path: String,
    /// gRPC listener settings.
    #[serde(default)]
    pub grpc: GrpcConfig,
    /// Directory holding schema migrations.
    #[serde(default = "default_migrations_path")]
    pub migrations_path: String,
    /// Lifetime of issued tokens.
    #[serde(default = "default_token_ttl", with = "humantime_serde")]
    pub token_ttl: Duration,
}

fn default_env() -> String {
    DEFAULT_ENV.to_owned()
}

fn default_migrations_path() -> String {
    DEFAULT_MIGRATIONS_PATH.to_owned()
}

fn default_token_ttl() -> Duration {
    DEFAULT_TOKEN_TTL
}

impl AppConfig {
    /// Load the base file at `path`, merge its environment overlay, and
    /// validate the result.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::EmptyPath`] when `path` is empty.
    /// - [`ConfigError::FileNotFound`] when no base file exists.
    /// - [`ConfigError::Parse`] when the base file or an existing overlay
    ///   cannot be decoded.
    /// - [`ConfigError::Validation`] naming the first missing required field.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyPath);
        }

        let base = read_source(path)?.ok_or_else(|| ConfigError::FileNotFound {
            path: path.to_path_buf(),
        })?;
        let mut config: Self = extract(&base, path)?;

        if !config.env.is_empty() {
            let overlay_path = overlay_path(path, &config.env);
            match read_source(&overlay_path)? {
                Some(overlay) => {
                    let overlay: ConfigOverlay = extract(&overlay, &overlay_path)?;
                    overlay.apply_to(&mut config);
                    debug!(overlay = %overlay_path.display(), "applied environment overlay");
                }
                None => {
                    debug!(overlay = %overlay_path.display(), "no environment overlay found");
                }
            }
        }

        config.validate()?;
        info!(path = %path.display(), env = %config.env, "configuration loaded");
        Ok(config)
    }

    /// Check the fields that have no usable default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for an empty `storage_path` or a
    /// zero `grpc.port`/`grpc.timeout`, checked in that order.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_path.is_empty() {
            return Err(ConfigError::Validation {
                field: "storage_path",
            });
        }
        if self.grpc.port == 0 {
            return Err(ConfigError::Validation { field: "grpc.port" });
        }
        if self.grpc.timeout.is_zero() {
            return Err(ConfigError::Validation {
                field: "grpc.timeout",
            });
        }
        Ok(())
    }
}

/// Resolve the configuration path from `args` and `env`, then load it.
///
/// This is the recoverable half of the startup sequence; the caller chooses
/// whether an error is fatal.
///
/// # Errors
///
/// Propagates every [`ConfigError`] from [`AppConfig::load`].
pub fn resolve_and_load<E: ConfigEnv>(
    args: &ConfigArgs,
    env: &E,
) -> Result<AppConfig, ConfigError> {
    let path = resolve_path(args.config.as_deref(), env);
    AppConfig::load(path)
}

/// Path of the overlay file for `env`, next to the base file.
fn overlay_path(base: &Path, env: &str) -> PathBuf {
    let file_name = format!("config.{env}.yaml");
    match base.parent() {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}

/// Fields an environment overlay may set.
///
/// Every field is optional. Empty strings and zero numbers or durations
/// count as unset, so an overlay can never blank out a base value.
#[derive(Debug, Default, Deserialize)]
struct ConfigOverlay {
    env: Option<String>,
    storage_path: Option<String>,
    #[serde(default)]
    grpc: GrpcOverlay,
    migrations_path: Option<String>,
    #[serde(default, with = "humantime_serde")]
    token_ttl: Option<Duration>,
}

#[derive(Debug, Default, Deserialize)]
struct GrpcOverlay {
    port: Option<u16>,
    #[serde(default, with = "humantime_serde")]
    timeout: Option<Duration>,
}

impl ConfigOverlay {
    fn apply_to(self, config: &mut AppConfig) {
        override_if_set(&mut config.env, self.env);
        override_if_set(&mut config.storage_path, self.storage_path);
        override_if_set(&mut config.grpc.port, self.grpc.port);
        override_if_set(&mut config.grpc.timeout, self.grpc.timeout);
        override_if_set(&mut config.migrations_path, self.migrations_path);
        override_if_set(&mut config.token_ttl, self.token_ttl);
    }
}

fn override_if_set<T: Default + PartialEq>(target: &mut T, value: Option<T>) {
    if let Some(value) = value.filter(|value| *value != T::default()) {
        *target = value;
    }
}

/// Read a configuration source, mapping a missing file to `None`.
fn read_source(path: &Path) -> Result<Option<String>, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(ConfigError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        }),
    }
}

fn extract<T: DeserializeOwned>(contents: &str, source: &Path) -> Result<T, ConfigError> {
    Figment::from(Yaml::string(contents))
        .extract()
        .map_err(|err| ConfigError::Parse {
            path: source.to_path_buf(),
            message: err.to_string(),
        })
}
