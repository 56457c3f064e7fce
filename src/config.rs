//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/rbtrace/rbtrace.toml`
//! 3. Local config: `<dir>/.rbtrace.toml` (working directory by default)
//! 4. Environment variables: `RBTRACE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::util::path::expand_env_vars;

/// Default trace label.
pub const DEFAULT_LABEL: &str = "live";

/// Unified configuration for rbtrace.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Base directory for state and traces (default: ~/.rbtrace)
    pub base_dir: PathBuf,
    /// Tree document file (default: base_dir/tree.json)
    pub state_file: Option<PathBuf>,
    /// Root directory for trace files (default: base_dir/tracing)
    pub trace_dir: Option<PathBuf>,
    /// Record and persist a trace for every mutating operation
    pub trace: bool,
    /// Trace label, used as sub-directory of `trace_dir`
    pub label: String,
    /// Pretty-print JSON output and files
    pub pretty: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_dir: dirs_default_base_dir(),
            state_file: None,
            trace_dir: None,
            trace: false,
            label: DEFAULT_LABEL.to_string(),
            pretty: true,
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub base_dir: Option<PathBuf>,
    pub state_file: Option<PathBuf>,
    pub trace_dir: Option<PathBuf>,
    pub trace: Option<bool>,
    pub label: Option<String>,
    pub pretty: Option<bool>,
}

/// Get the default base directory (~/.rbtrace).
fn dirs_default_base_dir() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".rbtrace"))
        .unwrap_or_else(|| PathBuf::from("~/.rbtrace"))
}

/// Get the XDG config directory for rbtrace.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "rbtrace").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("rbtrace.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".rbtrace.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Effective tree document file.
    pub fn state_path(&self) -> PathBuf {
        self.state_file
            .clone()
            .unwrap_or_else(|| self.base_dir.join("tree.json"))
    }

    /// Effective trace directory for the configured label.
    pub fn trace_path(&self) -> PathBuf {
        self.trace_dir
            .clone()
            .unwrap_or_else(|| self.base_dir.join("tracing"))
            .join(&self.label)
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        let expand = |p: &Path| PathBuf::from(expand_env_vars(p.to_string_lossy().as_ref()));
        self.base_dir = expand(&self.base_dir);
        self.state_file = self.state_file.as_deref().map(expand);
        self.trace_dir = self.trace_dir.as_deref().map(expand);
    }

    /// Merge overlay config onto self (base): overlay wins where specified.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            base_dir: overlay
                .base_dir
                .clone()
                .unwrap_or_else(|| self.base_dir.clone()),
            state_file: overlay.state_file.clone().or_else(|| self.state_file.clone()),
            trace_dir: overlay.trace_dir.clone().or_else(|| self.trace_dir.clone()),
            trace: overlay.trace.unwrap_or(self.trace),
            label: overlay.label.clone().unwrap_or_else(|| self.label.clone()),
            pretty: overlay.pretty.unwrap_or(self.pretty),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.rbtrace.toml`
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/rbtrace/rbtrace.toml`
    /// 3. Local config: `<local_dir>/.rbtrace.toml`
    /// 4. Environment variables: `RBTRACE_*` prefix
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply RBTRACE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("RBTRACE").separator("__"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("base_dir") {
            settings.base_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("state_file") {
            settings.state_file = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_string("trace_dir") {
            settings.trace_dir = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_bool("trace") {
            settings.trace = val;
        }
        if let Ok(val) = config.get_string("label") {
            settings.label = val;
        }
        if let Ok(val) = config.get_bool("pretty") {
            settings.pretty = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# rbtrace configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/rbtrace/rbtrace.toml
#   Local:  ./.rbtrace.toml
#   Env:    RBTRACE_* environment variables

# Base directory for the tree state and traces
# base_dir = "~/.rbtrace"

# Tree document file (default: <base_dir>/tree.json)
# state_file = "~/.rbtrace/tree.json"

# Trace root directory; traces land in <trace_dir>/<label>/
# trace_dir = "~/.rbtrace/tracing"

# Record a step trace for every insert/remove
# trace = false

# Trace label
# label = "live"

# Pretty-print JSON
# pretty = true
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_no_config_when_loading_then_uses_defaults() {
        let settings = Settings::load(None).expect("load defaults");
        assert!(settings.base_dir.to_string_lossy().contains(".rbtrace"));
        assert_eq!(settings.label, DEFAULT_LABEL);
        assert!(settings.pretty);
    }

    #[test]
    fn given_defaults_when_deriving_paths_then_under_base_dir() {
        let settings = Settings {
            base_dir: PathBuf::from("/data"),
            ..Settings::default()
        };
        assert_eq!(settings.state_path(), PathBuf::from("/data/tree.json"));
        assert_eq!(settings.trace_path(), PathBuf::from("/data/tracing/live"));
    }

    #[test]
    fn given_explicit_paths_when_deriving_then_override_base_dir() {
        let settings = Settings {
            base_dir: PathBuf::from("/data"),
            state_file: Some(PathBuf::from("/tmp/t.json")),
            trace_dir: Some(PathBuf::from("/tmp/traces")),
            label: "demo".into(),
            ..Settings::default()
        };
        assert_eq!(settings.state_path(), PathBuf::from("/tmp/t.json"));
        assert_eq!(settings.trace_path(), PathBuf::from("/tmp/traces/demo"));
    }

    #[test]
    fn given_tilde_in_base_dir_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            base_dir: PathBuf::from("~/.rbtrace"),
            state_file: Some(PathBuf::from("~/state.json")),
            ..Settings::default()
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        assert!(settings.base_dir.to_string_lossy().starts_with(&home));
        assert!(!settings.base_dir.to_string_lossy().contains('~'));
        assert!(settings
            .state_path()
            .to_string_lossy()
            .starts_with(&home));
    }

    #[test]
    fn given_overlay_when_merge_then_specified_fields_win() {
        let base = Settings::default();
        let overlay = RawSettings {
            trace: Some(true),
            label: Some("ci".into()),
            ..RawSettings::default()
        };

        let merged = base.merge_with(&overlay);

        assert!(merged.trace);
        assert_eq!(merged.label, "ci");
        assert_eq!(merged.base_dir, base.base_dir);
        assert_eq!(merged.pretty, base.pretty);
    }

    #[test]
    fn given_template_when_parsed_then_is_valid_toml() {
        let raw: RawSettings = toml::from_str(&Settings::template()).expect("template parses");
        assert!(raw.base_dir.is_none());
    }

    #[test]
    fn given_settings_when_to_toml_then_roundtrips() {
        let settings = Settings {
            base_dir: PathBuf::from("/data"),
            trace: true,
            ..Settings::default()
        };
        let text = settings.to_toml().unwrap();
        let back: Settings = toml::from_str(&text).unwrap();
        assert_eq!(back, settings);
    }
}
