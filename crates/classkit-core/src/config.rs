//! classkit configuration.
//!
//! The core never hard-codes file locations: the joke source and the student
//! store paths come from here, and the CLI can still override them per
//! command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::quiz::Difficulty;

/// Name of the per-directory config file.
pub const CONFIG_FILE_NAME: &str = "classkit.toml";

/// Top-level classkit configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClasskitConfig {
    /// Joke source file.
    #[serde(default = "default_jokes_path")]
    pub jokes_path: PathBuf,
    /// Student record store file.
    #[serde(default = "default_students_path")]
    pub students_path: PathBuf,
    /// Quiz tier to start with instead of showing the menu.
    #[serde(default)]
    pub default_difficulty: Option<Difficulty>,
}

fn default_jokes_path() -> PathBuf {
    PathBuf::from("jokes.txt")
}

fn default_students_path() -> PathBuf {
    PathBuf::from("students.txt")
}

impl Default for ClasskitConfig {
    fn default() -> Self {
        Self {
            jokes_path: default_jokes_path(),
            students_path: default_students_path(),
            default_difficulty: None,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not scanned again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `classkit.toml` in the current directory
/// 2. `~/.config/classkit/config.toml`
///
/// Environment variable overrides: `CLASSKIT_JOKES_PATH`, `CLASSKIT_STUDENTS_PATH`.
pub fn load_config() -> Result<ClasskitConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<ClasskitConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|home| home.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            config
        }
        None => ClasskitConfig::default(),
    };

    if let Ok(jokes) = std::env::var("CLASSKIT_JOKES_PATH") {
        config.jokes_path = PathBuf::from(jokes);
    }
    if let Ok(students) = std::env::var("CLASSKIT_STUDENTS_PATH") {
        config.students_path = PathBuf::from(students);
    }

    config.jokes_path = resolve_path(&config.jokes_path);
    config.students_path = resolve_path(&config.students_path);

    Ok(config)
}

/// Parse a TOML config string.
pub fn parse_config(content: &str) -> Result<ClasskitConfig> {
    Ok(toml::from_str(content)?)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("classkit"))
}
