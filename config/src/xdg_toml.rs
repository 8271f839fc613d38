//! `[env]` table of `$XDG_CONFIG_HOME/<app>/config.toml`.
//!
//! ```toml
//! [env]
//! OPENAI_API_KEY = "sk-..."
//! RESPOND_STRATEGY = "direct"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::LoadError;

/// Config directory: `$XDG_CONFIG_HOME` when set and non-empty, else the platform default.
fn config_home() -> Option<PathBuf> {
    std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(dirs::config_dir)
}

/// `<config home>/<app_name>/config.toml`, whether or not it exists.
pub fn config_path(app_name: &str) -> Option<PathBuf> {
    config_home().map(|home| home.join(app_name).join("config.toml"))
}

#[derive(serde::Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    env: BTreeMap<String, toml::Value>,
}

/// String form of a TOML scalar; tables and arrays are rejected.
fn scalar_to_string(key: &str, value: toml::Value) -> Result<String, String> {
    match value {
        toml::Value::String(s) => Ok(s),
        toml::Value::Integer(i) => Ok(i.to_string()),
        toml::Value::Float(f) => Ok(f.to_string()),
        toml::Value::Boolean(b) => Ok(b.to_string()),
        other => Err(format!("[env].{} must be a scalar, got {}", key, other.type_str())),
    }
}

/// `[env]` entries of the file at `path`. A missing file or section yields an empty map.
pub fn load_env_map(path: &Path) -> Result<BTreeMap<String, String>, LoadError> {
    if !path.is_file() {
        return Ok(BTreeMap::new());
    }
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::XdgRead {
        path: path.to_path_buf(),
        source,
    })?;
    let file: ConfigFile = toml::from_str(&content).map_err(|source| LoadError::XdgParse {
        path: path.to_path_buf(),
        source,
    })?;
    file.env
        .into_iter()
        .map(|(k, v)| {
            let v = scalar_to_string(&k, v).map_err(|reason| LoadError::XdgValue {
                path: path.to_path_buf(),
                reason,
            })?;
            Ok((k, v))
        })
        .collect()
}
