//! Fill the process environment from a project `.env` and the XDG `config.toml`.
//!
//! Priority per key: **existing env > `.env` > XDG `[env]`**. Keys already set
//! in the environment are never overwritten, so a shell export always wins.
//! Settings themselves are read later from the environment (see `ragloom::RagConfig`).

mod dotenv;
mod xdg_toml;

pub use xdg_toml::config_path;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("read {path}: {source}")]
    XdgRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse {path}: {source}")]
    XdgParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("{path}: {reason}")]
    XdgValue { path: PathBuf, reason: String },
    #[error("read {path}: {source}")]
    Dotenv {
        path: PathBuf,
        #[source]
        source: ::dotenv::Error,
    },
}

/// Where an applied value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Dotenv,
    Xdg,
}

/// What [`load_and_apply`] found and set.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub dotenv_path: Option<PathBuf>,
    pub xdg_path: Option<PathBuf>,
    /// Keys set by this call, sorted, with their origin. Values are not kept.
    pub applied: Vec<(String, Origin)>,
}

/// Loads `.env` (from `override_dir`, else the current directory) and
/// `$XDG_CONFIG_HOME/<app_name>/config.toml`, then sets every key that is
/// not already in the environment.
pub fn load_and_apply(app_name: &str, override_dir: Option<&Path>) -> Result<LoadReport, LoadError> {
    let dotenv_path = dotenv::dotenv_path(override_dir);
    let xdg_path = config_path(app_name).filter(|p| p.is_file());

    let dotenv_map = dotenv::load_env_map(dotenv_path.as_deref())?;
    let xdg_map = match &xdg_path {
        Some(p) => xdg_toml::load_env_map(p)?,
        None => BTreeMap::new(),
    };

    let mut merged: BTreeMap<&str, (&str, Origin)> = BTreeMap::new();
    for (k, v) in &xdg_map {
        merged.insert(k, (v, Origin::Xdg));
    }
    for (k, v) in &dotenv_map {
        merged.insert(k, (v, Origin::Dotenv));
    }

    let mut applied = Vec::new();
    for (key, (value, origin)) in merged {
        if std::env::var_os(key).is_some() {
            continue;
        }
        std::env::set_var(key, value);
        applied.push((key.to_string(), origin));
    }

    Ok(LoadReport {
        dotenv_path,
        xdg_path,
        applied,
    })
}
