//! Read a project `.env` into a map, without touching the process environment.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::LoadError;

/// `.env` in `override_dir`, else in the current directory; `None` when there is no such file.
pub fn dotenv_path(override_dir: Option<&Path>) -> Option<PathBuf> {
    let dir = override_dir
        .map(Path::to_path_buf)
        .or_else(|| std::env::current_dir().ok())?;
    let path = dir.join(".env");
    path.is_file().then_some(path)
}

/// Key/value pairs of the `.env` file, parsed by the `dotenv` crate
/// (quotes, `export` prefixes, `#` comments and `${VAR}` substitution).
/// A missing file yields an empty map.
pub fn load_env_map(path: Option<&Path>) -> Result<BTreeMap<String, String>, LoadError> {
    let Some(path) = path else {
        return Ok(BTreeMap::new());
    };
    let iter = ::dotenv::from_path_iter(path).map_err(|source| LoadError::Dotenv {
        path: path.to_path_buf(),
        source,
    })?;
    let mut out = BTreeMap::new();
    for item in iter {
        let (key, value) = item.map_err(|source| LoadError::Dotenv {
            path: path.to_path_buf(),
            source,
        })?;
        out.insert(key, value);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> BTreeMap<String, String> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, content).unwrap();
        load_env_map(Some(&path)).unwrap()
    }

    #[test]
    fn parses_plain_and_quoted_values() {
        let m = parse("# settings\nMODEL=gpt-4o-mini\nRAG_SOURCES=\"docs/, notes.txt\"\nEMPTY=\n");
        assert_eq!(m.get("MODEL").map(String::as_str), Some("gpt-4o-mini"));
        assert_eq!(m.get("RAG_SOURCES").map(String::as_str), Some("docs/, notes.txt"));
        assert_eq!(m.get("EMPTY").map(String::as_str), Some(""));
        assert_eq!(m.len(), 3);
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(dotenv_path(Some(dir.path())), None);
        assert!(load_env_map(None).unwrap().is_empty());
    }

    #[test]
    fn finds_file_in_override_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".env"), "A=1\n").unwrap();
        assert_eq!(dotenv_path(Some(dir.path())), Some(dir.path().join(".env")));
    }

    #[test]
    fn malformed_line_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "GOOD=1\nthis line has no equals sign\n").unwrap();
        assert!(matches!(
            load_env_map(Some(&path)),
            Err(LoadError::Dotenv { .. })
        ));
    }
}
