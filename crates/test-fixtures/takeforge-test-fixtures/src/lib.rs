use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Names of every fixture document, keyed by kind. Paths are relative to the
/// workspace `fixtures/` directory.
static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("takeforge fixture manifest is valid JSON")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    libraries: HashMap<String, String>,
    #[serde(default)]
    configs: HashMap<String, String>,
}

fn fixture_path(rel: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../../fixtures")
        .join(rel)
}

fn entry<'a>(map: &'a HashMap<String, String>, kind: &str, name: &str) -> Result<&'a str> {
    map.get(name)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("no {kind} named '{name}' in fixtures/manifest.json"))
}

fn read_document(rel: &str) -> Result<String> {
    let path = fixture_path(rel);
    fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))
}

fn parse_document<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_document(rel)?;
    serde_json::from_str(&text).with_context(|| format!("decoding {rel}"))
}

/// Stored animation libraries (`animations` array documents).
pub mod libraries {
    use super::*;

    pub fn keys() -> Vec<String> {
        let mut keys: Vec<String> = MANIFEST.libraries.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn json(name: &str) -> Result<String> {
        read_document(entry(&MANIFEST.libraries, "library", name)?)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        super::parse_document(entry(&MANIFEST.libraries, "library", name)?)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        Ok(fixture_path(entry(&MANIFEST.libraries, "library", name)?))
    }
}

/// Serialized configuration documents.
pub mod configs {
    use super::*;

    pub fn keys() -> Vec<String> {
        let mut keys: Vec<String> = MANIFEST.configs.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn json(name: &str) -> Result<String> {
        read_document(entry(&MANIFEST.configs, "config", name)?)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        super::parse_document(entry(&MANIFEST.configs, "config", name)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_manifest_entry_exists() {
        for name in libraries::keys() {
            let path = libraries::path(&name).unwrap();
            assert!(path.exists(), "missing library fixture {}", path.display());
            let _: serde_json::Value = libraries::load(&name).unwrap();
        }
        for name in configs::keys() {
            let _: serde_json::Value = configs::load(&name).unwrap();
        }
    }

    #[test]
    fn unknown_fixture_is_an_error() {
        let err = libraries::json("nope").unwrap_err();
        assert!(err.to_string().contains("no library named 'nope'"));
    }
}
