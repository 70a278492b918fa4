//! Shared marker-settings fixtures for tests, benches and demos.
//!
//! Fixture files live under the workspace `fixtures/` directory and are
//! looked up by name through `fixtures/manifest.json`.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Result<Manifest, String>> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).map_err(|e| e.to_string())
});

#[derive(Debug, Deserialize)]
struct Manifest {
    screen: HashMap<String, String>,
    world: HashMap<String, String>,
}

fn manifest() -> Result<&'static Manifest> {
    MANIFEST
        .as_ref()
        .map_err(|e| anyhow!("fixtures manifest failed to parse: {e}"))
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a>(map: &'a HashMap<String, String>, kind: &str, name: &str) -> Result<&'a str> {
    map.get(name)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

/// Screen marker settings (`GraphicSettings` JSON).
pub mod screen {
    use super::*;

    pub fn keys() -> Result<Vec<String>> {
        Ok(manifest()?.screen.keys().cloned().collect())
    }

    pub fn json(name: &str) -> Result<String> {
        read_to_string(lookup(&manifest()?.screen, "screen settings", name)?)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        load_json(lookup(&manifest()?.screen, "screen settings", name)?)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        Ok(resolve_path(lookup(&manifest()?.screen, "screen settings", name)?))
    }
}

/// World marker settings (`WorldGraphicSettings` JSON).
pub mod world {
    use super::*;

    pub fn keys() -> Result<Vec<String>> {
        Ok(manifest()?.world.keys().cloned().collect())
    }

    pub fn json(name: &str) -> Result<String> {
        read_to_string(lookup(&manifest()?.world, "world settings", name)?)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        load_json(lookup(&manifest()?.world, "world settings", name)?)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        Ok(resolve_path(lookup(&manifest()?.world, "world settings", name)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_manifest_entry_exists() {
        for key in screen::keys().unwrap() {
            assert!(screen::path(&key).unwrap().exists(), "missing screen fixture {key}");
        }
        for key in world::keys().unwrap() {
            assert!(world::path(&key).unwrap().exists(), "missing world fixture {key}");
        }
    }

    #[test]
    fn unknown_names_are_errors() {
        assert!(screen::json("no-such-fixture").is_err());
    }
}
