//! JSON fixtures for stylebind tests: element layouts and the render scenarios
//! that run against them. Everything is looked up by name in `fixtures/manifest.json`.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    serde_json::from_str(include_str!("../../../../fixtures/manifest.json"))
        .expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    elements: HashMap<String, String>,
    scenarios: HashMap<String, ScenarioEntry>,
}

#[derive(Debug, Deserialize)]
struct ScenarioEntry {
    path: String,
    element: String,
}

fn read_fixture<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../../fixtures")
        .join(rel);
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("reading fixture {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing fixture {rel}"))
}

fn sorted_keys<V>(map: &HashMap<String, V>) -> Vec<String> {
    let mut keys: Vec<String> = map.keys().cloned().collect();
    keys.sort();
    keys
}

/// Element layouts: static attributes plus the bindings each directive declares.
pub mod elements {
    use super::*;

    pub fn keys() -> Vec<String> {
        sorted_keys(&MANIFEST.elements)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let rel = MANIFEST
            .elements
            .get(name)
            .ok_or_else(|| anyhow!("no element fixture named '{name}'"))?;
        read_fixture(rel)
    }
}

/// Scripted update/render sequences, each bound to one element layout.
pub mod scenarios {
    use super::*;

    fn entry(name: &str) -> Result<&'static ScenarioEntry> {
        MANIFEST
            .scenarios
            .get(name)
            .ok_or_else(|| anyhow!("no scenario fixture named '{name}'"))
    }

    pub fn keys() -> Vec<String> {
        sorted_keys(&MANIFEST.scenarios)
    }

    /// Name of the element fixture the scenario runs against.
    pub fn element(name: &str) -> Result<String> {
        Ok(entry(name)?.element.clone())
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        read_fixture(&entry(name)?.path)
    }
}
