//! Shared JSON fixtures for motionkit tests.
//!
//! `fixtures/manifest.json` groups fixture files into sets; each set maps a
//! short name to a path relative to the `fixtures/` directory.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{bail, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    serde_json::from_str(include_str!("../../../../fixtures/manifest.json"))
        .expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    timelines: BTreeMap<String, String>,
    origins: BTreeMap<String, String>,
}

/// A group of fixtures listed in the manifest.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FixtureSet {
    /// Packing scenarios: intervals or segments plus expected rows.
    Timelines,
    /// Transform-origin resolution tables.
    Origins,
}

impl FixtureSet {
    pub const ALL: [FixtureSet; 2] = [FixtureSet::Timelines, FixtureSet::Origins];

    /// Singular noun used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            FixtureSet::Timelines => "timeline",
            FixtureSet::Origins => "origin",
        }
    }

    fn entries(self) -> &'static BTreeMap<String, String> {
        match self {
            FixtureSet::Timelines => &MANIFEST.timelines,
            FixtureSet::Origins => &MANIFEST.origins,
        }
    }

    /// Fixture names in sorted order.
    pub fn names(self) -> Vec<String> {
        self.entries().keys().cloned().collect()
    }

    /// Absolute path of a named fixture. Manifest entries must stay inside
    /// the fixtures directory.
    pub fn locate(self, name: &str) -> Result<PathBuf> {
        let Some(rel) = self.entries().get(name) else {
            bail!("unknown {} fixture '{name}'", self.label());
        };
        let rel = Path::new(rel);
        if !rel.components().all(|c| matches!(c, Component::Normal(_))) {
            bail!("{} fixture '{name}' escapes the fixtures directory", self.label());
        }
        Ok(fixtures_root().join(rel))
    }

    pub fn read(self, name: &str) -> Result<String> {
        let path = self.locate(name)?;
        fs::read_to_string(&path)
            .with_context(|| format!("failed to read fixture at {}", path.display()))
    }

    pub fn parse<T: DeserializeOwned>(self, name: &str) -> Result<T> {
        let text = self.read(name)?;
        serde_json::from_str(&text)
            .with_context(|| format!("failed to parse {} fixture '{name}'", self.label()))
    }
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

pub mod timelines {
    use super::*;

    pub fn keys() -> Vec<String> {
        FixtureSet::Timelines.names()
    }

    pub fn json(name: &str) -> Result<String> {
        FixtureSet::Timelines.read(name)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        FixtureSet::Timelines.parse(name)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        FixtureSet::Timelines.locate(name)
    }
}

pub mod origins {
    use super::*;

    pub fn keys() -> Vec<String> {
        FixtureSet::Origins.names()
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        FixtureSet::Origins.parse(name)
    }
}
