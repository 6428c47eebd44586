use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const PATH: &str = "PATH";
pub const LD_LIBRARY_PATH: &str = "LD_LIBRARY_PATH";

// ---------------------------------------------------------------------------
// Runner environment
// ---------------------------------------------------------------------------

/// Environment handed to the example runner.
///
/// At minimum it should carry a binary search path (`PATH`) and a shared
/// library search path (`LD_LIBRARY_PATH`), typically pointing at the MPI and
/// compiler installation used to build the simulation code.
///
/// JSON layout, a flat object of variable names to values:
///
/// ```json
/// {
///   "PATH": "/usr/local/openmpi/bin:/usr/local/bin:/usr/bin:/bin",
///   "LD_LIBRARY_PATH": "/usr/local/openmpi/lib64"
/// }
/// ```
///
/// Values may also be given as arrays, which are joined with `:`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnvConfig {
    vars: BTreeMap<String, EnvValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
enum EnvValue {
    Single(String),
    List(Vec<String>),
}

impl EnvValue {
    fn joined(&self) -> String {
        match self {
            EnvValue::Single(s) => s.clone(),
            EnvValue::List(parts) => parts.join(":"),
        }
    }
}

impl EnvConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text =
            std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let config: EnvConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing environment file {}", path.display()))?;
        if config.path().is_none() {
            log::warn!("{} does not define {PATH}", path.display());
        }
        Ok(config)
    }

    /// Snapshot `PATH` and `LD_LIBRARY_PATH` from the current process.
    pub fn from_process() -> Self {
        let mut config = Self::new();
        for key in [PATH, LD_LIBRARY_PATH] {
            if let Ok(value) = std::env::var(key) {
                config.set(key, value);
            }
        }
        config
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.vars.insert(key.into(), EnvValue::Single(value.into()));
        self
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.vars.get(key).map(EnvValue::joined)
    }

    pub fn path(&self) -> Option<String> {
        self.get(PATH)
    }

    pub fn library_path(&self) -> Option<String> {
        self.get(LD_LIBRARY_PATH)
    }

    /// All variables as `(name, value)` pairs, sorted by name.
    pub fn vars(&self) -> impl Iterator<Item = (&str, String)> + '_ {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.joined()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}
