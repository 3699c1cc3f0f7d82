use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, time::Duration};

use crate::stabilizer::DEFAULT_MIN_STABLE_MATCHES;

const DEFAULT_SCAN_INTERVAL_MS: u64 = 1800;

fn default_scan_interval_ms() -> u64 {
    DEFAULT_SCAN_INTERVAL_MS
}

fn default_min_stable_matches() -> u32 {
    DEFAULT_MIN_STABLE_MATCHES
}

/// Tunables for the scan loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScannerSettings {
    #[serde(default = "default_scan_interval_ms")]
    pub scan_interval_ms: u64,
    #[serde(default = "default_min_stable_matches")]
    pub min_stable_matches: u32,
}

impl Default for ScannerSettings {
    fn default() -> Self {
        Self {
            scan_interval_ms: DEFAULT_SCAN_INTERVAL_MS,
            min_stable_matches: DEFAULT_MIN_STABLE_MATCHES,
        }
    }
}

impl ScannerSettings {
    /// Loads settings from a JSON file.
    ///
    /// A missing file yields defaults; so does a file that fails to parse.
    /// Only an unreadable existing file is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scanner settings from {}", path.display()))?;
        match serde_json::from_str(&contents) {
            Ok(settings) => Ok(settings),
            Err(err) => {
                log::warn!(
                    "Ignoring malformed scanner settings at {}: {err}",
                    path.display()
                );
                Ok(Self::default())
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let serialized = serde_json::to_string_pretty(self)?;
        fs::write(path, serialized)
            .with_context(|| format!("Failed to write scanner settings to {}", path.display()))
    }

    /// Never zero; `tokio::time::interval` panics on a zero period.
    pub fn scan_interval(&self) -> Duration {
        Duration::from_millis(self.scan_interval_ms.max(1))
    }

    pub fn min_stable_matches(&self) -> u32 {
        self.min_stable_matches.max(1)
    }
}
