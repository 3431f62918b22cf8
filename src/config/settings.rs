/// Configuration loading from idiomlab.json
use crate::config::types::{DemoError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "idiomlab.json";

/// Top-level configuration for all demos
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub fifo: FifoConfig,
    pub probe: ProbeConfig,
}

/// Scoped-resource demo settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FifoConfig {
    /// Bytes requested per read call
    pub chunk_size: usize,
    /// Default byte threshold for `read_until`
    pub threshold: usize,
    /// Permission bits for newly created FIFOs
    pub mode: u32,
    /// Directory for generated FIFO paths (system temp dir when unset)
    pub dir: Option<PathBuf>,
}

impl Default for FifoConfig {
    fn default() -> Self {
        FifoConfig {
            chunk_size: 4096,
            threshold: 4096,
            mode: 0o600,
            dir: None,
        }
    }
}

impl FifoConfig {
    /// Directory generated FIFO paths are placed in
    pub fn fifo_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

/// Cost probe settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Duplications (and reference passes) per measurement
    pub iterations: u64,
    /// Measurements taken by `sample_copy_cost`
    pub samples: usize,
    /// Payload stored in the probed handle
    pub payload: i64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        ProbeConfig {
            iterations: 1_000_000,
            samples: 5,
            payload: 42,
        }
    }
}

impl DemoConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config_content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            DemoError::Config(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let config: DemoConfig = serde_json::from_str(&config_content)
            .map_err(|e| DemoError::Config(format!("Failed to parse config JSON: {}", e)))?;

        Ok(config)
    }

    /// Load ./idiomlab.json, or defaults when the file is absent
    pub fn load_default() -> Result<Self> {
        let config_path = std::env::current_dir()
            .map_err(|e| DemoError::Config(format!("Failed to get current directory: {}", e)))?
            .join(DEFAULT_CONFIG_FILE);

        if !config_path.exists() {
            log::debug!("{} not found, using built-in defaults", DEFAULT_CONFIG_FILE);
            return Ok(Self::default());
        }

        Self::load_from_file(config_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: DemoConfig =
            serde_json::from_str(r#"{ "fifo": { "chunk_size": 16 } }"#).unwrap();
        assert_eq!(config.fifo.chunk_size, 16);
        assert_eq!(config.fifo.threshold, 4096);
        assert_eq!(config.fifo.mode, 0o600);
        assert_eq!(config.probe.iterations, 1_000_000);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "probe": {{ "iterations": 10, "samples": 2 }} }}"#).unwrap();

        let config = DemoConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.probe.iterations, 10);
        assert_eq!(config.probe.samples, 2);
        assert_eq!(config.probe.payload, 42);
    }

    #[test]
    fn test_load_rejects_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        match DemoConfig::load_from_file(file.path()) {
            Err(DemoError::Config(msg)) => assert!(msg.contains("parse")),
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_fifo_dir_defaults_to_temp() {
        let config = FifoConfig::default();
        assert_eq!(config.fifo_dir(), std::env::temp_dir());
    }
}
