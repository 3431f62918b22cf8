// Config Validation
// Startup validation fails fast with actionable errors in strict mode.

use crate::config::settings::{DemoConfig, FifoConfig, ProbeConfig};
use crate::config::types::{DemoError, Result};

/// Iteration counts above this are accepted but warned about
const LARGE_ITERATION_COUNT: u64 = 1_000_000_000;

/// Validation result with detailed errors
#[derive(Debug)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_error(&mut self, error: String) {
        self.valid = false;
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate config at startup. With `strict` set, any error is fatal.
pub fn validate_config(config: &DemoConfig, strict: bool) -> Result<ValidationResult> {
    let mut result = ValidationResult::new();

    validate_fifo(&config.fifo, &mut result);
    validate_probe(&config.probe, &mut result);

    if strict && !result.is_valid() {
        let error_msg = format!(
            "Config validation failed in strict mode:\n{}",
            result.errors.join("\n")
        );
        return Err(DemoError::Config(error_msg));
    }

    for warning in &result.warnings {
        log::warn!("config: {}", warning);
    }

    Ok(result)
}

fn validate_fifo(config: &FifoConfig, result: &mut ValidationResult) {
    if config.chunk_size == 0 {
        result.add_error("fifo.chunk_size cannot be zero".to_string());
    }

    if config.threshold == 0 {
        result.add_warning("fifo.threshold is zero; reads will return immediately".to_string());
    }

    if config.mode > 0o777 {
        result.add_error(format!(
            "fifo.mode {:o} has bits outside the permission mask 0o777",
            config.mode
        ));
    } else if config.mode & 0o400 == 0 {
        result.add_error(format!(
            "fifo.mode {:o} lacks owner read permission; the FIFO could not be opened",
            config.mode
        ));
    }

    if let Some(ref dir) = config.dir {
        if !dir.is_dir() {
            result.add_error(format!("fifo.dir is not a directory: {:?}", dir));
        }
    }
}

fn validate_probe(config: &ProbeConfig, result: &mut ValidationResult) {
    if config.iterations == 0 {
        result.add_error("probe.iterations cannot be zero".to_string());
    }
    if config.iterations > LARGE_ITERATION_COUNT {
        result.add_warning(format!(
            "probe.iterations {} is very large, the probe may run for minutes",
            config.iterations
        ));
    }
    if config.samples == 0 {
        result.add_error("probe.samples cannot be zero".to_string());
    }
}
