use crate::foundation::error::{CalcError, CalcResult};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Default bound on expression nesting.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Largest accepted `max_depth`. Fully parenthesized input at this depth fits a 2 MiB thread
/// stack in an unoptimized build.
pub const MAX_DEPTH_LIMIT: usize = 256;

/// Evaluator limits.
///
/// Deserializes from JSON such as `{ "max_depth": 64, "max_input_len": 4096 }`. Missing keys
/// take their defaults and unknown keys are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvalConfig {
    /// Maximum nesting depth of parentheses, signs and operators.
    pub max_depth: usize,
    /// Maximum input length in bytes, or `None` for no limit.
    pub max_input_len: Option<usize>,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_input_len: None,
        }
    }
}

impl EvalConfig {
    /// Parse a config from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> CalcResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| CalcError::serde(format!("parse evaluator config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> CalcResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            CalcError::validation(format!("open evaluator config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check the limits are usable.
    pub fn validate(&self) -> CalcResult<()> {
        if self.max_depth == 0 {
            return Err(CalcError::validation("max_depth must be at least 1"));
        }
        if self.max_depth > MAX_DEPTH_LIMIT {
            return Err(CalcError::validation(format!(
                "max_depth must be at most {MAX_DEPTH_LIMIT}, got {}",
                self.max_depth
            )));
        }
        if self.max_input_len == Some(0) {
            return Err(CalcError::validation("max_input_len must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
