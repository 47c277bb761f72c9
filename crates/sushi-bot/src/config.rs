use crate::ensemble::EnsembleConfig;
use crate::heuristic::HeuristicConfig;
use crate::telemetry::{
    CsvDecisionLog, DecisionLogger, MemoryDecisionLog, NdjsonDecisionLog, TelemetryError,
};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

const LABEL_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";

/// Bot configuration loaded from YAML, optionally overridden from the environment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub ensemble: EnsembleConfig,
    pub heuristic: HeuristicConfig,
    pub logging: LoggingConfig,
    pub telemetry: TelemetryConfig,
}

impl BotConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: BotConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Defaults with `SUSHI_*` environment overrides applied.
    pub fn from_env() -> Self {
        Self::default().overridden_by(|key| std::env::var(key).ok())
    }

    /// Applies overrides read through `read`; unparsable or out-of-range
    /// values are ignored.
    pub fn overridden_by<F>(mut self, mut read: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        if let Some(samples) =
            parse_env::<usize>(&mut read, "SUSHI_ENSEMBLE_SAMPLES").filter(|v| *v > 0)
        {
            self.ensemble.samples = samples;
        }
        if let Some(budget) =
            parse_env::<u64>(&mut read, "SUSHI_TIME_BUDGET_MS").filter(|v| *v > 0)
        {
            self.ensemble.time_budget_ms = budget;
        }
        if let Some(margin) = parse_env::<u64>(&mut read, "SUSHI_SAFETY_MARGIN_MS") {
            self.ensemble.safety_margin_ms = margin;
        }
        if let Some(budget) =
            parse_env::<u64>(&mut read, "SUSHI_SEARCH_BUDGET_MS").filter(|v| *v > 0)
        {
            self.ensemble.search_budget_ms = Some(budget);
        }
        if let Some(rounds) =
            parse_env::<u32>(&mut read, "SUSHI_TOTAL_ROUNDS").filter(|v| *v > 0)
        {
            self.heuristic.total_rounds = rounds;
        }
        self
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_ensemble(&self.ensemble)?;
        validate_heuristic(&self.heuristic)?;
        self.logging.normalize();
        if self.logging.level().is_none() {
            return Err(ValidationError::InvalidField {
                field: "logging.tracing_level".to_string(),
                message: format!("unknown level '{}'", self.logging.tracing_level),
            });
        }
        self.telemetry.validate()?;
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(
    read: &mut impl FnMut(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    read(key).and_then(|raw| raw.trim().parse::<T>().ok())
}

fn validate_ensemble(ensemble: &EnsembleConfig) -> Result<(), ValidationError> {
    if ensemble.samples == 0 {
        return Err(ValidationError::InvalidField {
            field: "ensemble.samples".to_string(),
            message: "sample count must be at least 1".to_string(),
        });
    }
    if ensemble.time_budget_ms == 0 {
        return Err(ValidationError::InvalidField {
            field: "ensemble.time_budget_ms".to_string(),
            message: "time budget must be greater than zero".to_string(),
        });
    }
    if ensemble.search_budget_ms == Some(0) {
        return Err(ValidationError::InvalidField {
            field: "ensemble.search_budget_ms".to_string(),
            message: "search budget must be greater than zero when set".to_string(),
        });
    }
    Ok(())
}

fn validate_heuristic(heuristic: &HeuristicConfig) -> Result<(), ValidationError> {
    for (name, weight) in heuristic.weights.iter() {
        if !weight.is_finite() || weight < 0.0 {
            return Err(ValidationError::InvalidField {
                field: format!("heuristic.weights.{name}"),
                message: "weights must be finite and non-negative".to_string(),
            });
        }
    }
    if heuristic.total_rounds == 0 {
        return Err(ValidationError::InvalidField {
            field: "heuristic.total_rounds".to_string(),
            message: "a game has at least one round".to_string(),
        });
    }
    Ok(())
}

/// Process subscriber settings; disabled unless `enable` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub enable: bool,
    pub tracing_level: String,
    pub json: bool,
    /// Log file; stderr when unset.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable: false,
            tracing_level: default_tracing_level(),
            json: false,
            file: None,
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionLogFormat {
    #[default]
    Off,
    Csv,
    Ndjson,
    Memory,
}

/// Where per-decision records go.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub format: DecisionLogFormat,
    pub dir: PathBuf,
    pub label: String,
    pub retention: usize,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            format: DecisionLogFormat::Off,
            dir: PathBuf::from("telemetry"),
            label: "sushi".to_string(),
            retention: 512,
        }
    }
}

impl TelemetryConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.label.trim().is_empty()
            || !self.label.chars().all(|c| LABEL_ALLOWED.contains(c))
        {
            return Err(ValidationError::InvalidField {
                field: "telemetry.label".to_string(),
                message: "label may only contain alphanumeric characters, '.', '_' or '-'"
                    .to_string(),
            });
        }
        if self.format == DecisionLogFormat::Memory && self.retention == 0 {
            return Err(ValidationError::InvalidField {
                field: "telemetry.retention".to_string(),
                message: "retention must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Opens the configured sink; `None` when decision logging is off.
    pub fn open(&self) -> Result<Option<Box<dyn DecisionLogger + Send>>, TelemetryError> {
        let logger: Box<dyn DecisionLogger + Send> = match self.format {
            DecisionLogFormat::Off => return Ok(None),
            DecisionLogFormat::Csv => Box::new(CsvDecisionLog::open(&self.dir, &self.label)?),
            DecisionLogFormat::Ndjson => Box::new(NdjsonDecisionLog::open(
                self.dir.join(format!("decisions_{}.jsonl", self.label)),
            )?),
            DecisionLogFormat::Memory => Box::new(MemoryDecisionLog::new(self.retention)),
        };
        Ok(Some(logger))
    }
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}
