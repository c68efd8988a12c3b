// Exam generation settings
// Load from TOML to pick categories, totals, enumeration mode and solver
// without code changes

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::domain::{EnumerationMode, SolverConfig};

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// What to generate and how
///
/// ```
/// use examgen::{EnumerationMode, ExamConfig};
///
/// let config = ExamConfig::from_toml_str(r#"
///     categories = ["Algebra", "Geometry"]
///     total_weight = 27
///     mode = "disjoint"
///
///     [solver]
///     backend = "backtracking"
///     time_limit = 5.0
/// "#).unwrap();
///
/// assert_eq!(config.mode, EnumerationMode::Disjoint);
/// assert_eq!(config.solver.time_limit, Some(5.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamConfig {
    /// Category names every exam must cover
    #[serde(default)]
    pub categories: Vec<String>,

    /// Weight the selected questions must sum to
    #[serde(default = "default_total_weight")]
    pub total_weight: Decimal,

    /// Rescale each exam to this total after selection
    #[serde(default)]
    pub max_grade: Option<Decimal>,

    #[serde(default)]
    pub mode: EnumerationMode,

    #[serde(default)]
    pub solver: SolverConfig,
}

fn default_total_weight() -> Decimal {
    Decimal::from(27)
}

impl Default for ExamConfig {
    fn default() -> Self {
        Self {
            categories: Vec::new(),
            total_weight: default_total_weight(),
            max_grade: None,
            mode: EnumerationMode::default(),
            solver: SolverConfig::default(),
        }
    }
}

impl ExamConfig {
    pub fn new(categories: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            categories: categories.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_total_weight(mut self, total: Decimal) -> Self {
        self.total_weight = total;
        self
    }

    pub fn with_max_grade(mut self, max_grade: Decimal) -> Self {
        self.max_grade = Some(max_grade);
        self
    }

    pub fn with_mode(mut self, mode: EnumerationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.categories.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one category is required".to_string(),
            ));
        }
        if self.total_weight <= Decimal::ZERO {
            return Err(ConfigError::Invalid(format!(
                "total_weight must be positive, got {}",
                self.total_weight
            )));
        }
        if let Some(max_grade) = self.max_grade {
            if max_grade <= Decimal::ZERO {
                return Err(ConfigError::Invalid(format!(
                    "max_grade must be positive, got {max_grade}"
                )));
            }
        }
        if let Some(limit) = self.solver.time_limit {
            if !limit.is_finite() || limit < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "solver.time_limit must be a non-negative number of seconds, got {limit}"
                )));
            }
        }
        Ok(())
    }
}
