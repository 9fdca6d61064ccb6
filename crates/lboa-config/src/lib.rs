//! Configuration for the LBOA initialization phase.
//!
//! Load the initialization settings from TOML or YAML to pick a strategy
//! and tune it without code changes.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use lboa_config::{GdpoptConfig, InitStrategyType};
//!
//! let config = GdpoptConfig::from_toml_str(r#"
//!     init_strategy = "custom_disjuncts"
//!     custom_init_disjuncts = [["reactor_a", "column_short"], ["reactor_b"]]
//!     integer_tolerance = 1e-6
//! "#).unwrap();
//!
//! assert_eq!(config.init_strategy, InitStrategyType::CustomDisjuncts);
//! assert_eq!(config.custom_init_disjuncts.len(), 2);
//! assert_eq!(config.set_cover_iterlim, 8);
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use lboa_config::GdpoptConfig;
//!
//! let config = GdpoptConfig::load("gdpopt.toml").unwrap_or_default();
//! // Proceeds with defaults if file doesn't exist
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Settings read by the initialization strategies.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct GdpoptConfig {
    /// Strategy used to seed the master relaxation.
    pub init_strategy: InitStrategyType,

    /// Ordered subsets of original disjunct names, one relaxation solve each.
    pub custom_init_disjuncts: Vec<Vec<String>>,

    /// Maximum number of set covering iterations.
    pub set_cover_iterlim: u32,

    /// Tolerance used when reading discrete values off a relaxation solution.
    pub integer_tolerance: f64,

    /// Whether relaxation solves may tighten variable bounds.
    ///
    /// When set, bounds are captured before each strategy touches the
    /// relaxation and restored afterward.
    pub mip_presolve: bool,

    /// Fix every discrete variable in the subproblem, not only indicators.
    pub force_subproblem_nlp: bool,

    /// Outer approximation variant used for cut generation.
    pub algorithm: Algorithm,
}

impl Default for GdpoptConfig {
    fn default() -> Self {
        Self {
            init_strategy: InitStrategyType::default(),
            custom_init_disjuncts: Vec::new(),
            set_cover_iterlim: 8,
            integer_tolerance: 1e-5,
            mip_presolve: true,
            force_subproblem_nlp: false,
            algorithm: Algorithm::default(),
        }
    }
}

impl GdpoptConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Sets the initialization strategy.
    pub fn with_init_strategy(mut self, strategy: InitStrategyType) -> Self {
        self.init_strategy = strategy;
        self
    }

    /// Appends one custom disjunct subset.
    pub fn with_custom_disjunct_set<I, N>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        self.custom_init_disjuncts
            .push(names.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the set covering iteration limit.
    pub fn with_set_cover_iterlim(mut self, limit: u32) -> Self {
        self.set_cover_iterlim = limit;
        self
    }

    /// Sets the integer tolerance.
    pub fn with_integer_tolerance(mut self, tolerance: f64) -> Self {
        self.integer_tolerance = tolerance;
        self
    }

    /// Enables or disables bound preservation around relaxation solves.
    pub fn with_mip_presolve(mut self, enabled: bool) -> Self {
        self.mip_presolve = enabled;
        self
    }

    /// Sets whether all discrete variables are fixed in the subproblem.
    pub fn with_force_subproblem_nlp(mut self, force: bool) -> Self {
        self.force_subproblem_nlp = force;
        self
    }

    /// Sets the outer approximation variant.
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Checks settings that cannot be expressed in the type system.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the custom strategy has no
    /// disjunct sets or the integer tolerance is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.init_strategy == InitStrategyType::CustomDisjuncts
            && self.custom_init_disjuncts.is_empty()
        {
            return Err(ConfigError::Invalid(
                "custom_disjuncts initialization requires at least one entry in custom_init_disjuncts"
                    .to_string(),
            ));
        }
        if !(self.integer_tolerance > 0.0 && self.integer_tolerance < 0.5) {
            return Err(ConfigError::Invalid(format!(
                "integer_tolerance must lie in (0, 0.5), got {}",
                self.integer_tolerance
            )));
        }
        Ok(())
    }
}

/// Initialization strategy selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InitStrategyType {
    /// Skip initialization entirely.
    NoInit,

    /// Solve once per user-supplied set of active disjuncts.
    CustomDisjuncts,

    /// Fix indicators at the values already present in the model.
    FixDisjuncts,

    /// Maximize the number of active binaries and indicators.
    MaxBinary,

    /// Cover every nonlinear disjunct at least once.
    #[default]
    SetCovering,
}

impl InitStrategyType {
    /// Every strategy, in registry order.
    pub const ALL: [InitStrategyType; 5] = [
        InitStrategyType::NoInit,
        InitStrategyType::CustomDisjuncts,
        InitStrategyType::FixDisjuncts,
        InitStrategyType::MaxBinary,
        InitStrategyType::SetCovering,
    ];

    /// Returns the configuration name of this strategy.
    pub fn name(self) -> &'static str {
        match self {
            InitStrategyType::NoInit => "no_init",
            InitStrategyType::CustomDisjuncts => "custom_disjuncts",
            InitStrategyType::FixDisjuncts => "fix_disjuncts",
            InitStrategyType::MaxBinary => "max_binary",
            InitStrategyType::SetCovering => "set_covering",
        }
    }
}

impl fmt::Display for InitStrategyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InitStrategyType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InitStrategyType::ALL
            .into_iter()
            .find(|strategy| strategy.name() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = InitStrategyType::ALL.iter().map(|s| s.name()).collect();
                ConfigError::Invalid(format!(
                    "unknown init strategy '{}', expected one of {}",
                    s,
                    known.join(", ")
                ))
            })
    }
}

/// Outer approximation variant, forwarded to cut generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// Logic-based outer approximation.
    #[default]
    Loa,

    /// Global logic-based outer approximation.
    Gloa,

    /// Relaxation with integer cuts.
    Ric,
}
