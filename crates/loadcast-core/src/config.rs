//! loadcast.toml configuration parser.
//!
//! Every tunable of the projection pipeline lives here: the target load,
//! the requirement ceilings, the growth-model coefficients, and the
//! cross-group divergence threshold. Optional sections fall back to the
//! documented conservative defaults through the accessor methods.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ConfigError, ConfigResult};
use crate::types::{ConfidenceParams, ModelParams, RequirementThresholds};

/// Divergence threshold (percent) used when `[comparison]` is absent.
pub const DEFAULT_DIVERGENCE_THRESHOLD_PCT: f64 = 10.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadcastConfig {
    pub target: TargetConfig,
    pub thresholds: Option<ThresholdsConfig>,
    pub model: Option<ModelConfig>,
    pub confidence: Option<ConfidenceConfig>,
    pub comparison: Option<ComparisonConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Load level to project to, in virtual users.
    pub load: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdsConfig {
    pub max_duration_ms: Option<f64>,
    pub max_failure_rate: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub sigma: Option<f64>,
    pub kappa: Option<f64>,
    pub gamma: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfidenceConfig {
    pub floor: Option<f64>,
    pub ceiling: Option<f64>,
    pub penalty: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonConfig {
    pub divergence_threshold_pct: Option<f64>,
}

impl LoadcastConfig {
    /// Load and validate a config file. Invalid values fail here, at load
    /// time, rather than mid-projection.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: LoadcastConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject clearly nonsensical values before any projection runs.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.target.load < 1 {
            return Err(ConfigError::Invalid(format!(
                "target load must be at least 1 (got {})",
                self.target.load
            )));
        }

        if let Some(t) = &self.thresholds {
            if let Some(ms) = t.max_duration_ms
                && ms < 0.0
            {
                return Err(ConfigError::Invalid(format!(
                    "max_duration_ms must be non-negative (got {ms})"
                )));
            }
            if let Some(rate) = t.max_failure_rate
                && !(0.0..=1.0).contains(&rate)
            {
                return Err(ConfigError::Invalid(format!(
                    "max_failure_rate must be a fraction in [0, 1] (got {rate})"
                )));
            }
        }

        if let Some(m) = &self.model {
            for (name, value) in [("sigma", m.sigma), ("kappa", m.kappa), ("gamma", m.gamma)] {
                if let Some(v) = value
                    && v < 0.0
                {
                    return Err(ConfigError::Invalid(format!(
                        "model coefficient {name} must be non-negative (got {v})"
                    )));
                }
            }
        }

        if let Some(c) = &self.confidence {
            let floor = c.floor.unwrap_or(ConfidenceParams::default().floor);
            let ceiling = c.ceiling.unwrap_or(ConfidenceParams::default().ceiling);
            if !(0.0..=1.0).contains(&floor) || !(0.0..=1.0).contains(&ceiling) || floor > ceiling {
                return Err(ConfigError::Invalid(format!(
                    "confidence bounds must satisfy 0 <= floor <= ceiling <= 1 (got {floor}..{ceiling})"
                )));
            }
        }

        if let Some(c) = &self.comparison
            && let Some(pct) = c.divergence_threshold_pct
            && pct <= 0.0
        {
            return Err(ConfigError::Invalid(format!(
                "divergence_threshold_pct must be positive (got {pct})"
            )));
        }

        Ok(())
    }

    /// Requirement ceilings, as configured.
    pub fn requirement_thresholds(&self) -> RequirementThresholds {
        let t = self.thresholds.as_ref();
        RequirementThresholds {
            max_duration_ms: t.and_then(|t| t.max_duration_ms),
            max_failure_rate: t.and_then(|t| t.max_failure_rate),
        }
    }

    /// Growth-model parameters with defaults filled in.
    ///
    /// Explicitly supplying σ or κ opts single-observation projections
    /// into the fixed-coefficient scalability curve.
    pub fn model_params(&self) -> ModelParams {
        let defaults = ModelParams::default();
        match &self.model {
            Some(m) => ModelParams {
                sigma: m.sigma.unwrap_or(defaults.sigma),
                kappa: m.kappa.unwrap_or(defaults.kappa),
                gamma: m.gamma.unwrap_or(defaults.gamma),
                fixed_coefficients: m.sigma.is_some() || m.kappa.is_some(),
            },
            None => defaults,
        }
    }

    /// Confidence bounds with defaults filled in.
    pub fn confidence_params(&self) -> ConfidenceParams {
        let defaults = ConfidenceParams::default();
        match &self.confidence {
            Some(c) => ConfidenceParams {
                floor: c.floor.unwrap_or(defaults.floor),
                ceiling: c.ceiling.unwrap_or(defaults.ceiling),
                penalty: c.penalty.unwrap_or(defaults.penalty),
            },
            None => defaults,
        }
    }

    /// Cross-group divergence threshold in percent.
    pub fn divergence_threshold_pct(&self) -> f64 {
        self.comparison
            .as_ref()
            .and_then(|c| c.divergence_threshold_pct)
            .unwrap_or(DEFAULT_DIVERGENCE_THRESHOLD_PCT)
    }

    /// Scaffold a minimal loadcast.toml for the given target load.
    pub fn scaffold(target_load: u32) -> Self {
        LoadcastConfig {
            target: TargetConfig { load: target_load },
            thresholds: Some(ThresholdsConfig {
                max_duration_ms: Some(5000.0),
                max_failure_rate: Some(0.02),
            }),
            model: None,
            confidence: None,
            comparison: Some(ComparisonConfig {
                divergence_threshold_pct: Some(DEFAULT_DIVERGENCE_THRESHOLD_PCT),
            }),
        }
    }
}
