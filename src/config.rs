use anyhow::{Context, Result};
use figment::{providers::{Env, Format, Serialized, Toml}, Figment};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

use crate::comfort::ComfortRiskThresholds;
use crate::optimizer::{
    GreedyScheduler, HeatPumpOptimizer, PriceThresholds, DEFAULT_HORIZON_HOURS, MAX_HORIZON_HOURS,
};

pub const DEFAULT_CONFIG_FILE: &str = "config/default.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct Config {
    #[validate(nested)]
    pub optimizer: OptimizerConfig,
    #[validate(nested)]
    pub comfort: ComfortRiskThresholds,
    pub scenario: ScenarioConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OptimizerConfig {
    #[validate(range(min = 1, max = 168))]
    pub horizon_hours: usize,
    #[validate(range(min = 1, max = 168))]
    pub max_horizon_hours: usize,
    #[validate(range(min = 0.0, max = 100.0))]
    pub cheap_threshold: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub expensive_threshold: f64,
    #[validate(range(min = 0.0))]
    pub eco_margin_c: f64,
    #[validate(range(min = 0.0))]
    pub normal_margin_c: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        let scheduler = GreedyScheduler::default();
        Self {
            horizon_hours: DEFAULT_HORIZON_HOURS,
            max_horizon_hours: MAX_HORIZON_HOURS,
            cheap_threshold: scheduler.thresholds.cheap_below,
            expensive_threshold: scheduler.thresholds.expensive_from,
            eco_margin_c: scheduler.eco_margin_c,
            normal_margin_c: scheduler.normal_margin_c,
        }
    }
}

impl OptimizerConfig {
    pub fn scheduler(&self) -> GreedyScheduler {
        GreedyScheduler::new(
            PriceThresholds {
                cheap_below: self.cheap_threshold,
                expensive_from: self.expensive_threshold,
            },
            self.eco_margin_c,
            self.normal_margin_c,
        )
    }

    pub fn build(&self) -> HeatPumpOptimizer {
        HeatPumpOptimizer::new(Box::new(self.scheduler()), self.max_horizon_hours)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub path: PathBuf,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("config/scenario.json"),
        }
    }
}

impl Config {
    /// Defaults, then the TOML file named by `HPO_CONFIG` (default
    /// `config/default.toml`), then `HPO__`-prefixed environment variables.
    pub fn figment() -> Figment {
        let file = std::env::var("HPO_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed("HPO__").split("__"))
    }

    pub fn load() -> Result<Self> {
        Self::from_figment(Self::figment())
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let cfg: Config = figment.extract().context("loading configuration")?;
        cfg.validate().context("validating configuration")?;
        if cfg.optimizer.horizon_hours > cfg.optimizer.max_horizon_hours {
            anyhow::bail!(
                "optimizer.horizon_hours ({}) exceeds optimizer.max_horizon_hours ({})",
                cfg.optimizer.horizon_hours,
                cfg.optimizer.max_horizon_hours
            );
        }
        if cfg.optimizer.cheap_threshold > cfg.optimizer.expensive_threshold {
            anyhow::bail!("optimizer.cheap_threshold must not exceed optimizer.expensive_threshold");
        }
        Ok(cfg)
    }
}
