use std::fs;
use std::path::Path;
use std::str::FromStr;

use log::LevelFilter;
use mechanics::VehicleConfig;
use serde::{Deserialize, Serialize};
use simcore::{ConfigError, TickConfig, WorldBounds};

/// Everything a run needs, as read from a JSON file. Missing sections and
/// fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub world: WorldBounds,
    pub tick: TickConfig,
    pub vehicle: VehicleConfig,
    pub log_level: String,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            world: WorldBounds::default(),
            tick: TickConfig::default(),
            vehicle: VehicleConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl SimConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.world.validate()?;
        self.tick.validate()?;
        self.vehicle.validate()
    }
}

pub fn parse_level(level: &str) -> Result<LevelFilter, String> {
    LevelFilter::from_str(level).map_err(|_| format!("unknown log level `{level}`"))
}
