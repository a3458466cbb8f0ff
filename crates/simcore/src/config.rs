use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::vector::Vec2;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("world bounds must be positive and finite, got {width} x {height}")]
    InvalidWorldBounds { width: f64, height: f64 },
    #[error("gear table is empty")]
    EmptyGearTable,
    #[error("max gear {max_gear} has no ratio (table holds {len} entries)")]
    MaxGearOutOfTable { max_gear: usize, len: usize },
    #[error("gear ratio at index {index} must be positive and finite, got {ratio}")]
    InvalidGearRatio { index: usize, ratio: f64 },
    #[error("tick period must be positive, got {0} s")]
    InvalidTickPeriod(f64),
    #[error("max frame delta {max_frame_delta} s is shorter than the tick period {tick_dt} s")]
    FrameDeltaBelowTick { tick_dt: f64, max_frame_delta: f64 },
    #[error("{name} must lie in [0, 1], got {value}")]
    FactorOutOfRange { name: &'static str, value: f64 },
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },
    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f64 },
    #[error("low rpm threshold {low} must be below high threshold {high}")]
    RpmThresholdOrder { low: f64, high: f64 },
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Checks that a smoothing or blend factor lies in `[0, 1]`.
pub fn check_unit_factor(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::FactorOutOfRange { name, value })
    }
}

/// Checks that a divisor or scale is positive and finite.
pub fn check_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

/// Checks that a gain or offset is finite and not negative.
pub fn check_non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}

/// Size of the toroidal world. Positions wrap into `[0, width) x [0, height)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldBounds {
    pub width: f64,
    pub height: f64,
}

impl Default for WorldBounds {
    fn default() -> Self {
        WorldBounds {
            width: 512.0,
            height: 512.0,
        }
    }
}

impl WorldBounds {
    pub fn new(width: f64, height: f64) -> Result<Self, ConfigError> {
        let bounds = WorldBounds { width, height };
        bounds.validate()?;
        Ok(bounds)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let ok = |v: f64| v.is_finite() && v > 0.0;
        if ok(self.width) && ok(self.height) {
            Ok(())
        } else {
            Err(ConfigError::InvalidWorldBounds {
                width: self.width,
                height: self.height,
            })
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Wraps a position onto the torus. In-range positions come back unchanged.
    pub fn wrap(&self, position: &Vec2) -> Vec2 {
        Vec2::new(
            wrap_axis(position.x, self.width),
            wrap_axis(position.y, self.height),
        )
    }

    pub fn contains(&self, position: &Vec2) -> bool {
        (0.0..self.width).contains(&position.x) && (0.0..self.height).contains(&position.y)
    }
}

fn wrap_axis(value: f64, extent: f64) -> f64 {
    if (0.0..extent).contains(&value) {
        return value;
    }
    let wrapped = value.rem_euclid(extent);
    // rem_euclid rounds tiny negatives up to `extent`
    if wrapped >= extent { 0.0 } else { wrapped }
}

/// Timing of the fixed-rate loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickConfig {
    /// Seconds per physics tick.
    pub tick_dt: f64,
    /// Upper bound on the wall-clock delta fed into one frame, in seconds.
    pub max_frame_delta: f64,
}

impl Default for TickConfig {
    fn default() -> Self {
        TickConfig {
            tick_dt: 0.01,
            max_frame_delta: 0.1,
        }
    }
}

impl TickConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tick_dt.is_finite() && self.tick_dt > 0.0) {
            return Err(ConfigError::InvalidTickPeriod(self.tick_dt));
        }
        if self.max_frame_delta < self.tick_dt {
            return Err(ConfigError::FrameDeltaBelowTick {
                tick_dt: self.tick_dt,
                max_frame_delta: self.max_frame_delta,
            });
        }
        Ok(())
    }
}
