use serde::{Deserialize, Serialize};
use simcore::ConfigError;

use crate::audio::AudioConstants;
use crate::drivetrain::DrivetrainConstants;
use crate::steering::SteeringConstants;
use crate::tire::TireConstants;

/// Every tuning constant of the vehicle. `Default` is the reference tune,
/// calibrated for a 10 ms tick.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    pub drivetrain: DrivetrainConstants,
    pub steering: SteeringConstants,
    pub tire: TireConstants,
    pub audio: AudioConstants,
}

impl VehicleConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.drivetrain.validate()?;
        self.steering.validate()?;
        self.tire.validate()?;
        self.audio.validate()
    }
}
