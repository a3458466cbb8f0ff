//! Values an audio backend needs to voice the vehicle. No synthesis here.

use serde::{Deserialize, Serialize};
use simcore::config::{check_non_negative, check_positive};
use simcore::{ConfigError, ControlInputs};

use crate::telemetry::TraceSample;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConstants {
    /// Brake noise volume at full brake once moving fast enough.
    pub brake_volume_gain: f64,
    /// Squared speed at which brake noise reaches full volume.
    pub brake_full_speed_sq: f64,
    pub brake_base_frequency: f64,
    /// Squared speed per unit of brake noise frequency.
    pub brake_speed_per_hz: f64,
}

impl Default for AudioConstants {
    fn default() -> Self {
        AudioConstants {
            brake_volume_gain: 4.0,
            brake_full_speed_sq: 10.0,
            brake_base_frequency: 0.1,
            brake_speed_per_hz: 500.0,
        }
    }
}

impl AudioConstants {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_non_negative("brake_volume_gain", self.brake_volume_gain)?;
        check_positive("brake_full_speed_sq", self.brake_full_speed_sq)?;
        check_non_negative("brake_base_frequency", self.brake_base_frequency)?;
        check_positive("brake_speed_per_hz", self.brake_speed_per_hz)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OscillatorCue {
    pub frequency: f64,
    pub volume: f64,
}

/// Engine tone, throttle layer and brake noise for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SoundCues {
    pub engine: OscillatorCue,
    pub throttle: OscillatorCue,
    pub brake: OscillatorCue,
}

impl SoundCues {
    pub fn compute(sample: &TraceSample, inputs: &ControlInputs, audio: &AudioConstants) -> Self {
        let speed_sq = sample.speed_sq;
        SoundCues {
            engine: OscillatorCue {
                frequency: sample.engine_rpm,
                volume: 1.0,
            },
            throttle: OscillatorCue {
                frequency: sample.engine_rpm,
                volume: sample.throttle,
            },
            brake: OscillatorCue {
                frequency: audio.brake_base_frequency + speed_sq / audio.brake_speed_per_hz,
                volume: inputs.left_trigger
                    * (speed_sq / audio.brake_full_speed_sq).min(1.0)
                    * audio.brake_volume_gain,
            },
        }
    }
}
