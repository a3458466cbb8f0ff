//! Vehicle mechanics: drivetrain, steering and tire models, the composed
//! vehicle, and the fixed-tick simulation that drives it.

pub mod audio;
pub mod config;
pub mod drivetrain;
pub mod sim;
pub mod steering;
pub mod telemetry;
pub mod tire;
pub mod vehicle;

pub use audio::{AudioConstants, OscillatorCue, SoundCues};
pub use config::VehicleConfig;
pub use drivetrain::{DrivetrainConstants, DrivetrainModel, GearTable};
pub use sim::Simulation;
pub use steering::{SteeringConstants, SteeringModel};
pub use telemetry::{Channel, Trace, TraceSample};
pub use tire::{TireConstants, TireFrictionModel};
pub use vehicle::{DebugVectors, Vehicle};
