//! Shared simulation core: planar vectors, vehicle state and inputs,
//! configuration, tick scheduling and the component scene graph.

pub mod config;
pub mod integrators;
pub mod scene;
pub mod traits;
pub mod vector;

pub use config::{ConfigError, TickConfig, WorldBounds};
pub use integrators::{FixedTickScheduler, Integrator, TickClock, WrappingEuler};
pub use scene::{Component, DrawList, Rgba, SceneGraph, Shape, Viewport};
pub use traits::*;
pub use vector::{PlanarExt, Vec2, most, most_vec, vec2};
