//! Platform-independent part of the background effect. Everything here builds
//! and tests on the host; the browser layer plugs in through [`Backend`].

pub mod clock;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod influence;
pub mod profile;
pub mod shaders;

pub use clock::{delta_multiplier, FrameClock};
pub use config::{ConfigError, RenderConfig, Tunable};
pub use constants::*;
pub use engine::{AuroraEngine, Backend, EngineState, FrameInputs};
pub use error::{AuroraError, ShaderStage};
pub use geometry::{backing_size, Rect, Viewport};
pub use influence::{InfluencePoint, InfluenceSet, PointUniforms};
pub use profile::{DeviceSignals, PerformanceProfile};
