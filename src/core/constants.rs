// Shared effect tuning constants used by the engine and the shader glue.

// Shader-side array length for influence points; nothing may exceed it.
pub const MAX_INFLUENCE_POINTS: usize = 8;

// Frame timing
pub const REFERENCE_FRAME_MS: f64 = 1000.0 / 60.0; // time unit fed to the shader
pub const MAX_DELTA_MULTIPLIER: f32 = 3.0; // caps catch-up after long pauses

// Point strengths
pub const BASE_STRENGTH: f32 = 0.06; // resting strength of a permanent point
pub const SPOTLIGHT_STRENGTH: f32 = 0.30; // target while an element is spotlit
pub const RISE_SPEED: f32 = 0.020; // fade rate towards a spotlight
pub const FALL_SPEED: f32 = 0.060; // fade rate back to rest
pub const REMOVE_SPEED: f32 = 0.140; // fade rate for released transient points
pub const NEGLIGIBLE_STRENGTH: f32 = 0.01; // transient points below this are dropped

// Geometry sampling
pub const MIN_ELEMENT_PX: f64 = 8.0; // both sides must exceed this to register
pub const FOOTPRINT_SCALE: f64 = 0.55; // half-extent relative to element size
pub const DEFAULT_FOOTPRINT: f32 = 0.05; // used when a point has no footprint yet
pub const ELONGATION_RATIO: f64 = 1.15; // longer axis beyond this splits the element
pub const SPLIT_NEAR: f64 = 0.32;
pub const SPLIT_FAR: f64 = 0.68;
pub const SPLIT_PRIORITY_SCALE: f64 = 0.65;
pub const SPLIT_STRENGTH_SCALE: f32 = 0.88;

// Performance profile thresholds
pub const LOW_MEMORY_GIB: f64 = 4.0;
pub const NARROW_VIEWPORT_PX: f64 = 1024.0;
