// GLSL ES 1.00 sources for the full-screen aurora pass.
pub static AURORA_VERT: &str = include_str!("../../shaders/aurora.vert");
pub static AURORA_FRAG: &str = include_str!("../../shaders/aurora.frag");

pub const POSITION_ATTRIBUTE: &str = "a_position";

/// Two triangles as a strip covering clip space.
pub const FULLSCREEN_QUAD: [f32; 8] = [-1.0, -1.0, 1.0, -1.0, -1.0, 1.0, 1.0, 1.0];

// Uniform names, looked up once per program build.
pub const U_TIME: &str = "u_time";
pub const U_RESOLUTION: &str = "u_resolution";
pub const U_POINTS: &str = "u_points";
pub const U_MASKS: &str = "u_masks";
pub const U_POINT_COUNT: &str = "u_point_count";
pub const U_GLOW_POINTS: &str = "u_glow_points";
pub const U_GLOW_COUNT: &str = "u_glow_count";
pub const U_DRIFT_SPEED: &str = "u_drift_speed";
pub const U_ATTRACTION_STRENGTH: &str = "u_attraction_strength";
pub const U_ATTRACTION_FALLOFF: &str = "u_attraction_falloff";
pub const U_GLOW_STRENGTH: &str = "u_glow_strength";
pub const U_COLOR_INTENSITY: &str = "u_color_intensity";
pub const U_THRESHOLD: &str = "u_threshold";

pub const UNIFORM_NAMES: [&str; 13] = [
    U_TIME,
    U_RESOLUTION,
    U_POINTS,
    U_MASKS,
    U_POINT_COUNT,
    U_GLOW_POINTS,
    U_GLOW_COUNT,
    U_DRIFT_SPEED,
    U_ATTRACTION_STRENGTH,
    U_ATTRACTION_FALLOFF,
    U_GLOW_STRENGTH,
    U_COLOR_INTENSITY,
    U_THRESHOLD,
];
