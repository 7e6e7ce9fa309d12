//! Page-facing names and startup timing. Free of browser types so they can
//! be checked on the host.

// Elements the effect draws into or decorates
pub const CANVAS_ID: &str = "liquid-aurora";
pub const GLASS_LAYER_ID: &str = "aurora-glass";
pub const CONTAINER_SELECTOR: &str = ".aurora";

// Geometry sources for influence points, in registration order
pub const INFLUENCE_SELECTORS: [&str; 10] = [
    ".btn",
    "button",
    ".nav-link",
    "a[href]",
    "h1",
    "h2",
    "h3",
    "[data-liquid=\"1\"]",
    ".card",
    ".kpi",
];

pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

// Deferred start after window load (milliseconds)
pub const START_DELAY_MS: i32 = 250;
pub const START_DELAY_IOS_MS: i32 = 900;
pub const IDLE_TIMEOUT_MS: i32 = 800;
pub const IDLE_TIMEOUT_IOS_MS: i32 = 1400;

// Static fallback used when reduced motion is preferred
pub const FALLBACK_GRADIENT: &str = "radial-gradient(ellipse 820px 420px at 28% 38%, \
     rgba(211,47,47,0.12) 0%, rgba(153,199,255,0.10) 36%, \
     rgba(0,170,0,0.06) 64%, transparent 84%)";
pub const FALLBACK_BLUR: &str = "blur(48px)";

/// Comma-joined selector list for `querySelectorAll`.
pub fn influence_selector() -> String {
    INFLUENCE_SELECTORS.join(",")
}

/// iPhone/iPad/iPod, including iPadOS reporting itself as a Mac.
pub fn is_ios(user_agent: &str, platform: &str, max_touch_points: i32) -> bool {
    ["iPad", "iPhone", "iPod"]
        .iter()
        .any(|m| user_agent.contains(m))
        || (platform == "MacIntel" && max_touch_points > 1)
}
