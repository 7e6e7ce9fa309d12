//! Animated aurora page background rendered with WebGL.
//!
//! `core` and `constants` are plain Rust and build on any target; everything
//! touching the browser is compiled for `wasm32` only.

pub mod constants;
pub mod core;

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod events;
#[cfg(target_arch = "wasm32")]
mod frame;
#[cfg(target_arch = "wasm32")]
mod overlay;
#[cfg(target_arch = "wasm32")]
mod render;

#[cfg(target_arch = "wasm32")]
pub use app::{start_aurora, AuroraBackground};
