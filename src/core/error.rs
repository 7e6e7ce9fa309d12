use std::fmt;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Everything that can stop the effect from running. None of these reach the
/// page: setup errors abort initialization, context loss suspends rendering.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AuroraError {
    #[error("surface element #{0} not found")]
    MissingSurface(String),
    #[error("rendering context unavailable: {0}")]
    ContextUnavailable(String),
    #[error("quad upload failed: {0}")]
    BufferUpload(String),
    #[error("{stage} shader failed to compile: {log}")]
    Compile { stage: ShaderStage, log: String },
    #[error("program link failed: {0}")]
    Link(String),
    #[error("rendering context lost")]
    ContextLost,
}

impl AuroraError {
    /// Only context loss has an automatic recovery path.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, AuroraError::ContextLost)
    }
}
