//! Parameter types for codec operations.
//!
//! These structs describe *what* to produce, not *how*. They are the interface
//! between [`operations`](super::operations), which decides the output size,
//! and the [`backend`](super::backend), which does the pixel work. Keeping them
//! separate lets tests swap in a recording codec without touching the sizing
//! logic.

use super::calculations::TargetSize;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Parameters for a single decode → resample → encode pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeParams {
    pub target: TargetSize,
    pub quality: Quality,
}
