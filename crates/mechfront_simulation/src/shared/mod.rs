//! Shared domain: cross-cutting helpers
//!
//! - orientation: pitch/yaw конвенция, angle lerp, vector slerp

pub mod orientation;

pub use orientation::*;
