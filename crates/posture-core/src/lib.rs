//! # Posture-Core
//!
//! Core types for the PostureCheck posture analysis system: body keypoints,
//! single-frame poses, posture issues and analysis results.

pub mod error;
pub mod geometry;
pub mod posture;
pub mod types;

pub use error::{Error, Result};
pub use geometry::*;
pub use posture::*;
pub use types::*;
