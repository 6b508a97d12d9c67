//! # Posture-Engine
//!
//! Heuristic posture analysis over single-frame body keypoints.
//!
//! ## Regions
//!
//! Three posture dimensions are evaluated independently:
//!
//! 1. **Head Position** - horizontal offset of the ears from the shoulders
//! 2. **Shoulder Alignment** - height difference between the shoulders
//! 3. **Spine Curvature** - horizontal offset of the shoulders from the hips
//!
//! Each evaluable region yields a 0-100 region score and a severity. The
//! composite score is a weighted mean (head 0.3, shoulder 0.3, spine 0.4)
//! over the regions that could be evaluated, and a score of 85 or more counts
//! as good posture.
//!
//! ## Sessions
//!
//! [`PostureMonitor`] samples a [`PoseSource`] at a fixed cadence and keeps
//! running statistics per session; the scoring itself stays a pure function
//! of one pose.

pub mod config;
pub mod guidance;
pub mod monitor;
pub mod recommend;
pub mod scoring;
pub mod session;

pub use self::config::*;
pub use guidance::*;
pub use monitor::*;
pub use recommend::*;
pub use scoring::*;
pub use session::*;
