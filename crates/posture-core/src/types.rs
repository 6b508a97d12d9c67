//! Fundamental types: identifiers, timestamps, keypoints and poses.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::geometry::{Position2D, Segment};

/// Identifier for a posture monitoring session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Timestamp wrapper with nanosecond precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now().timestamp_nanos_opt().unwrap_or(0))
    }

    pub fn from_nanos(nanos: i64) -> Self {
        Self(nanos)
    }

    /// Whole seconds elapsed since `earlier` (zero if `earlier` is later)
    pub fn secs_since(&self, earlier: Timestamp) -> u64 {
        ((self.0 - earlier.0).max(0) / 1_000_000_000) as u64
    }
}

/// 17-joint landmark vocabulary (COCO order, as emitted by MoveNet)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum KeypointName {
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
}

impl KeypointName {
    pub const COUNT: usize = 17;

    pub const ALL: [KeypointName; Self::COUNT] = [
        Self::Nose,
        Self::LeftEye,
        Self::RightEye,
        Self::LeftEar,
        Self::RightEar,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
    ];

    pub fn from_index(idx: u8) -> Option<Self> {
        Self::ALL.get(idx as usize).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftEye => "left_eye",
            Self::RightEye => "right_eye",
            Self::LeftEar => "left_ear",
            Self::RightEar => "right_ear",
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftElbow => "left_elbow",
            Self::RightElbow => "right_elbow",
            Self::LeftWrist => "left_wrist",
            Self::RightWrist => "right_wrist",
            Self::LeftHip => "left_hip",
            Self::RightHip => "right_hip",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::LeftAnkle => "left_ankle",
            Self::RightAnkle => "right_ankle",
        }
    }

    /// Skeleton connectivity pairs drawn by the camera overlay
    pub fn skeleton_pairs() -> &'static [(KeypointName, KeypointName)] {
        &[
            (KeypointName::Nose, KeypointName::LeftEye),
            (KeypointName::Nose, KeypointName::RightEye),
            (KeypointName::LeftEye, KeypointName::LeftEar),
            (KeypointName::RightEye, KeypointName::RightEar),
            (KeypointName::Nose, KeypointName::LeftShoulder),
            (KeypointName::Nose, KeypointName::RightShoulder),
            (KeypointName::LeftShoulder, KeypointName::LeftElbow),
            (KeypointName::RightShoulder, KeypointName::RightElbow),
            (KeypointName::LeftElbow, KeypointName::LeftWrist),
            (KeypointName::RightElbow, KeypointName::RightWrist),
            (KeypointName::LeftShoulder, KeypointName::RightShoulder),
            (KeypointName::LeftShoulder, KeypointName::LeftHip),
            (KeypointName::RightShoulder, KeypointName::RightHip),
            (KeypointName::LeftHip, KeypointName::RightHip),
            (KeypointName::LeftHip, KeypointName::LeftKnee),
            (KeypointName::RightHip, KeypointName::RightKnee),
            (KeypointName::LeftKnee, KeypointName::LeftAnkle),
            (KeypointName::RightKnee, KeypointName::RightAnkle),
        ]
    }
}

impl fmt::Display for KeypointName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeypointName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| Error::UnknownKeypoint(s.to_string()))
    }
}

/// A named landmark with its image position and detection confidence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub name: KeypointName,
    #[serde(flatten)]
    pub position: Position2D,
    pub confidence: f64,
}

impl Keypoint {
    pub fn new(name: KeypointName, x: f64, y: f64, confidence: f64) -> Self {
        Self {
            name,
            position: Position2D::new(x, y),
            confidence,
        }
    }

    /// A keypoint is usable only when its confidence strictly exceeds `threshold`
    pub fn is_usable(&self, threshold: f64) -> bool {
        self.confidence > threshold
    }
}

/// Keypoint as emitted by the detector; `score` is accepted for `confidence`
#[derive(Debug, Clone, Deserialize)]
struct DetectorKeypoint {
    name: String,
    x: f64,
    y: f64,
    #[serde(alias = "score", default)]
    confidence: f64,
}

#[derive(Debug, Clone, Deserialize)]
struct DetectorPose {
    #[serde(default)]
    keypoints: Vec<DetectorKeypoint>,
}

impl TryFrom<DetectorPose> for Pose {
    type Error = Error;

    fn try_from(raw: DetectorPose) -> Result<Self> {
        let mut keypoints = Vec::with_capacity(raw.keypoints.len());
        for kp in raw.keypoints {
            match kp.name.parse::<KeypointName>() {
                Ok(name) => keypoints.push(Keypoint::new(name, kp.x, kp.y, kp.confidence)),
                Err(_) => tracing::debug!("Ignoring unknown landmark: {}", kp.name),
            }
        }
        Pose::new(keypoints)
    }
}

/// All keypoints detected for one subject in one frame
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "DetectorPose")]
pub struct Pose {
    keypoints: Vec<Keypoint>,
}

impl Pose {
    /// Build a pose, rejecting repeated landmark names
    pub fn new(keypoints: Vec<Keypoint>) -> Result<Self> {
        let mut seen = [false; KeypointName::COUNT];
        for kp in &keypoints {
            let slot = &mut seen[kp.name as usize];
            if *slot {
                return Err(Error::DuplicateKeypoint {
                    name: kp.name.to_string(),
                });
            }
            *slot = true;
        }
        Ok(Self { keypoints })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a single detector pose (`{"keypoints": [...]}`)
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a detector frame result: an array of zero or more poses
    pub fn detections_from_json(json: &str) -> Result<Vec<Self>> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn keypoints(&self) -> &[Keypoint] {
        &self.keypoints
    }

    pub fn len(&self) -> usize {
        self.keypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keypoints.is_empty()
    }

    pub fn get(&self, name: KeypointName) -> Option<&Keypoint> {
        self.keypoints.iter().find(|kp| kp.name == name)
    }

    /// Position of `name` if present and above the usability threshold
    pub fn usable(&self, name: KeypointName, threshold: f64) -> Option<Position2D> {
        self.get(name)
            .filter(|kp| kp.is_usable(threshold))
            .map(|kp| kp.position)
    }

    pub fn usable_count(&self, threshold: f64) -> usize {
        self.keypoints
            .iter()
            .filter(|kp| kp.is_usable(threshold))
            .count()
    }

    /// Fraction of keypoints above the threshold (0.0 for an empty pose)
    pub fn usable_ratio(&self, threshold: f64) -> f64 {
        if self.keypoints.is_empty() {
            return 0.0;
        }
        self.usable_count(threshold) as f64 / self.keypoints.len() as f64
    }

    /// Skeleton segments whose two endpoints are both usable
    pub fn visible_segments(&self, threshold: f64) -> Vec<(KeypointName, KeypointName, Segment)> {
        KeypointName::skeleton_pairs()
            .iter()
            .filter_map(|&(a, b)| {
                let from = self.usable(a, threshold)?;
                let to = self.usable(b, threshold)?;
                Some((a, b, Segment::new(from, to)))
            })
            .collect()
    }
}
