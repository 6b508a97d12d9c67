//! Posture analysis result types: regions, severities, issues and
//! exercise recommendations.

use serde::{Deserialize, Serialize};

use crate::types::KeypointName;

/// Posture dimension evaluated by the scoring engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    HeadPosition,
    ShoulderAlignment,
    SpineCurvature,
}

impl Region {
    pub const ALL: [Region; 3] = [
        Region::HeadPosition,
        Region::ShoulderAlignment,
        Region::SpineCurvature,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Region::HeadPosition => "Head Position",
            Region::ShoulderAlignment => "Shoulder Alignment",
            Region::SpineCurvature => "Spine Curvature",
        }
    }

    /// Keypoints that must all be usable for the region to be evaluated
    pub fn required_keypoints(&self) -> &'static [KeypointName] {
        match self {
            Region::HeadPosition => &[
                KeypointName::Nose,
                KeypointName::LeftEar,
                KeypointName::RightEar,
                KeypointName::LeftShoulder,
                KeypointName::RightShoulder,
            ],
            Region::ShoulderAlignment => {
                &[KeypointName::LeftShoulder, KeypointName::RightShoulder]
            }
            Region::SpineCurvature => &[
                KeypointName::Nose,
                KeypointName::LeftShoulder,
                KeypointName::RightShoulder,
                KeypointName::LeftHip,
                KeypointName::RightHip,
            ],
        }
    }
}

/// Severity of a detected posture issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    None,
    Mild,
    Moderate,
    High,
}

impl Severity {
    pub fn is_actionable(&self) -> bool {
        *self != Severity::None
    }

    pub fn status_type(&self) -> StatusType {
        match self {
            Severity::None => StatusType::Success,
            Severity::Mild | Severity::Moderate => StatusType::Warning,
            Severity::High => StatusType::Danger,
        }
    }

    /// Human-readable status shown next to a region
    pub fn label(&self) -> &'static str {
        match self {
            Severity::None => "Good",
            Severity::Mild => "Fair",
            Severity::Moderate | Severity::High => "Poor",
        }
    }
}

/// Colour class used when rendering a severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusType {
    Success,
    Warning,
    Danger,
}

/// Three-tier badge derived from an overall score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostureStatus {
    Good,
    Warning,
    Bad,
}

impl PostureStatus {
    pub fn from_score(score: u8, good_threshold: u8, warning_threshold: u8) -> Self {
        if score >= good_threshold {
            PostureStatus::Good
        } else if score >= warning_threshold {
            PostureStatus::Warning
        } else {
            PostureStatus::Bad
        }
    }
}

/// Findings for one evaluable region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostureIssue {
    pub region: Region,
    pub severity: Severity,
    pub region_score: u8,
    pub description: String,
    pub suggestions: Vec<String>,
}

/// Outcome of scoring one pose.
///
/// Fields are read-only so the verdict always matches the score it was
/// derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostureAnalysisResult {
    overall_score: u8,
    is_good_posture: bool,
    issues: Vec<PostureIssue>,
}

impl PostureAnalysisResult {
    /// Clamp `score` to [0, 100] and derive the verdict from it
    pub fn new(score: f64, issues: Vec<PostureIssue>, good_threshold: u8) -> Self {
        let overall_score = if score.is_finite() {
            score.round().clamp(0.0, 100.0) as u8
        } else {
            0
        };
        Self {
            overall_score,
            is_good_posture: overall_score >= good_threshold,
            issues,
        }
    }

    /// Result for an absent or empty pose
    pub fn empty() -> Self {
        Self {
            overall_score: 0,
            is_good_posture: false,
            issues: Vec::new(),
        }
    }

    pub fn overall_score(&self) -> u8 {
        self.overall_score
    }

    pub fn is_good_posture(&self) -> bool {
        self.is_good_posture
    }

    /// One entry per evaluated region
    pub fn issues(&self) -> &[PostureIssue] {
        &self.issues
    }

    pub fn into_issues(self) -> Vec<PostureIssue> {
        self.issues
    }

    pub fn issue(&self, region: Region) -> Option<&PostureIssue> {
        self.issues.iter().find(|issue| issue.region == region)
    }
}

/// Priority attached to an exercise recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// A suggested corrective exercise
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseRecommendation {
    pub id: String,
    pub name: String,
    pub description: String,
    pub priority: Priority,
}
