//! Posture scoring engine.
//!
//! ## Region metrics
//!
//! - Head Position: `mid_x(ears) - mid_x(shoulders)` (signed)
//! - Shoulder Alignment: `|y(left_shoulder) - y(right_shoulder)|`
//! - Spine Curvature: `|mid_x(shoulders) - mid_x(hips)|`
//!
//! A region is evaluated only when every one of its required keypoints is
//! present and usable. The composite score is the weighted mean of the
//! evaluated regions, with weights renormalized over that subset. When fewer
//! than half of the pose's keypoints are usable the detection is considered
//! unreliable and the composite is replaced by a fixed fallback score.

use posture_core::{
    KeypointName, Pose, PostureAnalysisResult, PostureIssue, PostureStatus, Region,
};

use crate::config::EngineConfig;
use crate::guidance::guidance;

/// Stateless posture scorer; holds only immutable configuration
#[derive(Debug, Clone, Default)]
pub struct PostureEngine {
    config: EngineConfig,
}

impl PostureEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Raw geometric metric for `region`, or `None` if it cannot be evaluated
    /// (a required keypoint is missing or unusable, or a coordinate is not finite)
    pub fn measure(&self, pose: &Pose, region: Region) -> Option<f64> {
        let threshold = self.config.usability_threshold;
        let at = |name: KeypointName| pose.usable(name, threshold);

        if !region.required_keypoints().iter().all(|&name| at(name).is_some()) {
            return None;
        }

        let shoulders = at(KeypointName::LeftShoulder)?.midpoint(&at(KeypointName::RightShoulder)?);

        let metric = match region {
            Region::HeadPosition => {
                let ears = at(KeypointName::LeftEar)?.midpoint(&at(KeypointName::RightEar)?);
                Some(ears.horizontal_offset(&shoulders))
            }
            Region::ShoulderAlignment => Some(
                at(KeypointName::LeftShoulder)?.vertical_gap(&at(KeypointName::RightShoulder)?),
            ),
            Region::SpineCurvature => {
                let hips = at(KeypointName::LeftHip)?.midpoint(&at(KeypointName::RightHip)?);
                Some(shoulders.horizontal_offset(&hips).abs())
            }
        }?;

        // Non-finite coordinates cannot be placed in any band
        metric.is_finite().then_some(metric)
    }

    /// Score and classify a single region
    pub fn evaluate_region(&self, pose: &Pose, region: Region) -> Option<PostureIssue> {
        let metric = self.measure(pose, region)?;
        let thresholds = self.config.thresholds(region);

        let region_score = thresholds.score.score(metric.abs());
        let severity = thresholds.severity.classify(metric);
        let text = guidance(region, severity);

        Some(PostureIssue {
            region,
            severity,
            region_score,
            description: text.description.to_string(),
            suggestions: text.suggestions.iter().map(|s| s.to_string()).collect(),
        })
    }

    /// Analyze one pose. Never fails: absent, empty or partial poses degrade
    /// to well-formed results.
    pub fn score(&self, pose: Option<&Pose>) -> PostureAnalysisResult {
        let pose = match pose {
            Some(pose) if !pose.is_empty() => pose,
            _ => return PostureAnalysisResult::empty(),
        };

        let issues: Vec<PostureIssue> = Region::ALL
            .iter()
            .filter_map(|&region| self.evaluate_region(pose, region))
            .collect();

        let usable_ratio = pose.usable_ratio(self.config.usability_threshold);
        if usable_ratio < self.config.min_usable_ratio {
            tracing::debug!(
                "Unreliable detection: {:.0}% of keypoints usable",
                usable_ratio * 100.0
            );
            return PostureAnalysisResult::new(
                self.config.low_confidence_score as f64,
                issues,
                self.config.good_posture_score,
            );
        }

        let (weighted, total_weight) = issues.iter().fold((0.0, 0.0), |(sum, total), issue| {
            let weight = self.config.weights.weight(issue.region);
            (sum + issue.region_score as f64 * weight, total + weight)
        });
        let composite = if total_weight > 0.0 {
            weighted / total_weight
        } else {
            0.0
        };

        let result = PostureAnalysisResult::new(composite, issues, self.config.good_posture_score);
        tracing::debug!(
            "Posture score {} across {} regions",
            result.overall_score(),
            result.issues().len()
        );
        result
    }

    /// Display tier for a score under this engine's cut-offs
    pub fn status(&self, overall_score: u8) -> PostureStatus {
        PostureStatus::from_score(
            overall_score,
            self.config.good_posture_score,
            self.config.warning_score,
        )
    }
}

/// Score a pose with the default configuration
pub fn score(pose: Option<&Pose>) -> PostureAnalysisResult {
    PostureEngine::default().score(pose)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use posture_core::{Keypoint, KeypointName, Pose};

    /// Upright subject: ears over shoulders over hips, shoulders level
    pub fn aligned_keypoints() -> Vec<Keypoint> {
        use KeypointName::*;
        [
            (Nose, 320.0, 100.0),
            (LeftEye, 330.0, 90.0),
            (RightEye, 310.0, 90.0),
            (LeftEar, 345.0, 100.0),
            (RightEar, 295.0, 100.0),
            (LeftShoulder, 380.0, 200.0),
            (RightShoulder, 260.0, 200.0),
            (LeftElbow, 400.0, 300.0),
            (RightElbow, 240.0, 300.0),
            (LeftWrist, 405.0, 380.0),
            (RightWrist, 235.0, 380.0),
            (LeftHip, 360.0, 400.0),
            (RightHip, 280.0, 400.0),
            (LeftKnee, 360.0, 520.0),
            (RightKnee, 280.0, 520.0),
            (LeftAnkle, 360.0, 640.0),
            (RightAnkle, 280.0, 640.0),
        ]
        .into_iter()
        .map(|(name, x, y)| Keypoint::new(name, x, y, 0.9))
        .collect()
    }

    pub fn aligned_pose() -> Pose {
        Pose::new(aligned_keypoints()).unwrap()
    }

    /// Aligned pose with both ears moved `offset` pixels along x
    pub fn head_offset_pose(offset: f64) -> Pose {
        let keypoints = aligned_keypoints()
            .into_iter()
            .map(|mut kp| {
                if matches!(kp.name, KeypointName::LeftEar | KeypointName::RightEar) {
                    kp.position.x += offset;
                }
                kp
            })
            .collect();
        Pose::new(keypoints).unwrap()
    }

    pub fn without(pose: &Pose, names: &[KeypointName]) -> Pose {
        let keypoints = pose
            .keypoints()
            .iter()
            .filter(|kp| !names.contains(&kp.name))
            .copied()
            .collect();
        Pose::new(keypoints).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use posture_core::{Keypoint, Severity};

    #[test]
    fn test_absent_and_empty_pose() {
        let engine = PostureEngine::default();
        for result in [engine.score(None), engine.score(Some(&Pose::empty()))] {
            assert_eq!(result.overall_score(), 0);
            assert!(!result.is_good_posture());
            assert!(result.issues().is_empty());
        }
    }

    #[test]
    fn test_aligned_pose_scores_perfectly() {
        let result = score(Some(&aligned_pose()));
        assert_eq!(result.overall_score(), 100);
        assert!(result.is_good_posture());
        assert_eq!(result.issues().len(), 3);
        for issue in result.issues() {
            assert_eq!(issue.region_score, 100);
            assert_eq!(issue.severity, Severity::None);
            assert!(issue.suggestions.is_empty());
        }
    }

    #[test]
    fn test_forward_head_offset_25() {
        let pose = head_offset_pose(25.0);
        let engine = PostureEngine::default();
        assert_eq!(engine.measure(&pose, Region::HeadPosition), Some(25.0));

        let result = engine.score(Some(&pose));
        let head = result.issue(Region::HeadPosition).unwrap();
        assert_eq!(head.region_score, 70);
        assert_eq!(head.severity, Severity::Moderate);
        assert_eq!(head.description, "Forward head posture detected");
        assert!(head.suggestions.iter().any(|s| s.to_lowercase().contains("chin tucks")));
        assert!(head.suggestions.iter().any(|s| s.contains("monitor")));

        // 0.3 * 70 + 0.3 * 100 + 0.4 * 100
        assert_eq!(result.overall_score(), 91);
        assert!(result.is_good_posture());
    }

    #[test]
    fn test_backward_head_scores_but_raises_no_issue() {
        let result = score(Some(&head_offset_pose(-25.0)));
        let head = result.issue(Region::HeadPosition).unwrap();
        assert_eq!(head.region_score, 70);
        assert_eq!(head.severity, Severity::None);
    }

    #[test]
    fn test_missing_hips_reweights_head_and_shoulders() {
        let pose = without(
            &head_offset_pose(25.0),
            &[KeypointName::LeftHip, KeypointName::RightHip],
        );
        let result = score(Some(&pose));

        assert!(result.issue(Region::SpineCurvature).is_none());
        assert_eq!(result.issues().len(), 2);
        // (70 + 100) / 2
        assert_eq!(result.overall_score(), 85);
        assert!(result.is_good_posture());
    }

    #[test]
    fn test_low_confidence_hip_is_not_usable() {
        let keypoints = aligned_keypoints()
            .into_iter()
            .map(|mut kp| {
                if kp.name == KeypointName::LeftHip {
                    kp.confidence = 0.3;
                }
                kp
            })
            .collect();
        let result = score(Some(&Pose::new(keypoints).unwrap()));
        assert!(result.issue(Region::SpineCurvature).is_none());
        assert_eq!(result.overall_score(), 100);
    }

    #[test]
    fn test_non_finite_coordinate_skips_region() {
        let keypoints = aligned_keypoints()
            .into_iter()
            .map(|mut kp| {
                if kp.name == KeypointName::LeftEar {
                    kp.position.x = f64::NAN;
                }
                kp
            })
            .collect();
        let pose = Pose::new(keypoints).unwrap();
        let engine = PostureEngine::default();
        assert_eq!(engine.measure(&pose, Region::HeadPosition), None);

        let result = engine.score(Some(&pose));
        assert!(result.issue(Region::HeadPosition).is_none());
        assert_eq!(result.issues().len(), 2);
        assert_eq!(result.overall_score(), 100);
    }

    #[test]
    fn test_unreliable_detection_falls_back_to_50() {
        // 8 of 17 keypoints usable; geometry is perfect but ignored
        let keypoints = aligned_keypoints()
            .into_iter()
            .enumerate()
            .map(|(i, mut kp)| {
                if i >= 8 {
                    kp.confidence = 0.1;
                }
                kp
            })
            .collect();
        let result = score(Some(&Pose::new(keypoints).unwrap()));
        assert_eq!(result.overall_score(), 50);
        assert!(!result.is_good_posture());
    }

    #[test]
    fn test_exactly_half_usable_is_scored_normally() {
        let pose = Pose::new(vec![
            Keypoint::new(KeypointName::LeftShoulder, 100.0, 200.0, 0.9),
            Keypoint::new(KeypointName::RightShoulder, 200.0, 225.0, 0.9),
            Keypoint::new(KeypointName::LeftKnee, 100.0, 400.0, 0.1),
            Keypoint::new(KeypointName::RightKnee, 200.0, 400.0, 0.1),
        ])
        .unwrap();
        let result = score(Some(&pose));
        let shoulder = result.issue(Region::ShoulderAlignment).unwrap();
        assert_eq!(shoulder.region_score, 60);
        assert_eq!(shoulder.severity, Severity::Moderate);
        assert_eq!(result.overall_score(), 60);
        assert!(!result.is_good_posture());
    }

    #[test]
    fn test_no_evaluable_region_scores_zero() {
        let pose = Pose::new(vec![
            Keypoint::new(KeypointName::LeftKnee, 100.0, 400.0, 0.9),
            Keypoint::new(KeypointName::RightKnee, 200.0, 400.0, 0.9),
        ])
        .unwrap();
        let result = score(Some(&pose));
        assert_eq!(result.overall_score(), 0);
        assert!(result.issues().is_empty());
    }

    #[test]
    fn test_spine_high_severity() {
        let keypoints = aligned_keypoints()
            .into_iter()
            .map(|mut kp| {
                if matches!(kp.name, KeypointName::LeftHip | KeypointName::RightHip) {
                    kp.position.x -= 35.0;
                }
                kp
            })
            .collect();
        let result = score(Some(&Pose::new(keypoints).unwrap()));
        let spine = result.issue(Region::SpineCurvature).unwrap();
        assert_eq!(spine.severity, Severity::High);
        assert_eq!(spine.region_score, 50);
        // 0.3 * 100 + 0.3 * 100 + 0.4 * 50
        assert_eq!(result.overall_score(), 80);
        assert_eq!(PostureEngine::default().status(result.overall_score()), PostureStatus::Warning);
    }

    #[test]
    fn test_score_is_bounded_and_consistent() {
        let engine = PostureEngine::default();
        for offset in [-80.0, -30.0, -12.0, 0.0, 9.0, 15.0, 22.0, 29.0, 31.0, 200.0] {
            let result = engine.score(Some(&head_offset_pose(offset)));
            assert!(result.overall_score() <= 100);
            assert_eq!(result.is_good_posture(), result.overall_score() >= 85);
        }
    }

    #[test]
    fn test_scoring_is_idempotent() {
        let pose = head_offset_pose(17.5);
        let engine = PostureEngine::default();
        assert_eq!(engine.score(Some(&pose)), engine.score(Some(&pose)));
    }
}
