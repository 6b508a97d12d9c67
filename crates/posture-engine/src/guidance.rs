//! Fixed issue descriptions and corrective suggestions per region and severity.

use posture_core::{Region, Severity};

/// Text attached to a posture issue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Guidance {
    pub description: &'static str,
    pub suggestions: &'static [&'static str],
}

const NO_GUIDANCE: Guidance = Guidance {
    description: "",
    suggestions: &[],
};

// The default severity tables never yield head/high, shoulder/high or
// spine/mild; those rows serve custom tables and repeat the nearest default row.
const GUIDANCE_TABLE: &[(Region, Severity, Guidance)] = &[
    (
        Region::HeadPosition,
        Severity::None,
        Guidance {
            description: "Good alignment",
            suggestions: &[],
        },
    ),
    (
        Region::HeadPosition,
        Severity::Mild,
        Guidance {
            description: "Slight forward head tilt",
            suggestions: &["Be mindful of head position"],
        },
    ),
    (
        Region::HeadPosition,
        Severity::Moderate,
        Guidance {
            description: "Forward head posture detected",
            suggestions: &["Try chin tucks exercise", "Adjust monitor height"],
        },
    ),
    (
        Region::HeadPosition,
        Severity::High,
        Guidance {
            description: "Forward head posture detected",
            suggestions: &["Try chin tucks exercise", "Adjust monitor height"],
        },
    ),
    (
        Region::ShoulderAlignment,
        Severity::None,
        Guidance {
            description: "Excellent alignment",
            suggestions: &[],
        },
    ),
    (
        Region::ShoulderAlignment,
        Severity::Mild,
        Guidance {
            description: "Slightly uneven shoulders",
            suggestions: &["Be mindful of shoulder position"],
        },
    ),
    (
        Region::ShoulderAlignment,
        Severity::Moderate,
        Guidance {
            description: "Uneven shoulders",
            suggestions: &["Focus on shoulder exercises", "Check workstation ergonomics"],
        },
    ),
    (
        Region::ShoulderAlignment,
        Severity::High,
        Guidance {
            description: "Uneven shoulders",
            suggestions: &["Focus on shoulder exercises", "Check workstation ergonomics"],
        },
    ),
    (
        Region::SpineCurvature,
        Severity::None,
        Guidance {
            description: "Good spinal alignment",
            suggestions: &[],
        },
    ),
    (
        Region::SpineCurvature,
        Severity::Mild,
        Guidance {
            description: "Mild spine curvature issue",
            suggestions: &["Be mindful of sitting straight"],
        },
    ),
    (
        Region::SpineCurvature,
        Severity::Moderate,
        Guidance {
            description: "Mild spine curvature issue",
            suggestions: &["Be mindful of sitting straight"],
        },
    ),
    (
        Region::SpineCurvature,
        Severity::High,
        Guidance {
            description: "Significant spine misalignment",
            suggestions: &["Take frequent breaks", "Consider core strengthening exercises"],
        },
    ),
];

pub fn guidance(region: Region, severity: Severity) -> Guidance {
    GUIDANCE_TABLE
        .iter()
        .find(|(r, s, _)| *r == region && *s == severity)
        .map(|(_, _, g)| *g)
        .unwrap_or(NO_GUIDANCE)
}
