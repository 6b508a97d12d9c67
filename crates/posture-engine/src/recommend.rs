//! Exercise recommendations derived from posture issues.
//!
//! | Region | Exercises |
//! |--------|-----------|
//! | Head Position | Chin Tucks |
//! | Shoulder Alignment | Shoulder Blade Squeezes, Wall Angels |
//! | Spine Curvature | Cat-Cow Stretch |
//!
//! Region exercises are `high` priority for `high` severity issues and
//! `medium` otherwise. With nothing actionable a low-priority reminder is
//! suggested instead, and a movement-break recommendation is always appended.

use posture_core::{ExerciseRecommendation, PostureIssue, Priority, Region, Severity};

struct Exercise {
    id: &'static str,
    name: &'static str,
    description: &'static str,
}

impl Exercise {
    fn recommend(&self, priority: Priority) -> ExerciseRecommendation {
        ExerciseRecommendation {
            id: self.id.to_string(),
            name: self.name.to_string(),
            description: self.description.to_string(),
            priority,
        }
    }
}

const REGION_EXERCISES: &[(Region, &[Exercise])] = &[
    (
        Region::HeadPosition,
        &[Exercise {
            id: "chin-tucks",
            name: "Chin Tucks",
            description: "Helps correct forward head posture",
        }],
    ),
    (
        Region::ShoulderAlignment,
        &[
            Exercise {
                id: "shoulder-blade-squeezes",
                name: "Shoulder Blade Squeezes",
                description: "Helps with shoulder alignment and posture",
            },
            Exercise {
                id: "wall-angels",
                name: "Wall Angels",
                description: "Improves shoulder mobility and alignment",
            },
        ],
    ),
    (
        Region::SpineCurvature,
        &[Exercise {
            id: "cat-cow-stretch",
            name: "Cat-Cow Stretch",
            description: "Improves spine flexibility and alignment",
        }],
    ),
];

const POSTURE_CHECKS: Exercise = Exercise {
    id: "posture-check-reminder",
    name: "Regular Posture Checks",
    description: "Set reminders to check your posture throughout the day",
};

const MOVEMENT_BREAKS: Exercise = Exercise {
    id: "movement-breaks",
    name: "Movement Breaks",
    description: "Take a short break every 25-30 minutes to stand and stretch",
};

fn exercises_for(region: Region) -> &'static [Exercise] {
    REGION_EXERCISES
        .iter()
        .find(|(r, _)| *r == region)
        .map(|(_, exercises)| *exercises)
        .unwrap_or(&[])
}

/// Map posture issues to corrective exercises
pub fn recommend(issues: &[PostureIssue]) -> Vec<ExerciseRecommendation> {
    let mut recommendations: Vec<ExerciseRecommendation> = issues
        .iter()
        .filter(|issue| issue.severity.is_actionable())
        .flat_map(|issue| {
            let priority = if issue.severity == Severity::High {
                Priority::High
            } else {
                Priority::Medium
            };
            exercises_for(issue.region)
                .iter()
                .map(move |exercise| exercise.recommend(priority))
        })
        .collect();

    if recommendations.is_empty() {
        recommendations.push(POSTURE_CHECKS.recommend(Priority::Low));
    }
    recommendations.push(MOVEMENT_BREAKS.recommend(Priority::Medium));

    recommendations
}
