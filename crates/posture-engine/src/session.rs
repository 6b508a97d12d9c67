//! Running statistics for one posture monitoring session.

use posture_core::{
    ExerciseRecommendation, PostureAnalysisResult, PostureIssue, PostureStatus, SessionId,
    Timestamp,
};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::recommend::recommend;

/// Snapshot of a session's progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub session_id: SessionId,
    pub started_at: Timestamp,
    pub elapsed_secs: u64,
    /// Sampling ticks recorded, including frames without a detected subject
    pub frames_sampled: u64,
    pub frames_with_pose: u64,
    pub good_frames: u64,
    pub warning_frames: u64,
    pub bad_frames: u64,
    /// Mean overall score over frames with a pose (0.0 before the first one)
    pub mean_score: f64,
    pub best_score: Option<u8>,
    pub worst_score: Option<u8>,
    pub current_status: Option<PostureStatus>,
}

impl SessionStats {
    /// Share of scored frames with good posture, in [0, 1]
    pub fn good_ratio(&self) -> f64 {
        if self.frames_with_pose == 0 {
            return 0.0;
        }
        self.good_frames as f64 / self.frames_with_pose as f64
    }

    /// Elapsed time as `HH:MM:SS`
    pub fn formatted_duration(&self) -> String {
        format_duration(self.elapsed_secs)
    }
}

/// Summary persisted when a session ends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostureRecord {
    pub session_id: SessionId,
    pub score: u8,
    pub issues: Vec<PostureIssue>,
    pub session_duration_secs: u64,
    pub created_at: Timestamp,
}

/// Accumulates per-frame analysis results
#[derive(Debug, Clone)]
pub struct PostureSession {
    id: SessionId,
    started_at: Timestamp,
    good_threshold: u8,
    warning_threshold: u8,
    frames_sampled: u64,
    frames_with_pose: u64,
    good_frames: u64,
    warning_frames: u64,
    bad_frames: u64,
    score_sum: u64,
    best_score: Option<u8>,
    worst_score: Option<u8>,
    last_result: Option<PostureAnalysisResult>,
}

impl PostureSession {
    pub fn new(id: SessionId, started_at: Timestamp, config: &EngineConfig) -> Self {
        Self {
            id,
            started_at,
            good_threshold: config.good_posture_score,
            warning_threshold: config.warning_score,
            frames_sampled: 0,
            frames_with_pose: 0,
            good_frames: 0,
            warning_frames: 0,
            bad_frames: 0,
            score_sum: 0,
            best_score: None,
            worst_score: None,
            last_result: None,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn last_result(&self) -> Option<&PostureAnalysisResult> {
        self.last_result.as_ref()
    }

    /// Record one sampling tick; `None` means no subject was detected
    pub fn record(&mut self, result: Option<&PostureAnalysisResult>) {
        self.frames_sampled += 1;

        let Some(result) = result else {
            return;
        };

        let score = result.overall_score();
        self.frames_with_pose += 1;
        self.score_sum += score as u64;
        self.best_score = Some(self.best_score.map_or(score, |best| best.max(score)));
        self.worst_score = Some(self.worst_score.map_or(score, |worst| worst.min(score)));

        match self.status_for(score) {
            PostureStatus::Good => self.good_frames += 1,
            PostureStatus::Warning => self.warning_frames += 1,
            PostureStatus::Bad => self.bad_frames += 1,
        }

        self.last_result = Some(result.clone());
    }

    fn status_for(&self, score: u8) -> PostureStatus {
        PostureStatus::from_score(score, self.good_threshold, self.warning_threshold)
    }

    fn mean_score(&self) -> f64 {
        if self.frames_with_pose == 0 {
            return 0.0;
        }
        self.score_sum as f64 / self.frames_with_pose as f64
    }

    pub fn stats(&self, now: Timestamp) -> SessionStats {
        SessionStats {
            session_id: self.id,
            started_at: self.started_at,
            elapsed_secs: now.secs_since(self.started_at),
            frames_sampled: self.frames_sampled,
            frames_with_pose: self.frames_with_pose,
            good_frames: self.good_frames,
            warning_frames: self.warning_frames,
            bad_frames: self.bad_frames,
            mean_score: self.mean_score(),
            best_score: self.best_score,
            worst_score: self.worst_score,
            current_status: self
                .last_result
                .as_ref()
                .map(|r| self.status_for(r.overall_score())),
        }
    }

    /// Exercises for the most recent analysis
    pub fn recommendations(&self) -> Vec<ExerciseRecommendation> {
        let issues = self
            .last_result
            .as_ref()
            .map(|r| r.issues())
            .unwrap_or(&[]);
        recommend(issues)
    }

    /// Close the session into a record: rounded mean score plus the latest issues
    pub fn finish(self, now: Timestamp) -> PostureRecord {
        let score = self.mean_score().round().clamp(0.0, 100.0) as u8;
        PostureRecord {
            session_id: self.id,
            score,
            session_duration_secs: now.secs_since(self.started_at),
            issues: self.last_result.map(|r| r.into_issues()).unwrap_or_default(),
            created_at: now,
        }
    }
}

/// Format seconds as `HH:MM:SS`
pub fn format_duration(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}
