//! Session-keyed posture monitor driving the per-frame sampling loop.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use posture_core::{
    Error, ExerciseRecommendation, Pose, PostureAnalysisResult, Result, SessionId, Timestamp,
};
use tokio::sync::{watch, RwLock};
use tokio::time::MissedTickBehavior;

use crate::config::{MonitorConfig, PostureConfig};
use crate::scoring::PostureEngine;
use crate::session::{PostureRecord, PostureSession, SessionStats};

/// Upstream pose detector sampled once per tick
#[async_trait]
pub trait PoseSource: Send {
    /// Detect subjects in the current frame; zero or more poses
    async fn detect(&mut self) -> Result<Vec<Pose>>;
}

/// Posture monitor tracking any number of concurrent sessions
pub struct PostureMonitor {
    engine: PostureEngine,
    config: MonitorConfig,
    sessions: RwLock<HashMap<SessionId, PostureSession>>,
}

impl PostureMonitor {
    pub fn new(config: PostureConfig) -> Self {
        Self {
            engine: PostureEngine::new(config.engine),
            config: config.monitor,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn engine(&self) -> &PostureEngine {
        &self.engine
    }

    pub async fn start_session(&self) -> SessionId {
        let session_id = SessionId::new();
        let session = PostureSession::new(session_id, Timestamp::now(), self.engine.config());

        let mut sessions = self.sessions.write().await;
        sessions.insert(session_id, session);

        tracing::info!("Started posture session {}", session_id);
        session_id
    }

    /// Score one sampled frame and fold it into the session
    pub async fn process_frame(
        &self,
        session_id: SessionId,
        pose: Option<&Pose>,
    ) -> Result<Option<PostureAnalysisResult>> {
        let result = pose.map(|pose| self.engine.score(Some(pose)));

        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&session_id)
            .ok_or_else(|| Error::SessionNotFound(session_id.to_string()))?;
        session.record(result.as_ref());

        Ok(result)
    }

    pub async fn session_stats(&self, session_id: SessionId) -> Option<SessionStats> {
        let sessions = self.sessions.read().await;
        sessions.get(&session_id).map(|s| s.stats(Timestamp::now()))
    }

    pub async fn recommendations(
        &self,
        session_id: SessionId,
    ) -> Option<Vec<ExerciseRecommendation>> {
        let sessions = self.sessions.read().await;
        sessions.get(&session_id).map(|s| s.recommendations())
    }

    pub async fn active_sessions(&self) -> Vec<SessionId> {
        let sessions = self.sessions.read().await;
        sessions.keys().copied().collect()
    }

    /// Remove the session and return its summary record
    pub async fn end_session(&self, session_id: SessionId) -> Result<PostureRecord> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .remove(&session_id)
            .ok_or_else(|| Error::SessionNotFound(session_id.to_string()))?;

        let record = session.finish(Timestamp::now());
        tracing::info!(
            "Ended posture session {} after {}s with score {}",
            session_id,
            record.session_duration_secs,
            record.score
        );
        Ok(record)
    }

    /// Sample `source` at the configured cadence until `shutdown` becomes true.
    ///
    /// Only the first detected pose of each frame is scored. Detector errors
    /// are logged and the tick skipped. Returns the number of ticks recorded.
    pub async fn run_sampling<S>(
        &self,
        session_id: SessionId,
        source: &mut S,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<u64>
    where
        S: PoseSource + ?Sized,
    {
        let period = Duration::from_millis(self.config.sample_interval_ms.max(1));
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut ticks = 0u64;
        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        // Sender dropped: nobody can stop us any more
                        break;
                    }
                }
                _ = ticker.tick() => {
                    match source.detect().await {
                        Ok(poses) => {
                            let pose = poses.into_iter().next();
                            self.process_frame(session_id, pose.as_ref()).await?;
                            ticks += 1;
                        }
                        Err(e) => {
                            tracing::warn!("Pose detection failed: {}", e);
                        }
                    }
                }
            }
        }

        tracing::debug!("Sampling stopped for session {} after {} ticks", session_id, ticks);
        Ok(ticks)
    }
}

impl Default for PostureMonitor {
    fn default() -> Self {
        Self::new(PostureConfig::default())
    }
}
