//! In-memory job progress and result storage.
//!
//! One `AnalysisStore` is created at startup and shared through the app
//! state. Progress entries are owned by the job that created them: writes
//! carrying another job id are ignored, so progress for a job only moves
//! forward and a superseded job cannot clobber its successor.

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::warn;
use uuid::Uuid;

use crate::models::AnalysisResult;

pub const PROGRESS_QUEUED: i32 = 0;
pub const PROGRESS_COMPLETE: i32 = 100;
pub const PROGRESS_FAILED: i32 = -1;

#[derive(Debug, Clone, PartialEq)]
pub struct JobProgress {
    pub job_id: Uuid,
    /// 0..=100, or -1 after a failure
    pub progress: i32,
    pub updated_at: DateTime<Utc>,
}

impl JobProgress {
    fn queued(job_id: Uuid) -> Self {
        Self {
            job_id,
            progress: PROGRESS_QUEUED,
            updated_at: Utc::now(),
        }
    }

    pub fn is_running(&self) -> bool {
        (PROGRESS_QUEUED..PROGRESS_COMPLETE).contains(&self.progress)
    }

    pub fn is_failed(&self) -> bool {
        self.progress == PROGRESS_FAILED
    }
}

#[derive(Debug, Default)]
pub struct AnalysisStore {
    progress: DashMap<String, JobProgress>,
    results: DashMap<String, AnalysisResult>,
}

impl AnalysisStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new job for `video_id` at progress 0.
    ///
    /// Returns the current progress instead when a job for the same video is
    /// still in flight. Finished or failed entries are replaced.
    pub fn begin_job(&self, video_id: &str) -> Result<Uuid, i32> {
        let job_id = Uuid::new_v4();
        match self.progress.entry(video_id.to_string()) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().is_running() {
                    return Err(occupied.get().progress);
                }
                occupied.insert(JobProgress::queued(job_id));
            }
            Entry::Vacant(vacant) => {
                vacant.insert(JobProgress::queued(job_id));
            }
        }
        Ok(job_id)
    }

    /// Moves the job to `progress`. Returns false if `job_id` no longer owns the entry.
    pub fn update_progress(&self, video_id: &str, job_id: Uuid, progress: i32) -> bool {
        match self.progress.get_mut(video_id) {
            Some(mut entry) if entry.job_id == job_id => {
                entry.progress = progress;
                entry.updated_at = Utc::now();
                true
            }
            _ => false,
        }
    }

    pub fn fail_job(&self, video_id: &str, job_id: Uuid) -> bool {
        self.update_progress(video_id, job_id, PROGRESS_FAILED)
    }

    /// Persists the result and marks the job complete, as one step with
    /// respect to other writers of the same video id. A job that lost
    /// ownership of its entry persists nothing.
    pub fn complete_job(&self, job_id: Uuid, result: AnalysisResult) -> bool {
        let video_id = result.video_id.clone();
        match self.progress.get_mut(&video_id) {
            Some(mut entry) if entry.job_id == job_id => {
                // Result goes in before progress reads 100
                self.save_result(result);
                entry.progress = PROGRESS_COMPLETE;
                entry.updated_at = Utc::now();
                true
            }
            _ => {
                warn!("Discarding result of superseded job {} for {}", job_id, video_id);
                false
            }
        }
    }

    pub fn progress(&self, video_id: &str) -> Option<i32> {
        self.progress.get(video_id).map(|entry| entry.progress)
    }

    pub fn job(&self, video_id: &str) -> Option<JobProgress> {
        self.progress.get(video_id).map(|entry| entry.value().clone())
    }

    pub fn result(&self, video_id: &str) -> Option<AnalysisResult> {
        self.results.get(video_id).map(|entry| entry.value().clone())
    }

    /// Stores a result, replacing any earlier one for the same video.
    pub fn save_result(&self, result: AnalysisResult) {
        self.results.insert(result.video_id.clone(), result);
    }

    /// Drops progress entries not updated since `cutoff`. Returns how many were removed.
    pub fn expire_progress_before(&self, cutoff: DateTime<Utc>) -> usize {
        let mut removed = 0;
        self.progress.retain(|_, entry| {
            let keep = entry.updated_at >= cutoff;
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    pub fn tracked_jobs(&self) -> usize {
        self.progress.len()
    }
}
