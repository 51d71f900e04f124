use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{debug, error, info, info_span, Instrument};
use uuid::Uuid;

use crate::api::AppState;
use crate::engagement::calculate_engagement;
use crate::error::{AppError, Result};
use crate::models::AnalysisResult;
use crate::ranking::select_top_comments;
use crate::recommendation::generate_recommendation;
use crate::sentiment::analyze_comments;
use crate::store::AnalysisStore;

/// One submitted analysis.
#[derive(Debug, Clone)]
pub struct AnalysisJob {
    pub job_id: Uuid,
    pub video_id: String,
    pub comment_count: usize,
    pub deep_analysis: bool,
}

/// Runs the job on a detached task. The caller does not wait for it.
pub fn spawn_analysis(state: Arc<AppState>, job: AnalysisJob) -> JoinHandle<()> {
    let span = info_span!("analysis", video_id = %job.video_id, job_id = %job.job_id);
    tokio::spawn(run_analysis(state, job).instrument(span))
}

/// Runs the pipeline and records the outcome. Any step failure ends the job
/// at progress -1 with nothing persisted; there is no retry.
pub async fn run_analysis(state: Arc<AppState>, job: AnalysisJob) {
    info!(
        "🚀 Analysis started ({} comments, deep: {})",
        job.comment_count, job.deep_analysis
    );

    match process_job(&state, &job).await {
        Ok(result) => {
            if state.store.complete_job(job.job_id, result) {
                info!("✅ Analysis for {} completed", job.video_id);
            }
        }
        Err(e) => {
            error!("❌ Analysis for {} failed: {}", job.video_id, e);
            state.store.fail_job(&job.video_id, job.job_id);
        }
    }
}

async fn process_job(state: &AppState, job: &AnalysisJob) -> Result<AnalysisResult> {
    let checkpoint = |progress: i32| -> Result<()> {
        debug!("progress {}%", progress);
        if state.store.update_progress(&job.video_id, job.job_id, progress) {
            Ok(())
        } else {
            Err(AppError::Conflict(format!(
                "job {} no longer owns the progress entry",
                job.job_id
            )))
        }
    };

    checkpoint(10)?;

    // 1. Metadata
    let video = with_deadline(
        state.upstream_timeout,
        state.platform.fetch_video_details(&job.video_id),
    )
    .await?;
    checkpoint(20)?;

    // 2. Comments. Paginated, so the platform bounds each page request itself.
    let mut comments = state
        .platform
        .fetch_comments(&job.video_id, job.comment_count)
        .await?;
    checkpoint(40)?;

    // 3. Sentiment (labels comments in place)
    let sentiment = analyze_comments(&mut comments, job.deep_analysis);
    checkpoint(60)?;

    // 4. Engagement
    let engagement = calculate_engagement(&video, &comments);
    checkpoint(70)?;

    // 5. Verdict
    let recommendation = generate_recommendation(&sentiment, &engagement);
    checkpoint(80)?;

    // 6. Comments for display
    let top_comments = select_top_comments(&comments, &sentiment);
    checkpoint(90)?;

    info!(
        "🧠 {}: score {:.1} ({})",
        job.video_id, recommendation.score, recommendation.verdict
    );

    Ok(AnalysisResult {
        video_id: job.video_id.clone(),
        video_details: video,
        sentiment_analysis: sentiment,
        top_comments,
        engagement_metrics: engagement,
        recommendation,
        analyzed_at: Utc::now(),
    })
}

/// Applies the upstream deadline to a platform call.
async fn with_deadline<T, F>(limit: Duration, call: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::time::timeout(limit, call)
        .await
        .map_err(|_| AppError::Timeout(limit.as_secs()))?
}

/// Schedules the periodic removal of progress entries older than `ttl`.
pub async fn start_progress_sweeper(
    store: Arc<AnalysisStore>,
    schedule: &str,
    ttl: Duration,
) -> anyhow::Result<JobScheduler> {
    let ttl = chrono::Duration::from_std(ttl)?;
    let scheduler = JobScheduler::new().await?;

    let sweep = Job::new_async(schedule, move |_uuid, _l| {
        let store = store.clone();
        Box::pin(async move {
            let removed = store.expire_progress_before(Utc::now() - ttl);
            if removed > 0 {
                info!(
                    "🧹 Expired {} progress entries ({} still tracked)",
                    removed,
                    store.tracked_jobs()
                );
            }
        })
    })?;

    scheduler.add(sweep).await?;
    scheduler.start().await?;
    info!("Progress sweeper scheduled ({})", schedule);

    Ok(scheduler)
}
