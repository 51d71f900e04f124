//! Engagement ratios and the heuristic retention estimate.
//!
//! A zero view count is not guarded: the ratios become NaN or infinite and are
//! carried into the result as-is.

use crate::models::{Comment, EngagementCounts, EngagementSummary, VideoMetadata};

/// Reference values the computed ratios are compared against.
pub const AVG_ENGAGEMENT_RATE: f64 = 0.05;
pub const AVG_LIKE_TO_VIEW_RATIO: f64 = 0.02;
pub const AVG_COMMENT_TO_VIEW_RATIO: f64 = 0.001;

pub const MAX_RETENTION: u32 = 95;

const SHARES_PER_VIEW: f64 = 0.003;
const SUBSCRIPTIONS_PER_VIEW: f64 = 0.001;

/// Retention estimate from video length, before the engagement bonus.
pub fn base_retention(duration_secs: u64) -> u32 {
    let minutes = duration_secs as f64 / 60.0;
    if minutes <= 3.0 {
        80
    } else if minutes <= 10.0 {
        70
    } else if minutes <= 20.0 {
        60
    } else {
        50
    }
}

fn retention_bonus(engagement_rate: f64) -> u32 {
    if engagement_rate > 0.10 {
        10
    } else if engagement_rate > 0.05 {
        5
    } else {
        0
    }
}

/// Computes the engagement summary for a video.
///
/// The comment list does not take part in the calculation; the comment count
/// comes from the video statistics.
pub fn calculate_engagement(video: &VideoMetadata, _comments: &[Comment]) -> EngagementSummary {
    let views = video.view_count as f64;
    let likes = video.like_count as f64;
    let comment_total = video.comment_count as f64;

    let engagement_rate = (likes + comment_total) / views;
    let like_to_view_ratio = likes / views;
    let comment_to_view_ratio = comment_total / views;

    let audience_retention =
        (base_retention(video.duration) + retention_bonus(engagement_rate)).min(MAX_RETENTION);

    let audience_retention_status = if audience_retention > 70 {
        "Strong retention rate"
    } else {
        "Average retention rate"
    };

    EngagementSummary {
        engagement_rate,
        engagement_rate_avg_diff: engagement_rate - AVG_ENGAGEMENT_RATE,
        like_to_view_ratio,
        like_to_view_ratio_avg_diff: like_to_view_ratio - AVG_LIKE_TO_VIEW_RATIO,
        comment_to_view_ratio,
        comment_to_view_ratio_avg_diff: comment_to_view_ratio - AVG_COMMENT_TO_VIEW_RATIO,
        audience_retention,
        audience_retention_status: audience_retention_status.to_string(),
        metrics: EngagementCounts {
            likes: video.like_count,
            comments: video.comment_count,
            shares: (views * SHARES_PER_VIEW).floor() as u64,
            subscriptions: (views * SUBSCRIPTIONS_PER_VIEW).floor() as u64,
        },
    }
}
