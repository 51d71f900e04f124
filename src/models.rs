//! Domain types shared by the fetchers, the scoring pipeline and the API.
//!
//! All types serialize with camelCase field names, which is the shape the
//! report page consumes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Metadata for a single video, immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoMetadata {
    #[schema(example = "dQw4w9WgXcQ")]
    pub id: String,
    pub title: String,
    pub channel_title: String,
    pub thumbnail_url: String,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub published_at: DateTime<Utc>,
    /// Duration in whole seconds
    pub duration: u64,
}

/// Per-comment sentiment bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
pub enum Sentiment {
    Positive,
    #[default]
    Neutral,
    Negative,
}

/// A top-level comment. `sentiment` starts out Neutral and is assigned by the scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub author_display_name: String,
    pub author_profile_image_url: String,
    pub published_at: DateTime<Utc>,
    pub text: String,
    pub like_count: u64,
    pub reply_count: u64,
    #[serde(default)]
    pub sentiment: Sentiment,
}

/// Bucket ratios over the analyzed comments plus a canned summary per bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SentimentSummary {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
    pub positive_feedback: String,
    pub neutral_feedback: String,
    pub negative_feedback: String,
}

/// Raw counts shown next to the engagement ratios. Shares and subscriptions
/// are fixed fractions of the view count, not real signals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EngagementCounts {
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
    pub subscriptions: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EngagementSummary {
    pub engagement_rate: f64,
    pub engagement_rate_avg_diff: f64,
    pub like_to_view_ratio: f64,
    pub like_to_view_ratio_avg_diff: f64,
    pub comment_to_view_ratio: f64,
    pub comment_to_view_ratio_avg_diff: f64,
    /// Heuristic watch-through estimate in percent, at most 95
    pub audience_retention: u32,
    pub audience_retention_status: String,
    pub metrics: EngagementCounts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Verdict {
    #[serde(rename = "Highly Recommended")]
    HighlyRecommended,
    #[serde(rename = "Neutral")]
    Neutral,
    #[serde(rename = "Not Recommended")]
    NotRecommended,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Verdict::HighlyRecommended => "Highly Recommended",
            Verdict::Neutral => "Neutral",
            Verdict::NotRecommended => "Not Recommended",
        };
        f.write_str(label)
    }
}

/// Final verdict. `score` is nominally 0..=100 but is not clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Recommendation {
    pub verdict: Verdict,
    pub score: f64,
}

/// Everything produced by one analysis job, keyed by video id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub video_id: String,
    pub video_details: VideoMetadata,
    pub sentiment_analysis: SentimentSummary,
    pub top_comments: Vec<Comment>,
    pub engagement_metrics: EngagementSummary,
    pub recommendation: Recommendation,
    pub analyzed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_verdict_serializes_as_display_label() {
        assert_eq!(
            serde_json::to_value(Verdict::HighlyRecommended).unwrap(),
            json!("Highly Recommended")
        );
        assert_eq!(
            serde_json::to_value(Verdict::NotRecommended).unwrap(),
            json!("Not Recommended")
        );
        let parsed: Verdict = serde_json::from_value(json!("Neutral")).unwrap();
        assert_eq!(parsed, Verdict::Neutral);
    }

    #[test]
    fn test_comment_defaults_to_neutral() {
        let comment: Comment = serde_json::from_value(json!({
            "id": "c1",
            "authorDisplayName": "someone",
            "authorProfileImageUrl": "",
            "publishedAt": "2024-01-01T00:00:00Z",
            "text": "hello",
            "likeCount": 1,
            "replyCount": 0
        }))
        .unwrap();
        assert_eq!(comment.sentiment, Sentiment::Neutral);
    }

    #[test]
    fn test_non_finite_ratio_serializes_as_null() {
        let summary = EngagementSummary {
            engagement_rate: f64::NAN,
            engagement_rate_avg_diff: f64::NAN,
            like_to_view_ratio: f64::INFINITY,
            like_to_view_ratio_avg_diff: f64::INFINITY,
            comment_to_view_ratio: 0.0,
            comment_to_view_ratio_avg_diff: -0.001,
            audience_retention: 80,
            audience_retention_status: "Strong retention rate".to_string(),
            metrics: EngagementCounts {
                likes: 1,
                comments: 0,
                shares: 0,
                subscriptions: 0,
            },
        };
        let value = serde_json::to_value(&summary).unwrap();
        assert!(value["engagementRate"].is_null());
        assert!(value["likeToViewRatio"].is_null());
        assert_eq!(value["audienceRetention"], json!(80));
    }
}
