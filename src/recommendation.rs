//! Combines sentiment and engagement into a single score and verdict.

use crate::models::{EngagementSummary, Recommendation, SentimentSummary, Verdict};

pub const HIGHLY_RECOMMENDED_THRESHOLD: f64 = 70.0;
pub const NEUTRAL_THRESHOLD: f64 = 40.0;

/// Upper bound of the engagement contribution.
pub const ENGAGEMENT_CAP: f64 = 30.0;

/// Engagement points before capping: 0.01 like ratio is 30 points,
/// 0.001 comment ratio is 10 points, 50% retention is 5 points.
pub fn engagement_points(engagement: &EngagementSummary) -> f64 {
    engagement.like_to_view_ratio * 3000.0
        + engagement.comment_to_view_ratio * 10000.0
        + (engagement.audience_retention as f64 / 100.0) * 10.0
}

pub fn verdict_for(score: f64) -> Verdict {
    if score >= HIGHLY_RECOMMENDED_THRESHOLD {
        Verdict::HighlyRecommended
    } else if score >= NEUTRAL_THRESHOLD {
        Verdict::Neutral
    } else {
        Verdict::NotRecommended
    }
}

/// Scores a video. Sentiment contributes up to 70 points (neutral comments
/// count half), engagement up to 30. The result is not clamped, so inflated
/// deep-mode ratios can push it past 100.
pub fn generate_recommendation(
    sentiment: &SentimentSummary,
    engagement: &EngagementSummary,
) -> Recommendation {
    let mut score = sentiment.positive * 70.0 + sentiment.neutral * 35.0;
    score += engagement_points(engagement).min(ENGAGEMENT_CAP);

    Recommendation {
        verdict: verdict_for(score),
        score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engagement::{calculate_engagement, tests::video};

    fn sentiment(positive: f64, neutral: f64, negative: f64) -> SentimentSummary {
        SentimentSummary {
            positive,
            neutral,
            negative,
            positive_feedback: String::new(),
            neutral_feedback: String::new(),
            negative_feedback: String::new(),
        }
    }

    #[test]
    fn test_verdict_boundaries() {
        assert_eq!(verdict_for(70.0), Verdict::HighlyRecommended);
        assert_eq!(verdict_for(69.999), Verdict::Neutral);
        assert_eq!(verdict_for(40.0), Verdict::Neutral);
        assert_eq!(verdict_for(39.999), Verdict::NotRecommended);
        assert_eq!(verdict_for(-5.0), Verdict::NotRecommended);
    }

    #[test]
    fn test_engagement_is_capped() {
        // 0.1 like ratio alone is worth 300 points
        let engagement = calculate_engagement(&video(1000, 100, 10, 120), &[]);
        let rec = generate_recommendation(&sentiment(0.6, 0.2, 0.2), &engagement);
        assert!((rec.score - (42.0 + 7.0 + 30.0)).abs() < 1e-9);
        assert_eq!(rec.verdict, Verdict::HighlyRecommended);
    }

    #[test]
    fn test_low_engagement_uncapped_sum() {
        // like ratio 0.001 -> 3, comment ratio 0.0001 -> 1, retention 50 -> 5
        let engagement = calculate_engagement(&video(100_000, 100, 10, 3600), &[]);
        assert_eq!(engagement.audience_retention, 50);
        let points = engagement_points(&engagement);
        assert!((points - 9.0).abs() < 1e-9);

        let rec = generate_recommendation(&sentiment(0.2, 0.4, 0.4), &engagement);
        assert!((rec.score - (14.0 + 14.0 + 9.0)).abs() < 1e-9);
        assert_eq!(rec.verdict, Verdict::NotRecommended);
    }

    #[test]
    fn test_score_is_not_clamped() {
        let engagement = calculate_engagement(&video(1000, 100, 10, 120), &[]);
        // deep mode can produce ratios above 1
        let rec = generate_recommendation(&sentiment(1.5, 0.5, 0.0), &engagement);
        assert!(rec.score > 100.0);
        assert_eq!(rec.verdict, Verdict::HighlyRecommended);
    }
}
