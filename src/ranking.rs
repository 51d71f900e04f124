//! Picks the comments shown on the report page.

use crate::models::{Comment, Sentiment, SentimentSummary};

pub const TOP_POSITIVE: usize = 3;
pub const TOP_NEUTRAL: usize = 2;
pub const TOP_NEGATIVE: usize = 2;

/// Minimum number of comments the selection is topped up to.
pub const MIN_SELECTION: usize = 5;

/// Bucket with the highest ratio. Ties prefer Positive, then Neutral.
pub fn dominant_sentiment(summary: &SentimentSummary) -> Sentiment {
    if summary.positive >= summary.neutral && summary.positive >= summary.negative {
        Sentiment::Positive
    } else if summary.neutral >= summary.positive && summary.neutral >= summary.negative {
        Sentiment::Neutral
    } else {
        Sentiment::Negative
    }
}

/// Most-liked comments per bucket: up to 3 Positive, 2 Neutral and 2 Negative,
/// in that order. When fewer than 5 are found the selection is topped up from
/// the dominant bucket with comments not already chosen.
pub fn select_top_comments(comments: &[Comment], summary: &SentimentSummary) -> Vec<Comment> {
    // Stable sort keeps platform order among equal like counts
    let mut ranked: Vec<usize> = (0..comments.len()).collect();
    ranked.sort_by(|&a, &b| comments[b].like_count.cmp(&comments[a].like_count));

    let take_bucket = |bucket: Sentiment, limit: usize| -> Vec<usize> {
        ranked
            .iter()
            .copied()
            .filter(|&i| comments[i].sentiment == bucket)
            .take(limit)
            .collect()
    };

    let mut selected = take_bucket(Sentiment::Positive, TOP_POSITIVE);
    selected.extend(take_bucket(Sentiment::Neutral, TOP_NEUTRAL));
    selected.extend(take_bucket(Sentiment::Negative, TOP_NEGATIVE));

    if selected.len() < MIN_SELECTION {
        let dominant = dominant_sentiment(summary);
        let missing = MIN_SELECTION - selected.len();
        let backfill: Vec<usize> = ranked
            .iter()
            .copied()
            .filter(|&i| comments[i].sentiment == dominant && !selected.contains(&i))
            .take(missing)
            .collect();
        selected.extend(backfill);
    }

    selected.into_iter().map(|i| comments[i].clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentiment::{analyze_comments, tests::comment};

    fn labeled(id: &str, likes: u64, sentiment: Sentiment) -> Comment {
        let mut c = comment(id, "", likes);
        c.sentiment = sentiment;
        c
    }

    fn summary(positive: f64, neutral: f64, negative: f64) -> SentimentSummary {
        SentimentSummary {
            positive,
            neutral,
            negative,
            positive_feedback: String::new(),
            neutral_feedback: String::new(),
            negative_feedback: String::new(),
        }
    }

    fn ids(comments: &[Comment]) -> Vec<&str> {
        comments.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_takes_top_of_each_bucket() {
        let comments = vec![
            labeled("p1", 5, Sentiment::Positive),
            labeled("p2", 50, Sentiment::Positive),
            labeled("p3", 1, Sentiment::Positive),
            labeled("p4", 20, Sentiment::Positive),
            labeled("n1", 7, Sentiment::Neutral),
            labeled("n2", 9, Sentiment::Neutral),
            labeled("n3", 8, Sentiment::Neutral),
            labeled("x1", 100, Sentiment::Negative),
            labeled("x2", 3, Sentiment::Negative),
            labeled("x3", 4, Sentiment::Negative),
        ];
        let top = select_top_comments(&comments, &summary(0.4, 0.3, 0.3));
        assert_eq!(ids(&top), vec!["p2", "p4", "p1", "n2", "n3", "x1", "x3"]);
    }

    #[test]
    fn test_never_more_than_seven_without_backfill() {
        let comments: Vec<Comment> = (0..30)
            .map(|i| {
                let bucket = match i % 3 {
                    0 => Sentiment::Positive,
                    1 => Sentiment::Neutral,
                    _ => Sentiment::Negative,
                };
                labeled(&i.to_string(), i as u64, bucket)
            })
            .collect();
        let top = select_top_comments(&comments, &summary(0.34, 0.33, 0.33));
        assert_eq!(top.len(), 7);
    }

    #[test]
    fn test_backfills_from_dominant_bucket() {
        let comments = vec![
            labeled("p1", 10, Sentiment::Positive),
            labeled("p2", 9, Sentiment::Positive),
            labeled("p3", 8, Sentiment::Positive),
            labeled("p4", 7, Sentiment::Positive),
            labeled("p5", 6, Sentiment::Positive),
            labeled("p6", 5, Sentiment::Positive),
            labeled("x1", 1, Sentiment::Negative),
        ];
        let top = select_top_comments(&comments, &summary(6.0 / 7.0, 0.0, 1.0 / 7.0));
        assert_eq!(ids(&top), vec!["p1", "p2", "p3", "x1", "p4"]);
    }

    #[test]
    fn test_backfill_stops_when_bucket_exhausted() {
        let comments = vec![
            labeled("n1", 1, Sentiment::Neutral),
            labeled("n2", 2, Sentiment::Neutral),
            labeled("n3", 3, Sentiment::Neutral),
            labeled("x1", 4, Sentiment::Negative),
        ];
        let top = select_top_comments(&comments, &summary(0.0, 0.75, 0.25));
        assert_eq!(ids(&top), vec!["n3", "n2", "x1", "n1"]);
    }

    #[test]
    fn test_backfill_ignores_other_buckets() {
        // Dominant bucket is Positive but it is already fully used
        let comments = vec![
            labeled("p1", 3, Sentiment::Positive),
            labeled("n1", 2, Sentiment::Neutral),
            labeled("n2", 2, Sentiment::Neutral),
            labeled("n3", 1, Sentiment::Neutral),
        ];
        let top = select_top_comments(&comments, &summary(0.5, 0.5, 0.0));
        assert_eq!(ids(&top), vec!["p1", "n1", "n2"]);
    }

    #[test]
    fn test_exactly_five_when_backfill_has_enough() {
        let mut comments: Vec<Comment> = (0..8)
            .map(|i| comment(&i.to_string(), "great stuff", i))
            .collect();
        let summary = analyze_comments(&mut comments, false);
        let top = select_top_comments(&comments, &summary);
        assert_eq!(top.len(), 5);
        assert_eq!(ids(&top), vec!["7", "6", "5", "4", "3"]);
    }

    #[test]
    fn test_dominant_tie_order() {
        assert_eq!(dominant_sentiment(&summary(0.5, 0.5, 0.0)), Sentiment::Positive);
        assert_eq!(dominant_sentiment(&summary(0.0, 0.5, 0.5)), Sentiment::Neutral);
        assert_eq!(dominant_sentiment(&summary(0.1, 0.2, 0.7)), Sentiment::Negative);
        assert_eq!(dominant_sentiment(&summary(0.0, 0.0, 0.0)), Sentiment::Positive);
    }

    #[test]
    fn test_empty_input() {
        assert!(select_top_comments(&[], &summary(0.0, 0.0, 0.0)).is_empty());
    }
}
