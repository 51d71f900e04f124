//! Keyword-based comment sentiment scoring.
//!
//! Each comment is lower-cased and checked for substring occurrences of the
//! positive and negative word lists (no tokenization, so "bad" also matches
//! "badge"). The bucket with more hits wins; ties are Neutral.
//!
//! Deep mode adds two passes on top of the base label:
//! - a negated positive ("not good", "not great") forces the comment Negative
//!   and moves one count from the positive total to the negative total, even
//!   when the comment was never counted as positive;
//! - an intensifier counts a Positive or Negative comment a second time.
//!
//! Both passes skew the ratios, which then no longer sum to 1.

use crate::models::{Comment, Sentiment, SentimentSummary};
use tracing::debug;

static POSITIVE_WORDS: &[&str] = &[
    "good", "great", "awesome", "excellent", "amazing", "love", "best", "helpful",
    "clear", "informative", "useful", "interesting", "perfect", "fantastic",
    "recommend", "worth", "enjoyed", "thanks", "thank you", "bravo", "liked",
    "appreciate", "impressive", "outstanding", "superb", "phenomenal", "brilliant",
];

// "awful" is listed twice and therefore weighs double.
static NEGATIVE_WORDS: &[&str] = &[
    "bad", "terrible", "awful", "horrible", "worst", "hate", "poor", "useless",
    "boring", "waste", "confusing", "disappointed", "misleading", "skip", "dislike",
    "wrong", "error", "fail", "problem", "issue", "difficult", "sucks", "clickbait",
    "annoying", "frustrating", "awful", "stupid", "disappointing",
];

static NEGATED_POSITIVES: &[&str] = &["not good", "not great"];

static INTENSIFIERS: &[&str] = &["very", "really", "extremely", "absolutely"];

/// Number of list entries found in `text`. Each entry counts at most once.
fn count_hits(text: &str, words: &[&str]) -> usize {
    words.iter().filter(|w| text.contains(*w)).count()
}

/// Majority label for the given hit counts, ties resolve to Neutral.
pub fn classify(positive_hits: usize, negative_hits: usize) -> Sentiment {
    if positive_hits > negative_hits {
        Sentiment::Positive
    } else if negative_hits > positive_hits {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

/// Labels every comment in place and returns the bucket ratios.
///
/// Ratios divide each running total by `max(1, comments.len())`.
pub fn analyze_comments(comments: &mut [Comment], deep_analysis: bool) -> SentimentSummary {
    let mut positive: i64 = 0;
    let mut neutral: i64 = 0;
    let mut negative: i64 = 0;

    for comment in comments.iter_mut() {
        let text = comment.text.to_lowercase();
        let positive_hits = count_hits(&text, POSITIVE_WORDS);
        let negative_hits = count_hits(&text, NEGATIVE_WORDS);

        comment.sentiment = classify(positive_hits, negative_hits);
        match comment.sentiment {
            Sentiment::Positive => positive += 1,
            Sentiment::Neutral => neutral += 1,
            Sentiment::Negative => negative += 1,
        }

        if deep_analysis {
            if NEGATED_POSITIVES.iter().any(|p| text.contains(p)) {
                comment.sentiment = Sentiment::Negative;
                positive -= 1;
                negative += 1;
            }

            if INTENSIFIERS.iter().any(|w| text.contains(w)) {
                match comment.sentiment {
                    Sentiment::Positive => positive += 1,
                    Sentiment::Negative => negative += 1,
                    Sentiment::Neutral => {}
                }
            }
        }
    }

    let total = comments.len().max(1) as f64;
    debug!(
        comments = comments.len(),
        positive, neutral, negative, deep_analysis, "sentiment totals"
    );

    SentimentSummary {
        positive: positive as f64 / total,
        neutral: neutral as f64 / total,
        negative: negative as f64 / total,
        positive_feedback: feedback_summary(comments, Sentiment::Positive).to_string(),
        neutral_feedback: feedback_summary(comments, Sentiment::Neutral).to_string(),
        negative_feedback: feedback_summary(comments, Sentiment::Negative).to_string(),
    }
}

/// Canned summary for a bucket, picked by how many comments carry its label.
pub fn feedback_summary(comments: &[Comment], bucket: Sentiment) -> &'static str {
    let count = comments.iter().filter(|c| c.sentiment == bucket).count();

    match bucket {
        Sentiment::Positive => match count {
            0 => "No positive feedback was found in the comments.",
            1..=10 => "Some viewers appreciated the content and found it useful. The explanations were noted as being clear and helpful.",
            _ => "Most viewers praised the content, finding it informative and well-presented. The clear explanations and practical examples were frequently highlighted as strengths.",
        },
        Sentiment::Neutral => match count {
            0 => "No neutral feedback was found in the comments.",
            1..=5 => "A few viewers had mixed opinions, appreciating certain aspects while suggesting improvements for others.",
            _ => "Several viewers provided balanced feedback, suggesting improvements while acknowledging the value of the content. Some requested additional examples or follow-up videos.",
        },
        Sentiment::Negative => match count {
            0 => "No negative feedback was found in the comments.",
            1..=5 => "A small number of viewers mentioned issues with the video, including concerns about production quality or content accuracy.",
            _ => "Multiple viewers expressed disappointment with aspects of the video. Common concerns included pacing issues, audio quality problems, or content that didn't meet expectations.",
        },
    }
}
