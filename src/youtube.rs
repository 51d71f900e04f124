//! Video platform client: video metadata, paginated comment threads and
//! the small parsing helpers around them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{Comment, Sentiment, VideoMetadata};

/// Page size requested from the comment threads endpoint.
const COMMENT_PAGE_SIZE: usize = 100;

static DURATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?").expect("duration regex is valid")
});

static VIDEO_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:youtube\.com/(?:watch\?(?:[^#]*&)?v=|embed/|shorts/|live/|v/)|youtu\.be/)([A-Za-z0-9_-]{11})",
    )
    .expect("video url regex is valid")
});

/// Source of video metadata and comments.
#[async_trait]
pub trait VideoPlatform: Send + Sync {
    /// Fails with `NotFound` when the platform does not know the id.
    async fn fetch_video_details(&self, video_id: &str) -> Result<VideoMetadata>;

    /// Up to `max_count` top-level comments in platform order.
    async fn fetch_comments(&self, video_id: &str, max_count: usize) -> Result<Vec<Comment>>;
}

/// Parses a compact ISO-8601 duration (`PT1H2M3S`) into whole seconds.
/// Missing components count as zero; unrecognized input yields 0.
pub fn parse_duration(iso: &str) -> u64 {
    let Some(caps) = DURATION_RE.captures(iso) else {
        return 0;
    };
    let part = |idx: usize| -> u64 {
        caps.get(idx)
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .unwrap_or(0)
    };
    // Saturate instead of overflowing on absurd hour counts
    part(1)
        .saturating_mul(3600)
        .saturating_add(part(2).saturating_mul(60))
        .saturating_add(part(3))
}

/// Extracts the video id from a watch, short, embed or shorts URL.
pub fn extract_video_id(url: &str) -> Option<String> {
    VIDEO_URL_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Accepts a bare id or a URL and returns the id used as the analysis key.
/// Returns `None` for blank input and for URLs without a recognizable id.
pub fn normalize_video_id(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    let looks_like_url = trimmed.contains("://")
        || trimmed.contains("youtube.com")
        || trimmed.contains("youtu.be");
    if looks_like_url {
        extract_video_id(trimmed)
    } else {
        Some(trimmed.to_string())
    }
}

// ============================================================================
// API response shapes
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct ListResponse<T> {
    #[serde(default)]
    items: Vec<T>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoItem {
    id: String,
    snippet: VideoSnippet,
    #[serde(default)]
    statistics: VideoStatistics,
    content_details: Option<ContentDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoSnippet {
    title: String,
    channel_title: String,
    published_at: DateTime<Utc>,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    high: Option<Thumbnail>,
    medium: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

/// Counters arrive as decimal strings and may be hidden by the uploader.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoStatistics {
    view_count: Option<String>,
    like_count: Option<String>,
    comment_count: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    duration: String,
}

#[derive(Debug, Deserialize)]
struct CommentThread {
    id: String,
    snippet: ThreadSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThreadSnippet {
    top_level_comment: TopLevelComment,
    #[serde(default)]
    total_reply_count: u64,
}

#[derive(Debug, Deserialize)]
struct TopLevelComment {
    snippet: CommentSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentSnippet {
    #[serde(default)]
    author_display_name: String,
    #[serde(default)]
    author_profile_image_url: String,
    published_at: DateTime<Utc>,
    text_display: Option<String>,
    text_original: Option<String>,
    #[serde(default)]
    like_count: u64,
}

fn parse_count(raw: &Option<String>) -> u64 {
    raw.as_deref()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

impl From<VideoItem> for VideoMetadata {
    fn from(item: VideoItem) -> Self {
        let thumbnails = item.snippet.thumbnails;
        let thumbnail_url = thumbnails
            .high
            .or(thumbnails.medium)
            .or(thumbnails.default)
            .map(|t| t.url)
            .unwrap_or_default();

        VideoMetadata {
            id: item.id,
            title: item.snippet.title,
            channel_title: item.snippet.channel_title,
            thumbnail_url,
            view_count: parse_count(&item.statistics.view_count),
            like_count: parse_count(&item.statistics.like_count),
            comment_count: parse_count(&item.statistics.comment_count),
            published_at: item.snippet.published_at,
            duration: item
                .content_details
                .map(|d| parse_duration(&d.duration))
                .unwrap_or(0),
        }
    }
}

impl From<CommentThread> for Comment {
    fn from(thread: CommentThread) -> Self {
        let snippet = thread.snippet.top_level_comment.snippet;
        let text = snippet
            .text_display
            .filter(|t| !t.is_empty())
            .or(snippet.text_original)
            .unwrap_or_default();

        Comment {
            id: thread.id,
            author_display_name: snippet.author_display_name,
            author_profile_image_url: snippet.author_profile_image_url,
            published_at: snippet.published_at,
            text,
            like_count: snippet.like_count,
            reply_count: thread.snippet.total_reply_count,
            sentiment: Sentiment::Neutral,
        }
    }
}

// ============================================================================
// HTTP client
// ============================================================================

pub struct YoutubeClient {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
    /// Deadline for a single request, comment pages included
    request_timeout: Duration,
}

impl YoutubeClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()?;

        Ok(Self {
            http,
            api_base: config.youtube_api_base.trim_end_matches('/').to_string(),
            api_key: config.youtube_api_key.clone(),
            request_timeout: config.upstream_timeout,
        })
    }

    /// One GET against the API, bounded by the request deadline.
    async fn get_json<T>(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let limit = self.request_timeout;
        tokio::time::timeout(limit, self.request_json(endpoint, query))
            .await
            .map_err(|_| AppError::Timeout(limit.as_secs()))?
    }

    async fn request_json<T>(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{}/{}", self.api_base, endpoint);
        let response = self
            .http
            .get(&url)
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("unknown status");
            return Err(AppError::Upstream(format!(
                "YouTube API error on {}: {} {}",
                endpoint,
                status.as_u16(),
                reason
            )));
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl VideoPlatform for YoutubeClient {
    async fn fetch_video_details(&self, video_id: &str) -> Result<VideoMetadata> {
        let page: ListResponse<VideoItem> = self
            .get_json(
                "videos",
                &[("part", "snippet,contentDetails,statistics"), ("id", video_id)],
            )
            .await?;

        let item = page
            .items
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

        let video = VideoMetadata::from(item);
        info!(
            "📺 Fetched metadata for {}: {} views, {} likes, {} comments",
            video.id, video.view_count, video.like_count, video.comment_count
        );
        Ok(video)
    }

    async fn fetch_comments(&self, video_id: &str, max_count: usize) -> Result<Vec<Comment>> {
        let page_size = COMMENT_PAGE_SIZE.to_string();
        let mut comments: Vec<Comment> = Vec::new();
        let mut page_token: Option<String> = None;

        while comments.len() < max_count {
            let mut query = vec![
                ("part", "snippet,replies"),
                ("videoId", video_id),
                ("maxResults", page_size.as_str()),
            ];
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }

            let page: ListResponse<CommentThread> = self.get_json("commentThreads", &query).await?;
            if page.items.is_empty() {
                break;
            }

            debug!("💬 Comment page for {}: {} threads", video_id, page.items.len());
            comments.extend(page.items.into_iter().map(Comment::from));

            match page.next_page_token {
                Some(token) if comments.len() < max_count => page_token = Some(token),
                _ => break,
            }
        }

        comments.truncate(max_count);
        info!("💬 Collected {} comments for {}", comments.len(), video_id);
        Ok(comments)
    }
}
