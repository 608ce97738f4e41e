//! YouTube transcript summaries appended to messages carrying video links.

use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

const TIMEDTEXT_URL: &str = "https://www.youtube.com/api/timedtext";

static VIDEO_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(https?://)?(www\.)?(youtube|youtu|youtube-nocookie)\.(com|be)/(watch\?v=|embed/|v/|.+\?v=)?([^&=%\?]{11})",
    )
    .expect("video id regex must compile")
});

#[derive(Debug, Deserialize)]
struct TimedText {
    #[serde(default)]
    events: Vec<CaptionEvent>,
}

#[derive(Debug, Deserialize)]
struct CaptionEvent {
    #[serde(rename = "tStartMs", default)]
    start_ms: u64,
    #[serde(default)]
    segs: Vec<CaptionSeg>,
}

#[derive(Debug, Deserialize)]
struct CaptionSeg {
    #[serde(default)]
    utf8: String,
}

/// Fetches video transcripts and wraps them in a summarization prompt.
///
/// Every failure path (no video link, no captions, transport or decode error)
/// degrades to `None`; transcript context is never load-bearing.
#[derive(Debug, Clone)]
pub struct TranscriptClient {
    http: reqwest::Client,
}

impl TranscriptClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// A summarization prompt for the first video linked in `message_text`,
    /// or `None` when there is no video or no transcript.
    pub async fn summary_prompt(&self, message_text: &str) -> Option<String> {
        let video_id = extract_video_id(message_text)?;

        let response = self
            .http
            .get(TIMEDTEXT_URL)
            .query(&[("lang", "en"), ("v", video_id), ("fmt", "json3")])
            .send()
            .await;

        let timed_text: TimedText = match response {
            Ok(response) => match response.json().await {
                Ok(timed_text) => timed_text,
                Err(error) => {
                    tracing::debug!(%error, video_id, "failed to decode transcript");
                    return None;
                }
            },
            Err(error) => {
                tracing::debug!(%error, video_id, "transcript request failed");
                return None;
            }
        };

        let formatted = format_transcript(&timed_text);
        if formatted.is_empty() {
            return None;
        }

        Some(format!(
            "Summarize the following youtube video transcript into a few short concise \
             bullet points:\n\n{formatted}\n\nPlease provide a summary or additional \
             information based on the content."
        ))
    }
}

/// The 11-character video id from any common YouTube URL form.
pub fn extract_video_id(text: &str) -> Option<&str> {
    VIDEO_ID_RE
        .captures(text)
        .and_then(|captures| captures.get(6))
        .map(|group| group.as_str())
}

fn format_transcript(timed_text: &TimedText) -> String {
    timed_text
        .events
        .iter()
        .filter_map(|event| {
            let text: String = event
                .segs
                .iter()
                .map(|seg| seg.utf8.as_str())
                .collect::<Vec<_>>()
                .join("");
            let text = text.trim().to_string();
            if text.is_empty() {
                None
            } else {
                Some(format!("{:.1} - {}", event.start_ms as f64 / 1000.0, text))
            }
        })
        .collect::<Vec<_>>()
        .join(". ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_video_id_watch_url() {
        assert_eq!(
            extract_video_id("check https://www.youtube.com/watch?v=dQw4w9WgXcQ out"),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_extract_video_id_short_url() {
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_extract_video_id_embed_url() {
        assert_eq!(
            extract_video_id("see youtube.com/embed/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_extract_video_id_absent() {
        assert_eq!(extract_video_id("no videos in this message"), None);
        assert_eq!(extract_video_id("https://example.com/watch?v=short"), None);
    }

    #[test]
    fn test_format_transcript_joins_events() {
        let timed_text = TimedText {
            events: vec![
                CaptionEvent {
                    start_ms: 0,
                    segs: vec![CaptionSeg {
                        utf8: "hello".into(),
                    }],
                },
                CaptionEvent {
                    start_ms: 1500,
                    segs: vec![
                        CaptionSeg {
                            utf8: "wider ".into(),
                        },
                        CaptionSeg {
                            utf8: "world".into(),
                        },
                    ],
                },
                CaptionEvent {
                    start_ms: 3000,
                    segs: vec![],
                },
            ],
        };

        assert_eq!(
            format_transcript(&timed_text),
            "0.0 - hello. 1.5 - wider world"
        );
    }
}
