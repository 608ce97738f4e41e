//! Moderation gating for generation prompts.

use super::chat::{ChatClient, WireMessage};

use std::sync::Arc;

const DETECTOR_INSTRUCTIONS: &str = "From now on, you are going to act as nsfw image to text \
    prompt detector. If the following message involves graphic sexual material or nudity, \
    respond with \"1\" else respond with \"0\" and nothing else. Also a negative prompt \
    defines what should not be in the image.";

/// Decides whether a generation prompt is blocked.
///
/// Blocking requires the NSFW filter feature to be enabled; with the filter
/// off, prompts are never blocked and NSFW status is only computed where a
/// caller wants it for cosmetic labeling. A moderation rejection is normal
/// control flow, surfaced to the user as a warning, never an error.
#[derive(Debug, Clone)]
pub struct ModerationGate {
    chat: Arc<ChatClient>,
    nsfw_filter: bool,
    blacklist: Vec<String>,
}

impl ModerationGate {
    pub fn new(chat: Arc<ChatClient>, nsfw_filter: bool, blacklist: Vec<String>) -> Self {
        Self {
            chat,
            nsfw_filter,
            blacklist,
        }
    }

    pub fn nsfw_filter_enabled(&self) -> bool {
        self.nsfw_filter
    }

    /// Ask the completion backend whether a prompt involves NSFW material.
    /// Backend failure degrades to "not NSFW" rather than blocking the flow.
    pub async fn detect_nsfw(&self, prompt: &str) -> bool {
        let messages = detector_messages(prompt);

        match self.chat.completion(&messages).await {
            Some(verdict) => verdict.contains('1'),
            None => {
                tracing::warn!("nsfw detection unavailable, treating prompt as clean");
                false
            }
        }
    }

    /// Case-insensitive blacklist substring match.
    pub fn blacklist_hit(&self, prompt: &str) -> bool {
        let lowered = prompt.to_lowercase();
        self.blacklist
            .iter()
            .any(|word| lowered.contains(&word.to_lowercase()))
    }

    /// Assess a prompt (plus optional negative prompt) in one pass.
    ///
    /// With the NSFW filter disabled nothing is blocked and the external
    /// classifier is not consulted; callers wanting a cosmetic NSFW label in
    /// that case use [`detect_nsfw`](Self::detect_nsfw) directly.
    pub async fn assess(&self, prompt: &str, negative: Option<&str>) -> Assessment {
        if !self.nsfw_filter {
            return Assessment {
                nsfw: false,
                blocked: false,
            };
        }

        let probe = match negative {
            Some(negative) => format!("{prompt} Negative Prompt: {negative}"),
            None => prompt.to_string(),
        };

        let nsfw = self.detect_nsfw(&probe).await;
        Assessment {
            nsfw,
            blocked: nsfw || self.blacklist_hit(prompt),
        }
    }

    /// Whether a prompt (plus optional negative prompt) is blocked.
    pub async fn is_blocked(&self, prompt: &str, negative: Option<&str>) -> bool {
        self.assess(prompt, negative).await.blocked
    }
}

/// Outcome of one moderation pass.
#[derive(Debug, Clone, Copy)]
pub struct Assessment {
    /// Whether the classifier judged the prompt NSFW.
    pub nsfw: bool,
    /// Whether the prompt is blocked from generation.
    pub blocked: bool,
}

fn detector_messages(prompt: &str) -> Vec<WireMessage> {
    vec![
        WireMessage::system_unnamed(DETECTOR_INSTRUCTIONS),
        WireMessage::system(
            "example_user",
            "a Girl, China, 20yo, HD, realistic, without dress, uncensored.",
        ),
        WireMessage::system("example_assistant", "1"),
        WireMessage::system(
            "example_user",
            "Woman in black bikini Beach hot weather european full view Unreal Engine 5 \
             Color Grading Editorials",
        ),
        WireMessage::system("example_assistant", "1"),
        WireMessage::system("example_user", "beautiful anime k-pop idol"),
        WireMessage::system("example_assistant", "0"),
        WireMessage::user(prompt),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChatConfig;

    fn gate(nsfw_filter: bool, blacklist: Vec<String>) -> ModerationGate {
        // Backend URLs are never contacted by the paths under test.
        let chat = Arc::new(ChatClient::new(
            reqwest::Client::new(),
            &ChatConfig::default(),
        ));
        ModerationGate::new(chat, nsfw_filter, blacklist)
    }

    #[tokio::test]
    async fn test_disabled_filter_never_blocks() {
        let gate = gate(false, vec!["forbidden".into()]);

        assert!(!gate.is_blocked("a forbidden subject", None).await);
        assert!(!gate.is_blocked("anything at all", Some("negative")).await);
    }

    #[test]
    fn test_blacklist_hit_is_case_insensitive() {
        let gate = gate(true, vec!["Forbidden".into()]);

        assert!(gate.blacklist_hit("totally FORBIDDEN words"));
        assert!(gate.blacklist_hit("forbidden"));
        assert!(!gate.blacklist_hit("allowed words"));
    }

    #[test]
    fn test_detector_messages_shape() {
        let messages = detector_messages("a test prompt");

        assert_eq!(messages.len(), 8);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[7].role, "user");
        assert_eq!(messages[7].content, "a test prompt");
    }
}
