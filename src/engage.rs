//! Engagement classification: deciding whether the bot responds to a message.

use crate::conversation::ConversationKey;

use std::collections::HashSet;

/// Marker substring carried by image announcement messages. Replies to a
/// message containing it are never engaged, so the bot does not chat about its
/// own image results.
pub const IMAGE_ANNOUNCEMENT_MARKER: &str = "🎨 Generated Image by";

/// The bot's own identity, known once the gateway session is ready.
#[derive(Debug, Clone)]
pub struct BotIdentity {
    pub user_id: u64,
    pub name: String,
}

/// Engagement-relevant settings. Swapped atomically when a toggle command
/// flips `allow_dm` at runtime.
#[derive(Debug, Clone)]
pub struct EngageSettings {
    pub allow_dm: bool,
    pub smart_mention: bool,
    pub trigger_words: Vec<String>,
}

/// The message a reply points at, resolved or not.
///
/// Resolution failure is a typed outcome: an unavailable referenced message
/// means the reply is not engaged, never an error.
#[derive(Debug, Clone)]
pub enum ReferencedMessage {
    Resolved {
        author_id: u64,
        content: String,
        has_embeds: bool,
    },
    Unavailable,
}

/// Platform-independent view of an inbound message.
#[derive(Debug, Clone)]
pub struct MessageView {
    pub author_id: u64,
    pub author_is_bot: bool,
    pub channel_id: u64,
    pub is_dm: bool,
    pub content: String,
    pub has_stickers: bool,
    pub mentions_bot: bool,
    pub mentions_everyone: bool,
    /// Present when the message is a reply.
    pub reference: Option<ReferencedMessage>,
}

/// Outcome of classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Respond, within the given conversation thread.
    Engage(ConversationKey),
    Ignore,
}

impl Decision {
    pub fn is_engaged(&self) -> bool {
        matches!(self, Decision::Engage(_))
    }
}

/// Decide whether the bot should respond to `view`, and under which key.
pub fn classify(
    view: &MessageView,
    identity: &BotIdentity,
    settings: &EngageSettings,
    active_channels: &HashSet<u64>,
) -> Decision {
    // Replies to image announcements are ignored unconditionally.
    if let Some(ReferencedMessage::Resolved { content, .. }) = &view.reference {
        if content.contains(IMAGE_ANNOUNCEMENT_MARKER) {
            return Decision::Ignore;
        }
    }

    if view.has_stickers || view.author_is_bot || view.author_id == identity.user_id {
        return Decision::Ignore;
    }

    // A reply only stays in play when it targets an embed-free bot message.
    let replies_to_bot = match &view.reference {
        Some(ReferencedMessage::Resolved {
            author_id,
            has_embeds,
            ..
        }) => {
            if *author_id != identity.user_id || *has_embeds {
                return Decision::Ignore;
            }
            true
        }
        Some(ReferencedMessage::Unavailable) => {
            // Fail safe: an unresolvable referenced message is not engaged.
            return Decision::Ignore;
        }
        None => false,
    };

    let is_active_channel = active_channels.contains(&view.channel_id);
    let is_allowed_dm = settings.allow_dm && view.is_dm;
    let contains_trigger_word = settings
        .trigger_words
        .iter()
        .any(|word| view.content.contains(word.as_str()));
    let is_bot_mentioned =
        view.mentions_bot && settings.smart_mention && !view.mentions_everyone;
    let is_replied = replies_to_bot && settings.smart_mention;
    let name_in_message = settings.smart_mention
        && view
            .content
            .to_lowercase()
            .contains(&identity.name.to_lowercase());

    if is_active_channel
        || is_allowed_dm
        || contains_trigger_word
        || is_bot_mentioned
        || is_replied
        || name_in_message
    {
        Decision::Engage(ConversationKey::new(view.author_id, view.channel_id))
    } else {
        Decision::Ignore
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOT_ID: u64 = 1000;

    fn identity() -> BotIdentity {
        BotIdentity {
            user_id: BOT_ID,
            name: "Muse".into(),
        }
    }

    fn settings() -> EngageSettings {
        EngageSettings {
            allow_dm: true,
            smart_mention: true,
            trigger_words: vec!["muse,".into()],
        }
    }

    fn view(content: &str) -> MessageView {
        MessageView {
            author_id: 42,
            author_is_bot: false,
            channel_id: 7,
            is_dm: false,
            content: content.into(),
            has_stickers: false,
            mentions_bot: false,
            mentions_everyone: false,
            reference: None,
        }
    }

    fn no_channels() -> HashSet<u64> {
        HashSet::new()
    }

    #[test]
    fn test_own_message_never_engaged() {
        let mut message = view("muse, are you there?");
        message.author_id = BOT_ID;
        message.author_is_bot = true;

        let decision = classify(&message, &identity(), &settings(), &no_channels());
        assert_eq!(decision, Decision::Ignore);
    }

    #[test]
    fn test_other_bots_never_engaged() {
        let mut message = view("muse, hello");
        message.author_is_bot = true;

        let decision = classify(&message, &identity(), &settings(), &no_channels());
        assert_eq!(decision, Decision::Ignore);
    }

    #[test]
    fn test_sticker_message_never_engaged() {
        let mut message = view("muse, look");
        message.has_stickers = true;

        let decision = classify(&message, &identity(), &settings(), &no_channels());
        assert_eq!(decision, Decision::Ignore);
    }

    #[test]
    fn test_trigger_word_engages_with_key() {
        let message = view("hey muse, what's up");
        let decision = classify(&message, &identity(), &settings(), &no_channels());
        assert_eq!(decision, Decision::Engage(ConversationKey::new(42, 7)));
    }

    #[test]
    fn test_trigger_word_is_case_sensitive() {
        let message = view("hey MUSE, what's up");
        let mut config = settings();
        config.smart_mention = false;

        let decision = classify(&message, &identity(), &config, &no_channels());
        assert_eq!(decision, Decision::Ignore);
    }

    #[test]
    fn test_active_channel_engages_unconditionally() {
        let message = view("completely unrelated text");
        let channels: HashSet<u64> = [7].into();

        let decision = classify(&message, &identity(), &settings(), &channels);
        assert!(decision.is_engaged());
    }

    #[test]
    fn test_dm_respects_allow_dm() {
        let mut message = view("hello");
        message.is_dm = true;

        assert!(classify(&message, &identity(), &settings(), &no_channels()).is_engaged());

        let mut config = settings();
        config.allow_dm = false;
        assert_eq!(
            classify(&message, &identity(), &config, &no_channels()),
            Decision::Ignore
        );
    }

    #[test]
    fn test_mention_needs_smart_mention_and_no_everyone() {
        let mut message = view("hi there");
        message.mentions_bot = true;

        assert!(classify(&message, &identity(), &settings(), &no_channels()).is_engaged());

        message.mentions_everyone = true;
        assert_eq!(
            classify(&message, &identity(), &settings(), &no_channels()),
            Decision::Ignore
        );

        message.mentions_everyone = false;
        let mut config = settings();
        config.smart_mention = false;
        assert_eq!(
            classify(&message, &identity(), &config, &no_channels()),
            Decision::Ignore
        );
    }

    #[test]
    fn test_display_name_match_is_case_insensitive() {
        let message = view("I think MUSE knows the answer");
        assert!(classify(&message, &identity(), &settings(), &no_channels()).is_engaged());
    }

    #[test]
    fn test_reply_to_bot_engages() {
        let mut message = view("tell me more");
        message.reference = Some(ReferencedMessage::Resolved {
            author_id: BOT_ID,
            content: "an earlier answer".into(),
            has_embeds: false,
        });

        assert!(classify(&message, &identity(), &settings(), &no_channels()).is_engaged());
    }

    #[test]
    fn test_reply_to_bot_with_embeds_ignored() {
        let mut message = view("tell me more");
        message.reference = Some(ReferencedMessage::Resolved {
            author_id: BOT_ID,
            content: "an earlier answer".into(),
            has_embeds: true,
        });

        assert_eq!(
            classify(&message, &identity(), &settings(), &no_channels()),
            Decision::Ignore
        );
    }

    #[test]
    fn test_reply_to_someone_else_ignored() {
        let mut message = view("tell me more");
        message.reference = Some(ReferencedMessage::Resolved {
            author_id: 555,
            content: "someone's message".into(),
            has_embeds: false,
        });

        assert_eq!(
            classify(&message, &identity(), &settings(), &no_channels()),
            Decision::Ignore
        );
    }

    #[test]
    fn test_unresolvable_reference_fails_safe() {
        let mut message = view("muse, tell me more");
        message.reference = Some(ReferencedMessage::Unavailable);

        assert_eq!(
            classify(&message, &identity(), &settings(), &no_channels()),
            Decision::Ignore
        );
    }

    #[test]
    fn test_image_announcement_reply_ignored_despite_trigger() {
        let mut message = view("muse, make another one");
        message.reference = Some(ReferencedMessage::Resolved {
            author_id: BOT_ID,
            content: format!("{IMAGE_ANNOUNCEMENT_MARKER} @someone"),
            has_embeds: false,
        });

        assert_eq!(
            classify(&message, &identity(), &settings(), &no_channels()),
            Decision::Ignore
        );
    }
}
