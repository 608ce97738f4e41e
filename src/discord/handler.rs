//! Serenity gateway event handling: engagement flow, cascade deletion, and
//! presence rotation.

use super::commands;
use crate::attachments;
use crate::channels::ActiveChannelSet;
use crate::config::PresenceConfig;
use crate::conversation::chunker::MAX_MESSAGE_LEN;
use crate::conversation::{
    HistoryStore, ReplyHandle, ReplyTracker, Turn, split_response,
};
use crate::engage::{self, BotIdentity, Decision, EngageSettings, MessageView, ReferencedMessage};
use crate::gif::GifClient;
use crate::image::{ImagineClient, ProdiaClient, RembgClient};
use crate::llm::{ChatClient, ModerationGate, SearchClient, TranscriptClient, TranslateClient};

use arc_swap::ArcSwap;
use async_trait::async_trait;
use serenity::all::{
    ActivityData, ChannelId, Command, Context, CreateAllowedMentions, CreateMessage, EventHandler,
    GuildId, Interaction, Message, MessageFlags, MessageId, ReactionType, Ready, User, UserId,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Sent when the generation call yields no response. The conversation history
/// for the key is cleared alongside it.
const APOLOGY_MESSAGE: &str = "I apologize for any inconvenience caused. It seems that there \
    was an error preventing the delivery of my message.";

const THINKING_EMOJI: &str = "🤔";

/// Shared dependency bundle for the Discord surface.
///
/// Constructed once at startup; all state lives behind these explicit stores
/// rather than ambient module globals.
pub struct BotDeps {
    pub instructions: String,
    pub persona: String,
    pub engage_settings: ArcSwap<EngageSettings>,
    pub active_channels: ActiveChannelSet,
    pub history: HistoryStore,
    pub replies: ReplyTracker,
    pub chat: Arc<ChatClient>,
    pub moderation: ModerationGate,
    pub search: SearchClient,
    pub transcript: TranscriptClient,
    pub translate: TranslateClient,
    pub imagine: ImagineClient,
    pub prodia: ProdiaClient,
    pub rembg: RembgClient,
    pub gif: GifClient,
    pub add_imagine_reactions: bool,
    pub presence: PresenceConfig,
    pub identity: OnceLock<BotIdentity>,
    pub owner_id: OnceLock<Option<UserId>>,
    presence_started: AtomicBool,
}

impl BotDeps {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        instructions: String,
        persona: String,
        engage_settings: EngageSettings,
        active_channels: ActiveChannelSet,
        history: HistoryStore,
        chat: Arc<ChatClient>,
        moderation: ModerationGate,
        search: SearchClient,
        transcript: TranscriptClient,
        translate: TranslateClient,
        imagine: ImagineClient,
        prodia: ProdiaClient,
        rembg: RembgClient,
        gif: GifClient,
        add_imagine_reactions: bool,
        presence: PresenceConfig,
    ) -> Self {
        Self {
            instructions,
            persona,
            engage_settings: ArcSwap::from_pointee(engage_settings),
            active_channels,
            history,
            replies: ReplyTracker::new(),
            chat,
            moderation,
            search,
            transcript,
            translate,
            imagine,
            prodia,
            rembg,
            gif,
            add_imagine_reactions,
            presence,
            identity: OnceLock::new(),
            owner_id: OnceLock::new(),
            presence_started: AtomicBool::new(false),
        }
    }

    /// Whether `user_id` is the application owner. False until `ready` has
    /// resolved the application info.
    pub fn is_owner(&self, user_id: UserId) -> bool {
        self.owner_id
            .get()
            .copied()
            .flatten()
            .is_some_and(|owner| owner == user_id)
    }
}

/// Gateway event handler.
pub struct Handler {
    pub deps: Arc<BotDeps>,
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        tracing::info!(bot_name = %ready.user.name, guild_count = ready.guilds.len(), "discord connected");

        let _ = self.deps.identity.set(BotIdentity {
            user_id: ready.user.id.get(),
            name: ready.user.name.clone(),
        });

        match ctx.http.get_current_application_info().await {
            Ok(info) => {
                let _ = self.deps.owner_id.set(info.owner.map(|owner| owner.id));
            }
            Err(error) => {
                tracing::warn!(%error, "failed to resolve application owner");
                let _ = self.deps.owner_id.set(None);
            }
        }

        if let Err(error) =
            Command::set_global_commands(&ctx.http, commands::registrations()).await
        {
            tracing::error!(%error, "failed to register slash commands");
        }

        tracing::info!(
            invite_url = %format!(
                "https://discord.com/api/oauth2/authorize?client_id={}&scope=bot%20applications.commands",
                ready.user.id
            ),
            "invite link"
        );

        self.spawn_presence_rotation(ctx);
    }

    async fn message(&self, ctx: Context, message: Message) {
        let deps = &self.deps;
        let Some(identity) = deps.identity.get() else {
            return;
        };

        // Track our own replies so deleting the trigger message cascades to
        // the reply. Own messages are never engaged beyond that.
        if message.author.id.get() == identity.user_id {
            if let Some(replied_to) = message
                .message_reference
                .as_ref()
                .and_then(|reference| reference.message_id)
            {
                deps.replies.link(
                    replied_to.get(),
                    ReplyHandle {
                        channel_id: message.channel_id.get(),
                        message_id: message.id.get(),
                    },
                );
            }
            return;
        }

        let content = resolve_mentions(&message.content, &message.mentions);

        let view = MessageView {
            author_id: message.author.id.get(),
            author_is_bot: message.author.bot,
            channel_id: message.channel_id.get(),
            is_dm: message.guild_id.is_none(),
            content: content.clone(),
            has_stickers: !message.sticker_items.is_empty(),
            mentions_bot: message
                .mentions
                .iter()
                .any(|user| user.id.get() == identity.user_id),
            mentions_everyone: message.mention_everyone,
            reference: reference_view(&message),
        };

        let settings = deps.engage_settings.load_full();
        let active_channels = deps.active_channels.snapshot().await;

        let Decision::Engage(key) = engage::classify(&view, identity, &settings, &active_channels)
        else {
            return;
        };

        tracing::debug!(%key, "message engaged");

        let thinking = ReactionType::Unicode(THINKING_EMOJI.into());
        if let Err(error) = message.react(&ctx.http, thinking.clone()).await {
            tracing::debug!(%error, "failed to add thinking reaction");
        }

        let file_content = attachments::derive_context(&message.attachments, &deps.imagine).await;

        // File context wins: search and transcript are suppressed entirely
        // when an attachment produced derived content.
        let mut content = content;
        let search_context = if file_content.is_none() {
            deps.search.context_for(&content).await
        } else {
            None
        };
        if file_content.is_none() {
            if let Some(summary) = deps.transcript.summary_prompt(&content).await {
                content.push_str(&summary);
            }
        }

        // The user turn is appended before the generation request so the
        // history sent along includes the just-arrived message.
        deps.history.append(key, Turn::user(content));
        let history = deps.history.read(key);

        let typing = message.channel_id.start_typing(&ctx.http);
        let response = deps
            .chat
            .generate_response(
                &deps.instructions,
                search_context.as_deref(),
                &history,
                file_content.as_deref(),
            )
            .await;
        typing.stop();

        if let Err(error) = message
            .channel_id
            .delete_reaction(&ctx.http, message.id, None, thinking)
            .await
        {
            tracing::debug!(%error, "failed to remove thinking reaction");
        }

        match response {
            Some(response) => {
                deps.history
                    .append(key, Turn::assistant(deps.persona.clone(), response.clone()));

                for chunk in split_response(&response, MAX_MESSAGE_LEN) {
                    let chunk = deps.gif.replace_search_query(chunk).await;

                    let mut builder = CreateMessage::new()
                        .content(&chunk)
                        .reference_message(&message)
                        .allowed_mentions(CreateAllowedMentions::new());
                    if !chunk.contains("tenor.com") {
                        builder = builder.flags(MessageFlags::SUPPRESS_EMBEDS);
                    }

                    if let Err(error) = message.channel_id.send_message(&ctx.http, builder).await {
                        tracing::warn!(%error, "failed to send response chunk");
                    }
                }
            }
            None => {
                // Failed generation discards the conversation context rather
                // than leaving a dangling unanswered user turn.
                if let Err(error) = message.reply(&ctx.http, APOLOGY_MESSAGE).await {
                    tracing::warn!(%error, "failed to send apology message");
                }
                deps.history.clear(key);
                tracing::warn!(%key, "generation failed, conversation history cleared");
            }
        }
    }

    async fn message_delete(
        &self,
        ctx: Context,
        _channel_id: ChannelId,
        deleted_message_id: MessageId,
        _guild_id: Option<GuildId>,
    ) {
        if let Some(handle) = self.deps.replies.on_deleted(deleted_message_id.get()) {
            match ChannelId::new(handle.channel_id)
                .delete_message(&ctx.http, MessageId::new(handle.message_id))
                .await
            {
                Ok(()) => {
                    tracing::info!(message_id = handle.message_id, "cascade-deleted reply");
                }
                Err(error) => {
                    tracing::warn!(%error, message_id = handle.message_id, "failed to cascade-delete reply");
                }
            }
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Interaction::Command(command) = interaction {
            commands::dispatch(&ctx, &command, &self.deps).await;
        }
    }
}

impl Handler {
    fn spawn_presence_rotation(&self, ctx: Context) {
        if self.deps.presence_started.swap(true, Ordering::SeqCst) {
            return;
        }

        let statuses = self.deps.presence.statuses.clone();
        if statuses.is_empty() {
            return;
        }
        let delay = std::time::Duration::from_secs(self.deps.presence.change_delay_secs);

        tokio::spawn(async move {
            let mut index = 0usize;
            loop {
                let guild_count = ctx.cache.guilds().len();
                let status = statuses[index % statuses.len()]
                    .replace("{guild_count}", &guild_count.to_string());
                ctx.set_activity(Some(ActivityData::playing(status)));

                index = index.wrapping_add(1);
                tokio::time::sleep(delay).await;
            }
        });
    }
}

/// The referenced message of a reply, as a typed resolution outcome.
fn reference_view(message: &Message) -> Option<ReferencedMessage> {
    message.message_reference.as_ref()?;

    Some(match &message.referenced_message {
        Some(referenced) => ReferencedMessage::Resolved {
            author_id: referenced.author.id.get(),
            content: referenced.content.clone(),
            has_embeds: !referenced.embeds.is_empty(),
        },
        None => ReferencedMessage::Unavailable,
    })
}

/// Replace raw mention syntax (`<@ID>` and `<@!ID>`) with readable display
/// names, matching what the bot's own name check and the model see.
fn resolve_mentions(content: &str, mentions: &[User]) -> String {
    let mut resolved = content.to_string();
    for user in mentions {
        let display_name = user.global_name.as_deref().unwrap_or(&user.name);
        resolved = resolved.replace(&format!("<@{}>", user.id), display_name);
        resolved = resolved.replace(&format!("<@!{}>", user.id), display_name);
    }
    resolved
}
