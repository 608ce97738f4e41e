//! Slash command registration and dispatch.

use super::handler::BotDeps;
use crate::conversation::ConversationKey;
use crate::engage::IMAGE_ANNOUNCEMENT_MARKER;
use crate::error::Result;
use crate::gif::GifCategory;
use crate::image::{ControlMode, ImagineRequest, Model, ProdiaModel, Ratio, Sampler, Style, options};
use crate::sanitize::sanitize_prompt;

use anyhow::Context as _;
use rand::Rng as _;
use serenity::all::{
    Attachment, Colour, CommandInteraction, CommandOptionType, Context, CreateAttachment,
    CreateCommand, CreateCommandOption, CreateEmbed, CreateEmbedAuthor, CreateEmbedFooter,
    CreateInteractionResponse, CreateInteractionResponseFollowup, CreateInteractionResponseMessage,
    Mentionable as _, Message, Permissions, ResolvedOption, ResolvedValue, Timestamp,
};
use std::sync::Arc;

const COLOR_WARNING: u32 = 0xf74940;
const COLOR_IMAGE_ERROR: u32 = 0xf7a440;
const COLOR_IMAGE: u32 = 0x000f14;
const COLOR_NSFW: u32 = 0xff0000;
const COLOR_PRODIA: u32 = 0x800080;
const COLOR_GIF: u32 = 0x141414;
const COLOR_HELP: u32 = 0x03a64b;

const IMAGE_ERROR_MESSAGE: &str = "That attachment doesn't look like an image.";
const OWNER_ONLY_MESSAGE: &str = "Only the bot owner can use that command.";
const PROMPT_WARNING_MESSAGE: &str =
    "Your prompt was blocked by the content filter. Try rephrasing it.";
const IMAGE_FAILURE_MESSAGE: &str =
    "The image could not be generated this time. Try again in a moment.";
const UPSCALE_WARNING: &str = "Upscaled images can take a while and may look softer up close.";

/// Command names and the descriptions used both for registration and /help.
const COMMAND_SUMMARIES: &[(&str, &str)] = &[
    ("imagine", "Generate an image from a prompt"),
    ("imagine-prodia", "Generate an image with the Prodia backend"),
    ("ask", "Ask a one-shot question to a larger model"),
    ("remix", "Reimagine an attached image with a control mode"),
    ("upscale", "Upscale an attached image"),
    ("describe", "Caption an attached image and suggest prompts"),
    ("remove-bg", "Remove the background from an attached image"),
    ("gif", "Send a random gif from a category"),
    ("translate", "Translate text to English"),
    ("pfp", "Change the bot avatar (owner only)"),
    ("ping", "Show bot latency"),
    ("changeusr", "Change the bot username (owner only)"),
    ("toggledm", "Toggle responding to direct messages"),
    ("toggleactive", "Toggle unconditional responses in this channel"),
    ("clear", "Clear your conversation history in this channel"),
    ("help", "List available commands"),
];

fn description_for(name: &str) -> &'static str {
    COMMAND_SUMMARIES
        .iter()
        .find(|(command, _)| *command == name)
        .map(|(_, description)| *description)
        .unwrap_or("")
}

/// Builders for every slash command, registered globally on ready.
pub fn registrations() -> Vec<CreateCommand> {
    vec![
        imagine_command(),
        imagine_prodia_command(),
        ask_command(),
        remix_command(),
        upscale_command(),
        describe_command(),
        remove_bg_command(),
        gif_command(),
        translate_command(),
        pfp_command(),
        ping_command(),
        changeusr_command(),
        toggledm_command(),
        toggleactive_command(),
        clear_command(),
        help_command(),
    ]
}

/// Route a command interaction to its implementation, reporting failures back
/// to the invoker instead of letting them vanish into the log.
pub async fn dispatch(ctx: &Context, command: &CommandInteraction, deps: &Arc<BotDeps>) {
    let name = command.data.name.clone();
    tracing::debug!(command = %name, user_id = %command.user.id, "command invoked");

    let result = match name.as_str() {
        "imagine" => imagine(ctx, command, deps).await,
        "imagine-prodia" => imagine_prodia(ctx, command, deps).await,
        "ask" => ask(ctx, command, deps).await,
        "remix" => remix(ctx, command, deps).await,
        "upscale" => upscale(ctx, command, deps).await,
        "describe" => describe(ctx, command, deps).await,
        "remove-bg" => remove_bg(ctx, command, deps).await,
        "gif" => gif(ctx, command, deps).await,
        "translate" => translate(ctx, command, deps).await,
        "pfp" => pfp(ctx, command, deps).await,
        "ping" => ping(ctx, command).await,
        "changeusr" => changeusr(ctx, command, deps).await,
        "toggledm" => toggledm(ctx, command, deps).await,
        "toggleactive" => toggleactive(ctx, command, deps).await,
        "clear" => clear(ctx, command, deps).await,
        "help" => help(ctx, command).await,
        other => {
            tracing::warn!(command = other, "unknown command interaction");
            Ok(())
        }
    };

    if let Err(error) = result {
        tracing::error!(%error, command = %name, "command failed");
        let _ = command
            .create_followup(
                &ctx.http,
                CreateInteractionResponseFollowup::new()
                    .content("Something went wrong running that command."),
            )
            .await;
    }
}

// -- Registration builders ------------------------------------------------------

fn imagine_command() -> CreateCommand {
    let mut model_option = CreateCommandOption::new(
        CommandOptionType::String,
        "model",
        "Model to generate the image with",
    )
    .required(true);
    for model in Model::ALL {
        model_option = model_option.add_string_choice(model.display_name(), model.token());
    }

    let mut style_option =
        CreateCommandOption::new(CommandOptionType::String, "style", "Style preset").required(true);
    for style in Style::ALL {
        style_option = style_option.add_string_choice(style.display_name(), style.token());
    }

    let mut ratio_option =
        CreateCommandOption::new(CommandOptionType::String, "ratio", "Aspect ratio").required(true);
    for ratio in Ratio::ALL {
        ratio_option = ratio_option.add_string_choice(ratio.display_name(), ratio.token());
    }

    CreateCommand::new("imagine")
        .description(description_for("imagine"))
        .add_option(
            CreateCommandOption::new(CommandOptionType::String, "prompt", "What to generate")
                .required(true),
        )
        .add_option(model_option)
        .add_option(style_option)
        .add_option(ratio_option)
        .add_option(CreateCommandOption::new(
            CommandOptionType::String,
            "negative",
            "What should not be in the image",
        ))
        .add_option(CreateCommandOption::new(
            CommandOptionType::Boolean,
            "upscale",
            "Upscale the result",
        ))
        .add_option(CreateCommandOption::new(
            CommandOptionType::Boolean,
            "prompt_enhancement",
            "Let the model rewrite the prompt first",
        ))
        .add_option(CreateCommandOption::new(
            CommandOptionType::Integer,
            "seed",
            "Seed for reproducible results",
        ))
        .add_option(CreateCommandOption::new(
            CommandOptionType::Number,
            "cfg",
            "CFG scale (0-16)",
        ))
}

fn imagine_prodia_command() -> CreateCommand {
    let mut model_option = CreateCommandOption::new(
        CommandOptionType::String,
        "model",
        "Model to generate the image with",
    )
    .required(true);
    for model in ProdiaModel::ALL {
        model_option = model_option.add_string_choice(model.display_name(), model.token());
    }

    let mut sampler_option = CreateCommandOption::new(
        CommandOptionType::String,
        "sampler",
        "Sampler for denoising",
    )
    .required(true);
    for sampler in Sampler::ALL {
        sampler_option = sampler_option.add_string_choice(sampler.display_name(), sampler.api_value());
    }

    CreateCommand::new("imagine-prodia")
        .description(description_for("imagine-prodia"))
        .add_option(
            CreateCommandOption::new(CommandOptionType::String, "prompt", "What to generate")
                .required(true),
        )
        .add_option(model_option)
        .add_option(sampler_option)
        .add_option(CreateCommandOption::new(
            CommandOptionType::String,
            "negative",
            "What should not be in the image",
        ))
        .add_option(CreateCommandOption::new(
            CommandOptionType::Integer,
            "seed",
            "Seed for reproducible results",
        ))
}

fn ask_command() -> CreateCommand {
    CreateCommand::new("ask")
        .description(description_for("ask"))
        .add_option(
            CreateCommandOption::new(CommandOptionType::String, "model", "Model to ask")
                .required(true)
                .add_string_choice("📝 GPT-4", "gpt4"),
        )
        .add_option(
            CreateCommandOption::new(CommandOptionType::String, "prompt", "Your question")
                .required(true),
        )
}

fn remix_command() -> CreateCommand {
    let mut control_option = CreateCommandOption::new(
        CommandOptionType::String,
        "control",
        "How the source image guides the result",
    )
    .required(true);
    for mode in ControlMode::ALL {
        control_option = control_option.add_string_choice(mode.display_name(), mode.token());
    }

    CreateCommand::new("remix")
        .description(description_for("remix"))
        .add_option(
            CreateCommandOption::new(CommandOptionType::Attachment, "attachment", "Source image")
                .required(true),
        )
        .add_option(
            CreateCommandOption::new(CommandOptionType::String, "prompt", "What to generate")
                .required(true),
        )
        .add_option(control_option)
        .add_option(CreateCommandOption::new(
            CommandOptionType::Boolean,
            "upscale",
            "Upscale the result",
        ))
}

fn upscale_command() -> CreateCommand {
    CreateCommand::new("upscale")
        .description(description_for("upscale"))
        .add_option(
            CreateCommandOption::new(CommandOptionType::Attachment, "attachment", "Image to upscale")
                .required(true),
        )
}

fn describe_command() -> CreateCommand {
    CreateCommand::new("describe")
        .description(description_for("describe"))
        .add_option(
            CreateCommandOption::new(CommandOptionType::Attachment, "attachment", "Image to caption")
                .required(true),
        )
}

fn remove_bg_command() -> CreateCommand {
    CreateCommand::new("remove-bg")
        .description(description_for("remove-bg"))
        .add_option(
            CreateCommandOption::new(CommandOptionType::Attachment, "attachment", "Image to process")
                .required(true),
        )
}

fn gif_command() -> CreateCommand {
    let mut category_option =
        CreateCommandOption::new(CommandOptionType::String, "category", "Gif category")
            .required(true);
    for category in GifCategory::ALL {
        category_option = category_option.add_string_choice(category.display_name(), category.slug());
    }

    CreateCommand::new("gif")
        .description(description_for("gif"))
        .add_option(category_option)
}

fn translate_command() -> CreateCommand {
    CreateCommand::new("translate")
        .description(description_for("translate"))
        .add_option(
            CreateCommandOption::new(CommandOptionType::String, "text", "Text to translate")
                .required(true),
        )
}

fn pfp_command() -> CreateCommand {
    CreateCommand::new("pfp")
        .description(description_for("pfp"))
        .add_option(
            CreateCommandOption::new(CommandOptionType::Attachment, "attachment", "New avatar image")
                .required(true),
        )
}

fn ping_command() -> CreateCommand {
    CreateCommand::new("ping").description(description_for("ping"))
}

fn changeusr_command() -> CreateCommand {
    CreateCommand::new("changeusr")
        .description(description_for("changeusr"))
        .add_option(
            CreateCommandOption::new(CommandOptionType::String, "username", "New username")
                .required(true),
        )
}

fn toggledm_command() -> CreateCommand {
    CreateCommand::new("toggledm")
        .description(description_for("toggledm"))
        .default_member_permissions(Permissions::ADMINISTRATOR)
}

fn toggleactive_command() -> CreateCommand {
    CreateCommand::new("toggleactive")
        .description(description_for("toggleactive"))
        .default_member_permissions(Permissions::ADMINISTRATOR)
}

fn clear_command() -> CreateCommand {
    CreateCommand::new("clear").description(description_for("clear"))
}

fn help_command() -> CreateCommand {
    CreateCommand::new("help").description(description_for("help"))
}

// -- Option extraction ----------------------------------------------------------

fn str_option<'a>(options: &'a [ResolvedOption<'a>], name: &str) -> Option<&'a str> {
    options.iter().find_map(|option| match option.value {
        ResolvedValue::String(value) if option.name == name => Some(value),
        _ => None,
    })
}

fn int_option(options: &[ResolvedOption<'_>], name: &str) -> Option<i64> {
    options.iter().find_map(|option| match option.value {
        ResolvedValue::Integer(value) if option.name == name => Some(value),
        _ => None,
    })
}

fn num_option(options: &[ResolvedOption<'_>], name: &str) -> Option<f64> {
    options.iter().find_map(|option| match option.value {
        ResolvedValue::Number(value) if option.name == name => Some(value),
        _ => None,
    })
}

fn bool_option(options: &[ResolvedOption<'_>], name: &str) -> Option<bool> {
    options.iter().find_map(|option| match option.value {
        ResolvedValue::Boolean(value) if option.name == name => Some(value),
        _ => None,
    })
}

fn attachment_option<'a>(options: &'a [ResolvedOption<'a>], name: &str) -> Option<&'a Attachment> {
    options.iter().find_map(|option| match option.value {
        ResolvedValue::Attachment(attachment) if option.name == name => Some(attachment),
        _ => None,
    })
}

fn is_image(attachment: &Attachment) -> bool {
    attachment
        .content_type
        .as_deref()
        .is_some_and(|content_type| content_type.starts_with("image/"))
}

fn random_seed() -> u32 {
    rand::rng().random_range(10_000..=99_999)
}

// -- Response helpers -----------------------------------------------------------

async fn respond_text(ctx: &Context, command: &CommandInteraction, text: &str) -> Result<()> {
    command
        .create_response(
            &ctx.http,
            CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new().content(text),
            ),
        )
        .await?;
    Ok(())
}

async fn followup_text(
    ctx: &Context,
    command: &CommandInteraction,
    text: &str,
) -> Result<()> {
    command
        .create_followup(
            &ctx.http,
            CreateInteractionResponseFollowup::new().content(text),
        )
        .await?;
    Ok(())
}

async fn followup_embed(
    ctx: &Context,
    command: &CommandInteraction,
    embed: CreateEmbed,
) -> Result<Message> {
    let message = command
        .create_followup(&ctx.http, CreateInteractionResponseFollowup::new().embed(embed))
        .await?;
    Ok(message)
}

fn warning_embed(description: &str, prompt: &str, colour: u32) -> CreateEmbed {
    CreateEmbed::new()
        .title("⚠️")
        .description(description)
        .colour(Colour::new(colour))
        .field("Prompt", prompt, false)
}

async fn add_vote_reactions(ctx: &Context, message: &Message) {
    for emoji in ["👍", "👎"] {
        if let Err(error) = message
            .react(&ctx.http, serenity::all::ReactionType::Unicode(emoji.into()))
            .await
        {
            tracing::debug!(%error, "failed to add vote reaction");
        }
    }
}

async fn channel_is_nsfw(ctx: &Context, command: &CommandInteraction) -> bool {
    match command.channel_id.to_channel(&ctx.http).await {
        Ok(channel) => channel
            .guild()
            .map(|guild_channel| guild_channel.nsfw)
            .unwrap_or(false),
        Err(error) => {
            tracing::debug!(%error, "failed to resolve channel for nsfw check");
            false
        }
    }
}

// -- Command implementations ----------------------------------------------------

async fn imagine(ctx: &Context, command: &CommandInteraction, deps: &Arc<BotDeps>) -> Result<()> {
    command.defer(&ctx.http).await?;
    let options = command.data.options();

    let raw_prompt = str_option(&options, "prompt").context("prompt option missing")?;
    let model: Model = match str_option(&options, "model").context("model option missing")?.parse()
    {
        Ok(model) => model,
        Err(error) => return followup_text(ctx, command, &error.to_string()).await,
    };
    let style: Style = match str_option(&options, "style").context("style option missing")?.parse()
    {
        Ok(style) => style,
        Err(error) => return followup_text(ctx, command, &error.to_string()).await,
    };
    let ratio: Ratio = match str_option(&options, "ratio").context("ratio option missing")?.parse()
    {
        Ok(ratio) => ratio,
        Err(error) => return followup_text(ctx, command, &error.to_string()).await,
    };
    let negative = str_option(&options, "negative");
    let upscale = bool_option(&options, "upscale").unwrap_or(false);
    let enhance = bool_option(&options, "prompt_enhancement").unwrap_or(false);
    let seed = int_option(&options, "seed")
        .map(|seed| seed as u32)
        .unwrap_or_else(random_seed);
    let cfg = num_option(&options, "cfg").unwrap_or(9.5) as f32;

    if let Err(error) = options::validate_cfg(cfg) {
        return followup_text(ctx, command, &error.to_string()).await;
    }

    let original_prompt = sanitize_prompt(raw_prompt);
    let prompt = if enhance {
        deps.chat
            .remix_prompt(&original_prompt)
            .await
            .unwrap_or_else(|| original_prompt.clone())
    } else {
        original_prompt.clone()
    };

    let assessment = deps.moderation.assess(&prompt, negative).await;
    if assessment.blocked {
        let embed = warning_embed(PROMPT_WARNING_MESSAGE, &prompt, COLOR_WARNING);
        followup_embed(ctx, command, embed).await?;
        return Ok(());
    }

    let request = ImagineRequest {
        prompt: &prompt,
        model,
        style,
        ratio,
        negative,
        upscale,
        seed,
        cfg,
    };

    let image = match deps.imagine.generate(&request).await {
        Ok(image) => image,
        Err(error) => {
            tracing::warn!(%error, "image generation failed");
            let embed = warning_embed(IMAGE_FAILURE_MESSAGE, &prompt, COLOR_IMAGE_ERROR)
                .title("😅");
            followup_embed(ctx, command, embed).await?;
            return Ok(());
        }
    };

    let mut embed = CreateEmbed::new()
        .colour(Colour::new(if assessment.nsfw {
            COLOR_NSFW
        } else {
            COLOR_IMAGE
        }))
        .author(CreateEmbedAuthor::new("🎨 Generative art"));

    if enhance {
        embed = embed.field("Original prompt 📝", &original_prompt, false);
    }
    embed = embed.field("📝 Prompt", &prompt, false);
    if let Some(negative) = negative {
        embed = embed.field("➖ Negative", negative, false);
    }
    embed = embed
        .field("🤖 Model", model.display_name(), true)
        .field("🎨 Style", style.display_name(), true)
        .field("📐 Ratio", ratio.display_name(), true)
        .field("🌱 Seed", seed.to_string(), true)
        .field("📝 CFG scale", cfg.to_string(), true)
        .image("attachment://image.png")
        .timestamp(Timestamp::now());

    embed = if upscale {
        embed.footer(CreateEmbedFooter::new(UPSCALE_WARNING))
    } else {
        embed.footer(CreateEmbedFooter::new("✨"))
    };

    let announcement = format!("{IMAGE_ANNOUNCEMENT_MARKER} {}", command.user.mention());
    let message = command
        .create_followup(
            &ctx.http,
            CreateInteractionResponseFollowup::new()
                .content(announcement)
                .embed(embed)
                .add_file(CreateAttachment::bytes(image, "image.png")),
        )
        .await?;

    if deps.add_imagine_reactions {
        add_vote_reactions(ctx, &message).await;
    }

    Ok(())
}

async fn imagine_prodia(
    ctx: &Context,
    command: &CommandInteraction,
    deps: &Arc<BotDeps>,
) -> Result<()> {
    command.defer(&ctx.http).await?;
    let options = command.data.options();

    let raw_prompt = str_option(&options, "prompt").context("prompt option missing")?;
    let model: ProdiaModel = match str_option(&options, "model")
        .context("model option missing")?
        .parse()
    {
        Ok(model) => model,
        Err(error) => return followup_text(ctx, command, &error.to_string()).await,
    };
    let sampler: Sampler = match str_option(&options, "sampler")
        .context("sampler option missing")?
        .parse()
    {
        Ok(sampler) => sampler,
        Err(error) => return followup_text(ctx, command, &error.to_string()).await,
    };
    let negative = str_option(&options, "negative");
    let seed = int_option(&options, "seed")
        .map(|seed| seed as u32)
        .unwrap_or_else(random_seed);

    let prompt = deps.translate.to_english(raw_prompt).await;

    // NSFW status is always computed here: it gates the channel requirement
    // and drives the spoiler styling even when the filter feature is off.
    let nsfw = deps.moderation.detect_nsfw(&prompt).await;
    if nsfw && !channel_is_nsfw(ctx, command).await {
        return followup_text(
            ctx,
            command,
            "⚠️ NSFW images can only be created in age-restricted channels.",
        )
        .await;
    }

    let image = match deps.prodia.generate(&prompt, model, sampler, seed, negative).await {
        Ok(image) => image,
        Err(error) => {
            tracing::warn!(%error, "prodia generation failed");
            let embed = warning_embed(IMAGE_FAILURE_MESSAGE, &prompt, COLOR_IMAGE_ERROR)
                .title("😅");
            followup_embed(ctx, command, embed).await?;
            return Ok(());
        }
    };

    let filename = if nsfw { "SPOILER_image.png" } else { "image.png" };
    let display_prompt = if nsfw {
        format!("||{prompt}||")
    } else {
        prompt.clone()
    };

    let mut embed = CreateEmbed::new()
        .colour(Colour::new(if nsfw { COLOR_NSFW } else { COLOR_PRODIA }))
        .title(format!(
            "{IMAGE_ANNOUNCEMENT_MARKER} {}",
            command.user.display_name()
        ))
        .field("📝 Prompt", &display_prompt, false);
    if let Some(negative) = negative {
        embed = embed.field("📝 Negative Prompt", negative, false);
    }
    embed = embed
        .field("🤖 Model", model.token(), true)
        .field("🧬 Sampler", sampler.api_value(), true)
        .field("🌱 Seed", seed.to_string(), true)
        .image(format!("attachment://{filename}"));
    if nsfw {
        embed = embed.field("🔞 NSFW", "true", true);
    }

    let message = command
        .create_followup(
            &ctx.http,
            CreateInteractionResponseFollowup::new()
                .embed(embed)
                .add_file(CreateAttachment::bytes(image, filename)),
        )
        .await?;

    if deps.add_imagine_reactions {
        add_vote_reactions(ctx, &message).await;
    }

    Ok(())
}

async fn ask(ctx: &Context, command: &CommandInteraction, deps: &Arc<BotDeps>) -> Result<()> {
    command.defer(&ctx.http).await?;
    let options = command.data.options();

    let prompt = str_option(&options, "prompt").context("prompt option missing")?;

    let pending = CreateEmbed::new()
        .title("Ask")
        .colour(Colour::new(0xf1c40f))
        .field("Model", "GPT-4", true)
        .field("Prompt", prompt, true)
        .field("Response", "Loading...", false)
        .footer(CreateEmbedFooter::new("Powered by GPT-4"))
        .timestamp(Timestamp::now());

    let pending_message = followup_embed(ctx, command, pending).await?;

    let response = deps
        .chat
        .ask(prompt)
        .await
        .unwrap_or_else(|| "No response from the model.".to_string());

    let answered = CreateEmbed::new()
        .colour(Colour::new(0x3498db))
        .field("Model", "GPT-4", true)
        .field("Prompt", prompt, true)
        .field("Response", response, false)
        .footer(CreateEmbedFooter::new("Powered by GPT-4"))
        .timestamp(Timestamp::now());

    command
        .edit_followup(
            &ctx.http,
            pending_message.id,
            CreateInteractionResponseFollowup::new().embed(answered),
        )
        .await?;

    Ok(())
}

async fn remix(ctx: &Context, command: &CommandInteraction, deps: &Arc<BotDeps>) -> Result<()> {
    command.defer(&ctx.http).await?;
    let options = command.data.options();

    let attachment = attachment_option(&options, "attachment").context("attachment missing")?;
    let raw_prompt = str_option(&options, "prompt").context("prompt option missing")?;
    let control: ControlMode = match str_option(&options, "control")
        .context("control option missing")?
        .parse()
    {
        Ok(control) => control,
        Err(error) => return followup_text(ctx, command, &error.to_string()).await,
    };
    let upscale = bool_option(&options, "upscale").unwrap_or(false);

    if !is_image(attachment) {
        return followup_text(ctx, command, IMAGE_ERROR_MESSAGE).await;
    }

    let prompt = deps.translate.to_english(raw_prompt).await;
    let source = attachment.download().await?;

    let image = match deps.imagine.remix(source, &prompt, control, upscale).await {
        Ok(image) => image,
        Err(error) => {
            tracing::warn!(%error, "remix failed");
            let embed = warning_embed(IMAGE_FAILURE_MESSAGE, &prompt, COLOR_IMAGE_ERROR)
                .title("😅");
            followup_embed(ctx, command, embed).await?;
            return Ok(());
        }
    };

    let embed = CreateEmbed::new()
        .title("Remix")
        .colour(Colour::new(0x3498db))
        .field("Prompt", &prompt, false)
        .field("Upscale", upscale.to_string(), true)
        .field("Control", control.display_name(), true)
        .thumbnail(attachment.url.clone())
        .image("attachment://image.png");

    command
        .create_followup(
            &ctx.http,
            CreateInteractionResponseFollowup::new()
                .embed(embed)
                .add_file(CreateAttachment::bytes(image, "image.png")),
        )
        .await?;

    Ok(())
}

async fn upscale(ctx: &Context, command: &CommandInteraction, deps: &Arc<BotDeps>) -> Result<()> {
    command.defer(&ctx.http).await?;
    let options = command.data.options();

    let attachment = attachment_option(&options, "attachment").context("attachment missing")?;
    if !is_image(attachment) {
        return followup_text(ctx, command, IMAGE_ERROR_MESSAGE).await;
    }

    let source = attachment.download().await?;
    let image = match deps.imagine.upscale(source).await {
        Ok(image) => image,
        Err(error) => {
            tracing::warn!(%error, "upscale failed");
            return followup_text(ctx, command, IMAGE_FAILURE_MESSAGE).await;
        }
    };

    let embed = CreateEmbed::new()
        .colour(Colour::new(0x3498db))
        .footer(CreateEmbedFooter::new(UPSCALE_WARNING))
        .image("attachment://image.png");

    command
        .create_followup(
            &ctx.http,
            CreateInteractionResponseFollowup::new()
                .embed(embed)
                .add_file(CreateAttachment::bytes(image, "image.png")),
        )
        .await?;

    Ok(())
}

async fn describe(ctx: &Context, command: &CommandInteraction, deps: &Arc<BotDeps>) -> Result<()> {
    command.defer(&ctx.http).await?;
    let options = command.data.options();

    let attachment = attachment_option(&options, "attachment").context("attachment missing")?;
    if !is_image(attachment) {
        return followup_text(ctx, command, IMAGE_ERROR_MESSAGE).await;
    }

    let source = attachment.download().await?;
    let caption = match deps.imagine.interrogate(source).await {
        Ok(caption) => caption,
        Err(error) => {
            tracing::warn!(%error, "caption failed");
            return followup_text(ctx, command, "The image could not be captioned.").await;
        }
    };

    // Three prompt variations alongside the literal caption.
    let mut variations = Vec::with_capacity(3);
    for _ in 0..3 {
        variations.push(
            deps.chat
                .remix_prompt(&caption)
                .await
                .unwrap_or_else(|| caption.clone()),
        );
    }

    let embed = CreateEmbed::new()
        .description(format!(
            ":one: {caption}\n\n:two: {}\n\n:three: {}\n\n:four: {}",
            variations[0], variations[1], variations[2]
        ))
        .image(attachment.url.clone());

    followup_embed(ctx, command, embed).await?;
    Ok(())
}

async fn remove_bg(ctx: &Context, command: &CommandInteraction, deps: &Arc<BotDeps>) -> Result<()> {
    command.defer(&ctx.http).await?;
    let options = command.data.options();

    let attachment = attachment_option(&options, "attachment").context("attachment missing")?;
    if !is_image(attachment) {
        return followup_text(ctx, command, IMAGE_ERROR_MESSAGE).await;
    }

    let image = match deps.rembg.remove_background(&attachment.url).await {
        Ok(image) => image,
        Err(error) => {
            tracing::warn!(%error, "background removal failed");
            return followup_text(ctx, command, IMAGE_FAILURE_MESSAGE).await;
        }
    };

    let embed = CreateEmbed::new()
        .title("Background removed")
        .thumbnail(attachment.url.clone())
        .image("attachment://image.png");

    command
        .create_followup(
            &ctx.http,
            CreateInteractionResponseFollowup::new()
                .embed(embed)
                .add_file(CreateAttachment::bytes(image, "image.png")),
        )
        .await?;

    Ok(())
}

async fn gif(ctx: &Context, command: &CommandInteraction, deps: &Arc<BotDeps>) -> Result<()> {
    command.defer(&ctx.http).await?;
    let options = command.data.options();

    let category: GifCategory = match str_option(&options, "category")
        .context("category option missing")?
        .parse()
    {
        Ok(category) => category,
        Err(error) => return followup_text(ctx, command, &error.to_string()).await,
    };

    match deps.gif.random_gif(category).await {
        Some(url) => {
            let embed = CreateEmbed::new().colour(Colour::new(COLOR_GIF)).image(url);
            followup_embed(ctx, command, embed).await?;
        }
        None => {
            followup_text(ctx, command, "Failed to fetch a gif.").await?;
        }
    }

    Ok(())
}

async fn translate(ctx: &Context, command: &CommandInteraction, deps: &Arc<BotDeps>) -> Result<()> {
    command.defer(&ctx.http).await?;
    let options = command.data.options();

    let text = str_option(&options, "text").context("text option missing")?;
    let translated = deps.translate.to_english(text).await;

    let embed = CreateEmbed::new()
        .title("Translation")
        .description(translated)
        .colour(Colour::new(0x3498db));

    followup_embed(ctx, command, embed).await?;
    Ok(())
}

async fn pfp(ctx: &Context, command: &CommandInteraction, deps: &Arc<BotDeps>) -> Result<()> {
    if !deps.is_owner(command.user.id) {
        return respond_text(ctx, command, OWNER_ONLY_MESSAGE).await;
    }

    command.defer(&ctx.http).await?;
    let options = command.data.options();

    let attachment = attachment_option(&options, "attachment").context("attachment missing")?;
    if !is_image(attachment) {
        return followup_text(ctx, command, IMAGE_ERROR_MESSAGE).await;
    }

    let bytes = attachment.download().await?;
    let avatar = CreateAttachment::bytes(bytes, "avatar.png");

    let mut current_user = ctx.http.get_current_user().await?;
    current_user
        .edit(&ctx.http, serenity::all::EditProfile::new().avatar(&avatar))
        .await?;

    followup_text(ctx, command, "Avatar updated.").await
}

async fn ping(ctx: &Context, command: &CommandInteraction) -> Result<()> {
    let started = std::time::Instant::now();
    ctx.http.get_current_user().await?;
    let latency_ms = started.elapsed().as_secs_f64() * 1000.0;

    respond_text(ctx, command, &format!("Pong! Latency: {latency_ms:.2} ms")).await
}

async fn changeusr(ctx: &Context, command: &CommandInteraction, deps: &Arc<BotDeps>) -> Result<()> {
    if !deps.is_owner(command.user.id) {
        return respond_text(ctx, command, OWNER_ONLY_MESSAGE).await;
    }

    command.defer(&ctx.http).await?;
    let options = command.data.options();
    let username = str_option(&options, "username").context("username option missing")?;

    let mut current_user = ctx.http.get_current_user().await?;
    match current_user
        .edit(&ctx.http, serenity::all::EditProfile::new().username(username))
        .await
    {
        Ok(()) => followup_text(ctx, command, &format!("Username changed to '{username}'")).await,
        Err(error) => {
            tracing::warn!(%error, "username change rejected");
            followup_text(ctx, command, &format!("Could not change username: {error}")).await
        }
    }
}

async fn toggledm(ctx: &Context, command: &CommandInteraction, deps: &Arc<BotDeps>) -> Result<()> {
    deps.engage_settings.rcu(|settings| {
        let mut updated = (**settings).clone();
        updated.allow_dm = !updated.allow_dm;
        updated
    });

    let allow_dm = deps.engage_settings.load().allow_dm;
    respond_text(
        ctx,
        command,
        &format!("DMs are now {}", if allow_dm { "on" } else { "off" }),
    )
    .await
}

async fn toggleactive(
    ctx: &Context,
    command: &CommandInteraction,
    deps: &Arc<BotDeps>,
) -> Result<()> {
    let channel_id = command.channel_id.get();
    let now_active = deps.active_channels.toggle(channel_id).await?;

    let text = if now_active {
        format!("<#{channel_id}> added to active channels.")
    } else {
        format!("<#{channel_id}> removed from active channels.")
    };
    respond_text(ctx, command, &text).await
}

async fn clear(ctx: &Context, command: &CommandInteraction, deps: &Arc<BotDeps>) -> Result<()> {
    let key = ConversationKey::new(command.user.id.get(), command.channel_id.get());

    let text = if deps.history.clear(key) {
        "Conversation history cleared."
    } else {
        "There was nothing to clear."
    };
    respond_text(ctx, command, text).await
}

async fn help(ctx: &Context, command: &CommandInteraction) -> Result<()> {
    let mut embed = CreateEmbed::new()
        .title("Bot Commands")
        .colour(Colour::new(COLOR_HELP))
        .footer(CreateEmbedFooter::new("Use the slash menu to run a command"));

    for (name, description) in COMMAND_SUMMARIES {
        embed = embed.field(*name, *description, false);
    }

    command
        .create_response(
            &ctx.http,
            CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new().embed(embed),
            ),
        )
        .await?;

    Ok(())
}
