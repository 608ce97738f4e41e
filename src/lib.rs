//! Musebot: a Discord chat bot bridging channels to LLM and image generation
//! APIs, with per-(author, channel) conversation state.

pub mod attachments;
pub mod channels;
pub mod config;
pub mod conversation;
pub mod discord;
pub mod engage;
pub mod error;
pub mod gif;
pub mod image;
pub mod keepalive;
pub mod llm;
pub mod sanitize;

pub use error::{Error, Result};
