//! Chat completion orchestration and the text-API collaborators.

pub mod chat;
pub mod moderation;
pub mod search;
pub mod transcript;
pub mod translate;

pub use chat::{ChatClient, WireMessage, build_instructions, compose_request};
pub use moderation::{Assessment, ModerationGate};
pub use search::SearchClient;
pub use transcript::TranscriptClient;
pub use translate::TranslateClient;
