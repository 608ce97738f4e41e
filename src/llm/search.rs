//! Web search context for chat generation.

use super::chat::{ChatClient, WireMessage, strip_label};
use crate::config::SearchConfig;

use regex::Regex;
use serde::Deserialize;
use std::sync::Arc;
use std::sync::LazyLock;

const SEARCH_API_URL: &str = "https://ddg-api.herokuapp.com/search";

/// Prompts longer than this skip search entirely.
const MAX_PROMPT_CHARS: usize = 200;

/// Derived queries longer than this are suppressed.
const MAX_QUERY_CHARS: usize = 1000;

/// Blob returned when the user asked for a gif; short-circuits real search.
const GIF_FORMAT_HINT: &str = "User asked for a gif. To send a gif you will use the format \
    <q=(.*?)>, for example to send a giga chad you will send <q=gigachad>. You will never \
    send a tenor.com markdown link; always send `<q=Anime girl>` style placeholders with no \
    markdown syntax when asked for a gif.";

const NO_QUERY_BLOB: &str = "No search query is needed for a response";

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("url regex must compile"));

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    link: String,
}

/// Gathers search-result context for a prompt, degrading to absent on any
/// failure.
#[derive(Debug, Clone)]
pub struct SearchClient {
    http: reqwest::Client,
    chat: Arc<ChatClient>,
    enabled: bool,
    max_results: u8,
}

impl SearchClient {
    pub fn new(http: reqwest::Client, chat: Arc<ChatClient>, config: &SearchConfig) -> Self {
        Self {
            http,
            chat,
            enabled: config.internet_access,
            max_results: config.max_results,
        }
    }

    /// Search context for `prompt`, or `None` when suppressed or failed.
    pub async fn context_for(&self, prompt: &str) -> Option<String> {
        if prompt.to_lowercase().contains("gif") {
            return Some(GIF_FORMAT_HINT.to_string());
        }

        if !self.enabled || prompt.chars().count() > MAX_PROMPT_CHARS {
            return None;
        }

        let query = match extract_url(prompt) {
            Some(url) => Some(url.to_string()),
            None => self.derive_query(prompt).await,
        };

        let Some(query) = query else {
            return Some(NO_QUERY_BLOB.to_string());
        };

        if query.chars().count() > MAX_QUERY_CHARS {
            return None;
        }

        self.fetch_results(&query).await
    }

    async fn fetch_results(&self, query: &str) -> Option<String> {
        tracing::debug!(query, limit = self.max_results, "running web search");

        let response = self
            .http
            .get(SEARCH_API_URL)
            .query(&[("query", query), ("limit", &self.max_results.to_string())])
            .send()
            .await;

        let results: Vec<SearchResult> = match response {
            Ok(response) => match response.json().await {
                Ok(results) => results,
                Err(error) => {
                    tracing::warn!(%error, "failed to decode search response");
                    return None;
                }
            },
            Err(error) => {
                tracing::warn!(%error, "search request failed");
                return None;
            }
        };

        let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        let mut blob = format!("Search results for: '{query}' at {now}:\n");
        for (index, result) in results.iter().enumerate() {
            blob.push_str(&format!(
                "[{index}] \"{}\"\n\nURL: {}\n",
                result.snippet, result.link
            ));
        }
        blob.push_str(
            "\nSearch results allow you to have real-time information and the ability to \
             browse the internet.\nAs the links were generated by the system rather than \
             the user, please send a response along with the link if necessary.\n",
        );

        Some(blob)
    }

    /// Derive a search query from the prompt, or `None` when the model decides
    /// no search is needed (or the backend is unavailable).
    async fn derive_query(&self, prompt: &str) -> Option<String> {
        let messages = query_messages(prompt);
        let response = self.chat.completion(&messages).await?;
        clean_query(&response)
    }
}

/// First URL appearing in the prompt, used verbatim as the query.
pub fn extract_url(prompt: &str) -> Option<&str> {
    URL_RE.find(prompt).map(|found| found.as_str())
}

/// Normalize a query-derivation completion. "False" means no search.
fn clean_query(response: &str) -> Option<String> {
    if response.to_lowercase().contains("false") {
        return None;
    }

    let cleaned = strip_label(response, "Query");
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

fn query_messages(prompt: &str) -> Vec<WireMessage> {
    vec![
        WireMessage::system(
            "instructions",
            "IMPORTANT : From now on you are going to act as search query ai. If a message \
             is not directly addressed to the second person, you will need to initiate a \
             search query, else assistant will respond with False and nothing more. The \
             assistant must only help by returning a query.",
        ),
        WireMessage::system("example_user", "Message : Who made you ?"),
        WireMessage::system("example_assistant", "Query : False"),
        WireMessage::system("example_user", "Message : Who won in 2022 fifa world cup"),
        WireMessage::system("example_assistant", "Query : FIFA World Cup results 2022"),
        WireMessage::system("example_user", "Message : Hi"),
        WireMessage::system("example_assistant", "Query : False"),
        WireMessage::system("example_user", "Message : What is happening in ukraine"),
        WireMessage::system("example_assistant", "Query : Ukraine military news today"),
        WireMessage::system("example_user", "Message : How are you doing ?"),
        WireMessage::system("example_assistant", "Query : False"),
        WireMessage::system(
            "example_user",
            "Message : How to print how many commands are synced on_ready ?",
        ),
        WireMessage::system(
            "example_assistant",
            "Query : Python code to print the number of synced commands in on_ready event",
        ),
        WireMessage::user(format!("Message : {prompt}")),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_url_finds_first_link() {
        assert_eq!(
            extract_url("look at https://example.com/page and tell me"),
            Some("https://example.com/page")
        );
        assert_eq!(extract_url("no links here"), None);
    }

    #[test]
    fn test_clean_query_false_means_no_search() {
        assert_eq!(clean_query("Query : False"), None);
        assert_eq!(clean_query("false"), None);
    }

    #[test]
    fn test_clean_query_strips_label() {
        assert_eq!(
            clean_query("Query : FIFA World Cup results 2022"),
            Some("FIFA World Cup results 2022".to_string())
        );
    }

    #[test]
    fn test_clean_query_empty_is_none() {
        assert_eq!(clean_query("Query :"), None);
        assert_eq!(clean_query(""), None);
    }

    #[test]
    fn test_query_messages_end_with_user_prompt() {
        let messages = query_messages("what's the weather in Berlin");
        let last = messages.last().expect("messages should not be empty");
        assert_eq!(last.role, "user");
        assert!(last.content.contains("weather in Berlin"));
    }
}
