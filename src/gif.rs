//! Gif lookup: `<q=...>` placeholder replacement in generated responses, and
//! the category-based gif command.

use crate::error::UnknownVariant;

use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

const GIF_SEARCH_URL: &str = "https://gif-api.mishal0legit.repl.co/search";
const NEKOS_API_BASE: &str = "https://nekos.best/api/v2";

static QUERY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<q=(.*?)>").expect("gif query regex must compile"));

#[derive(Debug, Deserialize)]
struct GifSearchResponse {
    gif_url: String,
}

#[derive(Debug, Deserialize)]
struct NekosResponse {
    #[serde(default)]
    results: Vec<NekosResult>,
}

#[derive(Debug, Deserialize)]
struct NekosResult {
    url: String,
}

/// Categories served by the gif command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GifCategory {
    Baka,
    Bite,
    Blush,
    Bored,
    Cry,
    Cuddle,
    Dance,
    Facepalm,
    Feed,
    Handhold,
    Happy,
    Highfive,
    Hug,
    Kick,
    Kiss,
    Laugh,
    Nod,
    Nom,
    Nope,
    Pat,
    Poke,
    Pout,
    Punch,
    Shoot,
    Shrug,
}

impl GifCategory {
    pub const ALL: &[GifCategory] = &[
        GifCategory::Baka,
        GifCategory::Bite,
        GifCategory::Blush,
        GifCategory::Bored,
        GifCategory::Cry,
        GifCategory::Cuddle,
        GifCategory::Dance,
        GifCategory::Facepalm,
        GifCategory::Feed,
        GifCategory::Handhold,
        GifCategory::Happy,
        GifCategory::Highfive,
        GifCategory::Hug,
        GifCategory::Kick,
        GifCategory::Kiss,
        GifCategory::Laugh,
        GifCategory::Nod,
        GifCategory::Nom,
        GifCategory::Nope,
        GifCategory::Pat,
        GifCategory::Poke,
        GifCategory::Pout,
        GifCategory::Punch,
        GifCategory::Shoot,
        GifCategory::Shrug,
    ];

    /// API path segment; doubles as the choice value.
    pub fn slug(self) -> &'static str {
        match self {
            GifCategory::Baka => "baka",
            GifCategory::Bite => "bite",
            GifCategory::Blush => "blush",
            GifCategory::Bored => "bored",
            GifCategory::Cry => "cry",
            GifCategory::Cuddle => "cuddle",
            GifCategory::Dance => "dance",
            GifCategory::Facepalm => "facepalm",
            GifCategory::Feed => "feed",
            GifCategory::Handhold => "handhold",
            GifCategory::Happy => "happy",
            GifCategory::Highfive => "highfive",
            GifCategory::Hug => "hug",
            GifCategory::Kick => "kick",
            GifCategory::Kiss => "kiss",
            GifCategory::Laugh => "laugh",
            GifCategory::Nod => "nod",
            GifCategory::Nom => "nom",
            GifCategory::Nope => "nope",
            GifCategory::Pat => "pat",
            GifCategory::Poke => "poke",
            GifCategory::Pout => "pout",
            GifCategory::Punch => "punch",
            GifCategory::Shoot => "shoot",
            GifCategory::Shrug => "shrug",
        }
    }

    /// Capitalized label for command choices.
    pub fn display_name(self) -> String {
        let slug = self.slug();
        let mut chars = slug.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => String::new(),
        }
    }
}

impl std::str::FromStr for GifCategory {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        GifCategory::ALL
            .iter()
            .copied()
            .find(|category| category.slug() == value)
            .ok_or_else(|| UnknownVariant {
                kind: "gif category",
                value: value.to_string(),
            })
    }
}

/// Extract the first `<q=...>` placeholder, returning the full placeholder
/// and the query inside it.
pub fn extract_query(text: &str) -> Option<(&str, &str)> {
    QUERY_RE.captures(text).and_then(|captures| {
        let placeholder = captures.get(0)?.as_str();
        let query = captures.get(1)?.as_str();
        Some((placeholder, query))
    })
}

/// Client for the gif search and category APIs.
#[derive(Debug, Clone)]
pub struct GifClient {
    http: reqwest::Client,
}

impl GifClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Replace a `<q=...>` placeholder in a generated chunk with a gif URL.
    /// The chunk passes through unchanged when there is no placeholder or the
    /// lookup fails.
    pub async fn replace_search_query(&self, text: String) -> String {
        let Some((placeholder, query)) = extract_query(&text) else {
            return text;
        };

        match self.search(query).await {
            Some(gif_url) => text.replace(placeholder, &gif_url),
            None => text,
        }
    }

    async fn search(&self, query: &str) -> Option<String> {
        let response = self
            .http
            .get(GIF_SEARCH_URL)
            .query(&[("q", query)])
            .send()
            .await;

        match response {
            Ok(response) => match response.json::<GifSearchResponse>().await {
                Ok(decoded) => Some(decoded.gif_url),
                Err(error) => {
                    tracing::warn!(%error, query, "failed to decode gif search response");
                    None
                }
            },
            Err(error) => {
                tracing::warn!(%error, query, "gif search request failed");
                None
            }
        }
    }

    /// A random gif URL for a category.
    pub async fn random_gif(&self, category: GifCategory) -> Option<String> {
        let url = format!("{NEKOS_API_BASE}/{}", category.slug());

        let response = match self.http.get(&url).send().await {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                tracing::warn!(status = %response.status(), "gif category request rejected");
                return None;
            }
            Err(error) => {
                tracing::warn!(%error, "gif category request failed");
                return None;
            }
        };

        match response.json::<NekosResponse>().await {
            Ok(decoded) => decoded.results.into_iter().next().map(|result| result.url),
            Err(error) => {
                tracing::warn!(%error, "failed to decode gif category response");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_query_finds_placeholder() {
        let (placeholder, query) = extract_query("here you go <q=giga chad> enjoy")
            .expect("placeholder should be found");
        assert_eq!(placeholder, "<q=giga chad>");
        assert_eq!(query, "giga chad");
    }

    #[test]
    fn test_extract_query_takes_first_placeholder() {
        let (_, query) = extract_query("<q=first> and <q=second>").expect("should match");
        assert_eq!(query, "first");
    }

    #[test]
    fn test_extract_query_absent() {
        assert!(extract_query("no placeholders here").is_none());
    }

    #[test]
    fn test_category_round_trip() {
        for category in GifCategory::ALL {
            assert_eq!(
                category.slug().parse::<GifCategory>().ok(),
                Some(*category)
            );
        }
        assert!("explosion".parse::<GifCategory>().is_err());
    }

    #[test]
    fn test_category_display_name() {
        assert_eq!(GifCategory::Facepalm.display_name(), "Facepalm");
    }
}
