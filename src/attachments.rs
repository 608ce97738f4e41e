//! Attachment-derived context for chat generation.
//!
//! The first readable text attachment becomes the file-content blob; failing
//! that, the first image attachment is captioned and wrapped in a caption
//! prompt. File context always wins over search and transcript context.

use crate::image::ImagineClient;

use serenity::all::Attachment;

/// Extensions treated as readable text.
const TEXT_EXTENSIONS: &[&str] = &[
    "txt", "rtf", "md", "html", "xml", "csv", "json", "js", "css", "py", "java", "c", "cpp",
    "php", "rb", "swift", "sql", "sh", "bat", "ps1", "ini", "cfg", "conf", "log", "svg", "tex",
    "eml", "yml", "yaml", "toml", "env", "pdf",
];

/// Extensions treated as captionable images.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

const UNREADABLE_PLACEHOLDER: &str =
    "Unable to read file content in any of the supported encodings.";

/// Whether an attachment filename looks like readable text.
pub fn is_text_attachment(filename: &str) -> bool {
    extension(filename).is_some_and(|ext| TEXT_EXTENSIONS.contains(&ext.as_str()))
}

/// Whether an attachment filename looks like a captionable image.
pub fn is_image_attachment(filename: &str) -> bool {
    extension(filename).is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

fn extension(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
}

/// Derive file context from a message's attachments, or `None` when no
/// attachment is usable. Download and extraction failures degrade to `None`
/// (or to a placeholder blob once a text attachment has been committed to).
pub async fn derive_context(
    attachments: &[Attachment],
    imagine: &ImagineClient,
) -> Option<String> {
    for attachment in attachments {
        if !is_text_attachment(&attachment.filename) {
            continue;
        }

        let bytes = match attachment.download().await {
            Ok(bytes) => bytes,
            Err(error) => {
                tracing::warn!(%error, filename = %attachment.filename, "failed to download attachment");
                return None;
            }
        };

        let text = extract_text(&attachment.filename, bytes).await;
        return Some(format!(
            "The user has sent the following file content : {}: {}.\n\nSend a response based on it",
            attachment.filename, text
        ));
    }

    for attachment in attachments {
        if !is_image_attachment(&attachment.filename) {
            continue;
        }

        let bytes = match attachment.download().await {
            Ok(bytes) => bytes,
            Err(error) => {
                tracing::warn!(%error, filename = %attachment.filename, "failed to download attachment");
                return None;
            }
        };

        let caption = match imagine.interrogate(bytes).await {
            Ok(caption) => caption,
            Err(error) => {
                tracing::warn!(%error, filename = %attachment.filename, "failed to caption image");
                return None;
            }
        };

        return Some(format!(
            "The user has sent an image file, and the following is the caption for the image \
             in text : [{caption}]. Hypothetically describe the image as if you were seeing \
             it perfectly"
        ));
    }

    None
}

async fn extract_text(filename: &str, bytes: Vec<u8>) -> String {
    if filename.to_lowercase().ends_with(".pdf") {
        let extracted =
            tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes)).await;

        return match extracted {
            Ok(Ok(text)) if !text.trim().is_empty() => text,
            Ok(Ok(_)) => UNREADABLE_PLACEHOLDER.to_string(),
            Ok(Err(error)) => {
                tracing::warn!(%error, filename, "pdf extraction failed");
                UNREADABLE_PLACEHOLDER.to_string()
            }
            Err(error) => {
                tracing::warn!(%error, filename, "pdf extraction task failed");
                UNREADABLE_PLACEHOLDER.to_string()
            }
        };
    }

    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(error) => String::from_utf8_lossy(error.as_bytes()).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_extension_detection() {
        assert!(is_text_attachment("notes.txt"));
        assert!(is_text_attachment("REPORT.PDF"));
        assert!(is_text_attachment("config.yml"));
        assert!(!is_text_attachment("photo.png"));
        assert!(!is_text_attachment("archive.zip"));
        assert!(!is_text_attachment("no_extension"));
    }

    #[test]
    fn test_image_extension_detection() {
        assert!(is_image_attachment("photo.png"));
        assert!(is_image_attachment("animated.GIF"));
        assert!(!is_image_attachment("notes.txt"));
        assert!(!is_image_attachment("video.mp4"));
    }

    #[tokio::test]
    async fn test_extract_text_utf8() {
        let text = extract_text("notes.txt", b"plain contents".to_vec()).await;
        assert_eq!(text, "plain contents");
    }

    #[tokio::test]
    async fn test_extract_text_lossy_fallback() {
        let text = extract_text("notes.txt", vec![0x68, 0x69, 0xFF]).await;
        assert!(text.starts_with("hi"));
    }
}
