use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

use crate::error::WebhookError;

const MAX_INLINE_IMAGE_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// `data:` URL carried in the payload; must be uploaded.
    Inline { mime_type: String, bytes: Vec<u8> },
    /// Already hosted somewhere; recorded as-is.
    Remote(String),
}

impl ImageSource {
    /// Interprets the chatbot's image field. Answers such as "no" or "skip"
    /// mean no image was provided.
    pub fn parse(value: &str) -> Result<Option<Self>, WebhookError> {
        let value = value.trim();

        if let Some(rest) = value.strip_prefix("data:") {
            let (header, data) = rest
                .split_once(',')
                .ok_or_else(|| WebhookError::InvalidImage("data URL has no payload".to_string()))?;

            let mime_type = header
                .strip_suffix(";base64")
                .ok_or_else(|| WebhookError::InvalidImage("only base64 data URLs are accepted".to_string()))?;

            if !mime_type.starts_with("image/") {
                return Err(WebhookError::InvalidImage(format!("unsupported type {}", mime_type)));
            }

            let cleaned: String = data.chars().filter(|c| !c.is_whitespace()).collect();
            let bytes = BASE64
                .decode(cleaned)
                .map_err(|e| WebhookError::InvalidImage(format!("failed to decode base64 data: {}", e)))?;

            if bytes.is_empty() {
                return Err(WebhookError::InvalidImage("image is empty".to_string()));
            }
            if bytes.len() > MAX_INLINE_IMAGE_BYTES {
                return Err(WebhookError::InvalidImage(format!(
                    "image is {} bytes, limit is {}",
                    bytes.len(),
                    MAX_INLINE_IMAGE_BYTES
                )));
            }

            return Ok(Some(ImageSource::Inline {
                mime_type: mime_type.to_string(),
                bytes,
            }));
        }

        if is_hosted_url(value) {
            return Ok(Some(ImageSource::Remote(value.to_string())));
        }

        Ok(None)
    }
}

/// Absolute `http`/`https` URL with a host and no embedded whitespace.
fn is_hosted_url(value: &str) -> bool {
    let lowered = value.to_ascii_lowercase();
    let Some(rest) = lowered
        .strip_prefix("https://")
        .or_else(|| lowered.strip_prefix("http://"))
    else {
        return false;
    };

    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    !host.is_empty() && !value.contains(char::is_whitespace)
}

pub fn extension_for(mime_type: &str) -> &'static str {
    match mime_type {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "image/heic" => "heic",
        _ => "bin",
    }
}

pub fn file_name_from_url(url: &str) -> String {
    url.split(['?', '#'])
        .next()
        .and_then(|path| path.rsplit('/').next())
        .filter(|segment| !segment.is_empty())
        .unwrap_or("image")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn data_url_is_decoded() {
        let source = ImageSource::parse("data:image/png;base64,iVBORw0KGgo=").unwrap();

        assert_matches!(source, Some(ImageSource::Inline { ref mime_type, ref bytes }) => {
            assert_eq!(mime_type, "image/png");
            assert_eq!(bytes[..4], [0x89, b'P', b'N', b'G']);
        });
    }

    #[test]
    fn hosted_urls_are_kept() {
        assert_eq!(
            ImageSource::parse("https://cdn.example.com/u/abc.jpg").unwrap(),
            Some(ImageSource::Remote("https://cdn.example.com/u/abc.jpg".to_string()))
        );
    }

    #[test]
    fn declined_answers_mean_no_image() {
        assert_eq!(ImageSource::parse("no").unwrap(), None);
        assert_eq!(ImageSource::parse("skipped").unwrap(), None);
    }

    #[test]
    fn slashed_answers_are_not_urls() {
        assert_eq!(ImageSource::parse("n/a").unwrap(), None);
        assert_eq!(ImageSource::parse("N/A").unwrap(), None);
        assert_eq!(ImageSource::parse("yes/no").unwrap(), None);
        assert_eq!(ImageSource::parse("/uploads/photo.jpg").unwrap(), None);
        assert_eq!(ImageSource::parse("https://").unwrap(), None);
        assert_eq!(
            ImageSource::parse("HTTP://cdn.example.com/a.png").unwrap(),
            Some(ImageSource::Remote("HTTP://cdn.example.com/a.png".to_string()))
        );
    }

    #[test]
    fn bad_data_urls_are_rejected() {
        assert_matches!(ImageSource::parse("data:image/png;base64,@@@"), Err(WebhookError::InvalidImage(_)));
        assert_matches!(ImageSource::parse("data:text/plain;base64,aGk="), Err(WebhookError::InvalidImage(_)));
        assert_matches!(ImageSource::parse("data:image/png,raw"), Err(WebhookError::InvalidImage(_)));
    }

    #[test]
    fn file_names_come_from_the_last_segment() {
        assert_eq!(file_name_from_url("https://x.io/a/b/photo.jpg?token=1"), "photo.jpg");
        assert_eq!(file_name_from_url("https://x.io/"), "image");
        assert_eq!(extension_for("image/jpeg"), "jpg");
    }
}
