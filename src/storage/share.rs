//! Share-link encoding and decoding
//!
//! A share link carries one complete session in the URL fragment as
//! `#share=<base64 of the JSON-serialized session>`, so a session can be
//! viewed read-only without any server-side storage. Encoding is a pure
//! function; decoding is total and treats every failure as "no shared
//! session".

use crate::error::{CorechatError, Result};
use crate::session::ChatSession;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use url::Url;

/// Fragment prefix marking an embedded shared session
const SHARE_PREFIX: &str = "share=";

/// Builds a full share URL for one session
///
/// # Arguments
///
/// * `base_url` - The page URL the fragment is appended to
/// * `session` - The session to embed
///
/// # Errors
///
/// Returns an error if `base_url` is not a valid URL or the session fails to
/// serialize.
///
/// # Examples
///
/// ```
/// use corechat::session::ChatSession;
/// use corechat::storage::share::encode_share_link;
///
/// let session = ChatSession::new();
/// let link = encode_share_link("http://localhost:5173/", &session).unwrap();
/// assert!(link.contains("#share="));
/// ```
pub fn encode_share_link(base_url: &str, session: &ChatSession) -> Result<String> {
    let mut url = Url::parse(base_url)
        .map_err(|e| CorechatError::Share(format!("Invalid share base URL: {}", e)))?;

    let json = serde_json::to_string(session)
        .map_err(|e| CorechatError::Share(format!("Failed to serialize session: {}", e)))?;

    let fragment = format!("{}{}", SHARE_PREFIX, BASE64.encode(json));
    url.set_fragment(Some(&fragment));

    Ok(url.to_string())
}

/// Decodes a session from a URL fragment
///
/// Accepts the fragment with or without its leading `#`. Any failure (missing
/// prefix, bad base64, invalid JSON, schema mismatch) is logged and yields
/// `None`; the caller falls back to the durable store.
///
/// # Examples
///
/// ```
/// use corechat::storage::share::decode_share_fragment;
///
/// assert!(decode_share_fragment("share=!!!not-base64!!!").is_none());
/// assert!(decode_share_fragment("unrelated=42").is_none());
/// ```
pub fn decode_share_fragment(fragment: &str) -> Option<ChatSession> {
    let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
    let payload = fragment.strip_prefix(SHARE_PREFIX)?;

    let bytes = match BASE64.decode(payload) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!("Share fragment is not valid base64: {}", e);
            return None;
        }
    };

    match serde_json::from_slice::<ChatSession>(&bytes) {
        Ok(session) => Some(session),
        Err(e) => {
            tracing::warn!("Share fragment does not decode to a session: {}", e);
            None
        }
    }
}

/// Extracts the fragment from a full share URL
///
/// Returns `None` for unparseable URLs or URLs without a fragment.
///
/// # Examples
///
/// ```
/// use corechat::storage::share::extract_fragment;
///
/// let fragment = extract_fragment("http://localhost:5173/#share=abc").unwrap();
/// assert_eq!(fragment, "share=abc");
/// assert!(extract_fragment("not a url").is_none());
/// ```
pub fn extract_fragment(link: &str) -> Option<String> {
    Url::parse(link)
        .ok()
        .and_then(|url| url.fragment().map(|f| f.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::ChatMessage;

    fn sample_session() -> ChatSession {
        let mut session = ChatSession::new();
        session.title = "Shared strategy talk".to_string();
        session.messages.push(ChatMessage::ai("Welcome"));
        session.messages.push(ChatMessage::user("How are my videos doing?"));
        session
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let session = sample_session();
        let link = encode_share_link("http://localhost:5173/", &session).unwrap();

        let fragment = extract_fragment(&link).expect("link has fragment");
        let decoded = decode_share_fragment(&fragment).expect("fragment decodes");

        assert_eq!(decoded, session);
    }

    #[test]
    fn test_encode_rejects_invalid_base_url() {
        let session = sample_session();
        let result = encode_share_link("definitely not a url", &session);
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_tolerates_leading_hash() {
        let session = sample_session();
        let link = encode_share_link("http://localhost:5173/", &session).unwrap();
        let fragment = format!("#{}", extract_fragment(&link).unwrap());

        assert_eq!(decode_share_fragment(&fragment), Some(session));
    }

    #[test]
    fn test_decode_rejects_missing_prefix() {
        assert!(decode_share_fragment("other=abcd").is_none());
    }

    #[test]
    fn test_decode_rejects_bad_base64() {
        assert!(decode_share_fragment("share=%%%").is_none());
    }

    #[test]
    fn test_decode_rejects_non_session_json() {
        let payload = BASE64.encode("{\"not\":\"a session\"}");
        assert!(decode_share_fragment(&format!("share={}", payload)).is_none());
    }

    #[test]
    fn test_extract_fragment_none_without_fragment() {
        assert!(extract_fragment("http://localhost:5173/").is_none());
    }

    #[test]
    fn test_encoding_is_pure() {
        let session = sample_session();
        let a = encode_share_link("http://localhost:5173/", &session).unwrap();
        let b = encode_share_link("http://localhost:5173/", &session).unwrap();
        assert_eq!(a, b);
    }
}
