//! Tag-write body decoding.
//!
//! Clients send the head image id as a bare JSON string (`"abc123"`), but the
//! only contract is that the first double-quoted alphanumeric token in the
//! payload is the image id.

use crate::image::ImageId;

/// Extract the first `"<alnum+>"` token from a tag-write body.
///
/// The first token is the image id even when it is not a valid one: a token
/// longer than [`MAX_IMAGE_ID_LEN`](crate::image::MAX_IMAGE_ID_LEN) rejects the
/// body instead of falling through to a later token.
pub fn parse_tag_body(body: &[u8]) -> crate::Result<ImageId> {
    let mut i = 0;
    while i < body.len() {
        if body[i] != b'"' {
            i += 1;
            continue;
        }

        let start = i + 1;
        let end = body[start..]
            .iter()
            .position(|b| !b.is_ascii_alphanumeric())
            .map_or(body.len(), |offset| start + offset);

        if end > start && body.get(end) == Some(&b'"') {
            // Alphanumeric bytes are ASCII, so this slice is valid UTF-8.
            let token = std::str::from_utf8(&body[start..end])
                .map_err(|e| crate::Error::InvalidTagBody(e.to_string()))?;
            return ImageId::parse(token)
                .map_err(|e| crate::Error::InvalidTagBody(e.to_string()));
        }

        // The bytes between the quote and `end` are alphanumeric, so no quote
        // can start a match before `end`.
        i = if end > start { end } else { start };
    }

    Err(crate::Error::InvalidTagBody(
        "no quoted image id in body".to_string(),
    ))
}
