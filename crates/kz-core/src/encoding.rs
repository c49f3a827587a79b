//! # Web-Safe Base64 Integer Codec
//!
//! Every scalar in a serialized key record is a big-endian unsigned
//! integer written as base64url without padding.
//!
//! ## Encoding Rules
//!
//! - Leading zero bytes of the magnitude are stripped.
//! - A single `0x00` byte is prepended when the high bit of the first
//!   magnitude byte is set. The output is then a valid two's-complement
//!   encoding as well, so signed decoders read the same positive value.
//! - Zero encodes as one `0x00` byte.
//!
//! Decoding accepts both the minimal and the sign-padded forms, ignores
//! surrounding whitespace, and tolerates trailing `=` padding.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;

use crate::error::KeyError;

/// Encode raw bytes as base64url without padding.
pub fn encode_web_safe(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode base64url text, with or without trailing padding.
pub fn decode_web_safe(text: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let trimmed = text.trim().trim_end_matches('=');
    URL_SAFE_NO_PAD.decode(trimmed)
}

/// Strip leading zero bytes.
pub fn strip_leading_zeros(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    &bytes[start..]
}

/// Encode a big-endian unsigned magnitude as a key-record scalar.
pub fn encode_unsigned(magnitude: &[u8]) -> String {
    let stripped = strip_leading_zeros(magnitude);
    match stripped.first() {
        None => encode_web_safe(&[0]),
        Some(first) if first & 0x80 != 0 => {
            let mut padded = Vec::with_capacity(stripped.len() + 1);
            padded.push(0);
            padded.extend_from_slice(stripped);
            encode_web_safe(&padded)
        }
        Some(_) => encode_web_safe(stripped),
    }
}

/// Decode a key-record scalar into its minimal big-endian magnitude.
///
/// `field` names the record field for the error message. An empty or
/// undecodable value is a [`KeyError::MalformedKey`].
pub fn decode_unsigned(field: &str, text: &str) -> Result<Vec<u8>, KeyError> {
    let bytes = decode_web_safe(text)
        .map_err(|e| KeyError::MalformedKey(format!("field `{field}` is not base64url: {e}")))?;
    if bytes.is_empty() {
        return Err(KeyError::MalformedKey(format!("field `{field}` is empty")));
    }
    Ok(strip_leading_zeros(&bytes).to_vec())
}
