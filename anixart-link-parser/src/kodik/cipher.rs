//! Kodik stream URL obfuscation
//!
//! Obfuscated `src` values are base64 text passed through a per-case
//! letter rotation by 18. Undoing it means rotating every ASCII letter
//! forward by 18 (wrapping within its case) and then base64-decoding.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;

const SHIFT: u8 = 18;

/// Base64 decoder that accepts payloads with or without `=` padding
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Rotate one character; non-letters pass through
#[must_use]
pub const fn decode_char(c: char) -> char {
    let bound = match c {
        'A'..='Z' => b'Z',
        'a'..='z' => b'z',
        _ => return c,
    };
    let mut shifted = c as u8 + SHIFT;
    if shifted > bound {
        shifted -= 26;
    }
    shifted as char
}

/// Apply the letter rotation to a whole string
#[must_use]
pub fn decode_cipher(input: &str) -> String {
    input.chars().map(decode_char).collect()
}

/// Decode a base64 payload into UTF-8 text (`atob` for ASCII payloads)
#[must_use]
pub fn decode_base64_text(input: &str) -> Option<String> {
    let bytes = LENIENT_BASE64.decode(input.trim()).ok()?;
    String::from_utf8(bytes).ok()
}

/// Turn an obfuscated `src` into a playable URL
#[must_use]
pub fn decode_source(src: &str) -> Option<String> {
    decode_base64_text(&decode_cipher(src))
}
