//! # arkiv-codec
//!
//! Stateless text codecs for the arkiv identifier subsystem.
//!
//! Three unpadded encodings are supported:
//!
//! - Base16: lowercase hex
//! - Base32: lowercase RFC 4648 alphabet — the canonical identifier form
//! - Base64: URL-safe alphabet
//!
//! All three are byte-exact and reversible. Encoding an empty slice yields
//! an empty string; decoding rejects any character outside the alphabet,
//! any impossible length, and any non-zero trailing bits, so a decoded
//! string is always the unique encoding of its bytes.
//!
//! The encoded lengths of a 22-byte identifier (44 / 36 / 30 characters)
//! are load-bearing: identifier parsing uses them to detect which encoding
//! a piece of text carries.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use thiserror::Error;

/// Errors produced when decoding malformed text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A character outside the encoding's alphabet.
    #[error("invalid character {character:?} at position {position}")]
    InvalidCharacter { character: char, position: usize },

    /// A length no valid encoding can produce.
    #[error("invalid input length {length}")]
    InvalidLength { length: usize },

    /// Trailing bits of the final character are not zero.
    #[error("non-zero trailing bits in final character")]
    TrailingBits,
}

// ============================================================================
// Base16
// ============================================================================

/// Encodes bytes as lowercase unpadded hex.
#[must_use]
pub fn encode_base16(data: &[u8]) -> String {
    hex::encode(data)
}

/// Decodes lowercase hex into bytes.
pub fn decode_base16(text: &str) -> Result<Vec<u8>, DecodeError> {
    for (position, character) in text.chars().enumerate() {
        if !matches!(character, '0'..='9' | 'a'..='f') {
            return Err(DecodeError::InvalidCharacter {
                character,
                position,
            });
        }
    }
    // Only an odd digit count can fail past the alphabet check.
    hex::decode(text).map_err(|_| DecodeError::InvalidLength { length: text.len() })
}

// ============================================================================
// Base32
// ============================================================================

const BASE32_ALPHABET: &[u8; 32] = b"abcdefghijklmnopqrstuvwxyz234567";

/// Encodes bytes as lowercase unpadded RFC 4648 Base32.
#[must_use]
pub fn encode_base32(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len().div_ceil(5) * 8);
    let mut buf = 0u16;
    let mut bits = 0u32;

    for &byte in data {
        buf = (buf << 8) | u16::from(byte);
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            out.push(BASE32_ALPHABET[usize::from((buf >> bits) & 0x1f)] as char);
            buf &= (1 << bits) - 1;
        }
    }
    if bits > 0 {
        out.push(BASE32_ALPHABET[usize::from((buf << (5 - bits)) & 0x1f)] as char);
    }
    out
}

/// Decodes lowercase unpadded RFC 4648 Base32 into bytes.
pub fn decode_base32(text: &str) -> Result<Vec<u8>, DecodeError> {
    // Lengths 1, 3 and 6 mod 8 leave fewer than 8 usable bits over and
    // cannot come from any byte string.
    if matches!(text.len() % 8, 1 | 3 | 6) {
        return Err(DecodeError::InvalidLength { length: text.len() });
    }

    let mut out = Vec::with_capacity(text.len() * 5 / 8);
    let mut buf = 0u16;
    let mut bits = 0u32;

    for (position, character) in text.chars().enumerate() {
        let value = match character {
            'a'..='z' => character as u16 - 'a' as u16,
            '2'..='7' => character as u16 - '2' as u16 + 26,
            _ => {
                return Err(DecodeError::InvalidCharacter {
                    character,
                    position,
                })
            }
        };
        buf = (buf << 5) | value;
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            out.push((buf >> bits) as u8);
            buf &= (1 << bits) - 1;
        }
    }
    if buf != 0 {
        return Err(DecodeError::TrailingBits);
    }
    Ok(out)
}

// ============================================================================
// Base64
// ============================================================================

/// Encodes bytes as unpadded URL-safe Base64.
#[must_use]
pub fn encode_base64(data: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(data)
}

/// Decodes unpadded URL-safe Base64 into bytes.
pub fn decode_base64(text: &str) -> Result<Vec<u8>, DecodeError> {
    URL_SAFE_NO_PAD.decode(text).map_err(|err| match err {
        base64::DecodeError::InvalidByte(position, byte) => DecodeError::InvalidCharacter {
            character: byte as char,
            position,
        },
        base64::DecodeError::InvalidLastSymbol(position, byte) => DecodeError::InvalidCharacter {
            character: byte as char,
            position,
        },
        base64::DecodeError::InvalidLength(length) => DecodeError::InvalidLength { length },
        base64::DecodeError::InvalidPadding => DecodeError::InvalidLength { length: text.len() },
    })
}

// ============================================================================
// Tests
// ============================================================================
