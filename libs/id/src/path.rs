//! Multi-identifier paths: ancestry chains encoded as one string.
//!
//! A path is the concatenation of the canonical Base32 forms of its
//! identifiers, either back to back (fixed 36-character blocks) or with a
//! single-character separator between entries. Order is insertion order;
//! callers conventionally write root-to-leaf chains.
//!
//! Every operation trims surrounding whitespace before looking at the
//! text. A path whose length does not divide into whole blocks, or whose
//! blocks fail to parse, is malformed.

use crate::error::IdError;
use crate::identifier::{Identifier, KEY_SIZE_BASE32};

/// Joins identifiers into a fixed-width path with no separator.
#[must_use]
pub fn join(ids: &[Identifier]) -> String {
    let mut out = String::with_capacity(ids.len() * KEY_SIZE_BASE32);
    for id in ids {
        out.push_str(&id.to_base32());
    }
    out
}

/// Joins identifiers with a single-character separator between entries.
#[must_use]
pub fn join_with_separator(ids: &[Identifier], separator: char) -> String {
    let mut out = String::with_capacity(ids.len() * (KEY_SIZE_BASE32 + 1));
    for (index, id) in ids.iter().enumerate() {
        if index > 0 {
            out.push(separator);
        }
        out.push_str(&id.to_base32());
    }
    out
}

/// Splits a fixed-width path back into its identifiers.
pub fn split(text: &str) -> Result<Vec<Identifier>, IdError> {
    let text = aligned(text)?;
    text.as_bytes()
        .chunks(KEY_SIZE_BASE32)
        .map(|chunk| Identifier::parse(str_chunk(chunk)))
        .collect()
}

/// Splits a separator-delimited path back into its identifiers.
pub fn split_with_separator(text: &str, separator: char) -> Result<Vec<Identifier>, IdError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }
    text.split(separator).map(Identifier::parse).collect()
}

/// Number of identifiers in a fixed-width path.
pub fn count(text: &str) -> Result<usize, IdError> {
    Ok(aligned(text)?.len() / KEY_SIZE_BASE32)
}

/// First identifier of a fixed-width path.
pub fn first(text: &str) -> Result<Identifier, IdError> {
    let text = non_empty(text)?;
    Identifier::parse(&text[..KEY_SIZE_BASE32])
}

/// Last identifier of a fixed-width path.
pub fn last(text: &str) -> Result<Identifier, IdError> {
    let text = non_empty(text)?;
    Identifier::parse(&text[text.len() - KEY_SIZE_BASE32..])
}

/// Whether a fixed-width path contains the given identifier.
///
/// Every block is parsed, so a path with a malformed block is an error
/// rather than a miss.
pub fn contains(text: &str, id: &Identifier) -> Result<bool, IdError> {
    Ok(split(text)?.iter().any(|entry| entry == id))
}

/// Whether a fixed-width path contains any of the given identifiers.
pub fn contains_any(text: &str, ids: &[Identifier]) -> Result<bool, IdError> {
    Ok(split(text)?.iter().any(|entry| ids.contains(entry)))
}

/// Trims and checks that the text is made of whole 36-character blocks.
fn aligned(text: &str) -> Result<&str, IdError> {
    let text = text.trim();
    if !text.is_ascii() || text.len() % KEY_SIZE_BASE32 != 0 {
        return Err(IdError::UnknownFormat { length: text.len() });
    }
    Ok(text)
}

fn non_empty(text: &str) -> Result<&str, IdError> {
    let text = aligned(text)?;
    if text.is_empty() {
        return Err(IdError::Empty);
    }
    Ok(text)
}

fn str_chunk(chunk: &[u8]) -> &str {
    // aligned() guarantees ASCII input.
    std::str::from_utf8(chunk).unwrap_or("")
}
