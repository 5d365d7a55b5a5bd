//! The 22-byte identifier value type.
//!
//! Field layout (big-endian, offsets in bytes):
//!
//! ```text
//! 0        1            2..6      6..10                10..13     13..19     19..22
//! version  object type  domain    worm bit + platform  process    timestamp  counter
//! ```
//!
//! - version: algorithm tag, currently 1
//! - object type: archival entity kind, one byte
//! - domain: 30-bit tenant scope, top two bits reserved as zero
//! - worm + platform: top bit is the WORM hint, low 31 bits the node identity
//! - process: 22-bit generating-process id
//! - timestamp: 48-bit milliseconds since the Unix epoch
//! - counter: 24-bit per-millisecond collision counter
//!
//! An identifier is created once, by generation or by parsing, and never
//! mutated. Uniqueness inside one process comes from the (timestamp,
//! counter) pair, which is handed out under a process-wide lock; across
//! processes it relies on distinct platform and process identity.

use std::fmt;
use std::str::FromStr;
use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use arkiv_codec::{
    decode_base16, decode_base32, decode_base64, encode_base16, encode_base32, encode_base64,
};

use crate::error::IdError;
use crate::object_type::ObjectType;

/// Size of an identifier in raw bytes.
pub const KEY_SIZE: usize = 22;

/// Length of the Base16 text form.
pub const KEY_SIZE_BASE16: usize = 44;

/// Length of the Base32 text form — the canonical representation.
pub const KEY_SIZE_BASE32: usize = 36;

/// Length of the Base64 text form.
pub const KEY_SIZE_BASE64: usize = 30;

/// Current algorithm version tag.
pub const VERSION: u8 = 1;

/// Maximum domain id (30 bits).
pub const DOMAIN_ID_MAX: u32 = (1 << 30) - 1;

/// Maximum platform id (31 bits).
pub const PLATFORM_ID_MAX: u32 = (1 << 31) - 1;

/// Maximum process id (22 bits).
pub const PROCESS_ID_MAX: u32 = (1 << 22) - 1;

/// Maximum per-millisecond counter value (24 bits).
pub const COUNTER_MAX: u32 = (1 << 24) - 1;

/// Maximum timestamp (48 bits of milliseconds).
pub const TIMESTAMP_MAX: u64 = (1 << 48) - 1;

/// Scheme marker of the Ark text form.
pub const ARK_PREFIX: &str = "ark:/";

const OFS_VERSION: usize = 0;
const OFS_OBJECT_TYPE: usize = 1;
const OFS_DOMAIN: usize = 2;
const OFS_PLATFORM: usize = 6;
const OFS_PROCESS: usize = 10;
const OFS_TIMESTAMP: usize = 13;
const OFS_COUNTER: usize = 19;

/// Number of bytes of the Ark name (everything except the domain field).
const ARK_NAME_SIZE: usize = KEY_SIZE - 4;

/// An immutable, globally unique, orderable identifier for an archived
/// entity.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identifier {
    bytes: [u8; KEY_SIZE],
}

// ============================================================================
// Generation clock
// ============================================================================

struct GenState {
    last_millis: u64,
    counter: u32,
}

/// One lock for all in-process generation; held only to read the clock and
/// bump the counter, never across I/O.
static GEN_STATE: Mutex<GenState> = Mutex::new(GenState {
    last_millis: 0,
    counter: 0,
});

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
        & TIMESTAMP_MAX
}

/// Hands out a unique (timestamp, counter) pair for this process.
///
/// The counter resets whenever the wall clock advances past the last seen
/// millisecond and increments otherwise, so pairs never repeat even when
/// the clock stalls or steps backwards. Counter exhaustion advances the
/// logical millisecond instead of blocking.
fn next_tick() -> (u64, u32) {
    let mut state = GEN_STATE
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    let now = unix_millis();
    if now > state.last_millis {
        state.last_millis = now;
        state.counter = 0;
    } else if state.counter >= COUNTER_MAX {
        state.last_millis += 1;
        state.counter = 0;
    } else {
        state.counter += 1;
    }
    (state.last_millis, state.counter)
}

// ============================================================================
// Identifier
// ============================================================================

impl Identifier {
    /// Generates a fresh identifier.
    ///
    /// Validates every parameter against its bit width before touching the
    /// generation clock; an out-of-range value never consumes a tick.
    pub fn generate(
        object_type: u8,
        domain_id: u32,
        platform_id: u32,
        process_id: u32,
        worm: bool,
    ) -> Result<Self, IdError> {
        if domain_id > DOMAIN_ID_MAX {
            return Err(IdError::InvalidArgument {
                field: "domain_id",
                value: u64::from(domain_id),
                max: u64::from(DOMAIN_ID_MAX),
            });
        }
        if platform_id > PLATFORM_ID_MAX {
            return Err(IdError::InvalidArgument {
                field: "platform_id",
                value: u64::from(platform_id),
                max: u64::from(PLATFORM_ID_MAX),
            });
        }
        if process_id > PROCESS_ID_MAX {
            return Err(IdError::InvalidArgument {
                field: "process_id",
                value: u64::from(process_id),
                max: u64::from(PROCESS_ID_MAX),
            });
        }

        let (timestamp, counter) = next_tick();

        let mut bytes = [0u8; KEY_SIZE];
        bytes[OFS_VERSION] = VERSION;
        bytes[OFS_OBJECT_TYPE] = object_type;
        bytes[OFS_DOMAIN..OFS_DOMAIN + 4].copy_from_slice(&domain_id.to_be_bytes());
        let platform_word = (u32::from(worm) << 31) | platform_id;
        bytes[OFS_PLATFORM..OFS_PLATFORM + 4].copy_from_slice(&platform_word.to_be_bytes());
        bytes[OFS_PROCESS..OFS_PROCESS + 3].copy_from_slice(&process_id.to_be_bytes()[1..]);
        bytes[OFS_TIMESTAMP..OFS_TIMESTAMP + 6].copy_from_slice(&timestamp.to_be_bytes()[2..]);
        bytes[OFS_COUNTER..OFS_COUNTER + 3].copy_from_slice(&counter.to_be_bytes()[1..]);
        Ok(Identifier { bytes })
    }

    /// Builds an identifier from exactly [`KEY_SIZE`] raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, IdError> {
        let bytes: [u8; KEY_SIZE] =
            bytes
                .try_into()
                .map_err(|_| IdError::InvalidByteLength {
                    expected: KEY_SIZE,
                    actual: bytes.len(),
                })?;
        Ok(Identifier { bytes })
    }

    /// Parses an identifier from any of its text forms.
    ///
    /// The encoding is detected by shape: the `ark:/` prefix selects the
    /// Ark form, otherwise the length selects hex (44), Base32 (36) or
    /// Base64 (30). Surrounding whitespace is ignored.
    pub fn parse(text: &str) -> Result<Self, IdError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(IdError::Empty);
        }
        if let Some(rest) = text.strip_prefix(ARK_PREFIX) {
            return Self::parse_ark(rest);
        }
        let decoded = match text.len() {
            KEY_SIZE_BASE16 => decode_base16(text)?,
            KEY_SIZE_BASE32 => decode_base32(text)?,
            KEY_SIZE_BASE64 => decode_base64(text)?,
            length => return Err(IdError::UnknownFormat { length }),
        };
        Self::from_bytes(&decoded)
    }

    /// Parses the Ark form after the `ark:/` marker:
    /// `<domain-decimal>/<base32 of the 18 non-domain bytes>`.
    fn parse_ark(rest: &str) -> Result<Self, IdError> {
        let (domain_text, name) = rest.split_once('/').ok_or_else(|| IdError::MalformedArk {
            reason: "missing '/' between domain and name".to_string(),
        })?;
        let domain_id: u32 = domain_text.parse().map_err(|_| IdError::MalformedArk {
            reason: format!("domain {domain_text:?} is not an integer"),
        })?;
        if domain_id > DOMAIN_ID_MAX {
            return Err(IdError::MalformedArk {
                reason: format!("domain {domain_id} exceeds {DOMAIN_ID_MAX}"),
            });
        }
        let name_bytes = decode_base32(name)?;
        if name_bytes.len() != ARK_NAME_SIZE {
            return Err(IdError::MalformedArk {
                reason: format!(
                    "name decodes to {} bytes, expected {ARK_NAME_SIZE}",
                    name_bytes.len()
                ),
            });
        }
        let mut bytes = [0u8; KEY_SIZE];
        bytes[..OFS_DOMAIN].copy_from_slice(&name_bytes[..OFS_DOMAIN]);
        bytes[OFS_DOMAIN..OFS_DOMAIN + 4].copy_from_slice(&domain_id.to_be_bytes());
        bytes[OFS_PLATFORM..].copy_from_slice(&name_bytes[OFS_DOMAIN..]);
        Ok(Identifier { bytes })
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Algorithm version tag.
    #[must_use]
    pub const fn version(&self) -> u8 {
        self.bytes[OFS_VERSION]
    }

    /// Raw object type code.
    #[must_use]
    pub const fn object_type_code(&self) -> u8 {
        self.bytes[OFS_OBJECT_TYPE]
    }

    /// Object type, when the code is a known one.
    #[must_use]
    pub const fn object_type(&self) -> Option<ObjectType> {
        ObjectType::from_code(self.object_type_code())
    }

    /// Tenant scope id (30 bits, reserved bits masked off).
    #[must_use]
    pub fn domain_id(&self) -> u32 {
        u32::from_be_bytes(self.field::<4>(OFS_DOMAIN)) & DOMAIN_ID_MAX
    }

    /// Node identity (31 bits, WORM bit masked off).
    #[must_use]
    pub fn platform_id(&self) -> u32 {
        u32::from_be_bytes(self.field::<4>(OFS_PLATFORM)) & PLATFORM_ID_MAX
    }

    /// Whether the referenced entity is hinted as write-once-read-many.
    #[must_use]
    pub const fn is_worm(&self) -> bool {
        self.bytes[OFS_PLATFORM] & 0x80 != 0
    }

    /// Generating-process id (22 bits).
    #[must_use]
    pub fn process_id(&self) -> u32 {
        let field = self.field::<3>(OFS_PROCESS);
        u32::from_be_bytes([0, field[0], field[1], field[2]]) & PROCESS_ID_MAX
    }

    /// Generation instant in milliseconds since the Unix epoch (48 bits).
    #[must_use]
    pub fn timestamp_millis(&self) -> u64 {
        let field = self.field::<6>(OFS_TIMESTAMP);
        u64::from_be_bytes([0, 0, field[0], field[1], field[2], field[3], field[4], field[5]])
    }

    /// Per-millisecond collision counter (24 bits).
    #[must_use]
    pub fn counter(&self) -> u32 {
        let field = self.field::<3>(OFS_COUNTER);
        u32::from_be_bytes([0, field[0], field[1], field[2]])
    }

    /// The raw 22 bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }

    /// An owned copy of the raw 22 bytes.
    #[must_use]
    pub const fn to_bytes(&self) -> [u8; KEY_SIZE] {
        self.bytes
    }

    fn field<const N: usize>(&self, offset: usize) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(&self.bytes[offset..offset + N]);
        out
    }

    // ------------------------------------------------------------------
    // Text forms
    // ------------------------------------------------------------------

    /// Base16 text form (44 lowercase characters).
    #[must_use]
    pub fn to_hex(&self) -> String {
        encode_base16(&self.bytes)
    }

    /// Base32 text form (36 lowercase characters) — the canonical
    /// representation.
    #[must_use]
    pub fn to_base32(&self) -> String {
        encode_base32(&self.bytes)
    }

    /// URL-safe Base64 text form (30 characters).
    #[must_use]
    pub fn to_base64(&self) -> String {
        encode_base64(&self.bytes)
    }

    /// Ark persistent-identifier form:
    /// `ark:/<domain>/<base32 of the non-domain bytes>`.
    #[must_use]
    pub fn to_ark(&self) -> String {
        let mut name = [0u8; ARK_NAME_SIZE];
        name[..OFS_DOMAIN].copy_from_slice(&self.bytes[..OFS_DOMAIN]);
        name[OFS_DOMAIN..].copy_from_slice(&self.bytes[OFS_PLATFORM..]);
        format!("{ARK_PREFIX}{}/{}", self.domain_id(), encode_base32(&name))
    }
}

// ============================================================================
// Ordering
// ============================================================================

impl Ord for Identifier {
    /// Orders by (domain, object type, timestamp, counter). Remaining ties
    /// fall back to the raw bytes so the order is strict and total:
    /// `cmp` returns `Equal` only when the identifiers are equal.
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.domain_id()
            .cmp(&other.domain_id())
            .then_with(|| self.object_type_code().cmp(&other.object_type_code()))
            .then_with(|| self.timestamp_millis().cmp(&other.timestamp_millis()))
            .then_with(|| self.counter().cmp(&other.counter()))
            .then_with(|| self.bytes.cmp(&other.bytes))
    }
}

impl PartialOrd for Identifier {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

// ============================================================================
// Conversions and formatting
// ============================================================================

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base32())
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identifier")
            .field("base32", &self.to_base32())
            .field("object_type", &self.object_type_code())
            .field("domain_id", &self.domain_id())
            .field("platform_id", &self.platform_id())
            .field("worm", &self.is_worm())
            .field("process_id", &self.process_id())
            .field("timestamp_millis", &self.timestamp_millis())
            .field("counter", &self.counter())
            .finish()
    }
}

impl FromStr for Identifier {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&[u8]> for Identifier {
    type Error = IdError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_bytes(bytes)
    }
}

impl From<Identifier> for [u8; KEY_SIZE] {
    fn from(id: Identifier) -> Self {
        id.bytes
    }
}

impl Serialize for Identifier {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_base32())
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Tests
// ============================================================================
