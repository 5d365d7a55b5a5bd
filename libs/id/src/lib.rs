//! # arkiv-id
//!
//! Globally unique, orderable, compactly encoded identifiers for archived
//! entities.
//!
//! ## Design Principles
//!
//! - Identifiers are immutable 22-byte values with a fixed field layout
//! - Uniqueness needs no central coordination: local clock, a per-process
//!   counter, and a locally resolved node identity are enough
//! - Every text form is byte-exact and reversible; the canonical form is
//!   unpadded lowercase Base32
//! - Ordering is a strict total order consistent with equality
//!
//! ## Identifier layout
//!
//! version (1) · object type (1) · domain (4) · worm + platform (4) ·
//! process (3) · timestamp (6) · counter (3), all big-endian.
//!
//! ## Text forms
//!
//! | Form   | Length | Example prefix |
//! |--------|--------|----------------|
//! | Base16 | 44     | `0101...`      |
//! | Base32 | 36     | `aea...`       |
//! | Base64 | 30     | `AQE...`       |
//! | Ark    | —      | `ark:/17/...`  |
//!
//! ## Usage
//!
//! ```
//! use arkiv_id::{Identifier, IdentifierFactory, NodeIdentity};
//!
//! let node = NodeIdentity::from_parts([0x08, 0x00, 0x27, 0xa3], 42);
//! let factory = IdentifierFactory::with_node(17, &node)?;
//!
//! let unit = factory.new_unit()?;
//! let group = factory.new_child_identifier(&unit)?;
//!
//! let parsed = Identifier::parse(&unit.to_base32())?;
//! assert_eq!(parsed, unit);
//! assert_eq!(group.domain_id(), unit.domain_id());
//! # Ok::<(), arkiv_id::IdError>(())
//! ```

mod error;
mod factory;
mod identifier;
mod node;
mod object_type;
pub mod path;

pub use error::IdError;
pub use factory::IdentifierFactory;
pub use identifier::{
    Identifier, ARK_PREFIX, COUNTER_MAX, DOMAIN_ID_MAX, KEY_SIZE, KEY_SIZE_BASE16,
    KEY_SIZE_BASE32, KEY_SIZE_BASE64, PLATFORM_ID_MAX, PROCESS_ID_MAX, TIMESTAMP_MAX, VERSION,
};
pub use node::{NodeIdentity, MACHINE_ID_ENV, PROCESS_ID_ENV};
pub use object_type::{child_type_of, default_worm, ObjectType};

/// Re-export of the codec crate for consumers that need the raw
/// encoders.
pub use arkiv_codec as codec;
