//! Object type registry for archived entities.
//!
//! Every identifier carries a one-byte object type code. The registry is a
//! static table answering two questions about a code: what type a derived
//! child identifier gets, and whether entities of that type default to
//! WORM (write once, read many) storage.
//!
//! Unknown codes stay representable: `child_type_of` maps them to
//! themselves and `default_worm` answers false. This is the safe default
//! for codes minted by newer deployments, not a silent error.

/// Object type of an archived entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ObjectType {
    /// Placeholder used by the generic factory constructor.
    Unknown = 0,
    /// Archival unit (descriptive record).
    Unit = 1,
    /// Group of technical objects attached to a unit.
    ObjectGroup = 2,
    /// Technical object inside a group.
    Object = 3,
    /// Binary content of a technical object.
    Binary = 4,
    /// Operation logbook entry.
    OperationLogbook = 5,
    /// Write logbook entry.
    WriteLogbook = 6,
    /// Unit lifecycle logbook entry.
    UnitLogbook = 7,
    /// Object-group lifecycle logbook entry.
    ObjectGroupLogbook = 8,
    /// Storage logbook entry.
    StorageLogbook = 9,
    /// Container of archival units.
    UnitContainer = 10,
    /// Container of object groups.
    ObjectGroupContainer = 11,
    /// Container of technical objects.
    ObjectContainer = 12,
    /// Container of binary contents.
    BinaryContainer = 13,
    /// Container of logbook entries.
    LogbookContainer = 14,
    /// Storage engine operation.
    StorageOperation = 15,
    /// Workflow operation.
    Operation = 16,
    /// Request correlation id.
    Request = 17,
    /// Ingest manifest.
    Manifest = 18,
    /// File exposed through the fuse view.
    FuseFile = 19,
}

impl ObjectType {
    /// Returns the type for a known code.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0 => ObjectType::Unknown,
            1 => ObjectType::Unit,
            2 => ObjectType::ObjectGroup,
            3 => ObjectType::Object,
            4 => ObjectType::Binary,
            5 => ObjectType::OperationLogbook,
            6 => ObjectType::WriteLogbook,
            7 => ObjectType::UnitLogbook,
            8 => ObjectType::ObjectGroupLogbook,
            9 => ObjectType::StorageLogbook,
            10 => ObjectType::UnitContainer,
            11 => ObjectType::ObjectGroupContainer,
            12 => ObjectType::ObjectContainer,
            13 => ObjectType::BinaryContainer,
            14 => ObjectType::LogbookContainer,
            15 => ObjectType::StorageOperation,
            16 => ObjectType::Operation,
            17 => ObjectType::Request,
            18 => ObjectType::Manifest,
            19 => ObjectType::FuseFile,
            _ => return None,
        })
    }

    /// Returns the one-byte code of this type.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Returns the object type a derived child identifier gets.
    #[must_use]
    pub const fn child_type(self) -> Self {
        match self {
            // Descriptive hierarchy: unit -> group -> object -> binary.
            ObjectType::Unit => ObjectType::ObjectGroup,
            ObjectType::ObjectGroup => ObjectType::Object,
            ObjectType::Object => ObjectType::Binary,
            // Containers hold entities of the corresponding bare type.
            ObjectType::UnitContainer => ObjectType::Unit,
            ObjectType::ObjectGroupContainer => ObjectType::ObjectGroup,
            ObjectType::ObjectContainer => ObjectType::Object,
            ObjectType::BinaryContainer => ObjectType::Binary,
            ObjectType::LogbookContainer => ObjectType::OperationLogbook,
            // Leaf types derive their own kind.
            other => other,
        }
    }

    /// Returns whether entities of this type default to WORM storage.
    #[must_use]
    pub const fn default_worm(self) -> bool {
        match self {
            ObjectType::Binary
            | ObjectType::BinaryContainer
            | ObjectType::OperationLogbook
            | ObjectType::WriteLogbook
            | ObjectType::UnitLogbook
            | ObjectType::ObjectGroupLogbook
            | ObjectType::StorageLogbook
            | ObjectType::LogbookContainer
            | ObjectType::StorageOperation
            | ObjectType::Operation
            | ObjectType::Request
            | ObjectType::Manifest
            | ObjectType::FuseFile => true,
            ObjectType::Unknown
            | ObjectType::Unit
            | ObjectType::ObjectGroup
            | ObjectType::Object
            | ObjectType::UnitContainer
            | ObjectType::ObjectGroupContainer
            | ObjectType::ObjectContainer => false,
        }
    }
}

/// Child type for a raw code; unknown codes map to themselves.
#[must_use]
pub const fn child_type_of(code: u8) -> u8 {
    match ObjectType::from_code(code) {
        Some(object_type) => object_type.child_type().code(),
        None => code,
    }
}

/// Default WORM flag for a raw code; unknown codes answer false.
#[must_use]
pub const fn default_worm(code: u8) -> bool {
    match ObjectType::from_code(code) {
        Some(object_type) => object_type.default_worm(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_descriptive_chain() {
        assert_eq!(ObjectType::Unit.child_type(), ObjectType::ObjectGroup);
        assert_eq!(ObjectType::ObjectGroup.child_type(), ObjectType::Object);
        assert_eq!(ObjectType::Object.child_type(), ObjectType::Binary);
        assert_eq!(ObjectType::Binary.child_type(), ObjectType::Binary);
    }

    #[rstest]
    #[case(ObjectType::UnitContainer, ObjectType::Unit)]
    #[case(ObjectType::ObjectGroupContainer, ObjectType::ObjectGroup)]
    #[case(ObjectType::ObjectContainer, ObjectType::Object)]
    #[case(ObjectType::BinaryContainer, ObjectType::Binary)]
    #[case(ObjectType::LogbookContainer, ObjectType::OperationLogbook)]
    fn test_container_children(#[case] container: ObjectType, #[case] expected: ObjectType) {
        assert_eq!(container.child_type(), expected);
    }

    #[test]
    fn test_leaf_types_derive_themselves() {
        for leaf in [
            ObjectType::Unknown,
            ObjectType::OperationLogbook,
            ObjectType::StorageOperation,
            ObjectType::Manifest,
            ObjectType::FuseFile,
        ] {
            assert_eq!(leaf.child_type(), leaf);
        }
    }

    #[test]
    fn test_worm_defaults() {
        assert!(ObjectType::Binary.default_worm());
        assert!(ObjectType::OperationLogbook.default_worm());
        assert!(ObjectType::Manifest.default_worm());
        assert!(!ObjectType::Unit.default_worm());
        assert!(!ObjectType::ObjectGroup.default_worm());
        assert!(!ObjectType::UnitContainer.default_worm());
    }

    #[test]
    fn test_unknown_codes_are_identity_and_mutable() {
        assert_eq!(child_type_of(200), 200);
        assert!(!default_worm(200));
    }

    #[test]
    fn test_code_roundtrip() {
        for code in 0u8..=19 {
            let object_type = ObjectType::from_code(code).unwrap();
            assert_eq!(object_type.code(), code);
        }
        assert_eq!(ObjectType::from_code(20), None);
        assert_eq!(ObjectType::from_code(255), None);
    }
}
