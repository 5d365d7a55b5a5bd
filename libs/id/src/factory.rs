//! Identifier factory scoped by a (domain, platform) pair.
//!
//! A factory captures the tenant scope and node identity once and then
//! mints identifiers for every archival entity kind. It holds no mutable
//! state of its own — the generation clock lives with the identifier value
//! type — so a factory is freely shared across threads.

use crate::error::IdError;
use crate::identifier::{
    Identifier, DOMAIN_ID_MAX, KEY_SIZE, KEY_SIZE_BASE32, PLATFORM_ID_MAX,
};
use crate::node::NodeIdentity;
use crate::object_type::{child_type_of, default_worm, ObjectType};

/// Produces identifiers for one (domain, platform) scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentifierFactory {
    domain_id: u32,
    platform_id: u32,
    process_id: u32,
}

impl IdentifierFactory {
    /// Size of a generated identifier in raw bytes.
    pub const KEY_SIZE: usize = KEY_SIZE;

    /// Length of the canonical Base32 text form.
    pub const KEY_SIZE_BASE32: usize = KEY_SIZE_BASE32;

    /// Creates a factory for a domain, using the resolved identity of this
    /// process.
    pub fn new(domain_id: u32) -> Result<Self, IdError> {
        Self::with_node(domain_id, NodeIdentity::resolve())
    }

    /// Creates a factory with an explicitly supplied node identity.
    pub fn with_node(domain_id: u32, node: &NodeIdentity) -> Result<Self, IdError> {
        check_range("domain_id", domain_id, DOMAIN_ID_MAX)?;
        Ok(IdentifierFactory {
            domain_id,
            platform_id: node.platform_id(),
            process_id: node.process_id(),
        })
    }

    /// Creates a factory with an explicit platform id, overriding node
    /// discovery; the process id still comes from the resolved identity.
    pub fn with_platform(domain_id: u32, platform_id: u32) -> Result<Self, IdError> {
        check_range("domain_id", domain_id, DOMAIN_ID_MAX)?;
        check_range("platform_id", platform_id, PLATFORM_ID_MAX)?;
        Ok(IdentifierFactory {
            domain_id,
            platform_id,
            process_id: NodeIdentity::resolve().process_id(),
        })
    }

    /// The domain this factory is scoped to.
    #[must_use]
    pub const fn domain_id(&self) -> u32 {
        self.domain_id
    }

    /// The platform id stamped into generated identifiers.
    #[must_use]
    pub const fn platform_id(&self) -> u32 {
        self.platform_id
    }

    // ------------------------------------------------------------------
    // Generic constructors
    // ------------------------------------------------------------------

    /// Generates an identifier of the placeholder [`ObjectType::Unknown`]
    /// kind within the factory scope.
    pub fn new_identifier(&self) -> Result<Identifier, IdError> {
        self.new_identifier_of(ObjectType::Unknown)
    }

    /// Generates an identifier of the given kind; the WORM flag comes from
    /// the registry default for that kind.
    pub fn new_identifier_of(&self, object_type: ObjectType) -> Result<Identifier, IdError> {
        self.new_identifier_with_code(object_type.code())
    }

    /// Generates an identifier for a raw object-type code, including codes
    /// the registry does not know.
    pub fn new_identifier_with_code(&self, object_type: u8) -> Result<Identifier, IdError> {
        self.generate(object_type, self.domain_id, self.platform_id, default_worm(object_type))
    }

    /// Generates an identifier with every field spelled out, falling back
    /// to the factory scope for nothing.
    pub fn new_identifier_with(
        &self,
        object_type: u8,
        domain_id: u32,
        platform_id: u32,
        worm: bool,
    ) -> Result<Identifier, IdError> {
        self.generate(object_type, domain_id, platform_id, worm)
    }

    fn generate(
        &self,
        object_type: u8,
        domain_id: u32,
        platform_id: u32,
        worm: bool,
    ) -> Result<Identifier, IdError> {
        Identifier::generate(object_type, domain_id, platform_id, self.process_id, worm)
    }

    // ------------------------------------------------------------------
    // Named constructors
    // ------------------------------------------------------------------

    /// Identifier for an archival unit.
    pub fn new_unit(&self) -> Result<Identifier, IdError> {
        self.new_identifier_of(ObjectType::Unit)
    }

    /// Identifier for an object group.
    pub fn new_object_group(&self) -> Result<Identifier, IdError> {
        self.new_identifier_of(ObjectType::ObjectGroup)
    }

    /// Identifier for a technical object.
    pub fn new_object(&self) -> Result<Identifier, IdError> {
        self.new_identifier_of(ObjectType::Object)
    }

    /// Identifier for a binary content.
    pub fn new_binary(&self) -> Result<Identifier, IdError> {
        self.new_identifier_of(ObjectType::Binary)
    }

    /// Identifier for an operation logbook entry.
    pub fn new_operation_logbook(&self) -> Result<Identifier, IdError> {
        self.new_identifier_of(ObjectType::OperationLogbook)
    }

    /// Identifier for a write logbook entry.
    pub fn new_write_logbook(&self) -> Result<Identifier, IdError> {
        self.new_identifier_of(ObjectType::WriteLogbook)
    }

    /// Identifier for a unit lifecycle logbook entry.
    pub fn new_unit_logbook(&self) -> Result<Identifier, IdError> {
        self.new_identifier_of(ObjectType::UnitLogbook)
    }

    /// Identifier for an object-group lifecycle logbook entry.
    pub fn new_object_group_logbook(&self) -> Result<Identifier, IdError> {
        self.new_identifier_of(ObjectType::ObjectGroupLogbook)
    }

    /// Identifier for a storage logbook entry.
    pub fn new_storage_logbook(&self) -> Result<Identifier, IdError> {
        self.new_identifier_of(ObjectType::StorageLogbook)
    }

    /// Identifier for a container of archival units.
    pub fn new_unit_container(&self) -> Result<Identifier, IdError> {
        self.new_identifier_of(ObjectType::UnitContainer)
    }

    /// Identifier for a container of object groups.
    pub fn new_object_group_container(&self) -> Result<Identifier, IdError> {
        self.new_identifier_of(ObjectType::ObjectGroupContainer)
    }

    /// Identifier for a container of technical objects.
    pub fn new_object_container(&self) -> Result<Identifier, IdError> {
        self.new_identifier_of(ObjectType::ObjectContainer)
    }

    /// Identifier for a container of binary contents.
    pub fn new_binary_container(&self) -> Result<Identifier, IdError> {
        self.new_identifier_of(ObjectType::BinaryContainer)
    }

    /// Identifier for a container of logbook entries.
    pub fn new_logbook_container(&self) -> Result<Identifier, IdError> {
        self.new_identifier_of(ObjectType::LogbookContainer)
    }

    /// Identifier for a storage engine operation.
    pub fn new_storage_operation(&self) -> Result<Identifier, IdError> {
        self.new_identifier_of(ObjectType::StorageOperation)
    }

    /// Identifier for a workflow operation.
    pub fn new_operation(&self) -> Result<Identifier, IdError> {
        self.new_identifier_of(ObjectType::Operation)
    }

    /// Identifier for a request correlation id.
    pub fn new_request(&self) -> Result<Identifier, IdError> {
        self.new_identifier_of(ObjectType::Request)
    }

    /// Identifier for an ingest manifest.
    pub fn new_manifest(&self) -> Result<Identifier, IdError> {
        self.new_identifier_of(ObjectType::Manifest)
    }

    /// Identifier for a file exposed through the fuse view.
    pub fn new_fuse_file(&self) -> Result<Identifier, IdError> {
        self.new_identifier_of(ObjectType::FuseFile)
    }

    // ------------------------------------------------------------------
    // Derivation and parsing
    // ------------------------------------------------------------------

    /// Derives a child identifier: the object type follows the registry's
    /// parent-to-child mapping while domain, platform and WORM flag are
    /// copied from the parent.
    pub fn new_child_identifier(&self, parent: &Identifier) -> Result<Identifier, IdError> {
        Identifier::generate(
            child_type_of(parent.object_type_code()),
            parent.domain_id(),
            parent.platform_id(),
            self.process_id,
            parent.is_worm(),
        )
    }

    /// Parses an identifier from any of its text forms.
    pub fn parse(&self, text: &str) -> Result<Identifier, IdError> {
        Identifier::parse(text)
    }

    /// Builds an identifier from exactly [`Self::KEY_SIZE`] raw bytes.
    pub fn from_bytes(&self, bytes: &[u8]) -> Result<Identifier, IdError> {
        Identifier::from_bytes(bytes)
    }
}

fn check_range(field: &'static str, value: u32, max: u32) -> Result<(), IdError> {
    if value > max {
        return Err(IdError::InvalidArgument {
            field,
            value: u64::from(value),
            max: u64::from(max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn fixed_factory() -> IdentifierFactory {
        let node = NodeIdentity::from_parts([0x12, 0x34, 0x56, 0x78], 321);
        IdentifierFactory::with_node(9, &node).unwrap()
    }

    #[test]
    fn test_factory_scope_is_stamped() {
        let factory = fixed_factory();
        let id = factory.new_unit().unwrap();
        assert_eq!(id.domain_id(), 9);
        assert_eq!(id.platform_id(), 0x1234_5678);
        assert_eq!(id.process_id(), 321);
    }

    #[test]
    fn test_invalid_domain_rejected_at_construction() {
        let node = NodeIdentity::from_parts([0; 4], 0);
        let err = IdentifierFactory::with_node(DOMAIN_ID_MAX + 1, &node).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_invalid_platform_rejected() {
        let err = IdentifierFactory::with_platform(0, PLATFORM_ID_MAX + 1).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_explicit_parameters_rejected_out_of_range() {
        let factory = fixed_factory();
        assert!(factory
            .new_identifier_with(1, DOMAIN_ID_MAX + 1, 0, false)
            .unwrap_err()
            .is_invalid_argument());
        assert!(factory
            .new_identifier_with(1, 0, PLATFORM_ID_MAX + 1, false)
            .unwrap_err()
            .is_invalid_argument());
    }

    #[rstest]
    #[case(ObjectType::Unit, false)]
    #[case(ObjectType::Binary, true)]
    #[case(ObjectType::OperationLogbook, true)]
    #[case(ObjectType::Manifest, true)]
    #[case(ObjectType::ObjectGroup, false)]
    fn test_named_constructors_apply_registry_worm(
        #[case] object_type: ObjectType,
        #[case] worm: bool,
    ) {
        let factory = fixed_factory();
        let id = factory.new_identifier_of(object_type).unwrap();
        assert_eq!(id.object_type(), Some(object_type));
        assert_eq!(id.is_worm(), worm);
    }

    #[test]
    fn test_each_named_constructor_kind() {
        let factory = fixed_factory();
        let cases: &[(Result<Identifier, IdError>, ObjectType)] = &[
            (factory.new_unit(), ObjectType::Unit),
            (factory.new_object_group(), ObjectType::ObjectGroup),
            (factory.new_object(), ObjectType::Object),
            (factory.new_binary(), ObjectType::Binary),
            (factory.new_operation_logbook(), ObjectType::OperationLogbook),
            (factory.new_write_logbook(), ObjectType::WriteLogbook),
            (factory.new_unit_logbook(), ObjectType::UnitLogbook),
            (
                factory.new_object_group_logbook(),
                ObjectType::ObjectGroupLogbook,
            ),
            (factory.new_storage_logbook(), ObjectType::StorageLogbook),
            (factory.new_unit_container(), ObjectType::UnitContainer),
            (
                factory.new_object_group_container(),
                ObjectType::ObjectGroupContainer,
            ),
            (factory.new_object_container(), ObjectType::ObjectContainer),
            (factory.new_binary_container(), ObjectType::BinaryContainer),
            (factory.new_logbook_container(), ObjectType::LogbookContainer),
            (factory.new_storage_operation(), ObjectType::StorageOperation),
            (factory.new_operation(), ObjectType::Operation),
            (factory.new_request(), ObjectType::Request),
            (factory.new_manifest(), ObjectType::Manifest),
            (factory.new_fuse_file(), ObjectType::FuseFile),
        ];
        for (result, expected) in cases {
            let id = result.as_ref().unwrap();
            assert_eq!(id.object_type(), Some(*expected));
        }
    }

    #[test]
    fn test_child_inherits_scope() {
        let factory = fixed_factory();
        let parent = factory
            .new_identifier_with(ObjectType::Unit.code(), 5, 77, true)
            .unwrap();
        let child = factory.new_child_identifier(&parent).unwrap();
        assert_eq!(child.object_type(), Some(ObjectType::ObjectGroup));
        assert_eq!(child.domain_id(), parent.domain_id());
        assert_eq!(child.platform_id(), parent.platform_id());
        assert_eq!(child.is_worm(), parent.is_worm());
    }

    #[test]
    fn test_child_chain_reaches_binary() {
        let factory = fixed_factory();
        let unit = factory.new_unit().unwrap();
        let group = factory.new_child_identifier(&unit).unwrap();
        let object = factory.new_child_identifier(&group).unwrap();
        let binary = factory.new_child_identifier(&object).unwrap();
        assert_eq!(binary.object_type(), Some(ObjectType::Binary));
        let leaf = factory.new_child_identifier(&binary).unwrap();
        assert_eq!(leaf.object_type(), Some(ObjectType::Binary));
    }

    #[test]
    fn test_parse_delegates() {
        let factory = fixed_factory();
        let id = factory.new_operation().unwrap();
        assert_eq!(factory.parse(&id.to_base32()).unwrap(), id);
        assert_eq!(factory.from_bytes(id.as_bytes()).unwrap(), id);
    }

    #[test]
    fn test_key_sizes() {
        assert_eq!(IdentifierFactory::KEY_SIZE, 22);
        assert_eq!(IdentifierFactory::KEY_SIZE_BASE32, 36);
    }

    #[test]
    fn test_unknown_code_generation() {
        let factory = fixed_factory();
        let id = factory.new_identifier_with_code(200).unwrap();
        assert_eq!(id.object_type_code(), 200);
        assert_eq!(id.object_type(), None);
        assert!(!id.is_worm());
    }
}
