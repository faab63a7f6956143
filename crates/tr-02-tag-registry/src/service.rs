//! # Tag Registry Service
//!
//! Application service implementing [`TagRegistryApi`] over the domain
//! stores. All registry state sits behind one `RwLock`; each mutating call
//! holds the write lock for its whole check-then-write sequence, so a failed
//! call leaves no trace.
//!
//! ## Authority
//!
//! - Root namespace (`""`): operator only.
//! - Other namespaces: the namespace entry's owner, or the operator.
//! - Tag values: only the tagger bound to the tag.

use crate::config::RegistryConfig;
use crate::domain::{
    field_names_hash, getter_selector, validate_definition, FieldNameIndex, FieldNameRecord,
    TagDefinition, TagDefinitionStore, TagError, TagKey, TagResult, TagValue, TagValueStore,
    TaggerBinding, TaggerId, TaggerRegistry,
};
use crate::ports::inbound::{TagReading, TagRegistryApi};
use crate::ports::outbound::{NameRegistry, Tagger};
use parking_lot::RwLock;
use shared_types::{entry_id, fmt_address, is_within_namespace, Address, Hash, ROOT_NAMESPACE};
use std::sync::Arc;
use tracing::{debug, info, warn};
use tr_01_type_descriptor::{abi_decode, decode, parse};

#[derive(Debug, Default)]
struct RegistryState {
    definitions: TagDefinitionStore,
    values: TagValueStore,
    taggers: TaggerRegistry,
    field_names: FieldNameIndex,
}

impl RegistryState {
    fn resolve_names(&self, definition: &TagDefinition) -> TagResult<Vec<Vec<String>>> {
        definition
            .field_name_refs
            .iter()
            .map(|hash| {
                self.field_names
                    .resolve(hash)
                    .map(<[String]>::to_vec)
                    .ok_or_else(|| TagError::UnknownFieldNames(hex::encode(hash)))
            })
            .collect()
    }

    fn writer(&self, key: &TagKey) -> TagResult<&TaggerBinding> {
        self.definitions.get(key)?;
        self.taggers
            .get(key)
            .ok_or_else(|| TagError::NoTaggerConfigured {
                namespace: key.namespace.clone(),
                tag_name: key.tag_name.clone(),
            })
    }
}

/// Tag registry over an external [`NameRegistry`].
pub struct TagRegistryService<R: NameRegistry> {
    config: RegistryConfig,
    registry: R,
    state: RwLock<RegistryState>,
}

impl<R: NameRegistry> TagRegistryService<R> {
    /// Create a service after validating `config`.
    pub fn new(config: RegistryConfig, registry: R) -> TagResult<Self> {
        config.validate()?;
        info!(
            "[tr-02] Tag registry started, operator {}",
            fmt_address(&config.operator)
        );
        Ok(Self {
            config,
            registry,
            state: RwLock::new(RegistryState::default()),
        })
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// The name registry entries are resolved against.
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Field-name records from `from_position` onwards.
    pub fn replay_field_names(&self, from_position: u64) -> Vec<FieldNameRecord> {
        self.state
            .read()
            .field_names
            .replay(from_position)
            .cloned()
            .collect()
    }

    fn authorize_admin(&self, caller: Address, namespace: &str) -> TagResult<()> {
        if namespace != ROOT_NAMESPACE && !self.registry.is_registered(namespace) {
            return Err(TagError::EntryNotRegistered(namespace.to_string()));
        }
        if caller == self.config.operator {
            return Ok(());
        }
        let owns = namespace != ROOT_NAMESPACE && self.registry.owner_of(namespace) == Some(caller);
        if !owns {
            warn!(
                "[tr-02] ⛔ {} rejected as administrator of namespace {:?}",
                fmt_address(&caller),
                namespace
            );
            return Err(TagError::Unauthorized {
                caller: fmt_address(&caller),
                namespace: namespace.to_string(),
            });
        }
        Ok(())
    }

    /// Checks shared by value writes: bound tagger, registered entry,
    /// entry inside the namespace.
    fn authorize_write(
        &self,
        state: &RegistryState,
        caller: Address,
        key: &TagKey,
        entry_name: &str,
    ) -> TagResult<()> {
        let writer = state.writer(key)?;
        if writer.id != caller {
            warn!(
                "[tr-02] ⛔ {} is not the tagger of {}",
                fmt_address(&caller),
                key
            );
            return Err(TagError::NotTagger {
                caller: fmt_address(&caller),
                tag_name: key.tag_name.clone(),
            });
        }
        if !self.registry.is_registered(entry_name) {
            return Err(TagError::EntryNotRegistered(entry_name.to_string()));
        }
        if !is_within_namespace(&key.namespace, entry_name) {
            return Err(TagError::OutOfNamespace {
                entry: entry_name.to_string(),
                namespace: key.namespace.clone(),
            });
        }
        Ok(())
    }
}

fn validate_tag_name(tag_name: &str) -> TagResult<()> {
    let valid = !tag_name.is_empty()
        && tag_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(TagError::InvalidTagName(tag_name.to_string()));
    }
    Ok(())
}

impl<R: NameRegistry> TagRegistryApi for TagRegistryService<R> {
    fn define_tag(
        &self,
        caller: Address,
        namespace: &str,
        tag_name: &str,
        descriptor: &[u8],
        field_names: &[Vec<String>],
    ) -> TagResult<TagDefinition> {
        validate_tag_name(tag_name)?;
        self.authorize_admin(caller, namespace)?;
        validate_definition(descriptor, field_names, self.config.max_descriptor_len)?;

        let field_name_refs = field_names
            .iter()
            .map(|names| field_names_hash(names))
            .collect::<TagResult<Vec<Hash>>>()?;

        let definition = TagDefinition {
            namespace: namespace.to_string(),
            tag_name: tag_name.to_string(),
            type_descriptor: descriptor.to_vec(),
            field_name_refs,
        };

        let mut state = self.state.write();
        state.definitions.insert(definition.clone())?;
        for names in field_names {
            state.field_names.publish(names)?;
        }

        info!(
            "[tr-02] 🏷️ Defined tag {} ({} bytes, {} tuple(s))",
            definition.key(),
            descriptor.len(),
            field_names.len()
        );
        Ok(definition)
    }

    fn get_definition(&self, namespace: &str, tag_name: &str) -> TagResult<TagDefinition> {
        let state = self.state.read();
        state
            .definitions
            .get(&TagKey::new(namespace, tag_name))
            .cloned()
    }

    fn type_string(&self, namespace: &str, tag_name: &str) -> TagResult<String> {
        let state = self.state.read();
        let definition = state.definitions.get(&TagKey::new(namespace, tag_name))?;
        let names = state.resolve_names(definition)?;
        Ok(decode(&definition.type_descriptor, Some(names.as_slice()))?)
    }

    fn resolve_field_names(&self, hash: &Hash) -> TagResult<FieldNameRecord> {
        let state = self.state.read();
        let names = state
            .field_names
            .resolve(hash)
            .ok_or_else(|| TagError::UnknownFieldNames(hex::encode(hash)))?;
        let position = state
            .field_names
            .position(hash)
            .ok_or_else(|| TagError::UnknownFieldNames(hex::encode(hash)))?;
        Ok(FieldNameRecord {
            hash: *hash,
            names: names.to_vec(),
            position,
        })
    }

    fn set_tagger(
        &self,
        caller: Address,
        namespace: &str,
        tag_name: &str,
        tagger: &Arc<dyn Tagger>,
    ) -> TagResult<()> {
        self.authorize_admin(caller, namespace)?;

        let key = TagKey::new(namespace, tag_name);
        let mut state = self.state.write();
        state.definitions.get(&key)?;
        let previous = state.taggers.bind(key.clone(), tagger);

        match previous {
            Some(old) => info!(
                "[tr-02] 🔁 Tagger of {} replaced: {} -> {}",
                key,
                fmt_address(&old),
                fmt_address(&tagger.tagger_id())
            ),
            None => info!(
                "[tr-02] Tagger of {} set to {}",
                key,
                fmt_address(&tagger.tagger_id())
            ),
        }
        Ok(())
    }

    fn get_tagger(&self, namespace: &str, tag_name: &str) -> TagResult<TaggerId> {
        let state = self.state.read();
        Ok(state.writer(&TagKey::new(namespace, tag_name))?.id)
    }

    fn set_tag_value(
        &self,
        caller: Address,
        namespace: &str,
        tag_name: &str,
        entry_name: &str,
        raw: Vec<u8>,
    ) -> TagResult<()> {
        let key = TagKey::new(namespace, tag_name);
        let mut state = self.state.write();
        self.authorize_write(&state, caller, &key, entry_name)?;

        if !raw.is_empty() {
            // Stored bytes must decode as the declared type.
            let node = parse(&state.definitions.get(&key)?.type_descriptor)?;
            abi_decode(&node, &raw)?;
        }

        let cleared = raw.is_empty();
        let len = raw.len();
        let existed = state.values.set(&key, entry_id(entry_name), raw);

        if cleared {
            info!(
                "[tr-02] Cleared {} on {:?} (existed: {})",
                key, entry_name, existed
            );
        } else {
            debug!("[tr-02] Set {} on {:?} ({} bytes)", key, entry_name, len);
        }
        Ok(())
    }

    fn get_tag_value(
        &self,
        namespace: &str,
        tag_name: &str,
        entry_name: &str,
    ) -> TagResult<TagValue> {
        let key = TagKey::new(namespace, tag_name);
        let state = self.state.read();
        state.definitions.get(&key)?;
        Ok(state.values.get(&key, entry_id(entry_name)))
    }

    fn has_tag(&self, namespace: &str, tag_name: &str, entry_name: &str) -> bool {
        self.state
            .read()
            .values
            .has(&TagKey::new(namespace, tag_name), entry_id(entry_name))
    }

    fn remove_tag_value(
        &self,
        caller: Address,
        namespace: &str,
        tag_name: &str,
        entry_name: &str,
    ) -> TagResult<bool> {
        let key = TagKey::new(namespace, tag_name);
        let mut state = self.state.write();
        self.authorize_write(&state, caller, &key, entry_name)?;

        let existed = state.values.remove(&key, entry_id(entry_name));
        info!("[tr-02] Removed {} on {:?} (existed: {})", key, entry_name, existed);
        Ok(existed)
    }

    fn read_tag(&self, namespace: &str, tag_name: &str, entry_name: &str) -> TagResult<TagReading> {
        let key = TagKey::new(namespace, tag_name);

        // Release the lock before calling out to the tagger, which may read
        // back through this service.
        let (definition, names, binding) = {
            let state = self.state.read();
            let binding = state.writer(&key)?.clone();
            let definition = state.definitions.get(&key)?.clone();
            let names = state.resolve_names(&definition)?;
            (definition, names, binding)
        };

        let node = parse(&definition.type_descriptor)?;
        let type_string = node.render_with_names(&names)?;

        let tagger = binding.upgrade().ok_or_else(|| TagError::TaggerUnavailable {
            namespace: key.namespace.clone(),
            tag_name: key.tag_name.clone(),
        })?;
        let selector = getter_selector(tag_name);
        let raw = tagger
            .call_getter(selector, entry_name)
            .ok_or_else(|| TagError::UnsupportedGetter(hex::encode(selector)))?;

        let value = if raw.is_empty() {
            None
        } else {
            Some(abi_decode(&node, &raw)?)
        };

        debug!(
            "[tr-02] Read {} on {:?} as {} (set: {})",
            key,
            entry_name,
            type_string,
            value.is_some()
        );
        Ok(TagReading { type_string, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryNameRegistry;
    use crate::domain::Selector;
    use tr_01_type_descriptor::{
        abi_encode, hex_to_bytes, AbiError, AbiValue, DescriptorError, TypeNode,
    };

    const OWNER: Address = [0xA1; 20];
    const STRANGER: Address = [0xEE; 20];
    const TAGGER: Address = [0x7A; 20];

    /// Tagger that forwards its getter to the registry it writes into.
    struct EchoTagger {
        id: TaggerId,
        namespace: String,
        tag_name: String,
        service: Arc<TagRegistryService<InMemoryNameRegistry>>,
    }

    impl Tagger for EchoTagger {
        fn tagger_id(&self) -> TaggerId {
            self.id
        }

        fn call_getter(&self, selector: Selector, entry_name: &str) -> Option<Vec<u8>> {
            if selector != getter_selector(&self.tag_name) {
                return None;
            }
            self.service
                .get_tag_value(&self.namespace, &self.tag_name, entry_name)
                .ok()
                .map(|v| v.raw)
        }
    }

    fn operator() -> Address {
        RegistryConfig::for_testing().operator
    }

    fn service() -> Arc<TagRegistryService<InMemoryNameRegistry>> {
        let registry = InMemoryNameRegistry::new();
        registry.register_name(OWNER, "testDomain").unwrap();
        registry.register_name(OWNER, "a.testDomain").unwrap();
        registry.register_name(STRANGER, "other").unwrap();
        Arc::new(TagRegistryService::new(RegistryConfig::for_testing(), registry).unwrap())
    }

    fn bind_echo(
        service: &Arc<TagRegistryService<InMemoryNameRegistry>>,
        namespace: &str,
        tag_name: &str,
    ) -> Arc<dyn Tagger> {
        let tagger: Arc<dyn Tagger> = Arc::new(EchoTagger {
            id: TAGGER,
            namespace: namespace.into(),
            tag_name: tag_name.into(),
            service: service.clone(),
        });
        service
            .set_tagger(operator(), namespace, tag_name, &tagger)
            .unwrap();
        tagger
    }

    fn names(lists: &[&[&str]]) -> Vec<Vec<String>> {
        lists
            .iter()
            .map(|l| l.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_define_rejects_unbounded_array_types() {
        let service = service();
        let empties = hex_to_bytes("0x04060000").unwrap();
        assert!(matches!(
            service.define_tag(operator(), "", "empties", &empties, &[Vec::new()]),
            Err(TagError::Abi(AbiError::ZeroSizedElement { .. }))
        ));
        assert!(matches!(
            service.get_definition("", "empties"),
            Err(TagError::TagNotDefined { .. })
        ));
        assert!(service.replay_field_names(0).is_empty());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let result = TagRegistryService::new(RegistryConfig::default(), InMemoryNameRegistry::new());
        assert!(matches!(result, Err(TagError::InvalidConfig(_))));
    }

    #[test]
    fn test_define_root_tag_operator_only() {
        let service = service();
        let descriptor = hex_to_bytes("0x04060002010107").unwrap();
        let fields = names(&[&["algorithm", "addr"]]);

        assert!(matches!(
            service.define_tag(OWNER, "", "authAddresses", &descriptor, &fields),
            Err(TagError::Unauthorized { .. })
        ));

        let definition = service
            .define_tag(operator(), "", "authAddresses", &descriptor, &fields)
            .unwrap();
        assert_eq!(definition.field_name_refs.len(), 1);
        assert_eq!(
            service.type_string("", "authAddresses").unwrap(),
            "tuple(uint8 algorithm,address addr)[]"
        );
        assert_eq!(
            service.get_definition("", "authAddresses").unwrap(),
            definition
        );
    }

    #[test]
    fn test_define_in_owned_namespace() {
        let service = service();
        service
            .define_tag(OWNER, "testDomain", "email", &[0x03], &[])
            .unwrap();

        assert!(matches!(
            service.define_tag(STRANGER, "testDomain", "phone", &[0x03], &[]),
            Err(TagError::Unauthorized { .. })
        ));
        assert!(matches!(
            service.define_tag(OWNER, "missing", "email", &[0x03], &[]),
            Err(TagError::EntryNotRegistered(_))
        ));
        assert!(matches!(
            service.define_tag(OWNER, "testDomain", "email", &[0x03], &[]),
            Err(TagError::DuplicateTag { .. })
        ));
    }

    #[test]
    fn test_define_rejects_bad_input_without_side_effects() {
        let service = service();
        let op = operator();

        assert!(matches!(
            service.define_tag(op, "", "bad", &[0x0A], &[]),
            Err(TagError::Descriptor(DescriptorError::UnknownTag { .. }))
        ));
        assert!(matches!(
            service.define_tag(op, "", "bad", &[0x06, 0x00, 0x01, 0x02], &names(&[&["a", "b"]])),
            Err(TagError::Descriptor(
                DescriptorError::FieldNameArityMismatch { .. }
            ))
        ));
        assert!(matches!(
            service.define_tag(op, "", "bad", &[0x02], &names(&[&["a"]])),
            Err(TagError::Descriptor(DescriptorError::SurplusFieldNames { .. }))
        ));
        assert!(matches!(
            service.define_tag(op, "", "bad name", &[0x02], &[]),
            Err(TagError::InvalidTagName(_))
        ));

        assert!(matches!(
            service.get_definition("", "bad"),
            Err(TagError::TagNotDefined { .. })
        ));
        assert!(service.replay_field_names(0).is_empty());
    }

    #[test]
    fn test_field_names_shared_between_tags() {
        let service = service();
        let op = operator();
        let pair = hex_to_bytes("0x0600020307").unwrap();
        let fields = names(&[&["label", "addr"]]);

        let a = service.define_tag(op, "", "first", &pair, &fields).unwrap();
        let b = service.define_tag(op, "", "second", &pair, &fields).unwrap();

        assert_eq!(a.field_name_refs, b.field_name_refs);
        assert_eq!(service.replay_field_names(0).len(), 1);

        let record = service.resolve_field_names(&a.field_name_refs[0]).unwrap();
        assert_eq!(record.names, fields[0]);
        assert_eq!(record.position, 0);
        assert!(matches!(
            service.resolve_field_names(&[0u8; 32]),
            Err(TagError::UnknownFieldNames(_))
        ));
    }

    #[test]
    fn test_tagger_binding() {
        let service = service();
        service
            .define_tag(operator(), "", "email", &[0x03], &[])
            .unwrap();

        assert!(matches!(
            service.get_tagger("", "email"),
            Err(TagError::NoTaggerConfigured { .. })
        ));

        let tagger = bind_echo(&service, "", "email");
        assert_eq!(service.get_tagger("", "email").unwrap(), TAGGER);

        assert!(matches!(
            service.set_tagger(operator(), "", "undefined", &tagger),
            Err(TagError::TagNotDefined { .. })
        ));
        assert!(matches!(
            service.set_tagger(STRANGER, "", "email", &tagger),
            Err(TagError::Unauthorized { .. })
        ));
    }

    #[test]
    fn test_only_tagger_writes() {
        let service = service();
        service
            .define_tag(operator(), "", "email", &[0x03], &[])
            .unwrap();
        let raw = abi_encode(&TypeNode::String, &AbiValue::String("a@b.c".into())).unwrap();

        assert!(matches!(
            service.set_tag_value(TAGGER, "", "email", "testDomain", raw.clone()),
            Err(TagError::NoTaggerConfigured { .. })
        ));

        let _tagger = bind_echo(&service, "", "email");
        assert!(matches!(
            service.set_tag_value(operator(), "", "email", "testDomain", raw.clone()),
            Err(TagError::NotTagger { .. })
        ));
        assert!(matches!(
            service.set_tag_value(TAGGER, "", "email", "unregistered", raw.clone()),
            Err(TagError::EntryNotRegistered(_))
        ));
        assert!(!service.has_tag("", "email", "testDomain"));

        service
            .set_tag_value(TAGGER, "", "email", "testDomain", raw.clone())
            .unwrap();
        let value = service.get_tag_value("", "email", "testDomain").unwrap();
        assert!(value.exists);
        assert_eq!(value.raw, raw);
        assert_eq!(value.entry_id, entry_id("testDomain"));

        // Empty write clears.
        service
            .set_tag_value(TAGGER, "", "email", "testDomain", Vec::new())
            .unwrap();
        assert!(!service.has_tag("", "email", "testDomain"));
        assert!(!service.get_tag_value("", "email", "testDomain").unwrap().exists);
    }

    #[test]
    fn test_value_must_match_type() {
        let service = service();
        service
            .define_tag(operator(), "", "flag", &[0x02], &[])
            .unwrap();
        let _tagger = bind_echo(&service, "", "flag");

        let mut bad = vec![0u8; 32];
        bad[31] = 2;
        assert!(matches!(
            service.set_tag_value(TAGGER, "", "flag", "testDomain", bad),
            Err(TagError::Abi(_))
        ));
        assert!(!service.has_tag("", "flag", "testDomain"));
    }

    #[test]
    fn test_namespace_scoping() {
        let service = service();
        service
            .define_tag(OWNER, "testDomain", "email", &[0x03], &[])
            .unwrap();
        let _tagger = bind_echo(&service, "testDomain", "email");
        let raw = abi_encode(&TypeNode::String, &AbiValue::String("x".into())).unwrap();

        service
            .set_tag_value(TAGGER, "testDomain", "email", "testDomain", raw.clone())
            .unwrap();
        service
            .set_tag_value(TAGGER, "testDomain", "email", "a.testDomain", raw.clone())
            .unwrap();
        assert!(matches!(
            service.set_tag_value(TAGGER, "testDomain", "email", "other", raw),
            Err(TagError::OutOfNamespace { .. })
        ));
    }

    #[test]
    fn test_remove_tag_value() {
        let service = service();
        service
            .define_tag(operator(), "", "email", &[0x03], &[])
            .unwrap();
        let _tagger = bind_echo(&service, "", "email");
        let raw = abi_encode(&TypeNode::String, &AbiValue::String("x".into())).unwrap();
        service
            .set_tag_value(TAGGER, "", "email", "testDomain", raw)
            .unwrap();

        assert!(matches!(
            service.remove_tag_value(STRANGER, "", "email", "testDomain"),
            Err(TagError::NotTagger { .. })
        ));
        assert!(service
            .remove_tag_value(TAGGER, "", "email", "testDomain")
            .unwrap());
        assert!(!service
            .remove_tag_value(TAGGER, "", "email", "testDomain")
            .unwrap());
    }

    #[test]
    fn test_read_tag_generic() {
        let service = service();
        let descriptor = hex_to_bytes("0x04060002010107").unwrap();
        service
            .define_tag(
                operator(),
                "",
                "authAddresses",
                &descriptor,
                &names(&[&["algorithm", "addr"]]),
            )
            .unwrap();
        let tagger = bind_echo(&service, "", "authAddresses");

        let unset = service.read_tag("", "authAddresses", "testDomain").unwrap();
        assert_eq!(unset.type_string, "tuple(uint8 algorithm,address addr)[]");
        assert_eq!(unset.value, None);

        let list = AbiValue::Array(vec![AbiValue::Tuple(vec![
            AbiValue::Uint(0u64.into()),
            AbiValue::Address([0x42; 20]),
        ])]);
        let raw = abi_encode(&parse(&descriptor).unwrap(), &list).unwrap();
        service
            .set_tag_value(TAGGER, "", "authAddresses", "testDomain", raw)
            .unwrap();

        let reading = service.read_tag("", "authAddresses", "testDomain").unwrap();
        assert_eq!(reading.value, Some(list));

        drop(tagger);
        assert!(matches!(
            service.read_tag("", "authAddresses", "testDomain"),
            Err(TagError::TaggerUnavailable { .. })
        ));
    }
}
