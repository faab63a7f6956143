//! # Integration Test Flows
//!
//! Exercises the subsystems together the way a deployment wires them:
//!
//! 1. **Name registry → Tag registry (02)**: entries registered externally,
//!    tags declared against them
//! 2. **Typed signatures (03) → Auth addresses (04)**: signed requests mutate
//!    the per-entry list stored as a tag
//! 3. **Generic read path**: definition → field-name log → descriptor decode
//!    (01) → getter selector → ABI decode, with no knowledge of the list shape

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use shared_crypto::Secp256k1KeyPair;
    use shared_types::{Address, ManualClock, Timestamp};

    use tr_01_type_descriptor::{decode, decode_hex, AbiValue};
    use tr_02_tag_registry::{
        getter_selector, InMemoryNameRegistry, RegistryConfig, TagError, TagRegistryApi,
        TagRegistryService,
    };
    use tr_03_typed_signatures::{AuthError, AuthRequestVerifier, VerifierConfig};
    use tr_04_auth_addresses::{
        AuthAddressConfig, AuthAddressError, AuthAddressManager, AuthAddressReq,
    };

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    const GENESIS: Timestamp = 1_700_000_000;
    const ENTRY: &str = "testDomain";

    type Tags = TagRegistryService<InMemoryNameRegistry>;

    struct Deployment {
        clock: Arc<ManualClock>,
        tags: Arc<Tags>,
        verifier: Arc<AuthRequestVerifier>,
        manager: Arc<AuthAddressManager<InMemoryNameRegistry>>,
        owner: Secp256k1KeyPair,
    }

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn operator() -> Address {
        RegistryConfig::for_testing().operator
    }

    fn deploy() -> Deployment {
        init_tracing();

        let owner = Secp256k1KeyPair::generate();
        let registry = InMemoryNameRegistry::new();
        registry.register_name(owner.address(), ENTRY).unwrap();

        let clock = Arc::new(ManualClock::new(GENESIS));
        let tags = Arc::new(Tags::new(RegistryConfig::for_testing(), registry).unwrap());
        let verifier = Arc::new(
            AuthRequestVerifier::new(VerifierConfig::for_testing(), clock.clone()).unwrap(),
        );
        let manager = Arc::new(
            AuthAddressManager::new(AuthAddressConfig::default(), tags.clone(), verifier.clone())
                .unwrap(),
        );
        manager.install(operator()).unwrap();

        Deployment {
            clock,
            tags,
            verifier,
            manager,
            owner,
        }
    }

    impl Deployment {
        fn sign(&self, key: &Secp256k1KeyPair, req: &AuthAddressReq) -> Vec<u8> {
            key.sign_prehash(&self.verifier.signing_hash(req))
                .unwrap()
                .to_vec()
        }

        fn add(
            &self,
            entry: &str,
            key: &Secp256k1KeyPair,
            owner: &Secp256k1KeyPair,
        ) -> Result<usize, AuthAddressError> {
            let req = AuthAddressReq::add(key.address(), entry, self.clock_now());
            self.manager
                .add(&req, &self.sign(key, &req), &self.sign(owner, &req))
        }

        fn clock_now(&self) -> Timestamp {
            use shared_types::Clock;
            self.clock.now()
        }
    }

    // =============================================================================
    // FLOWS
    // =============================================================================

    #[test]
    fn test_full_lifecycle() {
        let d = deploy();
        let delegates: Vec<_> = (0..3).map(|_| Secp256k1KeyPair::generate()).collect();

        for (i, key) in delegates.iter().enumerate() {
            assert_eq!(d.add(ENTRY, key, &d.owner).unwrap(), i + 1);
        }
        assert!(d.tags.has_tag("", "authAddresses", ENTRY));

        // Remove the middle delegate by index: the tail moves into its slot.
        let req = AuthAddressReq::remove(delegates[1].address(), ENTRY, d.clock_now());
        let removed = d
            .manager
            .remove_at(&req, &d.sign(&d.owner, &req), 1)
            .unwrap();
        assert_eq!(removed.addr, delegates[1].address());

        let listed: Vec<Address> = d
            .manager
            .addresses(ENTRY)
            .unwrap()
            .into_iter()
            .map(|a| a.addr)
            .collect();
        assert_eq!(listed, vec![delegates[0].address(), delegates[2].address()]);

        for key in [&delegates[0], &delegates[2]] {
            let req = AuthAddressReq::remove(key.address(), ENTRY, d.clock_now());
            d.manager.remove(&req, &d.sign(&d.owner, &req)).unwrap();
        }

        let value = d.tags.get_tag_value("", "authAddresses", ENTRY).unwrap();
        assert!(!value.exists);
        assert!(value.raw.is_empty());
    }

    #[test]
    fn test_generic_reader_decodes_list() {
        let d = deploy();
        let delegate = Secp256k1KeyPair::generate();
        d.add(ENTRY, &delegate, &d.owner).unwrap();

        // Reader knows only the namespace and tag name.
        let definition = d.tags.get_definition("", "authAddresses").unwrap();
        assert_eq!(hex::encode(&definition.type_descriptor), "04060002010107");

        let names: Vec<Vec<String>> = definition
            .field_name_refs
            .iter()
            .map(|hash| d.tags.resolve_field_names(hash).unwrap().names)
            .collect();
        assert_eq!(
            decode(&definition.type_descriptor, Some(names.as_slice())).unwrap(),
            "tuple(uint8 algorithm,address addr)[]"
        );
        assert_eq!(
            decode_hex("0x04060002010107", None).unwrap(),
            "tuple(uint8,address)[]"
        );

        // The same names are recoverable by replaying the field-name log.
        let replayed = d.tags.replay_field_names(0);
        assert!(replayed
            .iter()
            .any(|r| r.hash == definition.field_name_refs[0] && r.names == names[0]));

        let reading = d.tags.read_tag("", "authAddresses", ENTRY).unwrap();
        assert_eq!(reading.type_string, "tuple(uint8 algorithm,address addr)[]");
        assert_eq!(
            reading.value,
            Some(AbiValue::Array(vec![AbiValue::Tuple(vec![
                AbiValue::Uint(0u64.into()),
                AbiValue::Address(delegate.address()),
            ])]))
        );
        assert_eq!(
            hex::encode(getter_selector("authAddresses")),
            hex::encode(&shared_crypto::keccak256(b"getAuthAddresses(string)")[..4])
        );
    }

    #[test]
    fn test_signature_window_tracks_clock() {
        let d = deploy();
        let delegate = Secp256k1KeyPair::generate();
        let req = AuthAddressReq::add(delegate.address(), ENTRY, d.clock_now());
        let sig_address = d.sign(&delegate, &req);
        let sig_owner = d.sign(&d.owner, &req);

        d.clock.advance(3_600);
        d.manager.add(&req, &sig_address, &sig_owner).unwrap();

        d.clock.advance(1);
        assert!(matches!(
            d.manager.add(&req, &sig_address, &sig_owner),
            Err(AuthAddressError::Auth(AuthError::SignatureExpired { .. }))
        ));
        assert_eq!(d.manager.addresses(ENTRY).unwrap().len(), 1);
    }

    #[test]
    fn test_ownership_transfer_revokes_authority() {
        let d = deploy();
        let new_owner = Secp256k1KeyPair::generate();
        d.tags
            .registry()
            .transfer(ENTRY, new_owner.address())
            .unwrap();

        let delegate = Secp256k1KeyPair::generate();
        assert!(matches!(
            d.add(ENTRY, &delegate, &d.owner),
            Err(AuthAddressError::Unauthorized { .. })
        ));
        assert_eq!(d.add(ENTRY, &delegate, &new_owner).unwrap(), 1);
    }

    #[test]
    fn test_subdomain_lists_are_separate() {
        let d = deploy();
        let sub_owner = Secp256k1KeyPair::generate();
        d.tags
            .registry()
            .register_name(sub_owner.address(), "app.testDomain")
            .unwrap();

        let delegate = Secp256k1KeyPair::generate();
        d.add("app.testDomain", &delegate, &sub_owner).unwrap();

        assert!(d.tags.has_tag("", "authAddresses", "app.testDomain"));
        assert!(matches!(
            d.manager.addresses(ENTRY),
            Err(AuthAddressError::TagNotSet(_))
        ));
    }

    #[test]
    fn test_namespaced_manager() {
        let d = deploy();
        d.tags
            .registry()
            .register_name(d.owner.address(), "app.testDomain")
            .unwrap();

        // A second manager whose tag lives in the entry owner's namespace.
        let scoped = Arc::new(
            AuthAddressManager::new(
                AuthAddressConfig::for_testing()
                    .with_namespace(ENTRY)
                    .with_tag_name("delegates"),
                d.tags.clone(),
                d.verifier.clone(),
            )
            .unwrap(),
        );
        let stranger = Secp256k1KeyPair::generate();
        assert!(matches!(
            scoped.install(stranger.address()),
            Err(AuthAddressError::Tag(TagError::Unauthorized { .. }))
        ));
        scoped.install(d.owner.address()).unwrap();

        let delegate = Secp256k1KeyPair::generate();
        let req = AuthAddressReq::add(delegate.address(), "app.testDomain", d.clock_now());
        scoped
            .add(&req, &d.sign(&delegate, &req), &d.sign(&d.owner, &req))
            .unwrap();
        assert_eq!(
            d.tags.type_string(ENTRY, "delegates").unwrap(),
            "tuple(uint8 algorithm,address addr)[]"
        );

        // The root list is untouched.
        assert!(!d.tags.has_tag("", "authAddresses", "app.testDomain"));

        // Entries outside the namespace cannot carry the scoped tag.
        d.tags
            .registry()
            .register_name(d.owner.address(), "elsewhere")
            .unwrap();
        let req = AuthAddressReq::add(delegate.address(), "elsewhere", d.clock_now());
        assert!(matches!(
            scoped.add(&req, &d.sign(&delegate, &req), &d.sign(&d.owner, &req)),
            Err(AuthAddressError::Tag(TagError::OutOfNamespace { .. }))
        ));
    }

    #[test]
    fn test_only_manager_writes_list() {
        let d = deploy();
        let forged = vec![0u8; 64];
        assert!(matches!(
            d.tags
                .set_tag_value(d.owner.address(), "", "authAddresses", ENTRY, forged),
            Err(TagError::NotTagger { .. })
        ));
    }
}
