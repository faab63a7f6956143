//! # Auth Address Manager
//!
//! Add/remove protocol for per-entry authenticated-address lists.
//!
//! ## Add
//!
//! Two signatures over the same `AuthAddressReq`: one from the entry's owner
//! (or the owner of any ancestor), one from the address being added.
//! Checks run in order: action, validity window, owner signer, address
//! signer, algorithm. The address is appended; duplicates are kept.
//!
//! ## Remove
//!
//! One owner-side signature. Either index-addressed ([`remove_at`]) or
//! search-addressed ([`remove`]). Removal is swap-and-pop and reorders the
//! list; removing the last element clears the tag.
//!
//! Requests carry no nonce: a valid request replays until its window closes.
//!
//! Every add/remove holds a per-entry lock from reading the list to writing
//! it back.
//!
//! [`remove_at`]: AuthAddressManager::remove_at
//! [`remove`]: AuthAddressManager::remove

use crate::config::AuthAddressConfig;
use crate::domain::{
    list_field_names, Action, AuthAddress, AuthAddressError, AuthAddressList, AuthAddressReq,
    AuthAddressResult, SignatureAlgorithm, LIST_DESCRIPTOR,
};
use parking_lot::Mutex;
use shared_types::{ancestors, entry_id, fmt_address, Address, EntryId};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tr_02_tag_registry::{
    getter_selector, NameRegistry, Selector, TagError, TagRegistryApi, TagRegistryService, Tagger,
    TaggerId,
};
use tr_03_typed_signatures::AuthRequestVerifier;

pub struct AuthAddressManager<R: NameRegistry> {
    config: AuthAddressConfig,
    tags: Arc<TagRegistryService<R>>,
    verifier: Arc<AuthRequestVerifier>,
    entry_locks: Mutex<HashMap<EntryId, Arc<Mutex<()>>>>,
}

impl<R: NameRegistry> AuthAddressManager<R> {
    pub fn new(
        config: AuthAddressConfig,
        tags: Arc<TagRegistryService<R>>,
        verifier: Arc<AuthRequestVerifier>,
    ) -> AuthAddressResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            tags,
            verifier,
            entry_locks: Mutex::new(HashMap::new()),
        })
    }

    pub fn config(&self) -> &AuthAddressConfig {
        &self.config
    }

    /// Define the list tag (if absent) and bind this manager as its tagger.
    ///
    /// `admin` must administer the configured namespace.
    pub fn install(self: &Arc<Self>, admin: Address) -> AuthAddressResult<()>
    where
        R: 'static,
    {
        let ns = &self.config.namespace;
        let tag = &self.config.tag_name;

        match self
            .tags
            .define_tag(admin, ns, tag, &LIST_DESCRIPTOR, &list_field_names())
        {
            Ok(_) => {}
            Err(TagError::DuplicateTag { .. }) => {
                let existing = self.tags.get_definition(ns, tag)?;
                if existing.type_descriptor != LIST_DESCRIPTOR {
                    return Err(AuthAddressError::InvalidConfig(format!(
                        "tag {tag:?} already defined with a different type"
                    )));
                }
            }
            Err(e) => return Err(e.into()),
        }

        let tagger: Arc<dyn Tagger> = self.clone();
        self.tags.set_tagger(admin, ns, tag, &tagger)?;
        info!(
            "[tr-04] Auth address manager installed as tagger {}",
            fmt_address(&self.config.tagger_id)
        );
        Ok(())
    }

    /// Add `req.addr` to the list of `req.entry_name`.
    ///
    /// Returns the new list length.
    ///
    /// # Errors
    /// * `InvalidAction` - request is not an Add
    /// * `Auth(SignatureExpired)` - outside the validity window
    /// * `Unauthorized` - owner-side signer has no authority over the entry
    /// * `InvalidAddressSignature` - address-side signer is not `req.addr`
    /// * `UnsupportedAlgorithm` - algorithm other than ECDSA
    pub fn add(
        &self,
        req: &AuthAddressReq,
        sig_from_address: &[u8],
        sig_from_owner: &[u8],
    ) -> AuthAddressResult<usize> {
        Self::expect_action(req, Action::Add)?;
        self.verifier
            .check_window(req.sign_at, self.verifier.now())?;
        self.authorize_owner(req, sig_from_owner)?;

        let recovered = self.verifier.recover(req, sig_from_address)?;
        if recovered != req.addr {
            warn!(
                "[tr-04] ⛔ Address signature for {} recovered {}",
                fmt_address(&req.addr),
                fmt_address(&recovered)
            );
            return Err(AuthAddressError::InvalidAddressSignature {
                expected: fmt_address(&req.addr),
                recovered: fmt_address(&recovered),
            });
        }

        SignatureAlgorithm::try_from(req.algorithm)
            .map_err(AuthAddressError::UnsupportedAlgorithm)?;

        let lock = self.entry_lock(&req.entry_name);
        let _guard = lock.lock();

        let mut list = self.load(&req.entry_name)?;
        list.push(AuthAddress {
            algorithm: req.algorithm,
            addr: req.addr,
        });
        self.store(&req.entry_name, &list)?;

        info!(
            "[tr-04] ➕ Added {} to {:?} ({} address(es))",
            fmt_address(&req.addr),
            req.entry_name,
            list.len()
        );
        Ok(list.len())
    }

    /// Remove the element at `index`, which must hold `req.addr`.
    ///
    /// The last element moves into `index`. Returns the removed element.
    ///
    /// # Errors
    /// * `InvalidAction`, `Auth(..)`, `Unauthorized` - as for [`add`](Self::add)
    /// * `TagNotSet` - no list
    /// * `InvalidIndex` - out of bounds, or a different address at `index`
    pub fn remove_at(
        &self,
        req: &AuthAddressReq,
        sig_from_owner: &[u8],
        index: usize,
    ) -> AuthAddressResult<AuthAddress> {
        self.authorize_remove(req, sig_from_owner)?;
        self.mutate_list(&req.entry_name, |list| list.remove_at(index, &req.addr))
    }

    /// Remove the first element holding `req.addr`.
    ///
    /// # Errors
    /// * `InvalidAction`, `Auth(..)`, `Unauthorized` - as for [`add`](Self::add)
    /// * `TagNotSet` - no list
    /// * `AddressNotFound` - `req.addr` not in the list
    pub fn remove(
        &self,
        req: &AuthAddressReq,
        sig_from_owner: &[u8],
    ) -> AuthAddressResult<AuthAddress> {
        self.authorize_remove(req, sig_from_owner)?;
        self.mutate_list(&req.entry_name, |list| list.remove(&req.addr))
    }

    /// Current list of `entry_name`.
    pub fn addresses(&self, entry_name: &str) -> AuthAddressResult<Vec<AuthAddress>> {
        let list = self.load(entry_name)?;
        if list.is_empty() {
            return Err(AuthAddressError::TagNotSet(entry_name.to_string()));
        }
        Ok(list.into_vec())
    }

    fn expect_action(req: &AuthAddressReq, expected: Action) -> AuthAddressResult<()> {
        if req.action != expected.as_u8() {
            return Err(AuthAddressError::InvalidAction {
                expected,
                actual: req.action,
            });
        }
        Ok(())
    }

    fn authorize_remove(&self, req: &AuthAddressReq, sig_from_owner: &[u8]) -> AuthAddressResult<()> {
        Self::expect_action(req, Action::Remove)?;
        self.verifier
            .check_window(req.sign_at, self.verifier.now())?;
        self.authorize_owner(req, sig_from_owner)
    }

    /// The owner-side signer must own the entry or one of its ancestors.
    fn authorize_owner(&self, req: &AuthAddressReq, signature: &[u8]) -> AuthAddressResult<()> {
        let registry = self.tags.registry();
        if !registry.is_registered(&req.entry_name) {
            return Err(AuthAddressError::EntryNotRegistered(req.entry_name.clone()));
        }

        let signer = self.verifier.recover(req, signature)?;
        let authorized = std::iter::once(req.entry_name.as_str())
            .chain(ancestors(&req.entry_name))
            .any(|name| registry.owner_of(name) == Some(signer));

        if !authorized {
            warn!(
                "[tr-04] ⛔ {} has no authority over {:?}",
                fmt_address(&signer),
                req.entry_name
            );
            return Err(AuthAddressError::Unauthorized {
                signer: fmt_address(&signer),
                entry: req.entry_name.clone(),
            });
        }
        debug!(
            "[tr-04] Owner-side signer {} authorized for {:?}",
            fmt_address(&signer),
            req.entry_name
        );
        Ok(())
    }

    fn mutate_list<F>(&self, entry_name: &str, op: F) -> AuthAddressResult<AuthAddress>
    where
        F: FnOnce(&mut AuthAddressList) -> AuthAddressResult<AuthAddress>,
    {
        let lock = self.entry_lock(entry_name);
        let _guard = lock.lock();

        let mut list = self.load(entry_name)?;
        if list.is_empty() {
            return Err(AuthAddressError::TagNotSet(entry_name.to_string()));
        }
        let removed = op(&mut list)?;
        self.store(entry_name, &list)?;

        info!(
            "[tr-04] ➖ Removed {} from {:?} ({} address(es) left)",
            fmt_address(&removed.addr),
            entry_name,
            list.len()
        );
        Ok(removed)
    }

    fn entry_lock(&self, entry_name: &str) -> Arc<Mutex<()>> {
        self.entry_locks
            .lock()
            .entry(entry_id(entry_name))
            .or_default()
            .clone()
    }

    fn load(&self, entry_name: &str) -> AuthAddressResult<AuthAddressList> {
        let value =
            self.tags
                .get_tag_value(&self.config.namespace, &self.config.tag_name, entry_name)?;
        AuthAddressList::decode(&value.raw)
    }

    fn store(&self, entry_name: &str, list: &AuthAddressList) -> AuthAddressResult<()> {
        self.tags.set_tag_value(
            self.config.tagger_id,
            &self.config.namespace,
            &self.config.tag_name,
            entry_name,
            list.encode()?,
        )?;
        Ok(())
    }
}

impl<R: NameRegistry> Tagger for AuthAddressManager<R> {
    fn tagger_id(&self) -> TaggerId {
        self.config.tagger_id
    }

    fn call_getter(&self, selector: Selector, entry_name: &str) -> Option<Vec<u8>> {
        if selector != getter_selector(&self.config.tag_name) {
            return None;
        }
        let value = self
            .tags
            .get_tag_value(&self.config.namespace, &self.config.tag_name, entry_name)
            .ok()?;
        Some(value.raw)
    }
}
