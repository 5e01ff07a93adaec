//! # Sibling Registry
//!
//! Each instance pairs with exactly one counterpart on the other ledger.
//! Both sides must register each other before any transfer between them is
//! valid: a burn is accepted only towards the registered sibling, and a
//! claim only from it.
//!
//! ## Lifecycle
//!
//! ```text
//! Unpaired ──register(s)──▶ Paired(s) ──register(s)──▶ Paired(s)   (idempotent)
//!                                     ──register(t)──▶ error       (t ≠ s)
//! ```
//!
//! There is no unregister.

use serde::{Deserialize, Serialize};
use xchain_core::Address;

use crate::error::RegistryError;

/// Set-once sibling identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiblingRegistry {
    sibling: Option<Address>,
}

impl SiblingRegistry {
    /// An unpaired registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `sibling`. Returns `true` if this call paired the registry,
    /// `false` if it was already paired with `sibling`.
    pub fn register(&mut self, sibling: Address) -> Result<bool, RegistryError> {
        if sibling.is_zero() {
            return Err(RegistryError::ZeroIdentity);
        }
        match self.sibling {
            None => {
                self.sibling = Some(sibling);
                Ok(true)
            }
            Some(existing) if existing == sibling => Ok(false),
            Some(existing) => Err(RegistryError::SiblingAlreadyRegistered {
                existing,
                requested: sibling,
            }),
        }
    }

    /// The registered sibling.
    pub fn sibling(&self) -> Option<Address> {
        self.sibling
    }

    /// True if `identity` is non-zero and is the registered sibling.
    pub fn is_sibling(&self, identity: &Address) -> bool {
        !identity.is_zero() && self.sibling.as_ref() == Some(identity)
    }
}
