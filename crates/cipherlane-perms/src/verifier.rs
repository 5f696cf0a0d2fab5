//! Grant verification for sealed reads.
//!
//! Verification is split in two steps so that a read which fails after the
//! grant was accepted (for example a backend error while resealing) does not
//! burn the grant: [`PermissionVerifier::check`] is side-effect free, and
//! [`PermissionVerifier::consume`] records the grant only once the read has
//! produced its result.
//!
//! With time bounds enforced, a consumed grant is remembered only until it
//! expires; after that the expiry check rejects it on its own. Grants without
//! an expiry, or any grant when enforcement is off, are remembered for the
//! lifetime of the verifier.

use std::collections::HashMap;

use cipherlane_core::{Identity, InstanceId};

use crate::error::{PermsError, Result};
use crate::grant::{GrantId, PermissionGrant};
use crate::registry::AccessRegistry;

/// Validates grants against one instance and tracks used grants.
#[derive(Debug)]
pub struct PermissionVerifier {
    instance_id: InstanceId,
    enforce_expiry: bool,
    /// Used grants and their expiry.
    consumed: HashMap<GrantId, Option<i64>>,
}

impl PermissionVerifier {
    /// Create a verifier bound to `instance_id`.
    pub fn new(instance_id: InstanceId, enforce_expiry: bool) -> Self {
        Self {
            instance_id,
            enforce_expiry,
            consumed: HashMap::new(),
        }
    }

    /// The instance grants must name.
    pub fn instance_id(&self) -> &InstanceId {
        &self.instance_id
    }

    /// Check that `grant` entitles `requester` to a sealed read at `now`.
    ///
    /// Checks, in order: signature, instance binding, requester binding,
    /// viewer membership, time bounds, single use.
    pub fn check(
        &self,
        registry: &AccessRegistry,
        requester: &Identity,
        grant: &PermissionGrant,
        now: i64,
    ) -> Result<GrantId> {
        grant.verify_signature()?;

        if grant.instance_id != self.instance_id {
            return Err(PermsError::WrongInstance);
        }
        if grant.requester != *requester {
            return Err(PermsError::WrongRequester);
        }
        if !registry.is_viewer(requester) {
            return Err(PermsError::NotViewer);
        }
        if self.enforce_expiry {
            if grant.issued_at > now {
                return Err(PermsError::GrantNotYetValid(grant.issued_at));
            }
            if !grant.conditions.is_valid(now) {
                // is_valid only fails when expires_at is set
                return Err(PermsError::GrantExpired(
                    grant.conditions.expires_at.unwrap_or_default(),
                ));
            }
        }

        let id = grant.id()?;
        if self.consumed.contains_key(&id) {
            return Err(PermsError::GrantReplayed);
        }
        Ok(id)
    }

    /// Record a grant as used at `now`, forgetting used grants that have
    /// expired by then.
    pub fn consume(&mut self, id: GrantId, expires_at: Option<i64>, now: i64) {
        if self.enforce_expiry {
            self.consumed
                .retain(|_, expiry| expiry.map_or(true, |t| now <= t));
        }
        self.consumed.insert(id, expires_at);
    }

    /// Whether a grant is remembered as used.
    pub fn is_consumed(&self, id: &GrantId) -> bool {
        self.consumed.contains_key(id)
    }

    /// Number of used grants currently remembered.
    pub fn consumed_count(&self) -> usize {
        self.consumed.len()
    }
}
