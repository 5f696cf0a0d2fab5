//! The Aggregator: one confidential aggregation instance.
//!
//! Brings together the access registry, the encrypted aggregate, grant
//! verification and public notifications behind the two public operations,
//! [`Aggregator::set_lane`] and [`Aggregator::get_aggregate`].
//!
//! The host executing an instance serializes calls, which `&mut self`
//! expresses directly; there is no internal locking. Every operation either
//! completes or leaves the instance exactly as it was.

use cipherlane_core::{CheckpointSlot, Identity, InstanceId};
use cipherlane_fhe::{Ciphertext, ConfidentialArithmetic, SealedOutput};
use cipherlane_perms::{AccessRegistry, Participants, PermissionGrant, PermissionVerifier};
use tokio::sync::broadcast;

use crate::aggregate::{AggregateState, ConfidentialAggregate};
use crate::error::{AccessDenied, AggregatorError, Result};
use crate::events::{EventNotifier, RequirementUpdated};

/// Configuration for an aggregation instance.
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Mixed into the instance ID so two instances with the same participants
    /// do not accept each other's grants.
    pub instance_salt: [u8; 32],
    /// Buffer size of the notification channel.
    pub event_capacity: usize,
    /// Whether grant time bounds (issue time and expiry) are enforced on reads.
    pub enforce_grant_expiry: bool,
    /// Source of the current time in Unix milliseconds, read once per sealed read.
    pub clock: fn() -> i64,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            instance_salt: rand::random(),
            event_capacity: 64,
            enforce_grant_expiry: true,
            clock: now_millis,
        }
    }
}

impl AggregatorConfig {
    /// Default configuration with a fixed salt, for reproducible instance IDs.
    pub fn with_salt(salt: [u8; 32]) -> Self {
        Self {
            instance_salt: salt,
            ..Self::default()
        }
    }
}

/// A confidential four-lane aggregation instance.
pub struct Aggregator<B: ConfidentialArithmetic> {
    instance_id: InstanceId,
    registry: AccessRegistry,
    verifier: PermissionVerifier,
    aggregate: ConfidentialAggregate,
    events: EventNotifier,
    backend: B,
    clock: fn() -> i64,
}

impl<B: ConfidentialArithmetic> Aggregator<B> {
    /// Construct an instance from `[viewer, writer0, writer1, writer2, writer3]`.
    ///
    /// Fails if the list does not hold exactly five distinct identities.
    pub fn new(identities: &[Identity], backend: B, config: AggregatorConfig) -> Result<Self> {
        let participants = Participants::from_slice(identities)?;
        let instance_id = InstanceId::derive(&participants.to_list(), &config.instance_salt);
        let aggregate = ConfidentialAggregate::zero(&backend)?;

        tracing::debug!(instance = %instance_id, viewer = %participants.viewer(), "aggregator constructed");

        Ok(Self {
            instance_id,
            registry: AccessRegistry::new(participants),
            verifier: PermissionVerifier::new(instance_id, config.enforce_grant_expiry),
            aggregate,
            events: EventNotifier::new(config.event_capacity),
            backend,
            clock: config.clock,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Write Path
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace the lane of `slot` with the low byte of `candidate`.
    ///
    /// `caller` is the identity the host authenticated for this call. It must
    /// be the writer bound to `slot`; the ciphertext contents play no part in
    /// authorization. On success a [`RequirementUpdated`] is emitted.
    pub fn set_lane(&mut self, caller: &Identity, slot: u8, candidate: &Ciphertext) -> Result<()> {
        let slot = CheckpointSlot::new(slot).map_err(|_| AggregatorError::InvalidSlot(slot))?;

        if !self.registry.is_writer(caller, slot) {
            tracing::warn!(caller = %caller, slot = %slot, "lane write denied");
            return Err(AccessDenied::Write { slot }.into());
        }

        self.aggregate.replace_lane(&self.backend, slot, candidate)?;
        self.events.emit(RequirementUpdated {
            writer: *caller,
            slot,
        });

        tracing::info!(writer = %caller, slot = %slot, "requirement updated");
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Read Path
    // ─────────────────────────────────────────────────────────────────────────

    /// Reseal the aggregate for `requester`, who must be the viewer and
    /// present an unused grant it signed for this instance.
    ///
    /// Time bounds are judged against the configured clock. Every rejection
    /// is reported as the same [`AccessDenied::Read`].
    pub fn get_aggregate(
        &mut self,
        requester: &Identity,
        grant: &PermissionGrant,
    ) -> Result<SealedOutput> {
        let now = (self.clock)();
        let grant_id = self
            .verifier
            .check(&self.registry, requester, grant, now)
            .map_err(|_| {
                tracing::warn!(requester = %requester, "sealed read denied");
                AggregatorError::AccessDenied(AccessDenied::Read)
            })?;

        let sealed = self
            .backend
            .reseal(self.aggregate.ciphertext(), &grant.sealing_key)?;
        self.verifier.consume(grant_id, grant.conditions.expires_at, now);

        tracing::debug!(requester = %requester, "sealed read granted");
        Ok(sealed)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Public State
    // ─────────────────────────────────────────────────────────────────────────

    /// This instance's identifier; grants must name it.
    pub fn instance_id(&self) -> &InstanceId {
        &self.instance_id
    }

    /// Slot and viewer bindings.
    pub fn registry(&self) -> &AccessRegistry {
        &self.registry
    }

    /// The encrypted aggregate, as visible on the shared ledger.
    pub fn aggregate(&self) -> &Ciphertext {
        self.aggregate.ciphertext()
    }

    /// Population state of the aggregate.
    pub fn state(&self) -> AggregateState {
        self.aggregate.state()
    }

    /// Every notification emitted so far.
    pub fn events(&self) -> &[RequirementUpdated] {
        self.events.events()
    }

    /// Subscribe to notifications emitted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<RequirementUpdated> {
        self.events.subscribe()
    }

    /// The confidential arithmetic backend, for encrypting submissions.
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: ConfidentialArithmetic> std::fmt::Debug for Aggregator<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aggregator")
            .field("instance_id", &self.instance_id)
            .field("state", &self.state())
            .field("events", &self.events.events().len())
            .finish()
    }
}

/// Current time in Unix milliseconds.
fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
