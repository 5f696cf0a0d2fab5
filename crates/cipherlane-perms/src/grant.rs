//! Permission grants for sealed reads.
//!
//! A grant is the requester's own signed statement: "seal the aggregate of
//! instance I to my key K". It carries no authority by itself; the verifier
//! decides whether the signer is entitled to what it asks for.

use ciborium::value::Value;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use cipherlane_core::{
    canonical_encode, Blake3Hash, Ed25519Signature, Identity, InstanceId, Keypair,
};
use cipherlane_fhe::SealingPublicKey;

use crate::error::{PermsError, Result};

/// Domain prefix for grant signatures.
const SIGN_DOMAIN: &[u8] = b"cipherlane-permit-v0\0";

/// Body field keys (integer keys for compact encoding).
mod keys {
    pub const INSTANCE_ID: u64 = 0;
    pub const REQUESTER: u64 = 1;
    pub const SEALING_KEY: u64 = 2;
    pub const NONCE: u64 = 3;
    pub const ISSUED_AT: u64 = 4;
    pub const EXPIRES_AT: u64 = 5;
}

/// Content address of a grant, used to remember which grants were consumed.
pub type GrantId = Blake3Hash;

/// Conditions that may limit a grant beyond its one-time use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantConditions {
    /// When the grant expires (Unix milliseconds).
    pub expires_at: Option<i64>,
}

impl GrantConditions {
    /// No conditions.
    pub fn none() -> Self {
        Self::default()
    }

    /// Expire at the given time.
    pub fn expires_at(timestamp: i64) -> Self {
        Self {
            expires_at: Some(timestamp),
        }
    }

    /// Whether these conditions hold at `now`. Expiry is inclusive.
    pub fn is_valid(&self, now: i64) -> bool {
        match self.expires_at {
            Some(expires) => now <= expires,
            None => true,
        }
    }
}

/// A signed, one-use request to read one instance's aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGrant {
    /// The instance this grant is valid for.
    pub instance_id: InstanceId,

    /// The identity that signed the grant and wants the result.
    pub requester: Identity,

    /// Key the aggregate should be sealed to.
    pub sealing_key: SealingPublicKey,

    /// Random nonce making every grant unique.
    pub nonce: [u8; 16],

    /// When the grant was issued (Unix milliseconds).
    pub issued_at: i64,

    /// Optional conditions.
    pub conditions: GrantConditions,

    /// Requester's signature over the canonical body.
    pub signature: Ed25519Signature,
}

impl PermissionGrant {
    /// Issue a grant signed by `requester`.
    ///
    /// This is the client-side issuance routine; it runs wherever the
    /// requester's signing key lives, never inside the aggregation core.
    pub fn issue(
        instance_id: InstanceId,
        requester: &Keypair,
        sealing_key: SealingPublicKey,
        issued_at: i64,
        conditions: GrantConditions,
    ) -> Result<Self> {
        let mut nonce = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut nonce);

        let mut grant = Self {
            instance_id,
            requester: requester.public_key(),
            sealing_key,
            nonce,
            issued_at,
            conditions,
            signature: Ed25519Signature::from_bytes([0; 64]),
        };
        grant.signature = requester.sign(&grant.signed_message()?);
        Ok(grant)
    }

    /// Canonical CBOR encoding of the signed body.
    pub fn body_bytes(&self) -> Result<Vec<u8>> {
        let expires = match self.conditions.expires_at {
            Some(t) => Value::Integer(t.into()),
            None => Value::Null,
        };
        let body = Value::Map(vec![
            (
                Value::Integer(keys::INSTANCE_ID.into()),
                Value::Bytes(self.instance_id.as_bytes().to_vec()),
            ),
            (
                Value::Integer(keys::REQUESTER.into()),
                Value::Bytes(self.requester.as_bytes().to_vec()),
            ),
            (
                Value::Integer(keys::SEALING_KEY.into()),
                Value::Bytes(self.sealing_key.as_bytes().to_vec()),
            ),
            (
                Value::Integer(keys::NONCE.into()),
                Value::Bytes(self.nonce.to_vec()),
            ),
            (
                Value::Integer(keys::ISSUED_AT.into()),
                Value::Integer(self.issued_at.into()),
            ),
            (Value::Integer(keys::EXPIRES_AT.into()), expires),
        ]);
        Ok(canonical_encode(&body)?)
    }

    /// The exact bytes the requester signs: domain prefix || canonical body.
    pub fn signed_message(&self) -> Result<Vec<u8>> {
        let mut msg = SIGN_DOMAIN.to_vec();
        msg.extend_from_slice(&self.body_bytes()?);
        Ok(msg)
    }

    /// Content address of the signed body.
    pub fn id(&self) -> Result<GrantId> {
        Ok(Blake3Hash::hash(&self.body_bytes()?))
    }

    /// Check the signature against the named requester.
    pub fn verify_signature(&self) -> Result<()> {
        self.requester
            .verify(&self.signed_message()?, &self.signature)
            .map_err(|_| PermsError::InvalidSignature)
    }

    /// Serialize to CBOR bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(self, &mut buf)
            .map_err(|e| PermsError::InvalidGrant(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize from CBOR bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        ciborium::from_reader(bytes).map_err(|e| PermsError::InvalidGrant(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cipherlane_fhe::SealingSecret;
    use proptest::prelude::*;

    fn sample(requester: &Keypair) -> PermissionGrant {
        PermissionGrant::issue(
            InstanceId::from_bytes([0x11; 32]),
            requester,
            SealingSecret::from_bytes([0x22; 32]).public_key(),
            1_000,
            GrantConditions::expires_at(2_000),
        )
        .unwrap()
    }

    #[test]
    fn test_issued_grant_verifies() {
        let requester = Keypair::from_seed(&[1; 32]);
        sample(&requester).verify_signature().unwrap();
    }

    #[test]
    fn test_tampered_fields_break_signature() {
        let requester = Keypair::from_seed(&[1; 32]);
        let grant = sample(&requester);

        let mut g = grant.clone();
        g.instance_id = InstanceId::from_bytes([0x12; 32]);
        assert_eq!(g.verify_signature(), Err(PermsError::InvalidSignature));

        let mut g = grant.clone();
        g.sealing_key = SealingSecret::from_bytes([0x23; 32]).public_key();
        assert_eq!(g.verify_signature(), Err(PermsError::InvalidSignature));

        let mut g = grant.clone();
        g.conditions = GrantConditions::none();
        assert_eq!(g.verify_signature(), Err(PermsError::InvalidSignature));

        let mut g = grant;
        g.requester = Keypair::from_seed(&[2; 32]).public_key();
        assert_eq!(g.verify_signature(), Err(PermsError::InvalidSignature));
    }

    #[test]
    fn test_body_is_canonical_map() {
        let requester = Keypair::from_seed(&[1; 32]);
        let grant = sample(&requester);
        let body = grant.body_bytes().unwrap();

        let value: Value = ciborium::from_reader(body.as_slice()).unwrap();
        let entries = match value {
            Value::Map(entries) => entries,
            other => panic!("expected map, got {other:?}"),
        };
        let field_keys: Vec<Value> = entries.iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(
            field_keys,
            (0..=5u64).map(|k| Value::Integer(k.into())).collect::<Vec<_>>()
        );
        assert_eq!(entries[0].1, Value::Bytes(vec![0x11; 32]));
        assert_eq!(entries[1].1, Value::Bytes(requester.public_key().as_bytes().to_vec()));
        assert_eq!(entries[3].1, Value::Bytes(grant.nonce.to_vec()));
        assert_eq!(entries[4].1, Value::Integer(1_000.into()));
        assert_eq!(entries[5].1, Value::Integer(2_000.into()));

        // Re-encoding the decoded body is a fixed point.
        assert_eq!(canonical_encode(&Value::Map(entries)).unwrap(), body);
    }

    #[test]
    fn test_nonces_make_grants_distinct() {
        let requester = Keypair::from_seed(&[1; 32]);
        let a = sample(&requester);
        let b = sample(&requester);
        assert_ne!(a.id().unwrap(), b.id().unwrap());
    }

    #[test]
    fn test_grant_serialization() {
        let requester = Keypair::from_seed(&[1; 32]);
        let grant = sample(&requester);

        let recovered = PermissionGrant::from_bytes(&grant.to_bytes().unwrap()).unwrap();
        assert_eq!(recovered, grant);
        recovered.verify_signature().unwrap();
    }

    #[test]
    fn test_conditions_expiration() {
        let cond = GrantConditions::expires_at(1000);
        assert!(cond.is_valid(500));
        assert!(cond.is_valid(1000));
        assert!(!cond.is_valid(1001));
        assert!(GrantConditions::none().is_valid(i64::MAX));
    }

    proptest! {
        #[test]
        fn any_field_change_breaks_signature(
            nonce_byte in 0usize..16,
            flip in 1u8..=255,
            issued_delta in prop_oneof![i64::MIN..0i64, 1i64..i64::MAX],
            expiry in proptest::option::of(any::<i64>()),
        ) {
            let requester = Keypair::from_seed(&[1; 32]);
            let grant = sample(&requester);

            let mut g = grant.clone();
            g.nonce[nonce_byte] ^= flip;
            prop_assert_eq!(g.verify_signature(), Err(PermsError::InvalidSignature));

            let mut g = grant.clone();
            g.issued_at = grant.issued_at.wrapping_add(issued_delta);
            prop_assert_eq!(g.verify_signature(), Err(PermsError::InvalidSignature));

            prop_assume!(expiry != grant.conditions.expires_at);
            let mut g = grant;
            g.conditions.expires_at = expiry;
            prop_assert_eq!(g.verify_signature(), Err(PermsError::InvalidSignature));
        }
    }
}
