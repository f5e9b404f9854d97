//! Attestation records and their validity states.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sigil_abi::{Address, Element};

/// Identifier of an attestation within one schema instance: non-zero and
/// strictly increasing per instance. Zero is the "no attestation"
/// sentinel and never refers to a record.
pub type AttestationId = u64;

/// A reference to an attestation hosted by another (or the same) schema
/// instance, named by the instance's identity plus the local id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyRef {
    pub instance: Uuid,
    pub attestation: AttestationId,
}

impl DependencyRef {
    pub fn new(instance: Uuid, attestation: AttestationId) -> Self {
        Self {
            instance,
            attestation,
        }
    }
}

/// Validity state of a record at a point in time.
///
/// `Revoked` is the stored flag; `Expired` is computed from `expires_at`
/// against the caller's clock and never stored. Both read as "not valid".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttestationStatus {
    Active,
    Expired,
    Revoked,
}

/// A single attestation: immutable after creation except for the one-way
/// `revoked` transition. Records are never deleted and never un-revoked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttestationRecord {
    pub id: AttestationId,
    pub attester: Address,
    pub subject: Address,

    /// Content id of the schema the payload was encoded against.
    pub schema_id: String,

    /// Opaque element sequence conforming to the instance's schema.
    pub payload: Vec<Element>,

    /// Foreign attestations this record's validity is conjoined with.
    /// Empty for a simple attestation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<DependencyRef>,

    pub created_at: DateTime<Utc>,

    /// Expiry instant; the record is valid strictly before it. Absent
    /// means never expires.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub revoked: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub revoked_at: Option<DateTime<Utc>>,
}

impl AttestationRecord {
    /// Validity state at `now`. The expiry boundary is exclusive: a
    /// record with `expires_at == now` is already expired.
    pub fn status_at(&self, now: DateTime<Utc>) -> AttestationStatus {
        if self.revoked {
            return AttestationStatus::Revoked;
        }
        match self.expires_at {
            Some(expires_at) if now >= expires_at => AttestationStatus::Expired,
            _ => AttestationStatus::Active,
        }
    }

    /// Whether this attestation's validity depends on others.
    pub fn is_composite(&self) -> bool {
        !self.dependencies.is_empty()
    }
}
