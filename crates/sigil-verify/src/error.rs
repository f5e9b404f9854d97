//! Error types for the verification engine.
//!
//! Only `create_attestation` and `revoke` surface hard errors to the
//! caller; `verify` itself is fail-closed and resolves every error
//! condition to `false`. The diagnostic `check` entry point reports the
//! same conditions as typed errors for operators.

use thiserror::Error;
use uuid::Uuid;

use crate::record::AttestationId;
use sigil_abi::WireError;

/// Errors from attestation lifecycle operations and diagnostics.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerifyError {
    #[error("attestation {id} not found")]
    NotFound { id: AttestationId },

    #[error("attestation {id} is already revoked")]
    AlreadyRevoked { id: AttestationId },

    #[error("attestation {id} is revoked")]
    Revoked { id: AttestationId },

    #[error("attestation {id} is expired")]
    Expired { id: AttestationId },

    #[error("dependency traversal hit the depth bound or a cycle")]
    DependencyCycleOrTooDeep,

    #[error("dependency {attestation} on instance {instance} did not verify")]
    DependencyDenied {
        instance: Uuid,
        attestation: AttestationId,
    },

    #[error("caller is not authorized to {action}")]
    Unauthorized { action: String },

    #[error("schema version mismatch: got {got}, expected {expected}")]
    VersionMismatch { got: u32, expected: u32 },

    #[error("payload does not conform to schema: {0}")]
    InvalidPayload(#[from] WireError),
}
