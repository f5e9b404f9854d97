//! # Sigil Verify
//!
//! Attestation lifecycle and composable verification.
//!
//! This crate provides:
//! - [`AttestationRecord`] state: active, expired (computed), or revoked
//!   (stored, one-way)
//! - [`SchemaInstance`], the capability surface around one schema
//! - [`AttestationNetwork`], cross-instance composite verification with a
//!   bounded-depth, cycle-checked traversal
//!
//! Verification is fail-closed: a missing record, a revoked or expired
//! record, an unresolvable dependency, a cycle, or an over-deep chain all
//! read as `false`, and once `verify` returns `false` for an id it stays
//! `false` for that id.

pub mod error;
pub mod instance;
pub mod record;
pub mod store;
pub mod verify;

pub use error::VerifyError;
pub use instance::{AllowAll, AttestationDraft, Authorizer, Event, SchemaInstance};
pub use record::{AttestationId, AttestationRecord, AttestationStatus, DependencyRef};
pub use store::{MemoryStore, RecordStore};
pub use verify::{
    evaluate, AttestationNetwork, EmptyResolver, PortResolver, VerifyContext, VerifyPort,
    DEFAULT_MAX_DEPTH,
};
