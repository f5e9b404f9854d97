//! Schema instances: the capability surface around one schema.
//!
//! A [`SchemaInstance`] binds a validated schema to its ABI projection,
//! content id, record store, authorization hook, and event log. It owns
//! its records exclusively; other instances see them only through the
//! verify contract, never through the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sigil_abi::{deserialize, schema_id, schema_text, Address, Element, StructABI};
use sigil_schema::{validate, Schema, SchemaError};

use crate::error::VerifyError;
use crate::record::{AttestationId, AttestationRecord, AttestationStatus, DependencyRef};
use crate::store::{MemoryStore, RecordStore};
use crate::verify::{EmptyResolver, VerifyContext, VerifyPort, DEFAULT_MAX_DEPTH};

/// Authorization hook for record mutations. The core only exposes the
/// hook points; policy lives with the embedder. The default permits
/// everything.
pub trait Authorizer {
    fn can_attest(&self, _attester: &Address) -> bool {
        true
    }

    fn can_revoke(&self, _caller: &Address, _record: &AttestationRecord) -> bool {
        true
    }
}

/// Permit-everything authorizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl Authorizer for AllowAll {}

/// Lifecycle notifications appended by successful mutations and drained
/// by the embedder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Event {
    AttestationCreated {
        id: AttestationId,
        subject: Address,
        created_at: DateTime<Utc>,
    },
    AttestationRevoked {
        id: AttestationId,
        revoked_at: DateTime<Utc>,
    },
}

/// Input to [`SchemaInstance::create_attestation`].
///
/// `schema_version` is the version the payload was encoded against; the
/// instance rejects drafts whose version does not match its schema.
#[derive(Debug, Clone)]
pub struct AttestationDraft {
    pub attester: Address,
    pub subject: Address,
    pub schema_version: u32,
    pub payload: Vec<Element>,
    pub expires_at: Option<DateTime<Utc>>,
    pub dependencies: Vec<DependencyRef>,
}

impl AttestationDraft {
    pub fn new(
        attester: Address,
        subject: Address,
        schema_version: u32,
        payload: Vec<Element>,
    ) -> Self {
        Self {
            attester,
            subject,
            schema_version,
            payload,
            expires_at: None,
            dependencies: vec![],
        }
    }

    pub fn expires_at(mut self, at: DateTime<Utc>) -> Self {
        self.expires_at = Some(at);
        self
    }

    /// Conjoin this attestation's validity with a dependency.
    pub fn depends_on(mut self, dependency: DependencyRef) -> Self {
        self.dependencies.push(dependency);
        self
    }
}

/// One hosted schema plus its attestation records.
pub struct SchemaInstance {
    instance_id: Uuid,
    schema: Schema,
    abi: StructABI,
    schema_id: String,
    store: Box<dyn RecordStore>,
    authorizer: Box<dyn Authorizer>,
    events: Vec<Event>,
}

impl SchemaInstance {
    /// Register a schema. Validation failures are fatal: no instance is
    /// created for an invalid schema.
    pub fn new(schema: Schema) -> Result<Self, SchemaError> {
        validate(&schema)?;
        let abi = StructABI::from_schema(&schema);
        let schema_id = schema_id(&schema);
        Ok(Self {
            instance_id: Uuid::new_v4(),
            schema,
            abi,
            schema_id,
            store: Box::new(MemoryStore::new()),
            authorizer: Box::new(AllowAll),
            events: vec![],
        })
    }

    pub fn with_store(mut self, store: Box<dyn RecordStore>) -> Self {
        self.store = store;
        self
    }

    pub fn with_authorizer(mut self, authorizer: Box<dyn Authorizer>) -> Self {
        self.authorizer = authorizer;
        self
    }

    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn schema_text(&self) -> String {
        schema_text(&self.schema)
    }

    pub fn abi(&self) -> &StructABI {
        &self.abi
    }

    pub fn schema_id(&self) -> &str {
        &self.schema_id
    }

    /// Create an attestation from a draft.
    ///
    /// The payload is decoded against the schema before anything is
    /// stored; a malformed payload never produces a record.
    ///
    /// # Errors
    ///
    /// [`VerifyError::Unauthorized`], [`VerifyError::VersionMismatch`],
    /// or [`VerifyError::InvalidPayload`].
    pub fn create_attestation(
        &mut self,
        draft: AttestationDraft,
    ) -> Result<AttestationId, VerifyError> {
        if !self.authorizer.can_attest(&draft.attester) {
            return Err(VerifyError::Unauthorized {
                action: "create an attestation".to_string(),
            });
        }
        if draft.schema_version != self.schema.version {
            return Err(VerifyError::VersionMismatch {
                got: draft.schema_version,
                expected: self.schema.version,
            });
        }
        deserialize(&self.schema, &draft.payload)?;

        let id = self.store.next_id();
        let created_at = Utc::now();
        self.store.insert(AttestationRecord {
            id,
            attester: draft.attester,
            subject: draft.subject,
            schema_id: self.schema_id.clone(),
            payload: draft.payload,
            dependencies: draft.dependencies,
            created_at,
            expires_at: draft.expires_at,
            revoked: false,
            revoked_at: None,
        });
        self.events.push(Event::AttestationCreated {
            id,
            subject: draft.subject,
            created_at,
        });
        Ok(id)
    }

    /// Revoke an attestation. One-way: there is no unrevoke.
    ///
    /// # Errors
    ///
    /// [`VerifyError::NotFound`], [`VerifyError::Unauthorized`], or
    /// [`VerifyError::AlreadyRevoked`].
    pub fn revoke(&mut self, caller: &Address, id: AttestationId) -> Result<(), VerifyError> {
        let record = self.store.get(id).ok_or(VerifyError::NotFound { id })?;
        if !self.authorizer.can_revoke(caller, record) {
            return Err(VerifyError::Unauthorized {
                action: "revoke an attestation".to_string(),
            });
        }
        if record.revoked {
            return Err(VerifyError::AlreadyRevoked { id });
        }

        let revoked_at = Utc::now();
        self.store.mark_revoked(id, revoked_at);
        self.events.push(Event::AttestationRevoked { id, revoked_at });
        Ok(())
    }

    pub fn get_attestation(&self, id: AttestationId) -> Option<&AttestationRecord> {
        self.store.get(id)
    }

    pub fn get_attestations_for(&self, subject: &Address) -> Vec<AttestationId> {
        self.store.ids_for_subject(subject)
    }

    pub fn get_attestations_by(&self, attester: &Address) -> Vec<AttestationId> {
        self.store.ids_by_attester(attester)
    }

    /// Remove and return the pending lifecycle events.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// Verify with the current clock. Dependencies on foreign instances
    /// cannot be resolved from a lone instance and read as `false`; use
    /// an [`crate::AttestationNetwork`] for cross-instance composition.
    pub fn verify(&self, id: AttestationId) -> bool {
        self.verify_at(Utc::now(), id)
    }

    /// Verify against an explicit clock.
    pub fn verify_at(&self, now: DateTime<Utc>, id: AttestationId) -> bool {
        let resolver = EmptyResolver;
        let mut cx = VerifyContext::new(now, &resolver, DEFAULT_MAX_DEPTH);
        self.eval(id, &mut cx)
    }

    fn eval_checks(&self, id: AttestationId, cx: &mut VerifyContext<'_>) -> bool {
        let record = match self.store.get(id) {
            Some(record) => record,
            None => return false,
        };
        if record.status_at(cx.now()) != AttestationStatus::Active {
            return false;
        }

        // Conjunction over declared dependencies; same-instance references
        // recurse locally, foreign ones go through the resolver.
        for dependency in &record.dependencies {
            let ok = if dependency.instance == self.instance_id {
                self.eval(dependency.attestation, cx)
            } else {
                match cx.resolver().resolve(&dependency.instance) {
                    Some(port) => port.eval(dependency.attestation, cx),
                    None => false,
                }
            };
            if !ok {
                return false;
            }
        }
        true
    }
}

impl VerifyPort for SchemaInstance {
    fn port_id(&self) -> Uuid {
        self.instance_id
    }

    fn eval(&self, id: AttestationId, cx: &mut VerifyContext<'_>) -> bool {
        if id == 0 {
            return false;
        }
        let key = (self.instance_id, id);
        if !cx.enter(key) {
            return false;
        }
        let valid = self.eval_checks(id, cx);
        cx.leave(key);
        valid
    }
}
