//! Composable verification across schema instances.
//!
//! Cross-instance composition is modeled as a capability: anything
//! exposing [`VerifyPort::eval`] can back a dependency, and dependencies
//! are resolved per reference through a [`PortResolver`] rather than
//! hard-wired. The traversal context bounds recursion depth and carries a
//! path-scoped visited set keyed by `(instance, attestation id)`, so
//! diamond-shaped dependency graphs evaluate while genuine cycles and
//! over-deep chains fail closed.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::VerifyError;
use crate::instance::SchemaInstance;
use crate::record::{AttestationId, AttestationStatus};

/// Default bound on dependency recursion depth. This is the only circuit
/// breaker against attacker-constructed dependency chains.
pub const DEFAULT_MAX_DEPTH: usize = 8;

/// The verification capability one schema instance exposes to others.
pub trait VerifyPort {
    /// Identity of this port, the first half of the visited-set key.
    fn port_id(&self) -> Uuid;

    /// Fail-closed validity decision for one attestation id, evaluated
    /// within a shared traversal context.
    fn eval(&self, id: AttestationId, cx: &mut VerifyContext<'_>) -> bool;
}

/// Resolves an instance identity to its verification port.
pub trait PortResolver {
    fn resolve(&self, instance: &Uuid) -> Option<&dyn VerifyPort>;
}

/// A resolver that knows no instances. Lone instances use it; every
/// foreign dependency then reads as `false`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyResolver;

impl PortResolver for EmptyResolver {
    fn resolve(&self, _instance: &Uuid) -> Option<&dyn VerifyPort> {
        None
    }
}

/// State threaded through one `verify` call tree: the clock snapshot, the
/// resolver, the depth bound, and the visited set.
pub struct VerifyContext<'a> {
    now: DateTime<Utc>,
    resolver: &'a dyn PortResolver,
    max_depth: usize,
    depth: usize,
    visited: HashSet<(Uuid, AttestationId)>,
    tripped: bool,
}

impl<'a> VerifyContext<'a> {
    pub fn new(now: DateTime<Utc>, resolver: &'a dyn PortResolver, max_depth: usize) -> Self {
        Self {
            now,
            resolver,
            max_depth,
            depth: 0,
            visited: HashSet::new(),
            tripped: false,
        }
    }

    /// The consistent clock snapshot for this whole call tree.
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn resolver(&self) -> &'a dyn PortResolver {
        self.resolver
    }

    /// Enter one attestation node. Returns `false`, and the caller must
    /// fail closed, when the depth bound is hit or the node is already on
    /// the current path (a cycle).
    pub fn enter(&mut self, key: (Uuid, AttestationId)) -> bool {
        if self.depth >= self.max_depth {
            self.tripped = true;
            return false;
        }
        if !self.visited.insert(key) {
            self.tripped = true;
            return false;
        }
        self.depth += 1;
        true
    }

    /// Leave a node entered with [`enter`](Self::enter). The key comes
    /// off the visited set so sibling branches may revisit shared
    /// dependencies; only the current path counts as a cycle.
    pub fn leave(&mut self, key: (Uuid, AttestationId)) {
        self.depth -= 1;
        self.visited.remove(&key);
    }

    pub(crate) fn tripped(&self) -> bool {
        self.tripped
    }
}

/// Evaluate one attestation through a resolver. The entry point behind
/// [`AttestationNetwork::verify_at`]; exposed for embedders wiring their
/// own resolvers and test doubles.
pub fn evaluate(
    resolver: &dyn PortResolver,
    instance: &Uuid,
    id: AttestationId,
    now: DateTime<Utc>,
    max_depth: usize,
) -> bool {
    let port = match resolver.resolve(instance) {
        Some(port) => port,
        None => return false,
    };
    let mut cx = VerifyContext::new(now, resolver, max_depth);
    port.eval(id, &mut cx)
}

/// A registry of schema instances that resolves dependencies among them.
///
/// The network owns its instances; mutation goes through
/// [`instance_mut`](Self::instance_mut) while verification only ever
/// takes `&self`, so every `verify` call tree reads a consistent
/// snapshot.
pub struct AttestationNetwork {
    instances: HashMap<Uuid, SchemaInstance>,
    max_depth: usize,
}

impl AttestationNetwork {
    pub fn new() -> Self {
        Self {
            instances: HashMap::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Register an instance, returning its identity.
    pub fn register(&mut self, instance: SchemaInstance) -> Uuid {
        let id = instance.instance_id();
        self.instances.insert(id, instance);
        id
    }

    pub fn instance(&self, instance: &Uuid) -> Option<&SchemaInstance> {
        self.instances.get(instance)
    }

    pub fn instance_mut(&mut self, instance: &Uuid) -> Option<&mut SchemaInstance> {
        self.instances.get_mut(instance)
    }

    /// Fail-closed composite verification with the current clock.
    pub fn verify(&self, instance: &Uuid, id: AttestationId) -> bool {
        self.verify_at(Utc::now(), instance, id)
    }

    /// Fail-closed composite verification against an explicit clock.
    pub fn verify_at(&self, now: DateTime<Utc>, instance: &Uuid, id: AttestationId) -> bool {
        evaluate(self, instance, id, now, self.max_depth)
    }

    /// Diagnostic twin of [`verify`](Self::verify): reports why an
    /// attestation is invalid. The boolean contract stays normative;
    /// this exists for operators and tooling.
    pub fn check(&self, instance: &Uuid, id: AttestationId) -> Result<(), VerifyError> {
        self.check_at(Utc::now(), instance, id)
    }

    pub fn check_at(
        &self,
        now: DateTime<Utc>,
        instance: &Uuid,
        id: AttestationId,
    ) -> Result<(), VerifyError> {
        let inst = self
            .instances
            .get(instance)
            .ok_or(VerifyError::NotFound { id })?;
        if id == 0 {
            return Err(VerifyError::NotFound { id });
        }
        let record = inst.get_attestation(id).ok_or(VerifyError::NotFound { id })?;

        match record.status_at(now) {
            AttestationStatus::Revoked => return Err(VerifyError::Revoked { id }),
            AttestationStatus::Expired => return Err(VerifyError::Expired { id }),
            AttestationStatus::Active => {}
        }

        let mut cx = VerifyContext::new(now, self, self.max_depth);
        let entered = cx.enter((inst.instance_id(), id));
        debug_assert!(entered);

        for dependency in &record.dependencies {
            let ok = match self.resolve(&dependency.instance) {
                Some(port) => port.eval(dependency.attestation, &mut cx),
                None => false,
            };
            if !ok {
                if cx.tripped() {
                    return Err(VerifyError::DependencyCycleOrTooDeep);
                }
                return Err(VerifyError::DependencyDenied {
                    instance: dependency.instance,
                    attestation: dependency.attestation,
                });
            }
        }
        Ok(())
    }
}

impl Default for AttestationNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl PortResolver for AttestationNetwork {
    fn resolve(&self, instance: &Uuid) -> Option<&dyn VerifyPort> {
        self.instances
            .get(instance)
            .map(|i| i as &dyn VerifyPort)
    }
}
