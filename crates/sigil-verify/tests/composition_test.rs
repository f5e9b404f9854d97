//! Cross-instance composition tests: conjunction over dependencies,
//! cycle rejection, depth bounding, decisiveness, and resolver doubles.

use std::collections::HashMap;

use chrono::{Duration, Utc};
use uuid::Uuid;

use sigil_abi::{serialize, Address, Value};
use sigil_schema::{FieldType, Schema, SchemaField};
use sigil_verify::{
    evaluate, AttestationDraft, AttestationNetwork, DependencyRef, PortResolver, SchemaInstance,
    VerifyContext, VerifyError, VerifyPort,
};

fn counter_schema(name: &str) -> Schema {
    Schema::new(name, 1).with_field(SchemaField::new("count", FieldType::Uint64))
}

fn instance(name: &str) -> SchemaInstance {
    SchemaInstance::new(counter_schema(name)).unwrap()
}

fn draft(inst: &SchemaInstance, count: u64) -> AttestationDraft {
    let payload = serialize(inst.schema(), &[Value::Uint64(count)]).unwrap();
    AttestationDraft::new(
        Address::from_low_u64(0xa),
        Address::from_low_u64(0xb),
        1,
        payload,
    )
}

#[test]
fn test_composite_conjunction_across_instances() {
    let mut network = AttestationNetwork::new();
    let badges = network.register(instance("badge"));
    let endorsements = network.register(instance("endorsement"));

    let draft_a = draft(network.instance(&badges).unwrap(), 1);
    let badge_a = network
        .instance_mut(&badges)
        .unwrap()
        .create_attestation(draft_a)
        .unwrap();
    let draft_b = draft(network.instance(&badges).unwrap(), 2);
    let badge_b = network
        .instance_mut(&badges)
        .unwrap()
        .create_attestation(draft_b)
        .unwrap();

    let endorsement = {
        let inst = network.instance(&endorsements).unwrap();
        let d = draft(inst, 3)
            .depends_on(DependencyRef::new(badges, badge_a))
            .depends_on(DependencyRef::new(badges, badge_b));
        network
            .instance_mut(&endorsements)
            .unwrap()
            .create_attestation(d)
            .unwrap()
    };

    assert!(network.verify(&endorsements, endorsement));

    // Revoking one dependency fails the conjunction.
    network
        .instance_mut(&badges)
        .unwrap()
        .revoke(&Address::from_low_u64(0xa), badge_b)
        .unwrap();
    assert!(!network.verify(&endorsements, endorsement));
    assert!(matches!(
        network.check(&endorsements, endorsement),
        Err(VerifyError::DependencyDenied { attestation, .. }) if attestation == badge_b
    ));
}

#[test]
fn test_cycle_between_instances_is_rejected() {
    let mut network = AttestationNetwork::new();
    let a = network.register(instance("a"));
    let b = network.register(instance("b"));

    // Ids are deterministic per instance, so each side can name the other
    // before it exists: both records get id 1.
    let in_a = {
        let inst = network.instance(&a).unwrap();
        let d = draft(inst, 1).depends_on(DependencyRef::new(b, 1));
        network.instance_mut(&a).unwrap().create_attestation(d).unwrap()
    };
    let in_b = {
        let inst = network.instance(&b).unwrap();
        let d = draft(inst, 2).depends_on(DependencyRef::new(a, 1));
        network.instance_mut(&b).unwrap().create_attestation(d).unwrap()
    };

    assert!(!network.verify(&a, in_a));
    assert!(!network.verify(&b, in_b));
    assert!(matches!(
        network.check(&a, in_a),
        Err(VerifyError::DependencyCycleOrTooDeep)
    ));
}

#[test]
fn test_self_cycle_is_rejected() {
    let mut network = AttestationNetwork::new();
    let a = network.register(instance("a"));

    let id = {
        let inst = network.instance(&a).unwrap();
        // Depends on its own future id.
        let d = draft(inst, 1).depends_on(DependencyRef::new(a, 1));
        network.instance_mut(&a).unwrap().create_attestation(d).unwrap()
    };

    assert!(!network.verify(&a, id));
}

#[test]
fn test_depth_bound_fails_closed() {
    let mut shallow = AttestationNetwork::new().with_max_depth(3);
    let a = shallow.register(instance("chain"));

    // A linear chain 4 -> 3 -> 2 -> 1.
    for step in 0u64..4 {
        let inst = shallow.instance(&a).unwrap();
        let mut d = draft(inst, step);
        if step > 0 {
            d = d.depends_on(DependencyRef::new(a, step));
        }
        shallow.instance_mut(&a).unwrap().create_attestation(d).unwrap();
    }

    // Path 4 -> 3 -> 2 -> 1 holds four nodes, over the bound of 3.
    assert!(!shallow.verify(&a, 4));
    assert!(shallow.verify(&a, 3));
    assert!(matches!(
        shallow.check(&a, 4),
        Err(VerifyError::DependencyCycleOrTooDeep)
    ));
}

#[test]
fn test_diamond_dependencies_are_not_a_cycle() {
    let mut network = AttestationNetwork::new();
    let a = network.register(instance("diamond"));

    let base = {
        let d = draft(network.instance(&a).unwrap(), 0);
        network.instance_mut(&a).unwrap().create_attestation(d).unwrap()
    };
    let left = {
        let d = draft(network.instance(&a).unwrap(), 1)
            .depends_on(DependencyRef::new(a, base));
        network.instance_mut(&a).unwrap().create_attestation(d).unwrap()
    };
    let right = {
        let d = draft(network.instance(&a).unwrap(), 2)
            .depends_on(DependencyRef::new(a, base));
        network.instance_mut(&a).unwrap().create_attestation(d).unwrap()
    };
    let top = {
        let d = draft(network.instance(&a).unwrap(), 3)
            .depends_on(DependencyRef::new(a, left))
            .depends_on(DependencyRef::new(a, right));
        network.instance_mut(&a).unwrap().create_attestation(d).unwrap()
    };

    // Both branches share `base`; that is a diamond, not a cycle.
    assert!(network.verify(&a, top));
}

#[test]
fn test_decisiveness_over_revocation_and_time() {
    let mut network = AttestationNetwork::new();
    let a = network.register(instance("decisive"));

    let now = Utc::now();
    let expires = now + Duration::hours(1);
    let id = {
        let d = draft(network.instance(&a).unwrap(), 1).expires_at(expires);
        network.instance_mut(&a).unwrap().create_attestation(d).unwrap()
    };

    assert!(network.verify_at(now, &a, id));

    // Once false by expiry, false at every later time.
    assert!(!network.verify_at(expires, &a, id));
    assert!(!network.verify_at(expires + Duration::days(30), &a, id));

    // Revocation is also one-way; no sequence of calls resurrects the id.
    network
        .instance_mut(&a)
        .unwrap()
        .revoke(&Address::from_low_u64(0xa), id)
        .unwrap();
    assert!(!network.verify_at(now, &a, id));
    assert!(!network.verify_at(expires + Duration::days(365), &a, id));
}

#[test]
fn test_check_reports_local_reasons() {
    let mut network = AttestationNetwork::new();
    let a = network.register(instance("reasons"));

    assert!(matches!(
        network.check(&a, 0),
        Err(VerifyError::NotFound { id: 0 })
    ));
    assert!(matches!(
        network.check(&a, 42),
        Err(VerifyError::NotFound { id: 42 })
    ));

    let now = Utc::now();
    let expired = {
        let d = draft(network.instance(&a).unwrap(), 1).expires_at(now - Duration::hours(1));
        network.instance_mut(&a).unwrap().create_attestation(d).unwrap()
    };
    assert!(matches!(
        network.check_at(now, &a, expired),
        Err(VerifyError::Expired { .. })
    ));

    let revoked = {
        let d = draft(network.instance(&a).unwrap(), 2);
        network.instance_mut(&a).unwrap().create_attestation(d).unwrap()
    };
    network
        .instance_mut(&a)
        .unwrap()
        .revoke(&Address::from_low_u64(0xa), revoked)
        .unwrap();
    assert!(matches!(
        network.check(&a, revoked),
        Err(VerifyError::Revoked { .. })
    ));

    let good = {
        let d = draft(network.instance(&a).unwrap(), 3);
        network.instance_mut(&a).unwrap().create_attestation(d).unwrap()
    };
    assert!(network.check(&a, good).is_ok());
}

/// A dependency port that denies everything, simulating a failing
/// downstream instance.
struct DenyPort {
    id: Uuid,
}

impl VerifyPort for DenyPort {
    fn port_id(&self) -> Uuid {
        self.id
    }

    fn eval(&self, _id: u64, _cx: &mut VerifyContext<'_>) -> bool {
        false
    }
}

struct StubResolver {
    ports: HashMap<Uuid, Box<dyn VerifyPort>>,
}

impl PortResolver for StubResolver {
    fn resolve(&self, instance: &Uuid) -> Option<&dyn VerifyPort> {
        self.ports.get(instance).map(|p| p.as_ref())
    }
}

#[test]
fn test_injected_port_double() {
    let deny_id = Uuid::new_v4();

    let mut inst = instance("composite");
    let inst_id = inst.instance_id();
    let simple = inst.create_attestation(draft(&inst, 1)).unwrap();
    let composite = {
        let d = draft(&inst, 2).depends_on(DependencyRef::new(deny_id, 1));
        inst.create_attestation(d).unwrap()
    };

    let resolver = StubResolver {
        ports: HashMap::from([
            (inst_id, Box::new(inst) as Box<dyn VerifyPort>),
            (deny_id, Box::new(DenyPort { id: deny_id }) as Box<dyn VerifyPort>),
        ]),
    };

    let now = Utc::now();
    assert!(evaluate(&resolver, &inst_id, simple, now, 8));
    // The denying dependency fails the composite, fail-closed.
    assert!(!evaluate(&resolver, &inst_id, composite, now, 8));
}
