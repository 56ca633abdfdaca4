//! Integration tests for tensa-types.

use tensa_types::{ConstraintId, Degeneracy, ForceId, TensaError};

// ─── ID Tests ──────────────────────────────────────────────────

#[test]
fn handle_ids_index() {
    assert_eq!(ConstraintId(7).index(), 7);
    assert_eq!(ForceId(3).index(), 3);
}

#[test]
fn ids_are_serializable() {
    let id = ConstraintId(100);
    let json = serde_json::to_string(&id).unwrap();
    let deserialized: ConstraintId = serde_json::from_str(&json).unwrap();
    assert_eq!(id, deserialized);
}

// ─── Error Tests ──────────────────────────────────────────────

#[test]
fn invalid_index_display() {
    let err = TensaError::InvalidIndex { index: 12, count: 4 };
    let msg = err.to_string();
    assert!(msg.contains("12"));
    assert!(msg.contains("4"));
}

#[test]
fn under_constrained_display() {
    let err = TensaError::UnderConstrained { vertex: 5 };
    assert!(err.to_string().contains("vertex 5"));
}

#[test]
fn stale_system_display() {
    let err = TensaError::StaleSystem("weights changed");
    assert!(err.to_string().contains("weights changed"));
}

#[test]
fn io_error_converts() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.obj");
    let err: TensaError = io.into();
    assert!(matches!(err, TensaError::Io(_)));
}

#[test]
fn degeneracy_display() {
    assert_eq!(Degeneracy::ZeroLengthEdge.to_string(), "edge has zero length");
    assert!(Degeneracy::CollinearPoints.to_string().contains("collinear"));
}
