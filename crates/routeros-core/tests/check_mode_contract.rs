//! Contract Test: Check Mode
//!
//! Constraints verified:
//! - Check mode reports the decision but sends no PUT/DELETE
//! - A later real run against the untouched device reaches the same decision

mod common;

use common::*;
use routeros_core::traits::Method;
use routeros_core::{DnsStaticEntry, Reconciler, TargetState};
use serde_json::json;

fn seeded() -> FakeRouter {
    FakeRouter::new().with_record(json!({
        ".id": "*3",
        "name": "test.localdomain",
        "address": "10.10.10.9",
        "ttl": "1d",
        "disabled": "false",
    }))
}

#[tokio::test]
async fn check_mode_create_does_not_write() {
    let router = FakeRouter::new();
    let desired = DnsStaticEntry::new("new.lan").with_ip("10.0.0.1");

    let preview = Reconciler::new(&router)
        .with_check_mode(true)
        .reconcile(&desired)
        .await
        .unwrap();

    assert!(preview.changed);
    assert_eq!(preview.message(), "DNS entry with name 'new.lan' will be created");
    assert!(preview.attributes().is_none());
    assert!(router.writes().is_empty());
    assert!(router.records().is_empty());
}

#[tokio::test]
async fn check_mode_update_matches_real_run() {
    let router = seeded();
    let desired = DnsStaticEntry::new("test.localdomain").with_ip("10.10.10.10");

    let preview = Reconciler::new(&router)
        .with_check_mode(true)
        .reconcile(&desired)
        .await
        .unwrap();
    assert!(router.writes().is_empty());
    assert_eq!(router.records()[0].get("address"), Some(&json!("10.10.10.9")));

    let real = Reconciler::new(&router).reconcile(&desired).await.unwrap();

    assert_eq!(preview.changed, real.changed);
    assert_eq!(preview.message(), real.message());
    assert_eq!(router.writes().len(), 1);
    assert_eq!(router.writes()[0].method, Method::Put);
}

#[tokio::test]
async fn check_mode_delete_does_not_write() {
    let router = seeded();
    let desired = DnsStaticEntry::new("test.localdomain").with_state(TargetState::Absent);

    let reconciler = Reconciler::new(&router).with_check_mode(true);
    assert!(reconciler.check_mode());

    let preview = reconciler.reconcile(&desired).await.unwrap();

    assert!(preview.changed);
    assert_eq!(
        preview.message(),
        "DNS entry with name 'test.localdomain' will be removed"
    );
    assert_eq!(router.records().len(), 1);
    assert!(router.writes().is_empty());
}

#[tokio::test]
async fn check_mode_still_reports_up_to_date_attributes() {
    let router = seeded();
    let desired = DnsStaticEntry::new("test.localdomain").with_ip("10.10.10.9");

    let outcome = Reconciler::new(&router)
        .with_check_mode(true)
        .reconcile(&desired)
        .await
        .unwrap();

    assert!(!outcome.changed);
    assert_eq!(outcome.attributes().unwrap().id, "*3");
}
