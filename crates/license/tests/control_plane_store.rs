//! Issuance against the real Turso-backed store

use std::sync::Arc;

use chrono::Utc;
use keyforge_control::ControlPlane;
use keyforge_license::{
    ControlPlaneLicenseStore, IssuanceService, IssueError, KeyGenerator, LicenseRecord,
    LicenseStore, Plan, QuotaPolicy, StoreError, expiry_for,
};

struct FixedKey(&'static str);

impl KeyGenerator for FixedKey {
    fn generate(&self, _plan: Plan, _issued_at: chrono::DateTime<Utc>) -> String {
        self.0.to_string()
    }
}

async fn setup() -> (Arc<ControlPlane>, Arc<ControlPlaneLicenseStore>) {
    let control = Arc::new(ControlPlane::new_memory().await.unwrap());
    let store = Arc::new(ControlPlaneLicenseStore::new(Arc::clone(&control)));
    (control, store)
}

fn record(user_id: &str, key: &str) -> LicenseRecord {
    let now = Utc::now();
    LicenseRecord::new(user_id, key, Plan::Pro, now, expiry_for(now)).unwrap()
}

#[tokio::test]
async fn test_issue_persists_record() {
    let (control, store) = setup().await;
    let svc = IssuanceService::new(store, QuotaPolicy::default());

    let issued = svc.issue("user-1", "a@example.com", Plan::Free).await.unwrap();

    let stored = control.licenses().get_by_key(&issued.key).await.unwrap().unwrap();
    assert_eq!(stored, issued);

    let profile = control.profiles().get("user-1").await.unwrap().unwrap();
    assert_eq!(profile.plan, Plan::Free);
    assert_eq!(profile.email, "a@example.com");
}

#[tokio::test]
async fn test_pro_user_hundredth_key() {
    let (control, store) = setup().await;
    control.profiles().get_or_create("user-1", "").await.unwrap();
    control.profiles().set_plan("user-1", Plan::Pro).await.unwrap();
    for i in 0..99 {
        control
            .licenses()
            .insert(&record("user-1", &format!("SEED-{i}")))
            .await
            .unwrap();
    }

    let svc = IssuanceService::new(store, QuotaPolicy::default());
    svc.issue("user-1", "", Plan::Pro).await.unwrap();

    let result = svc.issue("user-1", "", Plan::Pro).await;
    assert!(matches!(result, Err(IssueError::QuotaExceeded { limit: 100 })));
    assert_eq!(control.licenses().count_for_user("user-1").await.unwrap(), 100);
}

#[tokio::test]
async fn test_unique_violation_maps_to_conflict() {
    let (_control, store) = setup().await;
    store.insert(&record("user-1", "DUP")).await.unwrap();

    let result = store.insert(&record("user-2", "DUP")).await;
    assert!(matches!(result, Err(StoreError::Conflict)));
    assert_eq!(store.count_for_user("user-2").await.unwrap(), 0);
}

#[tokio::test]
async fn test_exhaustion_against_unique_constraint() {
    let (control, store) = setup().await;
    control.licenses().insert(&record("other", "TAKEN")).await.unwrap();

    let svc = IssuanceService::new(store, QuotaPolicy::default())
        .with_precheck(false)
        .with_generator(Arc::new(FixedKey("TAKEN")));

    let result = svc.issue("user-1", "", Plan::Free).await;
    assert!(matches!(result, Err(IssueError::KeyGenerationExhausted { attempts: 5 })));
    assert_eq!(control.licenses().count_for_user("user-1").await.unwrap(), 0);
}

#[tokio::test]
async fn test_unknown_stored_plan_is_profile_not_found() {
    let (control, store) = setup().await;
    control.profiles().get_or_create("user-1", "").await.unwrap();
    control.profiles().set_raw_plan("user-1", "enterprise").await.unwrap();

    let svc = IssuanceService::new(store, QuotaPolicy::default());
    let result = svc.issue("user-1", "", Plan::Free).await;
    assert!(matches!(result, Err(IssueError::ProfileNotFound)));
}
