//! In-memory license store.
//!
//! Mirrors the control database's guarantees (unique keys, all-or-nothing
//! inserts) behind a mutex. Failures can be switched on to exercise error
//! paths.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use keyforge_control::{LicenseRecord, Plan, UserProfile};

use crate::error::StoreError;
use crate::store::LicenseStore;

#[derive(Default)]
struct Tables {
    profiles: HashMap<String, UserProfile>,
    /// Unparseable plan values, keyed by user
    broken_profiles: HashMap<String, String>,
    licenses: Vec<LicenseRecord>,
}

/// Mutex-guarded store with the same contract as the control database
#[derive(Default)]
pub struct MemoryLicenseStore {
    tables: Mutex<Tables>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    count_calls: AtomicUsize,
}

impl MemoryLicenseStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Set a user's plan, creating the profile if needed
    pub fn set_plan(&self, user_id: &str, plan: Plan) {
        let mut tables = self.tables();
        tables.broken_profiles.remove(user_id);
        tables
            .profiles
            .entry(user_id.to_string())
            .or_insert_with(|| UserProfile::new(user_id, ""))
            .plan = plan;
    }

    /// Store a plan value outside the known tiers for `user_id`
    pub fn set_unknown_plan(&self, user_id: &str, raw: &str) {
        let mut tables = self.tables();
        tables.profiles.remove(user_id);
        tables
            .broken_profiles
            .insert(user_id.to_string(), raw.to_string());
    }

    /// Seed an existing record, bypassing quota
    pub fn seed(&self, record: LicenseRecord) {
        self.tables().licenses.push(record);
    }

    /// Make every read fail as if the store were unreachable
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every insert fail with a write error
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of `count_for_user` calls served
    pub fn count_calls(&self) -> usize {
        self.count_calls.load(Ordering::SeqCst)
    }

    /// Snapshot of every stored record
    pub fn records(&self) -> Vec<LicenseRecord> {
        self.tables().licenses.clone()
    }

    fn check_reads(&self) -> Result<(), StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("connection refused".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl LicenseStore for MemoryLicenseStore {
    async fn get_or_create_profile(
        &self,
        user_id: &str,
        email: &str,
    ) -> Result<UserProfile, StoreError> {
        self.check_reads()?;
        let mut tables = self.tables();
        if let Some(raw) = tables.broken_profiles.get(user_id) {
            return Err(StoreError::InvalidProfile(format!("unknown plan '{raw}'")));
        }
        Ok(tables
            .profiles
            .entry(user_id.to_string())
            .or_insert_with(|| UserProfile::new(user_id, email))
            .clone())
    }

    async fn count_for_user(&self, user_id: &str) -> Result<u64, StoreError> {
        self.check_reads()?;
        self.count_calls.fetch_add(1, Ordering::SeqCst);
        let tables = self.tables();
        Ok(tables.licenses.iter().filter(|r| r.user_id == user_id).count() as u64)
    }

    async fn key_exists(&self, key: &str) -> Result<bool, StoreError> {
        self.check_reads()?;
        Ok(self.tables().licenses.iter().any(|r| r.key == key))
    }

    async fn insert(&self, record: &LicenseRecord) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Write("disk I/O error".into()));
        }
        let mut tables = self.tables();
        if tables.licenses.iter().any(|r| r.key == record.key) {
            return Err(StoreError::Conflict);
        }
        tables.licenses.push(record.clone());
        Ok(())
    }
}
