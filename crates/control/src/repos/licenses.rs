//! License repository
//!
//! Insert, lookup, count, and owner-scoped deletion of license records.

use tokio::sync::Mutex;
use tracing::{debug, info};
use turso::{Database, Value};

use super::{parse_datetime, parse_optional_datetime, text_at};
use crate::error::{ControlError, Result, is_unique_violation};
use crate::models::{LicenseRecord, LicenseStatus, Plan};

const LICENSE_COLUMNS: &str = "id, user_id, key, plan, status, created_at, expires_at";

/// Repository for license key records
pub struct LicenseRepo<'a> {
    db: &'a Database,
    write_gate: &'a Mutex<()>,
}

impl<'a> LicenseRepo<'a> {
    /// Create a new license repository
    pub fn new(db: &'a Database, write_gate: &'a Mutex<()>) -> Self {
        Self { db, write_gate }
    }

    /// Insert a new record
    ///
    /// A duplicate key string is reported as [`ControlError::AlreadyExists`]
    /// and leaves the table untouched.
    pub async fn insert(&self, record: &LicenseRecord) -> Result<()> {
        let _guard = self.write_gate.lock().await;
        let conn = self.db.connect()?;

        let text = |s: &str| Value::Text(s.to_string());
        // No expiry is stored as NULL
        let expires_at = match record.expires_at {
            Some(dt) => Value::Text(dt.to_rfc3339()),
            None => Value::Null,
        };

        let result = conn
            .execute(
                r#"
            INSERT INTO licenses (id, user_id, key, plan, status, created_at, expires_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
                [
                    text(&record.id),
                    text(&record.user_id),
                    text(&record.key),
                    text(record.plan.as_str()),
                    text(record.status.as_str()),
                    Value::Text(record.created_at.to_rfc3339()),
                    expires_at,
                ],
            )
            .await;

        if let Err(e) = result {
            if is_unique_violation(&e) {
                debug!(key = %record.key, "License key collision on insert");
                return Err(ControlError::already_exists("license", &record.key));
            }
            return Err(e.into());
        }

        info!(
            license_id = %record.id,
            user_id = %record.user_id,
            plan = %record.plan,
            "Inserted license"
        );
        Ok(())
    }

    /// Get a record by ID
    pub async fn get_by_id(&self, id: &str) -> Result<Option<LicenseRecord>> {
        self.fetch_one(&format!("SELECT {} FROM licenses WHERE id = ?1", LICENSE_COLUMNS), id)
            .await
    }

    /// Get a record by key string
    pub async fn get_by_key(&self, key: &str) -> Result<Option<LicenseRecord>> {
        self.fetch_one(&format!("SELECT {} FROM licenses WHERE key = ?1", LICENSE_COLUMNS), key)
            .await
    }

    /// Whether any record holds this key string
    pub async fn key_exists(&self, key: &str) -> Result<bool> {
        let conn = self.db.connect()?;

        let mut rows = conn
            .query("SELECT 1 FROM licenses WHERE key = ?1 LIMIT 1", [key])
            .await?;

        Ok(rows.next().await?.is_some())
    }

    /// Count all records owned by a user, regardless of status
    pub async fn count_for_user(&self, user_id: &str) -> Result<u64> {
        let conn = self.db.connect()?;

        let mut rows = conn
            .query(
                "SELECT COUNT(*) as count FROM licenses WHERE user_id = ?1",
                [user_id],
            )
            .await?;

        if let Some(row) = rows.next().await? {
            let count: i64 = row.get(0)?;
            Ok(count as u64)
        } else {
            Ok(0)
        }
    }

    /// List a user's records, newest first
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<LicenseRecord>> {
        let conn = self.db.connect()?;

        let mut rows = conn
            .query(
                &format!(
                    "SELECT {} FROM licenses WHERE user_id = ?1 ORDER BY created_at DESC",
                    LICENSE_COLUMNS
                ),
                [user_id],
            )
            .await?;

        let mut licenses = Vec::new();
        while let Some(row) = rows.next().await? {
            licenses.push(row_to_license(&row)?);
        }

        Ok(licenses)
    }

    /// Total number of records
    pub async fn count_all(&self) -> Result<u64> {
        let conn = self.db.connect()?;

        let mut rows = conn
            .query("SELECT COUNT(*) as count FROM licenses", ())
            .await?;

        if let Some(row) = rows.next().await? {
            let count: i64 = row.get(0)?;
            Ok(count as u64)
        } else {
            Ok(0)
        }
    }

    /// Permanently delete a record owned by `user_id`
    ///
    /// Returns `false` if no such record exists for that owner.
    pub async fn delete_for_owner(&self, id: &str, user_id: &str) -> Result<bool> {
        let _guard = self.write_gate.lock().await;
        let conn = self.db.connect()?;

        let deleted = conn
            .execute(
                "DELETE FROM licenses WHERE id = ?1 AND user_id = ?2",
                [id, user_id],
            )
            .await?;

        if deleted > 0 {
            info!(license_id = %id, user_id = %user_id, "Deleted license");
        }

        Ok(deleted > 0)
    }

    /// Set the status of a record (administrative transition)
    pub async fn set_status(&self, id: &str, status: LicenseStatus) -> Result<()> {
        let _guard = self.write_gate.lock().await;
        let conn = self.db.connect()?;

        let changed = conn
            .execute(
                "UPDATE licenses SET status = ?1 WHERE id = ?2",
                [status.as_str(), id],
            )
            .await?;

        if changed == 0 {
            return Err(ControlError::not_found("license", id));
        }

        Ok(())
    }

    async fn fetch_one(&self, sql: &str, param: &str) -> Result<Option<LicenseRecord>> {
        let conn = self.db.connect()?;

        let mut rows = conn.query(sql, [param]).await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(row_to_license(&row)?))
        } else {
            Ok(None)
        }
    }
}

/// Convert a database row to a LicenseRecord
fn row_to_license(row: &turso::Row) -> Result<LicenseRecord> {
    let id = text_at(row, 0)?;
    let user_id = text_at(row, 1)?;
    let key = text_at(row, 2)?;
    let plan_str = text_at(row, 3)?;
    let plan = Plan::parse(&plan_str)
        .ok_or_else(|| ControlError::invalid("plan", format!("unknown tier '{}'", plan_str)))?;
    let status_str = text_at(row, 4)?;
    let status = LicenseStatus::parse(&status_str).ok_or_else(|| {
        ControlError::invalid("status", format!("unknown status '{}'", status_str))
    })?;
    let created_at = parse_datetime(&text_at(row, 5)?)?;
    let expires_at = parse_optional_datetime(&text_at(row, 6)?)?;

    Ok(LicenseRecord {
        id,
        user_id,
        key,
        plan,
        status,
        created_at,
        expires_at,
    })
}
