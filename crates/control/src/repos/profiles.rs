//! Profile repository
//!
//! Get-or-create and plan management for user profiles.

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info};
use turso::Database;

use super::{parse_datetime, text_at};
use crate::error::{ControlError, Result, is_unique_violation};
use crate::models::{Plan, UserProfile};

const SELECT_PROFILE: &str =
    "SELECT id, email, plan, created_at, updated_at FROM profiles WHERE id = ?1";

/// Repository for user profiles
pub struct ProfileRepo<'a> {
    db: &'a Database,
    write_gate: &'a Mutex<()>,
}

impl<'a> ProfileRepo<'a> {
    /// Create a new profile repository
    pub fn new(db: &'a Database, write_gate: &'a Mutex<()>) -> Self {
        Self { db, write_gate }
    }

    /// Get a profile by user ID
    ///
    /// A stored plan outside the recognized set is an error, never a default.
    pub async fn get(&self, id: &str) -> Result<Option<UserProfile>> {
        let conn = self.db.connect()?;

        let mut rows = conn.query(SELECT_PROFILE, [id]).await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(row_to_profile(&row)?))
        } else {
            Ok(None)
        }
    }

    /// Get the profile for `id`, creating a free-tier profile if none exists
    ///
    /// Idempotent: concurrent callers for the same ID all observe the same
    /// row. A primary-key collision from a concurrent creator is absorbed and
    /// the winner's row is returned.
    pub async fn get_or_create(&self, id: &str, email: &str) -> Result<UserProfile> {
        if let Some(profile) = self.get(id).await? {
            return Ok(profile);
        }

        let _guard = self.write_gate.lock().await;

        // Re-check under the gate
        if let Some(profile) = self.get(id).await? {
            return Ok(profile);
        }

        let profile = UserProfile::new(id, email);
        let created_at = profile.created_at.to_rfc3339();
        let updated_at = profile.updated_at.to_rfc3339();

        let conn = self.db.connect()?;
        let result = conn
            .execute(
                r#"
            INSERT INTO profiles (id, email, plan, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
                [
                    profile.id.as_str(),
                    profile.email.as_str(),
                    profile.plan.as_str(),
                    created_at.as_str(),
                    updated_at.as_str(),
                ],
            )
            .await;

        match result {
            Ok(_) => {
                info!(user_id = %id, plan = %profile.plan, "Created profile");
                Ok(profile)
            }
            Err(e) if is_unique_violation(&e) => {
                debug!(user_id = %id, "Profile created concurrently, reloading");
                self.get(id)
                    .await?
                    .ok_or_else(|| ControlError::not_found("profile", id))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Change a user's plan
    pub async fn set_plan(&self, id: &str, plan: Plan) -> Result<()> {
        let _guard = self.write_gate.lock().await;
        let conn = self.db.connect()?;
        let now = Utc::now().to_rfc3339();

        let changed = conn
            .execute(
                "UPDATE profiles SET plan = ?1, updated_at = ?2 WHERE id = ?3",
                [plan.as_str(), now.as_str(), id],
            )
            .await?;

        if changed == 0 {
            return Err(ControlError::not_found("profile", id));
        }

        info!(user_id = %id, plan = %plan, "Updated plan");
        Ok(())
    }

    /// Overwrite the raw plan column (administrative repair and tests)
    pub async fn set_raw_plan(&self, id: &str, plan: &str) -> Result<()> {
        let _guard = self.write_gate.lock().await;
        let conn = self.db.connect()?;

        conn.execute("UPDATE profiles SET plan = ?1 WHERE id = ?2", [plan, id])
            .await?;

        Ok(())
    }
}

fn row_to_profile(row: &turso::Row) -> Result<UserProfile> {
    let id = text_at(row, 0)?;
    let email = text_at(row, 1)?;
    let plan_str = text_at(row, 2)?;
    let plan = Plan::parse(&plan_str)
        .ok_or_else(|| ControlError::invalid("plan", format!("unknown tier '{}'", plan_str)))?;
    let created_at = parse_datetime(&text_at(row, 3)?)?;
    let updated_at = parse_datetime(&text_at(row, 4)?)?;

    Ok(UserProfile {
        id,
        email,
        plan,
        created_at,
        updated_at,
    })
}
