//! Database connection and schema management
//!
//! Uses Turso (async SQLite-compatible) for the control database. A single
//! database holds user profiles and license keys.

use tokio::sync::Mutex;
use tracing::info;
use turso::{Builder, Database};

use crate::error::{ControlError, Result};

/// Control plane database manager
///
/// Owns the control database and a write gate. Turso connections are
/// single-writer, so every mutating statement runs under the gate; reads
/// go straight to a fresh connection.
pub struct ControlPlane {
    /// Control database
    db: Database,
    /// Serializes writers across connections
    write_gate: Mutex<()>,
    /// Data directory for database files (empty = in-memory)
    data_dir: String,
}

impl ControlPlane {
    /// Create a new control plane with file-based storage
    ///
    /// # Arguments
    /// * `data_dir` - Directory for database files (e.g., "data/")
    ///
    /// Creates `{data_dir}/control/data.db`.
    pub async fn new(data_dir: impl Into<String>) -> Result<Self> {
        let data_dir = data_dir.into();

        let control_dir = format!("{}/control", data_dir);
        std::fs::create_dir_all(&control_dir).map_err(|e| {
            ControlError::invalid("data_dir", format!("failed to create directory: {}", e))
        })?;

        let control_path = format!("{}/data.db", control_dir);
        info!(path = %control_path, "Opening control database");

        let db = Builder::new_local(&control_path).build().await?;

        let cp = Self {
            db,
            write_gate: Mutex::new(()),
            data_dir,
        };

        cp.init_schema().await?;

        Ok(cp)
    }

    /// Create a new control plane with in-memory storage (for testing)
    pub async fn new_memory() -> Result<Self> {
        let db = Builder::new_local(":memory:").build().await?;

        let cp = Self {
            db,
            write_gate: Mutex::new(()),
            data_dir: String::new(),
        };

        cp.init_schema().await?;

        Ok(cp)
    }

    /// Get the control database
    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Writer gate shared by all repositories
    pub(crate) fn write_gate(&self) -> &Mutex<()> {
        &self.write_gate
    }

    /// Whether this control plane lives in memory
    pub fn is_memory(&self) -> bool {
        self.data_dir.is_empty()
    }

    /// Cheap liveness probe
    pub async fn ping(&self) -> Result<()> {
        let conn = self.db.connect()?;
        let mut rows = conn.query("SELECT 1", ()).await?;
        rows.next().await?;
        Ok(())
    }

    /// Initialize the control database schema
    async fn init_schema(&self) -> Result<()> {
        let conn = self.db.connect()?;

        conn.execute(SCHEMA_PROFILES, ()).await?;
        conn.execute(SCHEMA_LICENSES, ()).await?;

        conn.execute(INDEX_LICENSES_USER, ()).await?;

        info!("Control database schema initialized");
        Ok(())
    }
}

// =============================================================================
// Schema
// =============================================================================

const SCHEMA_PROFILES: &str = r#"
CREATE TABLE IF NOT EXISTS profiles (
    id TEXT PRIMARY KEY,
    email TEXT NOT NULL DEFAULT '',
    plan TEXT NOT NULL DEFAULT 'free',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
"#;

// `key` carries the UNIQUE constraint that makes issuance race-free.
const SCHEMA_LICENSES: &str = r#"
CREATE TABLE IF NOT EXISTS licenses (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    key TEXT NOT NULL UNIQUE,
    plan TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'active',
    created_at TEXT NOT NULL,
    expires_at TEXT
)
"#;

const INDEX_LICENSES_USER: &str =
    "CREATE INDEX IF NOT EXISTS idx_licenses_user ON licenses(user_id)";
