//! Database Connection Pool Module
//!
//! PostgreSQL connection pooling using deadpool-postgres, plus the bug
//! collection operations. Bugs live in a single `bugs` table with two
//! secondary indexes: a composite (status, severity) index for filtered
//! listing and a created_at DESC index for the default sort order.
//!
//! Each operation is a single statement, so per-record atomicity comes
//! from the store.

use crate::error::{ApiError, ApiResult};
use crate::validation::ValidatedBug;
use bugtrack_core::{new_entity_id, Bug, EntityId, Priority, Severity, Status};
use chrono::Utc;
use deadpool_postgres::{Config, ManagerConfig, Pool, PoolConfig, RecyclingMethod, Runtime};
use std::time::Duration;
use tokio_postgres::types::ToSql;
use tokio_postgres::{NoTls, Row};

// ============================================================================
// CONNECTION POOL CONFIGURATION
// ============================================================================

/// Database connection pool configuration.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// PostgreSQL host
    pub host: String,
    /// PostgreSQL port
    pub port: u16,
    /// Database name
    pub dbname: String,
    /// Database user
    pub user: String,
    /// Database password
    pub password: String,
    /// Maximum pool size
    pub max_size: usize,
    /// Connection timeout
    pub timeout: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            dbname: "bugtrack".to_string(),
            user: "postgres".to_string(),
            password: "".to_string(),
            max_size: 16,
            timeout: Duration::from_secs(30),
        }
    }
}

impl DbConfig {
    /// Create a new database configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("BUGTRACK_DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: std::env::var("BUGTRACK_DB_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5432),
            dbname: std::env::var("BUGTRACK_DB_NAME").unwrap_or_else(|_| "bugtrack".to_string()),
            user: std::env::var("BUGTRACK_DB_USER").unwrap_or_else(|_| "postgres".to_string()),
            password: std::env::var("BUGTRACK_DB_PASSWORD").unwrap_or_default(),
            max_size: std::env::var("BUGTRACK_DB_POOL_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(16),
            timeout: Duration::from_secs(
                std::env::var("BUGTRACK_DB_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }

    /// Create a connection pool from this configuration.
    pub fn create_pool(&self) -> ApiResult<Pool> {
        let mut cfg = Config::new();
        cfg.host = Some(self.host.clone());
        cfg.port = Some(self.port);
        cfg.dbname = Some(self.dbname.clone());
        cfg.user = Some(self.user.clone());
        cfg.password = Some(self.password.clone());

        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });

        let mut pool_cfg = PoolConfig::new(self.max_size);
        pool_cfg.timeouts.wait = Some(self.timeout);
        cfg.pool = Some(pool_cfg);

        let pool = cfg
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| ApiError::database_error(format!("Failed to create pool: {}", e)))?;

        Ok(pool)
    }
}

// ============================================================================
// FILTERS
// ============================================================================

/// Equality filters for the list operation.
///
/// Values are raw strings compared against the stored text columns: an
/// unknown value is not an error, it simply matches no rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BugFilter {
    pub status: Option<String>,
    pub severity: Option<String>,
    pub priority: Option<String>,
    pub assigned_to: Option<String>,
}

impl BugFilter {
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.severity.is_none()
            && self.priority.is_none()
            && self.assigned_to.is_none()
    }
}

// ============================================================================
// DATABASE CLIENT WRAPPER
// ============================================================================

const BUG_COLUMNS: &str = "bug_id, title, description, severity, status, priority, \
     assigned_to, reported_by, tags, created_at, updated_at";

const SCHEMA_DDL: &str = "
CREATE TABLE IF NOT EXISTS bugs (
    bug_id      UUID PRIMARY KEY,
    title       TEXT NOT NULL,
    description TEXT NOT NULL,
    severity    TEXT NOT NULL DEFAULT 'Medium',
    status      TEXT NOT NULL DEFAULT 'Open',
    priority    TEXT NOT NULL DEFAULT 'Medium',
    assigned_to TEXT NOT NULL DEFAULT 'Unassigned',
    reported_by TEXT NOT NULL,
    tags        TEXT[] NOT NULL DEFAULT '{}',
    created_at  TIMESTAMPTZ NOT NULL,
    updated_at  TIMESTAMPTZ NOT NULL
);
CREATE INDEX IF NOT EXISTS bugs_status_severity_idx ON bugs (status, severity);
CREATE INDEX IF NOT EXISTS bugs_created_at_idx ON bugs (created_at DESC);
";

/// Database client that wraps a connection pool and provides the bug
/// collection operations.
#[derive(Clone)]
pub struct DbClient {
    pool: Pool,
}

impl DbClient {
    /// Create a new database client with the given pool.
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Create a new database client from configuration.
    pub fn from_config(config: &DbConfig) -> ApiResult<Self> {
        let pool = config.create_pool()?;
        Ok(Self::new(pool))
    }

    /// Get the current pool size for observability.
    pub fn pool_size(&self) -> usize {
        self.pool.status().size
    }

    /// Get a connection from the pool.
    async fn get_conn(&self) -> ApiResult<deadpool_postgres::Object> {
        self.pool.get().await.map_err(ApiError::from)
    }

    /// Apply the schema. Idempotent; run once at startup.
    pub async fn migrate(&self) -> ApiResult<()> {
        let conn = self.get_conn().await?;
        conn.batch_execute(SCHEMA_DDL).await?;
        tracing::info!("Database schema is up to date");
        Ok(())
    }

    /// Verify store connectivity.
    pub async fn health_check(&self) -> ApiResult<()> {
        let conn = self.get_conn().await?;
        conn.query_one("SELECT 1", &[]).await?;
        Ok(())
    }

    // ========================================================================
    // BUG OPERATIONS
    // ========================================================================

    /// Persist a new bug: assigns the identifier and both timestamps.
    pub async fn bug_create(&self, bug: &ValidatedBug) -> ApiResult<Bug> {
        let conn = self.get_conn().await?;

        let bug_id = new_entity_id();
        let now = Utc::now();

        let sql = format!(
            "INSERT INTO bugs ({}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {}",
            BUG_COLUMNS, BUG_COLUMNS
        );

        let row = conn
            .query_one(
                sql.as_str(),
                &[
                    &bug_id,
                    &bug.title,
                    &bug.description,
                    &bug.severity.as_db_str(),
                    &bug.status.as_db_str(),
                    &bug.priority.as_db_str(),
                    &bug.assigned_to,
                    &bug.reported_by,
                    &bug.tags,
                    &now,
                    &now,
                ],
            )
            .await?;

        row_to_bug(&row)
    }

    /// Fetch a bug by identifier.
    pub async fn bug_get(&self, id: EntityId) -> ApiResult<Option<Bug>> {
        let conn = self.get_conn().await?;

        let sql = format!("SELECT {} FROM bugs WHERE bug_id = $1", BUG_COLUMNS);
        let row = conn.query_opt(sql.as_str(), &[&id]).await?;

        row.map(|r| row_to_bug(&r)).transpose()
    }

    /// List one page of bugs matching the filter, newest first.
    pub async fn bug_list(
        &self,
        filter: &BugFilter,
        limit: i64,
        offset: i64,
    ) -> ApiResult<Vec<Bug>> {
        let conn = self.get_conn().await?;

        let (where_sql, mut params) = build_filter(filter);
        let limit_pos = params.len() + 1;
        let offset_pos = params.len() + 2;
        params.push(&limit);
        params.push(&offset);

        let sql = format!(
            "SELECT {} FROM bugs{} ORDER BY created_at DESC LIMIT ${} OFFSET ${}",
            BUG_COLUMNS, where_sql, limit_pos, offset_pos
        );

        let rows = conn.query(sql.as_str(), &params).await?;
        rows.iter().map(row_to_bug).collect()
    }

    /// Count bugs matching the filter, before pagination.
    pub async fn bug_count(&self, filter: &BugFilter) -> ApiResult<i64> {
        let conn = self.get_conn().await?;

        let (where_sql, params) = build_filter(filter);
        let sql = format!("SELECT COUNT(*) FROM bugs{}", where_sql);

        let row = conn.query_one(sql.as_str(), &params).await?;
        Ok(row.get(0))
    }

    /// Replace an existing bug, refreshing updated_at. Returns None when
    /// no bug has the given identifier.
    pub async fn bug_update(&self, id: EntityId, bug: &ValidatedBug) -> ApiResult<Option<Bug>> {
        let conn = self.get_conn().await?;

        let now = Utc::now();

        let sql = format!(
            "UPDATE bugs SET title = $2, description = $3, severity = $4, \
             status = $5, priority = $6, assigned_to = $7, reported_by = $8, \
             tags = $9, updated_at = $10 \
             WHERE bug_id = $1 RETURNING {}",
            BUG_COLUMNS
        );

        let row = conn
            .query_opt(
                sql.as_str(),
                &[
                    &id,
                    &bug.title,
                    &bug.description,
                    &bug.severity.as_db_str(),
                    &bug.status.as_db_str(),
                    &bug.priority.as_db_str(),
                    &bug.assigned_to,
                    &bug.reported_by,
                    &bug.tags,
                    &now,
                ],
            )
            .await?;

        row.map(|r| row_to_bug(&r)).transpose()
    }

    /// Remove a bug. Returns true when a record was deleted.
    pub async fn bug_delete(&self, id: EntityId) -> ApiResult<bool> {
        let conn = self.get_conn().await?;

        let deleted = conn
            .execute("DELETE FROM bugs WHERE bug_id = $1", &[&id])
            .await?;

        Ok(deleted > 0)
    }
}

// ============================================================================
// ROW MAPPING
// ============================================================================

/// Build the WHERE clause and parameter list for a filter.
fn build_filter(filter: &BugFilter) -> (String, Vec<&(dyn ToSql + Sync)>) {
    let mut clauses: Vec<String> = Vec::new();
    let mut params: Vec<&(dyn ToSql + Sync)> = Vec::new();

    if let Some(status) = &filter.status {
        params.push(status);
        clauses.push(format!("status = ${}", params.len()));
    }
    if let Some(severity) = &filter.severity {
        params.push(severity);
        clauses.push(format!("severity = ${}", params.len()));
    }
    if let Some(priority) = &filter.priority {
        params.push(priority);
        clauses.push(format!("priority = ${}", params.len()));
    }
    if let Some(assigned_to) = &filter.assigned_to {
        params.push(assigned_to);
        clauses.push(format!("assigned_to = ${}", params.len()));
    }

    let where_sql = if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    };

    (where_sql, params)
}

/// Map a row to a Bug. A stored enum value outside its fixed set means the
/// table was modified out of band; that surfaces as an internal error.
fn row_to_bug(row: &Row) -> ApiResult<Bug> {
    let severity_str: String = row.try_get("severity")?;
    let status_str: String = row.try_get("status")?;
    let priority_str: String = row.try_get("priority")?;

    let severity = Severity::from_db_str(&severity_str)
        .map_err(|e| ApiError::internal_error(format!("Corrupt bug record: {}", e)))?;
    let status = Status::from_db_str(&status_str)
        .map_err(|e| ApiError::internal_error(format!("Corrupt bug record: {}", e)))?;
    let priority = Priority::from_db_str(&priority_str)
        .map_err(|e| ApiError::internal_error(format!("Corrupt bug record: {}", e)))?;

    Ok(Bug {
        bug_id: row.try_get("bug_id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        severity,
        status,
        priority,
        assigned_to: row.try_get("assigned_to")?,
        reported_by: row.try_get("reported_by")?,
        tags: row.try_get("tags")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_config_defaults() {
        let config = DbConfig::default();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 5432);
        assert_eq!(config.dbname, "bugtrack");
        assert_eq!(config.max_size, 16);
    }

    #[test]
    fn test_empty_filter_has_no_where_clause() {
        let filter = BugFilter::default();
        assert!(filter.is_empty());

        let (sql, params) = build_filter(&filter);
        assert!(sql.is_empty());
        assert!(params.is_empty());
    }

    #[test]
    fn test_single_filter_clause() {
        let filter = BugFilter {
            status: Some("Open".to_string()),
            ..Default::default()
        };

        let (sql, params) = build_filter(&filter);
        assert_eq!(sql, " WHERE status = $1");
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_combined_filter_clauses_number_sequentially() {
        let filter = BugFilter {
            status: Some("Open".to_string()),
            severity: Some("High".to_string()),
            priority: None,
            assigned_to: Some("alice".to_string()),
        };

        let (sql, params) = build_filter(&filter);
        assert_eq!(
            sql,
            " WHERE status = $1 AND severity = $2 AND assigned_to = $3"
        );
        assert_eq!(params.len(), 3);
    }
}
