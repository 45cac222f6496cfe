//! SurrealDB implementation of [`PermissionStore`].

use std::collections::HashSet;
use std::time::Duration;

use chrono::{DateTime, Utc};
use permreg_core::context::CallContext;
use permreg_core::error::{StoreError, StoreResult};
use permreg_core::models::permission::{Permission, PermissionKey};
use permreg_core::repository::{PageRequest, PermissionStore};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, is_transaction_conflict};

/// One statement, so one transaction: either every new row lands or none.
const INSERT_IGNORING_EXISTING: &str = "INSERT IGNORE INTO permission $rows";

/// Upper bound on re-issuing a batch that lost a write conflict. Each
/// round lets at least one competing writer commit.
const MAX_CONFLICT_ATTEMPTS: u32 = 64;
const CONFLICT_BACKOFF_CAP: Duration = Duration::from_millis(50);

const SELECT_COLUMNS: &str = "\
SELECT meta::id(id) AS record_id, service, action, created_at, updated_at \
FROM permission";

const ORDERING: &str = "ORDER BY created_at DESC, service ASC, action ASC";

#[derive(Debug, Clone, SurrealValue)]
struct PermissionInsertRow {
    id: String,
    service: String,
    action: String,
}

#[derive(Debug, SurrealValue)]
struct PermissionRowWithId {
    record_id: String,
    service: String,
    action: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PermissionRowWithId {
    fn try_into_permission(self) -> Result<Permission, StoreError> {
        let id = Uuid::parse_str(&self.record_id).map_err(|e| {
            StoreError::Corrupt(format!("invalid UUID '{}': {e}", self.record_id))
        })?;
        Ok(Permission {
            id,
            service: self.service,
            action: self.action,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

fn backend(operation: &'static str) -> impl FnOnce(surrealdb::Error) -> StoreError {
    move |e| StoreError::backend(operation, DbError::from(e))
}

/// Collapse repeated pairs, keeping the first occurrence and input order.
fn insert_rows(pairs: &[PermissionKey]) -> Vec<PermissionInsertRow> {
    let mut seen = HashSet::with_capacity(pairs.len());
    pairs
        .iter()
        .filter(|key| seen.insert(*key))
        .map(|key| PermissionInsertRow {
            id: key.record_id().to_string(),
            service: key.service.clone(),
            action: key.action.clone(),
        })
        .collect()
}

fn conflict_backoff(attempt: u32) -> Duration {
    Duration::from_millis(1u64 << attempt.min(6)).min(CONFLICT_BACKOFF_CAP)
}

/// SurrealDB implementation of the permission store.
#[derive(Clone)]
pub struct SurrealPermissionStore<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealPermissionStore<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn insert_once(&self, rows: &[PermissionInsertRow]) -> Result<(), surrealdb::Error> {
        self.db
            .query(INSERT_IGNORING_EXISTING)
            .bind(("rows", rows.to_vec()))
            .await?
            .check()?;
        Ok(())
    }

    /// Insert `rows`, re-issuing the statement while it loses write
    /// conflicts to concurrent batches over the same record ids. Rows a
    /// competing batch committed first are then ignored, so the outcome is
    /// the same as if the batches had run one after another.
    async fn insert_resolving_conflicts(&self, rows: &[PermissionInsertRow]) -> StoreResult<()> {
        let mut attempt = 1;
        loop {
            match self.insert_once(rows).await {
                Ok(()) => return Ok(()),
                Err(e) if attempt < MAX_CONFLICT_ATTEMPTS && is_transaction_conflict(&e) => {
                    debug!(attempt, error = %e, "Permission batch hit a write conflict");
                    tokio::time::sleep(conflict_backoff(attempt)).await;
                    attempt += 1;
                }
                Err(e) => return Err(backend("insert_many")(e)),
            }
        }
    }

    async fn list_where(
        &self,
        operation: &'static str,
        filter: Option<&str>,
        page: PageRequest,
    ) -> StoreResult<(Vec<Permission>, u64)> {
        let condition = if filter.is_some() {
            " WHERE service = $service"
        } else {
            ""
        };
        let count_sql = format!("SELECT count() AS total FROM permission{condition} GROUP ALL");
        let page_sql =
            format!("{SELECT_COLUMNS}{condition} {ORDERING} LIMIT $limit START $offset");

        let mut builder = self
            .db
            .query(count_sql)
            .query(page_sql)
            .bind(("limit", u64::from(page.limit())))
            .bind(("offset", page.offset()));
        if let Some(service) = filter {
            builder = builder.bind(("service", service.to_string()));
        }

        let mut result = builder.await.map_err(backend(operation))?;
        let count_rows: Vec<CountRow> = result.take(0).map_err(backend(operation))?;
        let rows: Vec<PermissionRowWithId> = result.take(1).map_err(backend(operation))?;

        let total = count_rows.first().map(|r| r.total).unwrap_or(0);
        let items = rows
            .into_iter()
            .map(PermissionRowWithId::try_into_permission)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((items, total))
    }

    async fn count_where(
        &self,
        operation: &'static str,
        service: Option<&str>,
        action: Option<&str>,
    ) -> StoreResult<u64> {
        let mut conditions = Vec::new();
        if service.is_some() {
            conditions.push("service = $service");
        }
        if action.is_some() {
            conditions.push("action = $action");
        }
        let query = if conditions.is_empty() {
            "SELECT count() AS total FROM permission GROUP ALL".to_string()
        } else {
            format!(
                "SELECT count() AS total FROM permission WHERE {} GROUP ALL",
                conditions.join(" AND ")
            )
        };

        let mut builder = self.db.query(query);
        if let Some(service) = service {
            builder = builder.bind(("service", service.to_string()));
        }
        if let Some(action) = action {
            builder = builder.bind(("action", action.to_string()));
        }

        let mut result = builder.await.map_err(backend(operation))?;
        let rows: Vec<CountRow> = result.take(0).map_err(backend(operation))?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }
}

impl<C: Connection> PermissionStore for SurrealPermissionStore<C> {
    async fn insert_many(&self, ctx: &CallContext, pairs: &[PermissionKey]) -> StoreResult<()> {
        let rows = insert_rows(pairs);
        if rows.is_empty() {
            return Ok(());
        }
        let submitted = rows.len();

        ctx.run(self.insert_resolving_conflicts(&rows)).await?;

        debug!(submitted, "Permission batch stored");
        Ok(())
    }

    async fn exists_by_service_and_action(
        &self,
        ctx: &CallContext,
        service: &str,
        action: &str,
    ) -> StoreResult<bool> {
        ctx.run(async {
            let total = self
                .count_where("exists_by_service_and_action", Some(service), Some(action))
                .await?;
            Ok(total > 0)
        })
        .await
    }

    async fn list_by_service(
        &self,
        ctx: &CallContext,
        service: &str,
        page: PageRequest,
    ) -> StoreResult<(Vec<Permission>, u64)> {
        ctx.run(self.list_where("list_by_service", Some(service), page))
            .await
    }

    async fn list_all(
        &self,
        ctx: &CallContext,
        page: PageRequest,
    ) -> StoreResult<(Vec<Permission>, u64)> {
        ctx.run(self.list_where("list_all", None, page)).await
    }

    async fn count_by_service(&self, ctx: &CallContext, service: &str) -> StoreResult<u64> {
        ctx.run(self.count_where("count_by_service", Some(service), None))
            .await
    }

    async fn count_all(&self, ctx: &CallContext) -> StoreResult<u64> {
        ctx.run(self.count_where("count_all", None, None)).await
    }
}
