// ============================================================================
// Menu Infrastructure - PostgreSQL Menu Repository
// File: crates/menu-infrastructure/src/database/postgres/menu_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::{Json, JsonValue};
use sqlx::{Connection, FromRow, PgPool, Postgres, Transaction};
use tracing::{error, info};

use menu_core::domain::{MenuChanges, MenuId, MenuMeta, MenuNode, NewMenu};
use menu_core::error::DomainError;
use menu_core::repositories::{MenuRepository, MenuWriter};

const MENU_COLUMNS: &str = r#"
    id, parent_id, name, path, component, redirect,
    status, sort, remark, meta,
    created_by, updated_by, created_at, updated_at
"#;

pub struct PgMenuRepository {
    pool: PgPool,
}

impl PgMenuRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct MenuRow {
    pub id: i64,
    pub parent_id: i64,
    pub name: String,
    pub path: String,
    pub component: String,
    pub redirect: String,
    pub status: i32,
    pub sort: i32,
    pub remark: String,
    pub meta: Json<JsonValue>,
    pub created_by: i64,
    pub updated_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<MenuRow> for MenuNode {
    fn from(row: MenuRow) -> Self {
        MenuNode {
            id: row.id,
            parent_id: row.parent_id,
            name: row.name,
            path: row.path,
            component: row.component,
            redirect: row.redirect,
            status: row.status,
            sort: row.sort,
            remark: row.remark,
            meta: meta_from_json(row.meta.0),
            created_by: row.created_by,
            updated_by: row.updated_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
            children: Vec::new(),
        }
    }
}

// Rows written by older tools may hold `[]` or other non-object meta.
fn meta_from_json(value: JsonValue) -> MenuMeta {
    match value {
        JsonValue::Object(meta) => meta,
        _ => MenuMeta::new(),
    }
}

/// Connection-level failures break the enclosing transaction; everything
/// else is local to the statement that raised it.
fn classify(e: sqlx::Error) -> DomainError {
    match e {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Protocol(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => DomainError::TransactionError(e.to_string()),
        other => DomainError::DatabaseError(other.to_string()),
    }
}

#[async_trait]
impl MenuRepository for PgMenuRepository {
    type Tx = PgMenuTransaction;

    async fn all_tree(&self) -> Result<Vec<MenuNode>, DomainError> {
        let rows: Vec<MenuRow> = sqlx::query_as(&format!(
            "SELECT {} FROM menu ORDER BY sort ASC, id ASC",
            MENU_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error loading menu tree: {}", e);
            classify(e)
        })?;

        Ok(MenuNode::build_forest(rows.into_iter().map(MenuNode::from).collect()))
    }

    async fn begin(&self) -> Result<PgMenuTransaction, DomainError> {
        let tx = self.pool.begin().await.map_err(|e| {
            error!("Failed to begin menu transaction: {}", e);
            DomainError::TransactionError(e.to_string())
        })?;
        Ok(PgMenuTransaction { tx })
    }

    async fn commit(&self, tx: PgMenuTransaction) -> Result<(), DomainError> {
        tx.tx.commit().await.map_err(|e| {
            error!("Failed to commit menu transaction: {}", e);
            DomainError::TransactionError(e.to_string())
        })
    }

    async fn rollback(&self, tx: PgMenuTransaction) -> Result<(), DomainError> {
        tx.tx.rollback().await.map_err(|e| DomainError::TransactionError(e.to_string()))
    }
}

/// Import transaction.
///
/// Every statement runs inside its own SAVEPOINT. PostgreSQL refuses all
/// further statements in a transaction once one has failed, so a failing
/// menu is rolled back to its savepoint and the import carries on.
pub struct PgMenuTransaction {
    tx: Transaction<'static, Postgres>,
}

impl PgMenuTransaction {
    async fn savepoint(&mut self) -> Result<Transaction<'_, Postgres>, DomainError> {
        Connection::begin(&mut *self.tx).await.map_err(|e| {
            error!("Failed to open savepoint: {}", e);
            DomainError::TransactionError(e.to_string())
        })
    }

    async fn settle<T>(
        savepoint: Transaction<'_, Postgres>,
        outcome: Result<T, DomainError>,
    ) -> Result<T, DomainError> {
        match outcome {
            Ok(value) => {
                savepoint
                    .commit()
                    .await
                    .map_err(|e| DomainError::TransactionError(e.to_string()))?;
                Ok(value)
            }
            Err(e) => {
                savepoint
                    .rollback()
                    .await
                    .map_err(|rb| DomainError::TransactionError(rb.to_string()))?;
                Err(e)
            }
        }
    }
}

#[async_trait]
impl MenuWriter for PgMenuTransaction {
    async fn find_by_name_and_parent(
        &mut self,
        name: &str,
        parent_id: MenuId,
    ) -> Result<Option<MenuNode>, DomainError> {
        let mut savepoint = self.savepoint().await?;
        let outcome: Result<Option<MenuRow>, DomainError> = sqlx::query_as(&format!(
            "SELECT {} FROM menu WHERE name = $1 AND parent_id = $2 LIMIT 1",
            MENU_COLUMNS
        ))
        .bind(name)
        .bind(parent_id)
        .fetch_optional(&mut *savepoint)
        .await
        .map_err(classify);

        let row = Self::settle(savepoint, outcome).await?;
        Ok(row.map(|r| r.into()))
    }

    async fn create(&mut self, menu: &NewMenu) -> Result<MenuNode, DomainError> {
        let mut savepoint = self.savepoint().await?;
        let outcome: Result<MenuRow, DomainError> = sqlx::query_as(&format!(
            r#"
            INSERT INTO menu (
                parent_id, name, path, component, redirect,
                status, sort, remark, meta, created_by, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, NOW())
            RETURNING {}
            "#,
            MENU_COLUMNS
        ))
        .bind(menu.parent_id)
        .bind(&menu.name)
        .bind(&menu.path)
        .bind(&menu.component)
        .bind(&menu.redirect)
        .bind(menu.status)
        .bind(menu.sort)
        .bind(&menu.remark)
        .bind(Json(&menu.meta))
        .bind(menu.created_by)
        .fetch_one(&mut *savepoint)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error creating menu '{}': {}", menu.name, e);
            match e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    DomainError::MenuNameAlreadyExists {
                        parent_id: menu.parent_id,
                        name: menu.name.clone(),
                    }
                }
                other => classify(other),
            }
        });

        let row = Self::settle(savepoint, outcome).await?;
        info!("Menu created: {} ({})", row.name, row.id);
        Ok(row.into())
    }

    async fn update_by_id(&mut self, id: MenuId, changes: &MenuChanges) -> Result<(), DomainError> {
        let mut savepoint = self.savepoint().await?;
        let outcome = sqlx::query(
            r#"
            UPDATE menu
            SET
                path = $2,
                component = $3,
                redirect = $4,
                status = $5,
                sort = $6,
                remark = $7,
                meta = $8,
                updated_by = $9,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&changes.path)
        .bind(&changes.component)
        .bind(&changes.redirect)
        .bind(changes.status)
        .bind(changes.sort)
        .bind(&changes.remark)
        .bind(Json(&changes.meta))
        .bind(changes.updated_by)
        .execute(&mut *savepoint)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error updating menu {}: {}", id, e);
            classify(e)
        })
        .and_then(|done| {
            if done.rows_affected() == 0 {
                Err(DomainError::MenuNotFound(id))
            } else {
                Ok(())
            }
        });

        Self::settle(savepoint, outcome).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_failures_are_transactional() {
        assert!(classify(sqlx::Error::PoolTimedOut).is_transaction_failure());
        assert!(classify(sqlx::Error::WorkerCrashed).is_transaction_failure());
        assert!(!classify(sqlx::Error::RowNotFound).is_transaction_failure());
        assert!(matches!(classify(sqlx::Error::ColumnNotFound("meta".into())), DomainError::DatabaseError(_)));
    }

    #[test]
    fn test_row_conversion_starts_without_children() {
        let mut meta = MenuMeta::new();
        meta.insert("icon".into(), serde_json::json!("ri:home-line"));
        let node: MenuNode = MenuRow {
            id: 3,
            parent_id: 1,
            name: "Users".into(),
            path: "/system/users".into(),
            component: "system/users/index".into(),
            redirect: String::new(),
            status: 1,
            sort: 2,
            remark: String::new(),
            meta: Json(JsonValue::Object(meta)),
            created_by: 9,
            updated_by: None,
            created_at: Utc::now(),
            updated_at: None,
        }
        .into();

        assert_eq!(node.parent_id, 1);
        assert_eq!(node.meta["icon"], "ri:home-line");
        assert!(node.children.is_empty());
    }

    #[test]
    fn test_non_object_meta_reads_as_empty() {
        assert!(meta_from_json(serde_json::json!([])).is_empty());
        assert!(meta_from_json(JsonValue::Null).is_empty());
        assert!(meta_from_json(serde_json::json!("icon")).is_empty());
        assert_eq!(meta_from_json(serde_json::json!({"hidden": true}))["hidden"], true);
    }
}
