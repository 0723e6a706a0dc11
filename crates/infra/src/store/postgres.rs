//! Postgres-backed store.
//!
//! ## Error Mapping
//!
//! | SQLx error | SQLSTATE | StoreError |
//! |------------|----------|------------|
//! | Database (check violation) | `23514` | `Validation` |
//! | Database (not-null violation) | `23502` | `Validation` |
//! | Database (other) | any | `Database` |
//! | PoolClosed / PoolTimedOut / Io | n/a | `Unavailable` |
//! | Other | n/a | `Database` |
//!
//! Owners are expanded with a `LEFT JOIN` on `users`; a dangling `user_ref`
//! yields a `NULL` owner rather than dropping the row.

use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use escola_core::{
    NewProfessor, PopulatedProfessor, Professor, ProfessorId, ProfessorPatch, User, UserId,
};

use super::r#trait::{ProfessorStore, StoreError, UserDirectory};
use crate::config::DatabaseConfig;

const SCHEMA: &str = include_str!("../../migrations/0001_init.sql");

const POPULATED_SELECT: &str = r#"
    SELECT
        p.id,
        p.name,
        p.subject,
        p.user_ref,
        u.id    AS owner_id,
        u.name  AS owner_name,
        u.email AS owner_email
    FROM professores p
    LEFT JOIN users u ON u.id = p.user_ref
"#;

/// Professor + user tables over one connection pool.
///
/// Cloning shares the pool.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool from config and make sure the schema exists.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;

        let store = Self::new(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Idempotent schema bootstrap.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }
}

#[async_trait]
impl ProfessorStore for PostgresStore {
    #[instrument(skip(self), err)]
    async fn list_all(&self) -> Result<Vec<PopulatedProfessor>, StoreError> {
        let sql = format!("{POPULATED_SELECT} ORDER BY p.id ASC");
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_all", e))?;

        rows.iter()
            .map(|r| populated_from_row(r).map_err(|e| map_sqlx_error("list_all", e)))
            .collect()
    }

    #[instrument(skip(self), fields(id = %id), err)]
    async fn get_by_id(&self, id: ProfessorId) -> Result<Option<PopulatedProfessor>, StoreError> {
        let sql = format!("{POPULATED_SELECT} WHERE p.id = $1");
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_by_id", e))?;

        row.as_ref()
            .map(populated_from_row)
            .transpose()
            .map_err(|e| map_sqlx_error("get_by_id", e))
    }

    #[instrument(skip(self, new), err)]
    async fn create(&self, new: NewProfessor) -> Result<Professor, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO professores (id, name, subject, user_ref)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, subject, user_ref
            "#,
        )
        .bind(ProfessorId::new().as_uuid())
        .bind(new.name())
        .bind(new.subject())
        .bind(new.user_ref().as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("create", e))?;

        professor_from_row(&row).map_err(|e| map_sqlx_error("create", e))
    }

    #[instrument(skip(self, patch), fields(id = %id), err)]
    async fn update_by_id(
        &self,
        id: ProfessorId,
        patch: ProfessorPatch,
    ) -> Result<Option<Professor>, StoreError> {
        let row = sqlx::query(
            r#"
            UPDATE professores SET
                name     = COALESCE($2, name),
                subject  = COALESCE($3, subject),
                user_ref = COALESCE($4, user_ref)
            WHERE id = $1
            RETURNING id, name, subject, user_ref
            "#,
        )
        .bind(id.as_uuid())
        .bind(patch.name())
        .bind(patch.subject())
        .bind(patch.user_ref().map(Uuid::from))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_by_id", e))?;

        row.as_ref()
            .map(professor_from_row)
            .transpose()
            .map_err(|e| map_sqlx_error("update_by_id", e))
    }

    #[instrument(skip(self), fields(id = %id), err)]
    async fn delete_by_id(&self, id: ProfessorId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM professores WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_by_id", e))?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), fields(user_id = %user_id), err)]
    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Professor>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, subject, user_ref
            FROM professores
            WHERE user_ref = $1
            ORDER BY id ASC
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_by_user", e))?;

        rows.iter()
            .map(|r| professor_from_row(r).map_err(|e| map_sqlx_error("find_by_user", e)))
            .collect()
    }
}

#[async_trait]
impl UserDirectory for PostgresStore {
    #[instrument(skip(self), fields(id = %id), err)]
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let row = sqlx::query("SELECT id, name, email FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_user", e))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let user = User {
            id: UserId::from_uuid(row.try_get("id").map_err(|e| map_sqlx_error("find_user", e))?),
            name: row.try_get("name").map_err(|e| map_sqlx_error("find_user", e))?,
            email: row.try_get("email").map_err(|e| map_sqlx_error("find_user", e))?,
        };
        Ok(Some(user))
    }
}

fn professor_from_row(row: &PgRow) -> Result<Professor, sqlx::Error> {
    Ok(Professor {
        id: ProfessorId::from_uuid(row.try_get("id")?),
        name: row.try_get("name")?,
        subject: row.try_get("subject")?,
        user_ref: UserId::from_uuid(row.try_get("user_ref")?),
    })
}

fn populated_from_row(row: &PgRow) -> Result<PopulatedProfessor, sqlx::Error> {
    let owner_id: Option<Uuid> = row.try_get("owner_id")?;
    let owner = match owner_id {
        Some(id) => Some(User {
            id: UserId::from_uuid(id),
            name: row.try_get("owner_name")?,
            email: row.try_get("owner_email")?,
        }),
        None => None,
    };
    Ok(professor_from_row(row)?.populate(owner))
}

fn map_sqlx_error(operation: &'static str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let message = db_err.message().to_string();
            match db_err.code().as_deref() {
                Some("23514") | Some("23502") => StoreError::Validation(message),
                _ => StoreError::Database { operation, message },
            }
        }
        sqlx::Error::PoolClosed => {
            StoreError::Unavailable(format!("connection pool closed in {operation}"))
        }
        sqlx::Error::PoolTimedOut => {
            StoreError::Unavailable(format!("connection pool timed out in {operation}"))
        }
        sqlx::Error::Io(e) => StoreError::Unavailable(format!("i/o error in {operation}: {e}")),
        other => StoreError::Database {
            operation,
            message: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_errors_map_to_unavailable() {
        let err = map_sqlx_error("list_all", sqlx::Error::PoolTimedOut);
        assert!(matches!(err, StoreError::Unavailable(msg) if msg.contains("list_all")));
    }

    #[test]
    fn decode_errors_map_to_database() {
        let err = map_sqlx_error("get_by_id", sqlx::Error::RowNotFound);
        match err {
            StoreError::Database { operation, .. } => assert_eq!(operation, "get_by_id"),
            other => panic!("expected Database, got {other:?}"),
        }
    }

    #[test]
    fn schema_keeps_user_ref_unconstrained() {
        assert!(SCHEMA.contains("CREATE TABLE IF NOT EXISTS professores"));
        assert!(!SCHEMA.contains("REFERENCES"));
        assert!(!SCHEMA.contains("created_at"));
    }

    // The tests below need a live database:
    // DATABASE_URL=postgres://... cargo test -p escola-infra -- --ignored

    async fn live_store() -> Option<PostgresStore> {
        let url = std::env::var("DATABASE_URL").ok()?;
        escola_observability::tracing::init_for_tests();
        let config = DatabaseConfig {
            url,
            max_connections: 2,
        };
        Some(PostgresStore::connect(&config).await.expect("connect"))
    }

    async fn insert_user(store: &PostgresStore, name: &str) -> User {
        let user = User {
            id: UserId::new(),
            name: name.to_string(),
            email: format!("{}-{}@example.com", name.to_lowercase(), UserId::new()),
        };
        sqlx::query("INSERT INTO users (id, name, email) VALUES ($1, $2, $3)")
            .bind(user.id.as_uuid())
            .bind(&user.name)
            .bind(&user.email)
            .execute(&store.pool)
            .await
            .expect("insert user");
        user
    }

    fn new_professor(name: &str, subject: &str, owner: UserId) -> NewProfessor {
        NewProfessor::new(name, subject, owner).unwrap()
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn schema_bootstrap_is_idempotent() {
        let Some(store) = live_store().await else { return };
        store.ensure_schema().await.unwrap();
        store.ensure_schema().await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn get_expands_owner_and_nulls_dangling_reference() {
        let Some(store) = live_store().await else { return };
        let owner = insert_user(&store, "Ana").await;

        let owned = store
            .create(new_professor("Ana", "Math", owner.id))
            .await
            .unwrap();
        let dangling = store
            .create(new_professor("Caio", "Music", UserId::new()))
            .await
            .unwrap();

        let fetched = store.get_by_id(owned.id).await.unwrap().unwrap();
        assert_eq!(fetched.user_ref, Some(owner));
        assert_eq!(fetched.subject, "Math");

        let fetched = store.get_by_id(dangling.id).await.unwrap().unwrap();
        assert!(fetched.user_ref.is_none());

        assert!(store.get_by_id(ProfessorId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn list_all_is_in_creation_order() {
        let Some(store) = live_store().await else { return };
        let owner = UserId::new();

        let mut created = Vec::new();
        for subject in ["History", "Art", "Music"] {
            created.push(store.create(new_professor("Bia", subject, owner)).await.unwrap().id);
        }

        // Other tests share the table; keep only our rows.
        let listed: Vec<ProfessorId> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .filter(|id| created.contains(id))
            .collect();
        assert_eq!(listed, created);
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn partial_update_keeps_unsupplied_columns() {
        let Some(store) = live_store().await else { return };
        let owner = UserId::new();
        let created = store
            .create(new_professor("Ana", "Math", owner))
            .await
            .unwrap();

        let patch = ProfessorPatch::new(None, Some("Physics".to_string()), None).unwrap();
        let updated = store
            .update_by_id(created.id, patch.clone())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Ana");
        assert_eq!(updated.subject, "Physics");
        assert_eq!(updated.user_ref, owner);

        let missing = store.update_by_id(ProfessorId::new(), patch).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn delete_reports_whether_a_row_was_removed() {
        let Some(store) = live_store().await else { return };
        let created = store
            .create(new_professor("Ana", "Math", UserId::new()))
            .await
            .unwrap();

        assert!(store.delete_by_id(created.id).await.unwrap());
        assert!(!store.delete_by_id(created.id).await.unwrap());
        assert!(store.get_by_id(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn find_by_user_returns_only_owned_rows() {
        let Some(store) = live_store().await else { return };
        let owner = insert_user(&store, "Dora").await;
        let mine = store
            .create(new_professor("Dora", "Math", owner.id))
            .await
            .unwrap();
        store
            .create(new_professor("Eva", "Art", UserId::new()))
            .await
            .unwrap();

        let found = store.find_by_user(owner.id).await.unwrap();
        assert_eq!(found, vec![mine]);
        assert_eq!(store.find_by_id(owner.id).await.unwrap(), Some(owner));
    }
}
