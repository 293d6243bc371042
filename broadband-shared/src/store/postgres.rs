/// PostgreSQL store
///
/// Implements the store traits with sqlx against the schema created by the
/// embedded migrations (see [`crate::db::migrations`]).
///
/// Duplicate mobile numbers are rejected by the `users.mobile` unique index:
/// `insert_user` uses `ON CONFLICT (mobile) DO NOTHING` and reports a
/// conflict as `None` instead of racing a separate existence check.
///
/// # Example
///
/// ```no_run
/// use broadband_shared::db::pool::{create_pool, DatabaseConfig};
/// use broadband_shared::store::{postgres::PgStore, TaskStore};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig {
///     url: std::env::var("DATABASE_URL")?,
///     ..Default::default()
/// })
/// .await?;
///
/// let store = PgStore::new(pool);
/// let tasks = store.list_tasks().await?;
/// println!("{} tasks", tasks.len());
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{BillStore, Store, StoreResult, TaskStore, UserStore};
use crate::db::pool::health_check;
use crate::models::{
    bill::{Bill, BillStatus, CreateBill},
    task::{CreateTask, Task, TaskStatus},
    user::{CreateUser, User},
};

const USER_COLUMNS: &str = "id, mobile, name, role, password_hash, address, plan, created_at";

const TASK_COLUMNS: &str =
    "id, name, mobile, address, plan, status, photo_path, document_path, created_at";

const BILL_COLUMNS: &str =
    "id, user_id, month, amount, due_date, status, pdf_filename, created_at";

/// Store backed by a PostgreSQL connection pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Underlying connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, data: CreateUser) -> StoreResult<Option<User>> {
        let query = format!(
            r#"
            INSERT INTO users (mobile, name, role, password_hash, address, plan)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (mobile) DO NOTHING
            RETURNING {USER_COLUMNS}
            "#
        );

        let user = sqlx::query_as::<_, User>(&query)
            .bind(data.mobile)
            .bind(data.name)
            .bind(data.role)
            .bind(data.password_hash)
            .bind(data.address)
            .bind(data.plan)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_user_by_mobile(&self, mobile: &str) -> StoreResult<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE mobile = $1");

        let user = sqlx::query_as::<_, User>(&query)
            .bind(mobile)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn insert_task(&self, data: CreateTask) -> StoreResult<Task> {
        let query = format!(
            r#"
            INSERT INTO tasks (name, mobile, address, plan, status, photo_path, document_path)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {TASK_COLUMNS}
            "#
        );

        let task = sqlx::query_as::<_, Task>(&query)
            .bind(data.name)
            .bind(data.mobile)
            .bind(data.address)
            .bind(data.plan)
            .bind(data.status)
            .bind(data.photo_path)
            .bind(data.document_path)
            .fetch_one(&self.pool)
            .await?;

        Ok(task)
    }

    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>> {
        let query = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1");

        let task = sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(task)
    }

    async fn list_tasks(&self) -> StoreResult<Vec<Task>> {
        // seq is a BIGSERIAL, so it preserves insertion order
        let query = format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY seq");

        let tasks = sqlx::query_as::<_, Task>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(tasks)
    }

    async fn update_task_status(&self, id: Uuid, status: TaskStatus) -> StoreResult<Option<Task>> {
        let query = format!("UPDATE tasks SET status = $2 WHERE id = $1 RETURNING {TASK_COLUMNS}");

        let task = sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await?;

        Ok(task)
    }
}

#[async_trait]
impl BillStore for PgStore {
    async fn insert_bill(&self, data: CreateBill) -> StoreResult<Bill> {
        let query = format!(
            r#"
            INSERT INTO bills (user_id, month, amount, due_date, status, pdf_filename)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {BILL_COLUMNS}
            "#
        );

        let bill = sqlx::query_as::<_, Bill>(&query)
            .bind(data.user_id)
            .bind(data.month)
            .bind(data.amount)
            .bind(data.due_date)
            .bind(data.status)
            .bind(data.pdf_filename)
            .fetch_one(&self.pool)
            .await?;

        Ok(bill)
    }

    async fn find_bill(&self, id: Uuid) -> StoreResult<Option<Bill>> {
        let query = format!("SELECT {BILL_COLUMNS} FROM bills WHERE id = $1");

        let bill = sqlx::query_as::<_, Bill>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(bill)
    }

    async fn list_bills_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Bill>> {
        let query = format!("SELECT {BILL_COLUMNS} FROM bills WHERE user_id = $1 ORDER BY seq");

        let bills = sqlx::query_as::<_, Bill>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(bills)
    }

    async fn update_bill_status(&self, id: Uuid, status: BillStatus) -> StoreResult<Option<Bill>> {
        let query = format!("UPDATE bills SET status = $2 WHERE id = $1 RETURNING {BILL_COLUMNS}");

        let bill = sqlx::query_as::<_, Bill>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await?;

        Ok(bill)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        health_check(&self.pool).await?;
        Ok(())
    }
}
