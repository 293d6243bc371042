/// Persistence layer
///
/// The services never talk to a database directly. They hold trait objects
/// for the per-entity stores below, which keeps them testable against
/// [`memory::MemoryStore`] and runnable against [`postgres::PgStore`].
///
/// Every method is a single atomic operation against the backing store. No
/// method spans more than one record, so callers that need two writes (task
/// creation provisioning a customer) perform them independently.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use broadband_shared::store::{memory::MemoryStore, UserStore};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = Arc::new(MemoryStore::new());
/// let user = store.find_user_by_mobile("9876543210").await?;
/// assert!(user.is_none());
/// # Ok(())
/// # }
/// ```

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    bill::{Bill, BillStatus, CreateBill},
    task::{CreateTask, Task, TaskStatus},
    user::{CreateUser, User},
};

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Query or connection failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// User records, unique by mobile number
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a user unless the mobile number is already taken
    ///
    /// Returns `None` when another user owns the mobile number. The check and
    /// the insert are one atomic step, so concurrent registrations for the
    /// same number cannot both succeed.
    async fn insert_user(&self, data: CreateUser) -> StoreResult<Option<User>>;

    /// Finds a user by mobile number
    async fn find_user_by_mobile(&self, mobile: &str) -> StoreResult<Option<User>>;

    /// Finds a user by id
    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;
}

/// Installation task records
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn insert_task(&self, data: CreateTask) -> StoreResult<Task>;

    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>>;

    /// Lists every task in insertion order
    async fn list_tasks(&self) -> StoreResult<Vec<Task>>;

    /// Sets the status and returns the updated task, or `None` if absent
    async fn update_task_status(&self, id: Uuid, status: TaskStatus) -> StoreResult<Option<Task>>;
}

/// Bill records
#[async_trait]
pub trait BillStore: Send + Sync {
    async fn insert_bill(&self, data: CreateBill) -> StoreResult<Bill>;

    async fn find_bill(&self, id: Uuid) -> StoreResult<Option<Bill>>;

    /// Lists every bill owned by `user_id`
    async fn list_bills_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Bill>>;

    /// Sets the status and returns the updated bill, or `None` if absent
    async fn update_bill_status(&self, id: Uuid, status: BillStatus) -> StoreResult<Option<Bill>>;
}

/// A complete backing store
#[async_trait]
pub trait Store: UserStore + TaskStore + BillStore {
    /// Verifies the backing store is reachable
    async fn ping(&self) -> StoreResult<()>;
}
