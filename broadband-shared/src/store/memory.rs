//! In-memory store
//!
//! Backs unit and HTTP tests, and local demos without PostgreSQL. Records live
//! in insertion-ordered vectors behind async read/write locks.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{BillStore, Store, StoreResult, TaskStore, UserStore};
use crate::models::{
    bill::{Bill, BillStatus, CreateBill},
    task::{CreateTask, Task, TaskStatus},
    user::{CreateUser, User},
};

/// In-memory implementation of every store trait
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    tasks: RwLock<Vec<Task>>,
    bills: RwLock<Vec<Bill>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, data: CreateUser) -> StoreResult<Option<User>> {
        // Held across the duplicate check so the insert is atomic
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.mobile == data.mobile) {
            return Ok(None);
        }

        let user = User {
            id: Uuid::new_v4(),
            mobile: data.mobile,
            name: data.name,
            role: data.role,
            password_hash: data.password_hash,
            address: data.address,
            plan: data.plan,
            created_at: Utc::now(),
        };
        users.push(user.clone());
        Ok(Some(user))
    }

    async fn find_user_by_mobile(&self, mobile: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.mobile == mobile).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn insert_task(&self, data: CreateTask) -> StoreResult<Task> {
        let task = Task {
            id: Uuid::new_v4(),
            name: data.name,
            mobile: data.mobile,
            address: data.address,
            plan: data.plan,
            status: data.status,
            photo_path: data.photo_path,
            document_path: data.document_path,
            created_at: Utc::now(),
        };
        self.tasks.write().await.push(task.clone());
        Ok(task)
    }

    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks.iter().find(|t| t.id == id).cloned())
    }

    async fn list_tasks(&self) -> StoreResult<Vec<Task>> {
        Ok(self.tasks.read().await.clone())
    }

    async fn update_task_status(&self, id: Uuid, status: TaskStatus) -> StoreResult<Option<Task>> {
        let mut tasks = self.tasks.write().await;
        Ok(tasks.iter_mut().find(|t| t.id == id).map(|task| {
            task.status = status;
            task.clone()
        }))
    }
}

#[async_trait]
impl BillStore for MemoryStore {
    async fn insert_bill(&self, data: CreateBill) -> StoreResult<Bill> {
        let bill = Bill {
            id: Uuid::new_v4(),
            user_id: data.user_id,
            month: data.month,
            amount: data.amount,
            due_date: data.due_date,
            status: data.status,
            pdf_filename: data.pdf_filename,
            created_at: Utc::now(),
        };
        self.bills.write().await.push(bill.clone());
        Ok(bill)
    }

    async fn find_bill(&self, id: Uuid) -> StoreResult<Option<Bill>> {
        let bills = self.bills.read().await;
        Ok(bills.iter().find(|b| b.id == id).cloned())
    }

    async fn list_bills_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Bill>> {
        let bills = self.bills.read().await;
        Ok(bills.iter().filter(|b| b.user_id == user_id).cloned().collect())
    }

    async fn update_bill_status(&self, id: Uuid, status: BillStatus) -> StoreResult<Option<Bill>> {
        let mut bills = self.bills.write().await;
        Ok(bills.iter_mut().find(|b| b.id == id).map(|bill| {
            bill.status = status;
            bill.clone()
        }))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
