/// Installation task lifecycle
///
/// Filing a task also provisions the customer's account so they can log in
/// once the connection is live. The two writes are independent: if the task
/// insert fails after the user insert succeeded, the user stays. An existing
/// account for the mobile number is left untouched.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::auth::gate::{AuthGate, UserRegistration};
use crate::error::{ServiceError, ServiceResult};
use crate::models::task::{CreateTask, Task, TaskStatus};
use crate::models::user::UserRole;
use crate::store::TaskStore;

/// Everything an engineer supplies when filing a task
#[derive(Debug, Clone)]
pub struct NewTask {
    pub name: String,
    pub mobile: String,
    pub address: String,
    pub plan: String,

    /// Password for the customer account provisioned alongside the task
    pub initial_password: String,

    pub status: TaskStatus,

    /// Storage path returned by the upload collaborator
    pub photo_path: Option<String>,

    /// Storage path returned by the upload collaborator
    pub document_path: Option<String>,
}

/// Creates, lists and updates installation tasks
#[derive(Clone)]
pub struct TaskManager {
    tasks: Arc<dyn TaskStore>,
    gate: AuthGate,
}

impl TaskManager {
    pub fn new(tasks: Arc<dyn TaskStore>, gate: AuthGate) -> Self {
        Self { tasks, gate }
    }

    /// Files a task, registering the customer first
    ///
    /// # Errors
    ///
    /// Fails if the customer details are invalid or either write fails.
    /// A customer that already exists is not an error.
    pub async fn create_task(&self, new_task: NewTask) -> ServiceResult<Task> {
        let registration = UserRegistration {
            mobile: new_task.mobile.clone(),
            name: new_task.name.clone(),
            password: new_task.initial_password,
            role: UserRole::Customer,
            address: Some(new_task.address.clone()),
            plan: Some(new_task.plan.clone()),
        };

        match self.gate.register(registration).await {
            Ok(user) => info!(user_id = %user.id, "Provisioned customer for installation task"),
            Err(ServiceError::AlreadyExists(_)) => {
                debug!(mobile = %new_task.mobile, "Customer already registered; keeping existing account")
            }
            Err(e) => return Err(e),
        }

        let task = self
            .tasks
            .insert_task(CreateTask {
                name: new_task.name,
                mobile: new_task.mobile,
                address: new_task.address,
                plan: new_task.plan,
                status: new_task.status,
                photo_path: new_task.photo_path,
                document_path: new_task.document_path,
            })
            .await?;

        info!(task_id = %task.id, status = %task.status, "Created installation task");
        Ok(task)
    }

    /// All tasks in the order they were filed
    pub async fn list_tasks(&self) -> ServiceResult<Vec<Task>> {
        Ok(self.tasks.list_tasks().await?)
    }

    /// Sets a task's status
    ///
    /// Any status may follow any other; regressions are allowed.
    pub async fn update_status(&self, task_id: Uuid, status: TaskStatus) -> ServiceResult<Task> {
        let task = self
            .tasks
            .update_task_status(task_id, status)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Task not found".to_string()))?;

        info!(task_id = %task.id, status = %task.status, "Updated task status");
        Ok(task)
    }
}
