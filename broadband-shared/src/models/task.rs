/// Installation tasks
///
/// Engineers file a task when a customer orders a connection, then move it
/// through the installation workflow by hand.
///
/// # Workflow
///
/// ```text
/// Pending Installation → Installation Scheduled → Completed
/// ```
///
/// The order is the natural one, but nothing enforces it: an engineer may set
/// any status from any status, including moving a completed task back to
/// pending.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM (
///     'Pending Installation', 'Installation Scheduled', 'Completed'
/// );
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name TEXT NOT NULL,
///     mobile VARCHAR(10) NOT NULL,
///     address TEXT NOT NULL,
///     plan TEXT NOT NULL,
///     status task_status NOT NULL DEFAULT 'Pending Installation',
///     photo_path TEXT,
///     document_path TEXT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Installation progress
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "task_status")]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "Pending Installation")]
    #[sqlx(rename = "Pending Installation")]
    PendingInstallation,

    #[serde(rename = "Installation Scheduled")]
    #[sqlx(rename = "Installation Scheduled")]
    InstallationScheduled,

    #[serde(rename = "Completed")]
    #[sqlx(rename = "Completed")]
    Completed,
}

impl TaskStatus {
    /// All statuses in workflow order
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::PendingInstallation,
        TaskStatus::InstallationScheduled,
        TaskStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::PendingInstallation => "Pending Installation",
            TaskStatus::InstallationScheduled => "Installation Scheduled",
            TaskStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "Unknown task status '{}'; expected one of: Pending Installation, Installation Scheduled, Completed",
                    s
                )
            })
    }
}

/// Stored installation task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    pub id: Uuid,

    /// Customer name
    pub name: String,

    /// Customer mobile number
    pub mobile: String,

    /// Installation address
    pub address: String,

    /// Ordered plan
    pub plan: String,

    pub status: TaskStatus,

    /// Storage path of the site photo, if one was uploaded
    pub photo_path: Option<String>,

    /// Storage path of the supporting document, if one was uploaded
    pub document_path: Option<String>,

    pub created_at: DateTime<Utc>,
}

/// Input for inserting a task
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub name: String,
    pub mobile: String,
    pub address: String,
    pub plan: String,
    pub status: TaskStatus,
    pub photo_path: Option<String>,
    pub document_path: Option<String>,
}
