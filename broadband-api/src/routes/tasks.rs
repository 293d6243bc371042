/// Installation task endpoints (engineer only)
///
/// # Endpoints
///
/// - `GET /api/tasks` - All tasks
/// - `POST /api/tasks` - File a task (`multipart/form-data`)
/// - `PATCH /api/tasks/:task_id/status` - Move a task to any status
///
/// # Multipart fields
///
/// | Field | Kind |
/// |---|---|
/// | `name`, `mobile`, `address`, `plan`, `initial_password` | text, required |
/// | `status` | text, optional (defaults to `Pending Installation`) |
/// | `photo` | file, optional (.jpg/.jpeg/.png/.pdf) |
/// | `document` | file, optional (.jpg/.jpeg/.png/.pdf) |

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
    extract::ApiJson,
    middleware::auth::CurrentUser,
};
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use broadband_shared::{
    error::ServiceError,
    models::{
        task::{Task, TaskStatus},
        user::UserRole,
    },
    services::tasks::NewTask,
    uploads::UploadCategory,
};
use bytes::Bytes;
use serde::Deserialize;
use validator::Validate;

/// Text portion of the create-task form
#[derive(Debug, Default, Validate)]
pub struct TaskForm {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(
        length(equal = 10, message = "Mobile number must be exactly 10 digits"),
        custom(function = "super::validate_mobile")
    )]
    pub mobile: String,

    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,

    #[validate(length(min = 1, message = "Plan is required"))]
    pub plan: String,

    #[validate(length(min = 1, message = "Initial password is required"))]
    pub initial_password: String,

    pub status: Option<String>,
}

/// A file part held in memory until the form is fully read
#[derive(Debug)]
struct FilePart {
    filename: String,
    data: Bytes,
}

/// Status update request
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: TaskStatus,
}

pub async fn list_tasks(
    State(state): State<AppState>,
    caller: CurrentUser,
) -> ApiResult<Json<Vec<Task>>> {
    caller.require(UserRole::Engineer)?;
    let tasks = state.tasks.list_tasks().await?;
    Ok(Json(tasks))
}

/// Files an installation task and provisions the customer
///
/// Attachments are validated before anything is written. If the task cannot
/// be created after the files were stored, the files are removed again.
///
/// # Errors
///
/// - `400 Bad Request`: Malformed body or rejected attachment
/// - `403 Forbidden`: Caller is not an engineer
/// - `422 Unprocessable Entity`: Missing or invalid text fields
pub async fn create_task(
    State(state): State<AppState>,
    caller: CurrentUser,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<Task>)> {
    caller.require(UserRole::Engineer)?;

    let mut form = TaskForm::default();
    let mut photo: Option<FilePart> = None;
    let mut document: Option<FilePart> = None;

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "photo" | "document" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await?;

                // Browsers send an empty part when no file was picked
                if filename.is_empty() && data.is_empty() {
                    continue;
                }

                let part = FilePart { filename, data };
                if name == "photo" {
                    photo = Some(part);
                } else {
                    document = Some(part);
                }
            }
            "name" => form.name = field.text().await?,
            "mobile" => form.mobile = field.text().await?,
            "address" => form.address = field.text().await?,
            "plan" => form.plan = field.text().await?,
            "initial_password" => form.initial_password = field.text().await?,
            "status" => form.status = Some(field.text().await?),
            other => tracing::debug!(field = other, "Ignoring unknown multipart field"),
        }
    }

    form.validate()?;

    let status = match form.status.as_deref().map(str::trim) {
        None | Some("") => TaskStatus::default(),
        Some(raw) => raw.parse::<TaskStatus>().map_err(|message| {
            ApiError::ValidationError(vec![ValidationErrorDetail {
                field: "status".to_string(),
                message,
            }])
        })?,
    };

    for part in [&photo, &document].into_iter().flatten() {
        state
            .uploads
            .validate(&part.filename, part.data.len())
            .map_err(ServiceError::from)?;
    }

    let mut stored: Vec<String> = Vec::new();
    let photo_path = store_part(&state, UploadCategory::Photos, photo.as_ref(), &mut stored).await?;
    let document_path =
        store_part(&state, UploadCategory::Documents, document.as_ref(), &mut stored).await?;

    let result = state
        .tasks
        .create_task(NewTask {
            name: form.name,
            mobile: form.mobile,
            address: form.address,
            plan: form.plan,
            initial_password: form.initial_password,
            status,
            photo_path,
            document_path,
        })
        .await;

    match result {
        Ok(task) => Ok((StatusCode::CREATED, Json(task))),
        Err(e) => {
            for path in &stored {
                state.uploads.delete(path).await;
            }
            Err(e.into())
        }
    }
}

/// Writes an optional file part, recording the path for cleanup
async fn store_part(
    state: &AppState,
    category: UploadCategory,
    part: Option<&FilePart>,
    stored: &mut Vec<String>,
) -> ApiResult<Option<String>> {
    let Some(part) = part else {
        return Ok(None);
    };

    match state.uploads.save(category, &part.filename, &part.data).await {
        Ok(path) => {
            stored.push(path.clone());
            Ok(Some(path))
        }
        Err(e) => {
            for path in stored.iter() {
                state.uploads.delete(path).await;
            }
            Err(ServiceError::from(e).into())
        }
    }
}

/// Sets a task's status; regressions are allowed
///
/// # Errors
///
/// - `404 Not Found`: No such task
pub async fn update_task_status(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(task_id): Path<String>,
    ApiJson(req): ApiJson<UpdateStatusRequest>,
) -> ApiResult<Json<Task>> {
    caller.require(UserRole::Engineer)?;
    let task_id = super::parse_id(&task_id, "Task")?;

    let task = state.tasks.update_status(task_id, req.status).await?;
    Ok(Json(task))
}
