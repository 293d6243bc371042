/// Integration tests for installation task filing and status updates
mod common;

use axum::http::StatusCode;
use common::{task_parts, Part, TestContext};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_create_task_provisions_customer_login() {
    let ctx = TestContext::new();
    let engineer = ctx.engineer().await;

    let task = ctx.create_task(&engineer, "Priya Menon", "9900112233").await;
    assert_eq!(task["status"], "Pending Installation");
    assert_eq!(task["mobile"], "9900112233");
    assert!(task["photo_path"].is_null());

    let token = ctx.login("9900112233", "welcome123", "customer").await;
    let (status, me) = ctx.get("/api/auth/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["name"], "Priya Menon");
    assert_eq!(me["plan"], "1 Gbps Premium");
}

#[tokio::test]
async fn test_create_task_for_existing_customer_keeps_account() {
    let ctx = TestContext::new();
    let engineer = ctx.engineer().await;
    ctx.register("9900112233", "original-password", "customer").await;

    let task = ctx.create_task(&engineer, "Renamed Person", "9900112233").await;
    assert_eq!(task["name"], "Renamed Person");

    // Still the original password; the task's initial password was not applied
    let token = ctx.login("9900112233", "original-password", "customer").await;
    let (_, me) = ctx.get("/api/auth/me", Some(&token)).await;
    assert_eq!(me["name"], "User 9900112233");

    let (status, _) = ctx
        .post_json(
            "/api/auth/login",
            None,
            json!({ "mobile": "9900112233", "password": "welcome123", "role": "customer" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_task_with_explicit_status() {
    let ctx = TestContext::new();
    let engineer = ctx.engineer().await;

    let mut parts = task_parts("Vikram Singh", "9988776655");
    parts.push(Part::Text("status", "Installation Scheduled"));
    let (status, task) = ctx.post_multipart("/api/tasks", Some(&engineer), &parts).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(task["status"], "Installation Scheduled");

    let mut parts = task_parts("Vikram Singh", "9988776655");
    parts.push(Part::Text("status", "Cancelled"));
    let (status, body) = ctx.post_multipart("/api/tasks", Some(&engineer), &parts).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "status");
}

#[tokio::test]
async fn test_create_task_requires_fields() {
    let ctx = TestContext::new();
    let engineer = ctx.engineer().await;

    let parts = vec![Part::Text("name", "Priya Menon"), Part::Text("mobile", "9900112233")];
    let (status, body) = ctx.post_multipart("/api/tasks", Some(&engineer), &parts).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");

    let (_, tasks) = ctx.get("/api/tasks", Some(&engineer)).await;
    assert!(tasks.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_task_stores_attachments() {
    let ctx = TestContext::new();
    let engineer = ctx.engineer().await;

    let mut parts = task_parts("Priya Menon", "9900112233");
    parts.push(Part::File {
        field: "photo",
        filename: "site.JPG",
        data: b"\xff\xd8\xff\xe0fake-jpeg",
    });
    parts.push(Part::File {
        field: "document",
        filename: "id-proof.pdf",
        data: b"%PDF-1.4 fake",
    });

    let (status, task) = ctx.post_multipart("/api/tasks", Some(&engineer), &parts).await;
    assert_eq!(status, StatusCode::CREATED);

    let photo = task["photo_path"].as_str().unwrap();
    let document = task["document_path"].as_str().unwrap();
    assert!(photo.ends_with(".jpg"));
    assert!(photo.contains("photos"));
    assert!(document.ends_with(".pdf"));
    assert!(document.contains("documents"));
    assert!(std::path::Path::new(photo).exists());
    assert_eq!(std::fs::read(document).unwrap(), b"%PDF-1.4 fake");
}

#[tokio::test]
async fn test_create_task_rejects_bad_attachment() {
    let ctx = TestContext::with_max_upload(16);
    let engineer = ctx.engineer().await;

    let mut parts = task_parts("Priya Menon", "9900112233");
    parts.push(Part::File {
        field: "photo",
        filename: "payload.exe",
        data: b"MZ",
    });
    let (status, body) = ctx.post_multipart("/api/tasks", Some(&engineer), &parts).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");

    let mut parts = task_parts("Priya Menon", "9900112233");
    parts.push(Part::File {
        field: "document",
        filename: "big.pdf",
        data: &[0u8; 64],
    });
    let (status, _) = ctx.post_multipart("/api/tasks", Some(&engineer), &parts).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, tasks) = ctx.get("/api/tasks", Some(&engineer)).await;
    assert!(tasks.as_array().unwrap().is_empty());
    assert!(!ctx.upload_dir.join("photos").exists());
}

#[tokio::test]
async fn test_task_routes_require_engineer() {
    let ctx = TestContext::new();
    let (_, customer) = ctx.customer().await;

    let (status, body) = ctx.get("/api/tasks", Some(&customer)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Not authorized. Engineer role required.");

    let (status, _) = ctx
        .post_multipart("/api/tasks", Some(&customer), &task_parts("Priya Menon", "9900112233"))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = ctx.get("/api/tasks", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_status_update_allows_any_transition() {
    let ctx = TestContext::new();
    let engineer = ctx.engineer().await;
    let task = ctx.create_task(&engineer, "Priya Menon", "9900112233").await;
    let uri = format!("/api/tasks/{}/status", task["id"].as_str().unwrap());

    for next in ["Completed", "Pending Installation", "Installation Scheduled"] {
        let (status, body) = ctx
            .patch_json(&uri, Some(&engineer), json!({ "status": next }))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], next);
    }

    let (_, tasks) = ctx.get("/api/tasks", Some(&engineer)).await;
    assert_eq!(tasks[0]["status"], "Installation Scheduled");
}

#[tokio::test]
async fn test_status_update_errors() {
    let ctx = TestContext::new();
    let engineer = ctx.engineer().await;
    let task = ctx.create_task(&engineer, "Priya Menon", "9900112233").await;

    let uri = format!("/api/tasks/{}/status", Uuid::new_v4());
    let (status, _) = ctx
        .patch_json(&uri, Some(&engineer), json!({ "status": "Completed" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = ctx
        .patch_json("/api/tasks/12345/status", Some(&engineer), json!({ "status": "Completed" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let uri = format!("/api/tasks/{}/status", task["id"].as_str().unwrap());
    let (status, body) = ctx
        .patch_json(&uri, Some(&engineer), json!({ "status": "Done" }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");

    let (status, body) = ctx.patch_json(&uri, Some(&engineer), json!({})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "status");
}

#[tokio::test]
async fn test_list_tasks_in_filing_order() {
    let ctx = TestContext::new();
    let engineer = ctx.engineer().await;
    ctx.create_task(&engineer, "Priya Menon", "9900112233").await;
    ctx.create_task(&engineer, "Vikram Singh", "9988776655").await;

    let (status, tasks) = ctx.get("/api/tasks", Some(&engineer)).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = tasks
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|t| t["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Priya Menon", "Vikram Singh"]);
}
