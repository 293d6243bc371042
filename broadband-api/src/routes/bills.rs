/// Bill endpoints
///
/// # Endpoints
///
/// - `GET /api/bills` - The calling customer's bills
/// - `POST /api/bills` - Create a bill (engineer)
/// - `PATCH /api/bills/:bill_id/pay` - Pay one of the caller's bills

use crate::{app::AppState, error::ApiResult, extract::ApiJson, middleware::auth::CurrentUser};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use broadband_shared::{
    models::{
        bill::{Bill, BillStatus},
        user::UserRole,
    },
    services::bills::NewBill,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Create bill request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBillRequest {
    pub user_id: Uuid,

    /// Billing period label, e.g. "November 2024"
    #[validate(length(min = 1, message = "Month is required"))]
    pub month: String,

    #[validate(range(exclusive_min = 0.0, message = "Amount must be positive"))]
    pub amount: f64,

    #[validate(length(min = 1, message = "Due date is required"))]
    pub due_date: String,

    #[serde(default)]
    pub status: BillStatus,
}

pub async fn list_bills(
    State(state): State<AppState>,
    caller: CurrentUser,
) -> ApiResult<Json<Vec<Bill>>> {
    let customer = caller.require(UserRole::Customer)?;
    let bills = state.bills.list_bills_for_user(customer.id).await?;
    Ok(Json(bills))
}

/// Creates a bill for any user id; the id is not checked against users
pub async fn create_bill(
    State(state): State<AppState>,
    caller: CurrentUser,
    ApiJson(req): ApiJson<CreateBillRequest>,
) -> ApiResult<(StatusCode, Json<Bill>)> {
    caller.require(UserRole::Engineer)?;
    req.validate()?;

    let bill = state
        .bills
        .create_bill(NewBill {
            user_id: req.user_id,
            month: req.month,
            amount: req.amount,
            due_date: req.due_date,
            status: req.status,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(bill)))
}

/// Marks a bill paid
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not a customer or does not own the bill
/// - `404 Not Found`: No such bill
pub async fn pay_bill(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(bill_id): Path<String>,
) -> ApiResult<Json<Bill>> {
    let customer = caller.require(UserRole::Customer)?;
    let bill_id = super::parse_id(&bill_id, "Bill")?;

    let bill = state.bills.pay_bill(bill_id, &customer).await?;
    Ok(Json(bill))
}
