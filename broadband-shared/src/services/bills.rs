/// Bill lifecycle
///
/// Bills are created by staff and paid by the customer who owns them. Paying
/// is the only mutation, and paying an already-paid bill is a no-op that
/// still succeeds.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::models::bill::{invoice_filename, Bill, BillStatus, CreateBill};
use crate::models::user::User;
use crate::store::BillStore;

/// Input for creating a bill
#[derive(Debug, Clone)]
pub struct NewBill {
    pub user_id: Uuid,
    pub month: String,
    pub amount: f64,
    pub due_date: String,
    pub status: BillStatus,
}

/// Creates, lists and settles bills
#[derive(Clone)]
pub struct BillManager {
    bills: Arc<dyn BillStore>,
}

impl BillManager {
    pub fn new(bills: Arc<dyn BillStore>) -> Self {
        Self { bills }
    }

    /// Creates a bill; `user_id` is not checked against the user store
    pub async fn create_bill(&self, new_bill: NewBill) -> ServiceResult<Bill> {
        let pdf_filename = invoice_filename(&new_bill.month);

        let bill = self
            .bills
            .insert_bill(CreateBill {
                user_id: new_bill.user_id,
                month: new_bill.month,
                amount: new_bill.amount,
                due_date: new_bill.due_date,
                status: new_bill.status,
                pdf_filename,
            })
            .await?;

        info!(bill_id = %bill.id, user_id = %bill.user_id, month = %bill.month, "Created bill");
        Ok(bill)
    }

    pub async fn list_bills_for_user(&self, user_id: Uuid) -> ServiceResult<Vec<Bill>> {
        Ok(self.bills.list_bills_for_user(user_id).await?)
    }

    /// Marks a bill paid on behalf of `payer`
    ///
    /// # Errors
    ///
    /// - `ServiceError::NotFound` if the bill does not exist
    /// - `ServiceError::Forbidden` if `payer` does not own it
    pub async fn pay_bill(&self, bill_id: Uuid, payer: &User) -> ServiceResult<Bill> {
        let not_found = || ServiceError::NotFound("Bill not found".to_string());

        let bill = self.bills.find_bill(bill_id).await?.ok_or_else(not_found)?;

        if bill.user_id != payer.id {
            warn!(bill_id = %bill.id, payer_id = %payer.id, "Payment attempt on another user's bill");
            return Err(ServiceError::Forbidden(
                "Not authorized to pay this bill".to_string(),
            ));
        }

        if !bill.status.is_outstanding() {
            debug!(bill_id = %bill.id, "Bill already paid");
        }

        let paid = self
            .bills
            .update_bill_status(bill_id, BillStatus::Paid)
            .await?
            .ok_or_else(not_found)?;

        info!(bill_id = %paid.id, "Bill paid");
        Ok(paid)
    }
}
