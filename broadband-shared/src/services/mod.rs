/// Lifecycle managers
///
/// - `tasks`: Installation task creation (with customer provisioning) and
///   status updates
/// - `bills`: Bill creation, listing and payment
///
/// Both take an already-resolved caller where one matters; identity checks
/// belong to [`crate::auth::gate`].

pub mod bills;
pub mod tasks;
