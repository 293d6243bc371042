/// Typed records for the broadband portal
///
/// Each entity has a stored record type (`User`, `Task`, `Bill`) that maps
/// one-to-one onto a database row, and a `Create*` input consumed by the
/// store when inserting.
///
/// # Models
///
/// - `user`: Customer and engineer accounts keyed by mobile number
/// - `task`: Installation tasks filed by engineers
/// - `bill`: Monthly bills owned by a customer

pub mod bill;
pub mod task;
pub mod user;
