//! # 4You Broadband Shared Library
//!
//! Domain types, persistence, authentication and the task/bill lifecycle
//! logic used by the broadband portal API server and its tooling.
//!
//! ## Module Organization
//!
//! - `models`: Typed records for users, installation tasks and bills
//! - `store`: Persistence traits with PostgreSQL and in-memory implementations
//! - `auth`: Password hashing, bearer tokens and the authorization gate
//! - `services`: Task and bill lifecycle managers
//! - `uploads`: On-disk storage for task photos and documents
//! - `db`: Connection pool and embedded migrations
//! - `error`: Domain error taxonomy shared by every service

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod store;
pub mod uploads;

/// Current version of the shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
