//! # 4You Broadband Portal API Library
//!
//! HTTP surface of the broadband portal: customers view and pay bills,
//! field engineers file and progress installation tasks.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: Request extractors with API-style rejections
//! - `middleware`: Bearer authentication
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
