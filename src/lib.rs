//! Product Store and Transaction Service
//!
//! Two cooperating HTTP services sharing one crate. The Product Store owns product
//! records; the Transaction Service records purchases and sales and pushes the
//! resulting stock back to the Product Store. Each binary under `src/bin` runs one
//! of them against its own database.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod common;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod health;
pub mod middleware_helpers;
pub mod migrator;
pub mod models;
pub mod openapi;
pub mod server;
pub mod services;
pub mod tracing;

pub use config::{AppConfig, ServiceEndpoints, ServiceKind};
pub use errors::{ErrorResponse, ServiceError};
