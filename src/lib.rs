//! tinyhop - a single-tenant URL shortener
//!
//! Links map a short random token to a destination URL, expire after a TTL
//! and may be locked with a password. Every successful resolution is
//! counted and logged for per-link analytics.
//!
//! # Architecture
//! - `storage`: SeaORM-backed link table and access log
//! - `services`: token issuing, shortening, resolution, analytics
//! - `api`: actix-web handlers and middleware
//! - `config`: TOML + environment configuration
//! - `runtime`: startup, server mode and shutdown
//! - `system`: logging

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
