//! Shared types, money helpers, and configuration for Fiado.
//!
//! This crate provides common types used across all other crates:
//! - Decimal rounding and BRL formatting helpers
//! - Typed IDs for type-safe entity references
//! - CPF (Brazilian tax id) checksum validation
//! - Pagination types for list queries
//! - Configuration management

pub mod config;
pub mod cpf;
pub mod types;

pub use config::AppConfig;
