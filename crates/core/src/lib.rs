//! Core business logic for Fiado.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `customer` - Customer records and credit standing
//! - `credit` - Credit limit policy
//! - `sale` - Sales, line items, and the status machine
//! - `payment` - Payment rules and receipt data
//! - `allocation` - Proportional payment distribution across open sales

pub mod allocation;
pub mod credit;
pub mod customer;
pub mod payment;
pub mod sale;
