//! `SeaORM` entity definitions.

pub mod batch_payment_details;
pub mod batch_payments;
pub mod customers;
pub mod payments;
pub mod sale_items;
pub mod sales;
pub mod sea_orm_active_enums;
