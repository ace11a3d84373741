//! Database enum mappings.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Persisted sale status. Overdue is computed, never stored.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "sale_status")]
pub enum SaleStatus {
    /// Sale has an outstanding balance.
    #[sea_orm(string_value = "open")]
    Open,
    /// Sale is fully paid.
    #[sea_orm(string_value = "paid")]
    Paid,
}

/// Payment method.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_method")]
pub enum PaymentMethod {
    /// Physical cash.
    #[sea_orm(string_value = "cash")]
    Cash,
    /// Debit or credit card.
    #[sea_orm(string_value = "card")]
    Card,
    /// Pix instant transfer.
    #[sea_orm(string_value = "pix")]
    Pix,
}

impl From<fiado_core::sale::SaleStatus> for SaleStatus {
    fn from(status: fiado_core::sale::SaleStatus) -> Self {
        match status {
            fiado_core::sale::SaleStatus::Open => Self::Open,
            fiado_core::sale::SaleStatus::Paid => Self::Paid,
        }
    }
}

impl From<SaleStatus> for fiado_core::sale::SaleStatus {
    fn from(status: SaleStatus) -> Self {
        match status {
            SaleStatus::Open => Self::Open,
            SaleStatus::Paid => Self::Paid,
        }
    }
}

impl From<fiado_core::payment::PaymentMethod> for PaymentMethod {
    fn from(method: fiado_core::payment::PaymentMethod) -> Self {
        match method {
            fiado_core::payment::PaymentMethod::Cash => Self::Cash,
            fiado_core::payment::PaymentMethod::Card => Self::Card,
            fiado_core::payment::PaymentMethod::Pix => Self::Pix,
        }
    }
}

impl From<PaymentMethod> for fiado_core::payment::PaymentMethod {
    fn from(method: PaymentMethod) -> Self {
        match method {
            PaymentMethod::Cash => Self::Cash,
            PaymentMethod::Card => Self::Card,
            PaymentMethod::Pix => Self::Pix,
        }
    }
}
