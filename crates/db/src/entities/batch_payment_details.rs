//! `SeaORM` Entity for the batch_payment_details table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-sale allocation row of a batch payment. One row per selected
/// sale, even when the allocated amount is zero.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "batch_payment_details")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub batch_payment_id: Uuid,
    pub sale_id: Uuid,
    /// Balance the sale carried before this batch payment.
    pub original_balance: Decimal,
    pub amount_paid: Decimal,
    pub settled: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::batch_payments::Entity",
        from = "Column::BatchPaymentId",
        to = "super::batch_payments::Column::Id"
    )]
    BatchPayments,
    #[sea_orm(
        belongs_to = "super::sales::Entity",
        from = "Column::SaleId",
        to = "super::sales::Column::Id"
    )]
    Sales,
}

impl Related<super::batch_payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BatchPayments.def()
    }
}

impl Related<super::sales::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sales.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
