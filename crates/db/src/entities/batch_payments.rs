//! `SeaORM` Entity for the batch_payments table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::PaymentMethod;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "batch_payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub customer_id: Uuid,
    /// Combined balance of the selected sales at payment time.
    pub total_balance: Decimal,
    pub amount_paid: Decimal,
    /// `max(total_balance - amount_paid, 0)`.
    pub remainder: Decimal,
    pub method: PaymentMethod,
    pub tendered: Option<Decimal>,
    pub change_due: Option<Decimal>,
    pub payment_date: Date,
    pub notes: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customers::Entity",
        from = "Column::CustomerId",
        to = "super::customers::Column::Id"
    )]
    Customers,
    #[sea_orm(has_many = "super::batch_payment_details::Entity")]
    BatchPaymentDetails,
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customers.def()
    }
}

impl Related<super::batch_payment_details::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BatchPaymentDetails.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
