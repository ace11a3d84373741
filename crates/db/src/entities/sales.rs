//! `SeaORM` Entity for the sales table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::SaleStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sales")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub customer_id: Uuid,
    pub sale_date: Date,
    pub due_date: Date,
    pub subtotal: Decimal,
    pub total: Decimal,
    pub status: SaleStatus,
    pub is_remainder: bool,
    /// Batch payment that generated this remainder sale.
    pub batch_payment_id: Option<Uuid>,
    pub payment_date: Option<Date>,
    pub notes: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customers::Entity",
        from = "Column::CustomerId",
        to = "super::customers::Column::Id"
    )]
    Customers,
    #[sea_orm(
        belongs_to = "super::batch_payments::Entity",
        from = "Column::BatchPaymentId",
        to = "super::batch_payments::Column::Id"
    )]
    BatchPayments,
    #[sea_orm(has_many = "super::sale_items::Entity")]
    SaleItems,
    #[sea_orm(has_many = "super::payments::Entity")]
    Payments,
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customers.def()
    }
}

impl Related<super::sale_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SaleItems.def()
    }
}

impl Related<super::payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl From<Model> for fiado_core::sale::Sale {
    fn from(model: Model) -> Self {
        Self {
            id: fiado_shared::types::SaleId::from_uuid(model.id),
            customer_id: fiado_shared::types::CustomerId::from_uuid(model.customer_id),
            sale_date: model.sale_date,
            due_date: model.due_date,
            subtotal: model.subtotal,
            total: model.total,
            status: model.status.into(),
            is_remainder: model.is_remainder,
            batch_payment_id: model
                .batch_payment_id
                .map(fiado_shared::types::BatchPaymentId::from_uuid),
            payment_date: model.payment_date,
            notes: model.notes,
            created_at: model.created_at.with_timezone(&chrono::Utc),
            updated_at: model.updated_at.with_timezone(&chrono::Utc),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}
