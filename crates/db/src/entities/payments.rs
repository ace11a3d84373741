//! `SeaORM` Entity for the payments table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::PaymentMethod;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub sale_id: Uuid,
    pub amount: Decimal,
    pub method: PaymentMethod,
    /// Cash handed over; only for cash payments.
    pub tendered: Option<Decimal>,
    /// Change returned; only for cash payments.
    pub change_due: Option<Decimal>,
    pub payment_date: Date,
    pub notes: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sales::Entity",
        from = "Column::SaleId",
        to = "super::sales::Column::Id"
    )]
    Sales,
}

impl Related<super::sales::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sales.def()
    }
}

impl From<Model> for fiado_core::payment::Payment {
    fn from(model: Model) -> Self {
        Self {
            id: fiado_shared::types::PaymentId::from_uuid(model.id),
            sale_id: fiado_shared::types::SaleId::from_uuid(model.sale_id),
            value: model.amount,
            method: model.method.into(),
            tendered: model.tendered,
            change: model.change_due,
            payment_date: model.payment_date,
            notes: model.notes,
            created_at: model.created_at.with_timezone(&chrono::Utc),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}
