//! `SeaORM` Entity for the customers table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    /// Digits only; unique when present.
    pub cpf: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub credit_limit: Decimal,
    pub is_active: bool,
    pub notes: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::sales::Entity")]
    Sales,
    #[sea_orm(has_many = "super::batch_payments::Entity")]
    BatchPayments,
}

impl Related<super::sales::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sales.def()
    }
}

impl Related<super::batch_payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BatchPayments.def()
    }
}

impl From<Model> for fiado_core::customer::Customer {
    fn from(model: Model) -> Self {
        Self {
            id: fiado_shared::types::CustomerId::from_uuid(model.id),
            name: model.name,
            cpf: model.cpf,
            phone: model.phone,
            address: model.address,
            credit_limit: model.credit_limit,
            active: model.is_active,
            notes: model.notes,
            created_at: model.created_at.with_timezone(&chrono::Utc),
            updated_at: model.updated_at.with_timezone(&chrono::Utc),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}
