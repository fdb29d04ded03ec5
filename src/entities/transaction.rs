use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Persisted stock movement. Immutable once inserted.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "transactions")]
#[serde(rename_all = "camelCase")]
#[schema(as = Transaction)]
pub struct Model {
    #[sea_orm(primary_key)]
    #[schema(example = 1)]
    pub id: i32,

    /// Wall-clock time in the reference zone (UTC-05:00), without offset
    #[schema(value_type = String, example = "2024-01-05T12:00:00")]
    pub timestamp: DateTime,

    /// Free-text kind as supplied by the caller, e.g. `sale` or `purchase`
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    #[schema(example = "sale")]
    pub kind: String,

    /// Product reference; only checked by the creation workflow
    #[schema(example = 1)]
    pub product_id: i32,

    #[schema(example = 3)]
    pub quantity: i32,

    #[schema(value_type = String, example = "2.50")]
    pub unit_price: Decimal,

    /// Always `quantity * unit_price`
    #[schema(value_type = String, example = "7.50")]
    pub total_price: Decimal,

    pub note: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
