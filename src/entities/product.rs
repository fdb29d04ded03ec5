use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Product record owned by the Product Store.
///
/// The same shape travels over the wire between the two services, so the
/// Transaction Service deserializes peer responses straight into this model.
#[derive(
    Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, Validate, ToSchema,
)]
#[sea_orm(table_name = "products")]
#[schema(as = Product)]
pub struct Model {
    /// Assigned by the store on create; ignored in create bodies
    #[sea_orm(primary_key)]
    #[serde(default)]
    #[schema(example = 1)]
    pub id: i32,

    #[validate(length(
        min = 1,
        max = 255,
        message = "Product name must be between 1 and 255 characters"
    ))]
    #[schema(example = "Widget")]
    pub name: String,

    /// Units on hand. Only ever replaced as part of a full record.
    #[schema(example = 10)]
    pub stock: i32,

    #[schema(value_type = String, example = "2.50")]
    pub price: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
