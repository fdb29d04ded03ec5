use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of a create-transaction request.
///
/// `id` and `totalPrice` may be present in client payloads; both are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    /// Defaults to the creation time when absent
    #[serde(default)]
    #[schema(example = "2024-01-05T17:00:00Z")]
    pub timestamp: Option<String>,

    #[serde(rename = "type")]
    #[schema(example = "sale")]
    pub kind: String,

    #[schema(example = 1)]
    pub product_id: i32,

    #[schema(example = 3)]
    pub quantity: i32,

    #[schema(value_type = String, example = "2.50")]
    pub unit_price: Decimal,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub total_price: Option<Decimal>,

    #[serde(default)]
    pub note: Option<String>,
}
