use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, ConnectionTrait};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{validate_discount, validate_non_negative};

/// An optional product proposed on a quotation, not yet part of the order.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "sale_order_options")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub order_id: Uuid,
    pub sequence: i32,
    pub product_id: Option<Uuid>,
    pub uom_id: Option<Uuid>,

    #[validate(length(min = 1, message = "Option description is required"))]
    pub name: String,

    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    #[validate(custom = "validate_non_negative")]
    pub quantity: Decimal,

    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    #[validate(custom = "validate_non_negative")]
    pub price_unit: Decimal,

    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    #[validate(custom = "validate_discount")]
    pub discount: Decimal,

    /// Order line the option was added as, once promoted.
    pub line_id: Option<Uuid>,

    /// Computed from the product in the order customer's language whenever
    /// the product or unit changes; precomputed before insert.
    #[sea_orm(column_type = "Text", nullable)]
    pub website_description: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sale_order::Entity",
        from = "Column::OrderId",
        to = "super::sale_order::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Order,
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
    #[sea_orm(
        belongs_to = "super::sale_order_line::Entity",
        from = "Column::LineId",
        to = "super::sale_order_line::Column::Id",
        on_delete = "SetNull"
    )]
    Line,
}

impl Related<super::sale_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = self;

        if insert {
            active_model.created_at = Set(Utc::now());
        }
        active_model.updated_at = Set(Some(Utc::now()));

        let model: Model = active_model.clone().try_into().map_err(|_| {
            DbErr::Custom("Failed to convert ActiveModel to Model for validation".to_string())
        })?;
        super::validate_model(&model)?;

        Ok(active_model)
    }
}

impl Model {
    pub fn is_promoted(&self) -> bool {
        self.line_id.is_some()
    }
}
