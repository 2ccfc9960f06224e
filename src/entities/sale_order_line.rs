use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, ConnectionTrait};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{validate_discount, validate_non_negative};

/// The `sale_order_lines` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "sale_order_lines")]
pub struct Model {
    /// Primary key: Unique identifier for the order line.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Foreign key referencing the order.
    pub order_id: Uuid,

    pub sequence: i32,

    pub product_id: Option<Uuid>,

    /// Line label shown on the quotation.
    #[validate(length(min = 1, message = "Line description is required"))]
    pub name: String,

    /// Quantity ordered, in `uom_id` units.
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    #[validate(custom = "validate_non_negative")]
    pub product_uom_qty: Decimal,

    pub uom_id: Option<Uuid>,

    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    #[validate(custom = "validate_non_negative")]
    pub price_unit: Decimal,

    /// Discount in percent.
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    #[validate(custom = "validate_discount")]
    pub discount: Decimal,

    /// Rich text; defaults to the product's quotation description when a
    /// change-set sets the product without supplying one.
    #[sea_orm(column_type = "Text", nullable)]
    pub website_description: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Define relations for the `sale_order_lines` table.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each line belongs to an order.
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
    /// Untaxed amount of the line after discount.
    pub fn price_subtotal(&self) -> Decimal {
        let gross = self.price_unit * self.product_uom_qty;
        gross - gross * self.discount / Decimal::ONE_HUNDRED
    }
}
