use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelBehavior, ActiveValue, ActiveValue::Set, ConnectionTrait};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::validate_non_negative;

/// Product entity
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Primary key
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Product name
    #[validate(length(
        min = 1,
        max = 255,
        message = "Product name must be between 1 and 255 characters"
    ))]
    pub name: String,

    /// Sales price per unit
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    #[validate(custom = "validate_non_negative")]
    pub list_price: Decimal,

    /// Default unit of measure for sales
    pub uom_id: Option<Uuid>,

    /// Rich-text description shown on quotations. Translatable, stored
    /// unsanitized; this column holds the default-language value.
    #[sea_orm(column_type = "Text", nullable)]
    pub quotation_description: Option<String>,

    /// Is the product active
    pub is_active: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: Option<DateTime<Utc>>,
}

/// Product entity relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::sale_order_line::Entity")]
    SaleOrderLines,
    #[sea_orm(has_many = "super::sale_order_option::Entity")]
    SaleOrderOptions,
}

impl Related<super::sale_order_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SaleOrderLines.def()
    }
}

impl Related<super::sale_order_option::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SaleOrderOptions.def()
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
            if let ActiveValue::NotSet = active_model.is_active {
                active_model.is_active = Set(true);
            }

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
