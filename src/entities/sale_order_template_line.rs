use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A line of a quotation template, copied onto the order when the template is applied.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sale_order_template_lines")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub template_id: Uuid,
    pub sequence: i32,
    /// `None` for section and note lines.
    pub product_id: Option<Uuid>,
    pub name: String,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub product_uom_qty: Decimal,
    pub uom_id: Option<Uuid>,
    #[sea_orm(column_type = "Text", nullable)]
    pub website_description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sale_order_template::Entity",
        from = "Column::TemplateId",
        to = "super::sale_order_template::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Template,
}

impl Related<super::sale_order_template::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Template.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
