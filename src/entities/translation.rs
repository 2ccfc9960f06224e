use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Field names that carry per-language values.
pub const FIELD_WEBSITE_DESCRIPTION: &str = "website_description";
pub const FIELD_QUOTATION_DESCRIPTION: &str = "quotation_description";

/// One language variant of a translatable field. `res_model` is the table
/// name of the translated record, `res_id` its primary key.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "translations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub res_model: String,
    pub res_id: Uuid,
    pub field: String,
    pub lang: String,
    #[sea_orm(column_type = "Text")]
    pub value: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
