use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "sale_orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[validate(length(
        min = 1,
        max = 64,
        message = "Order reference must be between 1 and 64 characters"
    ))]
    pub name: String,

    pub customer_id: Uuid,
    pub template_id: Option<Uuid>,
    pub state: SaleOrderState,

    /// Computed from the template in the customer's language whenever the
    /// customer or template changes; editable in between.
    #[sea_orm(column_type = "Text", nullable)]
    pub website_description: Option<String>,

    pub validity_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub version: i32,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SaleOrderState {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "sent")]
    Sent,
    #[sea_orm(string_value = "sale")]
    Sale,
    #[sea_orm(string_value = "cancel")]
    Cancel,
}

impl SaleOrderState {
    /// Quotations can still be reshaped (template applied, options added)
    /// until they are confirmed or cancelled.
    pub fn is_quotation(self) -> bool {
        matches!(self, SaleOrderState::Draft | SaleOrderState::Sent)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::CustomerId",
        to = "super::customer::Column::Id"
    )]
    Customer,
    #[sea_orm(
        belongs_to = "super::sale_order_template::Entity",
        from = "Column::TemplateId",
        to = "super::sale_order_template::Column::Id"
    )]
    Template,
    #[sea_orm(has_many = "super::sale_order_line::Entity")]
    Lines,
    #[sea_orm(has_many = "super::sale_order_option::Entity")]
    Options,
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<super::sale_order_template::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Template.def()
    }
}

impl Related<super::sale_order_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lines.def()
    }
}

impl Related<super::sale_order_option::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Options.def()
    }
}

#[async_trait]
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_quotations_are_editable() {
        assert!(SaleOrderState::Draft.is_quotation());
        assert!(SaleOrderState::Sent.is_quotation());
        assert!(!SaleOrderState::Sale.is_quotation());
        assert!(!SaleOrderState::Cancel.is_quotation());
    }

    #[test]
    fn state_display_matches_stored_value() {
        assert_eq!(SaleOrderState::Draft.to_string(), "draft");
        assert_eq!(SaleOrderState::Cancel.to_string(), "cancel");
        assert_eq!(
            serde_json::to_string(&SaleOrderState::Sale).unwrap(),
            "\"sale\""
        );
    }
}
