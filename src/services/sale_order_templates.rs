//! Conversion of quotation template entries into order change-sets.

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};
use tracing::error;
use uuid::Uuid;

use crate::{
    entities::{
        sale_order_template::{self, Entity as TemplateEntity},
        sale_order_template_line::{self, Entity as TemplateLineEntity},
        sale_order_template_option::{self, Entity as TemplateOptionEntity},
    },
    errors::ServiceError,
    models::{Patch, SaleOrderLineValues, SaleOrderOptionValues},
};

/// A template with its lines and options, each ordered by sequence.
#[derive(Debug, Clone)]
pub struct TemplateWithEntries {
    pub template: sale_order_template::Model,
    pub lines: Vec<sale_order_template_line::Model>,
    pub options: Vec<sale_order_template_option::Model>,
}

pub async fn load_template<C: ConnectionTrait>(
    conn: &C,
    template_id: Uuid,
) -> Result<TemplateWithEntries, ServiceError> {
    let template = TemplateEntity::find_by_id(template_id)
        .one(conn)
        .await
        .map_err(|e| {
            error!(error = %e, template_id = %template_id, "Failed to load quotation template");
            ServiceError::DatabaseError(e)
        })?
        .ok_or_else(|| ServiceError::not_found("Quotation template", template_id))?;

    let lines = TemplateLineEntity::find()
        .filter(sale_order_template_line::Column::TemplateId.eq(template_id))
        .order_by_asc(sale_order_template_line::Column::Sequence)
        .all(conn)
        .await
        .map_err(|e| {
            error!(error = %e, template_id = %template_id, "Failed to load template lines");
            ServiceError::DatabaseError(e)
        })?;

    let options = TemplateOptionEntity::find()
        .filter(sale_order_template_option::Column::TemplateId.eq(template_id))
        .order_by_asc(sale_order_template_option::Column::Sequence)
        .all(conn)
        .await
        .map_err(|e| {
            error!(error = %e, template_id = %template_id, "Failed to load template options");
            ServiceError::DatabaseError(e)
        })?;

    Ok(TemplateWithEntries {
        template,
        lines,
        options,
    })
}

/// Order line values a template line contributes: product, label, quantity,
/// unit and position.
pub fn base_line_data(line: &sale_order_template_line::Model) -> SaleOrderLineValues {
    SaleOrderLineValues {
        sequence: Patch::Value(line.sequence),
        product_id: Patch::from_option(line.product_id),
        name: Patch::Value(line.name.clone()),
        product_uom_qty: Patch::Value(line.product_uom_qty),
        uom_id: Patch::from_option(line.uom_id),
        ..Default::default()
    }
}

/// Optional product values a template option contributes.
pub fn base_option_data(option: &sale_order_template_option::Model) -> SaleOrderOptionValues {
    SaleOrderOptionValues {
        sequence: Patch::Value(option.sequence),
        product_id: Patch::Value(option.product_id),
        name: Patch::Value(option.name.clone()),
        quantity: Patch::Value(option.quantity),
        uom_id: Patch::from_option(option.uom_id),
        ..Default::default()
    }
}
