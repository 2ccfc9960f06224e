use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseTransaction,
    EntityName, EntityTrait, IntoActiveModel, QueryFilter, TransactionTrait,
};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    compute::{ComputedField, Model as ComputeModel, Recompute, RecomputeQueue},
    db::DbPool,
    entities::{
        customer::Entity as CustomerEntity,
        sale_order::{self, ActiveModel as OrderActiveModel, Entity as OrderEntity, Model as OrderModel, SaleOrderState},
        sale_order_line::{self, Entity as LineEntity},
        sale_order_option::{self, Entity as OptionEntity},
        sale_order_template::{self, Entity as TemplateEntity},
        sale_order_template_line, sale_order_template_option,
        translation::FIELD_WEBSITE_DESCRIPTION,
    },
    errors::ServiceError,
    models::{Patch, SaleOrderLineValues, SaleOrderOptionValues, SaleOrderValues},
    services::{
        sale_order_lines::SaleOrderLineService,
        sale_order_options::SaleOrderOptionService,
        sale_order_templates::{base_line_data, base_option_data, load_template},
        translations,
    },
};

/// Order line values for a template line: the base conversion plus the line's
/// description resolved in `lang`.
pub async fn compute_line_data_for_template_change<C: ConnectionTrait>(
    conn: &C,
    line: &sale_order_template_line::Model,
    lang: Option<&str>,
) -> Result<SaleOrderLineValues, ServiceError> {
    let mut values = base_line_data(line);
    let description = translations::resolve(
        conn,
        sale_order_template_line::Entity.table_name(),
        line.id,
        FIELD_WEBSITE_DESCRIPTION,
        lang,
        line.website_description.clone(),
    )
    .await?;
    values.website_description = Patch::from_option(description);
    Ok(values)
}

/// Option values for a template option: the base conversion plus the
/// option's description resolved in `lang`.
pub async fn compute_option_data_for_template_change<C: ConnectionTrait>(
    conn: &C,
    option: &sale_order_template_option::Model,
    lang: Option<&str>,
) -> Result<SaleOrderOptionValues, ServiceError> {
    let mut values = base_option_data(option);
    let description = translations::resolve(
        conn,
        sale_order_template_option::Entity.table_name(),
        option.id,
        FIELD_WEBSITE_DESCRIPTION,
        lang,
        option.website_description.clone(),
    )
    .await?;
    values.website_description = Patch::from_option(description);
    Ok(values)
}

/// Expiry of a quotation valid for `number_of_days` from `today`; `None`
/// when the template sets no validity.
pub fn validity_date_from(today: NaiveDate, number_of_days: i32) -> Result<Option<NaiveDate>, ServiceError> {
    if number_of_days <= 0 {
        return Ok(None);
    }
    today
        .checked_add_signed(Duration::days(i64::from(number_of_days)))
        .map(Some)
        .ok_or_else(|| {
            ServiceError::ValidationError(format!(
                "Validity of {} days is out of range",
                number_of_days
            ))
        })
}

async fn load_order<C: ConnectionTrait>(conn: &C, order_id: Uuid) -> Result<OrderModel, ServiceError> {
    OrderEntity::find_by_id(order_id)
        .one(conn)
        .await
        .map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to fetch order from database");
            ServiceError::DatabaseError(e)
        })?
        .ok_or_else(|| ServiceError::not_found("Sale order", order_id))
}

async fn ensure_customer<C: ConnectionTrait>(conn: &C, customer_id: Uuid) -> Result<(), ServiceError> {
    let found = CustomerEntity::find_by_id(customer_id)
        .one(conn)
        .await
        .map_err(|e| {
            error!(error = %e, customer_id = %customer_id, "Failed to load customer");
            ServiceError::DatabaseError(e)
        })?;
    match found {
        Some(_) => Ok(()),
        None => Err(ServiceError::not_found("Customer", customer_id)),
    }
}

fn apply_values(values: SaleOrderValues, order: &mut OrderActiveModel) -> Result<(), ServiceError> {
    values.name.apply_required("name", &mut order.name)?;
    values.customer_id.apply_required("customer_id", &mut order.customer_id)?;
    values.template_id.apply_nullable(&mut order.template_id);
    values
        .website_description
        .apply_nullable(&mut order.website_description);
    values.validity_date.apply_nullable(&mut order.validity_date);
    Ok(())
}

/// Service for sale order headers and quotation templates applied to them
#[derive(Clone)]
pub struct SaleOrderService {
    db_pool: Arc<DbPool>,
    default_lang: String,
}

impl SaleOrderService {
    pub fn new(db_pool: Arc<DbPool>, default_lang: impl Into<String>) -> Self {
        Self {
            db_pool,
            default_lang: default_lang.into(),
        }
    }

    /// Creates a draft order. Selecting a template fills the description from
    /// it unless the change-set carries one.
    #[instrument(skip(self, values))]
    pub async fn create_order(&self, values: SaleOrderValues) -> Result<OrderModel, ServiceError> {
        let db = &*self.db_pool;
        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for order creation");
            ServiceError::DatabaseError(e)
        })?;

        let customer_id = values
            .customer_id
            .value()
            .copied()
            .ok_or_else(|| ServiceError::missing_field("customer_id"))?;
        if values.name.is_omitted() {
            return Err(ServiceError::missing_field("name"));
        }
        ensure_customer(&txn, customer_id).await?;

        let order_id = Uuid::new_v4();
        let modified = values.modified_fields();
        let description_written = values.website_description.is_present();

        let mut order = OrderActiveModel {
            id: Set(order_id),
            template_id: Set(None),
            state: Set(SaleOrderState::Draft),
            website_description: Set(None),
            validity_date: Set(None),
            version: Set(1),
            ..Default::default()
        };
        apply_values(values, &mut order)?;

        order.insert(&txn).await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to create order in database");
            ServiceError::DatabaseError(e)
        })?;

        let mut queue = RecomputeQueue::new();
        queue.mark_modified(ComputeModel::SaleOrder, order_id, &modified);
        if description_written {
            queue.protect(ComputedField::OrderWebsiteDescription, order_id);
        }
        queue.flush(&txn, &[self as &dyn Recompute]).await?;
        let order = load_order(&txn, order_id).await?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to commit order creation transaction");
            ServiceError::DatabaseError(e)
        })?;

        info!(order_id = %order_id, customer_id = %customer_id, "Order created successfully");
        Ok(order)
    }

    /// Updates an order header. Changing the customer or template refreshes
    /// the description unless the same write sets it.
    #[instrument(skip(self, values), fields(order_id = %order_id))]
    pub async fn write_order(
        &self,
        order_id: Uuid,
        values: SaleOrderValues,
    ) -> Result<OrderModel, ServiceError> {
        let db = &*self.db_pool;
        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for order update");
            ServiceError::DatabaseError(e)
        })?;

        let mut queue = RecomputeQueue::new();
        self.write_in(&txn, order_id, values, &mut queue).await?;
        queue.flush(&txn, &[self as &dyn Recompute]).await?;
        let order = load_order(&txn, order_id).await?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to commit order update transaction");
            ServiceError::DatabaseError(e)
        })?;

        info!(order_id = %order_id, version = order.version, "Order updated successfully");
        Ok(order)
    }

    /// Retrieves an order by ID
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn get_order(&self, order_id: Uuid) -> Result<Option<OrderModel>, ServiceError> {
        OrderEntity::find_by_id(order_id)
            .one(&*self.db_pool)
            .await
            .map_err(|e| {
                error!(error = %e, order_id = %order_id, "Failed to fetch order from database");
                ServiceError::DatabaseError(e)
            })
    }

    #[instrument(skip(self, order_ids), fields(count = order_ids.len()))]
    pub async fn recompute_website_description(&self, order_ids: &[Uuid]) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for order recompute");
            ServiceError::DatabaseError(e)
        })?;

        self.compute_website_description(&txn, order_ids).await?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, "Failed to commit order recompute");
            ServiceError::DatabaseError(e)
        })?;
        Ok(())
    }

    /// Sets `template_id` on a quotation and rebuilds its lines and options
    /// from the template.
    #[instrument(skip(self), fields(order_id = %order_id, template_id = %template_id))]
    pub async fn apply_template(
        &self,
        order_id: Uuid,
        template_id: Uuid,
    ) -> Result<OrderModel, ServiceError> {
        let db = &*self.db_pool;
        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for template application");
            ServiceError::DatabaseError(e)
        })?;

        let order = load_order(&txn, order_id).await?;
        if !order.state.is_quotation() {
            warn!(order_id = %order_id, state = %order.state, "Template change refused");
            return Err(ServiceError::InvalidOperation(format!(
                "Cannot change the template of order {} in state {}",
                order.name, order.state
            )));
        }

        let entries = load_template(&txn, template_id).await?;
        let lang = translations::customer_lang(&txn, order.customer_id, &self.default_lang).await?;

        OptionEntity::delete_many()
            .filter(sale_order_option::Column::OrderId.eq(order_id))
            .exec(&txn)
            .await
            .map_err(|e| {
                error!(error = %e, order_id = %order_id, "Failed to remove order options");
                ServiceError::DatabaseError(e)
            })?;
        LineEntity::delete_many()
            .filter(sale_order_line::Column::OrderId.eq(order_id))
            .exec(&txn)
            .await
            .map_err(|e| {
                error!(error = %e, order_id = %order_id, "Failed to remove order lines");
                ServiceError::DatabaseError(e)
            })?;

        let validity_date = validity_date_from(Utc::now().date_naive(), entries.template.number_of_days)?;
        let mut queue = RecomputeQueue::new();
        self.write_in(
            &txn,
            order_id,
            SaleOrderValues {
                template_id: Patch::Value(template_id),
                validity_date: Patch::from_option(validity_date),
                ..Default::default()
            },
            &mut queue,
        )
        .await?;

        let lines = SaleOrderLineService::new(self.db_pool.clone()).with_lang(lang.clone());
        for template_line in &entries.lines {
            let mut values =
                compute_line_data_for_template_change(&txn, template_line, Some(lang.as_str()))
                    .await?;
            values.order_id = Patch::Value(order_id);
            lines.create_in(&txn, values).await?;
        }

        let options = SaleOrderOptionService::new(self.db_pool.clone(), self.default_lang.clone());
        for template_option in &entries.options {
            let mut values =
                compute_option_data_for_template_change(&txn, template_option, Some(lang.as_str())).await?;
            values.order_id = Patch::Value(order_id);
            options.create_in(&txn, values).await?;
        }

        queue.flush(&txn, &[self as &dyn Recompute]).await?;
        let order = load_order(&txn, order_id).await?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to commit template application");
            ServiceError::DatabaseError(e)
        })?;

        info!(
            order_id = %order_id,
            template_id = %template_id,
            lines = entries.lines.len(),
            options = entries.options.len(),
            "Quotation template applied"
        );
        Ok(order)
    }

    /// Copies the selected template's description, in the customer's
    /// language, onto each order. Orders without a template keep their value.
    pub async fn compute_website_description<C: ConnectionTrait>(
        &self,
        conn: &C,
        order_ids: &[Uuid],
    ) -> Result<(), ServiceError> {
        for &order_id in order_ids {
            let order = load_order(conn, order_id).await?;
            let Some(template_id) = order.template_id else {
                debug!(order_id = %order_id, "Order has no template, description kept");
                continue;
            };

            let template = TemplateEntity::find_by_id(template_id)
                .one(conn)
                .await
                .map_err(|e| {
                    error!(error = %e, template_id = %template_id, "Failed to load quotation template");
                    ServiceError::DatabaseError(e)
                })?
                .ok_or_else(|| ServiceError::not_found("Quotation template", template_id))?;

            let lang = translations::customer_lang(conn, order.customer_id, &self.default_lang).await?;
            let description = translations::resolve(
                conn,
                sale_order_template::Entity.table_name(),
                template.id,
                FIELD_WEBSITE_DESCRIPTION,
                Some(lang.as_str()),
                template.website_description,
            )
            .await?;

            if description == order.website_description {
                continue;
            }
            debug!(order_id = %order_id, template_id = %template_id, lang = %lang, "Order description copied from template");
            let mut active = order.into_active_model();
            active.website_description = Set(description);
            active.update(conn).await.map_err(|e| {
                error!(error = %e, order_id = %order_id, "Failed to store order description");
                ServiceError::DatabaseError(e)
            })?;
        }
        Ok(())
    }

    async fn write_in(
        &self,
        txn: &DatabaseTransaction,
        order_id: Uuid,
        values: SaleOrderValues,
        queue: &mut RecomputeQueue,
    ) -> Result<(), ServiceError> {
        let order = load_order(txn, order_id).await?;
        if let Some(customer_id) = values.customer_id.value() {
            ensure_customer(txn, *customer_id).await?;
        }
        let modified = values.modified_fields();
        let description_written = values.website_description.is_present();
        let version = order.version;

        let mut active: sale_order::ActiveModel = order.into_active_model();
        apply_values(values, &mut active)?;
        active.version = Set(version + 1);
        active.update(txn).await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to update order in database");
            ServiceError::DatabaseError(e)
        })?;

        queue.mark_modified(ComputeModel::SaleOrder, order_id, &modified);
        if description_written {
            queue.protect(ComputedField::OrderWebsiteDescription, order_id);
        }
        Ok(())
    }
}

#[async_trait]
impl Recompute for SaleOrderService {
    fn field(&self) -> ComputedField {
        ComputedField::OrderWebsiteDescription
    }

    async fn recompute(&self, txn: &DatabaseTransaction, ids: &[Uuid]) -> Result<(), ServiceError> {
        self.compute_website_description(txn, ids).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case(0, None)]
    #[case(-3, None)]
    #[case(30, Some(day(2024, 2, 29)))]
    #[case(1, Some(day(2024, 1, 31)))]
    fn validity_date_counts_days_from_today(#[case] days: i32, #[case] expected: Option<NaiveDate>) {
        assert_eq!(validity_date_from(day(2024, 1, 30), days).unwrap(), expected);
    }

    #[test]
    fn validity_date_out_of_range_is_rejected() {
        assert!(matches!(
            validity_date_from(NaiveDate::MAX, 1),
            Err(ServiceError::ValidationError(_))
        ));
    }
}
