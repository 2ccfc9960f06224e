use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseTransaction,
    EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    compute::{ComputedField, Model as ComputeModel, Recompute, RecomputeQueue},
    db::DbPool,
    entities::{
        sale_order::{self, Entity as OrderEntity},
        sale_order_line::{self, Entity as LineEntity, Model as LineModel},
        sale_order_option::{
            self, ActiveModel as OptionActiveModel, Entity as OptionEntity, Model as OptionModel,
        },
    },
    errors::ServiceError,
    models::{Patch, SaleOrderLineValues, SaleOrderOptionValues},
    services::{
        sale_order_lines::{load_product, SaleOrderLineService},
        translations,
    },
};

const DEFAULT_SEQUENCE: i32 = 10;

/// Order line values an option contributes when promoted: product, label,
/// quantity, pricing and position.
pub fn base_line_values(option: &OptionModel, sequence: i32) -> SaleOrderLineValues {
    SaleOrderLineValues {
        order_id: Patch::Value(option.order_id),
        sequence: Patch::Value(sequence),
        product_id: Patch::from_option(option.product_id),
        name: Patch::Value(option.name.clone()),
        product_uom_qty: Patch::Value(option.quantity),
        uom_id: Patch::from_option(option.uom_id),
        price_unit: Patch::Value(option.price_unit),
        discount: Patch::Value(option.discount),
        ..Default::default()
    }
}

/// Order line values for promoting `option`, placed at `sequence`: the base
/// values plus the option's website description.
pub fn get_values_to_add_to_order(option: &OptionModel, sequence: i32) -> SaleOrderLineValues {
    SaleOrderLineValues {
        website_description: Patch::from_option(option.website_description.clone()),
        ..base_line_values(option, sequence)
    }
}

fn apply_values(
    values: SaleOrderOptionValues,
    option: &mut OptionActiveModel,
) -> Result<(), ServiceError> {
    values.order_id.apply_required("order_id", &mut option.order_id)?;
    values.sequence.apply_required("sequence", &mut option.sequence)?;
    values.product_id.apply_nullable(&mut option.product_id);
    values.uom_id.apply_nullable(&mut option.uom_id);
    values.name.apply_required("name", &mut option.name)?;
    values.quantity.apply_required("quantity", &mut option.quantity)?;
    values.price_unit.apply_required("price_unit", &mut option.price_unit)?;
    values.discount.apply_required("discount", &mut option.discount)?;
    values
        .website_description
        .apply_nullable(&mut option.website_description);
    Ok(())
}

async fn load_order<C: ConnectionTrait>(
    conn: &C,
    order_id: Uuid,
) -> Result<sale_order::Model, ServiceError> {
    OrderEntity::find_by_id(order_id)
        .one(conn)
        .await
        .map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to load sale order");
            ServiceError::DatabaseError(e)
        })?
        .ok_or_else(|| ServiceError::not_found("Sale order", order_id))
}

async fn load_option<C: ConnectionTrait>(
    conn: &C,
    option_id: Uuid,
) -> Result<OptionModel, ServiceError> {
    OptionEntity::find_by_id(option_id)
        .one(conn)
        .await
        .map_err(|e| {
            error!(error = %e, option_id = %option_id, "Failed to load order option");
            ServiceError::DatabaseError(e)
        })?
        .ok_or_else(|| ServiceError::not_found("Order option", option_id))
}

/// Service for optional products on quotations
#[derive(Clone)]
pub struct SaleOrderOptionService {
    db_pool: Arc<DbPool>,
    default_lang: String,
}

impl SaleOrderOptionService {
    pub fn new(db_pool: Arc<DbPool>, default_lang: impl Into<String>) -> Self {
        Self {
            db_pool,
            default_lang: default_lang.into(),
        }
    }

    /// Creates an option; its description is precomputed from the product
    /// unless the change-set carries one.
    #[instrument(skip(self, values))]
    pub async fn create_option(
        &self,
        values: SaleOrderOptionValues,
    ) -> Result<OptionModel, ServiceError> {
        let db = &*self.db_pool;
        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for option creation");
            ServiceError::DatabaseError(e)
        })?;

        let option = self.create_in(&txn, values).await?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, option_id = %option.id, "Failed to commit option creation");
            ServiceError::DatabaseError(e)
        })?;

        info!(option_id = %option.id, order_id = %option.order_id, "Order option created");
        Ok(option)
    }

    /// Updates an option. Changing its product or unit refreshes the
    /// description, unless the same write sets the description.
    #[instrument(skip(self, values), fields(option_id = %option_id))]
    pub async fn write_option(
        &self,
        option_id: Uuid,
        values: SaleOrderOptionValues,
    ) -> Result<OptionModel, ServiceError> {
        let db = &*self.db_pool;
        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for option update");
            ServiceError::DatabaseError(e)
        })?;

        let mut queue = RecomputeQueue::new();
        self.write_in(&txn, option_id, values, &mut queue).await?;
        queue.flush(&txn, &[self as &dyn Recompute]).await?;
        let option = load_option(&txn, option_id).await?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, option_id = %option_id, "Failed to commit option update");
            ServiceError::DatabaseError(e)
        })?;

        info!(option_id = %option_id, "Order option updated");
        Ok(option)
    }

    #[instrument(skip(self), fields(option_id = %option_id))]
    pub async fn get_option(&self, option_id: Uuid) -> Result<Option<OptionModel>, ServiceError> {
        OptionEntity::find_by_id(option_id)
            .one(&*self.db_pool)
            .await
            .map_err(|e| {
                error!(error = %e, option_id = %option_id, "Failed to fetch order option");
                ServiceError::DatabaseError(e)
            })
    }

    /// Options of an order, by sequence.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn options_for_order(&self, order_id: Uuid) -> Result<Vec<OptionModel>, ServiceError> {
        OptionEntity::find()
            .filter(sale_order_option::Column::OrderId.eq(order_id))
            .order_by_asc(sale_order_option::Column::Sequence)
            .all(&*self.db_pool)
            .await
            .map_err(|e| {
                error!(error = %e, order_id = %order_id, "Failed to fetch order options");
                ServiceError::DatabaseError(e)
            })
    }

    /// Recomputes the description of `option_ids` from their products.
    #[instrument(skip(self, option_ids), fields(count = option_ids.len()))]
    pub async fn recompute_website_description(
        &self,
        option_ids: &[Uuid],
    ) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for option recompute");
            ServiceError::DatabaseError(e)
        })?;

        self.compute_website_description(&txn, option_ids).await?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, "Failed to commit option recompute");
            ServiceError::DatabaseError(e)
        })?;
        Ok(())
    }

    /// Adds the option to its order as a regular line and links the two.
    #[instrument(skip(self), fields(option_id = %option_id))]
    pub async fn add_option_to_order(&self, option_id: Uuid) -> Result<LineModel, ServiceError> {
        let db = &*self.db_pool;
        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for option promotion");
            ServiceError::DatabaseError(e)
        })?;

        let option = load_option(&txn, option_id).await?;
        let order = load_order(&txn, option.order_id).await?;

        if !order.state.is_quotation() {
            warn!(option_id = %option_id, order_id = %order.id, state = %order.state, "Option promotion refused");
            return Err(ServiceError::InvalidOperation(format!(
                "Cannot add options to order {} in state {}",
                order.name, order.state
            )));
        }
        if option.is_promoted() {
            warn!(option_id = %option_id, "Option already added to the order");
            return Err(ServiceError::InvalidOperation(format!(
                "Option {} was already added to order {}",
                option.name, order.name
            )));
        }

        let last_sequence: Option<i32> = LineEntity::find()
            .select_only()
            .column_as(sale_order_line::Column::Sequence.max(), "max_sequence")
            .filter(sale_order_line::Column::OrderId.eq(order.id))
            .into_tuple::<Option<i32>>()
            .one(&txn)
            .await
            .map_err(|e| {
                error!(error = %e, order_id = %order.id, "Failed to read last line sequence");
                ServiceError::DatabaseError(e)
            })?
            .flatten();
        let sequence = match last_sequence {
            None => DEFAULT_SEQUENCE,
            Some(seq) => seq.checked_add(1).ok_or_else(|| {
                warn!(order_id = %order.id, "No line sequence left after the last line");
                ServiceError::ValidationError(format!(
                    "Order {} has no sequence left for a new line",
                    order.name
                ))
            })?,
        };

        let lang = translations::customer_lang(&txn, order.customer_id, &self.default_lang).await?;
        let lines = SaleOrderLineService::new(self.db_pool.clone()).with_lang(lang);
        let line = lines
            .create_in(&txn, get_values_to_add_to_order(&option, sequence))
            .await?;

        let mut promoted = option.into_active_model();
        promoted.line_id = Set(Some(line.id));
        promoted.update(&txn).await.map_err(|e| {
            error!(error = %e, option_id = %option_id, "Failed to link option to its order line");
            ServiceError::DatabaseError(e)
        })?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, option_id = %option_id, "Failed to commit option promotion");
            ServiceError::DatabaseError(e)
        })?;

        info!(option_id = %option_id, line_id = %line.id, order_id = %order.id, "Option added to order");
        Ok(line)
    }

    /// Stores the product's quotation description, in the order customer's
    /// language, on every option in `option_ids` that has a product.
    pub async fn compute_website_description<C: ConnectionTrait>(
        &self,
        conn: &C,
        option_ids: &[Uuid],
    ) -> Result<(), ServiceError> {
        for &option_id in option_ids {
            let option = load_option(conn, option_id).await?;
            let Some(product_id) = option.product_id else {
                debug!(option_id = %option_id, "Option has no product, description kept");
                continue;
            };

            let order = load_order(conn, option.order_id).await?;
            let lang = translations::customer_lang(conn, order.customer_id, &self.default_lang).await?;
            let product = load_product(conn, product_id).await?;
            let description =
                translations::product_quotation_description(conn, &product, Some(lang.as_str())).await?;

            if description == option.website_description {
                continue;
            }
            let mut active = option.into_active_model();
            active.website_description = Set(description);
            active.update(conn).await.map_err(|e| {
                error!(error = %e, option_id = %option_id, "Failed to store option description");
                ServiceError::DatabaseError(e)
            })?;
        }
        Ok(())
    }

    pub(crate) async fn create_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        mut values: SaleOrderOptionValues,
    ) -> Result<OptionModel, ServiceError> {
        let order_id = values
            .order_id
            .value()
            .copied()
            .ok_or_else(|| ServiceError::missing_field("order_id"))?;
        let order = load_order(conn, order_id).await?;

        if let Some(product_id) = values.product_id.value().copied() {
            let product = load_product(conn, product_id).await?;
            if values.website_description.is_omitted() {
                let lang =
                    translations::customer_lang(conn, order.customer_id, &self.default_lang).await?;
                values.website_description = Patch::from_option(
                    translations::product_quotation_description(conn, &product, Some(lang.as_str()))
                        .await?,
                );
            }
            if values.name.is_omitted() {
                values.name = Patch::Value(product.name);
            }
            if values.price_unit.is_omitted() {
                values.price_unit = Patch::Value(product.list_price);
            }
            if values.uom_id.is_omitted() {
                values.uom_id = Patch::from_option(product.uom_id);
            }
        }
        if values.name.is_omitted() {
            return Err(ServiceError::missing_field("name"));
        }

        let option_id = Uuid::new_v4();
        let mut option = OptionActiveModel {
            id: Set(option_id),
            sequence: Set(DEFAULT_SEQUENCE),
            product_id: Set(None),
            uom_id: Set(None),
            quantity: Set(Decimal::ONE),
            price_unit: Set(Decimal::ZERO),
            discount: Set(Decimal::ZERO),
            line_id: Set(None),
            website_description: Set(None),
            ..Default::default()
        };
        apply_values(values, &mut option)?;

        option.insert(conn).await.map_err(|e| {
            error!(error = %e, option_id = %option_id, order_id = %order_id, "Failed to insert order option");
            ServiceError::DatabaseError(e)
        })
    }

    async fn write_in(
        &self,
        txn: &DatabaseTransaction,
        option_id: Uuid,
        values: SaleOrderOptionValues,
        queue: &mut RecomputeQueue,
    ) -> Result<(), ServiceError> {
        let option = load_option(txn, option_id).await?;
        let modified = values.modified_fields();
        let description_written = values.website_description.is_present();

        let mut active = option.into_active_model();
        apply_values(values, &mut active)?;
        active.update(txn).await.map_err(|e| {
            error!(error = %e, option_id = %option_id, "Failed to update order option");
            ServiceError::DatabaseError(e)
        })?;

        queue.mark_modified(ComputeModel::SaleOrderOption, option_id, &modified);
        if description_written {
            queue.protect(ComputedField::OptionWebsiteDescription, option_id);
        }
        Ok(())
    }
}

#[async_trait]
impl Recompute for SaleOrderOptionService {
    fn field(&self) -> ComputedField {
        ComputedField::OptionWebsiteDescription
    }

    async fn recompute(&self, txn: &DatabaseTransaction, ids: &[Uuid]) -> Result<(), ServiceError> {
        self.compute_website_description(txn, ids).await
    }
}
