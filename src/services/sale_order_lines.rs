use std::sync::Arc;

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, TransactionTrait,
};
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use crate::{
    db::DbPool,
    entities::{
        product::{self, Entity as ProductEntity},
        sale_order_line::{self, ActiveModel as LineActiveModel, Entity as LineEntity, Model as LineModel},
    },
    errors::ServiceError,
    models::{Patch, SaleOrderLineValues},
    services::translations,
};

const DEFAULT_SEQUENCE: i32 = 10;

/// Fills `website_description` from the product's quotation description when
/// the change-set sets a product without supplying a non-empty description.
pub async fn inject_quotation_description<C: ConnectionTrait>(
    conn: &C,
    mut values: SaleOrderLineValues,
    lang: Option<&str>,
) -> Result<SaleOrderLineValues, ServiceError> {
    if values.website_description.is_truthy() {
        return Ok(values);
    }
    let Some(product_id) = values.product_id.value().copied() else {
        return Ok(values);
    };

    let product = load_product(conn, product_id).await?;
    let description = translations::product_quotation_description(conn, &product, lang).await?;
    debug!(product_id = %product_id, "Line description defaulted from product");
    values.website_description = Patch::from_option(description);
    Ok(values)
}

pub(crate) async fn load_product<C: ConnectionTrait>(
    conn: &C,
    product_id: Uuid,
) -> Result<product::Model, ServiceError> {
    ProductEntity::find_by_id(product_id)
        .one(conn)
        .await
        .map_err(|e| {
            error!(error = %e, product_id = %product_id, "Failed to load product");
            ServiceError::DatabaseError(e)
        })?
        .ok_or_else(|| ServiceError::not_found("Product", product_id))
}

/// Writes every present field of `values` into `line`.
fn apply_values(values: SaleOrderLineValues, line: &mut LineActiveModel) -> Result<(), ServiceError> {
    values.order_id.apply_required("order_id", &mut line.order_id)?;
    values.sequence.apply_required("sequence", &mut line.sequence)?;
    values.product_id.apply_nullable(&mut line.product_id);
    values.name.apply_required("name", &mut line.name)?;
    values
        .product_uom_qty
        .apply_required("product_uom_qty", &mut line.product_uom_qty)?;
    values.uom_id.apply_nullable(&mut line.uom_id);
    values.price_unit.apply_required("price_unit", &mut line.price_unit)?;
    values.discount.apply_required("discount", &mut line.discount)?;
    values
        .website_description
        .apply_nullable(&mut line.website_description);
    Ok(())
}

/// Service for order lines
#[derive(Clone)]
pub struct SaleOrderLineService {
    db_pool: Arc<DbPool>,
    lang: Option<String>,
}

impl SaleOrderLineService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            db_pool,
            lang: None,
        }
    }

    /// Resolves product descriptions in `lang` instead of the source value.
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    pub fn lang(&self) -> Option<&str> {
        self.lang.as_deref()
    }

    /// Creates a single line.
    #[instrument(skip(self, values))]
    pub async fn create_line(&self, values: SaleOrderLineValues) -> Result<LineModel, ServiceError> {
        let mut created = self.create_lines(vec![values]).await?;
        created
            .pop()
            .ok_or_else(|| ServiceError::InternalError("Line insert returned no record".to_string()))
    }

    /// Creates several lines in one transaction.
    #[instrument(skip(self, values_list), fields(count = values_list.len()))]
    pub async fn create_lines(
        &self,
        values_list: Vec<SaleOrderLineValues>,
    ) -> Result<Vec<LineModel>, ServiceError> {
        let db = &*self.db_pool;
        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for line creation");
            ServiceError::DatabaseError(e)
        })?;

        let mut created = Vec::with_capacity(values_list.len());
        for values in values_list {
            created.push(self.create_in(&txn, values).await?);
        }

        txn.commit().await.map_err(|e| {
            error!(error = %e, "Failed to commit line creation");
            ServiceError::DatabaseError(e)
        })?;

        info!(count = created.len(), "Order lines created");
        Ok(created)
    }

    /// Applies `values` to every line in `ids`.
    #[instrument(skip(self, values), fields(count = ids.len()))]
    pub async fn write_lines(
        &self,
        ids: &[Uuid],
        values: SaleOrderLineValues,
    ) -> Result<Vec<LineModel>, ServiceError> {
        let db = &*self.db_pool;
        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for line update");
            ServiceError::DatabaseError(e)
        })?;

        let updated = self.write_in(&txn, ids, values).await?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, "Failed to commit line update");
            ServiceError::DatabaseError(e)
        })?;

        info!(count = updated.len(), "Order lines updated");
        Ok(updated)
    }

    #[instrument(skip(self), fields(line_id = %line_id))]
    pub async fn get_line(&self, line_id: Uuid) -> Result<Option<LineModel>, ServiceError> {
        LineEntity::find_by_id(line_id)
            .one(&*self.db_pool)
            .await
            .map_err(|e| {
                error!(error = %e, line_id = %line_id, "Failed to fetch order line");
                ServiceError::DatabaseError(e)
            })
    }

    /// Lines of an order, by sequence.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn lines_for_order(&self, order_id: Uuid) -> Result<Vec<LineModel>, ServiceError> {
        LineEntity::find()
            .filter(sale_order_line::Column::OrderId.eq(order_id))
            .order_by_asc(sale_order_line::Column::Sequence)
            .all(&*self.db_pool)
            .await
            .map_err(|e| {
                error!(error = %e, order_id = %order_id, "Failed to fetch order lines");
                ServiceError::DatabaseError(e)
            })
    }

    /// Inserts a line on an existing connection. Name, unit price and unit
    /// default from the product when the change-set leaves them out.
    pub(crate) async fn create_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        values: SaleOrderLineValues,
    ) -> Result<LineModel, ServiceError> {
        let mut values = inject_quotation_description(conn, values, self.lang()).await?;

        let order_id = values
            .order_id
            .value()
            .copied()
            .ok_or_else(|| ServiceError::missing_field("order_id"))?;

        if let Some(product_id) = values.product_id.value().copied() {
            let product = load_product(conn, product_id).await?;
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

        let line_id = Uuid::new_v4();
        let mut line = LineActiveModel {
            id: Set(line_id),
            sequence: Set(DEFAULT_SEQUENCE),
            product_id: Set(None),
            product_uom_qty: Set(Decimal::ONE),
            uom_id: Set(None),
            price_unit: Set(Decimal::ZERO),
            discount: Set(Decimal::ZERO),
            website_description: Set(None),
            ..Default::default()
        };
        apply_values(values, &mut line)?;

        line.insert(conn).await.map_err(|e| {
            error!(error = %e, line_id = %line_id, order_id = %order_id, "Failed to insert order line");
            ServiceError::DatabaseError(e)
        })
    }

    pub(crate) async fn write_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        ids: &[Uuid],
        values: SaleOrderLineValues,
    ) -> Result<Vec<LineModel>, ServiceError> {
        let values = inject_quotation_description(conn, values, self.lang()).await?;

        let mut updated = Vec::with_capacity(ids.len());
        for &line_id in ids {
            let existing = LineEntity::find_by_id(line_id)
                .one(conn)
                .await
                .map_err(|e| {
                    error!(error = %e, line_id = %line_id, "Failed to fetch order line");
                    ServiceError::DatabaseError(e)
                })?
                .ok_or_else(|| ServiceError::not_found("Order line", line_id))?;

            let mut line = existing.into_active_model();
            apply_values(values.clone(), &mut line)?;

            updated.push(line.update(conn).await.map_err(|e| {
                error!(error = %e, line_id = %line_id, "Failed to update order line");
                ServiceError::DatabaseError(e)
            })?);
        }
        Ok(updated)
    }
}
