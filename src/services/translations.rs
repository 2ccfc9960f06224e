use std::sync::Arc;

use sea_orm::{
    sea_query::OnConflict, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityName,
    EntityTrait, QueryFilter,
};
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::{
    db::DbPool,
    entities::{
        customer::Entity as CustomerEntity,
        product,
        translation::{self, ActiveModel as TranslationActiveModel, Entity as TranslationEntity},
    },
    errors::ServiceError,
};

/// Resolves `field` of record (`res_model`, `res_id`) in `lang`.
///
/// Returns the stored translation when it exists and is non-empty, otherwise
/// `source` (the default-language column value). `None` as `lang` always
/// yields `source`.
pub async fn resolve<C: ConnectionTrait>(
    conn: &C,
    res_model: &str,
    res_id: Uuid,
    field: &str,
    lang: Option<&str>,
    source: Option<String>,
) -> Result<Option<String>, ServiceError> {
    let Some(lang) = lang else {
        return Ok(source);
    };

    let stored = TranslationEntity::find()
        .filter(translation::Column::ResModel.eq(res_model))
        .filter(translation::Column::ResId.eq(res_id))
        .filter(translation::Column::Field.eq(field))
        .filter(translation::Column::Lang.eq(lang))
        .one(conn)
        .await
        .map_err(|e| {
            error!(error = %e, res_model, res_id = %res_id, field, lang, "Failed to load translation");
            ServiceError::DatabaseError(e)
        })?;

    Ok(match stored {
        Some(t) if !t.value.is_empty() => Some(t.value),
        _ => source,
    })
}

/// Stores `value` as the `lang` variant of the field, replacing any previous one.
pub async fn set_translation<C: ConnectionTrait>(
    conn: &C,
    res_model: &str,
    res_id: Uuid,
    field: &str,
    lang: &str,
    value: String,
) -> Result<(), ServiceError> {
    let model = TranslationActiveModel {
        id: Set(Uuid::new_v4()),
        res_model: Set(res_model.to_string()),
        res_id: Set(res_id),
        field: Set(field.to_string()),
        lang: Set(lang.to_string()),
        value: Set(value),
    };

    TranslationEntity::insert(model)
        .on_conflict(
            OnConflict::columns([
                translation::Column::ResModel,
                translation::Column::ResId,
                translation::Column::Field,
                translation::Column::Lang,
            ])
            .update_column(translation::Column::Value)
            .to_owned(),
        )
        .exec_without_returning(conn)
        .await
        .map_err(|e| {
            error!(error = %e, res_model, res_id = %res_id, field, lang, "Failed to store translation");
            ServiceError::DatabaseError(e)
        })?;

    Ok(())
}

/// The customer's language, or `default` when the customer has none.
pub async fn customer_lang<C: ConnectionTrait>(
    conn: &C,
    customer_id: Uuid,
    default: &str,
) -> Result<String, ServiceError> {
    let customer = CustomerEntity::find_by_id(customer_id)
        .one(conn)
        .await
        .map_err(|e| {
            error!(error = %e, customer_id = %customer_id, "Failed to load customer");
            ServiceError::DatabaseError(e)
        })?
        .ok_or_else(|| ServiceError::not_found("Customer", customer_id))?;

    Ok(customer
        .lang
        .filter(|lang| !lang.is_empty())
        .unwrap_or_else(|| default.to_string()))
}

/// Maintains per-language values of translatable rich-text fields.
#[derive(Clone)]
pub struct TranslationService {
    db_pool: Arc<DbPool>,
}

impl TranslationService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self, value), fields(res_model = %res_model, res_id = %res_id, field = %field, lang = %lang))]
    pub async fn set_translation(
        &self,
        res_model: &str,
        res_id: Uuid,
        field: &str,
        lang: &str,
        value: impl Into<String>,
    ) -> Result<(), ServiceError> {
        set_translation(&*self.db_pool, res_model, res_id, field, lang, value.into()).await?;
        info!("Translation stored");
        Ok(())
    }

    #[instrument(skip(self, source), fields(res_model = %res_model, res_id = %res_id, field = %field))]
    pub async fn resolve(
        &self,
        res_model: &str,
        res_id: Uuid,
        field: &str,
        lang: Option<&str>,
        source: Option<String>,
    ) -> Result<Option<String>, ServiceError> {
        resolve(&*self.db_pool, res_model, res_id, field, lang, source).await
    }
}

/// The product's quotation description in `lang`.
pub async fn product_quotation_description<C: ConnectionTrait>(
    conn: &C,
    product: &product::Model,
    lang: Option<&str>,
) -> Result<Option<String>, ServiceError> {
    resolve(
        conn,
        product::Entity.table_name(),
        product.id,
        translation::FIELD_QUOTATION_DESCRIPTION,
        lang,
        product.quotation_description.clone(),
    )
    .await
}
