#![allow(dead_code)]

use std::sync::Arc;

use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityName, IntoActiveModel};
use uuid::Uuid;

use quotation_builder::{
    config::AppConfig,
    db::{self, DbPool},
    entities::{
        customer, product,
        sale_order::{self, SaleOrderState},
        sale_order_template, sale_order_template_line, sale_order_template_option,
    },
    models::{Patch, SaleOrderValues},
    services::QuotationServices,
};

pub const DEFAULT_LANG: &str = "en_US";

/// Services over a fresh, migrated in-memory SQLite database.
pub struct TestDb {
    pub pool: Arc<DbPool>,
    pub services: QuotationServices,
}

impl TestDb {
    pub async fn new() -> Self {
        let mut cfg = AppConfig::new("sqlite::memory:".to_string(), "test".to_string());
        cfg.db_max_connections = 1;
        cfg.auto_migrate = true;
        cfg.default_lang = DEFAULT_LANG.to_string();

        let pool = db::connect(&cfg)
            .await
            .expect("failed to create test database");

        let pool = Arc::new(pool);
        let services = QuotationServices::new(pool.clone(), &cfg);
        Self { pool, services }
    }

    pub async fn customer(&self, lang: Option<&str>) -> customer::Model {
        customer::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set("Azure Interior".to_string()),
            email: Set(Some("azure@example.com".to_string())),
            lang: Set(lang.map(str::to_string)),
            ..Default::default()
        }
        .insert(&*self.pool)
        .await
        .expect("insert customer")
    }

    pub async fn product(&self, name: &str, quotation_description: Option<&str>) -> product::Model {
        product::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            list_price: Set(Decimal::new(1950, 2)),
            uom_id: Set(None),
            quotation_description: Set(quotation_description.map(str::to_string)),
            ..Default::default()
        }
        .insert(&*self.pool)
        .await
        .expect("insert product")
    }

    pub async fn template(
        &self,
        website_description: Option<&str>,
        number_of_days: i32,
    ) -> sale_order_template::Model {
        sale_order_template::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set("Office furniture".to_string()),
            website_description: Set(website_description.map(str::to_string)),
            number_of_days: Set(number_of_days),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(&*self.pool)
        .await
        .expect("insert template")
    }

    pub async fn template_line(
        &self,
        template_id: Uuid,
        sequence: i32,
        product: Option<&product::Model>,
        website_description: Option<&str>,
    ) -> sale_order_template_line::Model {
        sale_order_template_line::ActiveModel {
            id: Set(Uuid::new_v4()),
            template_id: Set(template_id),
            sequence: Set(sequence),
            product_id: Set(product.map(|p| p.id)),
            name: Set(product.map_or_else(|| "Section".to_string(), |p| p.name.clone())),
            product_uom_qty: Set(Decimal::ONE),
            uom_id: Set(None),
            website_description: Set(website_description.map(str::to_string)),
        }
        .insert(&*self.pool)
        .await
        .expect("insert template line")
    }

    pub async fn template_option(
        &self,
        template_id: Uuid,
        sequence: i32,
        product: &product::Model,
        website_description: Option<&str>,
    ) -> sale_order_template_option::Model {
        sale_order_template_option::ActiveModel {
            id: Set(Uuid::new_v4()),
            template_id: Set(template_id),
            sequence: Set(sequence),
            product_id: Set(product.id),
            name: Set(product.name.clone()),
            quantity: Set(Decimal::ONE),
            uom_id: Set(None),
            website_description: Set(website_description.map(str::to_string)),
        }
        .insert(&*self.pool)
        .await
        .expect("insert template option")
    }

    pub async fn order(&self, customer_id: Uuid, template_id: Option<Uuid>) -> sale_order::Model {
        self.services
            .orders
            .create_order(SaleOrderValues {
                name: Patch::Value("S00042".to_string()),
                customer_id: Patch::Value(customer_id),
                template_id: template_id.map_or(Patch::Omitted, Patch::Value),
                ..Default::default()
            })
            .await
            .expect("create order")
    }

    pub async fn set_state(&self, order: sale_order::Model, state: SaleOrderState) -> sale_order::Model {
        let mut active = order.into_active_model();
        active.state = Set(state);
        active.update(&*self.pool).await.expect("update order state")
    }

    /// Stores a translation of `field` for a record of entity `E`.
    pub async fn translate<E: EntityName + Default>(
        &self,
        res_id: Uuid,
        field: &str,
        lang: &str,
        value: &str,
    ) {
        self.services
            .translations
            .set_translation(E::default().table_name(), res_id, field, lang, value)
            .await
            .expect("store translation");
    }
}

