use std::sync::Arc;

use crate::{config::AppConfig, db::DbPool};

pub mod sale_order_lines;
pub mod sale_order_options;
pub mod sale_order_templates;
pub mod sale_orders;
pub mod translations;

use sale_order_lines::SaleOrderLineService;
use sale_order_options::SaleOrderOptionService;
use sale_orders::SaleOrderService;
use translations::TranslationService;

/// The services sharing one pool and default language.
#[derive(Clone)]
pub struct QuotationServices {
    pub orders: Arc<SaleOrderService>,
    pub lines: Arc<SaleOrderLineService>,
    pub options: Arc<SaleOrderOptionService>,
    pub translations: Arc<TranslationService>,
}

impl QuotationServices {
    pub fn new(db_pool: Arc<DbPool>, config: &AppConfig) -> Self {
        let default_lang = config.default_lang();
        Self {
            orders: Arc::new(SaleOrderService::new(db_pool.clone(), default_lang)),
            lines: Arc::new(SaleOrderLineService::new(db_pool.clone()).with_lang(default_lang)),
            options: Arc::new(SaleOrderOptionService::new(db_pool.clone(), default_lang)),
            translations: Arc::new(TranslationService::new(db_pool)),
        }
    }
}
