pub mod common;
pub mod companies;
pub mod employees;
pub mod health;
pub mod product_categories;
pub mod products;
pub mod quotations;
pub mod supplier_quotations;

use crate::events::EventSender;
use crate::services::{
    companies::CompanyService, employees::EmployeeService,
    product_categories::ProductCategoryService, products::ProductService,
    quotations::QuotationService, supplier_quotations::SupplierQuotationService,
};
use crate::db::DbPool;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub quotations: Arc<QuotationService>,
    pub products: Arc<ProductService>,
    pub product_categories: Arc<ProductCategoryService>,
    pub companies: Arc<CompanyService>,
    pub employees: Arc<EmployeeService>,
    pub supplier_quotations: Arc<SupplierQuotationService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            quotations: Arc::new(QuotationService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            products: Arc::new(ProductService::new(db_pool.clone(), event_sender.clone())),
            product_categories: Arc::new(ProductCategoryService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            companies: Arc::new(CompanyService::new(db_pool.clone(), event_sender.clone())),
            employees: Arc::new(EmployeeService::new(db_pool.clone(), event_sender)),
            supplier_quotations: Arc::new(SupplierQuotationService::new(db_pool)),
        }
    }
}
