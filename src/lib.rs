//! QuoteDesk API Library
//!
//! Back office for a marine supply business: companies and their employees,
//! the product catalog, and quotation requests whose line items may introduce
//! new products in the same submission.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod commands;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod forms;
pub mod handlers;
pub mod migrator;
pub mod repositories;
pub mod services;
pub mod validation;

use axum::{response::Json, routing::get, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::db::DbPool;
use crate::events::EventSender;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbPool>,
    pub config: config::AppConfig,
    pub event_sender: Arc<EventSender>,
    pub services: handlers::AppServices,
}

impl AppState {
    /// Wires every service onto one shared connection and event channel.
    pub fn new(db: Arc<DbPool>, config: config::AppConfig, event_sender: Arc<EventSender>) -> Self {
        let services = handlers::AppServices::new(db.clone(), event_sender.clone());
        Self {
            db,
            config,
            event_sender,
            services,
        }
    }
}

pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .route("/status", get(api_status))
        .merge(handlers::quotations::quotation_routes())
        .merge(handlers::products::product_routes())
        .merge(handlers::product_categories::product_category_routes())
        .merge(handlers::companies::company_routes())
        .merge(handlers::employees::employee_routes())
        .merge(handlers::supplier_quotations::supplier_quotation_routes())
}

/// Full application router: health probes plus the versioned API, traced.
pub fn app_router(state: AppState) -> Router {
    Router::<AppState>::new()
        .merge(handlers::health::health_routes())
        .nest("/api/v1", api_v1_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn api_status() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "quotedesk-api",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
