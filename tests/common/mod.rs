#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{header::CONTENT_TYPE, Method, Request},
    response::Response,
    Router,
};
use quotedesk_api::{
    config::AppConfig,
    db,
    entities::{
        company::{self, CompanyType},
        employee, product, product_category, quotation_request, quotation_request_line_item,
        supplier_quotation,
    },
    events::{self, EventSender},
    AppState,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tower::ServiceExt;
use uuid::Uuid;

/// Helper harness for spinning up an application state backed by an in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        // One connection, so every query sees the same in-memory database.
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let (event_tx, event_rx) = mpsc::channel(256);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let state = AppState::new(Arc::new(pool), cfg, Arc::new(EventSender::new(event_tx)));
        let router = quotedesk_api::app_router(state.clone());

        Self {
            router,
            state,
            _event_task: event_task,
        }
    }

    pub fn db(&self) -> &sea_orm::DatabaseConnection {
        self.state.db.as_ref()
    }

    /// Sends a request with an optional JSON body.
    pub async fn request(&self, method: Method, path: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(path);
        let request = match body {
            Some(json) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");
        self.router.clone().oneshot(request).await.expect("response")
    }

    /// Sends an urlencoded form body as a browser would.
    pub async fn request_form(&self, method: Method, path: &str, body: &str) -> Response {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .expect("request");
        self.router.clone().oneshot(request).await.expect("response")
    }

    pub async fn seed_company(&self, name: &str, company_type: CompanyType) -> Uuid {
        company::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            email: Set("office@example.com".to_string()),
            phone: Set("+30 210 555 0101".to_string()),
            address: Set("1 Harbour Road, Piraeus, 18535".to_string()),
            country: Set("Greece".to_string()),
            company_type: Set(company_type),
            ..Default::default()
        }
        .insert(self.db())
        .await
        .expect("seed company")
        .id
    }

    pub async fn seed_employee(&self, company_id: Uuid) -> Uuid {
        employee::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set("Eleni Papadaki".to_string()),
            mobile: Set("+30 690 000 0000".to_string()),
            email: Set("eleni@example.com".to_string()),
            employee_position: Set("Purchasing".to_string()),
            position: Set("Manager".to_string()),
            company_id: Set(company_id),
            ..Default::default()
        }
        .insert(self.db())
        .await
        .expect("seed employee")
        .id
    }

    pub async fn seed_category(&self, name: &str) -> Uuid {
        product_category::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            attributes: Set(None),
            ..Default::default()
        }
        .insert(self.db())
        .await
        .expect("seed category")
        .id
    }

    pub async fn seed_product(&self, name: &str, category_id: Uuid) -> Uuid {
        product::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            ref_number: Set(100),
            description: Set(None),
            attributes: Set(Some(json!({"Grade": "A"}))),
            category_id: Set(category_id),
            ..Default::default()
        }
        .insert(self.db())
        .await
        .expect("seed product")
        .id
    }

    pub async fn seed_supplier_quotation(&self, line_item_id: Uuid, company_id: Uuid) -> Uuid {
        supplier_quotation::ActiveModel {
            id: Set(Uuid::new_v4()),
            line_item_id: Set(line_item_id),
            company_id: Set(company_id),
            supplier_date: Set(None),
            supplier_price: Set(None),
            lead_time: Set(None),
            client_date: Set(None),
            client_price: Set(None),
            accepted: Set(false),
            status: Set(0),
            created_at: Set(chrono::Utc::now()),
        }
        .insert(self.db())
        .await
        .expect("seed supplier quotation")
        .id
    }

    pub async fn product_count(&self) -> u64 {
        product::Entity::find()
            .count(self.db())
            .await
            .expect("count products")
    }

    pub async fn quotation_count(&self) -> u64 {
        quotation_request::Entity::find()
            .count(self.db())
            .await
            .expect("count quotations")
    }

    pub async fn products_named(&self, name: &str) -> Vec<product::Model> {
        product::Entity::find()
            .filter(product::Column::Name.eq(name))
            .all(self.db())
            .await
            .expect("products by name")
    }

    pub async fn line_items(&self, quotation_id: Uuid) -> Vec<quotation_request_line_item::Model> {
        quotation_request_line_item::Entity::find()
            .filter(quotation_request_line_item::Column::QuotationRequestId.eq(quotation_id))
            .order_by_asc(quotation_request_line_item::Column::Position)
            .all(self.db())
            .await
            .expect("line items")
    }
}

/// Company, employee and category every quotation test needs.
pub struct Parties {
    pub company_id: Uuid,
    pub employee_id: Uuid,
    pub category_id: Uuid,
}

impl Parties {
    pub async fn seed(app: &TestApp) -> Self {
        let company_id = app.seed_company("Aegean Shipping", CompanyType::Client).await;
        let employee_id = app.seed_employee(company_id).await;
        let category_id = app.seed_category("Deck Stores").await;
        Self {
            company_id,
            employee_id,
            category_id,
        }
    }

    /// A valid quotation header with the given line items.
    pub fn quotation(&self, line_items: Value) -> Value {
        json!({
            "quotation_request_ref": "RFQ-2025-001",
            "quotation_request_date": "2025-03-01",
            "quotation_request_vessel": "MV Aegean Star",
            "company_id": self.company_id.to_string(),
            "employee_id": self.employee_id.to_string(),
            "quotation_request_line_items": line_items,
        })
    }

    pub fn new_product_item(&self, name: &str, quantity: u32) -> Value {
        json!({
            "product_id": "new",
            "new_product_name": name,
            "new_product_ref": "77",
            "new_product_category_id": self.category_id.to_string(),
            "quotation_request_line_item_quantity": quantity,
            "attributes": []
        })
    }
}

pub fn existing_product_item(product_id: Uuid, quantity: u32) -> Value {
    json!({
        "product_id": product_id.to_string(),
        "quotation_request_line_item_quantity": quantity,
        "attributes": []
    })
}

pub async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}
