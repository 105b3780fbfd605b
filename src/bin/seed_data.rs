//! Seed data script - populates the database with demo data
//!
//! Run with: cargo run --bin seed-data
//!
//! This creates:
//! - 4 companies (clients, suppliers, two-way) with employees
//! - 3 product categories and 8 products
//! - 5 quotation requests, submitted through the same pipeline as the API
//! - Supplier quotations for some of their line items

use chrono::{Duration, Utc};
use rand::{seq::SliceRandom, Rng};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration as StdDuration;
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use quotedesk_api::entities::{
    company::{self, CompanyType},
    employee, product, product_category, supplier_quotation,
};
use quotedesk_api::events::{process_events, EventSender};
use quotedesk_api::forms::SubmissionOutcome;
use quotedesk_api::repositories::QuotationRepository;
use quotedesk_api::services::quotations::QuotationService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    info!("=== QuoteDesk Seed Data ===");

    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://quotedesk.db?mode=rwc".to_string());

    let mut options = ConnectOptions::new(database_url.clone());
    options
        .max_connections(5)
        .min_connections(1)
        .connect_timeout(StdDuration::from_secs(10))
        .acquire_timeout(StdDuration::from_secs(10));

    info!("Connecting to database: {}", database_url);
    let db = Database::connect(options).await?;
    quotedesk_api::db::run_migrations(&db).await?;

    info!("Creating companies and employees...");
    let companies = create_companies(&db).await?;
    let employees = create_employees(&db, &companies).await?;
    info!("  Created {} companies, {} employees", companies.len(), employees.len());

    info!("Creating catalog...");
    let categories = create_categories(&db).await?;
    let products = create_products(&db, &categories).await?;
    info!("  Created {} categories, {} products", categories.len(), products.len());

    info!("Creating quotation requests...");
    let db = Arc::new(db);
    let quotations = create_quotations(db.clone(), &employees, &products, &categories).await?;
    info!("  Created {} quotation requests", quotations.len());

    info!("Creating supplier quotations...");
    let suppliers: Vec<&company::Model> = companies
        .iter()
        .filter(|c| c.company_type != CompanyType::Client)
        .collect();
    let quote_count = create_supplier_quotations(db.as_ref(), &quotations, &suppliers).await?;
    info!("  Created {} supplier quotations", quote_count);

    info!("=== Seed Data Complete ===");
    info!("Try these API calls:");
    info!("  curl http://localhost:8080/api/v1/quotations");
    info!("  curl http://localhost:8080/api/v1/products/options?search=ho");
    info!("  curl http://localhost:8080/api/v1/companies?company_type=2");

    Ok(())
}

async fn create_companies(db: &DatabaseConnection) -> anyhow::Result<Vec<company::Model>> {
    let companies_data = vec![
        ("Aegean Shipping Ltd", "ops@aegeanshipping.example", "+30 210 555 0101", "12 Akti Miaouli, Piraeus, 185 35", "Greece", CompanyType::Client),
        ("Nordic Tankers AS", "purchasing@nordictankers.example", "+47 55 55 01 02", "Strandkaien 4, Suite 2, Bergen, 5013", "Norway", CompanyType::Client),
        ("Harbor Marine Supply", "sales@harbormarine.example", "+1 (415) 555-0103", "Pier 50, San Francisco, 94158", "United States", CompanyType::Supplier),
        ("Delta Ship Chandlers", "info@deltachandlers.example", "+31 10 555 0104", "Waalhaven 7, Rotterdam, 3089", "Netherlands", CompanyType::TwoWay),
    ];

    let mut created = Vec::new();
    for (name, email, phone, address, country, company_type) in companies_data {
        let model = company::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            email: Set(email.to_string()),
            phone: Set(phone.to_string()),
            address: Set(address.to_string()),
            country: Set(country.to_string()),
            company_type: Set(company_type),
            ..Default::default()
        }
        .insert(db)
        .await?;
        created.push(model);
    }
    Ok(created)
}

async fn create_employees(
    db: &DatabaseConnection,
    companies: &[company::Model],
) -> anyhow::Result<Vec<employee::Model>> {
    let people = [
        ("Eleni Papadaki", "Purchasing Manager", "Manager"),
        ("Lars Hovland", "Superintendent", "Technical"),
        ("Maria Lopez", "Sales Representative", "Sales"),
        ("Pieter de Vries", "Account Manager", "Sales"),
    ];

    let mut rng = rand::thread_rng();
    let mut created = Vec::new();
    for (company, (name, employee_position, position)) in companies.iter().zip(people) {
        let first = name.split(' ').next().unwrap_or(name).to_lowercase();
        let domain = company.email.split('@').nth(1).unwrap_or("example.com");
        let model = employee::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            mobile: Set(format!("+44 7700 {:06}", rng.gen_range(0..1_000_000))),
            email: Set(format!("{}@{}", first, domain)),
            employee_position: Set(employee_position.to_string()),
            position: Set(position.to_string()),
            company_id: Set(company.id),
            ..Default::default()
        }
        .insert(db)
        .await?;
        created.push(model);
    }
    Ok(created)
}

async fn create_categories(
    db: &DatabaseConnection,
) -> anyhow::Result<Vec<product_category::Model>> {
    let categories_data = vec![
        ("Deck Stores", json!({"Unit": "pcs"})),
        ("Engine Spares", json!({"Maker": "", "Model": ""})),
        ("Chemicals", json!({"Unit": "L", "Hazard class": "8"})),
    ];

    let mut created = Vec::new();
    for (name, attributes) in categories_data {
        let model = product_category::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            attributes: Set(Some(attributes)),
            ..Default::default()
        }
        .insert(db)
        .await?;
        created.push(model);
    }
    Ok(created)
}

async fn create_products(
    db: &DatabaseConnection,
    categories: &[product_category::Model],
) -> anyhow::Result<Vec<product::Model>> {
    let products_data = vec![
        ("Mooring Rope 40mm", 1001, "Polypropylene, 220m coil", 0, json!({"Length": "220m", "Diameter": "40mm"})),
        ("Hydraulic Hose", 1002, "High pressure, 2 wire braid", 0, json!({"Pressure": "350 bar"})),
        ("Safety Shackle", 1003, "Galvanized, bolt type", 0, json!({"WLL": "3.25t"})),
        ("Fuel Injector Nozzle", 2001, "Main engine injector nozzle", 1, json!({"Maker": "MAN"})),
        ("Piston Ring Set", 2002, "Complete set per cylinder", 1, json!({"Bore": "500mm"})),
        ("Turbocharger Gasket", 2003, "Exhaust side gasket", 1, json!({})),
        ("Degreaser", 3001, "Water based heavy duty degreaser", 2, json!({"Size": "25L"})),
        ("Boiler Water Treatment", 3002, "Alkalinity and scale control", 2, json!({"Size": "20L"})),
    ];

    let mut created = Vec::new();
    for (name, ref_number, description, category, attributes) in products_data {
        let attributes = match attributes.as_object() {
            Some(map) if map.is_empty() => None,
            _ => Some(attributes),
        };
        let model = product::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            ref_number: Set(ref_number),
            description: Set(Some(description.to_string())),
            attributes: Set(attributes),
            category_id: Set(categories[category].id),
            ..Default::default()
        }
        .insert(db)
        .await?;
        created.push(model);
    }
    Ok(created)
}

/// Submits quotations through the service so they take the same path as
/// real requests, including one that introduces a new product.
async fn create_quotations(
    db: Arc<DatabaseConnection>,
    employees: &[employee::Model],
    products: &[product::Model],
    categories: &[product_category::Model],
) -> anyhow::Result<Vec<Uuid>> {
    let (tx, rx) = mpsc::channel(64);
    let events = tokio::spawn(process_events(rx));
    let service = QuotationService::new(db, Arc::new(EventSender::new(tx)));

    let vessels = ["MV Aegean Star", "MT Nordic Breeze", "MV Ocean Pearl", "MT Fjord Spirit", "MV Blue Horizon"];
    let clients: Vec<&employee::Model> = employees.iter().take(2).collect();
    let mut rng = rand::thread_rng();
    let mut created = Vec::new();

    for (i, vessel) in vessels.iter().enumerate() {
        let Some(requester) = clients.choose(&mut rng) else {
            break;
        };
        let amount = rng.gen_range(1..=3);
        let picked: Vec<&product::Model> = products.choose_multiple(&mut rng, amount).collect();

        let mut line_items: Vec<serde_json::Value> = picked
            .iter()
            .map(|p| {
                json!({
                    "product_id": p.id.to_string(),
                    "quotation_request_line_item_quantity": rng.gen_range(1..=40),
                    "attributes": [{"key": "Note", "value": "Deliver on board"}]
                })
            })
            .collect();
        if i == 0 {
            line_items.push(json!({
                "product_id": "new",
                "new_product_name": "Anchor Chain Swivel",
                "new_product_ref": "1004",
                "new_product_description": "Forged swivel for 48mm chain",
                "new_product_category_id": categories[0].id.to_string(),
                "quotation_request_line_item_quantity": 2,
                "attributes": [{"key": "Size", "value": "48mm"}]
            }));
        }

        let date = (Utc::now() - Duration::days(rng.gen_range(0..60))).date_naive();
        let submitted = json!({
            "quotation_request_ref": format!("RFQ-{}-{:03}", date.format("%Y"), i + 1),
            "quotation_request_date": date.format("%Y-%m-%d").to_string(),
            "quotation_request_vessel": vessel,
            "company_id": requester.company_id.to_string(),
            "employee_id": requester.id.to_string(),
            "quotation_request_line_items": line_items,
        });

        match service.create(submitted).await? {
            SubmissionOutcome::Saved(id) => created.push(id),
            SubmissionOutcome::Rejected(reply) => {
                warn!(vessel = %vessel, errors = ?reply.field_errors, "Seed quotation was rejected")
            }
        }
    }

    drop(service);
    events.await?;
    Ok(created)
}

async fn create_supplier_quotations(
    db: &DatabaseConnection,
    quotations: &[Uuid],
    suppliers: &[&company::Model],
) -> anyhow::Result<usize> {
    let repository = QuotationRepository::new(Arc::new(db.clone()));
    let mut rng = rand::thread_rng();
    let today = Utc::now().date_naive();
    let mut count = 0;

    for quotation_id in quotations {
        for (line_item, _) in repository.find_line_items(*quotation_id).await? {
            for supplier in suppliers {
                if !rng.gen_bool(0.6) {
                    continue;
                }
                let price = Decimal::from(rng.gen_range(20..2_000)) + dec!(0.99);
                let lead_days = rng.gen_range(3..30);
                supplier_quotation::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    line_item_id: Set(line_item.id),
                    company_id: Set(supplier.id),
                    supplier_date: Set(Some(today)),
                    supplier_price: Set(Some(price)),
                    lead_time: Set(Some(today + Duration::days(lead_days))),
                    client_date: Set(Some(today)),
                    client_price: Set(Some(price * dec!(1.15))),
                    accepted: Set(false),
                    status: Set(0),
                    created_at: Set(Utc::now()),
                }
                .insert(db)
                .await?;
                count += 1;
            }
        }
    }
    Ok(count)
}
