mod common;

use axum::http::{Method, StatusCode};
use quotedesk_api::entities::company::CompanyType;
use serde_json::json;

use common::{existing_product_item, response_json, Parties, TestApp};

#[tokio::test]
async fn health_reports_database_up() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["status"], "ready");
    assert_eq!(body["checks"]["database"]["status"], "up");
}

#[tokio::test]
async fn urlencoded_quotation_is_created_and_readable() {
    let app = TestApp::new().await;
    let parties = Parties::seed(&app).await;
    let hose = app.seed_product("Hydraulic Hose", parties.category_id).await;

    let body = format!(
        "quotation_request_ref=RFQ-9&quotation_request_date=2025-03-01\
         &quotation_request_vessel=MV+Ocean+Pearl\
         &company_id={company}&employee_id={employee}\
         &quotation_request_line_items[0][product_id]={hose}\
         &quotation_request_line_items[0][quotation_request_line_item_quantity]=4\
         &quotation_request_line_items[0][attributes][0][key]=Length\
         &quotation_request_line_items[0][attributes][0][value]=20m\
         &quotation_request_line_items[1][product_id]=new\
         &quotation_request_line_items[1][new_product_name]=Bilge+Pump\
         &quotation_request_line_items[1][new_product_ref]=88\
         &quotation_request_line_items[1][new_product_category_id]={category}\
         &quotation_request_line_items[1][quotation_request_line_item_quantity]=1",
        company = parties.company_id,
        employee = parties.employee_id,
        hose = hose,
        category = parties.category_id,
    );

    let response = app
        .request_form(Method::POST, "/api/v1/quotations", &body)
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = response_json(response).await;
    assert_eq!(created["status"], "success");
    let id = created["id"].as_str().expect("id").to_string();

    let response = app
        .request(Method::GET, &format!("/api/v1/quotations/{}", id), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let details = response_json(response).await;
    assert_eq!(details["vessel"], "MV Ocean Pearl");
    assert_eq!(details["company_name"], "Aegean Shipping");
    let items = details["line_items"].as_array().expect("line items");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["product_name"], "Hydraulic Hose");
    assert_eq!(items[0]["attributes"], json!({"Length": "20m"}));
    assert_eq!(items[1]["product_name"], "Bilge Pump");

    let response = app.request(Method::GET, "/api/v1/quotations", None).await;
    let listing = response_json(response).await;
    assert_eq!(listing["total"], 1);
    assert_eq!(listing["items"][0]["line_item_count"], 2);
}

#[tokio::test]
async fn invalid_submission_returns_422_with_submitted_values() {
    let app = TestApp::new().await;
    let parties = Parties::seed(&app).await;

    let mut submitted = parties.quotation(json!([]));
    submitted["quotation_request_vessel"] = json!("X");
    let response = app
        .request(Method::POST, "/api/v1/quotations", Some(submitted.clone()))
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let reply = response_json(response).await;
    assert_eq!(reply["status"], "error");
    assert_eq!(reply["kind"], "validation");
    assert_eq!(reply["initial_value"], submitted);
    assert_eq!(
        reply["field_errors"]["quotation_request_vessel"],
        json!(["Vessel name must be at least 2 characters"])
    );
    assert_eq!(
        reply["field_errors"]["quotation_request_line_items"],
        json!(["At least one line item is required"])
    );
}

#[tokio::test]
async fn edit_form_and_update_over_http() {
    let app = TestApp::new().await;
    let parties = Parties::seed(&app).await;
    let hose = app.seed_product("Hydraulic Hose", parties.category_id).await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/quotations",
            Some(parties.quotation(json!([existing_product_item(hose, 3)]))),
        )
        .await;
    let id = response_json(response).await["id"]
        .as_str()
        .expect("id")
        .to_string();

    let response = app
        .request(Method::GET, &format!("/api/v1/quotations/{}/edit", id), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let mut form = response_json(response).await;
    assert_eq!(
        form["quotation_request_line_items"][0]["quotation_request_line_item_quantity"],
        3
    );

    form["quotation_request_line_items"][0]["quotation_request_line_item_quantity"] = json!(6);
    let response = app
        .request(Method::PUT, &format!("/api/v1/quotations/{}", id), Some(form))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let items = app.line_items(id.parse().expect("uuid")).await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, 6);
}

#[tokio::test]
async fn unknown_quotation_is_404() {
    let app = TestApp::new().await;

    let path = format!("/api/v1/quotations/{}", uuid::Uuid::new_v4());
    let response = app.request(Method::GET, &path, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = response_json(response).await;
    assert_eq!(body["error"], "Not Found");
}

#[tokio::test]
async fn unsupported_body_type_is_415() {
    let app = TestApp::new().await;

    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/api/v1/products")
        .header("content-type", "text/plain")
        .body(axum::body::Body::from("product_name=Rope"))
        .expect("request");
    let response = tower::ServiceExt::oneshot(quotedesk_api::app_router(app.state.clone()), request)
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn product_picker_and_attribute_prefill() {
    let app = TestApp::new().await;
    let category = app.seed_category("Deck Stores").await;
    let hose = app.seed_product("Hydraulic Hose", category).await;
    app.seed_product("Safety Shackle", category).await;

    let response = app
        .request(Method::GET, "/api/v1/products/options?search=HY", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let options = response_json(response).await;
    assert_eq!(options.as_array().map(Vec::len), Some(1));
    assert_eq!(options[0]["id"], hose.to_string());

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/products/{}/attributes", hose),
            None,
        )
        .await;
    let pairs = response_json(response).await;
    assert_eq!(pairs, json!([{"key": "Grade", "value": "A"}]));
}

#[tokio::test]
async fn company_listing_rejects_unknown_type_codes() {
    let app = TestApp::new().await;
    app.seed_company("Harbor Marine", CompanyType::Supplier).await;

    let response = app
        .request(Method::GET, "/api/v1/companies?company_type=9", None)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .request(Method::GET, "/api/v1/companies?company_type=2", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = response_json(response).await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["name"], "Harbor Marine");
}
