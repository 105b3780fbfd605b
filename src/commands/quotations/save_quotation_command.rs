use crate::{
    commands::Command,
    db::{run_in_transaction, DbPool},
    errors::ServiceError,
    events::{Event, EventSender},
    forms::attributes::pairs_to_json,
    repositories::{
        product_repository::{ProductRecord, ProductRepository},
        quotation_repository::{LineItemRecord, QuotationHeader, QuotationRepository},
    },
    validation::quotation::{ProductChoice, QuotationDraft},
};
use metrics::counter;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Saves a validated quotation together with its line items and any products
/// the line items introduce. Either everything is written or nothing is.
#[derive(Debug, Clone)]
pub struct SaveQuotationCommand {
    pub quotation_id: Uuid,
    pub editing: bool,
    pub draft: QuotationDraft,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaveQuotationResult {
    pub id: Uuid,
    pub created: bool,
    pub line_item_ids: Vec<Uuid>,
    pub new_product_ids: Vec<Uuid>,
}

impl SaveQuotationCommand {
    pub fn create(draft: QuotationDraft) -> Self {
        Self {
            quotation_id: Uuid::new_v4(),
            editing: false,
            draft,
        }
    }

    pub fn update(quotation_id: Uuid, draft: QuotationDraft) -> Self {
        Self {
            quotation_id,
            editing: true,
            draft,
        }
    }

    async fn persist(&self, db: &DbPool) -> Result<SaveQuotationResult, ServiceError> {
        let quotation_id = self.quotation_id;
        let editing = self.editing;
        let draft = self.draft.clone();

        run_in_transaction(db, "save_quotation", move |txn| {
            Box::pin(async move {
                let header = QuotationHeader {
                    reference: draft.reference,
                    request_date: draft.request_date,
                    vessel: draft.vessel,
                    company_id: draft.company_id,
                    employee_id: draft.employee_id,
                };
                let (_, created) =
                    QuotationRepository::upsert_quotation(txn, quotation_id, &header).await?;
                // An edit must never bring back a quotation deleted since it was loaded.
                if editing && created {
                    return Err(ServiceError::not_found("Quotation", quotation_id));
                }

                if editing {
                    QuotationRepository::delete_line_items(txn, quotation_id).await?;
                }

                let mut line_item_ids = Vec::with_capacity(draft.line_items.len());
                let mut new_product_ids = Vec::new();

                for (position, item) in draft.line_items.into_iter().enumerate() {
                    let attributes = pairs_to_json(&item.attributes);

                    let product_id = match item.product {
                        ProductChoice::Existing(id) => id,
                        ProductChoice::New(new_product) => {
                            let product = ProductRepository::create_product(
                                txn,
                                ProductRecord {
                                    ref_number: new_product.ref_number(),
                                    name: new_product.name,
                                    description: new_product.description,
                                    attributes: attributes.clone(),
                                    category_id: new_product.category_id,
                                },
                            )
                            .await?;
                            new_product_ids.push(product.id);
                            product.id
                        }
                    };

                    let line_item = QuotationRepository::create_line_item(
                        txn,
                        LineItemRecord {
                            quotation_request_id: quotation_id,
                            product_id,
                            position: position as i32,
                            quantity: item.quantity,
                            attributes,
                        },
                    )
                    .await?;
                    line_item_ids.push(line_item.id);
                }

                Ok(SaveQuotationResult {
                    id: quotation_id,
                    created,
                    line_item_ids,
                    new_product_ids,
                })
            })
        })
        .await
    }
}

#[async_trait::async_trait]
impl Command for SaveQuotationCommand {
    type Result = SaveQuotationResult;

    #[instrument(skip(self, db_pool, event_sender), fields(quotation_id = %self.quotation_id, editing = self.editing))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        let result = match self.persist(db_pool.as_ref()).await {
            Ok(result) => result,
            Err(e) => {
                counter!("quotedesk.quotations.save_failures", 1);
                return Err(e);
            }
        };
        counter!("quotedesk.quotations.saved", 1);

        info!(
            quotation_id = %result.id,
            line_items = result.line_item_ids.len(),
            new_products = result.new_product_ids.len(),
            "Quotation saved"
        );

        let event = if result.created {
            Event::QuotationCreated {
                quotation_id: result.id,
                line_items: result.line_item_ids.len(),
                new_products: result.new_product_ids.len(),
            }
        } else {
            Event::QuotationUpdated {
                quotation_id: result.id,
                line_items: result.line_item_ids.len(),
                new_products: result.new_product_ids.len(),
            }
        };
        event_sender.send_or_log(event).await;
        for product_id in &result.new_product_ids {
            event_sender.send_or_log(Event::ProductCreated(*product_id)).await;
        }

        Ok(result)
    }
}
