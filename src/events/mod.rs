use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Publishes an event whose underlying write has already committed.
    ///
    /// A closed channel is logged and otherwise ignored.
    pub async fn send_or_log(&self, event: Event) {
        if let Err(e) = self.send(event).await {
            warn!("Dropping domain event after commit: {}", e);
        }
    }
}

/// Domain events emitted after a successful commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    QuotationCreated {
        quotation_id: Uuid,
        line_items: usize,
        new_products: usize,
    },
    QuotationUpdated {
        quotation_id: Uuid,
        line_items: usize,
        new_products: usize,
    },
    ProductCreated(Uuid),
    ProductUpdated(Uuid),
    ProductCategoryCreated(Uuid),
    ProductCategoryUpdated(Uuid),
    CompanyCreated(Uuid),
    CompanyUpdated(Uuid),
    EmployeeCreated(Uuid),
    EmployeeUpdated(Uuid),
}

impl Event {
    /// Short name used as the `event` field in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Event::QuotationCreated { .. } => "quotation_created",
            Event::QuotationUpdated { .. } => "quotation_updated",
            Event::ProductCreated(_) => "product_created",
            Event::ProductUpdated(_) => "product_updated",
            Event::ProductCategoryCreated(_) => "product_category_created",
            Event::ProductCategoryUpdated(_) => "product_category_updated",
            Event::CompanyCreated(_) => "company_created",
            Event::CompanyUpdated(_) => "company_updated",
            Event::EmployeeCreated(_) => "employee_created",
            Event::EmployeeUpdated(_) => "employee_updated",
        }
    }
}

/// Drains the event channel until every sender is dropped.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match &event {
            Event::QuotationCreated {
                quotation_id,
                line_items,
                new_products,
            }
            | Event::QuotationUpdated {
                quotation_id,
                line_items,
                new_products,
            } => {
                info!(
                    event = event.name(),
                    quotation_id = %quotation_id,
                    line_items,
                    new_products,
                    "Quotation saved"
                );
            }
            other => {
                debug!(event = other.name(), "Received event: {:?}", other);
            }
        }
    }

    info!("Event channel closed; event processing loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_delivers_to_receiver() {
        let (tx, mut rx) = mpsc::channel(4);
        let sender = EventSender::new(tx);
        let id = Uuid::new_v4();

        sender.send(Event::ProductCreated(id)).await.unwrap();

        assert_eq!(rx.recv().await, Some(Event::ProductCreated(id)));
    }

    #[tokio::test]
    async fn send_fails_once_receiver_is_gone() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let sender = EventSender::new(tx);

        assert!(sender.send(Event::CompanyCreated(Uuid::new_v4())).await.is_err());
        // must not panic
        sender.send_or_log(Event::CompanyCreated(Uuid::new_v4())).await;
    }

    #[tokio::test]
    async fn process_events_stops_when_senders_drop() {
        let (tx, rx) = mpsc::channel(4);
        let sender = EventSender::new(tx);
        sender
            .send(Event::QuotationCreated {
                quotation_id: Uuid::new_v4(),
                line_items: 2,
                new_products: 1,
            })
            .await
            .unwrap();
        drop(sender);

        process_events(rx).await;
    }
}
