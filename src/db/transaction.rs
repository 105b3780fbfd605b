/*!
 * Transaction helper
 *
 * Every multi-row write goes through `run_in_transaction`: the closure's
 * statements commit together or are rolled back together.
 */

use crate::errors::ServiceError;
use futures::future::BoxFuture;
use metrics::{counter, histogram};
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionError, TransactionTrait};
use tracing::{debug, warn};
use uuid::Uuid;

/// Execute `f` within a database transaction.
///
/// - commits when `f` resolves to `Ok`
/// - rolls back when `f` resolves to `Err`, or when the returned future is dropped early
///
/// ```rust,ignore
/// let id = run_in_transaction(&db, "save_quotation", |txn| {
///     Box::pin(async move {
///         quotation.insert(txn).await?;
///         for item in items {
///             item.insert(txn).await?;
///         }
///         Ok(id)
///     })
/// })
/// .await?;
/// ```
pub async fn run_in_transaction<F, T>(
    db: &DatabaseConnection,
    label: &'static str,
    f: F,
) -> Result<T, ServiceError>
where
    F: for<'c> FnOnce(&'c DatabaseTransaction) -> BoxFuture<'c, Result<T, ServiceError>> + Send,
    T: Send,
{
    let transaction_id = Uuid::new_v4();
    let start = std::time::Instant::now();

    debug!(transaction_id = %transaction_id, label, "Starting database transaction");
    counter!("quotedesk_db.transaction.started", 1);

    let result = db.transaction::<_, T, ServiceError>(f).await;

    let elapsed = start.elapsed();
    histogram!("quotedesk_db.transaction.duration", elapsed);

    match &result {
        Ok(_) => {
            counter!("quotedesk_db.transaction.committed", 1);
            debug!(transaction_id = %transaction_id, label, "Transaction committed in {:?}", elapsed);
        }
        Err(e) => {
            counter!("quotedesk_db.transaction.rolled_back", 1);
            warn!(transaction_id = %transaction_id, label, error = %e, "Transaction rolled back after {:?}", elapsed);
        }
    }

    result.map_err(|e| match e {
        TransactionError::Connection(db_err) => ServiceError::DatabaseError(db_err),
        TransactionError::Transaction(service_err) => service_err,
    })
}
