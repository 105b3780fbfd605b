pub mod company;
pub mod employee;
pub mod product;
pub mod product_category;
pub mod quotation_request;
pub mod quotation_request_line_item;
pub mod supplier_quotation;

use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::{self, Set};

/// Stamps `created_at` on insert and `updated_at` on every save.
pub(crate) fn touch_timestamps(
    created_at: &mut ActiveValue<DateTime<Utc>>,
    updated_at: &mut ActiveValue<DateTime<Utc>>,
    insert: bool,
) {
    let now = Utc::now();
    if insert && matches!(created_at, ActiveValue::NotSet) {
        *created_at = Set(now);
    }
    *updated_at = Set(now);
}
