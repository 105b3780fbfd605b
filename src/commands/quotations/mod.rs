pub mod save_quotation_command;

pub use save_quotation_command::{SaveQuotationCommand, SaveQuotationResult};
