pub mod auth;
pub mod authorization;
pub mod basic_details;
pub mod daily_records;
pub mod extractors;
pub mod health;
pub mod metrics;
pub mod record_names;
pub mod response;

// Re-export commonly used types
pub use authorization::{require_admin, require_admin_or_owner};
pub use extractors::{ValidatedId, ValidatedJson};
pub use response::{Created, DeletedResponse};
