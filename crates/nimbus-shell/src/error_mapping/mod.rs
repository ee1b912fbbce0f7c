//! Maps shell service errors to nimbus_core::AppError for consistent user-facing messages.
//! Each service has its own module to keep mappings small and readable.

mod location;
mod search;
mod store;
mod weather;

pub(crate) use store::from_store_error;
