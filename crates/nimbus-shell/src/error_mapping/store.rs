use nimbus_core::{AppError, StorageError};
use nimbus_weather::StoreError;

/// `StoreError` lives in nimbus-weather, so this is a function rather than a `From` impl.
pub(crate) fn from_store_error(e: StoreError) -> AppError {
    match e {
        StoreError::Corrupt(s) => AppError::Storage(StorageError::Corrupt(s)),
        StoreError::Io(e) => AppError::Storage(StorageError::WriteFailed(e.to_string())),
        StoreError::Serialize(e) => AppError::Storage(StorageError::WriteFailed(e.to_string())),
    }
}
