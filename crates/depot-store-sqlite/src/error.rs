//! Error type for `depot-store-sqlite`.

use depot_core::{ErrorKind, field::FieldError, store::StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Core(#[from] depot_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored value that does not decode into its domain type.
  #[error("corrupt row: {0}")]
  Decode(String),
}

impl From<rusqlite::Error> for Error {
  fn from(e: rusqlite::Error) -> Self { Self::Database(e.into()) }
}

impl From<FieldError> for Error {
  fn from(e: FieldError) -> Self { Self::Core(e.into()) }
}

impl StoreError for Error {
  fn kind(&self) -> ErrorKind {
    match self {
      Self::Core(e) => e.kind(),
      Self::Database(_) | Self::Uuid(_) | Self::DateParse(_) | Self::Decode(_) => {
        ErrorKind::TransientStoreFailure
      }
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
