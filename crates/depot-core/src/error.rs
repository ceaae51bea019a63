//! Error types for `depot-core`.

use serde::Serialize;
use thiserror::Error;

use crate::{field::FieldError, site::SiteId};

/// Coarse classification of every failure a core operation can report.
///
/// Callers (a web layer, the CLI) map a kind to a rejected request; none of
/// these kinds ever corresponds to a half-applied write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
  UnknownField,
  RequiredFieldViolation,
  InvalidEnumValue,
  InvalidBooleanValue,
  InvalidItemName,
  SiteNotFound,
  SiteItemNotFound,
  SiteItemNotTracked,
  TransientStoreFailure,
}

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Field(#[from] FieldError),

  #[error("item name must not be blank")]
  BlankItemName,

  #[error("site not found: {0}")]
  SiteNotFound(SiteId),

  #[error("site {site_id} has never tracked item {item:?}")]
  SiteItemNotFound { site_id: SiteId, item: String },

  #[error("item {item:?} is not actively tracked at site {site_id}")]
  SiteItemNotTracked { site_id: SiteId, item: String },
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::Field(e) => e.kind(),
      Self::BlankItemName => ErrorKind::InvalidItemName,
      Self::SiteNotFound(_) => ErrorKind::SiteNotFound,
      Self::SiteItemNotFound { .. } => ErrorKind::SiteItemNotFound,
      Self::SiteItemNotTracked { .. } => ErrorKind::SiteItemNotTracked,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
