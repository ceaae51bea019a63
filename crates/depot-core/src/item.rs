//! Item: a named category of supply (e.g. "water", "gloves").
//!
//! Items are append-only: created on first reference, never renamed or
//! deleted. Names are unique case-insensitively; the casing of the first
//! insertion is the one that is kept.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub Uuid);

impl fmt::Display for ItemId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Display::fmt(&self.0, f)
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
  pub item_id:    ItemId,
  /// Display name, as first entered.
  pub name:       String,
  pub created_at: DateTime<Utc>,
}

/// Result of [`crate::store::SupplyStore::ensure_item`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnsuredItem {
  pub item_id: ItemId,
  /// `true` only for the call that inserted the row.
  pub created: bool,
}

/// Trim an item name as entered, rejecting blank input.
pub fn clean_item_name(name: &str) -> Result<&str> {
  let trimmed = name.trim();
  if trimmed.is_empty() {
    return Err(Error::BlankItemName);
  }
  Ok(trimmed)
}

/// The uniqueness key for an item name. Two names that produce the same key
/// refer to the same item.
pub fn item_name_key(name: &str) -> String { name.trim().to_lowercase() }
