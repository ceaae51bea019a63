//! Per-site inventory state and its audit records.
//!
//! Each (site, item) pair is a small state machine. A pair with no stored row
//! is [`SiteItemState::Untracked`]; once a row exists it is either inactive
//! or active with exactly one [`UrgencyStatus`]. The status lives inside the
//! `Active` variant so an inactive pair can never carry a stale status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};
use uuid::Uuid;

use crate::{Error, item::ItemId, site::SiteId};

// ─── Urgency ─────────────────────────────────────────────────────────────────

/// How badly a site needs an item. Identity is the canonical, case-sensitive
/// display name.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  AsRefStr,
  IntoStaticStr,
)]
pub enum UrgencyStatus {
  #[strum(serialize = "Urgently Needed")]
  #[serde(rename = "Urgently Needed")]
  UrgentlyNeeded,
  #[strum(serialize = "Needed")]
  #[serde(rename = "Needed")]
  Needed,
  #[strum(serialize = "Available")]
  #[serde(rename = "Available")]
  Available,
  #[strum(serialize = "Oversupply")]
  #[serde(rename = "Oversupply")]
  Oversupply,
}

// ─── State machine ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "status", rename_all = "snake_case")]
pub enum SiteItemState {
  /// The site has never recorded any interest in the item.
  Untracked,
  Inactive,
  Active(UrgencyStatus),
}

/// A requested inventory mutation for one (site, item) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "status", rename_all = "snake_case")]
pub enum InventoryAction {
  Activate(UrgencyStatus),
  Deactivate,
  SetStatus(UrgencyStatus),
}

/// Why a transition was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
  /// Deactivation of a pair that was never activated.
  NotFound,
  /// Status change on a pair that is not currently active.
  NotTracked,
}

impl TransitionError {
  pub fn into_error(self, site_id: SiteId, item: impl Into<String>) -> Error {
    let item = item.into();
    match self {
      Self::NotFound => Error::SiteItemNotFound { site_id, item },
      Self::NotTracked => Error::SiteItemNotTracked { site_id, item },
    }
  }
}

impl SiteItemState {
  /// Rebuild a state from a stored row. The stored status is ignored unless
  /// the row is active.
  pub fn from_row(active: bool, status: Option<UrgencyStatus>) -> Option<Self> {
    match (active, status) {
      (false, _) => Some(Self::Inactive),
      (true, Some(s)) => Some(Self::Active(s)),
      (true, None) => None,
    }
  }

  pub fn is_active(self) -> bool { matches!(self, Self::Active(_)) }

  pub fn status(self) -> Option<UrgencyStatus> {
    match self {
      Self::Active(s) => Some(s),
      _ => None,
    }
  }

  /// The state that results from applying `action`.
  ///
  /// Every accepted action yields a new state even when it equals the
  /// current one; callers record an audit entry for each.
  pub fn apply(self, action: InventoryAction) -> Result<Self, TransitionError> {
    match (self, action) {
      (_, InventoryAction::Activate(s)) => Ok(Self::Active(s)),
      (Self::Untracked, InventoryAction::Deactivate) => {
        Err(TransitionError::NotFound)
      }
      (_, InventoryAction::Deactivate) => Ok(Self::Inactive),
      (Self::Active(_), InventoryAction::SetStatus(s)) => Ok(Self::Active(s)),
      (_, InventoryAction::SetStatus(_)) => Err(TransitionError::NotTracked),
    }
  }
}

// ─── Read model ──────────────────────────────────────────────────────────────

/// One row of a site's inventory listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryEntry {
  pub item_id:     ItemId,
  pub item_name:   String,
  /// Never [`SiteItemState::Untracked`]; untracked items are omitted from
  /// listings entirely.
  pub state:       SiteItemState,
  /// Correlation id assigned by an upstream data feed, if any.
  pub external_id: Option<i64>,
}

impl InventoryEntry {
  pub fn active(&self) -> bool { self.state.is_active() }

  pub fn status(&self) -> Option<UrgencyStatus> { self.state.status() }
}

// ─── Audit ───────────────────────────────────────────────────────────────────

/// An immutable record of one committed transition. Never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteItemAudit {
  pub audit_id:    Uuid,
  pub site_id:     SiteId,
  pub item_id:     ItemId,
  pub item_name:   String,
  /// The state the pair was left in.
  pub state:       SiteItemState,
  pub recorded_at: DateTime<Utc>,
}
