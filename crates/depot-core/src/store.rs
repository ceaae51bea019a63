//! The `SupplyStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `depot-store-sqlite`).
//! It covers the item catalog, site metadata, per-site inventory state, and
//! the inventory audit trail. Higher layers go through
//! [`crate::service::Coordinator`], which adds change notification.
//!
//! Every mutating method is one bounded transaction in the backend: it either
//! commits in full or leaves no trace. Inventory transitions and their audit
//! records are written in the same transaction.

use std::future::Future;

use crate::{
  ErrorKind,
  inventory::{InventoryAction, InventoryEntry, SiteItemAudit, UrgencyStatus},
  item::{EnsuredItem, Item},
  site::{NewSite, ReceivingCapabilities, Site, SiteId, SiteSummary},
};

/// Errors raised by a backend must say which [`ErrorKind`] they are, so that
/// callers can tell a rejected request from a storage failure.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn kind(&self) -> ErrorKind;
}

impl StoreError for crate::Error {
  fn kind(&self) -> ErrorKind { crate::Error::kind(self) }
}

/// Abstraction over a Depot storage backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes.
pub trait SupplyStore: Send + Sync {
  type Error: StoreError + From<crate::Error>;

  // ── Sites ─────────────────────────────────────────────────────────────

  /// Persist a newly onboarded site. Required attributes must be non-blank.
  fn add_site(
    &self,
    input: NewSite,
  ) -> impl Future<Output = Result<Site, Self::Error>> + Send + '_;

  /// Retrieve a site by id. Returns `None` if not found.
  fn get_site(
    &self,
    site_id: SiteId,
  ) -> impl Future<Output = Result<Option<Site>, Self::Error>> + Send + '_;

  /// List every site, ordered by name.
  fn list_sites(
    &self,
  ) -> impl Future<Output = Result<Vec<SiteSummary>, Self::Error>> + Send + '_;

  /// Resolve the site, validate `raw` for the field named `key` through the
  /// field registry, and write that single column.
  ///
  /// Fails with `SiteNotFound` before validation is attempted; a validation
  /// failure leaves the row untouched.
  fn update_site_field<'a>(
    &'a self,
    site_id: SiteId,
    key: &'a str,
    raw: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Write all three receiving capabilities in one update.
  fn update_receiving_capabilities(
    &self,
    site_id: SiteId,
    capabilities: ReceivingCapabilities,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Item catalog ──────────────────────────────────────────────────────

  /// Look up an item by case-insensitive name, inserting it if absent.
  ///
  /// Safe under concurrent callers: at most one row is ever created per
  /// normalised name, and the loser of a race observes the winner's row.
  fn ensure_item<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<EnsuredItem, Self::Error>> + Send + 'a;

  /// List every known item, ordered by name.
  fn list_items(
    &self,
  ) -> impl Future<Output = Result<Vec<Item>, Self::Error>> + Send + '_;

  // ── Inventory state ───────────────────────────────────────────────────

  /// Apply one inventory transition to the (site, item) pair and append the
  /// matching audit record, atomically. Returns the audit record written.
  ///
  /// `Activate` creates the item and the pair as needed; `Deactivate`
  /// requires the pair to exist; `SetStatus` requires it to be active.
  fn apply_action<'a>(
    &'a self,
    site_id: SiteId,
    item_name: &'a str,
    action: InventoryAction,
  ) -> impl Future<Output = Result<SiteItemAudit, Self::Error>> + Send + 'a;

  /// Attach (or clear) the upstream feed correlation id of an existing pair.
  /// Does not change the pair's state and writes no audit record.
  fn set_external_id<'a>(
    &'a self,
    site_id: SiteId,
    item_name: &'a str,
    external_id: Option<i64>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Every item ever associated with the site, in item-name order.
  fn fetch_inventory(
    &self,
    site_id: SiteId,
  ) -> impl Future<Output = Result<Vec<InventoryEntry>, Self::Error>> + Send + '_;

  /// The current status of the pair if it is active; `None` otherwise.
  fn fetch_status<'a>(
    &'a self,
    site_id: SiteId,
    item_name: &'a str,
  ) -> impl Future<Output = Result<Option<UrgencyStatus>, Self::Error>> + Send + 'a;

  // ── Audit trail (read-only) ───────────────────────────────────────────

  /// Total number of audit records across all sites.
  fn audit_count(
    &self,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Audit records for one site, in insertion order.
  fn audit_history(
    &self,
    site_id: SiteId,
  ) -> impl Future<Output = Result<Vec<SiteItemAudit>, Self::Error>> + Send + '_;
}
