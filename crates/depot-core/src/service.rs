//! [`Coordinator`] is the entry point callers use to read and mutate sites.
//!
//! Each method is one logical request: exactly one store operation (itself
//! one transaction), followed, only when that operation committed, by a
//! single [`UpdateNotifier::site_changed`] call. A rejected or failed request
//! never notifies.

use tracing::{debug, error, info, warn};

use crate::{
  ErrorKind,
  inventory::{InventoryAction, InventoryEntry, SiteItemAudit, UrgencyStatus},
  item::{EnsuredItem, Item},
  notify::{NoopNotifier, UpdateNotifier},
  site::{NewSite, ReceivingCapabilities, Site, SiteId, SiteSummary},
  store::{StoreError, SupplyStore},
};

pub struct Coordinator<S, N = NoopNotifier> {
  store:    S,
  notifier: N,
}

impl<S: SupplyStore> Coordinator<S> {
  /// A coordinator whose change signals go nowhere.
  pub fn without_notifier(store: S) -> Self { Self::new(store, NoopNotifier) }
}

impl<S, N> Coordinator<S, N>
where
  S: SupplyStore,
  N: UpdateNotifier,
{
  pub fn new(store: S, notifier: N) -> Self { Self { store, notifier } }

  pub fn store(&self) -> &S { &self.store }

  pub fn notifier(&self) -> &N { &self.notifier }

  // ── Sites ─────────────────────────────────────────────────────────────

  pub async fn add_site(&self, input: NewSite) -> Result<Site, S::Error> {
    let result = self.store.add_site(input).await;
    match result {
      Ok(site) => {
        info!(site_id = %site.site_id, name = %site.name, "site added");
        self.notifier.site_changed(site.site_id).await;
        Ok(site)
      }
      Err(e) => Err(log_rejection("add_site", None, e)),
    }
  }

  pub async fn get_site(&self, site_id: SiteId) -> Result<Option<Site>, S::Error> {
    debug!(%site_id, "get_site");
    self.store.get_site(site_id).await
  }

  pub async fn list_sites(&self) -> Result<Vec<SiteSummary>, S::Error> {
    self.store.list_sites().await
  }

  pub async fn update_field(
    &self,
    site_id: SiteId,
    key: &str,
    raw: &str,
  ) -> Result<(), S::Error> {
    let result = self.store.update_site_field(site_id, key, raw).await;
    self.settle("update_field", site_id, result).await?;
    info!(%site_id, field = key, "site field updated");
    Ok(())
  }

  pub async fn update_receiving_capabilities(
    &self,
    site_id: SiteId,
    capabilities: ReceivingCapabilities,
  ) -> Result<(), S::Error> {
    let result = self
      .store
      .update_receiving_capabilities(site_id, capabilities)
      .await;
    self.settle("update_receiving_capabilities", site_id, result).await?;
    info!(%site_id, ?capabilities, "receiving capabilities updated");
    Ok(())
  }

  // ── Items ─────────────────────────────────────────────────────────────

  /// Catalog-only; no site changes, so no notification.
  pub async fn ensure_item(&self, name: &str) -> Result<EnsuredItem, S::Error> {
    let ensured = self
      .store
      .ensure_item(name)
      .await
      .map_err(|e| log_rejection("ensure_item", None, e))?;
    if ensured.created {
      info!(item_id = %ensured.item_id, name, "item added to catalog");
    }
    Ok(ensured)
  }

  pub async fn list_items(&self) -> Result<Vec<Item>, S::Error> {
    self.store.list_items().await
  }

  // ── Inventory ─────────────────────────────────────────────────────────

  pub async fn apply(
    &self,
    site_id: SiteId,
    item_name: &str,
    action: InventoryAction,
  ) -> Result<SiteItemAudit, S::Error> {
    let result = self.store.apply_action(site_id, item_name, action).await;
    let audit = self.settle("inventory", site_id, result).await?;
    info!(
      %site_id,
      item = %audit.item_name,
      ?action,
      state = ?audit.state,
      "inventory updated"
    );
    Ok(audit)
  }

  pub async fn activate(
    &self,
    site_id: SiteId,
    item_name: &str,
    status: UrgencyStatus,
  ) -> Result<SiteItemAudit, S::Error> {
    self
      .apply(site_id, item_name, InventoryAction::Activate(status))
      .await
  }

  pub async fn deactivate(
    &self,
    site_id: SiteId,
    item_name: &str,
  ) -> Result<SiteItemAudit, S::Error> {
    self.apply(site_id, item_name, InventoryAction::Deactivate).await
  }

  pub async fn set_status(
    &self,
    site_id: SiteId,
    item_name: &str,
    status: UrgencyStatus,
  ) -> Result<SiteItemAudit, S::Error> {
    self
      .apply(site_id, item_name, InventoryAction::SetStatus(status))
      .await
  }

  pub async fn set_external_id(
    &self,
    site_id: SiteId,
    item_name: &str,
    external_id: Option<i64>,
  ) -> Result<(), S::Error> {
    let result = self
      .store
      .set_external_id(site_id, item_name, external_id)
      .await;
    self.settle("set_external_id", site_id, result).await
  }

  pub async fn fetch_inventory(
    &self,
    site_id: SiteId,
  ) -> Result<Vec<InventoryEntry>, S::Error> {
    debug!(%site_id, "fetch_inventory");
    self.store.fetch_inventory(site_id).await
  }

  pub async fn fetch_status(
    &self,
    site_id: SiteId,
    item_name: &str,
  ) -> Result<Option<UrgencyStatus>, S::Error> {
    self.store.fetch_status(site_id, item_name).await
  }

  pub async fn audit_count(&self) -> Result<u64, S::Error> {
    self.store.audit_count().await
  }

  pub async fn audit_history(
    &self,
    site_id: SiteId,
  ) -> Result<Vec<SiteItemAudit>, S::Error> {
    self.store.audit_history(site_id).await
  }

  // ── Helpers ───────────────────────────────────────────────────────────

  /// Notify after a committed mutation; log and pass through a failure.
  async fn settle<T>(
    &self,
    op: &'static str,
    site_id: SiteId,
    result: Result<T, S::Error>,
  ) -> Result<T, S::Error> {
    match result {
      Ok(value) => {
        self.notifier.site_changed(site_id).await;
        Ok(value)
      }
      Err(e) => Err(log_rejection(op, Some(site_id), e)),
    }
  }
}

fn log_rejection<E: StoreError>(
  op: &'static str,
  site_id: Option<SiteId>,
  e: E,
) -> E {
  let kind = e.kind();
  let site = site_id.map(|id| id.to_string()).unwrap_or_default();
  if kind == ErrorKind::TransientStoreFailure {
    error!(op, site_id = %site, ?kind, error = %e, "store failure");
  } else {
    warn!(op, site_id = %site, ?kind, error = %e, "request rejected");
  }
  e
}
