//! Integration tests for `SqliteStore` against an in-memory database.

use std::{path::PathBuf, sync::Mutex};

use depot_core::{
  ErrorKind,
  inventory::{InventoryAction, SiteItemState, UrgencyStatus},
  notify::UpdateNotifier,
  service::Coordinator,
  site::{MaxSupplyLoad, NewSite, ReceivingCapabilities, SiteId, SiteType},
  store::{StoreError, SupplyStore},
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn new_site(name: &str) -> NewSite {
  NewSite {
    state: Some("NC".into()),
    max_supply_load: Some(MaxSupplyLoad::Car),
    ..NewSite::new(name, format!("address of {name}"), "Boone", "Watauga")
  }
}

async fn site(s: &SqliteStore, name: &str) -> SiteId {
  s.add_site(new_site(name)).await.unwrap().site_id
}

async fn activate(s: &SqliteStore, site_id: SiteId, item: &str, status: UrgencyStatus) {
  s.apply_action(site_id, item, InventoryAction::Activate(status))
    .await
    .unwrap();
}

/// A file-backed database path that is unique to one test.
fn temp_db_path(label: &str) -> PathBuf {
  std::env::temp_dir().join(format!("depot-{label}-{}.db", Uuid::new_v4()))
}

fn remove_db(path: &PathBuf) {
  for suffix in ["", "-wal", "-shm"] {
    let mut p = path.clone().into_os_string();
    p.push(suffix);
    let _ = std::fs::remove_file(p);
  }
}

// ─── Sites ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_site() {
  let s = store().await;

  let added = s.add_site(new_site("site1")).await.unwrap();
  assert!(added.active);
  assert!(added.accepting_donations);
  assert!(!added.onboarded);
  assert_eq!(added.receiving, ReceivingCapabilities::default());

  let fetched = s.get_site(added.site_id).await.unwrap().unwrap();
  assert_eq!(fetched.name, "site1");
  assert_eq!(fetched.county, "Watauga");
  assert_eq!(fetched.state.as_deref(), Some("NC"));
  assert_eq!(fetched.site_type, SiteType::DistributionCenter);
  assert_eq!(fetched.max_supply_load, Some(MaxSupplyLoad::Car));
  assert!(fetched.contact_number.is_none());
}

#[tokio::test]
async fn get_site_missing_returns_none() {
  let s = store().await;
  assert!(s.get_site(SiteId::new()).await.unwrap().is_none());
}

#[tokio::test]
async fn add_site_rejects_blank_required_fields() {
  let s = store().await;

  let err = s
    .add_site(NewSite::new("  ", "1 Main St", "Boone", "Watauga"))
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::RequiredFieldViolation);

  let err = s
    .add_site(NewSite::new("site", "1 Main St", "Boone", ""))
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::RequiredFieldViolation);

  assert!(s.list_sites().await.unwrap().is_empty());
}

#[tokio::test]
async fn list_sites_is_ordered_by_name() {
  let s = store().await;
  site(&s, "site3").await;
  site(&s, "site1").await;
  site(&s, "site2").await;

  let names: Vec<_> = s
    .list_sites()
    .await
    .unwrap()
    .into_iter()
    .map(|summary| summary.name)
    .collect();
  assert_eq!(names, ["site1", "site2", "site3"]);
}

// ─── Field updates ───────────────────────────────────────────────────────────

#[tokio::test]
async fn update_site_fields() {
  let s = store().await;
  let id = site(&s, "site5").await;

  s.update_site_field(id, "siteName", "new site name").await.unwrap();
  s.update_site_field(id, "contactNumber", "999-596-111").await.unwrap();
  s.update_site_field(id, "city", "  new city ").await.unwrap();
  s.update_site_field(id, "county", "Buncombe").await.unwrap();
  s.update_site_field(id, "streetAddress", "new address").await.unwrap();
  s.update_site_field(id, "website", "new website").await.unwrap();

  let site = s.get_site(id).await.unwrap().unwrap();
  assert_eq!(site.name, "new site name");
  assert_eq!(site.contact_number.as_deref(), Some("999-596-111"));
  assert_eq!(site.city, "new city");
  assert_eq!(site.county, "Buncombe");
  assert_eq!(site.street_address, "new address");
  assert_eq!(site.website.as_deref(), Some("new website"));
}

#[tokio::test]
async fn required_fields_cannot_be_blanked() {
  let s = store().await;
  let id = site(&s, "site1").await;
  let before = s.get_site(id).await.unwrap().unwrap();

  for key in ["siteName", "streetAddress", "city", "county"] {
    for blank in ["", "   "] {
      let err = s.update_site_field(id, key, blank).await.unwrap_err();
      assert_eq!(err.kind(), ErrorKind::RequiredFieldViolation, "{key}");
    }
  }

  let after = s.get_site(id).await.unwrap().unwrap();
  assert_eq!(after.name, before.name);
  assert_eq!(after.street_address, before.street_address);
  assert_eq!(after.city, before.city);
  assert_eq!(after.county, before.county);
  assert_eq!(after.updated_at, before.updated_at);
}

#[tokio::test]
async fn blank_optional_field_clears_it() {
  let s = store().await;
  let id = site(&s, "site1").await;

  s.update_site_field(id, "siteHours", "9-5 weekdays").await.unwrap();
  assert_eq!(
    s.get_site(id).await.unwrap().unwrap().hours.as_deref(),
    Some("9-5 weekdays")
  );

  s.update_site_field(id, "siteHours", "  ").await.unwrap();
  assert!(s.get_site(id).await.unwrap().unwrap().hours.is_none());
}

#[tokio::test]
async fn invalid_field_updates_are_rejected_without_effect() {
  let s = store().await;
  let id = site(&s, "site1").await;

  let err = s.update_site_field(id, "favouriteColour", "blue").await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::UnknownField);

  let err = s.update_site_field(id, "siteType", "supply hub").await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::InvalidEnumValue);

  let err = s.update_site_field(id, "maxSupplyLoad", "Rocket").await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::InvalidEnumValue);

  let err = s.update_site_field(id, "active", "nope").await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::InvalidBooleanValue);

  let site = s.get_site(id).await.unwrap().unwrap();
  assert_eq!(site.site_type, SiteType::DistributionCenter);
  assert_eq!(site.max_supply_load, Some(MaxSupplyLoad::Car));
  assert!(site.active);
}

#[tokio::test]
async fn update_field_on_unknown_site_is_site_not_found() {
  let s = store().await;
  // Site resolution precedes field validation.
  let err = s
    .update_site_field(SiteId::new(), "noSuchField", "x")
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::SiteNotFound);
}

#[tokio::test]
async fn site_status_flags_and_type() {
  let s = store().await;
  let id = site(&s, "site1").await;

  s.update_site_field(id, "active", "false").await.unwrap();
  s.update_site_field(id, "acceptingDonations", "false").await.unwrap();
  s.update_site_field(id, "onboarded", "true").await.unwrap();
  s.update_site_field(id, "siteType", "Supply Hub").await.unwrap();
  s.update_site_field(id, "maxSupplyLoad", "Semi Truck").await.unwrap();

  let site = s.get_site(id).await.unwrap().unwrap();
  assert!(!site.active);
  assert!(!site.accepting_donations);
  assert!(site.onboarded);
  assert_eq!(site.site_type, SiteType::SupplyHub);
  assert_eq!(site.max_supply_load, Some(MaxSupplyLoad::SemiTruck));

  s.update_site_field(id, "active", "true").await.unwrap();
  s.update_site_field(id, "maxSupplyLoad", "").await.unwrap();

  let site = s.get_site(id).await.unwrap().unwrap();
  assert!(site.active);
  assert!(site.max_supply_load.is_none());
}

#[tokio::test]
async fn receiving_capabilities_are_written_together() {
  let s = store().await;
  let id = site(&s, "site1").await;

  let caps = ReceivingCapabilities {
    forklift:       true,
    loading_dock:   false,
    indoor_storage: true,
  };
  s.update_receiving_capabilities(id, caps).await.unwrap();
  assert_eq!(s.get_site(id).await.unwrap().unwrap().receiving, caps);

  let err = s
    .update_receiving_capabilities(SiteId::new(), caps)
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::SiteNotFound);
}

// ─── Item catalog ────────────────────────────────────────────────────────────

#[tokio::test]
async fn ensure_item_is_case_insensitive() {
  let s = store().await;

  let first = s.ensure_item("Water").await.unwrap();
  assert!(first.created);

  let second = s.ensure_item("WATER").await.unwrap();
  assert!(!second.created);
  assert_eq!(first.item_id, second.item_id);

  let items = s.list_items().await.unwrap();
  assert_eq!(items.len(), 1);
  assert_eq!(items[0].name, "Water");
}

#[tokio::test]
async fn ensure_item_adds_new_names() {
  let s = store().await;
  s.ensure_item("new item").await.unwrap();
  s.ensure_item("another item").await.unwrap();

  let names: Vec<_> = s
    .list_items()
    .await
    .unwrap()
    .into_iter()
    .map(|item| item.name)
    .collect();
  assert_eq!(names, ["another item", "new item"]);
}

#[tokio::test]
async fn ensure_item_rejects_blank_names() {
  let s = store().await;
  let err = s.ensure_item("   ").await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::InvalidItemName);
  assert!(s.list_items().await.unwrap().is_empty());
}

#[tokio::test]
async fn adding_an_item_writes_no_audit_record() {
  let s = store().await;
  let before = s.audit_count().await.unwrap();
  s.ensure_item(&Uuid::new_v4().to_string()).await.unwrap();
  assert_eq!(s.audit_count().await.unwrap(), before);
}

#[tokio::test]
async fn concurrent_ensure_item_creates_one_row() {
  let path = temp_db_path("ensure-race");
  let a = SqliteStore::open(&path).await.unwrap();
  let b = SqliteStore::open(&path).await.unwrap();

  let (ra, rb) = tokio::join!(a.ensure_item("Tarp"), b.ensure_item("tarp"));
  let (ra, rb) = (ra.unwrap(), rb.unwrap());

  assert_eq!(ra.item_id, rb.item_id);
  assert_eq!(u8::from(ra.created) + u8::from(rb.created), 1);
  assert_eq!(a.list_items().await.unwrap().len(), 1);

  drop((a, b));
  remove_db(&path);
}

// ─── Inventory state ─────────────────────────────────────────────────────────

#[tokio::test]
async fn new_site_has_empty_inventory() {
  let s = store().await;
  let id = site(&s, "site1").await;

  assert!(s.fetch_inventory(id).await.unwrap().is_empty());
  assert_eq!(s.fetch_status(id, "water").await.unwrap(), None);
}

#[tokio::test]
async fn activation_law() {
  let s = store().await;
  let id = site(&s, "site1").await;

  activate(&s, id, "gloves", UrgencyStatus::Available).await;
  assert_eq!(
    s.fetch_status(id, "gloves").await.unwrap(),
    Some(UrgencyStatus::Available)
  );

  s.apply_action(id, "gloves", InventoryAction::Deactivate)
    .await
    .unwrap();
  assert_eq!(s.fetch_status(id, "gloves").await.unwrap(), None);

  activate(&s, id, "gloves", UrgencyStatus::Oversupply).await;
  assert_eq!(
    s.fetch_status(id, "gloves").await.unwrap(),
    Some(UrgencyStatus::Oversupply)
  );

  // One row throughout; history kept in the audit trail.
  assert_eq!(s.fetch_inventory(id).await.unwrap().len(), 1);
  assert_eq!(s.audit_history(id).await.unwrap().len(), 3);
}

#[tokio::test]
async fn activating_blankets_lists_them_and_audits_once() {
  let s = store().await;
  let id = site(&s, "S").await;
  let before = s.audit_count().await.unwrap();

  activate(&s, id, "blankets", UrgencyStatus::UrgentlyNeeded).await;

  let inventory = s.fetch_inventory(id).await.unwrap();
  assert_eq!(inventory.len(), 1);
  assert_eq!(inventory[0].item_name, "blankets");
  assert!(inventory[0].active());
  assert_eq!(inventory[0].status(), Some(UrgencyStatus::UrgentlyNeeded));
  assert_eq!(s.audit_count().await.unwrap(), before + 1);
}

#[tokio::test]
async fn every_accepted_transition_is_audited() {
  let s = store().await;
  let id = site(&s, "site1").await;
  let name = Uuid::new_v4().to_string();

  let start = s.audit_count().await.unwrap();
  s.ensure_item(&name).await.unwrap();
  assert_eq!(s.audit_count().await.unwrap(), start);

  activate(&s, id, &name, UrgencyStatus::Available).await;
  assert_eq!(s.audit_count().await.unwrap(), start + 1);

  s.apply_action(id, &name, InventoryAction::SetStatus(UrgencyStatus::UrgentlyNeeded))
    .await
    .unwrap();
  assert_eq!(s.audit_count().await.unwrap(), start + 2);

  s.apply_action(id, &name, InventoryAction::SetStatus(UrgencyStatus::Needed))
    .await
    .unwrap();
  assert_eq!(s.audit_count().await.unwrap(), start + 3);

  s.apply_action(id, &name, InventoryAction::Deactivate)
    .await
    .unwrap();
  assert_eq!(s.audit_count().await.unwrap(), start + 4);
}

#[tokio::test]
async fn repeating_the_current_state_is_still_audited() {
  let s = store().await;
  let id = site(&s, "site1").await;

  activate(&s, id, "water", UrgencyStatus::Needed).await;
  activate(&s, id, "water", UrgencyStatus::Needed).await;
  s.apply_action(id, "water", InventoryAction::SetStatus(UrgencyStatus::Needed))
    .await
    .unwrap();

  let history = s.audit_history(id).await.unwrap();
  assert_eq!(history.len(), 3);
  assert!(
    history
      .iter()
      .all(|a| a.state == SiteItemState::Active(UrgencyStatus::Needed))
  );
}

#[tokio::test]
async fn status_changes_are_visible_in_inventory() {
  let s = store().await;
  let id = site(&s, "site1").await;
  activate(&s, id, "water", UrgencyStatus::Available).await;

  for status in [
    UrgencyStatus::UrgentlyNeeded,
    UrgencyStatus::Oversupply,
    UrgencyStatus::Needed,
    UrgencyStatus::Available,
  ] {
    s.apply_action(id, "water", InventoryAction::SetStatus(status))
      .await
      .unwrap();
    assert_eq!(s.fetch_status(id, "water").await.unwrap(), Some(status));
    let water = &s.fetch_inventory(id).await.unwrap()[0];
    assert_eq!(water.status(), Some(status));
  }
}

#[tokio::test]
async fn inventory_lists_inactive_items_without_status() {
  let s = store().await;
  let id = site(&s, "site1").await;

  activate(&s, id, "water", UrgencyStatus::Available).await;
  activate(&s, id, "new clothes", UrgencyStatus::UrgentlyNeeded).await;
  activate(&s, id, "used clothes", UrgencyStatus::Oversupply).await;
  activate(&s, id, "Gloves", UrgencyStatus::Needed).await;
  s.apply_action(id, "gloves", InventoryAction::Deactivate)
    .await
    .unwrap();
  s.ensure_item("random stuff").await.unwrap();

  let inventory = s.fetch_inventory(id).await.unwrap();
  let names: Vec<_> = inventory.iter().map(|e| e.item_name.as_str()).collect();
  assert_eq!(names, ["Gloves", "new clothes", "used clothes", "water"]);

  let gloves = &inventory[0];
  assert!(!gloves.active());
  assert_eq!(gloves.status(), None);
  assert_eq!(gloves.state, SiteItemState::Inactive);
}

#[tokio::test]
async fn inventory_is_scoped_to_the_site() {
  let s = store().await;
  let one = site(&s, "site1").await;
  let two = site(&s, "site2").await;

  activate(&s, one, "water", UrgencyStatus::Available).await;

  assert!(s.fetch_inventory(two).await.unwrap().is_empty());
  assert_eq!(s.fetch_status(two, "water").await.unwrap(), None);
}

#[tokio::test]
async fn deactivate_requires_prior_activation() {
  let s = store().await;
  let id = site(&s, "site1").await;
  s.ensure_item("gloves").await.unwrap();

  let err = s
    .apply_action(id, "gloves", InventoryAction::Deactivate)
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::SiteItemNotFound);

  let err = s
    .apply_action(id, "never heard of it", InventoryAction::Deactivate)
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::SiteItemNotFound);

  assert_eq!(s.audit_count().await.unwrap(), 0);
}

#[tokio::test]
async fn set_status_requires_an_active_item() {
  let s = store().await;
  let id = site(&s, "site1").await;
  let set = InventoryAction::SetStatus(UrgencyStatus::Needed);

  let err = s.apply_action(id, "water", set).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::SiteItemNotTracked);

  activate(&s, id, "water", UrgencyStatus::Available).await;
  s.apply_action(id, "water", InventoryAction::Deactivate)
    .await
    .unwrap();

  let err = s.apply_action(id, "water", set).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::SiteItemNotTracked);
  assert_eq!(s.fetch_status(id, "water").await.unwrap(), None);
  assert_eq!(s.audit_count().await.unwrap(), 2);
}

#[tokio::test]
async fn activate_on_unknown_site_leaves_no_trace() {
  let s = store().await;

  let err = s
    .apply_action(
      SiteId::new(),
      "water",
      InventoryAction::Activate(UrgencyStatus::Available),
    )
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::SiteNotFound);

  assert!(s.list_items().await.unwrap().is_empty());
  assert_eq!(s.audit_count().await.unwrap(), 0);
}

#[tokio::test]
async fn audit_records_capture_resulting_state() {
  let s = store().await;
  let id = site(&s, "site1").await;

  activate(&s, id, "Water", UrgencyStatus::Available).await;
  s.apply_action(id, "water", InventoryAction::SetStatus(UrgencyStatus::Needed))
    .await
    .unwrap();
  let last = s
    .apply_action(id, "WATER", InventoryAction::Deactivate)
    .await
    .unwrap();
  assert_eq!(last.item_name, "Water");
  assert_eq!(last.state, SiteItemState::Inactive);

  let states: Vec<_> = s
    .audit_history(id)
    .await
    .unwrap()
    .into_iter()
    .map(|a| a.state)
    .collect();
  assert_eq!(states, [
    SiteItemState::Active(UrgencyStatus::Available),
    SiteItemState::Active(UrgencyStatus::Needed),
    SiteItemState::Inactive,
  ]);
}

#[tokio::test]
async fn audit_table_rejects_updates_and_deletes() {
  let s = store().await;
  let id = site(&s, "site1").await;
  activate(&s, id, "water", UrgencyStatus::Available).await;

  let (updated, deleted) = s
    .conn
    .call(|conn| {
      let updated = conn.execute("UPDATE site_item_audit SET status = 'Needed'", []);
      let deleted = conn.execute("DELETE FROM site_item_audit", []);
      Ok((updated.is_err(), deleted.is_err()))
    })
    .await
    .unwrap();
  assert!(updated);
  assert!(deleted);
  assert_eq!(s.audit_count().await.unwrap(), 1);
}

#[tokio::test]
async fn failed_audit_write_rolls_back_the_transition() {
  let s = store().await;
  let id = site(&s, "site1").await;
  activate(&s, id, "water", UrgencyStatus::Available).await;

  s.conn
    .call(|conn| {
      conn.execute_batch(
        "CREATE TRIGGER fail_audit BEFORE INSERT ON site_item_audit
         BEGIN SELECT RAISE(ABORT, 'audit unavailable'); END;",
      )?;
      Ok(())
    })
    .await
    .unwrap();

  let err = s
    .apply_action(id, "water", InventoryAction::SetStatus(UrgencyStatus::Oversupply))
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::TransientStoreFailure);

  let err = s
    .apply_action(id, "tarps", InventoryAction::Activate(UrgencyStatus::Needed))
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::TransientStoreFailure);

  assert_eq!(
    s.fetch_status(id, "water").await.unwrap(),
    Some(UrgencyStatus::Available)
  );
  assert_eq!(s.fetch_inventory(id).await.unwrap().len(), 1);
  // The item created on the way to the failed activation is rolled back too.
  assert_eq!(s.list_items().await.unwrap().len(), 1);
  assert_eq!(s.audit_count().await.unwrap(), 1);
}

#[tokio::test]
async fn concurrent_transitions_keep_state_and_audit_in_step() {
  let path = temp_db_path("pair-race");
  let a = SqliteStore::open(&path).await.unwrap();
  let b = SqliteStore::open(&path).await.unwrap();

  let id = site(&a, "site1").await;
  activate(&a, id, "water", UrgencyStatus::Available).await;

  let (ra, rb) = tokio::join!(
    a.apply_action(id, "water", InventoryAction::SetStatus(UrgencyStatus::Needed)),
    b.apply_action(id, "water", InventoryAction::SetStatus(UrgencyStatus::Oversupply)),
  );
  ra.unwrap();
  rb.unwrap();

  let history = a.audit_history(id).await.unwrap();
  assert_eq!(history.len(), 3);
  let last = history.last().unwrap().state;
  assert_eq!(
    SiteItemState::Active(b.fetch_status(id, "water").await.unwrap().unwrap()),
    last
  );

  drop((a, b));
  remove_db(&path);
}

// ─── External ids ────────────────────────────────────────────────────────────

#[tokio::test]
async fn external_id_round_trips_without_auditing() {
  let s = store().await;
  let id = site(&s, "site1").await;
  activate(&s, id, "water", UrgencyStatus::Available).await;

  s.set_external_id(id, "Water", Some(-10)).await.unwrap();
  assert_eq!(s.fetch_inventory(id).await.unwrap()[0].external_id, Some(-10));

  s.set_external_id(id, "water", None).await.unwrap();
  assert_eq!(s.fetch_inventory(id).await.unwrap()[0].external_id, None);
  assert_eq!(s.audit_count().await.unwrap(), 1);

  let err = s.set_external_id(id, "gloves", Some(1)).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::SiteItemNotFound);
}

// ─── Coordinator ─────────────────────────────────────────────────────────────

#[derive(Default)]
struct RecordingNotifier {
  seen: Mutex<Vec<SiteId>>,
}

impl RecordingNotifier {
  fn seen(&self) -> Vec<SiteId> { self.seen.lock().unwrap().clone() }
}

impl UpdateNotifier for RecordingNotifier {
  async fn site_changed(&self, site_id: SiteId) {
    self.seen.lock().unwrap().push(site_id);
  }
}

async fn coordinator() -> (Coordinator<SqliteStore, RecordingNotifier>, SiteId) {
  let s = store().await;
  let id = site(&s, "site1").await;
  (Coordinator::new(s, RecordingNotifier::default()), id)
}

#[tokio::test]
async fn coordinator_notifies_once_per_committed_mutation() {
  let (c, id) = coordinator().await;

  c.update_field(id, "contactName", "Jo").await.unwrap();
  c.update_receiving_capabilities(id, ReceivingCapabilities::default())
    .await
    .unwrap();
  c.activate(id, "gloves", UrgencyStatus::Available).await.unwrap();
  c.set_status(id, "gloves", UrgencyStatus::Needed).await.unwrap();
  c.set_external_id(id, "gloves", Some(7)).await.unwrap();
  c.deactivate(id, "gloves").await.unwrap();

  assert_eq!(c.notifier().seen(), vec![id; 6]);
}

#[tokio::test]
async fn coordinator_does_not_notify_on_rejection() {
  let (c, id) = coordinator().await;

  let err = c.update_field(id, "siteName", "   ").await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::RequiredFieldViolation);
  assert_eq!(c.get_site(id).await.unwrap().unwrap().name, "site1");

  c.deactivate(id, "gloves").await.unwrap_err();
  c.set_status(id, "gloves", UrgencyStatus::Needed)
    .await
    .unwrap_err();
  c.update_field(SiteId::new(), "city", "Elsewhere")
    .await
    .unwrap_err();

  assert!(c.notifier().seen().is_empty());
}

#[tokio::test]
async fn coordinator_catalog_changes_do_not_notify() {
  let (c, _) = coordinator().await;

  let first = c.ensure_item("Water").await.unwrap();
  let second = c.ensure_item("WATER").await.unwrap();
  assert_eq!(first.item_id, second.item_id);

  assert!(c.notifier().seen().is_empty());
  assert_eq!(c.audit_count().await.unwrap(), 0);
}
