//! [`SqliteStore`] is the SQLite implementation of [`SupplyStore`].

use std::{path::Path, time::Duration};

use chrono::Utc;
use depot_core::{
  field::{FieldError, FieldValue, SiteField, ValidatedUpdate, validate_field_update},
  inventory::{
    InventoryAction, InventoryEntry, SiteItemAudit, SiteItemState, TransitionError,
    UrgencyStatus,
  },
  item::{EnsuredItem, Item, ItemId, clean_item_name, item_name_key},
  site::{NewSite, ReceivingCapabilities, Site, SiteId, SiteSummary},
  store::SupplyStore,
};
use rusqlite::{Connection, OptionalExtension as _, Transaction, TransactionBehavior};
use tracing::debug;
use uuid::Uuid;

use crate::{
  Error, Result,
  encode::{
    RawAudit, RawInventoryEntry, RawItem, RawSite, RawSiteSummary, SITE_COLUMNS,
    decode_item_id, decode_state, encode_dt, encode_field_column, encode_field_value,
    encode_state, encode_uuid,
  },
  schema::SCHEMA,
};

/// How long a writer waits for another connection's write lock.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Depot store backed by a single SQLite file.
///
/// Clones share one underlying connection. Separate
/// `open` calls on the same file yield independent connections whose writes
/// are serialised by SQLite's write lock.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    debug!("schema initialised");
    Ok(())
  }

  /// Run `f` inside one `BEGIN IMMEDIATE` transaction.
  ///
  /// The transaction commits only if `f` returns `Ok`; on any error it is
  /// dropped, which rolls it back.
  async fn write<T, F>(&self, f: F) -> Result<T>
  where
    T: Send + 'static,
    F: FnOnce(&Transaction<'_>) -> Result<T> + Send + 'static,
  {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let outcome = f(&tx);
        if outcome.is_ok() {
          tx.commit()?;
        }
        Ok(outcome)
      })
      .await?
  }

  /// Run a read-only closure against the connection.
  async fn read<T, F>(&self, f: F) -> Result<T>
  where
    T: Send + 'static,
    F: FnOnce(&Connection) -> Result<T> + Send + 'static,
  {
    self.conn.call(move |conn| Ok(f(conn))).await?
  }
}

// ─── Statement helpers ───────────────────────────────────────────────────────

fn site_exists(conn: &Connection, site_id: &str) -> Result<bool> {
  Ok(
    conn
      .query_row(
        "SELECT 1 FROM sites WHERE site_id = ?1",
        rusqlite::params![site_id],
        |_| Ok(()),
      )
      .optional()?
      .is_some(),
  )
}

fn require_site(conn: &Connection, site_id: SiteId) -> Result<String> {
  let id_str = encode_uuid(site_id.0);
  if !site_exists(conn, &id_str)? {
    return Err(depot_core::Error::SiteNotFound(site_id).into());
  }
  Ok(id_str)
}

fn find_item(conn: &Connection, key: &str) -> Result<Option<ItemId>> {
  let id: Option<String> = conn
    .query_row(
      "SELECT item_id FROM items WHERE name_key = ?1",
      rusqlite::params![key],
      |r| r.get(0),
    )
    .optional()?;
  id.as_deref().map(decode_item_id).transpose()
}

fn stored_item_name(conn: &Connection, item_id: ItemId) -> Result<String> {
  Ok(conn.query_row(
    "SELECT name FROM items WHERE item_id = ?1",
    rusqlite::params![encode_uuid(item_id.0)],
    |r| r.get(0),
  )?)
}

/// Lookup-then-insert; the `UNIQUE (name_key)` constraint is what actually
/// prevents duplicates.
fn ensure_item_in(conn: &Connection, name: &str) -> Result<EnsuredItem> {
  let name = clean_item_name(name)?;
  let key = item_name_key(name);

  if let Some(item_id) = find_item(conn, &key)? {
    return Ok(EnsuredItem { item_id, created: false });
  }

  let item_id = ItemId(Uuid::new_v4());
  let inserted = conn.execute(
    "INSERT INTO items (item_id, name, name_key, created_at)
     VALUES (?1, ?2, ?3, ?4)
     ON CONFLICT (name_key) DO NOTHING",
    rusqlite::params![encode_uuid(item_id.0), name, key, encode_dt(Utc::now())],
  )?;
  if inserted == 1 {
    return Ok(EnsuredItem { item_id, created: true });
  }

  debug!(key = %key, "item inserted concurrently; using existing row");
  let item_id = find_item(conn, &key)?
    .ok_or_else(|| Error::Decode(format!("item {key:?} conflicted but is missing")))?;
  Ok(EnsuredItem { item_id, created: false })
}

fn load_state(conn: &Connection, site_id: &str, item_id: ItemId) -> Result<SiteItemState> {
  let row: Option<(bool, Option<String>)> = conn
    .query_row(
      "SELECT active, status FROM site_items WHERE site_id = ?1 AND item_id = ?2",
      rusqlite::params![site_id, encode_uuid(item_id.0)],
      |r| Ok((r.get(0)?, r.get(1)?)),
    )
    .optional()?;

  match row {
    Some((active, status)) => decode_state(active, status.as_deref()),
    None => Ok(SiteItemState::Untracked),
  }
}

fn required_text(field: SiteField, raw: &str) -> Result<String> {
  match field.validate(raw)? {
    FieldValue::Text(Some(text)) => Ok(text),
    _ => Err(FieldError::RequiredFieldViolation(field).into()),
  }
}

// ─── SupplyStore impl ────────────────────────────────────────────────────────

impl SupplyStore for SqliteStore {
  type Error = Error;

  // ── Sites ─────────────────────────────────────────────────────────────────

  async fn add_site(&self, input: NewSite) -> Result<Site> {
    let now = Utc::now();
    let site = Site {
      site_id:             SiteId::new(),
      name:                required_text(SiteField::SiteName, &input.name)?,
      street_address:      required_text(SiteField::StreetAddress, &input.street_address)?,
      city:                required_text(SiteField::City, &input.city)?,
      county:              required_text(SiteField::County, &input.county)?,
      state:               match input.state.as_deref() {
        Some(raw) => SiteField::State.validate(raw)?.into_text(),
        None => None,
      },
      website:             None,
      facebook:            None,
      hours:               None,
      contact_name:        None,
      contact_email:       None,
      contact_number:      None,
      additional_contacts: None,
      bad_numbers:         None,
      receiving_notes:     None,
      onboarded:           false,
      active:              true,
      accepting_donations: true,
      site_type:           input.site_type,
      max_supply_load:     input.max_supply_load,
      receiving:           ReceivingCapabilities::default(),
      created_at:          now,
      updated_at:          now,
    };

    let id_str          = encode_uuid(site.site_id.0);
    let name            = site.name.clone();
    let street_address  = site.street_address.clone();
    let city            = site.city.clone();
    let county          = site.county.clone();
    let state           = site.state.clone();
    let site_type: &'static str = site.site_type.into();
    let max_supply_load: Option<&'static str> = site.max_supply_load.map(Into::into);
    let at_str          = encode_dt(now);

    self
      .write(move |tx| {
        tx.execute(
          "INSERT INTO sites (
             site_id, name, street_address, city, county, state,
             onboarded, active, accepting_donations,
             site_type, max_supply_load, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, 1, 1, ?7, ?8, ?9, ?9)",
          rusqlite::params![
            id_str,
            name,
            street_address,
            city,
            county,
            state,
            site_type,
            max_supply_load,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(site)
  }

  async fn get_site(&self, site_id: SiteId) -> Result<Option<Site>> {
    let id_str = encode_uuid(site_id.0);

    self
      .read(move |conn| {
        let raw = conn
          .query_row(
            &format!("SELECT {SITE_COLUMNS} FROM sites WHERE site_id = ?1"),
            rusqlite::params![id_str],
            RawSite::from_row,
          )
          .optional()?;
        raw.map(RawSite::into_site).transpose()
      })
      .await
  }

  async fn list_sites(&self) -> Result<Vec<SiteSummary>> {
    self
      .read(|conn| {
        let mut stmt =
          conn.prepare("SELECT site_id, name FROM sites ORDER BY name, site_id")?;
        let raws = stmt
          .query_map([], |row| {
            Ok(RawSiteSummary { site_id: row.get(0)?, name: row.get(1)? })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        raws.into_iter().map(RawSiteSummary::into_summary).collect()
      })
      .await
  }

  async fn update_site_field(&self, site_id: SiteId, key: &str, raw: &str) -> Result<()> {
    let key = key.to_owned();
    let raw = raw.to_owned();

    self
      .write(move |tx| {
        let id_str = require_site(tx, site_id)?;
        let ValidatedUpdate { field, value } = validate_field_update(&key, &raw)?;

        let sql = format!(
          "UPDATE sites SET {} = ?1, updated_at = ?2 WHERE site_id = ?3",
          encode_field_column(field)
        );
        tx.execute(
          &sql,
          rusqlite::params![encode_field_value(value), encode_dt(Utc::now()), id_str],
        )?;
        Ok(())
      })
      .await
  }

  async fn update_receiving_capabilities(
    &self,
    site_id: SiteId,
    capabilities: ReceivingCapabilities,
  ) -> Result<()> {
    let id_str = encode_uuid(site_id.0);
    let at_str = encode_dt(Utc::now());

    self
      .write(move |tx| {
        let changed = tx.execute(
          "UPDATE sites
           SET has_forklift = ?1, has_loading_dock = ?2, has_indoor_storage = ?3,
               updated_at = ?4
           WHERE site_id = ?5",
          rusqlite::params![
            capabilities.forklift,
            capabilities.loading_dock,
            capabilities.indoor_storage,
            at_str,
            id_str,
          ],
        )?;
        if changed == 0 {
          return Err(depot_core::Error::SiteNotFound(site_id).into());
        }
        Ok(())
      })
      .await
  }

  // ── Item catalog ──────────────────────────────────────────────────────────

  async fn ensure_item(&self, name: &str) -> Result<EnsuredItem> {
    let name = name.to_owned();
    self.write(move |tx| ensure_item_in(tx, &name)).await
  }

  async fn list_items(&self) -> Result<Vec<Item>> {
    self
      .read(|conn| {
        let mut stmt = conn
          .prepare("SELECT item_id, name, created_at FROM items ORDER BY name_key")?;
        let raws = stmt
          .query_map([], |row| {
            Ok(RawItem {
              item_id:    row.get(0)?,
              name:       row.get(1)?,
              created_at: row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        raws.into_iter().map(RawItem::into_item).collect()
      })
      .await
  }

  // ── Inventory state ───────────────────────────────────────────────────────

  async fn apply_action(
    &self,
    site_id:   SiteId,
    item_name: &str,
    action:    InventoryAction,
  ) -> Result<SiteItemAudit> {
    let requested = item_name.trim().to_owned();

    self
      .write(move |tx| {
        let site_str = require_site(tx, site_id)?;

        let item_id = match action {
          InventoryAction::Activate(_) => Some(ensure_item_in(tx, &requested)?.item_id),
          InventoryAction::Deactivate | InventoryAction::SetStatus(_) => {
            find_item(tx, &item_name_key(&requested))?
          }
        };

        let current = match item_id {
          Some(id) => load_state(tx, &site_str, id)?,
          None => SiteItemState::Untracked,
        };
        let next = current
          .apply(action)
          .map_err(|e| e.into_error(site_id, requested.as_str()))?;
        let Some(item_id) = item_id else {
          return Err(TransitionError::NotFound.into_error(site_id, requested).into());
        };

        let item_str = encode_uuid(item_id.0);
        let recorded_at = Utc::now();
        let at_str = encode_dt(recorded_at);
        let (active, status) = encode_state(next);

        tx.execute(
          "INSERT INTO site_items (site_id, item_id, active, status, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5)
           ON CONFLICT (site_id, item_id) DO UPDATE SET
             active     = excluded.active,
             status     = excluded.status,
             updated_at = excluded.updated_at",
          rusqlite::params![site_str, item_str, active, status, at_str],
        )?;

        let audit_id = Uuid::new_v4();
        tx.execute(
          "INSERT INTO site_item_audit (audit_id, site_id, item_id, active, status, recorded_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![encode_uuid(audit_id), site_str, item_str, active, status, at_str],
        )?;

        Ok(SiteItemAudit {
          audit_id,
          site_id,
          item_id,
          item_name: stored_item_name(tx, item_id)?,
          state: next,
          recorded_at,
        })
      })
      .await
  }

  async fn set_external_id(
    &self,
    site_id:     SiteId,
    item_name:   &str,
    external_id: Option<i64>,
  ) -> Result<()> {
    let requested = item_name.trim().to_owned();

    self
      .write(move |tx| {
        let site_str = require_site(tx, site_id)?;
        let not_found = || -> Error {
          TransitionError::NotFound.into_error(site_id, requested.as_str()).into()
        };

        let item_id = find_item(tx, &item_name_key(&requested))?.ok_or_else(not_found)?;
        let changed = tx.execute(
          "UPDATE site_items SET external_id = ?1 WHERE site_id = ?2 AND item_id = ?3",
          rusqlite::params![external_id, site_str, encode_uuid(item_id.0)],
        )?;
        if changed == 0 {
          return Err(not_found());
        }
        Ok(())
      })
      .await
  }

  async fn fetch_inventory(&self, site_id: SiteId) -> Result<Vec<InventoryEntry>> {
    let id_str = encode_uuid(site_id.0);

    self
      .read(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT i.item_id, i.name, si.active, si.status, si.external_id
           FROM site_items si
           JOIN items i ON i.item_id = si.item_id
           WHERE si.site_id = ?1
           ORDER BY i.name_key",
        )?;
        let raws = stmt
          .query_map(rusqlite::params![id_str], |row| {
            Ok(RawInventoryEntry {
              item_id:     row.get(0)?,
              item_name:   row.get(1)?,
              active:      row.get(2)?,
              status:      row.get(3)?,
              external_id: row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        raws.into_iter().map(RawInventoryEntry::into_entry).collect()
      })
      .await
  }

  async fn fetch_status(
    &self,
    site_id:   SiteId,
    item_name: &str,
  ) -> Result<Option<UrgencyStatus>> {
    let id_str = encode_uuid(site_id.0);
    let key = item_name_key(item_name);

    self
      .read(move |conn| {
        let row: Option<(bool, Option<String>)> = conn
          .query_row(
            "SELECT si.active, si.status
             FROM site_items si
             JOIN items i ON i.item_id = si.item_id
             WHERE si.site_id = ?1 AND i.name_key = ?2",
            rusqlite::params![id_str, key],
            |r| Ok((r.get(0)?, r.get(1)?)),
          )
          .optional()?;

        match row {
          Some((active, status)) => Ok(decode_state(active, status.as_deref())?.status()),
          None => Ok(None),
        }
      })
      .await
  }

  // ── Audit trail ───────────────────────────────────────────────────────────

  async fn audit_count(&self) -> Result<u64> {
    self
      .read(|conn| {
        let count: i64 =
          conn.query_row("SELECT COUNT(*) FROM site_item_audit", [], |r| r.get(0))?;
        Ok(count as u64)
      })
      .await
  }

  async fn audit_history(&self, site_id: SiteId) -> Result<Vec<SiteItemAudit>> {
    let id_str = encode_uuid(site_id.0);

    self
      .read(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT a.audit_id, a.site_id, a.item_id, i.name, a.active, a.status, a.recorded_at
           FROM site_item_audit a
           JOIN items i ON i.item_id = a.item_id
           WHERE a.site_id = ?1
           ORDER BY a.seq",
        )?;
        let raws = stmt
          .query_map(rusqlite::params![id_str], |row| {
            Ok(RawAudit {
              audit_id:    row.get(0)?,
              site_id:     row.get(1)?,
              item_id:     row.get(2)?,
              item_name:   row.get(3)?,
              active:      row.get(4)?,
              status:      row.get(5)?,
              recorded_at: row.get(6)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        raws.into_iter().map(RawAudit::into_audit).collect()
      })
      .await
  }
}
