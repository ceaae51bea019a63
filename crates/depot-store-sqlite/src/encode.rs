//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, UUIDs as hyphenated lowercase
//! strings, and enumerations by their canonical display name.

use chrono::{DateTime, Utc};
use depot_core::{
  field::{FieldValue, SiteField},
  inventory::{InventoryEntry, SiteItemAudit, SiteItemState, UrgencyStatus},
  item::{Item, ItemId},
  site::{MaxSupplyLoad, ReceivingCapabilities, Site, SiteId, SiteSummary, SiteType},
};
use rusqlite::types::Value;
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn decode_site_id(s: &str) -> Result<SiteId> { Ok(SiteId(decode_uuid(s)?)) }

pub fn decode_item_id(s: &str) -> Result<ItemId> { Ok(ItemId(decode_uuid(s)?)) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Enumerations ─────────────────────────────────────────────────────────────

pub fn encode_status(s: UrgencyStatus) -> &'static str { s.into() }

pub fn decode_status(s: &str) -> Result<UrgencyStatus> {
  s.parse()
    .map_err(|_| Error::Decode(format!("unknown urgency status: {s:?}")))
}

pub fn decode_site_type(s: &str) -> Result<SiteType> {
  s.parse()
    .map_err(|_| Error::Decode(format!("unknown site type: {s:?}")))
}

pub fn decode_max_supply_load(s: &str) -> Result<MaxSupplyLoad> {
  s.parse()
    .map_err(|_| Error::Decode(format!("unknown max supply load: {s:?}")))
}

// ─── SiteItemState ────────────────────────────────────────────────────────────

/// Split a state into its `(active, status)` columns.
pub fn encode_state(state: SiteItemState) -> (bool, Option<&'static str>) {
  (state.is_active(), state.status().map(encode_status))
}

pub fn decode_state(active: bool, status: Option<&str>) -> Result<SiteItemState> {
  let status = status.map(decode_status).transpose()?;
  SiteItemState::from_row(active, status)
    .ok_or_else(|| Error::Decode("active site item without a status".into()))
}

// ─── Site fields ──────────────────────────────────────────────────────────────

/// The `sites` column backing each registry field.
pub fn encode_field_column(field: SiteField) -> &'static str {
  match field {
    SiteField::SiteName => "name",
    SiteField::StreetAddress => "street_address",
    SiteField::City => "city",
    SiteField::County => "county",
    SiteField::State => "state",
    SiteField::Website => "website",
    SiteField::Facebook => "facebook",
    SiteField::SiteHours => "hours",
    SiteField::ContactName => "contact_name",
    SiteField::ContactEmail => "contact_email",
    SiteField::ContactNumber => "contact_number",
    SiteField::AdditionalContacts => "additional_contacts",
    SiteField::BadNumbers => "bad_numbers",
    SiteField::ReceivingNotes => "receiving_notes",
    SiteField::Onboarded => "onboarded",
    SiteField::Active => "active",
    SiteField::AcceptingDonations => "accepting_donations",
    SiteField::SiteType => "site_type",
    SiteField::MaxSupplyLoad => "max_supply_load",
  }
}

pub fn encode_field_value(value: FieldValue) -> Value {
  match value {
    FieldValue::Text(Some(t)) => Value::Text(t),
    FieldValue::Enumerated(Some(e)) => Value::Text(e.to_owned()),
    FieldValue::Text(None) | FieldValue::Enumerated(None) => Value::Null,
    FieldValue::Boolean(b) => Value::Integer(i64::from(b)),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawSite::from_row`].
pub const SITE_COLUMNS: &str = "
  site_id, name, street_address, city, county, state,
  website, facebook, hours, contact_name, contact_email, contact_number,
  additional_contacts, bad_numbers, receiving_notes,
  onboarded, active, accepting_donations, site_type, max_supply_load,
  has_forklift, has_loading_dock, has_indoor_storage,
  created_at, updated_at";

/// Raw values read directly from a `sites` row.
pub struct RawSite {
  pub site_id:             String,
  pub name:                String,
  pub street_address:      String,
  pub city:                String,
  pub county:              String,
  pub state:               Option<String>,
  pub website:             Option<String>,
  pub facebook:            Option<String>,
  pub hours:               Option<String>,
  pub contact_name:        Option<String>,
  pub contact_email:       Option<String>,
  pub contact_number:      Option<String>,
  pub additional_contacts: Option<String>,
  pub bad_numbers:         Option<String>,
  pub receiving_notes:     Option<String>,
  pub onboarded:           bool,
  pub active:              bool,
  pub accepting_donations: bool,
  pub site_type:           String,
  pub max_supply_load:     Option<String>,
  pub has_forklift:        bool,
  pub has_loading_dock:    bool,
  pub has_indoor_storage:  bool,
  pub created_at:          String,
  pub updated_at:          String,
}

impl RawSite {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      site_id:             row.get(0)?,
      name:                row.get(1)?,
      street_address:      row.get(2)?,
      city:                row.get(3)?,
      county:              row.get(4)?,
      state:               row.get(5)?,
      website:             row.get(6)?,
      facebook:            row.get(7)?,
      hours:               row.get(8)?,
      contact_name:        row.get(9)?,
      contact_email:       row.get(10)?,
      contact_number:      row.get(11)?,
      additional_contacts: row.get(12)?,
      bad_numbers:         row.get(13)?,
      receiving_notes:     row.get(14)?,
      onboarded:           row.get(15)?,
      active:              row.get(16)?,
      accepting_donations: row.get(17)?,
      site_type:           row.get(18)?,
      max_supply_load:     row.get(19)?,
      has_forklift:        row.get(20)?,
      has_loading_dock:    row.get(21)?,
      has_indoor_storage:  row.get(22)?,
      created_at:          row.get(23)?,
      updated_at:          row.get(24)?,
    })
  }

  pub fn into_site(self) -> Result<Site> {
    Ok(Site {
      site_id:             decode_site_id(&self.site_id)?,
      name:                self.name,
      street_address:      self.street_address,
      city:                self.city,
      county:              self.county,
      state:               self.state,
      website:             self.website,
      facebook:            self.facebook,
      hours:               self.hours,
      contact_name:        self.contact_name,
      contact_email:       self.contact_email,
      contact_number:      self.contact_number,
      additional_contacts: self.additional_contacts,
      bad_numbers:         self.bad_numbers,
      receiving_notes:     self.receiving_notes,
      onboarded:           self.onboarded,
      active:              self.active,
      accepting_donations: self.accepting_donations,
      site_type:           decode_site_type(&self.site_type)?,
      max_supply_load:     self
        .max_supply_load
        .as_deref()
        .map(decode_max_supply_load)
        .transpose()?,
      receiving:           ReceivingCapabilities {
        forklift:       self.has_forklift,
        loading_dock:   self.has_loading_dock,
        indoor_storage: self.has_indoor_storage,
      },
      created_at:          decode_dt(&self.created_at)?,
      updated_at:          decode_dt(&self.updated_at)?,
    })
  }
}

pub struct RawSiteSummary {
  pub site_id: String,
  pub name:    String,
}

impl RawSiteSummary {
  pub fn into_summary(self) -> Result<SiteSummary> {
    Ok(SiteSummary { site_id: decode_site_id(&self.site_id)?, name: self.name })
  }
}

pub struct RawItem {
  pub item_id:    String,
  pub name:       String,
  pub created_at: String,
}

impl RawItem {
  pub fn into_item(self) -> Result<Item> {
    Ok(Item {
      item_id:    decode_item_id(&self.item_id)?,
      name:       self.name,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// A `site_items` row joined with its item name.
pub struct RawInventoryEntry {
  pub item_id:     String,
  pub item_name:   String,
  pub active:      bool,
  pub status:      Option<String>,
  pub external_id: Option<i64>,
}

impl RawInventoryEntry {
  pub fn into_entry(self) -> Result<InventoryEntry> {
    Ok(InventoryEntry {
      item_id:     decode_item_id(&self.item_id)?,
      item_name:   self.item_name,
      state:       decode_state(self.active, self.status.as_deref())?,
      external_id: self.external_id,
    })
  }
}

/// A `site_item_audit` row joined with its item name.
pub struct RawAudit {
  pub audit_id:    String,
  pub site_id:     String,
  pub item_id:     String,
  pub item_name:   String,
  pub active:      bool,
  pub status:      Option<String>,
  pub recorded_at: String,
}

impl RawAudit {
  pub fn into_audit(self) -> Result<SiteItemAudit> {
    Ok(SiteItemAudit {
      audit_id:    decode_uuid(&self.audit_id)?,
      site_id:     decode_site_id(&self.site_id)?,
      item_id:     decode_item_id(&self.item_id)?,
      item_name:   self.item_name,
      state:       decode_state(self.active, self.status.as_deref())?,
      recorded_at: decode_dt(&self.recorded_at)?,
    })
  }
}
