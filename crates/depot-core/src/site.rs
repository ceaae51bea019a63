//! Site: a physical relief-supply location participating in the network.
//!
//! Sites are created by an onboarding flow and then mutated field-by-field
//! through the site field registry. They are never deleted; the `active` flag
//! soft-deactivates them instead.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr, VariantNames};
use uuid::Uuid;

// ─── Identity ────────────────────────────────────────────────────────────────

/// Stable, immutable site identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteId(pub Uuid);

impl SiteId {
  pub fn new() -> Self { Self(Uuid::new_v4()) }
}

impl Default for SiteId {
  fn default() -> Self { Self::new() }
}

impl fmt::Display for SiteId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Display::fmt(&self.0, f)
  }
}

impl FromStr for SiteId {
  type Err = uuid::Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> { Ok(Self(Uuid::parse_str(s)?)) }
}

// ─── Enumerated attributes ───────────────────────────────────────────────────

/// What role a site plays in the distribution network.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  AsRefStr,
  IntoStaticStr,
  VariantNames,
)]
pub enum SiteType {
  #[strum(serialize = "Distribution Center")]
  #[serde(rename = "Distribution Center")]
  DistributionCenter,
  #[strum(serialize = "Supply Hub")]
  #[serde(rename = "Supply Hub")]
  SupplyHub,
}

/// The largest vehicle a site can receive a delivery from.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  AsRefStr,
  IntoStaticStr,
  VariantNames,
)]
pub enum MaxSupplyLoad {
  #[strum(serialize = "Car")]
  #[serde(rename = "Car")]
  Car,
  #[strum(serialize = "Pickup Truck")]
  #[serde(rename = "Pickup Truck")]
  PickupTruck,
  #[strum(serialize = "Box Truck")]
  #[serde(rename = "Box Truck")]
  BoxTruck,
  #[strum(serialize = "Semi Truck")]
  #[serde(rename = "Semi Truck")]
  SemiTruck,
}

/// Physical receiving facilities; always written together as one unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceivingCapabilities {
  pub forklift:       bool,
  pub loading_dock:   bool,
  pub indoor_storage: bool,
}

// ─── Site ────────────────────────────────────────────────────────────────────

/// The full stored record of a site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
  pub site_id:             SiteId,
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
  pub site_type:           SiteType,
  pub max_supply_load:     Option<MaxSupplyLoad>,
  pub receiving:           ReceivingCapabilities,
  pub created_at:          DateTime<Utc>,
  pub updated_at:          DateTime<Utc>,
}

/// Input to [`crate::store::SupplyStore::add_site`].
///
/// Only the attributes the onboarding flow collects; everything else starts
/// empty and is filled in later through field updates.
#[derive(Debug, Clone)]
pub struct NewSite {
  pub name:            String,
  pub street_address:  String,
  pub city:            String,
  pub county:          String,
  pub state:           Option<String>,
  pub site_type:       SiteType,
  pub max_supply_load: Option<MaxSupplyLoad>,
}

impl NewSite {
  /// Convenience constructor for a distribution center with no state or
  /// supply-load class recorded.
  pub fn new(
    name: impl Into<String>,
    street_address: impl Into<String>,
    city: impl Into<String>,
    county: impl Into<String>,
  ) -> Self {
    Self {
      name:            name.into(),
      street_address:  street_address.into(),
      city:            city.into(),
      county:          county.into(),
      state:           None,
      site_type:       SiteType::DistributionCenter,
      max_supply_load: None,
    }
  }
}

/// A row of the site picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSummary {
  pub site_id: SiteId,
  pub name:    String,
}
