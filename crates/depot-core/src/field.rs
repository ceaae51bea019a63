//! The site field registry: which site attributes may be edited, under what
//! policy, and with what value type.
//!
//! The registry is a static table keyed by [`SiteField`]; a field key coming
//! from a caller is resolved once with [`SiteField::lookup`] and everything
//! else is an exhaustive `match`.

use std::str::FromStr;

use strum::{Display, EnumIter, EnumString, IntoStaticStr, VariantNames};
use thiserror::Error;

use crate::{
  ErrorKind,
  site::{MaxSupplyLoad, SiteType},
};

// ─── Registry ────────────────────────────────────────────────────────────────

/// Every mutable site attribute, addressed by its camelCase key
/// (e.g. `"siteName"`).
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Display,
  EnumString,
  EnumIter,
  IntoStaticStr,
)]
#[strum(serialize_all = "camelCase")]
pub enum SiteField {
  SiteName,
  StreetAddress,
  City,
  County,
  State,
  Website,
  Facebook,
  SiteHours,
  ContactName,
  ContactEmail,
  ContactNumber,
  AdditionalContacts,
  BadNumbers,
  ReceivingNotes,
  Onboarded,
  Active,
  AcceptingDonations,
  SiteType,
  MaxSupplyLoad,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPolicy {
  /// The field can never be cleared.
  Required,
  /// A blank value clears the field.
  Optional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
  Text,
  Boolean,
  /// One of a fixed set of canonical names, matched case-sensitively.
  Enumerated(&'static [&'static str]),
}

impl SiteField {
  pub fn key(self) -> &'static str { self.into() }

  pub fn lookup(key: &str) -> Result<Self, FieldError> {
    Self::from_str(key).map_err(|_| FieldError::UnknownField(key.to_owned()))
  }

  pub fn policy(self) -> FieldPolicy {
    match self {
      Self::SiteName
      | Self::StreetAddress
      | Self::City
      | Self::County
      | Self::Onboarded
      | Self::Active
      | Self::AcceptingDonations
      | Self::SiteType => FieldPolicy::Required,
      Self::State
      | Self::Website
      | Self::Facebook
      | Self::SiteHours
      | Self::ContactName
      | Self::ContactEmail
      | Self::ContactNumber
      | Self::AdditionalContacts
      | Self::BadNumbers
      | Self::ReceivingNotes
      | Self::MaxSupplyLoad => FieldPolicy::Optional,
    }
  }

  pub fn kind(self) -> FieldKind {
    match self {
      Self::Onboarded | Self::Active | Self::AcceptingDonations => {
        FieldKind::Boolean
      }
      Self::SiteType => FieldKind::Enumerated(SiteType::VARIANTS),
      Self::MaxSupplyLoad => FieldKind::Enumerated(MaxSupplyLoad::VARIANTS),
      _ => FieldKind::Text,
    }
  }

  /// Validate and normalise a proposed raw value for this field.
  pub fn validate(self, raw: &str) -> Result<FieldValue, FieldError> {
    let value = raw.trim();

    if value.is_empty() {
      return match (self.policy(), self.kind()) {
        (FieldPolicy::Required, _) => {
          Err(FieldError::RequiredFieldViolation(self))
        }
        (FieldPolicy::Optional, FieldKind::Text) => Ok(FieldValue::Text(None)),
        (FieldPolicy::Optional, FieldKind::Enumerated(_)) => {
          Ok(FieldValue::Enumerated(None))
        }
        (FieldPolicy::Optional, FieldKind::Boolean) => {
          Err(FieldError::InvalidBooleanValue {
            field: self,
            value: raw.to_owned(),
          })
        }
      };
    }

    match self.kind() {
      FieldKind::Text => Ok(FieldValue::Text(Some(value.to_owned()))),
      FieldKind::Boolean => match value {
        "true" => Ok(FieldValue::Boolean(true)),
        "false" => Ok(FieldValue::Boolean(false)),
        _ => Err(FieldError::InvalidBooleanValue {
          field: self,
          value: raw.to_owned(),
        }),
      },
      FieldKind::Enumerated(domain) => domain
        .iter()
        .find(|member| **member == value)
        .map(|member| FieldValue::Enumerated(Some(*member)))
        .ok_or_else(|| FieldError::InvalidEnumValue {
          field: self,
          value: raw.to_owned(),
        }),
    }
  }
}

// ─── Values ──────────────────────────────────────────────────────────────────

/// A validated value, ready to persist. `None` clears an optional field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
  Text(Option<String>),
  Boolean(bool),
  Enumerated(Option<&'static str>),
}

impl FieldValue {
  /// The text payload, if this is a non-empty text value.
  pub fn into_text(self) -> Option<String> {
    match self {
      Self::Text(t) => t,
      _ => None,
    }
  }
}

/// A field update that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUpdate {
  pub field: SiteField,
  pub value: FieldValue,
}

/// Resolve `key` in the registry and validate `raw` against its policy.
pub fn validate_field_update(
  key: &str,
  raw: &str,
) -> Result<ValidatedUpdate, FieldError> {
  let field = SiteField::lookup(key)?;
  let value = field.validate(raw)?;
  Ok(ValidatedUpdate { field, value })
}

// ─── Errors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
  #[error("unknown site field: {0:?}")]
  UnknownField(String),

  #[error("field {0} is required and cannot be blank")]
  RequiredFieldViolation(SiteField),

  #[error("{value:?} is not a valid value for {field}")]
  InvalidEnumValue { field: SiteField, value: String },

  #[error("{value:?} is not a boolean (expected `true` or `false`) for {field}")]
  InvalidBooleanValue { field: SiteField, value: String },
}

impl FieldError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::UnknownField(_) => ErrorKind::UnknownField,
      Self::RequiredFieldViolation(_) => ErrorKind::RequiredFieldViolation,
      Self::InvalidEnumValue { .. } => ErrorKind::InvalidEnumValue,
      Self::InvalidBooleanValue { .. } => ErrorKind::InvalidBooleanValue,
    }
  }
}
