//! Subcommands and their dispatch onto the [`Coordinator`].
//!
//! Every command prints its result as pretty JSON on stdout.

use anyhow::{Context as _, bail};
use clap::{Args, Subcommand};
use depot_core::{
  inventory::UrgencyStatus,
  service::Coordinator,
  site::{MaxSupplyLoad, NewSite, ReceivingCapabilities, SiteId, SiteType},
  store::SupplyStore,
};
use serde::Serialize;

use crate::notifier::LogNotifier;

// ─── Command tree ────────────────────────────────────────────────────────────

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Create, inspect and edit sites.
  #[command(subcommand)]
  Site(SiteCommand),
  /// Manage the shared item catalog.
  #[command(subcommand)]
  Item(ItemCommand),
  /// Track which items a site carries and how urgently.
  #[command(subcommand)]
  Inventory(InventoryCommand),
  /// Inspect the inventory audit trail.
  #[command(subcommand)]
  Audit(AuditCommand),
}

#[derive(Subcommand, Debug)]
pub enum SiteCommand {
  /// Onboard a new site.
  Add(NewSiteArgs),
  /// Show every attribute of one site.
  Show { site: SiteId },
  /// List site ids and names.
  List,
  /// Update one registry field, e.g. `depot site set <SITE> contactNumber 555-0100`.
  Set {
    site:  SiteId,
    field: String,
    /// New value; an empty string clears an optional field.
    value: String,
  },
  /// Replace the site's receiving capabilities. Omitted flags become false.
  Receiving {
    site:           SiteId,
    #[arg(long)]
    forklift:       bool,
    #[arg(long)]
    loading_dock:   bool,
    #[arg(long)]
    indoor_storage: bool,
  },
}

#[derive(Args, Debug)]
pub struct NewSiteArgs {
  #[arg(long)]
  name:     String,
  #[arg(long)]
  address:  String,
  #[arg(long)]
  city:     String,
  #[arg(long)]
  county:   String,
  #[arg(long)]
  state:    Option<String>,
  /// "Distribution Center" or "Supply Hub".
  #[arg(long = "type", default_value = "Distribution Center")]
  kind:     SiteType,
  /// "Car", "Pickup Truck", "Box Truck" or "Semi Truck".
  #[arg(long)]
  max_load: Option<MaxSupplyLoad>,
}

impl From<NewSiteArgs> for NewSite {
  fn from(a: NewSiteArgs) -> Self {
    Self {
      name:            a.name,
      street_address:  a.address,
      city:            a.city,
      county:          a.county,
      state:           a.state,
      site_type:       a.kind,
      max_supply_load: a.max_load,
    }
  }
}

#[derive(Subcommand, Debug)]
pub enum ItemCommand {
  /// Add an item to the catalog unless it exists under any casing.
  Ensure { name: String },
  /// List every catalog item.
  List,
}

#[derive(Subcommand, Debug)]
pub enum InventoryCommand {
  /// Every item the site has ever tracked, active or not.
  Show { site: SiteId },
  /// Start tracking an item at a site with the given urgency.
  Activate {
    site:   SiteId,
    item:   String,
    /// "Urgently Needed", "Needed", "Available" or "Oversupply".
    status: UrgencyStatus,
  },
  /// Stop tracking an item at a site.
  Deactivate { site: SiteId, item: String },
  /// Change the urgency of an active item.
  SetStatus {
    site:   SiteId,
    item:   String,
    status: UrgencyStatus,
  },
  /// Current urgency of an item, or null if it is not active.
  Status { site: SiteId, item: String },
  /// Attach an upstream feed id to a tracked item; omit the id to clear it.
  Link {
    site:        SiteId,
    item:        String,
    external_id: Option<i64>,
  },
}

#[derive(Subcommand, Debug)]
pub enum AuditCommand {
  /// Audit records for one site, oldest first.
  History { site: SiteId },
  /// Total number of audit records.
  Count,
}

// ─── Dispatch ────────────────────────────────────────────────────────────────

pub async fn run<S>(
  coordinator: &Coordinator<S, LogNotifier>,
  command: Command,
) -> anyhow::Result<()>
where
  S: SupplyStore,
{
  match command {
    Command::Site(cmd) => run_site(coordinator, cmd).await,
    Command::Item(cmd) => run_item(coordinator, cmd).await,
    Command::Inventory(cmd) => run_inventory(coordinator, cmd).await,
    Command::Audit(cmd) => run_audit(coordinator, cmd).await,
  }
}

async fn run_site<S: SupplyStore>(
  c: &Coordinator<S, LogNotifier>,
  cmd: SiteCommand,
) -> anyhow::Result<()> {
  match cmd {
    SiteCommand::Add(args) => emit(&c.add_site(args.into()).await?),
    SiteCommand::Show { site } => match c.get_site(site).await? {
      Some(s) => emit(&s),
      None => bail!("no site with id {site}"),
    },
    SiteCommand::List => emit(&c.list_sites().await?),
    SiteCommand::Set { site, field, value } => {
      c.update_field(site, &field, &value).await?;
      emit(&c.get_site(site).await?)
    }
    SiteCommand::Receiving {
      site,
      forklift,
      loading_dock,
      indoor_storage,
    } => {
      let capabilities = ReceivingCapabilities {
        forklift,
        loading_dock,
        indoor_storage,
      };
      c.update_receiving_capabilities(site, capabilities).await?;
      emit(&capabilities)
    }
  }
}

async fn run_item<S: SupplyStore>(
  c: &Coordinator<S, LogNotifier>,
  cmd: ItemCommand,
) -> anyhow::Result<()> {
  match cmd {
    ItemCommand::Ensure { name } => emit(&c.ensure_item(&name).await?),
    ItemCommand::List => emit(&c.list_items().await?),
  }
}

async fn run_inventory<S: SupplyStore>(
  c: &Coordinator<S, LogNotifier>,
  cmd: InventoryCommand,
) -> anyhow::Result<()> {
  match cmd {
    InventoryCommand::Show { site } => emit(&c.fetch_inventory(site).await?),
    InventoryCommand::Activate { site, item, status } => {
      emit(&c.activate(site, &item, status).await?)
    }
    InventoryCommand::Deactivate { site, item } => {
      emit(&c.deactivate(site, &item).await?)
    }
    InventoryCommand::SetStatus { site, item, status } => {
      emit(&c.set_status(site, &item, status).await?)
    }
    InventoryCommand::Status { site, item } => {
      emit(&c.fetch_status(site, &item).await?)
    }
    InventoryCommand::Link {
      site,
      item,
      external_id,
    } => {
      c.set_external_id(site, &item, external_id).await?;
      emit(&external_id)
    }
  }
}

async fn run_audit<S: SupplyStore>(
  c: &Coordinator<S, LogNotifier>,
  cmd: AuditCommand,
) -> anyhow::Result<()> {
  match cmd {
    AuditCommand::History { site } => emit(&c.audit_history(site).await?),
    AuditCommand::Count => emit(&c.audit_count().await?),
  }
}

fn emit<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("failed to encode output")?;
  println!("{json}");
  Ok(())
}
