use depot_core::{notify::UpdateNotifier, site::SiteId};

/// Reports site changes to the log; stands in for the downstream refresh
/// hooks (public listings, export feeds).
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl UpdateNotifier for LogNotifier {
  async fn site_changed(&self, site_id: SiteId) {
    tracing::info!(%site_id, "site changed; downstream consumers should refresh");
  }
}
