//! The update-notification hook.
//!
//! Downstream consumers (public listings, export feeds) refresh themselves
//! when told that a site changed. The core only guarantees *when* the signal
//! fires: once per committed mutating request, after the commit.

use std::{future::Future, sync::Arc};

use crate::site::SiteId;

pub trait UpdateNotifier: Send + Sync {
  /// Called after a mutation touching `site_id` has committed.
  fn site_changed(
    &self,
    site_id: SiteId,
  ) -> impl Future<Output = ()> + Send + '_;
}

/// A notifier that ignores every signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl UpdateNotifier for NoopNotifier {
  async fn site_changed(&self, _site_id: SiteId) {}
}

impl<N: UpdateNotifier> UpdateNotifier for Arc<N> {
  fn site_changed(
    &self,
    site_id: SiteId,
  ) -> impl Future<Output = ()> + Send + '_ {
    (**self).site_changed(site_id)
  }
}
