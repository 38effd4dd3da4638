//! Async host services.
//!
//! Two lookups live on the host side of the boundary: the taxonomy of
//! numeric device classes and the icon resource for a device class. Both
//! are async and explicitly decoupled from the synchronous derivation
//! path; the pipeline never awaits them. A superseded icon lookup needs
//! no cancellation; its result simply goes undisplayed when the holder is
//! replaced.

use async_trait::async_trait;
use tracing::warn;

/// Failure surfaced by a host call. The derivation engine itself is
/// total and never raises; only this boundary can fail.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("host unavailable: {0}")]
    Unavailable(String),

    #[error("host returned malformed data: {0}")]
    Malformed(String),
}

/// Read-only services the host platform provides.
#[async_trait]
pub trait HostServices: Send + Sync {
    /// The host-defined set of device classes with numeric readings.
    async fn numeric_device_classes(&self) -> Result<Vec<String>, HostError>;

    /// Icon resource for a domain/device-class pair, if the host has one.
    async fn icon_for_device_class(
        &self,
        domain: &str,
        device_class: &str,
    ) -> Result<Option<String>, HostError>;
}

/// Lazily resolve the icon for an averaged sensor group.
///
/// Host failures degrade to "no icon"; the group renders without one.
pub async fn resolve_group_icon(host: &dyn HostServices, device_class: &str) -> Option<String> {
    match host.icon_for_device_class("sensor", device_class).await {
        Ok(icon) => icon,
        Err(err) => {
            warn!(device_class, %err, "group icon lookup failed");
            None
        }
    }
}
