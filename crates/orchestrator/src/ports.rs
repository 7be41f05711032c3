use async_trait::async_trait;
use tokio::sync::broadcast;

use factlens_core_types::{DriverCommand, DriverEvent, HelperHandle, SurfaceEvent};
use factlens_event_bus::Outbox;

use crate::errors::HostError;

/// Something that can open automation-controlled surfaces and run a chat
/// driver inside them.
#[async_trait]
pub trait HelperHost: Send + Sync {
    async fn open_surface(&self, url: &str) -> Result<HelperHandle, HostError>;

    async fn surface_exists(&self, handle: &HelperHandle) -> bool;

    /// Start a driver in the surface. It reports through `outbox`.
    async fn inject_driver(
        &self,
        handle: &HelperHandle,
        outbox: Outbox<DriverEvent>,
    ) -> Result<(), HostError>;

    async fn send_command(
        &self,
        handle: &HelperHandle,
        command: DriverCommand,
    ) -> Result<(), HostError>;

    /// Close the surface and cancel its driver. Closing twice is not an error.
    async fn close_surface(&self, handle: &HelperHandle) -> Result<(), HostError>;

    /// Lifecycle events for every surface this host owns.
    fn surface_events(&self) -> broadcast::Receiver<SurfaceEvent>;
}
