//! buttplug-backed device hub.
//!
//! Wraps `ButtplugClient` behind the [`DeviceHub`] seam: connect once over
//! a websocket, run one discovery pass, then expose a read-only device view
//! to the control loop.

use std::sync::Arc;

use async_trait::async_trait;
use buttplug::client::device::ScalarValueCommand;
use buttplug::client::{ButtplugClient, ButtplugClientDevice};
use buttplug::core::connector::new_json_ws_client_connector;
use tracing::debug;

use crate::device::{DeviceHandle, DeviceHub};
use crate::error::{Error, Result};

/// Client handle for an Intiface-compatible device server.
pub struct IntifaceHub {
    client: ButtplugClient,
    endpoint: String,
}

impl IntifaceHub {
    /// Connects to the server at `endpoint`, identifying as `client_name`.
    ///
    /// The returned error keeps the connector's failure as its source so
    /// callers can surface the underlying cause.
    pub async fn connect(endpoint: &str, client_name: &str) -> Result<Self> {
        let connector = new_json_ws_client_connector(endpoint);
        let client = ButtplugClient::new(client_name);
        client.connect(connector).await.map_err(|err| Error::Connect {
            endpoint: endpoint.to_string(),
            source: err.into(),
        })?;
        debug!(target = "vibectl", endpoint, "connected");
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl DeviceHub for IntifaceHub {
    async fn scan_once(&self) -> Result<()> {
        // Back-to-back start/stop is deliberate: one pass over whatever the
        // server already sees, not continuous scanning.
        self.client
            .start_scanning()
            .await
            .map_err(|err| Error::Scan(err.into()))?;
        self.client
            .stop_scanning()
            .await
            .map_err(|err| Error::Scan(err.into()))?;
        Ok(())
    }

    fn devices(&self) -> Vec<Arc<dyn DeviceHandle>> {
        self.client
            .devices()
            .into_iter()
            .map(|device| Arc::new(IntifaceDevice { device }) as Arc<dyn DeviceHandle>)
            .collect()
    }

    async fn stop_all(&self) -> Result<()> {
        self.client
            .stop_all_devices()
            .await
            .map_err(|err| Error::Stop(err.into()))
    }

    async fn disconnect(&self) -> Result<()> {
        self.client
            .disconnect()
            .await
            .map_err(|err| Error::Disconnect(err.into()))
    }
}

struct IntifaceDevice {
    device: Arc<ButtplugClientDevice>,
}

#[async_trait]
impl DeviceHandle for IntifaceDevice {
    fn name(&self) -> String {
        self.device.name().clone()
    }

    fn vibrator_count(&self) -> usize {
        self.device.vibrate_attributes().len()
    }

    async fn vibrate(&self, speeds: &[f64]) -> Result<()> {
        self.device
            .vibrate(&ScalarValueCommand::ScalarValueVec(speeds.to_vec()))
            .await
            .map_err(|err| Error::Vibrate {
                device: self.device.name().clone(),
                source: err.into(),
            })
    }
}
