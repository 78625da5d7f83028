// Copyright 2026 Daniel Pelikan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Adapter bring-up, bonded-device listing and outgoing RFCOMM connects.

use anyhow::{anyhow, Context, Result};
use bluer::rfcomm::{SocketAddr, Stream};
use bluer::{Address, Session};
use std::fmt;
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

/// Standard SPP UUID. ELM327 adapters advertise their serial channel under it.
pub const SPP_UUID: Uuid = Uuid::from_u128(0x00001101_0000_1000_8000_00805F9B34FB);

/// A bonded Bluetooth device.
#[derive(Debug, Clone)]
pub struct PairedDevice {
    pub address: Address,
    pub name: String,
}

impl fmt::Display for PairedDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.address)
    }
}

/// Owns the BlueZ session and adapter used for all Bluetooth operations.
pub struct BluetoothManager {
    _session: Session,
    adapter: bluer::Adapter,
}

impl BluetoothManager {
    /// Connect to BlueZ and bring up an adapter.
    ///
    /// `adapter_name` selects a specific adapter (e.g. "hci1"); `None` uses
    /// the default. Fails cleanly when the host has no Bluetooth adapter.
    pub async fn new(adapter_name: Option<&str>) -> Result<Self> {
        let session = Session::new()
            .await
            .context("failed to connect to BlueZ; is bluetoothd running?")?;

        let adapter = match adapter_name {
            Some(name) => session
                .adapter(name)
                .with_context(|| format!("no Bluetooth adapter named '{name}'"))?,
            None => session
                .default_adapter()
                .await
                .context("this host has no Bluetooth adapter")?,
        };
        info!("Using Bluetooth adapter: {}", adapter.name());

        // Ensure adapter is powered on
        if !adapter.is_powered().await? {
            info!("Powering on Bluetooth adapter...");
            adapter.set_powered(true).await?;
        }

        Ok(Self {
            _session: session,
            adapter,
        })
    }

    /// Local adapter address.
    pub async fn address(&self) -> Result<Address> {
        Ok(self.adapter.address().await?)
    }

    /// List bonded devices known to the adapter.
    pub async fn bonded_devices(&self) -> Result<Vec<PairedDevice>> {
        let mut devices = Vec::new();

        for addr in self.adapter.device_addresses().await? {
            let device = self.adapter.device(addr)?;
            if device.is_paired().await? {
                let name = device.alias().await.unwrap_or_else(|_| addr.to_string());
                devices.push(PairedDevice {
                    address: addr,
                    name,
                });
            }
        }

        if devices.is_empty() {
            warn!("No paired devices found");
        }
        Ok(devices)
    }

    /// Open an RFCOMM/SPP socket to `address` and connect.
    ///
    /// BlueZ sockets address the serial service by channel number rather than
    /// by the SPP UUID; ELM327 clones put it on channel 1. The connect itself
    /// is bounded by `timeout` so a powered-off adapter cannot hang the
    /// session forever. On failure the half-open socket is dropped.
    pub async fn connect_spp(
        &self,
        address: Address,
        channel: u8,
        timeout: Duration,
    ) -> Result<Stream> {
        info!(
            "Connecting to {} on RFCOMM channel {} (SPP {})",
            address, channel, SPP_UUID
        );

        let remote = SocketAddr::new(address, channel);
        let stream = tokio::time::timeout(timeout, Stream::connect(remote))
            .await
            .map_err(|_| anyhow!("connection to {address} timed out after {timeout:?}"))?
            .with_context(|| format!("failed to connect to {address}"))?;

        info!("Connected to remote device: {}", address);
        Ok(stream)
    }
}
