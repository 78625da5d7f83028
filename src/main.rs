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

//! ObdTerm desktop application entry point.

use anyhow::Result;
use std::time::Duration;
use tokio::io::AsyncBufReadExt;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use obdterm::bluetooth::{protocol, BluetoothManager, ConnectionEvent, ElmSession};
use obdterm::config::Config;
use obdterm::events::EventProcessor;
use obdterm::state::AppState;
use obdterm::ui;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("obdterm=info".parse().unwrap()),
        )
        .init();

    info!("Starting ObdTerm v{}...", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Config::load()?;
    info!("Configuration loaded");

    // Create application state
    let state = AppState::new();

    // Bring up the Bluetooth adapter (powers it on when off)
    let manager = BluetoothManager::new(config.bluetooth.adapter.as_deref()).await?;
    info!("Local adapter address: {}", manager.address().await?);

    // List bonded devices and let the user pick one
    let devices = manager.bonded_devices().await?;
    if devices.is_empty() {
        warn!("No paired devices; pair the adapter with bluetoothctl first");
        return Ok(());
    }

    let mut input = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    let device = match ui::pick_device(&mut input, &devices).await? {
        Some(device) => device.clone(),
        None => {
            info!("No device selected, exiting");
            return Ok(());
        }
    };
    state.set_selected(device.address);

    // Connect
    state.set_connecting();
    let timeout = Duration::from_secs(config.bluetooth.connect_timeout_secs);
    let stream = match manager
        .connect_spp(device.address, config.bluetooth.channel, timeout)
        .await
    {
        Ok(stream) => stream,
        Err(e) => {
            state.set_error();
            error!("Connection failed: {:#}", e);
            return Err(e);
        }
    };

    let (event_tx, mut event_rx) = tokio::sync::mpsc::channel::<ConnectionEvent>(32);
    let mut session = ElmSession::start(stream, device.name.clone(), event_tx);

    // Apply session events to state and echo response lines
    let mut processor = EventProcessor::new(state.clone());
    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            if let Err(e) = processor.process_event(event) {
                error!("Error processing event: {}", e);
            }
        }
    });

    // Identification probe, the adapter's hello
    if config.bluetooth.identify_on_connect {
        session.send(protocol::CMD_IDENTIFY).await?;
    }

    info!("Connected to {}. Type commands, 'q' to quit.", device);

    // Command prompt
    loop {
        tokio::select! {
            command = ui::read_command(&mut input) => {
                match command? {
                    Some(cmd) if cmd.is_empty() => continue,
                    Some(cmd) => {
                        if let Err(e) = session.send(&cmd).await {
                            state.set_error();
                            error!("Send failed: {:#}", e);
                            break;
                        }
                    }
                    None => {
                        info!("Quit requested");
                        break;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    session.shutdown();
    state.set_disconnected();
    info!("ObdTerm stopped");
    Ok(())
}
