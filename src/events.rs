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

//! Event processing: applies session events to shared state.

use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info};

use crate::bluetooth::ConnectionEvent;
use crate::state::AppState;

/// Process events from the Bluetooth session.
pub struct EventProcessor {
    state: Arc<AppState>,
    /// Echo response lines to stdout for the console screen.
    echo_responses: bool,
}

impl EventProcessor {
    /// Create a new event processor.
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            state,
            echo_responses: true,
        }
    }

    /// Create a processor that only records state, without console output.
    pub fn silent(state: Arc<AppState>) -> Self {
        Self {
            state,
            echo_responses: false,
        }
    }

    /// Process a single event.
    pub fn process_event(&mut self, event: ConnectionEvent) -> Result<()> {
        match event {
            ConnectionEvent::Connected { device_name } => {
                info!("Device connected: {}", device_name);
                self.state.set_connected(device_name);
            }
            ConnectionEvent::Disconnected => {
                info!("Device disconnected");
                self.state.set_disconnected();
            }
            ConnectionEvent::LineReceived(line) => {
                // Raw relay; response parsing is deliberately not implemented.
                if self.echo_responses {
                    println!("{line}");
                }
                self.state.set_last_response(line);
            }
            ConnectionEvent::Error(e) => {
                error!("Connection error: {}", e);
                self.state.set_error();
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ConnectionStatus;

    #[test]
    fn test_connected_updates_state() {
        let state = AppState::new();
        let mut processor = EventProcessor::silent(state.clone());

        processor
            .process_event(ConnectionEvent::Connected {
                device_name: "OBDII".to_string(),
            })
            .unwrap();

        assert!(state.is_connected());
        assert_eq!(state.get_device_name(), Some("OBDII".to_string()));
    }

    #[test]
    fn test_line_received_recorded() {
        let state = AppState::new();
        let mut processor = EventProcessor::silent(state.clone());

        processor
            .process_event(ConnectionEvent::LineReceived("ELM327 v1.5".to_string()))
            .unwrap();

        assert_eq!(state.get_last_response(), Some("ELM327 v1.5".to_string()));
    }

    #[test]
    fn test_error_then_disconnect() {
        let state = AppState::new();
        let mut processor = EventProcessor::silent(state.clone());

        processor
            .process_event(ConnectionEvent::Connected {
                device_name: "OBDII".to_string(),
            })
            .unwrap();
        processor
            .process_event(ConnectionEvent::Error("read failed".to_string()))
            .unwrap();
        assert_eq!(state.get_status(), ConnectionStatus::Error);

        processor
            .process_event(ConnectionEvent::Disconnected)
            .unwrap();
        assert_eq!(state.get_status(), ConnectionStatus::Disconnected);
    }
}
