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

//! A live session with one adapter: outgoing command writes plus a reader
//! task that relays raw response lines.

use anyhow::{Context, Result};
use bluer::rfcomm::stream::OwnedWriteHalf;
use bluer::rfcomm::Stream;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use super::protocol;

/// Events emitted by a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// Connection established.
    Connected { device_name: String },
    /// Connection closed by the remote end.
    Disconnected,
    /// Raw response line from the adapter, terminator stripped. Not parsed.
    LineReceived(String),
    /// I/O error on the socket.
    Error(String),
}

/// An established SPP session. Exists only after a successful connect, so a
/// send without a connection is unrepresentable.
pub struct ElmSession {
    writer: OwnedWriteHalf,
    reader_task: JoinHandle<()>,
}

impl ElmSession {
    /// Split a fresh stream into a session and spawn its reader task.
    ///
    /// `device_name` only labels the Connected event.
    pub fn start(
        stream: Stream,
        device_name: String,
        event_tx: mpsc::Sender<ConnectionEvent>,
    ) -> Self {
        let (reader, writer) = stream.into_split();

        let reader_task = tokio::spawn(async move {
            let _ = event_tx
                .send(ConnectionEvent::Connected { device_name })
                .await;
            Self::read_loop(reader, event_tx).await;
        });

        Self {
            writer,
            reader_task,
        }
    }

    /// Send one command: append `\r\n`, write, flush.
    pub async fn send(&mut self, command: &str) -> Result<()> {
        let framed = protocol::frame(command);
        debug!("Sending {} bytes: {:?}", framed.len(), command);

        self.writer
            .write_all(&framed)
            .await
            .with_context(|| format!("failed to send command '{command}'"))?;
        self.writer
            .flush()
            .await
            .context("failed to flush command")?;

        Ok(())
    }

    /// Close the session. Dropping the halves closes the socket.
    pub fn shutdown(self) {
        self.reader_task.abort();
        info!("Session closed");
    }

    /// Relay response lines until EOF or error. No parsing is applied; the
    /// adapter's output is forwarded verbatim with the terminator stripped.
    async fn read_loop(
        reader: bluer::rfcomm::stream::OwnedReadHalf,
        event_tx: mpsc::Sender<ConnectionEvent>,
    ) {
        let mut reader = BufReader::new(reader);
        let mut line_buf = String::new();

        loop {
            line_buf.clear();

            match reader.read_line(&mut line_buf).await {
                Ok(0) => {
                    info!("Connection closed by remote");
                    let _ = event_tx.send(ConnectionEvent::Disconnected).await;
                    break;
                }
                Ok(_) => {
                    let line = line_buf.trim_end_matches(['\r', '\n']).to_string();
                    debug!("Received: {}", line);
                    let _ = event_tx.send(ConnectionEvent::LineReceived(line)).await;
                }
                Err(e) => {
                    error!("Read error: {}", e);
                    let _ = event_tx.send(ConnectionEvent::Error(e.to_string())).await;
                    let _ = event_tx.send(ConnectionEvent::Disconnected).await;
                    break;
                }
            }
        }
    }
}
