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

//! Console device picker and command prompt.

use anyhow::Result;
use std::io::Write;
use tokio::io::{BufReader, Lines, Stdin};
use tracing::debug;

use crate::bluetooth::PairedDevice;

/// Line reader over stdin for the interactive prompts.
pub type ConsoleInput = Lines<BufReader<Stdin>>;

/// One row of the device list.
pub fn format_device_line(index: usize, device: &PairedDevice) -> String {
    format!("  [{index}] {device}")
}

/// Show the bonded-device list and let the user pick one by number.
///
/// Returns `None` when the user aborts with an empty line or "q". The
/// selection resolves by index into the structured records, so the MAC never
/// has to be scraped back out of the display string.
pub async fn pick_device<'a>(
    input: &mut ConsoleInput,
    devices: &'a [PairedDevice],
) -> Result<Option<&'a PairedDevice>> {
    if devices.is_empty() {
        return Ok(None);
    }

    println!("Paired devices:");
    for (i, device) in devices.iter().enumerate() {
        println!("{}", format_device_line(i, device));
    }

    loop {
        print!("Select device [0-{}] (q to quit): ", devices.len() - 1);
        std::io::stdout().flush()?;

        let line = match input.next_line().await? {
            Some(line) => line,
            None => return Ok(None),
        };
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("q") {
            return Ok(None);
        }

        match trimmed.parse::<usize>() {
            Ok(index) if index < devices.len() => {
                debug!("Selected device index {}", index);
                return Ok(Some(&devices[index]));
            }
            _ => println!("Invalid selection: {trimmed}"),
        }
    }
}

/// Read the next command from the prompt. `None` means quit (EOF or "q").
pub async fn read_command(input: &mut ConsoleInput) -> Result<Option<String>> {
    print!("> ");
    std::io::stdout().flush()?;

    let line = match input.next_line().await? {
        Some(line) => line,
        None => return Ok(None),
    };
    let trimmed = line.trim();

    if trimmed.eq_ignore_ascii_case("q") || trimmed.eq_ignore_ascii_case("quit") {
        return Ok(None);
    }

    Ok(Some(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bluer::Address;

    #[test]
    fn test_format_device_line() {
        let device = PairedDevice {
            address: Address::new([0x00, 0x1D, 0xA5, 0x68, 0x98, 0x8B]),
            name: "OBDII".to_string(),
        };
        assert_eq!(
            format_device_line(0, &device),
            "  [0] OBDII (00:1D:A5:68:98:8B)"
        );
    }
}
