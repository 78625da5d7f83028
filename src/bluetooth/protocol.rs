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

//! AT command framing for the ELM327 wire protocol.
//!
//! The adapter accepts ASCII command strings; each command must end with
//! carriage-return/line-feed before the chipset will execute it.

/// Terminator appended to every outgoing command.
pub const COMMAND_TERMINATOR: &str = "\r\n";

/// Identification probe ("print version ID").
pub const CMD_IDENTIFY: &str = "ATI";

/// Full chipset reset.
pub const CMD_RESET: &str = "ATZ";

/// Disable command echo.
pub const CMD_ECHO_OFF: &str = "ATE0";

/// Frame a raw command for transmission.
///
/// The returned buffer is exactly the command bytes followed by `0x0D 0x0A`.
/// No trimming or case normalization is applied; the caller's string goes out
/// on the wire as-is.
pub fn frame(command: &str) -> Vec<u8> {
    let mut buf = Vec::with_capacity(command.len() + COMMAND_TERMINATOR.len());
    buf.extend_from_slice(command.as_bytes());
    buf.extend_from_slice(COMMAND_TERMINATOR.as_bytes());
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_appends_crlf() {
        assert_eq!(frame("ATI"), b"ATI\r\n");
        assert_eq!(frame("ATZ"), b"ATZ\r\n");
    }

    #[test]
    fn test_frame_exact_bytes() {
        // The one hard contract: "ATI" must yield 41 54 49 0D 0A.
        assert_eq!(frame("ATI"), vec![0x41, 0x54, 0x49, 0x0D, 0x0A]);
    }

    #[test]
    fn test_frame_empty_command() {
        assert_eq!(frame(""), vec![0x0D, 0x0A]);
    }

    #[test]
    fn test_frame_preserves_input_verbatim() {
        // No trimming, no uppercasing.
        assert_eq!(frame(" ati "), b" ati \r\n");
        assert_eq!(frame("0100"), b"0100\r\n");
    }

    #[test]
    fn test_known_commands() {
        assert_eq!(CMD_IDENTIFY, "ATI");
        assert_eq!(CMD_RESET, "ATZ");
        assert_eq!(CMD_ECHO_OFF, "ATE0");
    }
}
