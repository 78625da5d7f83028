//! Integration tests for the command framing contract and the event flow.

use obdterm::bluetooth::{protocol, ConnectionEvent, PairedDevice};
use obdterm::events::EventProcessor;
use obdterm::state::{AppState, ConnectionStatus};
use obdterm::ui;

#[test]
fn test_framing_contract() {
    // For any input s, the transmitted bytes are s followed by CR LF.
    let framed = protocol::frame("ATI");
    assert_eq!(framed, vec![0x41, 0x54, 0x49, 0x0D, 0x0A]);

    let framed = protocol::frame("0100");
    assert_eq!(&framed[..4], b"0100");
    assert_eq!(&framed[4..], &[0x0D, 0x0A]);
}

#[test]
fn test_session_event_flow() {
    let state = AppState::new();
    let mut processor = EventProcessor::silent(state.clone());

    // Connect, receive the ATI banner, disconnect.
    processor
        .process_event(ConnectionEvent::Connected {
            device_name: "OBDII".to_string(),
        })
        .unwrap();
    assert_eq!(state.get_status(), ConnectionStatus::Connected);

    processor
        .process_event(ConnectionEvent::LineReceived("ELM327 v1.5".to_string()))
        .unwrap();
    assert_eq!(state.get_last_response(), Some("ELM327 v1.5".to_string()));

    processor
        .process_event(ConnectionEvent::Disconnected)
        .unwrap();
    assert_eq!(state.get_status(), ConnectionStatus::Disconnected);
}

#[test]
fn test_device_record_keeps_structured_address() {
    // Selection resolves through the record, not by scraping the display
    // string, so formatting changes cannot corrupt the address.
    let device = PairedDevice {
        address: bluer::Address::new([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]),
        name: "Device\nwith odd name".to_string(),
    };

    let line = ui::format_device_line(3, &device);
    assert!(line.contains("AA:BB:CC:DD:EE:FF"));
    assert_eq!(device.address, bluer::Address::new([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]));
}
