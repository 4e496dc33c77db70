#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let frame_type = u16::from_be_bytes([data[0], data[1]]);
    let body = &data[2..];

    // Decoding must never panic, regardless of how malformed the body is.
    if let Ok(packet) = aochat::ServerPacket::decode(frame_type, body) {
        // A packet decoded from a well-formed frame always reports the
        // frame type it was decoded from.
        assert_eq!(packet.frame_type(), frame_type);
    }
});
