/// Capture decoding.
///
/// Provides the [`Decoder`](decode::Decoder), an iterator over the
/// [`ChannelRecord`](crate::structs::channel::ChannelRecord)s of one capture stream.
pub mod decode;

/// Network response reassembly.
///
/// Provides the [`FramedReader`](receive::FramedReader) byte source that
/// concatenates the payloads of a framed device response.
pub mod receive;

/// TCP client requesting captures from a device.
pub mod client;

/// Capture of a `SDSxxx` device holding a single deep memory channel `CH1`
/// with the ten samples `0..=9`, followed by the `END` marker.
#[doc(hidden)]
pub const EXAMPLE_CAPTURE: &[u8] = &[
    // preamble: model id, size, serial, trigger status, reserved
    0x53, 0x44, 0x53, 0x78, 0x78, 0x78, 0x7A, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    // CH1, length -10, flags 1
    0x43, 0x48, 0x31, 0xF6, 0xFF, 0xFF, 0xFF, 0x01, 0x00, 0x00, 0x00,
    // whole points, sample count, slow moving number, time base, zero point
    0x0A, 0x00, 0x00, 0x00, 0x0A, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x05, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00,
    // voltage level, power index, spacing interval, frequency, cycles, voltage value
    0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x80, 0x3F, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x3F,
    // samples
    0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09,
    // END
    0x45, 0x4E, 0x44,
];

#[test]
fn example_capture_size() {
    use crate::structs::preamble::PREAMBLE_LEN;

    assert_eq!(EXAMPLE_CAPTURE.len(), 122);
    assert_eq!(
        EXAMPLE_CAPTURE.len(),
        PREAMBLE_LEN + 3 + 4 + 4 + 11 * 4 + 10 + 3
    );
}
