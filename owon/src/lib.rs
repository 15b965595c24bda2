//! Decoder for OWON oscilloscope waveform captures.
//!
//! ## Technical Overview
//!
//! A capture is a binary dump written by the scope, either saved as a file or
//! requested over the network with a start command.
//!
//! ### Stream Organization
//!
//! **Preamble**: model identifier, declared size, serial and trigger status.
//! **Channel records**: one per captured channel, named `CH1`, `CH2`, ...
//! The first name that does not match ends the stream.
//!
//! ### Sample Modes
//!
//! - Normal: 16-bit words converted to volts with the record's calibration
//! - Deep memory: raw 8-bit magnitudes
//!
//! ### Network Framing
//!
//! Device responses are split into frames, each preceded by a 12 byte
//! header. The concatenated payloads form a capture in the file layout.
//!
//! ## Quick Start
//!
//! ```rust
//! use owon::process::{EXAMPLE_CAPTURE, decode::Decoder};
//! use owon::structs::channel::Samples;
//!
//! let decoder = Decoder::new(EXAMPLE_CAPTURE)?;
//!
//! for record in decoder {
//!     let record = record?;
//!     match &record.samples {
//!         Samples::Raw(raw) => println!("{}: {} deep memory samples", record.name(), raw.len()),
//!         Samples::Volts(volts) => println!("{}: {} samples", record.name(), volts.len()),
//!     }
//! }
//! # Ok::<(), owon::utils::errors::CaptureError>(())
//! ```
//!
//! Fetching from a device works the same way over a [`process::client::Client`]:
//!
//! ```rust,no_run
//! use owon::process::client::{Client, StartCommand};
//! use owon::process::decode::Decoder;
//!
//! let client = Client::new("192.168.1.72", 3000);
//! let reader = client.open(StartCommand::Vector, |_| {})?;
//! let capture = Decoder::new(reader)?.into_capture()?;
//! println!("{} channels", capture.channels.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

/// Processing of capture streams.
///
/// 1. **Decoding** ([`process::decode`]): preamble and channel records.
/// 2. **Receiving** ([`process::receive`]): reassembly of framed responses.
/// 3. **Client** ([`process::client`]): capture requests over TCP.
pub mod process;

/// Data structures representing capture format components.
///
/// - **Preamble** ([`structs::preamble`]): stream header and record layout
/// - **Channels** ([`structs::channel`]): channel records and samples
/// - **Calibration** ([`structs::calibration`]): voltage and attenuation tables
/// - **Frames** ([`structs::frame`]): network frame headers
pub mod structs;

/// Utility functions and supporting infrastructure.
///
/// - **Reading** ([`utils::reader`]): byte-level capture reading
/// - **Byte order** ([`utils::byteorder`]): little/big-endian writers
/// - **Error Handling** ([`utils::errors`]): error types
pub mod utils;
