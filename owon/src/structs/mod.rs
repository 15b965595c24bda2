//! Data structures representing capture format components.
//!
//! Contains the stream preamble and its record layout, per-channel records
//! with their decoded samples, the calibration lookup tables, and the header
//! of a network response frame.

pub mod calibration;
pub mod channel;
pub mod frame;
pub mod preamble;
