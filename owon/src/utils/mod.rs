//! Utility functions and supporting infrastructure.
//!
//! Provides byte-level capture reading, byte-order writers used to build
//! frames and fixtures, and the error types shared by the decoder and the
//! network byte source.

pub mod byteorder;
pub mod errors;
pub mod reader;
