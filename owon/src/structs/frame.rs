//! Network response frame header.
//!
//! A device answers a start command with one or more frames. Each frame is
//! announced by a 12 byte header of three little-endian words: the payload
//! length, a reserved word and a flags word. Only the first header's flags
//! matter: a value of 128 or more splits the response into `flags - 128`
//! frames.

use std::io::{self, Read};

use bitstream_io::{ByteRead, ByteReader, LittleEndian};
use owonscope_macros::ToBytes;

use crate::utils::byteorder::WriteBytesLe;

pub const FRAME_HEADER_LEN: usize = 12;

/// Flags threshold marking a multi-frame response.
pub const MULTI_FRAME_FLAG: u32 = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ToBytes)]
pub struct FrameHeader {
    pub length: u32,
    pub reserved: u32,
    pub flags: u32,
}

impl FrameHeader {
    /// Reads the three header words from `read`.
    pub fn read<R: Read>(read: R) -> io::Result<Self> {
        let mut bs = ByteReader::<_, LittleEndian>::new(read);

        Ok(Self {
            length: bs.read::<u32>()?,
            reserved: bs.read::<u32>()?,
            flags: bs.read::<u32>()?,
        })
    }

    /// Header of a single-frame response.
    pub fn single(length: u32) -> Self {
        Self {
            length,
            ..Default::default()
        }
    }

    /// Header opening a response of `frames` frames.
    pub fn first_of(length: u32, frames: u32) -> Self {
        Self {
            length,
            reserved: 0,
            flags: MULTI_FRAME_FLAG + frames,
        }
    }

    /// Number of frames announced by this header when it opens a response.
    ///
    /// A multi-frame flag announcing zero frames still carries the current
    /// frame, so the count never drops below one.
    pub fn frame_count(&self) -> u32 {
        if self.flags >= MULTI_FRAME_FLAG {
            (self.flags - MULTI_FRAME_FLAG).max(1)
        } else {
            1
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(FRAME_HEADER_LEN);
        self.write_le(&mut bytes);
        bytes
    }
}

#[test]
fn frame_count_from_flags() {
    assert_eq!(FrameHeader::single(10).frame_count(), 1);
    assert_eq!(
        FrameHeader {
            flags: 1,
            ..Default::default()
        }
        .frame_count(),
        1
    );
    assert_eq!(FrameHeader::first_of(10, 2).frame_count(), 2);
    assert_eq!(FrameHeader::first_of(10, 2).flags, 130);
    assert_eq!(FrameHeader::first_of(10, 0).frame_count(), 1);
}

#[test]
fn header_bytes() {
    let header = FrameHeader {
        length: 0x0102_0304,
        reserved: 0,
        flags: 130,
    };
    let bytes = header.to_bytes();

    assert_eq!(
        bytes,
        [0x04, 0x03, 0x02, 0x01, 0, 0, 0, 0, 130, 0, 0, 0]
    );

    let parsed = FrameHeader::read(bytes.as_slice()).unwrap();
    assert_eq!(parsed, header);

    let err = FrameHeader::read(&bytes[..FRAME_HEADER_LEN - 1]).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
}
