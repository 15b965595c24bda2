//! Byte-level reading for capture streams.
//!
//! Wraps a little-endian [`ByteReader`] and keeps track of the stream offset so
//! truncation errors can name the field and position where the input ran out.

use std::io;

use bitstream_io::{ByteRead, ByteReader, LittleEndian};

use crate::utils::errors::CaptureError;

const CHUNK_SIZE: usize = 64 * 1024;

pub struct CaptureReader<R: io::Read> {
    bs: ByteReader<R, LittleEndian>,
    position: u64,
}

pub type SliceReader<'a> = CaptureReader<io::Cursor<&'a [u8]>>;

impl<R> CaptureReader<R>
where
    R: io::Read,
{
    pub fn new(read: R) -> Self {
        Self {
            bs: ByteReader::new(read),
            position: 0,
        }
    }

    #[inline(always)]
    pub fn get_i32(&mut self, field: &'static str) -> Result<i32, CaptureError> {
        let value = self
            .bs
            .read::<i32>()
            .map_err(|e| self.read_error(e, field))?;
        self.position += 4;
        Ok(value)
    }

    #[inline(always)]
    pub fn get_u32(&mut self, field: &'static str) -> Result<u32, CaptureError> {
        let value = self
            .bs
            .read::<u32>()
            .map_err(|e| self.read_error(e, field))?;
        self.position += 4;
        Ok(value)
    }

    #[inline(always)]
    pub fn get_f32(&mut self, field: &'static str) -> Result<f32, CaptureError> {
        self.get_u32(field).map(f32::from_bits)
    }

    #[inline(always)]
    pub fn get_array<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N], CaptureError> {
        let mut buf = [0u8; N];
        self.bs
            .read_bytes(&mut buf)
            .map_err(|e| self.read_error(e, field))?;
        self.position += N as u64;
        Ok(buf)
    }

    /// Reads `N` bytes, returning `None` when the stream ends first.
    ///
    /// The bytes are consumed either way.
    pub fn try_get_array<const N: usize>(&mut self) -> Result<Option<[u8; N]>, CaptureError> {
        let mut buf = [0u8; N];
        match self.bs.read_bytes(&mut buf) {
            Ok(()) => {
                self.position += N as u64;
                Ok(Some(buf))
            }
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(CaptureError::Io(e)),
        }
    }

    /// Reads exactly `len` bytes.
    ///
    /// The buffer grows chunk by chunk so a corrupt length cannot force a
    /// huge allocation before the stream runs dry.
    pub fn get_bytes(&mut self, len: usize, field: &'static str) -> Result<Vec<u8>, CaptureError> {
        let mut bytes = Vec::with_capacity(len.min(CHUNK_SIZE));
        let mut chunk = [0u8; CHUNK_SIZE];
        let mut remaining = len;

        while remaining > 0 {
            let n = remaining.min(CHUNK_SIZE);
            self.bs
                .read_bytes(&mut chunk[..n])
                .map_err(|e| self.read_error(e, field))?;
            bytes.extend_from_slice(&chunk[..n]);
            self.position += n as u64;
            remaining -= n;
        }

        Ok(bytes)
    }

    #[inline(always)]
    pub fn position(&self) -> u64 {
        self.position
    }

    fn read_error(&self, err: io::Error, field: &'static str) -> CaptureError {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            CaptureError::TruncatedInput {
                field,
                offset: self.position,
            }
        } else {
            CaptureError::Io(err)
        }
    }
}

impl<'a> SliceReader<'a> {
    pub fn from_slice(buf: &'a [u8]) -> Self {
        Self::new(io::Cursor::new(buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_little_endian_fields() -> Result<(), CaptureError> {
        let data = [
            0xF6, 0xFF, 0xFF, 0xFF, // -10
            0x01, 0x00, 0x00, 0x00, // 1
            0x00, 0x00, 0x80, 0x3F, // 1.0
            b'C', b'H', b'2',
        ];
        let mut reader = SliceReader::from_slice(&data);

        assert_eq!(reader.get_i32("length")?, -10);
        assert_eq!(reader.get_u32("flags")?, 1);
        assert_eq!(reader.get_f32("spacing")?, 1.0);
        assert_eq!(&reader.get_array::<3>("name")?, b"CH2");
        assert_eq!(reader.position(), 15);
        Ok(())
    }

    #[test]
    fn truncation_names_field_and_offset() {
        let data = [0u8; 6];
        let mut reader = SliceReader::from_slice(&data);

        reader.get_i32("whole_points").unwrap();
        match reader.get_i32("sample_count") {
            Err(CaptureError::TruncatedInput { field, offset }) => {
                assert_eq!(field, "sample_count");
                assert_eq!(offset, 4);
            }
            other => panic!("expected truncation, got {other:?}"),
        }
    }

    #[test]
    fn short_tag_is_none() -> Result<(), CaptureError> {
        let mut reader = SliceReader::from_slice(b"CH");
        assert_eq!(reader.try_get_array::<3>()?, None);

        let mut reader = SliceReader::from_slice(b"");
        assert_eq!(reader.try_get_array::<3>()?, None);
        Ok(())
    }

    #[test]
    fn bytes_across_chunks() -> Result<(), CaptureError> {
        let data: Vec<u8> = (0..CHUNK_SIZE + 10).map(|i| i as u8).collect();
        let mut reader = SliceReader::from_slice(&data);

        let bytes = reader.get_bytes(CHUNK_SIZE + 10, "samples")?;
        assert_eq!(bytes, data);

        let mut reader = SliceReader::from_slice(&data);
        assert!(matches!(
            reader.get_bytes(CHUNK_SIZE + 11, "samples"),
            Err(CaptureError::TruncatedInput {
                field: "samples",
                ..
            })
        ));
        Ok(())
    }
}
