use std::io::{self, Read};

use log::{debug, trace};

use crate::structs::frame::FrameHeader;
use crate::utils::errors::ResponseError;

const READ_CHUNK_SIZE: usize = 4096;

/// Transfer progress of a framed response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameProgress {
    /// Payload bytes received so far in the current frame.
    pub received: u32,
    /// Payload length of the current frame.
    pub frame_length: u32,
    /// One-based index of the current frame.
    pub frame: u32,
    /// Number of frames in the response.
    pub frames: u32,
}

fn ignore_progress(_: FrameProgress) {}

/// Byte source over the payloads of a framed device response.
///
/// Reads each 12 byte frame header as the previous payload is exhausted and
/// yields the concatenated payloads. Reading returns `0` once the last frame
/// announced by the first header is complete; the underlying reader is not
/// touched past that point.
///
/// ```rust
/// use std::io::Read;
/// use owon::process::receive::FramedReader;
/// use owon::structs::frame::FrameHeader;
///
/// let mut response = FrameHeader::first_of(3, 2).to_bytes();
/// response.extend(b"abc");
/// response.extend(FrameHeader::single(2).to_bytes());
/// response.extend(b"de");
///
/// let mut payload = Vec::new();
/// FramedReader::new(response.as_slice()).read_to_end(&mut payload)?;
/// assert_eq!(payload, b"abcde");
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct FramedReader<R, F = fn(FrameProgress)> {
    inner: R,
    progress: F,
    frame: u32,
    frames: u32,
    length: u32,
    received: u32,
}

impl<R: Read> FramedReader<R> {
    pub fn new(inner: R) -> Self {
        Self::with_progress(inner, ignore_progress)
    }
}

impl<R, F> FramedReader<R, F>
where
    R: Read,
    F: FnMut(FrameProgress),
{
    /// Creates a reader reporting every received chunk to `progress`.
    pub fn with_progress(inner: R, progress: F) -> Self {
        Self {
            inner,
            progress,
            frame: 0,
            frames: 0,
            length: 0,
            received: 0,
        }
    }

    /// Number of frames announced by the first header, `0` before it is read.
    pub fn frames(&self) -> u32 {
        self.frames
    }

    pub fn is_complete(&self) -> bool {
        self.frame > 0 && self.frame >= self.frames && self.received >= self.length
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn read_header(&mut self) -> Result<FrameHeader, ResponseError> {
        FrameHeader::read(&mut self.inner).map_err(|e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                ResponseError::TruncatedHeader {
                    frame: self.frame + 1,
                }
            } else {
                ResponseError::Io(e)
            }
        })
    }

    /// Moves to a frame with payload left, returning `false` at the end of
    /// the response.
    fn advance(&mut self) -> Result<bool, ResponseError> {
        loop {
            if self.frame > 0 && self.received < self.length {
                return Ok(true);
            }

            if self.is_complete() {
                return Ok(false);
            }

            let header = self.read_header()?;
            if self.frame == 0 {
                self.frames = header.frame_count();
            }

            self.frame += 1;
            self.length = header.length;
            self.received = 0;

            trace!(
                "Frame {}/{}: {} bytes, flags {:#X}",
                self.frame, self.frames, header.length, header.flags
            );
        }
    }

    fn read_payload(&mut self, buf: &mut [u8]) -> Result<usize, ResponseError> {
        if buf.is_empty() || !self.advance()? {
            return Ok(0);
        }

        let want = buf.len().min((self.length - self.received) as usize);
        let n = self.inner.read(&mut buf[..want])?;

        if n == 0 {
            return Err(ResponseError::TruncatedFrame {
                frame: self.frame,
                frames: self.frames,
                received: self.received,
                expected: self.length,
            });
        }

        self.received += n as u32;
        (self.progress)(FrameProgress {
            received: self.received,
            frame_length: self.length,
            frame: self.frame,
            frames: self.frames,
        });

        Ok(n)
    }
}

impl<R, F> Read for FramedReader<R, F>
where
    R: Read,
    F: FnMut(FrameProgress),
{
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.read_payload(buf).map_err(|e| match e {
            ResponseError::Io(e) => e,
            e => io::Error::new(io::ErrorKind::UnexpectedEof, e),
        })
    }
}

/// Reassembles a complete framed response from `inner`.
pub fn read_response<R, F>(inner: R, progress: F) -> Result<Vec<u8>, ResponseError>
where
    R: Read,
    F: FnMut(FrameProgress),
{
    let mut reader = FramedReader::with_progress(inner, progress);
    let mut payload = Vec::new();
    let mut chunk = [0u8; READ_CHUNK_SIZE];

    loop {
        match reader.read_payload(&mut chunk) {
            Ok(0) => break,
            Ok(n) => payload.extend_from_slice(&chunk[..n]),
            Err(ResponseError::Io(e)) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    debug!(
        "Received {} bytes in {} frames",
        payload.len(),
        reader.frames()
    );

    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::EXAMPLE_CAPTURE;
    use crate::process::decode::Decoder;
    use crate::structs::frame::FRAME_HEADER_LEN;
    use crate::utils::errors::CaptureError;

    fn frame(header: FrameHeader, payload: &[u8]) -> Vec<u8> {
        let mut bytes = header.to_bytes();
        bytes.extend_from_slice(payload);
        bytes
    }

    #[test]
    fn two_frames_are_concatenated() -> Result<(), ResponseError> {
        let (head, tail) = EXAMPLE_CAPTURE.split_at(50);

        let mut response = frame(FrameHeader::first_of(head.len() as u32, 2), head);
        response.extend(frame(FrameHeader::single(tail.len() as u32), tail));
        let consumed = response.len() as u64;
        response.extend(b"trailing");

        let mut cursor = io::Cursor::new(response);
        let mut updates = Vec::new();
        let payload = read_response(&mut cursor, |p| updates.push(p))?;

        assert_eq!(payload, EXAMPLE_CAPTURE);
        assert_eq!(cursor.position(), consumed);

        let last = updates.last().unwrap();
        assert_eq!(last.frame, 2);
        assert_eq!(last.frames, 2);
        assert_eq!(last.received, tail.len() as u32);
        assert!(updates.iter().all(|p| p.received <= p.frame_length));
        Ok(())
    }

    #[test]
    fn single_frame_ignores_low_flags() -> Result<(), ResponseError> {
        let header = FrameHeader {
            length: 3,
            reserved: 0xDEAD,
            flags: 1,
        };
        let mut response = frame(header, b"abc");
        response.extend(frame(FrameHeader::single(2), b"zz"));

        let mut cursor = io::Cursor::new(response);
        assert_eq!(read_response(&mut cursor, ignore_progress)?, b"abc");
        assert_eq!(cursor.position(), (FRAME_HEADER_LEN + 3) as u64);
        Ok(())
    }

    #[test]
    fn empty_frames_are_skipped() -> Result<(), ResponseError> {
        let mut response = frame(FrameHeader::first_of(0, 3), b"");
        response.extend(frame(FrameHeader::single(2), b"ab"));
        response.extend(frame(FrameHeader::single(0), b""));

        assert_eq!(read_response(response.as_slice(), ignore_progress)?, b"ab");
        Ok(())
    }

    #[test]
    fn truncated_frame() {
        let mut response = frame(FrameHeader::first_of(4, 2), b"abcd");
        response.extend(frame(FrameHeader::single(4), b"ef"));

        assert!(matches!(
            read_response(response.as_slice(), ignore_progress),
            Err(ResponseError::TruncatedFrame {
                frame: 2,
                frames: 2,
                received: 2,
                expected: 4
            })
        ));
    }

    #[test]
    fn missing_header() {
        let response = frame(FrameHeader::first_of(1, 2), b"a");

        assert!(matches!(
            read_response(response.as_slice(), ignore_progress),
            Err(ResponseError::TruncatedHeader { frame: 2 })
        ));
        assert!(matches!(
            read_response(&[0u8; 5][..], ignore_progress),
            Err(ResponseError::TruncatedHeader { frame: 1 })
        ));
    }

    #[test]
    fn decoder_streams_across_frames() -> Result<(), CaptureError> {
        let mut response = Vec::new();
        let chunks: Vec<&[u8]> = EXAMPLE_CAPTURE.chunks(7).collect();
        for (i, chunk) in chunks.iter().enumerate() {
            let header = if i == 0 {
                FrameHeader::first_of(chunk.len() as u32, chunks.len() as u32)
            } else {
                FrameHeader::single(chunk.len() as u32)
            };
            response.extend(frame(header, chunk));
        }

        let capture = Decoder::new(FramedReader::new(response.as_slice()))?.into_capture()?;
        assert_eq!(capture.channels.len(), 1);
        assert_eq!(capture.channels[0].samples.len(), 10);
        Ok(())
    }

    #[test]
    fn dropped_connection_surfaces_as_truncation() -> Result<(), CaptureError> {
        let response = frame(FrameHeader::single(EXAMPLE_CAPTURE.len() as u32), &EXAMPLE_CAPTURE[..80]);

        let mut decoder = Decoder::new(FramedReader::new(response.as_slice()))?;
        assert!(matches!(
            decoder.next(),
            Some(Err(CaptureError::TruncatedInput { .. }))
        ));
        Ok(())
    }
}
