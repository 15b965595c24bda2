use std::io::Read;

use log::{Level, debug, trace};

use crate::log_or_err;
use crate::structs::channel::{ChannelRecord, NAME_LEN, is_channel_name};
use crate::structs::preamble::{Layout, Preamble};
use crate::utils::errors::CaptureError;
use crate::utils::reader::CaptureReader;

/// Decodes the channel records of a capture stream.
///
/// The preamble is read when the decoder is created. Iterating then yields
/// one [`ChannelRecord`] per `CH` + digit marker, stopping at the first three
/// bytes that do not match. Those bytes are consumed. The iterator is fused:
/// after an error or the end marker it only returns `None`.
///
/// # Example
///
/// ```rust
/// use owon::process::{EXAMPLE_CAPTURE, decode::Decoder};
///
/// let decoder = Decoder::new(EXAMPLE_CAPTURE)?;
/// assert_eq!(decoder.preamble().model(), "SDSxxx");
///
/// for record in decoder {
///     let record = record?;
///     println!("{}: {} samples", record.name(), record.samples.len());
/// }
/// # Ok::<(), owon::utils::errors::CaptureError>(())
/// ```
pub struct Decoder<R: Read> {
    reader: CaptureReader<R>,
    preamble: Preamble,
    state: DecoderState,
}

#[derive(Debug, Clone, Copy)]
pub struct DecoderState {
    pub fail_level: Level,
    pub layout: Layout,
    pub records: usize,
    pub finished: bool,
}

impl Default for DecoderState {
    fn default() -> Self {
        Self {
            fail_level: Level::Error,
            layout: Layout::Standard,
            records: 0,
            finished: false,
        }
    }
}

impl<R: Read> Decoder<R> {
    /// Reads the preamble from `read`, accepting unrecognized model identifiers.
    pub fn new(read: R) -> Result<Self, CaptureError> {
        Self::with_fail_level(read, Level::Error)
    }

    /// Reads the preamble from `read` with the given failure level.
    ///
    /// - `log::Level::Error`: unrecognized model identifiers are logged and
    ///   decoded with the standard layout (default)
    /// - `log::Level::Warn`: unrecognized model identifiers fail with
    ///   [`CaptureError::UnrecognizedModel`] (strict mode)
    pub fn with_fail_level(read: R, fail_level: Level) -> Result<Self, CaptureError> {
        let mut reader = CaptureReader::new(read);
        let preamble = Preamble::read(&mut reader)?;

        let mut state = DecoderState {
            fail_level,
            ..Default::default()
        };

        state.layout = match preamble.layout() {
            Some(layout) => layout,
            None => {
                log_or_err!(
                    state,
                    Level::Warn,
                    CaptureError::UnrecognizedModel(preamble.model())
                );
                Layout::Standard
            }
        };

        debug!(
            "Decoding capture from {} ({} layout, {} bytes declared)",
            preamble.model(),
            state.layout,
            preamble.payload_size()
        );

        Ok(Self {
            reader,
            preamble,
            state,
        })
    }

    pub fn preamble(&self) -> &Preamble {
        &self.preamble
    }

    pub fn layout(&self) -> Layout {
        self.state.layout
    }

    /// Number of records yielded so far.
    pub fn records(&self) -> usize {
        self.state.records
    }

    /// Bytes consumed from the source so far.
    pub fn position(&self) -> u64 {
        self.reader.position()
    }

    /// Decodes all remaining records.
    pub fn into_capture(mut self) -> Result<Capture, CaptureError> {
        let channels = self.by_ref().collect::<Result<Vec<_>, _>>()?;

        Ok(Capture {
            preamble: self.preamble,
            layout: self.state.layout,
            channels,
        })
    }

    fn next_record(&mut self) -> Result<Option<ChannelRecord>, CaptureError> {
        let Some(name) = self.reader.try_get_array::<NAME_LEN>()? else {
            trace!("Capture ended after {} records", self.state.records);
            return Ok(None);
        };

        if !is_channel_name(&name) {
            trace!(
                "End marker {:?} after {} records",
                String::from_utf8_lossy(&name),
                self.state.records
            );
            return Ok(None);
        }

        let record = ChannelRecord::read(name, self.state.layout, &mut self.reader)?;
        self.state.records += 1;

        Ok(Some(record))
    }
}

impl<R: Read> Iterator for Decoder<R> {
    type Item = Result<ChannelRecord, CaptureError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state.finished {
            return None;
        }

        match self.next_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.state.finished = true;
                None
            }
            Err(e) => {
                self.state.finished = true;
                Some(Err(e))
            }
        }
    }
}

impl<R: Read> std::iter::FusedIterator for Decoder<R> {}

/// Reads the preamble of `read` and returns a decoder over its records.
pub fn decode<R: Read>(read: R) -> Result<Decoder<R>, CaptureError> {
    Decoder::new(read)
}

/// A fully decoded capture.
#[derive(Debug, Clone)]
pub struct Capture {
    pub preamble: Preamble,
    pub layout: Layout,
    pub channels: Vec<ChannelRecord>,
}

impl Capture {
    pub fn channel(&self, name: &str) -> Option<&ChannelRecord> {
        self.channels.iter().find(|c| c.name() == name)
    }
}
