//! Stream preamble and record layout.
//!
//! Every capture starts with a 54 byte preamble: a six character model
//! identifier, the declared payload size, an opaque serial block, the trigger
//! status and a reserved block. The model identifier decides once per stream
//! whether channel records carry an extra offset field.

use std::fmt::{Display, Formatter};
use std::io::Read;

use log::trace;

use crate::utils::errors::CaptureError;
use crate::utils::reader::CaptureReader;

pub const MODEL_ID_LEN: usize = 6;
pub const SERIAL_LEN: usize = 30;
pub const RESERVED_LEN: usize = 13;

/// Total preamble size in bytes.
pub const PREAMBLE_LEN: usize = MODEL_ID_LEN + 4 + SERIAL_LEN + 1 + RESERVED_LEN;

/// Model family whose channel records carry an offset field.
pub const OFFSET_LAYOUT_MARKER: &str = "SPBS";

/// Model families known to use the standard record layout.
pub const STANDARD_LAYOUT_PREFIXES: [&str; 2] = ["SDS", "PDS"];

/// Shape of the channel records of one stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Standard,
    /// Records carry a signed offset field after the length/flags block.
    Offset,
}

impl Layout {
    pub fn has_offset_field(&self) -> bool {
        matches!(self, Layout::Offset)
    }
}

impl Display for Layout {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Layout::Standard => write!(f, "Standard"),
            Layout::Offset => write!(f, "Offset"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preamble {
    pub model_id: [u8; MODEL_ID_LEN],
    /// Declared payload size. Negative values mark a customized size.
    pub size: i32,
    pub serial: [u8; SERIAL_LEN],
    pub trigger_status: u8,
    pub reserved: [u8; RESERVED_LEN],
}

impl Preamble {
    pub fn read<R: Read>(reader: &mut CaptureReader<R>) -> Result<Self, CaptureError> {
        let preamble = Self {
            model_id: reader.get_array("model id")?,
            size: reader.get_i32("payload size")?,
            serial: reader.get_array("serial")?,
            trigger_status: reader.get_array::<1>("trigger status")?[0],
            reserved: reader.get_array("reserved block")?,
        };

        trace!(
            "Preamble: model {:?}, size {}, trigger status {:#04X}",
            preamble.model(),
            preamble.size,
            preamble.trigger_status
        );

        Ok(preamble)
    }

    /// Model identifier as text, without trailing padding.
    pub fn model(&self) -> String {
        String::from_utf8_lossy(&self.model_id)
            .trim_end_matches(['\0', ' '])
            .to_string()
    }

    /// Serial block as text, without padding.
    pub fn serial(&self) -> String {
        String::from_utf8_lossy(&self.serial)
            .trim_matches(['\0', ' '])
            .to_string()
    }

    pub fn payload_size(&self) -> u32 {
        self.size.unsigned_abs()
    }

    pub fn is_customized_size(&self) -> bool {
        self.size < 0
    }

    /// Record layout implied by the model identifier, `None` when the
    /// identifier belongs to no known family.
    pub fn layout(&self) -> Option<Layout> {
        let model = self.model();

        if model.contains(OFFSET_LAYOUT_MARKER) {
            Some(Layout::Offset)
        } else if STANDARD_LAYOUT_PREFIXES
            .iter()
            .any(|prefix| model.starts_with(prefix))
        {
            Some(Layout::Standard)
        } else {
            None
        }
    }
}
