//! Channel records.
//!
//! ## Record Layout
//!
//! A record starts with a three byte name (`CH` and a digit) and a signed
//! length. A negative length selects deep memory mode and is followed by a
//! flags word. Streams using the [`Layout::Offset`] shape add a signed offset
//! field. Eleven scalar calibration fields follow, then the sample array.
//!
//! ## Sample Encoding
//!
//! - **Deep memory**: one unsigned byte per sample, stored unconverted.
//! - **Normal**: one big-endian 16-bit twos-complement word per sample,
//!   converted to volts with the record's calibration.

use std::fmt::{Display, Formatter};
use std::io::Read;

use log::{debug, trace};

use crate::structs::calibration::{power_index, voltage_level};
use crate::structs::preamble::Layout;
use crate::utils::errors::CaptureError;
use crate::utils::reader::CaptureReader;

pub const NAME_LEN: usize = 3;

/// Flags bit announcing deep memory data.
pub const FLAG_HAS_DEEP_MEMORY: u32 = 0x1;

/// Checks a record name against the `CH` + digit pattern.
pub fn is_channel_name(tag: &[u8; NAME_LEN]) -> bool {
    tag[0] == b'C' && tag[1] == b'H' && tag[2].is_ascii_digit()
}

/// Sample storage mode with the channel's true length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleMode {
    Deep(u32),
    Normal(u32),
}

impl SampleMode {
    /// A negative declared length selects deep memory mode.
    pub fn from_declared_length(length: i32) -> Self {
        if length < 0 {
            SampleMode::Deep(length.unsigned_abs())
        } else {
            SampleMode::Normal(length as u32)
        }
    }

    pub fn length(&self) -> u32 {
        match self {
            SampleMode::Deep(length) | SampleMode::Normal(length) => *length,
        }
    }

    pub fn is_deep(&self) -> bool {
        matches!(self, SampleMode::Deep(_))
    }
}

impl Display for SampleMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SampleMode::Deep(_) => write!(f, "Deep memory"),
            SampleMode::Normal(_) => write!(f, "Normal"),
        }
    }
}

/// Decoded sample array of one channel.
#[derive(Debug, Clone, PartialEq)]
pub enum Samples {
    /// Unsigned byte magnitudes from deep memory.
    Raw(Vec<u8>),
    /// Calibrated voltages.
    Volts(Vec<f64>),
}

impl Samples {
    pub fn len(&self) -> usize {
        match self {
            Samples::Raw(raw) => raw.len(),
            Samples::Volts(volts) => volts.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        match self {
            Samples::Raw(raw) => raw.get(index).map(|&v| f64::from(v)),
            Samples::Volts(volts) => volts.get(index).copied(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.len()).filter_map(|i| self.get(i))
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.iter().collect()
    }
}

/// Converts one raw 16-bit sample word to volts.
#[inline(always)]
pub fn sample_volts(word: u16, voltage_value: f32, voltage_level: f64, power_index: f64) -> f64 {
    f64::from(word as i16) * 2.0 * f64::from(voltage_value) * voltage_level / power_index
}

/// One channel's calibration metadata and samples.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelRecord {
    pub name: [u8; NAME_LEN],
    pub mode: SampleMode,
    /// Present for deep memory records only.
    pub flags: Option<u32>,
    /// Present for [`Layout::Offset`] streams only.
    pub offset: Option<i32>,
    pub whole_points: i32,
    pub sample_count: i32,
    pub slow_moving_number: i32,
    pub time_base_level: i32,
    pub zero_point: i32,
    pub voltage_level_index: i32,
    /// Volts per division.
    pub voltage_level: f64,
    pub power_index_exponent: i32,
    /// Attenuation multiplier, `10^power_index_exponent`.
    pub power_index: f64,
    /// Time between samples in microseconds.
    pub spacing_interval: f32,
    pub frequency: i32,
    pub cycles: i32,
    /// Scale factor per LSB.
    pub voltage_value: f32,
    pub samples: Samples,
}

impl ChannelRecord {
    /// Reads the remainder of a record whose name has already been consumed.
    pub fn read<R: Read>(
        name: [u8; NAME_LEN],
        layout: Layout,
        reader: &mut CaptureReader<R>,
    ) -> Result<Self, CaptureError> {
        let mode = SampleMode::from_declared_length(reader.get_i32("channel length")?);

        let flags = if mode.is_deep() {
            let flags = reader.get_u32("deep memory flags")?;
            if flags & FLAG_HAS_DEEP_MEMORY == 0 {
                debug!(
                    "{}: negative length without deep memory flag ({flags:#X}), treating as deep memory",
                    String::from_utf8_lossy(&name)
                );
            }
            Some(flags)
        } else {
            None
        };

        let offset = if layout.has_offset_field() {
            Some(reader.get_i32("channel offset")?)
        } else {
            None
        };

        let whole_points = reader.get_i32("whole points")?;
        let sample_count = reader.get_i32("sample count")?;
        let slow_moving_number = reader.get_i32("slow moving number")?;
        let time_base_level = reader.get_i32("time base level")?;
        let zero_point = reader.get_i32("zero point")?;
        let voltage_level_index = reader.get_i32("voltage level")?;
        let voltage_level = voltage_level(voltage_level_index)?;
        let power_index_exponent = reader.get_i32("power index")?;
        let power_index = power_index(power_index_exponent);
        let spacing_interval = reader.get_f32("spacing interval")?;
        let frequency = reader.get_i32("frequency")?;
        let cycles = reader.get_i32("cycles")?;
        let voltage_value = reader.get_f32("voltage value")?;

        let count = usize::try_from(sample_count).map_err(|_| CaptureError::InvalidSampleCount {
            channel: String::from_utf8_lossy(&name).into_owned(),
            count: sample_count,
        })?;

        let samples = if mode.is_deep() {
            Samples::Raw(reader.get_bytes(count, "samples")?)
        } else {
            let words = reader.get_bytes(count * 2, "samples")?;
            Samples::Volts(
                words
                    .chunks_exact(2)
                    .map(|w| {
                        sample_volts(
                            u16::from_be_bytes([w[0], w[1]]),
                            voltage_value,
                            voltage_level,
                            power_index,
                        )
                    })
                    .collect(),
            )
        };

        let record = Self {
            name,
            mode,
            flags,
            offset,
            whole_points,
            sample_count,
            slow_moving_number,
            time_base_level,
            zero_point,
            voltage_level_index,
            voltage_level,
            power_index_exponent,
            power_index,
            spacing_interval,
            frequency,
            cycles,
            voltage_value,
            samples,
        };

        trace!(
            "{}: {} mode, length {}, {} samples, {} V/div",
            record.name(),
            record.mode,
            record.mode.length(),
            record.samples.len(),
            record.voltage_level
        );

        Ok(record)
    }

    pub fn name(&self) -> &str {
        std::str::from_utf8(&self.name).unwrap_or("CH?")
    }

    /// Channel number taken from the name's digit.
    pub fn number(&self) -> u8 {
        self.name[2].wrapping_sub(b'0')
    }

    pub fn is_deep(&self) -> bool {
        self.mode.is_deep()
    }

    /// Whether the flags word confirms deep memory data.
    pub fn has_deep_memory(&self) -> bool {
        self.flags
            .is_some_and(|flags| flags & FLAG_HAS_DEEP_MEMORY != 0)
    }

    /// Duration covered by the samples in microseconds.
    pub fn time_span_us(&self) -> f64 {
        f64::from(self.spacing_interval) * self.samples.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::byteorder::{WriteBytesBe, WriteBytesLe};
    use crate::utils::reader::SliceReader;
    use owonscope_macros::ToBytes;

    #[derive(ToBytes)]
    struct Scalars {
        whole_points: i32,
        sample_count: i32,
        slow_moving_number: i32,
        time_base_level: i32,
        zero_point: i32,
        voltage_level_index: i32,
        power_index_exponent: i32,
        spacing_interval: f32,
        frequency: i32,
        cycles: i32,
        voltage_value: f32,
    }

    fn scalars(sample_count: i32) -> Scalars {
        Scalars {
            whole_points: 600,
            sample_count,
            slow_moving_number: 0,
            time_base_level: 12,
            zero_point: -25,
            voltage_level_index: 9,
            power_index_exponent: 1,
            spacing_interval: 0.5,
            frequency: 1000,
            cycles: 1000,
            voltage_value: 0.25,
        }
    }

    #[test]
    fn channel_name_pattern() {
        assert!(is_channel_name(b"CH1"));
        assert!(is_channel_name(b"CH0"));
        assert!(!is_channel_name(b"CHx"));
        assert!(!is_channel_name(b"ch1"));
        assert!(!is_channel_name(b"MA1"));
    }

    #[test]
    fn sample_mode_from_sign() {
        assert_eq!(SampleMode::from_declared_length(-10), SampleMode::Deep(10));
        assert_eq!(SampleMode::from_declared_length(10), SampleMode::Normal(10));
        assert_eq!(
            SampleMode::from_declared_length(i32::MIN),
            SampleMode::Deep(1 << 31)
        );
    }

    #[test]
    fn normal_record_volts() -> Result<(), CaptureError> {
        let words: Vec<u16> = vec![0x0000, 0xFFFF, 0x0001, 0x7FFF, 0x8000];
        let mut data = crate::join_bytes_le!(5i32, scalars(5));
        words.write_be(&mut data);

        let mut reader = SliceReader::from_slice(&data);
        let record = ChannelRecord::read(*b"CH1", Layout::Standard, &mut reader)?;

        assert_eq!(record.mode, SampleMode::Normal(5));
        assert_eq!(record.flags, None);
        assert_eq!(record.offset, None);
        assert_eq!(record.voltage_level, 2.0);
        assert_eq!(record.power_index, 10.0);
        assert_eq!(record.samples.len(), 5);

        // 2.0 * 0.25 * 2.0 / 10.0
        let lsb = 0.1;
        let volts = record.samples.to_vec();
        assert_eq!(volts[0], 0.0);
        assert!((volts[1] + lsb).abs() < 1e-12);
        assert!((volts[2] - lsb).abs() < 1e-12);
        assert!((volts[3] - 32767.0 * lsb).abs() < 1e-9);
        assert!((volts[4] + 32768.0 * lsb).abs() < 1e-9);
        assert_eq!(reader.position(), data.len() as u64);
        Ok(())
    }

    #[test]
    fn all_bits_set_word() {
        let expected = -1.0 * 2.0 * f64::from(0.04f32) * 0.5 / 100.0;
        assert_eq!(sample_volts(0xFFFF, 0.04, 0.5, 100.0), expected);
        assert_eq!(sample_volts(0x0000, 0.04, 0.5, 100.0), 0.0);
    }

    #[test]
    fn deep_record_with_offset() -> Result<(), CaptureError> {
        let samples: Vec<u8> = vec![0, 127, 128, 255];
        let data = crate::join_bytes_le!(-4i32, 1u32, -300i32, scalars(4), samples);

        let mut reader = SliceReader::from_slice(&data);
        let record = ChannelRecord::read(*b"CH2", Layout::Offset, &mut reader)?;

        assert_eq!(record.mode, SampleMode::Deep(4));
        assert!(record.has_deep_memory());
        assert_eq!(record.offset, Some(-300));
        assert_eq!(record.zero_point, -25);
        assert_eq!(record.number(), 2);
        assert_eq!(record.samples, Samples::Raw(vec![0, 127, 128, 255]));
        assert!(record.samples.iter().all(|v| (0.0..=255.0).contains(&v)));
        assert_eq!(record.time_span_us(), 2.0);
        Ok(())
    }

    #[test]
    fn deep_mode_follows_length_sign() -> Result<(), CaptureError> {
        let data = crate::join_bytes_le!(-2i32, 0u32, scalars(2), [9u8, 8u8]);

        let mut reader = SliceReader::from_slice(&data);
        let record = ChannelRecord::read(*b"CH1", Layout::Standard, &mut reader)?;

        assert!(record.is_deep());
        assert!(!record.has_deep_memory());
        assert_eq!(record.samples, Samples::Raw(vec![9, 8]));
        Ok(())
    }

    #[test]
    fn bad_voltage_index() {
        let mut fields = scalars(0);
        fields.voltage_level_index = 21;
        let data = crate::join_bytes_le!(0i32, fields);

        let mut reader = SliceReader::from_slice(&data);
        assert!(matches!(
            ChannelRecord::read(*b"CH1", Layout::Standard, &mut reader),
            Err(CaptureError::VoltageLevelIndex(21))
        ));
    }

    #[test]
    fn negative_sample_count() {
        let data = crate::join_bytes_le!(0i32, scalars(-1));

        let mut reader = SliceReader::from_slice(&data);
        assert!(matches!(
            ChannelRecord::read(*b"CH3", Layout::Standard, &mut reader),
            Err(CaptureError::InvalidSampleCount { count: -1, .. })
        ));
    }

    #[test]
    fn truncated_sample_array() {
        let data = crate::join_bytes_le!(3i32, scalars(3), [0u16; 3]);

        let mut reader = SliceReader::from_slice(&data[..data.len() - 1]);
        assert!(matches!(
            ChannelRecord::read(*b"CH1", Layout::Standard, &mut reader),
            Err(CaptureError::TruncatedInput {
                field: "samples",
                ..
            })
        ));
    }
}
