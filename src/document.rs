use serde::{Deserialize, Serialize};

use owon::process::decode::Capture;
use owon::structs::channel::{ChannelRecord, Samples};
use owon::structs::preamble::Layout;

pub const DOCUMENT_VERSION: &str = "1.0";

/// Serializable form of a decoded capture.
#[derive(Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureDocument {
    version: String,
    creation_tool: String,
    creation_tool_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    model: String,
    serial: String,
    payload_size: u32,
    customized_size: bool,
    trigger_status: u8,
    layout: LayoutKind,
    #[serde(default)]
    channels: Vec<ChannelDocument>,
}

#[derive(Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
enum LayoutKind {
    Standard,
    Offset,
}

/// Sample array keyed by the channel's `mode`.
#[derive(Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "mode", content = "samples", rename_all = "lowercase")]
enum SampleValues {
    Normal(Vec<f64>),
    Deep(Vec<u8>),
}

#[derive(Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChannelDocument {
    name: String,
    length: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    flags: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    offset: Option<i32>,
    whole_points: i32,
    sample_count: i32,
    slow_moving_number: i32,
    time_base_level: i32,
    zero_point: i32,
    voltage_level: f64,
    power_index: f64,
    #[serde(rename = "spacingIntervalUs")]
    spacing_interval: f32,
    frequency: i32,
    cycles: i32,
    voltage_value: f32,
    #[serde(flatten)]
    samples: SampleValues,
}

impl CaptureDocument {
    pub fn with_capture(capture: &Capture, source: Option<String>) -> Self {
        let preamble = &capture.preamble;

        Self {
            version: DOCUMENT_VERSION.to_string(),
            creation_tool: env!("CARGO_PKG_NAME").to_string(),
            creation_tool_version: env!("CARGO_PKG_VERSION").to_string(),
            source,
            model: preamble.model(),
            serial: preamble.serial(),
            payload_size: preamble.payload_size(),
            customized_size: preamble.is_customized_size(),
            trigger_status: preamble.trigger_status,
            layout: match capture.layout {
                Layout::Standard => LayoutKind::Standard,
                Layout::Offset => LayoutKind::Offset,
            },
            channels: capture
                .channels
                .iter()
                .map(ChannelDocument::with_record)
                .collect(),
        }
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml_ng::Error> {
        serde_yaml_ng::to_string(self)
    }
}

impl ChannelDocument {
    fn with_record(record: &ChannelRecord) -> Self {
        Self {
            name: record.name().to_string(),
            length: record.mode.length(),
            flags: record.flags,
            offset: record.offset,
            whole_points: record.whole_points,
            sample_count: record.sample_count,
            slow_moving_number: record.slow_moving_number,
            time_base_level: record.time_base_level,
            zero_point: record.zero_point,
            voltage_level: record.voltage_level,
            power_index: record.power_index,
            spacing_interval: record.spacing_interval,
            frequency: record.frequency,
            cycles: record.cycles,
            voltage_value: record.voltage_value,
            samples: match &record.samples {
                Samples::Raw(raw) => SampleValues::Deep(raw.clone()),
                Samples::Volts(volts) => SampleValues::Normal(volts.clone()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use owon::process::{EXAMPLE_CAPTURE, decode::Decoder};

    #[test]
    fn example_document() {
        let capture = Decoder::new(EXAMPLE_CAPTURE)
            .unwrap()
            .into_capture()
            .unwrap();
        let document = CaptureDocument::with_capture(&capture, Some("example.bin".to_string()));
        let yaml = document.to_yaml().unwrap();

        assert!(yaml.starts_with(&format!("version: '{DOCUMENT_VERSION}'\n")));
        assert!(yaml.contains("model: SDSxxx\n"));
        assert!(yaml.contains("layout: standard\n"));
        assert!(yaml.contains("- name: CH1\n"));
        assert!(yaml.contains("mode: deep\n"));
        assert!(yaml.contains("flags: 1\n"));
        assert!(!yaml.contains("offset:"));
        assert!(yaml.contains("spacingIntervalUs: 1.0\n"));

        let parsed: CaptureDocument = serde_yaml_ng::from_str(&yaml).unwrap();
        assert_eq!(parsed, document);
        assert_eq!(
            parsed.channels[0].samples,
            SampleValues::Deep((0..10).collect())
        );
    }

    #[test]
    fn volts_stay_floats() {
        let yaml = r#"version: '1.0'
creationTool: owonscope
creationToolVersion: 0.1.0
model: SPBS01
serial: ''
payloadSize: 0
customizedSize: false
triggerStatus: 0
layout: offset
channels:
- name: CH2
  mode: normal
  length: 2
  offset: -7
  wholePoints: 2
  sampleCount: 2
  slowMovingNumber: 0
  timeBaseLevel: 3
  zeroPoint: 0
  voltageLevel: 1.0
  powerIndex: 1.0
  spacingIntervalUs: 2.0
  frequency: 50
  cycles: 20000
  voltageValue: 0.5
  samples:
  - 2.0
  - -0.5
"#;

        let parsed: CaptureDocument = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(parsed.layout, LayoutKind::Offset);
        assert_eq!(parsed.channels[0].offset, Some(-7));
        assert_eq!(
            parsed.channels[0].samples,
            SampleValues::Normal(vec![2.0, -0.5])
        );
    }

    #[test]
    fn empty_normal_channel_keeps_mode() {
        let yaml = r#"name: CH1
length: 0
wholePoints: 0
sampleCount: 0
slowMovingNumber: 0
timeBaseLevel: 0
zeroPoint: 0
voltageLevel: 1.0
powerIndex: 1.0
spacingIntervalUs: 1.0
frequency: 0
cycles: 0
voltageValue: 0.5
mode: normal
samples: []
"#;

        let channel: ChannelDocument = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(channel.samples, SampleValues::Normal(Vec::new()));

        let reparsed: ChannelDocument =
            serde_yaml_ng::from_str(&serde_yaml_ng::to_string(&channel).unwrap()).unwrap();
        assert_eq!(reparsed, channel);

        let deep = yaml.replace("mode: normal", "mode: deep");
        let channel: ChannelDocument = serde_yaml_ng::from_str(&deep).unwrap();
        assert_eq!(channel.samples, SampleValues::Deep(Vec::new()));
    }
}
