use std::io::Read;

use anyhow::Result;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::Level;

use super::command::{Cli, InfoArgs};
use crate::input::InputReader;
use crate::units::{micros_str, volts_str};
use owon::process::decode::{Capture, Decoder};
use owon::structs::channel::ChannelRecord;

pub fn cmd_info(args: &InfoArgs, cli: &Cli, multi: Option<&MultiProgress>) -> Result<()> {
    let source = InputReader::describe(&args.input);
    log::info!("Analyzing capture: {source}");

    let input_reader = InputReader::new(&args.input)?;
    if input_reader.is_pipe() {
        log::debug!("Reading capture from pipe");
    }

    let capture = read_capture(input_reader, cli.fail_level(), multi)?;
    display_capture(&capture, args.samples);

    Ok(())
}

/// Decodes a whole capture, showing a spinner per decoded channel when
/// progress output is enabled.
pub fn read_capture<R: Read>(
    read: R,
    fail_level: Level,
    multi: Option<&MultiProgress>,
) -> Result<Capture> {
    let mut decoder = Decoder::with_fail_level(read, fail_level)?;

    let pb = match multi {
        Some(multi) => {
            let pb = multi.add(ProgressBar::new_spinner());
            pb.set_style(ProgressStyle::with_template("{spinner:.green} {msg}")?);
            pb.enable_steady_tick(std::time::Duration::from_millis(100));
            pb.set_message("Decoding channels...");
            Some(pb)
        }
        None => None,
    };

    let mut channels = Vec::new();
    for record in decoder.by_ref() {
        let record = record?;
        if let Some(pb) = &pb {
            pb.set_message(format!("Decoded {} ({} samples)", record.name(), record.samples.len()));
        }
        channels.push(record);
    }

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    log::info!(
        "Decoded {} channel(s), {} bytes",
        channels.len(),
        decoder.position()
    );

    Ok(Capture {
        preamble: decoder.preamble().clone(),
        layout: decoder.layout(),
        channels,
    })
}

pub fn display_capture(capture: &Capture, samples: usize) {
    let preamble = &capture.preamble;

    println!();
    println!("Capture Information");
    println!("===================");
    println!();
    println!("  Model                     {}", preamble.model());
    if !preamble.serial().is_empty() {
        println!("  Serial                    {}", preamble.serial());
    }
    println!("  Layout                    {}", capture.layout);
    println!(
        "  Payload size              {} bytes{}",
        preamble.payload_size(),
        if preamble.is_customized_size() {
            " (customized)"
        } else {
            ""
        }
    );
    println!("  Trigger status            {}", preamble.trigger_status);
    println!();

    for record in &capture.channels {
        display_channel(record, samples);
    }

    let total_samples: usize = capture.channels.iter().map(|c| c.samples.len()).sum();
    println!("Capture Summary");
    println!("  Channels                  {}", capture.channels.len());
    println!("  Total samples             {total_samples}");
    println!();
}

fn display_channel(record: &ChannelRecord, samples: usize) {
    println!("Channel {}", record.name());
    println!("  Mode                      {}", record.mode);
    if let Some(flags) = record.flags {
        println!("  Flags                     {flags:#010X}");
    }
    if let Some(offset) = record.offset {
        println!("  Offset                    {offset}");
    }
    println!("  Samples                   {}", record.samples.len());
    println!("  Whole points              {}", record.whole_points);
    println!(
        "  Sample interval           {}",
        micros_str(f64::from(record.spacing_interval))
    );
    println!(
        "  Time span                 {}",
        micros_str(record.time_span_us())
    );
    println!("  Time base level           {}", record.time_base_level);
    println!("  Zero point                {}", record.zero_point);
    println!(
        "  Volts/div                 {} (index {})",
        volts_str(record.voltage_level),
        record.voltage_level_index
    );
    println!(
        "  Power index               {} (10^{})",
        record.power_index, record.power_index_exponent
    );
    println!("  Voltage value             {}", record.voltage_value);
    println!("  Frequency                 {} Hz", record.frequency);
    println!("  Cycles                    {}", record.cycles);

    let (min, max) = record
        .samples
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !record.samples.is_empty() {
        if record.is_deep() {
            println!("  Range                     {min} .. {max} (raw)");
        } else {
            println!("  Range                     {} .. {}", volts_str(min), volts_str(max));
        }
    }

    if samples > 0 {
        let head: Vec<String> = record
            .samples
            .iter()
            .take(samples)
            .map(|v| format!("{v}"))
            .collect();
        println!("  First samples             {}", head.join(", "));
    }

    println!();
}
