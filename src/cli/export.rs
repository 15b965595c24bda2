use std::fs;

use anyhow::Result;
use indicatif::MultiProgress;

use super::command::{Cli, ExportArgs};
use super::info::read_capture;
use crate::document::CaptureDocument;
use crate::input::InputReader;

pub fn cmd_export(args: &ExportArgs, cli: &Cli, multi: Option<&MultiProgress>) -> Result<()> {
    let source = InputReader::describe(&args.input);
    log::info!("Exporting capture: {source}");

    let input_reader = InputReader::new(&args.input)?;
    let capture = read_capture(input_reader, cli.fail_level(), multi)?;

    let document = CaptureDocument::with_capture(&capture, Some(source));
    let yaml = document.to_yaml()?;

    match &args.output {
        Some(path) => {
            fs::write(path, yaml)?;
            log::info!("Wrote capture document to {}", path.display());
        }
        None => print!("{yaml}"),
    }

    Ok(())
}
