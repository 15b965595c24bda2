use std::fs;
use std::time::Duration;

use anyhow::{Result, bail};
use indicatif::MultiProgress;

use super::command::{Cli, FetchArgs, FetchCommand};
use super::info::{display_capture, read_capture};
use super::progress::{create_frame_progress_bar, update_frame_progress};
use owon::process::client::{Client, StartCommand};

pub fn cmd_fetch(args: &FetchArgs, cli: &Cli, multi: Option<&MultiProgress>) -> Result<()> {
    if args.command == FetchCommand::Bmp && args.output.is_none() {
        bail!("Fetching a bitmap requires --output");
    }

    let command = StartCommand::from(args.command);
    let mut client = Client::new(args.host.as_str(), args.port);
    client.set_timeout((args.timeout > 0).then(|| Duration::from_secs(args.timeout)));

    log::info!("Requesting {command} from {}", client.address());

    let pb = multi.map(create_frame_progress_bar).transpose()?;
    let payload = client.fetch(command, |progress| {
        if let Some(pb) = &pb {
            update_frame_progress(pb, progress);
        }
    });
    if let Some(pb) = &pb {
        pb.finish_and_clear();
    }
    let payload = payload?;

    if let Some(path) = &args.output {
        fs::write(path, &payload)?;
        log::info!("Saved {} bytes to {}", payload.len(), path.display());
    }

    if command.is_vector() {
        let capture = read_capture(payload.as_slice(), cli.fail_level(), multi)?;
        display_capture(&capture, args.samples);
    }

    Ok(())
}
