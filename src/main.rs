use anyhow::Result;
use clap::Parser as ClapParser;
use indicatif::MultiProgress;
use indicatif_log_bridge::LogWrapper;

use cli::command::{Cli, Commands, LogFormat};
use cli::export::cmd_export;
use cli::fetch::cmd_fetch;
use cli::info::cmd_info;

mod cli;
mod document;
mod input;
mod units;

/// One log record as a single-line JSON object.
fn json_line(ts: impl std::fmt::Display, record: &log::Record) -> String {
    serde_json::json!({
        "ts": ts.to_string(),
        "lvl": record.level().as_str(),
        "target": record.target(),
        "msg": record.args().to_string(),
    })
    .to_string()
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let base_level = cli.loglevel.to_level_filter();

    let multi = MultiProgress::new();

    let mut env_builder = env_logger::Builder::from_default_env();
    env_builder.filter_level(base_level);
    match cli.log_format {
        LogFormat::Plain => {
            env_builder.format_timestamp_secs();
        }
        LogFormat::Json => {
            env_builder.format(|buf, record| {
                use std::io::Write;
                let line = json_line(buf.timestamp(), record);
                writeln!(buf, "{line}")
            });
        }
    }

    let pb = if cli.progress {
        let logger = env_builder.build();
        LogWrapper::new(multi.clone(), logger).try_init()?;
        Some(&multi)
    } else {
        env_builder.try_init()?;
        None
    };

    log::debug!(
        "{} {} ({})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        option_env!("VERGEN_GIT_DESCRIBE").unwrap_or("unknown")
    );

    match cli.command {
        Commands::Info(ref args) => cmd_info(args, &cli, pb)?,
        Commands::Export(ref args) => cmd_export(args, &cli, pb)?,
        Commands::Fetch(ref args) => cmd_fetch(args, &cli, pb)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_log_line_parses() {
        let line = json_line(
            "2026-10-17T22:42:56Z",
            &log::Record::builder()
                .args(format_args!("End marker {:?} after 1 records\nnext", "\0\0\0\\"))
                .level(log::Level::Trace)
                .target("owon::process::decode")
                .build(),
        );

        assert!(!line.contains('\n'));

        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["ts"], "2026-10-17T22:42:56Z");
        assert_eq!(value["lvl"], "TRACE");
        assert_eq!(value["target"], "owon::process::decode");
        assert_eq!(
            value["msg"],
            "End marker \"\\0\\0\\0\\\\\" after 1 records\nnext"
        );
    }
}
