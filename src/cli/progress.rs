use anyhow::Result;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use owon::process::receive::FrameProgress;

pub fn create_frame_progress_bar(multi: &MultiProgress) -> Result<ProgressBar> {
    let pb = multi.add(ProgressBar::new(0));
    pb.set_style(
        ProgressStyle::with_template(
            "{bar:40.cyan/blue} {bytes}/{total_bytes} ({percent}%)\n{msg} | elapsed: {elapsed_precise}",
        )?
        .progress_chars("##-"),
    );
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb.set_message("waiting for response");
    Ok(pb)
}

/// Mirrors the position within the current frame onto the bar.
pub fn update_frame_progress(pb: &ProgressBar, progress: FrameProgress) {
    let length = u64::from(progress.frame_length);
    if pb.length() != Some(length) {
        pb.set_length(length);
    }
    pb.set_position(u64::from(progress.received));
    pb.set_message(format!("frame {}/{}", progress.frame, progress.frames));
}
