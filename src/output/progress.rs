use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use super::styling::{bright_green, bright_yellow};

/// Spinner shown on stderr while the build history downloads.
pub struct FetchProgress {
    pb: ProgressBar,
}

impl FetchProgress {
    pub fn start(job_name: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_draw_target(ProgressDrawTarget::stderr());
        if let Ok(style) = ProgressStyle::default_spinner().template("  {msg} {spinner}") {
            pb.set_style(style);
        }
        pb.set_message(bright_yellow(format!("Fetching builds for {job_name}")).to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        Self { pb }
    }

    pub fn finish(self, build_count: usize) {
        self.pb.finish_with_message(
            bright_green(format!("Fetched {build_count} successful builds ✓")).to_string(),
        );
        eprintln!();
    }

    pub fn abandon(self) {
        self.pb.abandon();
    }
}
