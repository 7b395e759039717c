use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

const BAR_TEMPLATE: &str = "{spinner} {prefix} {wide_bar} {pos:>5}/{len} {msg}";

/// Receives progress of an aggregation run.
pub trait Progress {
    fn organization(&self, org: &str, members: usize);
    fn member(&self, login: &str);
    fn finish(&self);
}

/// Discards all progress.
pub struct Silent;

impl Progress for Silent {
    fn organization(&self, _org: &str, _members: usize) {}
    fn member(&self, _login: &str) {}
    fn finish(&self) {}
}

/// Terminal progress bar with one tick per member.
pub struct ProgressBarReporter {
    bar: ProgressBar,
}

impl ProgressBarReporter {
    pub fn new() -> Self {
        let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
        let style = ProgressStyle::with_template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        bar.set_style(style);
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }
}

impl Default for ProgressBarReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress for ProgressBarReporter {
    fn organization(&self, org: &str, members: usize) {
        self.bar.set_prefix(org.to_string());
        self.bar.set_length(members as u64);
        self.bar.set_position(0);
    }

    fn member(&self, login: &str) {
        // Position counts members already finished; the message names the one in flight.
        if self.bar.message().is_empty() {
            self.bar.set_message(login.to_string());
        } else {
            self.bar.inc(1);
            self.bar.set_message(login.to_string());
        }
    }

    fn finish(&self) {
        if let Some(len) = self.bar.length() {
            self.bar.set_position(len);
        }
        self.bar
            .finish_with_message("Contributions retrieval complete".to_string());
    }
}
